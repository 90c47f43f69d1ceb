use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// Bordered gauge with a centered label, e.g. "Question 3 of 10".
pub struct ProgressBar<'a> {
    pub title: String,
    pub label: String,
    pub ratio: f64,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(title: &str, ratio: f64, theme: &'a Theme) -> Self {
        let ratio = ratio.clamp(0.0, 1.0);
        Self {
            title: title.to_string(),
            label: format!("{:.0}%", ratio * 100.0),
            ratio,
            theme,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = (self.ratio * inner.width as f64) as u16;

        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg()).bg(colors.bar_filled())
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let label_width = self.label.chars().count() as u16;
        let label_x = inner.x + (inner.width.saturating_sub(label_width)) / 2;
        buf.set_string(label_x, inner.y, &self.label, Style::default().fg(colors.fg()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::buffer_text;

    #[test]
    fn renders_custom_label() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 30, 3);
        let mut buf = Buffer::empty(area);
        ProgressBar::new("Setup", 2.0 / 3.0, &theme)
            .label("Step 2 of 3")
            .render(area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("Setup"));
        assert!(text.contains("Step 2 of 3"));
    }

    #[test]
    fn ratio_is_clamped() {
        let theme = Theme::default();
        let bar = ProgressBar::new("x", 1.7, &theme);
        assert_eq!(bar.ratio, 1.0);
        assert_eq!(bar.label, "100%");
    }
}
