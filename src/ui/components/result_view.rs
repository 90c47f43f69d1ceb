use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::quiz::result::TestResult;
use crate::quiz::score::ScoreBand;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;

pub struct ResultView<'a> {
    pub result: &'a TestResult,
    pub theme: &'a Theme,
}

impl<'a> ResultView<'a> {
    pub fn new(result: &'a TestResult, theme: &'a Theme) -> Self {
        Self { result, theme }
    }
}

impl Widget for ResultView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Test Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let title = Paragraph::new(Line::from(Span::styled(
            "Results",
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        title.render(layout[0], buf);

        let total_line = Line::from(vec![
            Span::styled("  Total questions:  ", Style::default().fg(colors.fg())),
            Span::styled(
                self.result.total.to_string(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        Paragraph::new(total_line).render(layout[1], buf);

        let band = ScoreBand::from_counts(self.result.attempted, self.result.total);
        let band_color = match band {
            ScoreBand::Excellent | ScoreBand::Good => colors.success(),
            ScoreBand::Average => colors.warning(),
            ScoreBand::Low => colors.error(),
        };
        let attempted_line = Line::from(vec![
            Span::styled("  Attempted:        ", Style::default().fg(colors.fg())),
            Span::styled(
                self.result.attempted.to_string(),
                Style::default().fg(band_color).add_modifier(Modifier::BOLD),
            ),
        ]);
        Paragraph::new(attempted_line).render(layout[2], buf);

        ProgressBar::new("Completion", self.result.percent() / 100.0, self.theme)
            .render(layout[3], buf);

        Paragraph::new(Line::from(Span::styled(
            format!("  {}", self.result.feedback),
            Style::default().fg(band_color).add_modifier(Modifier::BOLD),
        )))
        .wrap(Wrap { trim: false })
        .render(layout[4], buf);

        Paragraph::new(Line::from(Span::styled(
            format!("  Taken {}", self.result.date),
            Style::default().fg(colors.muted()),
        )))
        .render(layout[5], buf);

        let help = Paragraph::new(Line::from(vec![
            Span::styled("  [r] New test  ", Style::default().fg(colors.accent())),
            Span::styled("[q/Esc] Menu", Style::default().fg(colors.accent())),
        ]));
        help.render(layout[6], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::buffer_text;

    #[test]
    fn shows_counts_and_message() {
        let theme = Theme::default();
        let result = TestResult {
            total: 10,
            attempted: 6,
            feedback: ScoreBand::Average.message().to_string(),
            date: "1/2/2026, 3:04:05 PM".to_string(),
        };
        let area = Rect::new(0, 0, 70, 20);
        let mut buf = Buffer::empty(area);
        ResultView::new(&result, &theme).render(area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("Total questions:  10"));
        assert!(text.contains("Attempted:        6"));
        assert!(text.contains("60%"));
        assert!(text.contains("Average attempt"));
    }
}
