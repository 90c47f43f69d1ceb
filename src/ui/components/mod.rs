pub mod feedback_view;
pub mod menu;
pub mod practice_view;
pub mod progress_bar;
pub mod result_view;
pub mod setup_view;
pub mod test_view;

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

/// Editable text with a block cursor.
pub fn input_line<'a>(prefix: &'a str, input: &'a LineInput, theme: &Theme) -> Line<'a> {
    let colors = &theme.colors;
    let (before, cursor, after) = input.render_parts();
    let cursor_style = Style::default()
        .fg(colors.bg())
        .bg(colors.highlight())
        .add_modifier(Modifier::BOLD);
    let mut spans = vec![
        Span::styled(prefix, Style::default().fg(colors.accent())),
        Span::styled(before, Style::default().fg(colors.fg())),
    ];
    match cursor {
        Some(ch) => spans.push(Span::styled(ch.to_string(), cursor_style)),
        None => spans.push(Span::styled(" ", cursor_style)),
    }
    spans.push(Span::styled(after, Style::default().fg(colors.fg())));
    Line::from(spans)
}

#[cfg(test)]
pub(crate) fn buffer_text(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            out.push_str(buf[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}
