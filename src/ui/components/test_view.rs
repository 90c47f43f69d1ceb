use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::quiz::test_session::PracticeTest;
use crate::ui::components::input_line;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

pub struct TestView<'a> {
    test: &'a PracticeTest,
    /// Editor for the selected question's answer, when open.
    editing: Option<&'a LineInput>,
    user: Option<&'a str>,
    error: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> TestView<'a> {
    pub fn new(test: &'a PracticeTest, editing: Option<&'a LineInput>, theme: &'a Theme) -> Self {
        Self {
            test,
            editing,
            user: None,
            error: None,
            theme,
        }
    }

    pub fn user(mut self, user: Option<&'a str>) -> Self {
        self.user = user;
        self
    }

    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }
}

impl Widget for TestView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} Practice Test ", self.test.field))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(4),
                Constraint::Length(1),
            ])
            .split(inner);

        let signed_in = match self.user {
            Some(uid) => format!("signed in as {uid}"),
            None => "not signed in".to_string(),
        };
        let summary = format!(
            "  Answered {}/{}  |  {signed_in}",
            self.test.attempted(),
            self.test.total()
        );
        Paragraph::new(Line::from(Span::styled(
            summary,
            Style::default().fg(colors.muted()),
        )))
        .render(layout[0], buf);

        // Each question takes its text line, its answer line and a spacer.
        let per_question = 3usize;
        let visible = (layout[1].height as usize / per_question).max(1);
        let first = self.test.selected.saturating_sub(visible - 1);

        let mut lines = Vec::new();
        for (i, question) in self
            .test
            .questions()
            .iter()
            .enumerate()
            .skip(first)
            .take(visible)
        {
            let is_selected = i == self.test.selected;
            let indicator = if is_selected { ">" } else { " " };
            lines.push(Line::from(Span::styled(
                format!("{indicator} {}. {}", i + 1, question.question),
                Style::default()
                    .fg(if is_selected { colors.accent() } else { colors.fg() })
                    .add_modifier(if is_selected {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    }),
            )));

            let answer_line = match self.editing {
                Some(input) if is_selected => input_line("    ", input, self.theme),
                _ => {
                    let answer = self.test.answer_text(i);
                    if answer.trim().is_empty() {
                        Line::from(Span::styled(
                            "    (no answer yet)",
                            Style::default().fg(colors.muted()),
                        ))
                    } else {
                        Line::from(Span::styled(
                            format!("    {answer}"),
                            Style::default().fg(colors.success()),
                        ))
                    }
                }
            };
            lines.push(answer_line);
            lines.push(Line::from(""));
        }
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(layout[1], buf);

        if let Some(error) = self.error {
            Paragraph::new(Line::from(Span::styled(
                format!("  {error}"),
                Style::default()
                    .fg(colors.error())
                    .add_modifier(Modifier::BOLD),
            )))
            .render(layout[2], buf);
        }
    }
}
