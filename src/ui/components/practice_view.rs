use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::interview::practice::{PracticeSession, RecordingState};
use crate::ui::components::input_line;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

pub struct PracticeView<'a> {
    session: &'a PracticeSession,
    /// Present while the user is typing the answer by hand.
    typing: Option<&'a LineInput>,
    theme: &'a Theme,
}

impl<'a> PracticeView<'a> {
    pub fn new(session: &'a PracticeSession, typing: Option<&'a LineInput>, theme: &'a Theme) -> Self {
        Self {
            session,
            typing,
            theme,
        }
    }
}

impl Widget for PracticeView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let config = &self.session.config;

        let title = format!(
            " {} Interview | {} | {} ",
            config.interview_type.label(),
            config.field,
            config.job_title
        );
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(inner);

        let label = format!(
            "Question {} of {}",
            self.session.current_index() + 1,
            self.session.question_count()
        );
        ProgressBar::new("Progress", self.session.progress(), self.theme)
            .label(label)
            .render(layout[0], buf);

        let question = self.session.current_question().unwrap_or("");
        Paragraph::new(Line::from(Span::styled(
            question,
            Style::default()
                .fg(colors.fg())
                .add_modifier(Modifier::BOLD),
        )))
        .wrap(Wrap { trim: true })
        .render(layout[1], buf);

        let indicator = match self.session.recording() {
            RecordingState::Recording => Span::styled(
                "  \u{25cf} Recording... press [space] to stop",
                Style::default()
                    .fg(colors.recording())
                    .add_modifier(Modifier::BOLD),
            ),
            RecordingState::Processing { .. } => Span::styled(
                "  Processing your answer...",
                Style::default().fg(colors.warning()),
            ),
            RecordingState::Idle if self.typing.is_some() => Span::styled(
                "  Typing answer. [Enter] keep  [Esc] discard",
                Style::default().fg(colors.accent()),
            ),
            RecordingState::Idle => Span::styled(
                "  Ready. Press [space] to record",
                Style::default().fg(colors.muted()),
            ),
        };
        Paragraph::new(Line::from(indicator)).render(layout[2], buf);

        let transcript_block = Block::bordered()
            .title(" Your answer ")
            .border_style(Style::default().fg(colors.border()));
        let transcript_area = transcript_block.inner(layout[3]);
        transcript_block.render(layout[3], buf);

        let body = match self.typing {
            Some(input) => Paragraph::new(input_line("", input, self.theme)),
            None if self.session.transcript().is_empty() => {
                Paragraph::new(Line::from(Span::styled(
                    "Your transcribed answer will appear here.",
                    Style::default().fg(colors.muted()),
                )))
            }
            None => Paragraph::new(Line::from(Span::styled(
                self.session.transcript(),
                Style::default().fg(colors.fg()),
            ))),
        };
        body.wrap(Wrap { trim: false }).render(transcript_area, buf);

        if let Some(ref status) = self.session.status {
            Paragraph::new(Line::from(Span::styled(
                format!("  {status}"),
                Style::default().fg(colors.error()),
            )))
            .render(layout[4], buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::interview::setup::{InterviewConfig, InterviewType};
    use crate::ui::components::buffer_text;

    fn session() -> PracticeSession {
        let config = InterviewConfig {
            interview_type: InterviewType::Behavioral,
            field: "Sales".to_string(),
            job_title: "Account Executive".to_string(),
        };
        PracticeSession::new(
            config,
            vec!["Tell me about yourself.".to_string(), "Why us?".to_string()],
            Duration::ZERO,
        )
    }

    #[test]
    fn shows_question_and_position() {
        let theme = Theme::default();
        let session = session();
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        PracticeView::new(&session, None, &theme).render(area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("Question 1 of 2"));
        assert!(text.contains("Tell me about yourself."));
        assert!(text.contains("Account Executive"));
    }

    #[test]
    fn shows_status_line() {
        let theme = Theme::default();
        let mut session = session();
        session.status = Some("Recording stopped: mic unplugged".to_string());
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        PracticeView::new(&session, None, &theme).render(area, &mut buf);
        assert!(buffer_text(&buf).contains("mic unplugged"));
    }
}
