use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::interview::feedback::Feedback;
use crate::interview::setup::InterviewConfig;
use crate::ui::theme::Theme;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Shown while feedback is generated, or when generation failed.
pub struct LoadingView<'a> {
    error: Option<&'a str>,
    frame: usize,
    theme: &'a Theme,
}

impl<'a> LoadingView<'a> {
    pub fn new(error: Option<&'a str>, frame: usize, theme: &'a Theme) -> Self {
        Self {
            error,
            frame,
            theme,
        }
    }
}

impl Widget for LoadingView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Feedback ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let lines = match self.error {
            Some(error) => vec![
                Line::from(""),
                Line::from(Span::styled(
                    error,
                    Style::default()
                        .fg(colors.error())
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "[r] Retry  [h] Home",
                    Style::default().fg(colors.accent()),
                )),
            ],
            None => vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("{} Analyzing your responses", SPINNER[self.frame % SPINNER.len()]),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Reviewing clarity, confidence and structure...",
                    Style::default().fg(colors.muted()),
                )),
            ],
        };
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

/// The coaching report: mistakes, improvements, evaluation, sample answer.
pub struct FeedbackView<'a> {
    feedback: &'a Feedback,
    config: Option<&'a InterviewConfig>,
    scroll: u16,
    theme: &'a Theme,
}

impl<'a> FeedbackView<'a> {
    pub fn new(
        feedback: &'a Feedback,
        config: Option<&'a InterviewConfig>,
        scroll: u16,
        theme: &'a Theme,
    ) -> Self {
        Self {
            feedback,
            config,
            scroll,
            theme,
        }
    }

    fn heading(&self, text: &'static str) -> Line<'static> {
        Line::from(Span::styled(
            text,
            Style::default()
                .fg(self.theme.colors.accent())
                .add_modifier(Modifier::BOLD),
        ))
    }

    fn bullets(&self, items: &'a [String], marker: &'static str) -> Vec<Line<'a>> {
        items
            .iter()
            .map(|item| {
                Line::from(vec![
                    Span::styled(marker, Style::default().fg(self.theme.colors.highlight())),
                    Span::styled(item.as_str(), Style::default().fg(self.theme.colors.fg())),
                ])
            })
            .collect()
    }
}

impl<'a> Widget for FeedbackView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = match self.config {
            Some(c) => format!(" Feedback: {} / {} ", c.interview_type.label(), c.job_title),
            None => " Feedback ".to_string(),
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let fb = self.feedback;
        let label = |name: &'static str| Span::styled(name, Style::default().fg(colors.muted()));
        let body = |text: &'a str| Span::styled(text, Style::default().fg(colors.fg()));

        let mut lines = vec![self.heading("Areas to work on")];
        lines.extend(self.bullets(&fb.mistakes, "  - "));
        lines.push(Line::from(""));
        lines.push(self.heading("How to improve"));
        lines.extend(self.bullets(&fb.improvements, "  + "));
        lines.push(Line::from(""));
        lines.push(self.heading("Evaluation"));
        lines.push(Line::from(vec![label("  Clarity:    "), body(&fb.evaluation.clarity)]));
        lines.push(Line::from(vec![label("  Confidence: "), body(&fb.evaluation.confidence)]));
        lines.push(Line::from(vec![label("  Readiness:  "), body(&fb.evaluation.readiness)]));
        lines.push(Line::from(""));
        lines.push(self.heading("Sample answer"));
        lines.push(Line::from(Span::styled(
            format!("  {}", fb.sample_answer),
            Style::default()
                .fg(colors.fg())
                .add_modifier(Modifier::ITALIC),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            fb.encouragement.as_str(),
            Style::default().fg(colors.success()),
        )));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(inner, buf);
    }
}
