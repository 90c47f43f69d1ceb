use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::interview::setup::{
    ALL_INTERVIEW_TYPES, FIELDS, SETUP_STEPS, SetupStep, SetupWizard,
};
use crate::ui::components::input_line;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

pub struct SetupView<'a> {
    wizard: &'a SetupWizard,
    job_input: &'a LineInput,
    theme: &'a Theme,
}

impl<'a> SetupView<'a> {
    pub fn new(wizard: &'a SetupWizard, job_input: &'a LineInput, theme: &'a Theme) -> Self {
        Self {
            wizard,
            job_input,
            theme,
        }
    }

    fn step_title(&self) -> &'static str {
        match self.wizard.step() {
            SetupStep::Type => "Choose the type of interview",
            SetupStep::Field => "Choose your field",
            SetupStep::JobTitle => "Which job are you preparing for?",
        }
    }

    /// (label, description, is_selected) for each row of a list step.
    fn rows(&self) -> Vec<(String, Option<&'static str>, bool)> {
        match self.wizard.step() {
            SetupStep::Type => ALL_INTERVIEW_TYPES
                .iter()
                .map(|&t| {
                    (
                        t.label().to_string(),
                        Some(t.description()),
                        self.wizard.interview_type == Some(t),
                    )
                })
                .collect(),
            SetupStep::Field => FIELDS
                .iter()
                .map(|&f| {
                    (
                        f.to_string(),
                        None,
                        self.wizard.field.as_deref() == Some(f),
                    )
                })
                .collect(),
            SetupStep::JobTitle => Vec::new(),
        }
    }
}

impl Widget for SetupView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Interview Setup ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(inner);

        let step_label = format!("Step {} of {SETUP_STEPS}", self.wizard.step_number());
        ProgressBar::new("Progress", self.wizard.progress(), self.theme)
            .label(step_label)
            .render(layout[0], buf);

        Paragraph::new(Line::from(Span::styled(
            format!("  {}", self.step_title()),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .render(layout[1], buf);

        if self.wizard.step() == SetupStep::JobTitle {
            let lines = vec![
                input_line("  Job title: ", self.job_input, self.theme),
                Line::from(""),
                Line::from(Span::styled(
                    "  e.g. Software Engineer, Financial Analyst, Registered Nurse",
                    Style::default().fg(colors.muted()),
                )),
            ];
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .render(layout[2], buf);
        } else {
            let rows = self.rows();
            let per_row = if rows.iter().any(|(_, d, _)| d.is_some()) { 2 } else { 1 };
            let visible = (layout[2].height as usize / per_row).max(1);
            let first = self.wizard.cursor.saturating_sub(visible - 1);

            let mut lines = Vec::new();
            for (i, (label, description, selected)) in
                rows.iter().enumerate().skip(first).take(visible)
            {
                let is_cursor = i == self.wizard.cursor;
                let indicator = if is_cursor { ">" } else { " " };
                let mark = if *selected { "(*)" } else { "( )" };
                let style = Style::default()
                    .fg(if *selected {
                        colors.success()
                    } else if is_cursor {
                        colors.accent()
                    } else {
                        colors.fg()
                    })
                    .add_modifier(if is_cursor {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    });
                lines.push(Line::from(Span::styled(
                    format!("  {indicator} {mark} {label}"),
                    style,
                )));
                if let Some(desc) = description {
                    lines.push(Line::from(Span::styled(
                        format!("        {desc}"),
                        Style::default().fg(colors.muted()),
                    )));
                }
            }
            Paragraph::new(lines).render(layout[2], buf);
        }

        let hint = if self.wizard.can_proceed() {
            Span::styled("  Ready to continue", Style::default().fg(colors.success()))
        } else {
            Span::styled(
                "  Make a selection to continue",
                Style::default().fg(colors.muted()),
            )
        };
        Paragraph::new(Line::from(hint)).render(layout[3], buf);
    }
}
