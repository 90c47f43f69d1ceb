use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::quiz::result::TestResult;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    StartInterview,
    PracticeTest,
    Quit,
}

pub struct MenuItem {
    pub key: String,
    pub label: String,
    pub description: String,
    pub action: MenuAction,
}

/// Landing screen: pitch line, entry points, and the last recorded test.
pub struct Menu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub last_result: Option<TestResult>,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            items: vec![
                MenuItem {
                    key: "1".to_string(),
                    label: "Start Interview".to_string(),
                    description: "Answer spoken questions and get coaching feedback".to_string(),
                    action: MenuAction::StartInterview,
                },
                MenuItem {
                    key: "2".to_string(),
                    label: "Practice Test".to_string(),
                    description: "Written answers to a random set of field questions".to_string(),
                    action: MenuAction::PracticeTest,
                },
                MenuItem {
                    key: "q".to_string(),
                    label: "Quit".to_string(),
                    description: "Leave voice2career".to_string(),
                    action: MenuAction::Quit,
                },
            ],
            selected: 0,
            last_result: None,
            theme,
        }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }

    pub fn selected_action(&self) -> MenuAction {
        self.items
            .get(self.selected)
            .map(|item| item.action)
            .unwrap_or(MenuAction::Quit)
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "voice2career",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Practice interviews out loud, get feedback, build confidence",
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
        ];

        let title = Paragraph::new(title_lines).alignment(Alignment::Center);
        title.render(layout[0], buf);

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.items
                    .iter()
                    .map(|_| Constraint::Length(3))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };

            let label_text = format!(" {indicator} [{key}] {label}", key = item.key, label = item.label);
            let desc_text = format!("     {}", item.description);

            let lines = vec![
                Line::from(Span::styled(
                    &*label_text,
                    Style::default()
                        .fg(if is_selected {
                            colors.accent()
                        } else {
                            colors.fg()
                        })
                        .add_modifier(if is_selected {
                            Modifier::BOLD
                        } else {
                            Modifier::empty()
                        }),
                )),
                Line::from(Span::styled(&*desc_text, Style::default().fg(colors.muted()))),
            ];

            let p = Paragraph::new(lines);
            if i < menu_layout.len() {
                p.render(menu_layout[i], buf);
            }
        }

        if let Some(ref result) = self.last_result {
            let summary = format!(
                "Last test: {}/{} attempted on {}",
                result.attempted, result.total, result.date
            );
            Paragraph::new(Line::from(Span::styled(
                summary,
                Style::default().fg(colors.muted()),
            )))
            .alignment(Alignment::Center)
            .render(layout[3], buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::buffer_text;

    #[test]
    fn selection_wraps() {
        let theme = Theme::default();
        let mut menu = Menu::new(&theme);
        menu.prev();
        assert_eq!(menu.selected_action(), MenuAction::Quit);
        menu.next();
        assert_eq!(menu.selected_action(), MenuAction::StartInterview);
        menu.next();
        assert_eq!(menu.selected_action(), MenuAction::PracticeTest);
    }

    #[test]
    fn shows_last_result_when_known() {
        let theme = Theme::default();
        let mut menu = Menu::new(&theme);
        menu.last_result = Some(TestResult {
            total: 10,
            attempted: 6,
            feedback: String::new(),
            date: "3/4/2026, 9:05:01 AM".to_string(),
        });
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        (&menu).render(area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("Start Interview"));
        assert!(text.contains("Last test: 6/10 attempted"));
    }
}
