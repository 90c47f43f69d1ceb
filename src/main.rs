use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{info, warn};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use voice2career::app::{App, AppScreen};
use voice2career::config::Config;
use voice2career::event::{AppEvent, EventHandler};
use voice2career::interview::flow::InterviewStage;
use voice2career::quiz::catalog::Catalog;
use voice2career::store::json_store::default_data_dir;
use voice2career::ui::components::feedback_view::{FeedbackView, LoadingView};
use voice2career::ui::components::practice_view::PracticeView;
use voice2career::ui::components::result_view::ResultView;
use voice2career::ui::components::setup_view::SetupView;
use voice2career::ui::components::test_view::TestView;
use voice2career::ui::layout::{ScreenLayout, centered_rect, pack_hint_lines};
use voice2career::ui::line_input::{InputResult, LineInput};
use voice2career::ui::theme::Theme;

#[derive(Parser)]
#[command(
    name = "voice2career",
    version,
    about = "Terminal interview coach: spoken mock interviews and quick practice tests"
)]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Practice test catalog (JSON)")]
    catalog: Option<PathBuf>,

    #[arg(short, long, help = "Signed-in user id for saving test attempts")]
    user: Option<String>,

    #[arg(short, long, help = "Number of questions per practice test")]
    questions: Option<usize>,

    #[arg(long, help = "Open a practice test immediately")]
    test: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("ignoring unreadable config: {e:#}");
        Config::default()
    });
    // First run: leave an editable file with the defaults behind.
    if !Config::config_path().exists() {
        if let Err(e) = config.save() {
            eprintln!("could not write default config: {e:#}");
        }
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(path) = cli.catalog {
        config.catalog_path = Some(path.to_string_lossy().into_owned());
    }
    if let Some(user) = cli.user {
        config.user_id = Some(user);
    }
    if let Some(n) = cli.questions {
        config.question_count = n;
    }
    config.normalize();

    init_logging(&config.log_level);
    info!("voice2career starting");

    let catalog = load_catalog(&config);
    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        warn!(
            "unknown theme {:?}; using default (available: {})",
            config.theme,
            Theme::available_themes().join(", ")
        );
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));

    let mut app = App::new(config, theme, catalog)?;
    if cli.test {
        app.start_test();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }
    info!("voice2career exiting");

    Ok(())
}

/// The terminal belongs to the UI, so logs go to a file in the data directory.
fn init_logging(level: &str) {
    let dir = default_data_dir();
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("voice2career.log"))
    else {
        return;
    };
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init();
}

fn load_catalog(config: &Config) -> Catalog {
    let Some(ref path) = config.catalog_path else {
        return Catalog::bundled();
    };
    match Catalog::load(path.as_ref()) {
        Ok(catalog) => {
            info!("loaded {} questions from {path}", catalog.len());
            catalog
        }
        Err(e) => {
            warn!("could not read catalog {path}: {e:#}; using bundled questions");
            Catalog::bundled()
        }
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Paste(text) => handle_paste(app, &text),
            AppEvent::Tick => app.tick(),
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Home => handle_home_key(app, key),
        AppScreen::Interview => match app.interview.stage() {
            InterviewStage::Hero => app.screen = AppScreen::Home,
            InterviewStage::Setup => handle_setup_key(app, key),
            InterviewStage::Practice => handle_practice_key(app, key),
            InterviewStage::Loading => handle_loading_key(app, key),
            InterviewStage::Feedback => handle_feedback_key(app, key),
        },
        AppScreen::Test => handle_test_key(app, key),
        AppScreen::TestResult => handle_result_key(app, key),
    }
}

fn handle_paste(app: &mut App, text: &str) {
    if let Some(ref mut input) = app.input {
        input.insert_str(text);
        if app.interview.stage() == InterviewStage::Setup {
            app.setup_title_changed();
        }
    }
}

/// Feed a key to the open editor. Returns None when no editor is open.
fn edit_input(app: &mut App, key: KeyEvent) -> Option<InputResult> {
    app.input.as_mut().map(|input: &mut LineInput| input.handle(key))
}

fn handle_home_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('1') => app.start_interview(),
        KeyCode::Char('2') => app.start_test(),
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => {
            let action = app.menu.selected_action();
            app.activate(action);
        }
        _ => {}
    }
}

fn handle_setup_key(app: &mut App, key: KeyEvent) {
    match edit_input(app, key) {
        Some(InputResult::Submit) => app.setup_confirm(),
        Some(InputResult::Cancel) => app.setup_back(),
        Some(InputResult::Continue) => app.setup_title_changed(),
        None => match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(wizard) = app.interview.setup_mut() {
                    wizard.cursor_prev();
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(wizard) = app.interview.setup_mut() {
                    wizard.cursor_next();
                }
            }
            KeyCode::Char(' ') => {
                if let Some(wizard) = app.interview.setup_mut() {
                    wizard.select_cursor();
                }
            }
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.setup_confirm(),
            KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') | KeyCode::Backspace => {
                app.setup_back()
            }
            _ => {}
        },
    }
}

fn handle_practice_key(app: &mut App, key: KeyEvent) {
    match edit_input(app, key) {
        Some(InputResult::Submit) => app.finish_typing(true),
        Some(InputResult::Cancel) => app.finish_typing(false),
        Some(InputResult::Continue) => {}
        None => match key.code {
            KeyCode::Char(' ') | KeyCode::Char('r') => app.toggle_recording(),
            KeyCode::Char('t') => app.begin_typing(),
            KeyCode::Enter | KeyCode::Char('n') => app.next_question(),
            _ => {}
        },
    }
}

fn handle_loading_key(app: &mut App, key: KeyEvent) {
    if app.interview.error.is_none() {
        return;
    }
    match key.code {
        KeyCode::Char('r') => app.retry_feedback(),
        KeyCode::Char('h') | KeyCode::Esc => app.restart_interview(),
        _ => {}
    }
}

fn handle_feedback_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.feedback_scroll = app.feedback_scroll.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.feedback_scroll = app.feedback_scroll.saturating_add(1);
        }
        KeyCode::Enter | KeyCode::Char('h') | KeyCode::Esc => app.restart_interview(),
        _ => {}
    }
}

fn handle_test_key(app: &mut App, key: KeyEvent) {
    match edit_input(app, key) {
        Some(InputResult::Submit) => app.commit_answer(true),
        Some(InputResult::Cancel) => app.commit_answer(false),
        Some(InputResult::Continue) => {}
        None => match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(ref mut test) = app.test {
                    test.select_prev();
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(ref mut test) = app.test {
                    test.select_next();
                }
            }
            KeyCode::Enter | KeyCode::Char('e') => app.edit_answer(),
            KeyCode::Char('s') => app.submit_test(),
            KeyCode::Esc | KeyCode::Char('q') => app.go_home(),
            _ => {}
        },
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.start_test(),
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => app.go_home(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let (title, hints) = screen_chrome(app);
    let hint_lines = pack_hint_lines(&hints, area.width as usize);
    let layout = ScreenLayout::new(area, hint_lines.len() as u16);

    let header = Paragraph::new(Line::from(Span::styled(
        format!(" voice2career | {title}"),
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    match app.screen {
        AppScreen::Home => render_home(frame, app, layout.main),
        AppScreen::Interview => render_interview(frame, app, layout.main),
        AppScreen::Test => {
            if let Some(ref test) = app.test {
                let user = app.signed_in_user();
                let view = TestView::new(test, app.input.as_ref(), app.theme)
                    .user(user.as_deref())
                    .error(app.message.as_deref());
                frame.render_widget(view, layout.main);
            }
        }
        AppScreen::TestResult => {
            if let Some(ref result) = app.last_result {
                let centered = centered_rect(60, 70, layout.main);
                frame.render_widget(ResultView::new(result, app.theme), centered);
            }
        }
    }

    let footer: Vec<Line> = hint_lines
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.muted()))))
        .collect();
    frame.render_widget(Paragraph::new(footer), layout.footer);
}

fn render_home(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let menu_area = centered_rect(50, 80, area);
    frame.render_widget(&app.menu, menu_area);
    if let Some(ref message) = app.message {
        let line = Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(app.theme.colors.error()),
        ));
        let bottom = ratatui::layout::Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1);
        frame.render_widget(Paragraph::new(line), bottom);
    }
}

fn render_interview(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let centered = centered_rect(70, 85, area);
    match app.interview.stage() {
        InterviewStage::Hero => {}
        InterviewStage::Setup => {
            if let Some(wizard) = app.interview.setup() {
                let empty = LineInput::default();
                let input = app.input.as_ref().unwrap_or(&empty);
                frame.render_widget(SetupView::new(wizard, input, app.theme), centered);
            }
        }
        InterviewStage::Practice => {
            if let Some(session) = app.interview.practice() {
                let view = PracticeView::new(session, app.input.as_ref(), app.theme);
                frame.render_widget(view, centered);
            }
        }
        InterviewStage::Loading => {
            let loading = LoadingView::new(app.interview.error.as_deref(), app.spinner, app.theme);
            frame.render_widget(loading, centered_rect(50, 30, area));
        }
        InterviewStage::Feedback => {
            if let Some(feedback) = app.interview.feedback() {
                let view = FeedbackView::new(
                    feedback,
                    app.interview.config(),
                    app.feedback_scroll,
                    app.theme,
                );
                frame.render_widget(view, centered);
            }
        }
    }
}

/// Header title and footer key hints for the current screen.
fn screen_chrome(app: &App) -> (&'static str, Vec<&'static str>) {
    match app.screen {
        AppScreen::Home => (
            "Home",
            vec!["[1] Interview", "[2] Practice test", "[j/k] Move", "[Enter] Select", "[q] Quit"],
        ),
        AppScreen::Interview => match app.interview.stage() {
            InterviewStage::Hero => ("Home", vec![]),
            InterviewStage::Setup if app.input.is_some() => {
                ("Setup", vec!["[Enter] Start interview", "[Esc] Back"])
            }
            InterviewStage::Setup => (
                "Setup",
                vec!["[j/k] Move", "[Space] Select", "[Enter] Continue", "[Esc] Back"],
            ),
            InterviewStage::Practice if app.input.is_some() => {
                ("Practice", vec!["[Enter] Keep answer", "[Esc] Discard", "[Ctrl+U] Clear"])
            }
            InterviewStage::Practice => (
                "Practice",
                vec!["[Space] Record/stop", "[t] Type answer", "[Enter] Next question", "[Ctrl+C] Quit"],
            ),
            InterviewStage::Loading if app.interview.error.is_some() => {
                ("Feedback", vec!["[r] Retry", "[h] Home"])
            }
            InterviewStage::Loading => ("Feedback", vec!["[Ctrl+C] Quit"]),
            InterviewStage::Feedback => ("Feedback", vec!["[j/k] Scroll", "[Enter] Start over"]),
        },
        AppScreen::Test if app.input.is_some() => {
            ("Practice test", vec!["[Enter] Save answer", "[Esc] Discard"])
        }
        AppScreen::Test => (
            "Practice test",
            vec!["[j/k] Move", "[Enter] Answer", "[s] Submit", "[Esc] Menu"],
        ),
        AppScreen::TestResult => ("Results", vec!["[r] New test", "[q] Menu"]),
    }
}
