use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::capture::command::CommandCapture;
use crate::capture::{SpeechCaptureAdapter, UnavailableCapture};
use crate::config::Config;
use crate::interview::feedback::{FeedbackGenerator, StubFeedbackGenerator};
use crate::interview::flow::{AppStateMachine, InterviewStage};
use crate::interview::practice::Advance;
use crate::interview::setup::SetupStep;
use crate::quiz::catalog::Catalog;
use crate::quiz::persistence::{ConfiguredAuth, DocumentStore, ResultPersistence};
use crate::quiz::result::TestResult;
use crate::quiz::test_session::PracticeTest;
use crate::store::documents::FileDocumentStore;
use crate::store::json_store::JsonStore;
use crate::ui::components::menu::{Menu, MenuAction};
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Home,
    /// Setup, practice, loading or feedback; the interview stage decides which.
    Interview,
    Test,
    TestResult,
}

pub struct App {
    pub screen: AppScreen,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub interview: AppStateMachine,
    pub test: Option<PracticeTest>,
    /// Open text editor: job title, typed interview answer, or test answer.
    pub input: Option<LineInput>,
    pub last_result: Option<TestResult>,
    /// Inline error for the current screen.
    pub message: Option<String>,
    pub feedback_scroll: u16,
    pub spinner: usize,
    pub should_quit: bool,
    capture: Box<dyn SpeechCaptureAdapter>,
    persistence: ResultPersistence,
    catalog: Catalog,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config, theme: &'static Theme, catalog: Catalog) -> Result<Self> {
        let persistence = build_persistence(&config, JsonStore::new()?);
        let capture = build_capture(&config);
        let generator: Arc<dyn FeedbackGenerator> = Arc::new(StubFeedbackGenerator::new(
            Duration::from_millis(config.feedback_delay_ms),
        ));
        Ok(Self::from_parts(
            config,
            theme,
            catalog,
            persistence,
            capture,
            generator,
        ))
    }

    pub fn from_parts(
        config: Config,
        theme: &'static Theme,
        catalog: Catalog,
        persistence: ResultPersistence,
        capture: Box<dyn SpeechCaptureAdapter>,
        generator: Arc<dyn FeedbackGenerator>,
    ) -> Self {
        let grace = Duration::from_millis(config.capture_grace_ms);
        let last_result = persistence.last_local();
        let mut menu = Menu::new(theme);
        menu.last_result = last_result.clone();

        Self {
            screen: AppScreen::Home,
            menu,
            theme,
            config,
            interview: AppStateMachine::new(generator, grace),
            test: None,
            input: None,
            last_result,
            message: None,
            feedback_scroll: 0,
            spinner: 0,
            should_quit: false,
            capture,
            persistence,
            catalog,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn activate(&mut self, action: MenuAction) {
        match action {
            MenuAction::StartInterview => self.start_interview(),
            MenuAction::PracticeTest => self.start_test(),
            MenuAction::Quit => self.should_quit = true,
        }
    }

    pub fn signed_in_user(&self) -> Option<String> {
        self.persistence.current_user().map(|p| p.uid)
    }

    // --- interview ---

    pub fn start_interview(&mut self) {
        if let Err(e) = self.interview.start() {
            warn!("{e}");
            return;
        }
        self.input = None;
        self.message = None;
        self.screen = AppScreen::Interview;
    }

    /// Select the highlighted row on list steps, then try to move on.
    pub fn setup_confirm(&mut self) {
        if let Some(wizard) = self.interview.setup_mut() {
            match wizard.step() {
                SetupStep::JobTitle => {
                    if let Some(ref input) = self.input {
                        wizard.set_job_title(input.value());
                    }
                }
                _ => wizard.select_cursor(),
            }
        }
        if let Err(e) = self.interview.setup_next() {
            warn!("{e}");
        }
        self.sync_setup_input();
    }

    pub fn setup_back(&mut self) {
        if let Err(e) = self.interview.setup_back() {
            warn!("{e}");
        }
        if self.interview.stage() == InterviewStage::Hero {
            self.screen = AppScreen::Home;
        }
        self.sync_setup_input();
    }

    /// Mirror the job title editor into the wizard after each keystroke.
    pub fn setup_title_changed(&mut self) {
        let title = self.input.as_ref().map(|i| i.value().to_string());
        if let (Some(wizard), Some(title)) = (self.interview.setup_mut(), title) {
            wizard.set_job_title(&title);
        }
    }

    fn sync_setup_input(&mut self) {
        self.input = match self.interview.setup() {
            Some(wizard) if wizard.step() == SetupStep::JobTitle => {
                Some(LineInput::new(&wizard.job_title))
            }
            _ => None,
        };
    }

    pub fn toggle_recording(&mut self) {
        if self.input.is_some() {
            return;
        }
        let capture = self.capture.as_mut();
        if let Some(session) = self.interview.practice_mut() {
            if session.is_recording() {
                session.stop_recording(capture, Instant::now());
            } else {
                session.start_recording(capture);
            }
        }
    }

    /// Open the manual answer editor, seeded with the transcript so far.
    pub fn begin_typing(&mut self) {
        if let Some(session) = self.interview.practice() {
            if !session.is_recording() && !session.is_processing() {
                self.input = Some(LineInput::new(session.transcript()));
            }
        }
    }

    pub fn finish_typing(&mut self, keep: bool) {
        let Some(input) = self.input.take() else {
            return;
        };
        if keep {
            if let Some(session) = self.interview.practice_mut() {
                session.edit_transcript(input.value());
            }
        }
    }

    pub fn next_question(&mut self) {
        if self.input.is_some() {
            return;
        }
        match self.interview.advance_practice() {
            Ok(Advance::Blocked) => {
                if let Some(session) = self.interview.practice_mut() {
                    session.status = Some("Wait for the recording to finish first.".to_string());
                }
            }
            Ok(Advance::Next) => {}
            Ok(Advance::Finished(answers)) => {
                info!("generating feedback for {} answers", answers.len());
                self.spinner = 0;
            }
            Err(e) => warn!("{e}"),
        }
    }

    pub fn retry_feedback(&mut self) {
        if self.interview.error.is_none() {
            return;
        }
        if let Err(e) = self.interview.retry_feedback() {
            warn!("{e}");
        }
    }

    /// Leave the interview for the landing screen.
    pub fn restart_interview(&mut self) {
        match self.interview.restart() {
            Ok(()) => {
                self.input = None;
                self.feedback_scroll = 0;
                self.screen = AppScreen::Home;
            }
            Err(e) => warn!("{e}"),
        }
    }

    pub fn tick(&mut self) {
        self.spinner = self.spinner.wrapping_add(1);
        if let Some(session) = self.interview.practice_mut() {
            session.pump(Instant::now());
        }
        if self.interview.poll_feedback() {
            self.feedback_scroll = 0;
        }
    }

    // --- practice test ---

    pub fn start_test(&mut self) {
        if self.catalog.is_empty() {
            self.message = Some("No practice questions are available.".to_string());
            return;
        }
        let test = PracticeTest::new(&self.catalog, self.config.question_count, &mut self.rng);
        info!("practice test started: {} questions", test.total());
        self.test = Some(test);
        self.input = None;
        self.message = None;
        self.screen = AppScreen::Test;
    }

    pub fn edit_answer(&mut self) {
        if let Some(ref test) = self.test {
            self.input = Some(LineInput::new(test.answer_text(test.selected)));
        }
    }

    pub fn commit_answer(&mut self, keep: bool) {
        let Some(input) = self.input.take() else {
            return;
        };
        if keep {
            if let Some(ref mut test) = self.test {
                let index = test.selected;
                test.answer(index, input.value());
            }
        }
    }

    /// Record the attempt remotely, then locally, then show the result.
    /// A failed remote write keeps the user on the test with the error shown.
    pub fn submit_test(&mut self) {
        let Some(ref test) = self.test else {
            return;
        };
        match test.submit(&self.persistence) {
            Ok(result) => {
                // Already logged; the result view is still worth showing.
                let _ = self.persistence.save_local(&result);
                self.menu.last_result = Some(result.clone());
                self.last_result = Some(result);
                self.test = None;
                self.message = None;
                self.screen = AppScreen::TestResult;
            }
            Err(e) => {
                warn!("submit failed: {e}");
                self.message = Some(e.to_string());
            }
        }
    }

    pub fn go_home(&mut self) {
        self.test = None;
        self.input = None;
        self.message = None;
        self.screen = AppScreen::Home;
    }
}

fn build_capture(config: &Config) -> Box<dyn SpeechCaptureAdapter> {
    if config.speech_command.is_empty() {
        info!("no speech_command configured; answers must be typed");
        Box::new(UnavailableCapture)
    } else {
        Box::new(CommandCapture::new(config.speech_command.clone()))
    }
}

pub fn build_persistence(config: &Config, local: JsonStore) -> ResultPersistence {
    let auth = ConfiguredAuth::new(config.user_id.clone(), config.id_token.clone());
    let documents = remote_store(config)
        .unwrap_or_else(|| file_documents(local.base_dir()));
    ResultPersistence::new(Box::new(auth), documents, local)
}

fn file_documents(data_dir: &Path) -> Box<dyn DocumentStore> {
    Box::new(FileDocumentStore::new(data_dir.join("documents")))
}

#[cfg(feature = "network")]
fn remote_store(config: &Config) -> Option<Box<dyn DocumentStore>> {
    use crate::store::firestore::FirestoreStore;

    if config.remote_backend != "firestore" {
        return None;
    }
    let Some(project) = config.firestore_project.as_deref() else {
        warn!("firestore backend selected without firestore_project; using local documents");
        return None;
    };
    match FirestoreStore::new(project) {
        Ok(store) => Some(Box::new(store)),
        Err(e) => {
            warn!("could not create Firestore client: {e:#}; using local documents");
            None
        }
    }
}

#[cfg(not(feature = "network"))]
fn remote_store(config: &Config) -> Option<Box<dyn DocumentStore>> {
    if config.remote_backend == "firestore" {
        warn!("built without network support; using local documents");
    }
    None
}
