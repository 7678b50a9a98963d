//! Trivia quiz module: the reference implementation of the module contract.
//!
//! Three phases — intro, play, summary — over a question sequence served by
//! an in-memory content provider. The runtime integration tests drive this
//! module end to end; it is also the template to copy when writing a new
//! party game.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use parlor_core::{
    ActionKind, ContentProvider, GameConfig, ModuleId, MultiplayerCaps, PhaseDescriptor, PhaseId,
    Progress, ScreenId, ScreenRef, VecContentProvider,
};
use parlor_runtime::{GameModule, ModuleContext, PhaseController};

mod controllers;

use controllers::{IntroController, PlayController, SummaryController};

/// One quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub answer: String,
}

impl Question {
    pub fn new(prompt: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            answer: answer.into(),
        }
    }
}

pub(crate) type SharedProvider = Arc<Mutex<VecContentProvider<Question>>>;

/// The trivia game module.
pub struct TriviaModule {
    questions: Vec<Question>,
    provider: SharedProvider,
}

impl TriviaModule {
    pub fn new(questions: Vec<Question>) -> Self {
        let provider = Arc::new(Mutex::new(VecContentProvider::new(questions.clone())));
        Self {
            questions,
            provider,
        }
    }

    /// Position within the question sequence.
    pub fn progress(&self) -> Progress {
        self.provider.lock().expect("provider lock poisoned").progress()
    }

    /// The canonical three-phase config for this module.
    pub fn config() -> GameConfig {
        GameConfig {
            id: "trivia".into(),
            title: "Pub Trivia".into(),
            version: "0.1.0".into(),
            min_players: 1,
            max_players: 8,
            phases: vec![
                PhaseDescriptor::new("intro", "intro-screen", vec![ActionKind::Advance]),
                PhaseDescriptor::new(
                    "play",
                    "play-screen",
                    vec![ActionKind::Advance, ActionKind::Back],
                ),
                PhaseDescriptor::new(
                    "summary",
                    "summary-screen",
                    vec![ActionKind::Restart, ActionKind::Advance],
                ),
            ],
            screens: HashMap::from([
                (ScreenId::from("intro-screen"), ScreenRef::from("IntroScreen")),
                (ScreenId::from("play-screen"), ScreenRef::from("QuestionScreen")),
                (
                    ScreenId::from("summary-screen"),
                    ScreenRef::from("SummaryScreen"),
                ),
            ]),
            content: None,
            features: HashMap::new(),
            multiplayer: MultiplayerCaps::default(),
        }
    }
}

impl Default for TriviaModule {
    fn default() -> Self {
        Self::new(vec![
            Question::new("Which planet is closest to the sun?", "Mercury"),
            Question::new("How many strings does a violin have?", "Four"),
            Question::new("What year did the Berlin Wall fall?", "1989"),
        ])
    }
}

#[async_trait]
impl GameModule for TriviaModule {
    fn id(&self) -> ModuleId {
        "trivia".into()
    }

    async fn init(&self, ctx: &ModuleContext) -> anyhow::Result<()> {
        // An inline content source in the config overrides the built-in
        // question set; anything else keeps the questions the module was
        // constructed with.
        let questions = match ctx.config().content.as_ref() {
            Some(source) if source.kind == "inline" => {
                serde_json::from_value::<Vec<Question>>(source.params["questions"].clone())?
            }
            _ => self.questions.clone(),
        };

        if questions.is_empty() {
            anyhow::bail!("trivia module needs at least one question");
        }

        tracing::info!(count = questions.len(), "trivia question set loaded");
        *self.provider.lock().expect("provider lock poisoned") =
            VecContentProvider::new(questions);
        Ok(())
    }

    fn screens(&self) -> HashMap<ScreenId, ScreenRef> {
        Self::config().screens
    }

    fn phase_controllers(&self) -> HashMap<PhaseId, Arc<dyn PhaseController>> {
        HashMap::from([
            (
                PhaseId::from("intro"),
                Arc::new(IntroController) as Arc<dyn PhaseController>,
            ),
            (
                PhaseId::from("play"),
                Arc::new(PlayController::new(Arc::clone(&self.provider))) as Arc<dyn PhaseController>,
            ),
            (
                PhaseId::from("summary"),
                Arc::new(SummaryController::new(Arc::clone(&self.provider)))
                    as Arc<dyn PhaseController>,
            ),
        ])
    }

    fn translations(&self) -> Option<HashMap<String, HashMap<String, String>>> {
        Some(HashMap::from([(
            "en".to_owned(),
            HashMap::from([
                ("intro.title".to_owned(), "Pub Trivia".to_owned()),
                ("summary.title".to_owned(), "Final Scores".to_owned()),
            ]),
        )]))
    }

    fn store_namespace(&self) -> Option<String> {
        Some("trivia".to_owned())
    }
}
