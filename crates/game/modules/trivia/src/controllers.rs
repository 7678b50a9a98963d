//! Phase controllers for the trivia module.

use async_trait::async_trait;

use parlor_core::{ActionKind, ContentProvider, GameAction, TransitionResult};
use parlor_runtime::{ModuleContext, PhaseController};

use crate::SharedProvider;

/// Intro phase: a single ADVANCE starts the quiz.
pub struct IntroController;

impl PhaseController for IntroController {
    fn transition(&self, action: &GameAction, _ctx: &ModuleContext) -> TransitionResult {
        match action.kind {
            ActionKind::Advance => TransitionResult::goto("play"),
            _ => TransitionResult::Stay,
        }
    }
}

/// Play phase: ADVANCE steps through the question sequence, BACK returns to
/// the intro. The quiz moves to the summary when the provider runs out.
pub struct PlayController {
    provider: SharedProvider,
}

impl PlayController {
    pub fn new(provider: SharedProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl PhaseController for PlayController {
    async fn on_enter(&self, _ctx: &ModuleContext) -> anyhow::Result<()> {
        let provider = self.provider.lock().expect("provider lock poisoned");
        if let Some(question) = provider.current() {
            tracing::debug!(prompt = %question.prompt, "presenting question");
        }
        Ok(())
    }

    fn transition(&self, action: &GameAction, _ctx: &ModuleContext) -> TransitionResult {
        match action.kind {
            ActionKind::Advance => {
                let mut provider = self.provider.lock().expect("provider lock poisoned");
                if provider.next().is_some() {
                    TransitionResult::Stay
                } else {
                    TransitionResult::goto("summary")
                }
            }
            ActionKind::Back => TransitionResult::goto("intro"),
            _ => TransitionResult::Stay,
        }
    }
}

/// Summary phase: RESTART rewinds the question set and returns to the intro;
/// ADVANCE ends the run.
pub struct SummaryController {
    provider: SharedProvider,
}

impl SummaryController {
    pub fn new(provider: SharedProvider) -> Self {
        Self { provider }
    }
}

impl PhaseController for SummaryController {
    fn transition(&self, action: &GameAction, _ctx: &ModuleContext) -> TransitionResult {
        match action.kind {
            ActionKind::Restart => {
                self.provider.lock().expect("provider lock poisoned").reset();
                TransitionResult::goto("intro")
            }
            ActionKind::Advance => TransitionResult::Complete,
            _ => TransitionResult::Stay,
        }
    }
}
