use unblur_logging::{unblur_debug, unblur_warn};

use crate::{AppState, Effect, Msg, Stage};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileAccepted(image) => {
            // The in-flight request belongs to the staged image; a new file
            // may only replace it once the attempt settles or is reset.
            if state.stage() == Stage::Processing {
                unblur_warn!(
                    "Ignoring {} while an enhancement is in flight",
                    image.name()
                );
                return (state, Vec::new());
            }
            state.stage_image(image);
            Vec::new()
        }
        Msg::FileRejected(err) => {
            unblur_debug!("Rejected file: {}", err);
            state.set_notice(err.user_message());
            Vec::new()
        }
        Msg::EnhanceRequested => match state.begin_processing() {
            Some(job) => vec![Effect::SubmitEnhancement(job)],
            None => {
                unblur_debug!("Enhance requested in {:?}; ignored", state.stage());
                Vec::new()
            }
        },
        Msg::EnhancementSettled {
            generation,
            outcome,
        } => {
            state.settle(generation, outcome);
            Vec::new()
        }
        Msg::ResetClicked => {
            state.reset();
            Vec::new()
        }
        Msg::DownloadRequested => match (state.staged(), state.result()) {
            (Some(image), Some(result)) => vec![Effect::SaveResult {
                source_name: image.name().to_string(),
                bytes: result.bytes().clone(),
            }],
            _ => Vec::new(),
        },
        Msg::NoticeDismissed => {
            state.clear_notice();
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
