use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use unblur_core::{
    update, AppState, AppViewModel, CandidateFile, Msg, OutcomeView, Stage, UploadSurface,
};
use unblur_engine::{EngineHandle, EnhanceSettings};
use unblur_logging::{set_session_generation, unblur_debug, unblur_warn};

use crate::effects::{map_event, EffectRunner};
use crate::media;

const TICK: Duration = Duration::from_millis(75);

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub enhanced: usize,
    pub rejected: usize,
    pub failed: usize,
    /// Enhanced by the service but not written to disk.
    pub unsaved: usize,
    pub saved: Vec<PathBuf>,
}

impl RunSummary {
    pub fn shortfall(&self) -> usize {
        self.rejected + self.failed + self.unsaved
    }
}

/// Enhances every input in turn within one session, saving each result.
pub fn run(inputs: &[PathBuf], output_dir: &Path, settings: EnhanceSettings) -> Result<RunSummary> {
    let format = settings.output;
    let engine = EngineHandle::new(settings).context("failed to start enhancement engine")?;
    let mut app = App::new(EffectRunner::new(engine, output_dir.to_path_buf(), format));
    Ok(run_inputs(&mut app, inputs))
}

fn run_inputs(app: &mut App, inputs: &[PathBuf]) -> RunSummary {
    let mut summary = RunSummary::default();
    for path in inputs {
        let candidate = match media::candidate_from_path(path) {
            Ok(candidate) => candidate,
            Err(err) => {
                unblur_warn!("{:#}", err);
                summary.rejected += 1;
                continue;
            }
        };
        let unsaved_before = app.runner.unsaved().len();
        match app.process(candidate) {
            Some(Stage::Completed) if app.runner.unsaved().len() > unsaved_before => {
                summary.unsaved += 1
            }
            Some(Stage::Completed) => summary.enhanced += 1,
            Some(_) => summary.failed += 1,
            None => summary.rejected += 1,
        }
    }
    app.dispatch(Msg::ResetClicked);
    summary.saved = app.runner.saved().to_vec();
    summary
}

/// Owns the session state and routes messages through `update`.
pub struct App {
    state: AppState,
    surface: UploadSurface,
    runner: EffectRunner,
}

impl App {
    pub fn new(runner: EffectRunner) -> Self {
        let state = AppState::new();
        let surface = UploadSurface::new(state.registry());
        Self {
            state,
            surface,
            runner,
        }
    }

    /// Stages, enhances and downloads one file. Returns the stage the attempt
    /// settled in, or `None` if the file never got staged.
    pub fn process(&mut self, candidate: CandidateFile) -> Option<Stage> {
        let msg = self.surface.pick_files([candidate])?;
        let accepted = matches!(msg, Msg::FileAccepted(_));
        self.dispatch(msg);
        if !accepted || self.state.stage() != Stage::Staged {
            return None;
        }

        self.dispatch(Msg::EnhanceRequested);
        self.wait_for_settlement();

        let stage = self.state.stage();
        if stage == Stage::Completed {
            self.dispatch(Msg::DownloadRequested);
        }
        Some(stage)
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        set_session_generation(self.state.generation());

        for follow_up in self.runner.run(effects) {
            self.dispatch(follow_up);
        }

        if self.state.consume_dirty() {
            render(&self.state.view());
        }
    }

    fn wait_for_settlement(&mut self) {
        while self.state.in_flight().is_some() {
            match self.runner.engine().recv_timeout(TICK) {
                Some(event) => self.dispatch(map_event(event)),
                None => self.dispatch(Msg::Tick),
            }
        }
    }

    #[cfg(test)]
    fn state(&self) -> &AppState {
        &self.state
    }

    #[cfg(test)]
    fn runner(&self) -> &EffectRunner {
        &self.runner
    }
}

fn render(view: &AppViewModel) {
    unblur_debug!("Render {:?}", view.stage);
    if let Some(notice) = &view.notice {
        println!("rejected: {notice}");
    }
    let name = view.staged.as_ref().map(|s| s.name.as_str()).unwrap_or("");
    match (&view.stage, &view.outcome) {
        (Stage::Staged, _) => {
            let byte_len = view.staged.as_ref().map(|s| s.byte_len).unwrap_or(0);
            println!("staged: {name} ({})", human_bytes(byte_len));
        }
        (Stage::Processing, _) => println!("enhancing: {name} ..."),
        (Stage::Completed, Some(OutcomeView::Success { byte_len, .. })) => {
            println!("enhanced: {name} -> {}", human_bytes(*byte_len));
        }
        (Stage::Failed, Some(OutcomeView::Failure { message, .. })) => {
            println!("failed: {name}: {message}");
        }
        _ => {}
    }
}

fn human_bytes(bytes: u64) -> String {
    const MIB: f64 = 1024.0 * 1024.0;
    if bytes as f64 >= MIB {
        format!("{:.1} MB", bytes as f64 / MIB)
    } else {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    }
}
