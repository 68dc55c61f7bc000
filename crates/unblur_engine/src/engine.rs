use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use thiserror::Error;
use unblur_logging::{set_session_generation, unblur_debug, unblur_info};

use crate::enhance::{EnhanceRequest, Enhancer, ReqwestEnhancer};
use crate::{EngineEvent, EnhanceSettings, Generation};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),
    #[error("failed to spawn engine thread: {0}")]
    Spawn(#[source] io::Error),
    #[error("engine thread has stopped")]
    Closed,
}

enum EngineCommand {
    Submit {
        generation: Generation,
        request: EnhanceRequest,
    },
}

/// Runs enhancement requests off the caller's thread.
///
/// Submissions go in over a command channel; each settles into exactly one
/// `EngineEvent::Settled` tagged with the generation it was submitted under.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: EnhanceSettings) -> Result<Self, EngineError> {
        Self::with_enhancer(Arc::new(ReqwestEnhancer::new(settings)))
    }

    pub fn with_enhancer(enhancer: Arc<dyn Enhancer>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new().map_err(EngineError::Runtime)?;

        thread::Builder::new()
            .name("unblur-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let enhancer = enhancer.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(enhancer.as_ref(), command, event_tx).await;
                    });
                }
                unblur_debug!("Engine command channel closed");
            })
            .map_err(EngineError::Spawn)?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit(&self, generation: Generation, request: EnhanceRequest) -> Result<(), EngineError> {
        self.cmd_tx
            .send(EngineCommand::Submit {
                generation,
                request,
            })
            .map_err(|_| EngineError::Closed)
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    enhancer: &dyn Enhancer,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Submit {
            generation,
            request,
        } => {
            // Worker threads are shared; tag this task's log lines.
            set_session_generation(generation);
            unblur_info!(
                "Submitting {} ({} bytes) as generation {}",
                request.file_name,
                request.bytes.len(),
                generation
            );
            let result = enhancer.enhance(request).await;
            set_session_generation(generation);
            unblur_debug!("Settled, ok={}", result.is_ok());
            let _ = event_tx.send(EngineEvent::Settled { generation, result });
        }
    }
}
