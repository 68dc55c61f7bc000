use std::path::PathBuf;

use unblur_core::{EnhancementOutcome, ErrorKind, Effect, Failure, Msg};
use unblur_engine::{
    result_filename, EngineEvent, EngineHandle, EnhanceRequest, FailureKind,
    OutputFormat, ResultWriter,
};
use unblur_logging::{unblur_error, unblur_info};

/// Executes core effects against the engine and the filesystem.
pub struct EffectRunner {
    engine: EngineHandle,
    writer: ResultWriter,
    format: OutputFormat,
    saved: Vec<PathBuf>,
    unsaved: Vec<String>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, output_dir: PathBuf, format: OutputFormat) -> Self {
        Self {
            engine,
            writer: ResultWriter::new(output_dir),
            format,
            saved: Vec::new(),
            unsaved: Vec::new(),
        }
    }

    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    pub fn saved(&self) -> &[PathBuf] {
        &self.saved
    }

    /// Result names whose save failed, in order.
    pub fn unsaved(&self) -> &[String] {
        &self.unsaved
    }

    /// Runs effects and returns any messages they produce immediately.
    pub fn run(&mut self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut follow_up = Vec::new();
        for effect in effects {
            match effect {
                Effect::SubmitEnhancement(job) => {
                    let generation = job.generation;
                    let request = EnhanceRequest {
                        file_name: job.file_name,
                        media_type: job.media_type,
                        bytes: job.bytes,
                    };
                    if let Err(err) = self.engine.submit(generation, request) {
                        unblur_error!("Could not submit generation {}: {}", generation, err);
                        follow_up.push(Msg::EnhancementSettled {
                            generation,
                            outcome: EnhancementOutcome::Failure(Failure::new(
                                ErrorKind::ClientFault,
                                err.to_string(),
                            )),
                        });
                    }
                }
                Effect::SaveResult { source_name, bytes } => {
                    let file_name = result_filename(&source_name, self.format);
                    match self.writer.save(&file_name, &bytes) {
                        Ok(path) => {
                            unblur_info!("Saved {} ({} bytes)", path.display(), bytes.len());
                            self.saved.push(path);
                        }
                        Err(err) => {
                            unblur_error!("Failed to save {}: {}", file_name, err);
                            self.unsaved.push(file_name);
                        }
                    }
                }
            }
        }
        follow_up
    }
}

pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Settled { generation, result } => Msg::EnhancementSettled {
            generation,
            outcome: match result {
                Ok(image) => EnhancementOutcome::Success(image.bytes),
                Err(err) => EnhancementOutcome::Failure(Failure::new(
                    map_failure_kind(err.kind),
                    err.message,
                )),
            },
        },
    }
}

fn map_failure_kind(kind: FailureKind) -> ErrorKind {
    match kind {
        FailureKind::ModelUnavailable => ErrorKind::ModelUnavailable,
        FailureKind::PayloadTooLarge => ErrorKind::PayloadTooLarge,
        FailureKind::UnsupportedFormat => ErrorKind::UnsupportedFormat,
        FailureKind::ServerError { .. } => ErrorKind::ServerError,
        FailureKind::Unreachable => ErrorKind::Unreachable,
        FailureKind::ClientFault => ErrorKind::ClientFault,
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use unblur_core::{EnhancementOutcome, ErrorKind, Msg};
    use unblur_engine::{EngineEvent, EnhancedImage, FailureKind, RequestError};

    use super::{map_event, map_failure_kind};

    #[test]
    fn success_event_carries_bytes() {
        let msg = map_event(EngineEvent::Settled {
            generation: 9,
            result: Ok(EnhancedImage {
                bytes: Bytes::from_static(b"out"),
                content_type: None,
            }),
        });
        match msg {
            Msg::EnhancementSettled {
                generation: 9,
                outcome: EnhancementOutcome::Success(bytes),
            } => assert_eq!(bytes, Bytes::from_static(b"out")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn failure_event_keeps_status_text() {
        let msg = map_event(EngineEvent::Settled {
            generation: 2,
            result: Err(RequestError {
                kind: FailureKind::ServerError { status: 502 },
                message: "Bad Gateway".to_string(),
            }),
        });
        match msg {
            Msg::EnhancementSettled {
                outcome: EnhancementOutcome::Failure(failure),
                ..
            } => {
                assert_eq!(failure.kind, ErrorKind::ServerError);
                assert_eq!(failure.user_message(), "Server error: Bad Gateway");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn every_failure_kind_maps() {
        assert_eq!(map_failure_kind(FailureKind::Unreachable), ErrorKind::Unreachable);
        assert_eq!(map_failure_kind(FailureKind::ClientFault), ErrorKind::ClientFault);
        assert_eq!(
            map_failure_kind(FailureKind::UnsupportedFormat),
            ErrorKind::UnsupportedFormat
        );
    }
}
