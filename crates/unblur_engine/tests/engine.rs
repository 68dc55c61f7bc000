use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use unblur_engine::{
    EngineEvent, EngineHandle, EnhanceRequest, EnhanceSettings, EnhancedImage, Enhancer,
    FailureKind, RequestError,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct EchoEnhancer;

#[async_trait::async_trait]
impl Enhancer for EchoEnhancer {
    async fn enhance(&self, request: EnhanceRequest) -> Result<EnhancedImage, RequestError> {
        if request.bytes.is_empty() {
            return Err(RequestError {
                kind: FailureKind::ServerError { status: 400 },
                message: "Bad Request".to_string(),
            });
        }
        let mut out = b"sharp:".to_vec();
        out.extend_from_slice(&request.bytes);
        Ok(EnhancedImage {
            bytes: Bytes::from(out),
            content_type: Some("image/png".to_string()),
        })
    }
}

fn request(bytes: &'static [u8]) -> EnhanceRequest {
    EnhanceRequest {
        file_name: "photo.png".to_string(),
        media_type: "image/png".to_string(),
        bytes: Bytes::from_static(bytes),
    }
}

fn wait_for_events(engine: &EngineHandle, count: usize) -> Vec<EngineEvent> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut events = Vec::new();
    while events.len() < count && Instant::now() < deadline {
        if let Some(event) = engine.recv_timeout(Duration::from_millis(50)) {
            events.push(event);
        }
    }
    events
}

#[test]
fn each_submission_settles_with_its_generation() {
    let engine = EngineHandle::with_enhancer(Arc::new(EchoEnhancer)).unwrap();
    engine.submit(3, request(b"abc")).unwrap();
    engine.submit(4, request(b"")).unwrap();

    let mut events = wait_for_events(&engine, 2);
    events.sort_by_key(|event| match event {
        EngineEvent::Settled { generation, .. } => *generation,
    });

    assert_eq!(
        events,
        vec![
            EngineEvent::Settled {
                generation: 3,
                result: Ok(EnhancedImage {
                    bytes: Bytes::from_static(b"sharp:abc"),
                    content_type: Some("image/png".to_string()),
                }),
            },
            EngineEvent::Settled {
                generation: 4,
                result: Err(RequestError {
                    kind: FailureKind::ServerError { status: 400 },
                    message: "Bad Request".to_string(),
                }),
            },
        ]
    );
    assert!(engine.try_recv().is_none());
}

#[test]
fn reqwest_engine_round_trip() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/restore"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        server
    });

    let engine = EngineHandle::new(EnhanceSettings::new(&server.uri()).unwrap()).unwrap();
    engine.submit(1, request(b"png")).unwrap();

    let events = wait_for_events(&engine, 1);
    match events.as_slice() {
        [EngineEvent::Settled {
            generation: 1,
            result: Err(err),
        }] => assert_eq!(err.kind, FailureKind::ModelUnavailable),
        other => panic!("unexpected events {other:?}"),
    }
}

/// Answers with the session generation visible to the enhancing task.
struct GenerationEcho;

#[async_trait::async_trait]
impl Enhancer for GenerationEcho {
    async fn enhance(&self, _request: EnhanceRequest) -> Result<EnhancedImage, RequestError> {
        Ok(EnhancedImage {
            bytes: Bytes::from(unblur_logging::session_generation().to_string()),
            content_type: None,
        })
    }
}

#[test]
fn engine_tasks_log_under_the_submitted_generation() {
    let engine = EngineHandle::with_enhancer(Arc::new(GenerationEcho)).unwrap();
    engine.submit(7, request(b"png")).unwrap();

    match wait_for_events(&engine, 1).as_slice() {
        [EngineEvent::Settled {
            generation: 7,
            result: Ok(image),
        }] => assert_eq!(image.bytes, Bytes::from_static(b"7")),
        other => panic!("unexpected events {other:?}"),
    }
}
