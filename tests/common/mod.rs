#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use serde_json::Value;
use server::config::Config;
use server::db::MemoryUploadStore;
use server::routes::{SharedLauncher, SharedStore};
use skill_analyzer::{AnalyzerError, EngineConfig, EngineLauncher, Evaluator};
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot`

pub const BOUNDARY: &str = "chess-coach-test-boundary";

/// Three moves per side.
pub const RUY_LOPEZ: &str = r#"[Event "Test"]
[White "Alice"]
[Black "Bob"]
[Result "*"]

1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 *
"#;

/// Engine stand-in that replays fixed scores and counts launches/quits.
pub struct FakeLauncher {
    scores: Vec<Option<i32>>,
    fail_launch: bool,
    pub launches: AtomicUsize,
    pub quits: Arc<AtomicUsize>,
}

impl FakeLauncher {
    pub fn with_scores(scores: &[Option<i32>]) -> Self {
        Self {
            scores: scores.to_vec(),
            fail_launch: false,
            launches: AtomicUsize::new(0),
            quits: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_launch: true,
            ..Self::with_scores(&[])
        }
    }

    pub fn launch_count(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn quit_count(&self) -> usize {
        self.quits.load(Ordering::SeqCst)
    }
}

struct FakeEngine {
    scores: VecDeque<Option<i32>>,
    quits: Arc<AtomicUsize>,
}

#[async_trait]
impl Evaluator for FakeEngine {
    async fn evaluate(
        &mut self,
        _fen: &str,
        _move_time: Duration,
    ) -> Result<Option<i32>, AnalyzerError> {
        Ok(self.scores.pop_front().flatten())
    }

    async fn quit(&mut self) {
        self.quits.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl EngineLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn Evaluator>, AnalyzerError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        if self.fail_launch {
            return Err(AnalyzerError::Engine(
                "Failed to spawn engine at /missing/stockfish".to_string(),
            ));
        }
        Ok(Box::new(FakeEngine {
            scores: self.scores.iter().copied().collect(),
            quits: Arc::clone(&self.quits),
        }))
    }
}

/// Router wired to an in-memory store, a fake engine and a temp guides dir.
pub struct TestApp {
    pub store: Arc<MemoryUploadStore>,
    pub launcher: Arc<FakeLauncher>,
    pub guides: TempDir,
    router: Router,
}

impl TestApp {
    pub fn new(launcher: FakeLauncher) -> Self {
        Self::with_upload_limit(launcher, 1024 * 1024)
    }

    pub fn with_upload_limit(launcher: FakeLauncher, max_upload_bytes: usize) -> Self {
        let store = Arc::new(MemoryUploadStore::new());
        let launcher = Arc::new(launcher);
        let guides = tempfile::tempdir().expect("Failed to create guides dir");

        let config = Config {
            database_url: None,
            host: "127.0.0.1".to_string(),
            port: 0,
            upload_dir: guides.path().join("uploads"),
            guides_dir: guides.path().to_path_buf(),
            max_upload_bytes,
            engine: EngineConfig {
                move_time: Duration::from_millis(1),
                ..EngineConfig::default()
            },
        };

        let shared_store: SharedStore = store.clone();
        let shared_launcher: SharedLauncher = launcher.clone();
        let router = server::build_router(shared_store, shared_launcher, config);

        Self {
            store,
            launcher,
            guides,
            router,
        }
    }

    pub fn write_guide(&self, file_name: &str, contents: &[u8]) {
        std::fs::write(self.guides.path().join(file_name), contents)
            .expect("Failed to write guide");
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Router should not fail")
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    /// POST /upload with an optional file part and optional color field.
    pub async fn upload(&self, file: Option<(&str, &str)>, color: Option<&str>) -> Response<Body> {
        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(file, color)))
            .unwrap();
        self.send(request).await
    }
}

pub fn multipart_body(file: Option<(&str, &str)>, color: Option<&str>) -> String {
    let mut body = String::new();
    if let Some((name, contents)) = file {
        body.push_str(&format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\n\
             Content-Type: application/x-chess-pgn\r\n\r\n\
             {contents}\r\n"
        ));
    }
    if let Some(color) = color {
        body.push_str(&format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"player_color\"\r\n\r\n\
             {color}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body")
        .to_vec()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).expect("Body should be UTF-8")
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("Should parse JSON")
}
