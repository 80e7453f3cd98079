use std::collections::VecDeque;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tempfile::TempDir;
use tokio::net::TcpListener;

use deck_outline::config::Settings;
use deck_outline::outline::OutlineService;

#[allow(dead_code)]
pub fn run_deck_outline(args: &[&str]) -> Output {
    TestEnv::new().run(args)
}

pub struct TestEnv {
    home: TempDir,
    config: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temporary HOME dir"),
            config: tempfile::tempdir().expect("create temporary XDG config dir"),
        }
    }

    pub fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_deck-outline"));
        command
            .args(args)
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.config.path())
            .env_remove("OPENAI_API_KEY")
            .env_remove("MODEL")
            .env_remove("DECK_OUTLINE_BIND")
            .env_remove("RUST_LOG");
        command
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .output()
            .expect("failed to execute deck-outline binary")
    }

    #[allow(dead_code)]
    pub fn config_path(&self) -> PathBuf {
        let output = self.run(&["config", "path"]);
        assert!(
            output.status.success(),
            "config path should succeed\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );

        let path = String::from_utf8_lossy(&output.stdout);
        PathBuf::from(path.trim())
    }

    #[allow(dead_code)]
    pub fn write_config(&self, contents: &str) {
        let config_path = self.config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).expect("create config parent directory");
        }
        std::fs::write(&config_path, contents).expect("write config file");
    }
}

/// One request the fake upstream received.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub authorization: Option<String>,
    pub body: Value,
}

/// Stand-in for the Responses API that answers from a script.
#[allow(dead_code)]
pub struct FakeUpstream {
    replies: Mutex<VecDeque<(StatusCode, &'static str, String)>>,
    calls: Mutex<Vec<RecordedCall>>,
}

#[allow(dead_code)]
impl FakeUpstream {
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[allow(dead_code)]
async fn respond(
    State(upstream): State<Arc<FakeUpstream>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    upstream.calls.lock().unwrap().push(RecordedCall {
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    upstream
        .replies
        .lock()
        .unwrap()
        .pop_front()
        .map(|(status, content_type, body)| {
            (status, [(header::CONTENT_TYPE, content_type)], body)
        })
        .unwrap_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "application/json")],
            r#"{"error":"script exhausted"}"#.to_string(),
        ))
}

/// Start a fake upstream answering with JSON documents; returns its `/v1` base URL.
#[allow(dead_code)]
pub async fn spawn_upstream(replies: Vec<(StatusCode, Value)>) -> (String, Arc<FakeUpstream>) {
    let replies = replies
        .into_iter()
        .map(|(status, value)| (status, "application/json", value.to_string()))
        .collect();
    spawn_upstream_raw(replies).await
}

/// Start a fake upstream answering with literal bodies and content types.
#[allow(dead_code)]
pub async fn spawn_upstream_raw(
    replies: Vec<(StatusCode, &'static str, String)>,
) -> (String, Arc<FakeUpstream>) {
    let upstream = Arc::new(FakeUpstream {
        replies: Mutex::new(replies.into()),
        calls: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/v1/responses", post(respond))
        .with_state(upstream.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind upstream");
    let addr = listener.local_addr().expect("upstream addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve upstream");
    });

    (format!("http://{}/v1", addr), upstream)
}

/// Start the outline service; returns its base URL.
#[allow(dead_code)]
pub async fn spawn_service(settings: Settings) -> String {
    let service = OutlineService::from_settings(settings).expect("build service");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind service");
    let addr = listener.local_addr().expect("service addr");
    tokio::spawn(async move {
        deck_outline::server::serve(listener, service, std::future::pending::<()>())
            .await
            .expect("serve outline service");
    });

    format!("http://{}", addr)
}

/// Settings pointing at a fake upstream.
#[allow(dead_code)]
pub fn settings_for(endpoint: &str) -> Settings {
    let mut settings = Settings::default();
    settings.llm.api_key = "sk-test".to_string();
    settings.llm.endpoint = endpoint.to_string();
    settings
}

#[allow(dead_code)]
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("build test http client")
}

#[allow(dead_code)]
pub fn founder_input() -> Value {
    serde_json::json!({
        "startup": "Foo",
        "one_liner": "X",
        "industry": "Y",
        "target_user": "Z",
        "problem": "P",
        "solution": "S"
    })
}
