#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/todo-api-rust");
        cmd.env("TODO_API_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // Inherit environment so the server can see DATABASE_URL and TOKEN_SECRET
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Every test registers its own throwaway users; the database persists
/// between runs, so emails must never collide.
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4().simple())
}

/// Register a user and hand back the issued token with the response body.
/// Panics on a non-200 since callers rely on a working account.
pub async fn register_user(
    client: &reqwest::Client,
    base_url: &str,
    email: &str,
    password: &str,
) -> Result<(String, Value)> {
    let res = client
        .post(format!("{}/users", base_url))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;

    anyhow::ensure!(
        res.status() == StatusCode::OK,
        "registration failed with {}",
        res.status()
    );

    let token = res
        .headers()
        .get("x-auth")
        .context("missing x-auth header")?
        .to_str()?
        .to_string();
    let body = res.json::<Value>().await?;

    Ok((token, body))
}

/// Create a todo as the given token's user and return its body.
pub async fn create_todo(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    text: &str,
) -> Result<Value> {
    let res = client
        .post(format!("{}/todos", base_url))
        .header("x-auth", token)
        .json(&json!({ "text": text }))
        .send()
        .await?;

    anyhow::ensure!(
        res.status() == StatusCode::OK,
        "todo creation failed with {}",
        res.status()
    );

    Ok(res.json::<Value>().await?)
}
