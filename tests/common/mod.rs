use std::process::{Child, Command, Stdio};
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

static SERVER: OnceLock<TestServer> = OnceLock::new();

// Statics are never dropped, so the child is killed from an exit hook instead.
static CHILD: Mutex<Option<Child>> = Mutex::new(None);

extern "C" fn kill_server() {
    if let Ok(mut guard) = CHILD.lock() {
        if let Some(mut child) = guard.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

pub struct TestServer {
    #[allow(dead_code)]
    pub port: u16,
    pub base_url: String,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // In-memory store so the tests need no database
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_suggestion-box"));
        cmd.args(["serve", "--memory"])
            .env("APP_ENV", "development")
            .env("HOST", "127.0.0.1")
            .env("SUGGESTION_BOX_PORT", port.to_string())
            .env("PUBLIC_ORIGIN", "http://localhost:5173")
            .env("RUST_LOG", "suggestion_box_api=warn")
            .env_remove("DATABASE_URL")
            .env_remove("JWT_SECRET")
            .env_remove("JWT_AUDIENCE")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;
        *CHILD.lock().map_err(|_| anyhow::anyhow!("server handle poisoned"))? = Some(child);
        // SAFETY: `kill_server` is a plain extern "C" fn that only touches `CHILD`.
        unsafe {
            libc::atexit(kill_server);
        }

        Ok(Self { port, base_url })
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
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Whether the spawned server is held for the exit hook and still alive.
#[allow(dead_code)]
pub fn server_is_tracked() -> bool {
    match CHILD.lock() {
        Ok(mut guard) => matches!(guard.as_mut().map(|child| child.try_wait()), Some(Ok(None))),
        Err(_) => false,
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Logged-in administrator
#[allow(dead_code)]
pub struct Admin {
    pub id: String,
    pub email: String,
    pub token: String,
}

/// Register a fresh administrator and log in.
#[allow(dead_code)]
pub async fn admin(server: &TestServer, client: &reqwest::Client) -> Result<Admin> {
    let email = format!("admin-{}@example.com", Uuid::new_v4());
    let password = "correct horse battery";

    let res = client
        .post(server.url("/auth/signup"))
        .json(&json!({ "email": email, "password": password, "name": "Test Admin" }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "signup failed: {}", res.status());

    let res = client
        .post(server.url("/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
    let body: Value = res.json().await?;

    Ok(Admin {
        id: body["user"]["id"].as_str().context("login response without user id")?.to_string(),
        email,
        token: body["token"].as_str().context("login response without token")?.to_string(),
    })
}

/// Create a box as `admin` and return the `box` object.
#[allow(dead_code)]
pub async fn create_box(server: &TestServer, client: &reqwest::Client, admin: &Admin, body: Value) -> Result<Value> {
    let res = client
        .post(server.url("/api/boxes"))
        .bearer_auth(&admin.token)
        .json(&body)
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "create box failed: {}", res.status());
    let body: Value = res.json().await?;
    Ok(body["box"].clone())
}

/// Anonymous submission; returns status and body.
#[allow(dead_code)]
pub async fn submit(server: &TestServer, client: &reqwest::Client, body: Value) -> Result<(StatusCode, Value)> {
    let res = client.post(server.url("/api/suggestions")).json(&body).send().await?;
    let status = res.status();
    Ok((status, res.json().await?))
}
