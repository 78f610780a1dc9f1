use axum::{Json, Router, routing::get};
use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize, PartialEq)]
struct Goal {
    id: String,
    name: String,
    current: f64,
    target: f64,
    unit: String,
    category: String,
}

#[derive(Debug, Deserialize)]
struct GoalStats {
    average_progress: Option<f64>,
    completed_goals: usize,
    total_goals: usize,
}

#[derive(Debug, Deserialize)]
struct TimeProgress {
    percentage: f64,
    days_left: i64,
}

#[derive(Debug, Deserialize)]
struct Overview {
    goals: Vec<Goal>,
    stats: GoalStats,
    chart: Vec<serde_json::Value>,
    time: TimeProgress,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("goal_dashboard_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/stats")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server(sheets_base_url: Option<&str>) -> TestServer {
    let port = pick_free_port();
    let mut command = Command::new(env!("CARGO_BIN_EXE_goal_dashboard"));
    command
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", unique_data_path())
        .env("RUST_LOG", "info")
        .env_remove("SHEETS_SPREADSHEET_ID")
        .env_remove("SHEETS_API_KEY")
        .env_remove("SHEETS_RANGE")
        .env_remove("SHEETS_BASE_URL")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    if let Some(base_url) = sheets_base_url {
        command
            .env("SHEETS_SPREADSHEET_ID", "sheet-123")
            .env("SHEETS_API_KEY", "test-key")
            .env("SHEETS_BASE_URL", base_url);
    }
    let child = command.spawn().expect("failed to spawn server");

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server(None).await);
    #[cfg(unix)]
    cleanup::register(server.child.id());
    *guard = Some(Arc::clone(&server));
    server
}

async fn get_goals(client: &Client, base_url: &str, category: &str) -> Vec<Goal> {
    client
        .get(format!("{base_url}/api/goals"))
        .query(&[("category", category)])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_overview_reports_seed_goals() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let overview: Overview = client
        .get(format!("{}/api/overview", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(overview.goals.len(), 10);
    assert_eq!(overview.stats.total_goals, 10);
    assert!(overview.stats.average_progress.is_some());
    assert!(overview.stats.completed_goals <= overview.stats.total_goals);
    assert_eq!(overview.chart.len(), 10);
    assert!((0.0..=100.0).contains(&overview.time.percentage));
    assert!(overview.time.days_left >= 0);
}

#[tokio::test]
async fn http_text_update_changes_only_named_goal() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = get_goals(&client, &server.base_url, "all").await;

    let response = client
        .post(format!("{}/api/ingest/text", server.base_url))
        .json(&serde_json::json!({ "text": "Weekly check-in\nRunning (1 Mile): 3/51\n" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let after = get_goals(&client, &server.base_url, "all").await;
    assert_eq!(before.len(), after.len());
    for (old, new) in before.iter().zip(&after) {
        if new.id == "running" {
            assert_eq!(new.current, 3.0);
            assert_eq!(new.target, old.target);
        } else {
            assert_eq!(old, new);
        }
    }
}

#[tokio::test]
async fn http_unparseable_update_keeps_goals() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = get_goals(&client, &server.base_url, "all").await;
    let response = client
        .post(format!("{}/api/ingest/text", server.base_url))
        .json(&serde_json::json!({ "text": "Books Read: 4/50\nPush-ups: 99999999999999999999999/5000" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(get_goals(&client, &server.base_url, "all").await, before);
}

#[tokio::test]
async fn http_category_filter() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let all = get_goals(&client, &server.base_url, "all").await;
    let mental = get_goals(&client, &server.base_url, "mental").await;
    assert!(!mental.is_empty());
    assert!(mental.iter().all(|goal| goal.category == "mental"));

    let expected: Vec<&str> = all
        .iter()
        .filter(|goal| goal.category == "mental")
        .map(|goal| goal.id.as_str())
        .collect();
    let ids: Vec<&str> = mental.iter().map(|goal| goal.id.as_str()).collect();
    assert_eq!(ids, expected);

    let response = client
        .get(format!("{}/api/goals?category=spiritual", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_sync_without_config_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = get_goals(&client, &server.base_url, "all").await;
    let response = client
        .post(format!("{}/api/sync", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(response.text().await.unwrap().contains("SHEETS_SPREADSHEET_ID"));

    assert_eq!(get_goals(&client, &server.base_url, "all").await, before);

    let status: serde_json::Value = client
        .get(format!("{}/api/sync/status", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["syncing"], false);
}

#[tokio::test]
async fn http_sync_replaces_goals_from_sheet() {
    let router = Router::new().route(
        "/:id/values/:range",
        get(|| async {
            Json(serde_json::json!({
                "values": [
                    ["Meditation", "10", "30", "Minutes", "mental"],
                    ["X", "abc", "50"]
                ]
            }))
        }),
    );
    let sheet_url = serve_sheet(router).await;
    let server = spawn_server(Some(&sheet_url)).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/sync", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let goals = get_goals(&client, &server.base_url, "all").await;
    assert_eq!(
        goals,
        vec![
            Goal {
                id: "sheet-0-meditation".into(),
                name: "Meditation".into(),
                current: 10.0,
                target: 30.0,
                unit: "Minutes".into(),
                category: "mental".into(),
            },
            Goal {
                id: "sheet-1-x".into(),
                name: "X".into(),
                current: 0.0,
                target: 50.0,
                unit: "units".into(),
                category: "physical".into(),
            },
        ]
    );
}

async fn serve_sheet(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn http_sync_with_empty_sheet_keeps_goals() {
    let router = Router::new().route(
        "/:id/values/:range",
        get(|| async { Json(serde_json::json!({ "values": [] })) }),
    );
    let sheet_url = serve_sheet(router).await;
    let server = spawn_server(Some(&sheet_url)).await;
    let client = Client::new();

    let before = get_goals(&client, &server.base_url, "all").await;
    let response = client
        .post(format!("{}/api/sync", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().await.unwrap().contains("no valid data"));

    assert_eq!(get_goals(&client, &server.base_url, "all").await, before);
}

#[tokio::test]
async fn http_overlapping_sync_is_rejected() {
    let router = Router::new().route(
        "/:id/values/:range",
        get(|| async {
            sleep(Duration::from_millis(1500)).await;
            Json(serde_json::json!({ "values": [["Yoga", "2", "20", "Sessions", "mental"]] }))
        }),
    );
    let sheet_url = serve_sheet(router).await;
    let server = spawn_server(Some(&sheet_url)).await;
    let client = Client::new();

    let first = tokio::spawn({
        let client = client.clone();
        let url = format!("{}/api/sync", server.base_url);
        async move { client.post(url).send().await.unwrap().status() }
    });
    sleep(Duration::from_millis(300)).await;

    let status: serde_json::Value = client
        .get(format!("{}/api/sync/status", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["syncing"], true);

    let second = client
        .post(format!("{}/api/sync", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);

    assert!(first.await.unwrap().is_success());
    let goals = get_goals(&client, &server.base_url, "all").await;
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].id, "sheet-0-yoga");
}
