use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{Duration as ChronoDuration, Utc};
use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio::sync::Mutex;
use tokio::time::sleep;

struct TestServer {
    base_url: String,
    child: Child,
    _data_dir: TempDir,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::Mutex;
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PIDS: Mutex<Vec<i32>> = Mutex::new(Vec::new());

    pub fn register(pid: u32) {
        if let Ok(mut pids) = PIDS.lock() {
            pids.push(pid as i32);
        }
        REGISTER.call_once(|| unsafe {
            libc::atexit(on_exit);
        });
    }

    extern "C" fn on_exit() {
        if let Ok(pids) = PIDS.lock() {
            for pid in pids.iter().copied().filter(|pid| *pid > 0) {
                unsafe {
                    libc::kill(pid, libc::SIGTERM);
                }
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

fn days_ago(days: i64) -> String {
    (Utc::now() - ChronoDuration::days(days)).to_rfc3339()
}

fn seed_data_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("create data dir");
    let issues = json!([
        {
            "number": 1,
            "title": "Long forgotten draft",
            "html_url": "https://example.com/issues/1",
            "created_at": days_ago(50),
            "updated_at": days_ago(10),
            "labels": [{"name": "needs review"}],
            "approve": format!(" {} {} ", days_ago(45), days_ago(2))
        },
        {
            "number": 2,
            "title": "Fresh draft",
            "created_at": days_ago(3),
            "updated_at": days_ago(1),
            "labels": ["draft"],
            "approve": days_ago(2)
        },
        {
            "number": 3,
            "title": "Not sent yet",
            "created_at": days_ago(12),
            "updated_at": days_ago(12),
            "approve": ""
        },
        {
            "number": 4,
            "title": "Broken dates",
            "created_at": "sometime",
            "updated_at": days_ago(1)
        },
        {
            "number": 5,
            "title": "Never dated",
            "created_at": null,
            "updated_at": days_ago(1),
            "labels": [42]
        }
    ]);
    std::fs::write(dir.path().join("issues.json"), issues.to_string()).unwrap();
    std::fs::create_dir(dir.path().join("archive")).unwrap();
    std::fs::write(
        dir.path().join("results_30day.json"),
        json!({
            "rows": [["/blog/", "900"], ["/blog/post/", "300"]],
            "totalsForAllResults": {"ga:pageviews": "1200"}
        })
        .to_string(),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("results_7day.json"),
        json!({"rows": [], "totalsForAllResults": {"ga:pageviews": "70"}}).to_string(),
    )
    .unwrap();
    dir
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/_data/issues.json")).send().await {
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

async fn spawn_server(credentials: Option<(&str, &str)>) -> TestServer {
    let port = pick_free_port();
    let data_dir = seed_data_dir();
    let mut command = Command::new(env!("CARGO_BIN_EXE_drafts_dashboard"));
    command
        .env("PORT", port.to_string())
        .env("APP_DATA_DIR", data_dir.path())
        .env("RUST_LOG", "info")
        .env_remove("HTUSER")
        .env_remove("HTAUTH")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    if let Some((user, password)) = credentials {
        command.env("HTUSER", user).env("HTAUTH", password);
    }
    let child = command.spawn().expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer {
        base_url,
        child,
        _data_dir: data_dir,
    }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server(None).await);
    *guard = Some(Arc::clone(&server));
    server
}

fn numbers(bucket: &Value) -> Vec<u64> {
    bucket
        .as_array()
        .unwrap()
        .iter()
        .map(|card| card["issue"]["number"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn http_issues_are_bucketed() {
    let server = shared_server().await;
    let board: Value = Client::new()
        .get(format!("{}/api/issues", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(numbers(&board["oldest"]), vec![1]);
    assert_eq!(numbers(&board["newest"]), vec![2]);
    assert!(numbers(&board["newer"]).is_empty());
    assert!(numbers(&board["older"]).is_empty());
    assert_eq!(numbers(&board["unbucketed"]), vec![3]);
    assert_eq!(board["rejected"][0]["number"], 4);
    assert_eq!(board["rejected"][1]["number"], 5);
    assert_eq!(board["rejected"].as_array().unwrap().len(), 2);

    let report = &board["oldest"][0]["report"];
    assert_eq!(report["created_days"], 50);
    assert_eq!(report["updated_days"], 10);
    assert_eq!(report["approval_days"], 45);
    assert_eq!(report["bucket"], "oldest");
    assert_eq!(
        report["summary_html"].as_str().unwrap().matches("<li>").count(),
        3
    );
    assert!(board["unbucketed"][0]["report"]["bucket"].is_null());
}

#[tokio::test]
async fn http_pageviews_load_each_window() {
    let server = shared_server().await;
    let pageviews: Value = Client::new()
        .get(format!("{}/api/pageviews", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(pageviews["day30"]["total"], 1200);
    assert_eq!(pageviews["day30"]["rows"][0][0], "/blog/");
    assert_eq!(pageviews["day7"]["total"], 70);
    assert!(pageviews["day1"].is_null());
}

#[tokio::test]
async fn http_index_renders_dashboard() {
    let server = shared_server().await;
    let response = Client::new().get(&server.base_url).send().await.unwrap();
    assert!(response.status().is_success());
    let html = response.text().await.unwrap();

    assert!(html.contains("Blog Drafts Dashboard"));
    assert!(html.contains("Sent for approval 45 days ago."));
    assert!(html.contains("<span class=\"value\">1200</span>"));
    assert!(html.contains("Could not read"));
}

#[tokio::test]
async fn http_data_files_are_served() {
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/_data/results_7day.json", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );

    let response = client
        .get(format!("{}/_data/missing.json", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.text().await.unwrap(), "not found");

    let response = client
        .get(format!("{}/_data/archive", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_basic_auth_gates_dashboard() {
    let server = spawn_server(Some(("editor", "secret"))).await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/issues", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers()["www-authenticate"].to_str().unwrap(),
        "Basic realm=\"Login Required\""
    );

    let response = client
        .get(format!("{}/api/issues", server.base_url))
        .header(
            "Authorization",
            format!("Basic {}", STANDARD.encode("editor:secret")),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{}/_data/issues.json", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
