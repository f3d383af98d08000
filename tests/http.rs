use chrono::{Duration as Days, Local, NaiveDate};
use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct Habit {
    id: String,
    name: String,
    streak: u32,
    completed_dates: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ToggleResponse {
    habit: Habit,
    date: String,
    was_completed: bool,
    celebrations: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct TodayResponse {
    date: String,
    completed: usize,
    total: usize,
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
    path.push(format!("habit_tracker_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/today")).send().await {
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

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_habit_tracker"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("APP_SEED_SAMPLE_DATA", "false")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn create_habit(client: &Client, base_url: &str, name: &str) -> Habit {
    let response = client
        .post(format!("{base_url}/api/habits"))
        .json(&json!({ "name": name, "frequency": "daily" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

async fn toggle(client: &Client, base_url: &str, id: &str, date: &str) -> ToggleResponse {
    let response = client
        .post(format!("{base_url}/api/habits/{id}/toggle"))
        .json(&json!({ "date": date }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    response.json().await.unwrap()
}

fn day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[tokio::test]
async fn http_toggle_today_updates_today_counts() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before: TodayResponse = client
        .get(format!("{}/api/today", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let habit = create_habit(&client, &server.base_url, "Stretch").await;
    assert_eq!(habit.streak, 0);
    assert!(habit.completed_dates.is_empty());

    let response = client
        .post(format!("{}/api/habits/{}/toggle", server.base_url, habit.id))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let toggled: ToggleResponse = response.json().await.unwrap();
    assert!(!toggled.was_completed);
    assert_eq!(toggled.habit.streak, 1);
    assert_eq!(toggled.habit.completed_dates, vec![toggled.date.clone()]);

    let today: TodayResponse = client
        .get(format!("{}/api/today", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(today.date, toggled.date);
    assert_eq!(today.total, before.total + 1);
    assert_eq!(today.completed, before.completed + 1);
}

#[tokio::test]
async fn http_seventh_day_celebrates_milestone_and_undo_is_silent() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let habit = create_habit(&client, &server.base_url, "Meditate").await;
    let today = Local::now().date_naive();
    let history: Vec<String> = (1..=6)
        .rev()
        .map(|offset| day(today - Days::days(offset)))
        .collect();

    let imported: Habit = client
        .post(format!("{}/api/habits/{}/import", server.base_url, habit.id))
        .json(&json!({ "dates": history }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(imported.streak, 6);

    let completed = toggle(&client, &server.base_url, &habit.id, &day(today)).await;
    assert!(!completed.was_completed);
    assert_eq!(completed.habit.streak, 7);
    let kinds: Vec<&str> = completed
        .celebrations
        .iter()
        .map(|event| event["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["completion", "milestone"]);
    assert_eq!(completed.celebrations[1]["streak"], 7);

    let undone = toggle(&client, &server.base_url, &habit.id, &day(today)).await;
    assert!(undone.was_completed);
    assert_eq!(undone.habit.streak, 6);
    assert!(undone.celebrations.is_empty());
    assert_eq!(undone.habit.completed_dates, history);
}

#[tokio::test]
async fn http_rejects_malformed_dates_and_unknown_habits() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let habit = create_habit(&client, &server.base_url, "Journal").await;

    let response = client
        .post(format!("{}/api/habits/{}/toggle", server.base_url, habit.id))
        .json(&json!({ "date": "2024-1-5" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post(format!("{}/api/habits/missing/toggle", server.base_url))
        .json(&json!({ "date": "2024-01-05" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let habits: Vec<Habit> = client
        .get(format!("{}/api/habits", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let stored = habits.iter().find(|item| item.id == habit.id).unwrap();
    assert_eq!(stored.name, "Journal");
    assert!(stored.completed_dates.is_empty());
}

#[tokio::test]
async fn http_goal_completion_celebrates_once() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let deadline = (chrono::Utc::now() + Days::days(30)).to_rfc3339();
    let response = client
        .post(format!("{}/api/goals", server.base_url))
        .json(&json!({ "title": "Run a marathon", "category": "Health", "deadline": deadline }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let goal: Value = response.json().await.unwrap();
    let id = goal["id"].as_str().unwrap().to_string();
    assert_eq!(goal["status"], "in-progress");
    assert_eq!(goal["progress"], 0);

    let response = client
        .post(format!("{}/api/goals/{id}/progress", server.base_url))
        .json(&json!({ "progress": 101 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let updated: Value = client
        .post(format!("{}/api/goals/{id}/progress", server.base_url))
        .json(&json!({ "progress": 100 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["goal"]["status"], "completed");
    assert_eq!(updated["celebrations"][0]["kind"], "goal_completed");

    let again: Value = client
        .post(format!("{}/api/goals/{id}/complete", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(again["celebrations"], json!([]));

    let stats: Value = client
        .get(format!("{}/api/stats", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(stats["dashboard"]["completed_goals"].as_u64().unwrap() >= 1);
    assert_eq!(stats["last_7_days"].as_array().unwrap().len(), 7);

    let response = client
        .delete(format!("{}/api/goals/{id}", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn http_rename_keeps_history_and_delete_removes_habit() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let habit = create_habit(&client, &server.base_url, "Walk").await;
    let today = Local::now().date_naive();
    toggle(&client, &server.base_url, &habit.id, &day(today - Days::days(1))).await;
    toggle(&client, &server.base_url, &habit.id, &day(today)).await;

    let response = client
        .put(format!("{}/api/habits/{}", server.base_url, habit.id))
        .json(&json!({ "name": "Evening walk", "frequency": "daily" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let renamed: Habit = response.json().await.unwrap();
    assert_eq!(renamed.name, "Evening walk");
    assert_eq!(renamed.streak, 2);
    assert_eq!(renamed.completed_dates, vec![day(today - Days::days(1)), day(today)]);

    let history: Value = client
        .get(format!("{}/api/habits/{}/history?days=7", server.base_url, habit.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let days = history["days"].as_array().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days[6]["date"], day(today));
    assert_eq!(days[6]["completed"], true);
    assert_eq!(days[5]["completed"], true);
    assert_eq!(days[4]["completed"], false);
    assert_eq!(history["completed_days"], 2);

    let stats: Value = client
        .get(format!("{}/api/stats", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(stats["habits"]["total"].as_u64().unwrap() >= 1);
    assert!(stats["habits"]["completed_today"].as_u64().unwrap() >= 1);
    assert!(stats["habits"]["longest_streak"].as_u64().unwrap() >= 2);
    assert!(stats["habits"]["avg_streak"].is_u64());
    assert!(stats["dashboard"]["goals_by_category"].is_object());
    assert!(stats["last_7_days"][6]["percentage"].as_u64().unwrap() > 0);

    let response = client
        .delete(format!("{}/api/habits/{}", server.base_url, habit.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .post(format!("{}/api/habits/{}/toggle", server.base_url, habit.id))
        .json(&json!({ "date": day(today) }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .get(format!("{}/api/habits/{}/history", server.base_url, habit.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
