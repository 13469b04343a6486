use pearl::api::ApiServer;
use pearl::db::Store;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

// ─── helpers ───────────────────────────────────────────────────────

struct TestServer {
    server: ApiServer,
    client: Client,
}

impl TestServer {
    async fn start() -> Self {
        let store = Store::open_in_memory().expect("in-memory store");
        let server = ApiServer::start(store, "127.0.0.1", 0).await.expect("start server");
        Self {
            server,
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.server.url())
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> (StatusCode, Value) {
        let resp = req.send().await.expect("request");
        let status = resp.status();
        let body = resp.json::<Value>().await.expect("json body");
        (status, body)
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        self.send(self.client.get(self.url(path))).await
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.send(self.client.post(self.url(path)).json(&body)).await
    }

    async fn put(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.send(self.client.put(self.url(path)).json(&body)).await
    }

    async fn delete(&self, path: &str) -> (StatusCode, Value) {
        self.send(self.client.delete(self.url(path))).await
    }

    async fn create(&self, body: Value) -> Value {
        let (status, v) = self.post("/tasks", body).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {v}");
        v["data"].clone()
    }
}

fn dates(v: &Value) -> Vec<&str> {
    v.as_array().unwrap().iter().map(|d| d.as_str().unwrap()).collect()
}

// ─── basics ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_root_health_and_fallback() {
    let srv = TestServer::start().await;

    let resp = srv.client.get(srv.url("/")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "Task Management API");

    let (status, v) = srv.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["data"]["status"], "ok");
    assert_eq!(v["data"]["tasks"], 0);

    let resp = srv.client.get(srv.url("/nope")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(resp.text().await.unwrap(), "Not Found");

    srv.server.shutdown().await.unwrap();
}

// ─── tasks ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_task_crud() {
    let srv = TestServer::start().await;

    let task = srv
        .create(json!({
            "title": "Water plants",
            "description": "Balcony",
            "due_date": "2024-03-05",
            "recurrence_rule": {"frequency": "weekly", "interval": 1, "weekDays": ["TU"]}
        }))
        .await;
    let id = task["id"].as_str().unwrap().to_string();
    assert_eq!(task["completed"], false);
    assert_eq!(task["recurrence_rule"]["weekDays"], json!(["TU"]));

    let (status, v) = srv.get("/tasks").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["success"], true);
    assert_eq!(v["data"].as_array().unwrap().len(), 1);

    let (status, v) = srv.get(&format!("/tasks/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["data"]["title"], "Water plants");

    let (status, v) = srv
        .put(&format!("/tasks/{id}"), json!({"completed": true, "due_date": null}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["data"]["completed"], true);
    assert!(v["data"]["due_date"].is_null());
    assert_eq!(v["data"]["description"], "Balcony");
    assert_eq!(v["data"]["recurrence_rule"]["frequency"], "weekly");

    let (status, v) = srv.delete(&format!("/tasks/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["data"]["message"], "Task deleted successfully");
    assert_eq!(v["data"]["deleted"]["id"], id.as_str());

    let (status, v) = srv.get(&format!("/tasks/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");

    srv.server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_rule_accepts_encoded_string_and_null() {
    let srv = TestServer::start().await;

    let encoded = json!({"frequency": "daily", "interval": 3}).to_string();
    let task = srv
        .create(json!({"title": "Encoded", "recurrence_rule": encoded}))
        .await;
    assert_eq!(task["recurrence_rule"]["frequency"], "daily");
    assert_eq!(task["recurrence_rule"]["interval"], 3);

    let id = task["id"].as_str().unwrap();
    let (status, v) = srv
        .put(&format!("/tasks/{id}"), json!({"recurrence_rule": null}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(v["data"]["recurrence_rule"].is_null());

    let task = srv
        .create(json!({"title": "None", "recurrence_rule": {"frequency": "none"}}))
        .await;
    assert!(task["recurrence_rule"].is_null());

    srv.server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_task_errors() {
    let srv = TestServer::start().await;

    let (status, v) = srv.post("/tasks", json!({"title": "  "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");

    let (status, v) = srv
        .post(
            "/tasks",
            json!({"title": "Bad", "recurrence_rule": {"frequency": "daily", "interval": 0}}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");

    let (status, v) = srv
        .post("/tasks", json!({"title": "Bad", "recurrence_rule": "{not json"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["error"]["code"], "DECODE_ERROR");

    let (status, v) = srv
        .post(
            "/tasks",
            json!({"title": "Bad", "recurrence_rule": {"frequency": "weekly", "weekDays": ["XX"]}}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = v["error"]["message"].as_str().unwrap();
    assert!(message.contains("unknown weekday code 'XX'"), "{message}");

    let lower = srv
        .create(json!({
            "title": "Lower",
            "recurrence_rule": {"frequency": "weekly", "weekDays": ["fr", "mo"]}
        }))
        .await;
    assert_eq!(lower["recurrence_rule"]["weekDays"], json!(["MO", "FR"]));
    let id = lower["id"].as_str().unwrap();
    srv.delete(&format!("/tasks/{id}")).await;

    let (status, v) = srv.get("/tasks/not-an-id").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["error"]["code"], "INVALID_ID");

    let (status, v) = srv
        .put("/tasks/01ARZ3NDEKTSV4RRFFQ69G5FAV", json!({"completed": true}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");

    let resp = srv
        .client
        .post(srv.url("/tasks"))
        .header("content-type", "application/json")
        .body("{broken")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let v: Value = resp.json().await.unwrap();
    assert_eq!(v["success"], false);

    let (_, v) = srv.get("/tasks").await;
    assert_eq!(v["data"].as_array().unwrap().len(), 0);

    srv.server.shutdown().await.unwrap();
}

// ─── settings ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_settings() {
    let srv = TestServer::start().await;

    let (status, v) = srv.get("/settings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["data"]["user_id"], "default");
    assert_eq!(v["data"]["theme"], "system");
    assert_eq!(v["data"]["start_day_of_week"], 0);

    let (status, v) = srv
        .put("/settings", json!({"theme": "dark", "time_format": "24h"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["data"]["theme"], "dark");
    assert_eq!(v["data"]["time_format"], "24h");
    assert_eq!(v["data"]["language"], "en");

    let (status, v) = srv.put("/settings", json!({"start_day_of_week": 9})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = srv.put("/settings", json!({"theme": "neon"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, v) = srv.get("/settings").await;
    assert_eq!(v["data"]["theme"], "dark");

    srv.server.shutdown().await.unwrap();
}

// ─── views ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_recurrence_preview() {
    let srv = TestServer::start().await;

    let (status, v) = srv
        .post(
            "/recurrence/preview",
            json!({"start": "2024-01-31", "rule": {"frequency": "monthly"}, "count": 3}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        dates(&v["data"]["dates"]),
        vec!["2024-01-31", "2024-02-29", "2024-03-31", "2024-04-30"]
    );

    let (_, v) = srv
        .post(
            "/recurrence/preview",
            json!({"start": "2024-02-29", "rule": {"frequency": "yearly"}, "count": 1}),
        )
        .await;
    assert_eq!(dates(&v["data"]["dates"]), vec!["2024-02-29", "2025-02-28"]);

    let (status, v) = srv
        .post("/recurrence/preview", json!({"rule": {"frequency": "daily"}}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["data"]["dates"].as_array().unwrap().len(), 0);

    let (status, _) = srv
        .post(
            "/recurrence/preview",
            json!({"start": "2024-01-01", "rule": {"frequency": "daily"}, "count": 1000}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    srv.server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_calendar_and_stats() {
    let srv = TestServer::start().await;
    let done = srv.create(json!({"title": "Done", "due_date": "2024-03-10"})).await;
    srv.create(json!({"title": "Open", "due_date": "2024-03-12"})).await;
    srv.create(json!({"title": "Other month", "due_date": "2024-07-01"})).await;
    let id = done["id"].as_str().unwrap();
    srv.put(&format!("/tasks/{id}"), json!({"completed": true})).await;

    let (status, v) = srv.get("/calendar?month=2024-03&start_of_week=1").await;
    assert_eq!(status, StatusCode::OK);
    let days = v["data"]["days"].as_array().unwrap();
    assert_eq!(days.len(), 35);
    assert_eq!(days[0]["date"], "2024-02-26");
    let day = |d: &str| days.iter().find(|x| x["date"] == d).unwrap().clone();
    assert_eq!(day("2024-03-10")["status"], "completed");
    assert_eq!(day("2024-03-12")["status"], "pending");
    assert!(day("2024-03-11")["status"].is_null());

    let (status, v) = srv.get("/calendar?month=2024-03&start_of_week=7").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");

    let (status, v) = srv.get("/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["data"]["total"], 3);
    assert_eq!(v["data"]["completed"], 1);
    assert_eq!(v["data"]["completion_rate"], 33);
    assert_eq!(v["data"]["recent"][0]["title"], "Other month");

    srv.server.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_requests_share_the_store() {
    let srv = TestServer::start().await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let client = srv.client.clone();
        let url = srv.url("/tasks");
        handles.push(tokio::spawn(async move {
            client
                .post(url)
                .json(&json!({"title": format!("Task {i}"), "due_date": "2024-03-01"}))
                .send()
                .await
                .map(|resp| resp.status())
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), StatusCode::CREATED);
    }

    let (_, v) = srv.get("/health").await;
    assert_eq!(v["data"]["tasks"], 8);
    let (_, v) = srv.get("/stats").await;
    assert_eq!(v["data"]["pending"], 8);

    srv.server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_stops_serving() {
    let srv = TestServer::start().await;
    let url = srv.url("/health");
    let client = srv.client.clone();
    srv.server.shutdown().await.unwrap();
    assert!(client.get(url).send().await.is_err());
}
