//! Black-box tests that drive the API over HTTP against an in-memory database.

use database::DbRepository;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;
use web_server::{AppState, build_router};

struct TestApp {
    base_url: String,
    client: Client,
}

impl TestApp {
    async fn spawn() -> Self {
        let pool = database::connect_in_memory().await.unwrap();
        database::ensure_schema(&pool).await.unwrap();
        let state = Arc::new(AppState {
            db_repo: DbRepository::new(pool),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });

        let client = Client::builder().no_proxy().build().unwrap();
        Self {
            base_url: format!("http://{addr}"),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .unwrap();
        (response.status(), response.json().await.unwrap())
    }

    async fn put(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        let response = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .unwrap();
        (response.status(), response.json().await.unwrap())
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        (response.status(), response.json().await.unwrap())
    }

    async fn delete(&self, path: &str) -> (StatusCode, Value) {
        let response = self.client.delete(self.url(path)).send().await.unwrap();
        (response.status(), response.json().await.unwrap())
    }

    async fn create_agency(&self) -> Value {
        let (status, agency) = self
            .post(
                "/agencies/",
                &json!({ "name": "Credit Bureau X", "description": "Provides credit reports" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        agency
    }
}

fn report_body(agency_id: &Value) -> Value {
    json!({
        "name": "John Doe",
        "check_type": "Credit",
        "result": "Passed",
        "reference_id": "REF123456",
        "agency_id": agency_id
    })
}

#[tokio::test]
async fn report_lifecycle() {
    let app = TestApp::spawn().await;

    let agency = app.create_agency().await;
    assert!(agency["id"].as_i64().unwrap() > 0);

    let (status, created) = app.post("/reports/", &report_body(&agency["id"])).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["agency"], agency);
    assert!(created.get("created_at").and_then(Value::as_str).is_some());

    let path = format!("/reports/{}", created["id"]);
    let (status, fetched) = app.get(&path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let mut changes = report_body(&agency["id"]);
    changes["result"] = json!("Updated Result");
    let (status, updated) = app.put(&path, &changes).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["result"], "Updated Result");

    let (_, fetched) = app.get(&path).await;
    assert_eq!(fetched["result"], "Updated Result");
    assert_eq!(fetched["id"], created["id"]);
    assert_eq!(fetched["created_at"], created["created_at"]);

    let (status, body) = app.delete(&path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], "Report deleted successfully");

    let (status, body) = app.get(&path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Report not found");
}

#[tokio::test]
async fn duplicate_agency_name_is_rejected() {
    let app = TestApp::spawn().await;
    app.create_agency().await;

    let (status, body) = app
        .post(
            "/agencies/",
            &json!({ "name": "Credit Bureau X", "description": "Another one" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Agency with this name already exists");

    let (status, agencies) = app.get("/agencies/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(agencies.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn report_for_unknown_agency_is_a_client_error() {
    let app = TestApp::spawn().await;

    let (status, body) = app.post("/reports/", &report_body(&json!(41))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Agency with id 41 does not exist");

    let (_, reports) = app.get("/reports/").await;
    assert_eq!(reports, json!([]));
}

#[tokio::test]
async fn malformed_bodies_are_rejected_before_storage() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post("/agencies/", &json!({ "name": "No description" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());

    let mut wrong_type = report_body(&json!(1));
    wrong_type["agency_id"] = json!("one");
    let (status, _) = app.post("/reports/", &wrong_type).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .client
        .post(app.url("/agencies/"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (_, agencies) = app.get("/agencies/").await;
    assert_eq!(agencies, json!([]));
}

#[tokio::test]
async fn unknown_report_ids_are_not_found() {
    let app = TestApp::spawn().await;
    let agency = app.create_agency().await;

    let (status, _) = app.get("/reports/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.put("/reports/999", &report_body(&agency["id"])).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.delete("/reports/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Report not found");
}

#[tokio::test]
async fn non_integer_report_id_is_unprocessable() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/reports/abc").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn listing_embeds_each_reports_agency() {
    let app = TestApp::spawn().await;
    let x = app.create_agency().await;
    let (_, y) = app
        .post(
            "/agencies",
            &json!({ "name": "Registry Y", "description": "Public records" }),
        )
        .await;

    app.post("/reports/", &report_body(&x["id"])).await;
    app.post("/reports", &report_body(&y["id"])).await;

    let (status, reports) = app.get("/reports").await;
    assert_eq!(status, StatusCode::OK);
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["agency"], x);
    assert_eq!(reports[1]["agency"], y);
}

#[tokio::test]
async fn health_reports_version() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
