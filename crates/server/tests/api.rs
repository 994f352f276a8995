use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::{ServerOptions, ServerState, router};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    router(ServerState {
        engine: Arc::new(engine),
        options: ServerOptions::default(),
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn expense_lifecycle() {
    let app = app().await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/expenses",
        Some(json!({
            "date": "2025-04-01",
            "description": "phở bò",
            "amount": 45000,
            "category": "Ăn uống"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["category"], "food");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/expenses/{id}"),
        Some(json!({ "amount": 50000 })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, listed) = send(&app, Method::GET, "/expenses?date=2025-04-01", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["records"][0]["amount"], 50000);

    let (status, _) = send(&app, Method::DELETE, &format!("/expenses/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::DELETE, &format!("/expenses/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn invalid_records_are_unprocessable() {
    let app = app().await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/incomes",
        Some(json!({
            "date": "2025-04-01",
            "description": "phở",
            "amount": 45000,
            "category": "food"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        Method::POST,
        "/expenses",
        Some(json!({
            "date": "2025-04-01",
            "description": "  ",
            "amount": 1,
            "category": "food"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, Method::GET, "/expenses?date=2025-04-01&from=2025-04-01", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn attendance_and_salary() {
    let app = app().await;

    for (date, kind) in [("2025-04-01", "full_day"), ("2025-04-02", "half_day")] {
        let (status, _) = send(
            &app,
            Method::PUT,
            "/attendance",
            Some(json!({ "date": date, "attendance_type": kind })),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    let (status, _) = send(
        &app,
        Method::PUT,
        "/attendance",
        Some(json!({ "date": "2025-04-06", "attendance_type": "full_day" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, listed) = send(&app, Method::GET, "/attendance?month=2025-04", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["markings"].as_array().unwrap().len(), 2);

    let (status, estimate) = send(
        &app,
        Method::GET,
        "/salary?month=2025-04&monthly_salary=10000000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(estimate["working_days"], 26);
    let salary = estimate["estimated_salary"].as_f64().unwrap();
    assert!((salary - 576_923.076_923).abs() < 1e-3);

    let (status, _) = send(&app, Method::DELETE, "/attendance/2025-04-02", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn reports_over_seeded_records() {
    let app = app().await;
    for (uri, date, amount, category) in [
        ("/expenses", "2025-03-10", 1_000_000, "food"),
        ("/expenses", "2025-04-01", 900_000, "transport"),
        ("/expenses", "2025-04-30", 600_000, "shopping"),
        ("/incomes", "2025-04-05", 10_000_000, "salary"),
    ] {
        let (status, _) = send(
            &app,
            Method::POST,
            uri,
            Some(json!({
                "date": date,
                "description": "seed",
                "amount": amount,
                "category": category
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, stats) = send(&app, Method::GET, "/stats/2025-04", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total"], 1_500_000);
    assert_eq!(stats["previous_total"], 1_000_000);
    assert_eq!(stats["peak_day"]["date"], "2025-04-01");

    let (status, history) = send(&app, Method::GET, "/history?anchor=2025-04&months=3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["rows"].as_array().unwrap().len(), 3);
    assert_eq!(history["rows"][0]["month"], "2025-02");
    assert_eq!(history["rows"][2]["balance"], 8_500_000);

    let (status, _) = send(&app, Method::GET, "/history?anchor=2025-04&months=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, detail) = send(&app, Method::GET, "/months/2025-04", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["expense_count"], 2);
    assert_eq!(detail["income_count"], 1);
    assert_eq!(detail["expense_breakdown"][0]["category"], "transport");

    let (status, calendar) = send(&app, Method::GET, "/calendar/2025-04", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(calendar["days"].as_array().unwrap().len(), 2);

    let (status, _) = send(&app, Method::GET, "/stats/April", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn csv_import_reports_each_row() {
    let app = app().await;
    let csv = "amount,type,time,note\n\
               45.000,expense,2025-04-01T08:00:00+07:00,phở\n\
               abc,expense,2025-04-01,???\n\
               30000,income,2025-04-01,thưởng\n\
               120000,expense,sometime,tiền điện\n";

    let request = Request::builder()
        .method(Method::POST)
        .uri("/import?invalid_date=reject")
        .header(CONTENT_TYPE, "text/csv")
        .body(Body::from(csv))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let report: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(report["total"], 3);
    assert_eq!(report["success"], 1);
    assert_eq!(report["errors"].as_array().unwrap().len(), 2);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/import")
        .header(CONTENT_TYPE, "text/csv")
        .body(Body::from("amount,type,time,note\n"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
