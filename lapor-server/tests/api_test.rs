//! HTTP integration tests
//!
//! Drives the full router (middleware included) in-process with
//! `tower::ServiceExt::oneshot` against an in-memory store.

use axum::Router;
use axum::body::Body;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use image::{ImageFormat, Rgba, RgbaImage};
use serde_json::{Value, json};
use shared::models::{Actor, Partner, Role};
use std::io::Cursor;
use tower::ServiceExt;

use lapor_server::auth::JwtConfig;
use lapor_server::routes::build_app;
use lapor_server::{Config, RedbStore, ServerState};

struct TestApp {
    app: Router,
    state: ServerState,
}

impl TestApp {
    fn new() -> Self {
        let store = RedbStore::open_in_memory().unwrap();
        store
            .upsert_partners(&[Partner {
                id: "p-1".into(),
                full_name: "CV Mitra Sejahtera".into(),
                district: "Bandung".into(),
            }])
            .unwrap();

        let mut config = Config::with_overrides("/tmp/lapor-test", 0);
        config.jwt = JwtConfig {
            secret: "integration-test-secret-0123456789abcdef".into(),
            expiration_minutes: 60,
            issuer: "lapor-server".into(),
            audience: "lapor-clients".into(),
        };

        let state = ServerState::with_store(config, store);
        let app = build_app(&state);
        Self { app, state }
    }

    fn token(&self, actor: &Actor) -> String {
        self.state.jwt_service().generate_token(actor).unwrap()
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        actor: Option<&Actor>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(actor) = actor {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(actor)));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

fn sekolah() -> Actor {
    Actor::new("u-sekolah", "sdn1", Role::Sekolah, "Bu Sari").with_school("sch-1")
}

fn other_sekolah() -> Actor {
    Actor::new("u-sekolah-2", "sdn2", Role::Sekolah, "Pak Joko").with_school("sch-2")
}

fn murid() -> Actor {
    Actor::new("u-murid", "budi", Role::Murid, "Budi").with_school("sch-1")
}

fn daerah() -> Actor {
    Actor::new("u-daerah", "dinas", Role::Daerah, "Pak Andi")
}

fn pusat() -> Actor {
    Actor::new("u-pusat", "pusat", Role::Pusat, "Ibu Rina")
}

fn png_data_url(stroke: bool) -> String {
    let mut img = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]));
    if stroke {
        for i in 0..8 {
            img.put_pixel(i, 7 - i, Rgba([0, 0, 0, 255]));
        }
    }
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    format!("data:image/png;base64,{}", STANDARD.encode(buf.into_inner()))
}

async fn open_ticket(app: &TestApp) -> String {
    let (status, body) = app
        .send(
            "POST",
            "/api/tickets",
            Some(&sekolah()),
            Some(json!({
                "title": "Nasi basi",
                "description": "Nasi berbau asam saat dibagikan",
                "category": "Kualitas Makanan",
                "school_name": "SDN 1 Bandung"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new();
    let (status, body) = app.send("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = app.send("GET", "/health/detailed", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["store"]["status"], "ok");
}

#[tokio::test]
async fn test_missing_or_bad_token() {
    let app = TestApp::new();
    let (status, body) = app.send("GET", "/api/tickets", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let request = Request::builder()
        .uri("/api/tickets")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    let response = app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let app = TestApp::new();
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.app.clone().oneshot(request).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_full_lifecycle_over_http() {
    let app = TestApp::new();
    let id = open_ticket(&app).await;

    let (status, body) = app
        .send(
            "POST",
            &format!("/api/tickets/{id}/escalate"),
            Some(&daerah()),
            Some(json!({ "signature": png_data_url(true) })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "escalated");

    let (status, body) = app
        .send(
            "POST",
            &format!("/api/tickets/{id}/approve"),
            Some(&pusat()),
            Some(json!({ "signature": png_data_url(true), "note": "Sudah ditindaklanjuti" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "resolved");
    assert_eq!(body["comments"].as_array().unwrap().len(), 2);

    let (status, body) = app
        .send(
            "GET",
            &format!("/api/tickets/{id}/ledger/verify"),
            Some(&daerah()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["chain_intact"], true);
    assert_eq!(body["total_entries"], 2);

    // Terminal: nobody can act any more
    let (status, body) = app
        .send(
            "POST",
            &format!("/api/tickets/{id}/reject"),
            Some(&pusat()),
            Some(json!({ "signature": png_data_url(true) })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");
    assert_eq!(body["code"], 4002);
}

#[tokio::test]
async fn test_blank_signature_is_rejected() {
    let app = TestApp::new();
    let id = open_ticket(&app).await;

    let (status, body) = app
        .send(
            "POST",
            &format!("/api/tickets/{id}/escalate"),
            Some(&daerah()),
            Some(json!({ "signature": png_data_url(false) })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 5001);

    let (_, body) = app
        .send("GET", &format!("/api/tickets/{id}"), Some(&daerah()), None)
        .await;
    assert_eq!(body["status"], "pending");
    assert!(body["comments"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_other_school_sees_not_found() {
    let app = TestApp::new();
    let id = open_ticket(&app).await;

    let (status, body) = app
        .send("GET", &format!("/api/tickets/{id}"), Some(&other_sekolah()), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);

    let (status, body) = app
        .send("GET", "/api/tickets", Some(&other_sekolah()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_filters_by_status() {
    let app = TestApp::new();
    let first = open_ticket(&app).await;
    let _second = open_ticket(&app).await;

    app.send(
        "POST",
        &format!("/api/tickets/{first}/reject"),
        Some(&daerah()),
        Some(json!({ "signature": png_data_url(true) })),
    )
    .await;

    let (status, body) = app
        .send("GET", "/api/tickets?status=pending", Some(&daerah()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let tickets = body.as_array().unwrap();
    assert_eq!(tickets.len(), 1);
    assert_ne!(tickets[0]["id"], first.as_str());
}

#[tokio::test]
async fn test_murid_cannot_open_school_ticket() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            "POST",
            "/api/tickets",
            Some(&murid()),
            Some(json!({
                "title": "Nasi basi",
                "category": "Kualitas Makanan",
                "school_name": "SDN 1 Bandung"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2001);
}

#[tokio::test]
async fn test_student_report_flow() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            "POST",
            "/api/tickets/student-report",
            Some(&murid()),
            Some(json!({
                "title": "Sayur mentah",
                "school_name": "SDN 1 Bandung",
                "photo": png_data_url(true)
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["category"], "Laporan Siswa");
    assert_eq!(body["student_reports"].as_array().unwrap().len(), 1);

    let (status, body) = app
        .send("GET", "/api/student-reports", Some(&sekolah()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Regional staff must name the school
    let (status, _) = app
        .send("GET", "/api/student-reports", Some(&daerah()), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            "GET",
            "/api/student-reports?school_id=sch-1",
            Some(&daerah()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_mitra_assignment() {
    let app = TestApp::new();
    let id = open_ticket(&app).await;

    let (status, body) = app.send("GET", "/api/partners", Some(&daerah()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["full_name"], "CV Mitra Sejahtera");

    let (status, body) = app
        .send(
            "POST",
            &format!("/api/tickets/{id}/mitra"),
            Some(&daerah()),
            Some(json!({ "name": "CV Mitra Sejahtera" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["assigned_mitra"], json!(["CV Mitra Sejahtera"]));

    let (status, body) = app
        .send(
            "DELETE",
            &format!("/api/tickets/{id}/mitra/5"),
            Some(&daerah()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"]["len"], 1);

    let (status, body) = app
        .send(
            "DELETE",
            &format!("/api/tickets/{id}/mitra/0"),
            Some(&daerah()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["assigned_mitra"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_capabilities_and_advice() {
    let app = TestApp::new();
    let id = open_ticket(&app).await;

    let (status, body) = app
        .send(
            "GET",
            &format!("/api/tickets/{id}/capabilities"),
            Some(&pusat()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["can_contribute"], false);
    assert!(body["actions"].as_array().unwrap().is_empty());

    let (status, body) = app
        .send("GET", &format!("/api/tickets/{id}/advice"), Some(&pusat()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["guidance"].as_str().unwrap().starts_with("Mode pemantauan"));
}

#[tokio::test]
async fn test_set_priority() {
    let app = TestApp::new();
    let id = open_ticket(&app).await;

    let (status, body) = app
        .send(
            "PUT",
            &format!("/api/tickets/{id}/priority"),
            Some(&daerah()),
            Some(json!({ "priority": "critical" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["priority"], "critical");
}

#[tokio::test]
async fn test_large_attachment_fits_body_limit() {
    let app = TestApp::new();
    let id = open_ticket(&app).await;

    let photo = STANDARD.encode(vec![0xAB; 3 * 1024 * 1024]);
    let (status, body) = app
        .send(
            "POST",
            &format!("/api/tickets/{id}/comments"),
            Some(&sekolah()),
            Some(json!({
                "message": "Foto porsi siang",
                "attachment": format!("data:image/jpeg;base64,{photo}")
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["comments"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_oversized_body_gets_json_error() {
    let app = TestApp::new();
    let id = open_ticket(&app).await;

    let photo = STANDARD.encode(vec![0xAB; 6 * 1024 * 1024]);
    let (status, body) = app
        .send(
            "POST",
            &format!("/api/tickets/{id}/comments"),
            Some(&sekolah()),
            Some(json!({ "attachment": photo })),
        )
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["code"], 5003);
}

#[tokio::test]
async fn test_malformed_body_gets_json_error() {
    let app = TestApp::new();
    let id = open_ticket(&app).await;

    let (status, body) = app
        .send(
            "PUT",
            &format!("/api/tickets/{id}/priority"),
            Some(&daerah()),
            Some(json!({ "priority": "urgent-ish" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
}
