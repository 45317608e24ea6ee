#![allow(dead_code)]

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use scholaris::router::init_router;
use scholaris::state::{AppConfig, AppState};
use scholaris_config::{
    CorsConfig, EmailConfig, JwtConfig, PaymentConfig, ServerConfig, StorageConfig,
};
use scholaris_core::hash_password;

pub const TEST_PAYMENT_KEY_ID: &str = "rzp_test_key";
pub const TEST_PAYMENT_SECRET: &str = "rzp_test_secret";
pub const TEST_PASSWORD: &str = "testpass123";

pub struct TestAdmin {
    pub id: Uuid,
    pub email: String,
    pub password: String,
}

pub fn test_config() -> AppConfig {
    let mut email = EmailConfig::from_env();
    email.enabled = false;

    let upload_dir = std::env::temp_dir().join(format!("scholaris-test-{}", Uuid::new_v4()));

    AppConfig {
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry: 3600,
        },
        email,
        payment: PaymentConfig {
            key_id: Some(TEST_PAYMENT_KEY_ID.to_string()),
            key_secret: Some(TEST_PAYMENT_SECRET.to_string()),
            currency: "INR".to_string(),
            // Nothing listens here; order creation fails fast.
            api_base: "http://127.0.0.1:9".to_string(),
        },
        cors: CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        server: ServerConfig::default(),
        storage: StorageConfig::local(upload_dir, "http://localhost:5000/uploads"),
    }
}

pub fn setup_test_app(pool: PgPool) -> Router {
    setup_test_app_with(pool, test_config())
}

pub fn setup_test_app_with(pool: PgPool, config: AppConfig) -> Router {
    let state = AppState::new(pool, config).unwrap();
    init_router(state)
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

/// Inserts an admin with `role` (`super_admin`, `admin` or `staff`).
pub async fn create_test_admin(pool: &PgPool, role: &str) -> TestAdmin {
    let email = generate_unique_email();
    let hashed = hash_password(TEST_PASSWORD).unwrap();

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO admins (name, email, password, role) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind("Test Admin")
    .bind(&email)
    .bind(&hashed)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap();

    TestAdmin {
        id,
        email,
        password: TEST_PASSWORD.to_string(),
    }
}

pub async fn get_auth_token(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

/// Creates an admin with `role` and returns a token for it.
pub async fn admin_token(app: &Router, pool: &PgPool, role: &str) -> String {
    let admin = create_test_admin(pool, role).await;
    get_auth_token(app, &admin.email, &admin.password).await
}

pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    read_response(response).await
}

pub async fn read_response(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

/// A file part of a test multipart body.
pub struct FilePart<'a> {
    pub field: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

const BOUNDARY: &str = "scholaris-test-boundary";

pub fn multipart_body(fields: &[(&str, &str)], files: &[FilePart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    for file in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.field, file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn send_multipart(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    fields: &[(&str, &str)],
    files: &[FilePart<'_>],
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = builder
        .body(Body::from(multipart_body(fields, files)))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    read_response(response).await
}

/// The smallest valid PNG: a 1x1 transparent pixel.
pub const PNG_PIXEL: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Admission form fields with the address in flattened form.
pub fn admission_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("studentName", "Asha Rao"),
        ("dateOfBirth", "2016-04-12"),
        ("gender", "female"),
        ("classApplied", "3"),
        ("fatherName", "Ravi Rao"),
        ("motherName", "Meera Rao"),
        ("phone", "+91 98765 43210"),
        ("fatherEmail", "ravi@example.com"),
        ("address.street", "12 MG Road"),
        ("address.city", "Pune"),
        ("address.state", "MH"),
        ("address.pincode", "411001"),
    ]
}

pub fn student_json(admission_number: Option<&str>) -> Value {
    let mut body = json!({
        "name": "Kabir Singh",
        "dateOfBirth": "2014-09-01",
        "gender": "male",
        "className": "5",
        "section": "B",
        "fatherName": "Arjun Singh",
        "motherName": "Priya Singh",
        "guardianPhone": "9876543210",
        "email": "kabir.parent@example.com",
        "address": {
            "street": "4 Park Street",
            "city": "Kolkata",
            "state": "WB",
            "pincode": "700016"
        }
    });
    if let Some(number) = admission_number {
        body["admissionNumber"] = json!(number);
    }
    body
}

/// Inserts a student through the API and returns its id.
pub async fn create_test_student(app: &Router, admin_token: &str) -> String {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/students",
        Some(admin_token),
        Some(student_json(None)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "student create failed: {body}");
    body["student"]["id"].as_str().unwrap().to_string()
}

/// Waits for the background worker to write at least `count` notifications
/// of `kind`.
pub async fn wait_for_notifications(pool: &PgPool, kind: &str, count: i64) -> i64 {
    let mut seen = 0;
    for _ in 0..50 {
        seen = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notifications WHERE type = $1")
            .bind(kind)
            .fetch_one(pool)
            .await
            .unwrap();
        if seen >= count {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    seen
}
