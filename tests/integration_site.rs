mod common;

use axum::Router;
use axum::http::StatusCode;
use common::{
    FilePart, PNG_PIXEL, admin_token, send_json, send_multipart, setup_test_app,
    wait_for_notifications,
};
use serde_json::{Value, json};
use sqlx::PgPool;

fn teacher_fields(employee_id: &'static str, email: &'static str) -> Vec<(&'static str, &'static str)> {
    vec![
        ("employeeId", employee_id),
        ("name", "Sunita Iyer"),
        ("email", email),
        ("phone", "9812345678"),
        ("subject", "Mathematics"),
        ("experienceYears", "8"),
        ("designation", "PGT"),
    ]
}

async fn create_teacher(app: &Router, token: &str, fields: &[(&str, &str)]) -> (StatusCode, Value) {
    send_multipart(app, "POST", "/api/teachers", Some(token), fields, &[]).await
}

#[sqlx::test(migrations = "./migrations")]
async fn test_health(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send_json(&app, "GET", "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "OK");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teachers_public_listing_hides_inactive(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = admin_token(&app, &pool, "admin").await;

    let (status, body) =
        create_teacher(&app, &token, &teacher_fields("EMP-001", "sunita@school.test")).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["teacher"]["experienceYears"], 8);

    let mut inactive = teacher_fields("EMP-002", "vikram@school.test");
    inactive.push(("isActive", "false"));
    let (status, body) = create_teacher(&app, &token, &inactive).await;
    assert_eq!(status, StatusCode::CREATED);
    let inactive_id = body["teacher"]["id"].as_str().unwrap().to_string();

    let (status, body) = send_json(&app, "GET", "/api/teachers", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["teachers"][0]["employeeId"], "EMP-001");

    let (_, body) = send_json(&app, "GET", "/api/teachers?includeInactive=true", None, None).await;
    assert_eq!(body["total"], 1);

    let (_, body) = send_json(
        &app,
        "GET",
        "/api/teachers?includeInactive=true",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["total"], 2);

    let (status, _) = send_json(
        &app,
        "GET",
        &format!("/api/teachers/{}", inactive_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_duplicate_employee_id(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = admin_token(&app, &pool, "admin").await;

    create_teacher(&app, &token, &teacher_fields("EMP-010", "a@school.test")).await;
    let (status, body) =
        create_teacher(&app, &token, &teacher_fields("EMP-010", "b@school.test")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "A teacher with this employee ID or email already exists"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_write_requires_admin(pool: PgPool) {
    let app = setup_test_app(pool.clone());

    let fields = teacher_fields("EMP-020", "c@school.test");
    let (status, _) = send_multipart(&app, "POST", "/api/teachers", None, &fields, &[]).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let staff = admin_token(&app, &pool, "staff").await;
    let (status, _) = create_teacher(&app, &staff, &fields).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_notices_visibility(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = admin_token(&app, &pool, "admin").await;

    let (status, body) = send_multipart(
        &app,
        "POST",
        "/api/notices",
        Some(&token),
        &[
            ("title", "Annual day"),
            ("content", "Annual day is on Friday."),
            ("category", "event"),
            ("priority", "high"),
        ],
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["notice"]["category"], "event");

    let (status, body) = send_multipart(
        &app,
        "POST",
        "/api/notices",
        Some(&token),
        &[
            ("title", "Draft circular"),
            ("content", "Not ready yet."),
            ("isPublished", "false"),
        ],
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let draft_id = body["notice"]["id"].as_str().unwrap().to_string();

    let (status, body) = send_json(&app, "GET", "/api/notices", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["notices"][0]["title"], "Annual day");

    let (status, _) = send_json(
        &app,
        "GET",
        &format!("/api/notices/{}", draft_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&app, "GET", "/api/notices/all", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send_json(&app, "GET", "/api/notices/all", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_notice_rejects_expiry_before_publish(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = admin_token(&app, &pool, "admin").await;

    let (status, body) = send_multipart(
        &app,
        "POST",
        "/api/notices",
        Some(&token),
        &[
            ("title", "Exam schedule"),
            ("content", "See attached."),
            ("publishDate", "2026-03-10T00:00:00Z"),
            ("expiryDate", "2026-03-01T00:00:00Z"),
        ],
        &[],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "expiryDate must be after publishDate");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_gallery_requires_image(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = admin_token(&app, &pool, "admin").await;

    let (status, body) = send_multipart(
        &app,
        "POST",
        "/api/gallery",
        Some(&token),
        &[("title", "Sports day")],
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "image is required");

    let (status, body) = send_multipart(
        &app,
        "POST",
        "/api/gallery",
        Some(&token),
        &[("title", "Sports day"), ("category", "sports")],
        &[FilePart {
            field: "image",
            file_name: "track.png",
            content_type: "image/png",
            bytes: PNG_PIXEL,
        }],
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let item = &body["item"];
    assert!(
        item["imageUrl"]
            .as_str()
            .is_some_and(|url| url.starts_with("http://localhost:5000/uploads/gallery/"))
    );
    let id = item["id"].as_str().unwrap().to_string();

    let (status, body) = send_json(&app, "GET", "/api/gallery", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/api/gallery/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send_json(&app, "GET", "/api/gallery", None, None).await;
    assert_eq!(body["total"], 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_content_blocks_by_key(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = admin_token(&app, &pool, "admin").await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/content",
        Some(&token),
        Some(json!({
            "key": "home-banner",
            "title": "Welcome",
            "body": "Admissions open for 2026-27",
            "metadata": { "cta": "/admissions" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let id = body["content"]["id"].as_str().unwrap().to_string();

    let (status, body) = send_json(&app, "GET", "/api/content/home-banner", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["metadata"]["cta"], "/admissions");

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/content",
        Some(&token),
        Some(json!({ "key": "home-banner", "title": "Again", "body": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app,
        "PUT",
        &format!("/api/content/{}", id),
        Some(&token),
        Some(json!({ "isActive": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(&app, "GET", "/api/content/home-banner", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send_json(&app, "GET", "/api/content", None, None).await;
    assert_eq!(body["count"], 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_contact_form_flow(pool: PgPool) {
    let app = setup_test_app(pool.clone());

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/contacts",
        None,
        Some(json!({
            "name": "Neha Gupta",
            "email": "neha@example.com",
            "subject": "Bus routes",
            "message": "Does the school bus cover Baner?"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["contact"]["status"], "new");
    let id = body["contact"]["id"].as_str().unwrap().to_string();

    assert_eq!(wait_for_notifications(&pool, "contact", 1).await, 1);

    let (status, _) = send_json(&app, "GET", "/api/contacts", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let staff = admin_token(&app, &pool, "staff").await;
    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/api/contacts/{}/status", id),
        Some(&staff),
        Some(json!({ "status": "replied" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contact"]["status"], "replied");

    let (_, body) = send_json(
        &app,
        "GET",
        "/api/contacts?status=replied",
        Some(&staff),
        None,
    )
    .await;
    assert_eq!(body["total"], 1);

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/api/contacts/{}", id),
        Some(&staff),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_contact_form_validation(pool: PgPool) {
    let app = setup_test_app(pool.clone());

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/contacts",
        None,
        Some(json!({
            "name": "Neha Gupta",
            "email": "not-an-email",
            "subject": "Bus routes",
            "message": "Hello"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_notifications_read_flow(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    for subject in ["Fees", "Transport"] {
        send_json(
            &app,
            "POST",
            "/api/contacts",
            None,
            Some(json!({
                "name": "Parent",
                "email": "parent@example.com",
                "subject": subject,
                "message": "Question"
            })),
        )
        .await;
    }
    assert_eq!(wait_for_notifications(&pool, "contact", 2).await, 2);

    let token = admin_token(&app, &pool, "staff").await;

    let (status, body) =
        send_json(&app, "GET", "/api/notifications/unread-count", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let (status, body) = send_json(
        &app,
        "GET",
        "/api/notifications?type=contact",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["unreadCount"], 2);
    let first = body["notifications"][0]["id"].as_str().unwrap().to_string();

    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/api/notifications/{}/read", first),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notification"]["isRead"], true);

    let (status, body) =
        send_json(&app, "PUT", "/api/notifications/read-all", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 1);

    let (_, body) =
        send_json(&app, "GET", "/api/notifications/unread-count", Some(&token), None).await;
    assert_eq!(body["count"], 0);

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/api/notifications/{}", first),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send_json(&app, "GET", "/api/notifications", Some(&token), None).await;
    assert_eq!(body["total"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_notifications_require_auth(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, _) = send_json(&app, "GET", "/api/notifications", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
