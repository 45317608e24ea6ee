mod common;

use axum::http::StatusCode;
use common::{admin_token, create_test_student, send_json, setup_test_app, student_json};
use scholaris_models::numbers::is_admission_number;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_generates_admission_number(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = admin_token(&app, &pool, "admin").await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/students",
        Some(&token),
        Some(student_json(None)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    let student = &body["student"];
    assert!(is_admission_number(
        student["admissionNumber"].as_str().unwrap()
    ));
    assert_eq!(student["name"], "Kabir Singh");
    assert_eq!(student["address"]["city"], "Kolkata");
    assert_eq!(student["isActive"], true);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_duplicate_admission_number(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = admin_token(&app, &pool, "admin").await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/students",
        Some(&token),
        Some(student_json(Some("ADM202600042"))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["student"]["admissionNumber"], "ADM202600042");

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/students",
        Some(&token),
        Some(student_json(Some("ADM202600042"))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Admission number ADM202600042 already exists");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_validation(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = admin_token(&app, &pool, "admin").await;

    let mut body = student_json(None);
    body["email"] = json!("not-an-email");
    let (status, response) =
        send_json(&app, "POST", "/api/students", Some(&token), Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["success"], false);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_staff_can_read_but_not_write(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = admin_token(&app, &pool, "admin").await;
    let id = create_test_student(&app, &admin).await;
    let staff = admin_token(&app, &pool, "staff").await;

    let (status, _) = send_json(
        &app,
        "GET",
        &format!("/api/students/{}", id),
        Some(&staff),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/students",
        Some(&staff),
        Some(student_json(None)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/api/students/{}", id),
        Some(&staff),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_students_require_auth(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, _) = send_json(&app, "GET", "/api/students", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_students_filters_and_search(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = admin_token(&app, &pool, "admin").await;
    create_test_student(&app, &token).await;

    let mut other = student_json(None);
    other["name"] = json!("Zoya Khan");
    other["className"] = json!("7");
    send_json(&app, "POST", "/api/students", Some(&token), Some(other)).await;

    let (status, body) = send_json(&app, "GET", "/api/students", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["page"], 1);

    let (_, body) = send_json(
        &app,
        "GET",
        "/api/students?className=7",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["students"][0]["name"], "Zoya Khan");

    let (_, body) = send_json(
        &app,
        "GET",
        "/api/students?search=kabir",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["students"][0]["name"], "Kabir Singh");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_student_partial(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = admin_token(&app, &pool, "admin").await;
    let id = create_test_student(&app, &token).await;

    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/api/students/{}", id),
        Some(&token),
        Some(json!({ "section": "C", "rollNumber": "31", "isActive": false })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    let student = &body["student"];
    assert_eq!(student["section"], "C");
    assert_eq!(student["rollNumber"], "31");
    assert_eq!(student["isActive"], false);
    assert_eq!(student["name"], "Kabir Singh");
    assert_eq!(student["address"]["pincode"], "700016");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_student(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = admin_token(&app, &pool, "admin").await;
    let id = create_test_student(&app, &token).await;
    let uri = format!("/api/students/{}", id);

    let (status, _) = send_json(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_student_with_fees_keeps_ledger(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = admin_token(&app, &pool, "admin").await;
    let id = create_test_student(&app, &token).await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/fees",
        Some(&token),
        Some(json!({ "studentId": id, "feeStructure": { "tuitionFee": 1000 } })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let fee_id = body["fee"]["id"].as_str().unwrap().to_string();

    let (status, _) = send_json(
        &app,
        "POST",
        &format!("/api/fees/{}/manual-payment", fee_id),
        Some(&token),
        Some(json!({ "amount": 400, "paymentMode": "Cash" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(
        &app,
        "DELETE",
        &format!("/api/students/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Student has fee records");

    let payments = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM fee_payments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(payments, 1);

    let (status, _) = send_json(
        &app,
        "GET",
        &format!("/api/students/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_students_huge_page_is_empty(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = admin_token(&app, &pool, "admin").await;
    create_test_student(&app, &token).await;

    let (status, body) = send_json(
        &app,
        "GET",
        "/api/students?page=9223372036854775807&limit=100",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["count"], 0);
    assert_eq!(body["total"], 1);
}
