mod common;

use axum::Router;
use axum::http::StatusCode;
use common::{
    TEST_PAYMENT_SECRET, admin_token, create_test_student, send_json, setup_test_app,
    wait_for_notifications,
};
use scholaris::utils::payment_gateway::sign;
use scholaris_models::numbers::is_receipt_number;
use serde_json::{Value, json};
use sqlx::PgPool;

async fn create_fee(app: &Router, token: &str, student_id: &str) -> Value {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/fees",
        Some(token),
        Some(json!({
            "studentId": student_id,
            "feeStructure": { "tuitionFee": 1000, "libraryFee": "200", "transportFee": null },
            "dueDate": "2026-12-31"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "fee create failed: {body}");
    body["fee"].clone()
}

async fn payment_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM fee_payments")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_fee_totals_structure(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = admin_token(&app, &pool, "admin").await;
    let student_id = create_test_student(&app, &token).await;

    let fee = create_fee(&app, &token, &student_id).await;

    assert_eq!(fee["totalAmount"], 1200.0);
    assert_eq!(fee["paidAmount"], 0.0);
    assert_eq!(fee["pendingAmount"], 1200.0);
    assert_eq!(fee["status"], "pending");
    assert_eq!(fee["className"], "5");
    assert_eq!(fee["feeStructure"]["libraryFee"], 200.0);
    assert!(fee["feeStructure"].get("transportFee").is_none());
    assert_eq!(fee["student"]["name"], "Kabir Singh");
    assert_eq!(fee["payments"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_fee_rejects_negative_component(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = admin_token(&app, &pool, "admin").await;
    let student_id = create_test_student(&app, &token).await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/fees",
        Some(&token),
        Some(json!({ "studentId": student_id, "feeStructure": { "tuitionFee": -5 } })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("tuitionFee"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_fee_unknown_student(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = admin_token(&app, &pool, "admin").await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/fees",
        Some(&token),
        Some(json!({
            "studentId": uuid::Uuid::new_v4(),
            "feeStructure": { "tuitionFee": 1000 }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_staff_cannot_create_fee(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = admin_token(&app, &pool, "admin").await;
    let student_id = create_test_student(&app, &admin).await;
    let staff = admin_token(&app, &pool, "staff").await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/fees",
        Some(&staff),
        Some(json!({ "studentId": student_id, "feeStructure": { "tuitionFee": 1000 } })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_manual_payments_move_status(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = admin_token(&app, &pool, "admin").await;
    let student_id = create_test_student(&app, &token).await;
    let fee_id = create_fee(&app, &token, &student_id).await["id"]
        .as_str()
        .unwrap()
        .to_string();
    let uri = format!("/api/fees/{}/manual-payment", fee_id);

    let (status, body) = send_json(
        &app,
        "POST",
        &uri,
        Some(&token),
        Some(json!({ "amount": 500, "paymentMode": "Cash" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(is_receipt_number(body["receiptNumber"].as_str().unwrap()));
    assert_eq!(body["fee"]["status"], "partial");
    assert_eq!(body["fee"]["paidAmount"], 500.0);
    assert_eq!(body["fee"]["pendingAmount"], 700.0);

    let (status, body) = send_json(
        &app,
        "POST",
        &uri,
        Some(&token),
        Some(json!({ "amount": 700, "paymentMode": "Cheque", "transactionId": "CHQ-118" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fee"]["status"], "paid");
    assert_eq!(body["fee"]["pendingAmount"], 0.0);

    let payments = body["fee"]["payments"].as_array().unwrap();
    assert_eq!(payments.len(), 2);
    assert_ne!(payments[0]["receiptNumber"], payments[1]["receiptNumber"]);
    assert_eq!(payments[1]["paymentMode"], "Cheque");

    assert_eq!(wait_for_notifications(&pool, "payment", 2).await, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_manual_payment_rejects_zero_amount(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = admin_token(&app, &pool, "admin").await;
    let student_id = create_test_student(&app, &token).await;
    let fee_id = create_fee(&app, &token, &student_id).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, _) = send_json(
        &app,
        "POST",
        &format!("/api/fees/{}/manual-payment", fee_id),
        Some(&token),
        Some(json!({ "amount": 0, "paymentMode": "Cash" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payment_count(&pool).await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_verify_payment_with_valid_signature(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = admin_token(&app, &pool, "admin").await;
    let student_id = create_test_student(&app, &admin).await;
    let fee_id = create_fee(&app, &admin, &student_id).await["id"]
        .as_str()
        .unwrap()
        .to_string();
    let staff = admin_token(&app, &pool, "staff").await;

    let signature = sign(TEST_PAYMENT_SECRET, "order_ABC123", "pay_XYZ789");
    let (status, body) = send_json(
        &app,
        "POST",
        &format!("/api/fees/{}/verify-payment", fee_id),
        Some(&staff),
        Some(json!({
            "razorpayOrderId": "order_ABC123",
            "razorpayPaymentId": "pay_XYZ789",
            "razorpaySignature": signature,
            "amount": 1200,
            "paymentMode": "Cash"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["fee"]["status"], "paid");
    let payment = &body["fee"]["payments"][0];
    assert_eq!(payment["paymentMode"], "Online");
    assert_eq!(payment["transactionId"], "pay_XYZ789");
    assert_eq!(payment["razorpayOrderId"], "order_ABC123");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_verify_payment_bad_signature_records_nothing(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = admin_token(&app, &pool, "admin").await;
    let student_id = create_test_student(&app, &token).await;
    let fee_id = create_fee(&app, &token, &student_id).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let signature = sign("some-other-secret", "order_ABC123", "pay_XYZ789");
    let (status, body) = send_json(
        &app,
        "POST",
        &format!("/api/fees/{}/verify-payment", fee_id),
        Some(&token),
        Some(json!({
            "razorpayOrderId": "order_ABC123",
            "razorpayPaymentId": "pay_XYZ789",
            "razorpaySignature": signature,
            "amount": 1200
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Payment verification failed");
    assert_eq!(payment_count(&pool).await, 0);

    let (_, body) = send_json(
        &app,
        "GET",
        &format!("/api/fees/{}", fee_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["fee"]["status"], "pending");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_payment_order_surfaces_gateway_failure(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = admin_token(&app, &pool, "admin").await;
    let student_id = create_test_student(&app, &token).await;
    let fee_id = create_fee(&app, &token, &student_id).await["id"]
        .as_str()
        .unwrap()
        .to_string();
    let uri = format!("/api/fees/{}/payment", fee_id);

    let (status, _) = send_json(&app, "POST", &uri, Some(&token), Some(json!({ "amount": 0 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) =
        send_json(&app, "POST", &uri, Some(&token), Some(json!({ "amount": 500 }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_fees_and_list_filters(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = admin_token(&app, &pool, "admin").await;
    let student_id = create_test_student(&app, &token).await;
    create_fee(&app, &token, &student_id).await;
    create_fee(&app, &token, &student_id).await;

    let (status, body) = send_json(
        &app,
        "GET",
        &format!("/api/fees/student/{}", student_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["fees"].as_array().unwrap().len(), 2);

    let (status, body) = send_json(
        &app,
        "GET",
        &format!("/api/fees?studentId={}&status=pending&limit=1", student_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["count"], 1);
    assert_eq!(body["pages"], 2);

    let (status, _) = send_json(
        &app,
        "GET",
        &format!("/api/fees/student/{}", uuid::Uuid::new_v4()),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_fees_require_auth(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, _) = send_json(&app, "GET", "/api/fees", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_payments_are_all_counted(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = admin_token(&app, &pool, "admin").await;
    let student_id = create_test_student(&app, &token).await;
    let fee_id = create_fee(&app, &token, &student_id).await["id"]
        .as_str()
        .unwrap()
        .to_string();
    let uri = format!("/api/fees/{}/manual-payment", fee_id);

    let mut payments = tokio::task::JoinSet::new();
    for _ in 0..10 {
        let (app, uri, token) = (app.clone(), uri.clone(), token.clone());
        payments.spawn(async move {
            send_json(
                &app,
                "POST",
                &uri,
                Some(&token),
                Some(json!({ "amount": 100, "paymentMode": "Cash" })),
            )
            .await
            .0
        });
    }
    while let Some(status) = payments.join_next().await {
        assert_eq!(status.unwrap(), StatusCode::OK);
    }

    let (_, body) = send_json(
        &app,
        "GET",
        &format!("/api/fees/{}", fee_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["fee"]["paidAmount"], 1000.0);
    assert_eq!(body["fee"]["pendingAmount"], 200.0);
    assert_eq!(body["fee"]["status"], "partial");
    assert_eq!(payment_count(&pool).await, 10);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_payment_succeeds_when_notifications_fail(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = admin_token(&app, &pool, "admin").await;
    let student_id = create_test_student(&app, &token).await;
    let fee_id = create_fee(&app, &token, &student_id).await["id"]
        .as_str()
        .unwrap()
        .to_string();
    sqlx::query("ALTER TABLE notifications RENAME TO notifications_unavailable")
        .execute(&pool)
        .await
        .unwrap();

    let (status, body) = send_json(
        &app,
        "POST",
        &format!("/api/fees/{}/manual-payment", fee_id),
        Some(&token),
        Some(json!({ "amount": 1200, "paymentMode": "Cash" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["fee"]["status"], "paid");
    assert!(is_receipt_number(body["receiptNumber"].as_str().unwrap()));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_fee_rejects_overflowing_total(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let token = admin_token(&app, &pool, "admin").await;
    let student_id = create_test_student(&app, &token).await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/fees",
        Some(&token),
        Some(json!({ "studentId": student_id, "feeStructure": { "a": 1e308, "b": 1e308 } })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["success"], false);
}
