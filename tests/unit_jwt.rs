use scholaris_auth::{create_access_token, verify_token};
use scholaris_config::JwtConfig;
use scholaris_models::AdminRole;
use uuid::Uuid;

fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
    }
}

#[test]
fn test_token_carries_every_role() {
    let jwt_config = get_test_jwt_config();

    for role in AdminRole::VALUES {
        let role: AdminRole = role.parse().unwrap();
        let admin_id = Uuid::new_v4();
        let token =
            create_access_token(admin_id, "office@school.edu", role.as_str(), &jwt_config).unwrap();

        let claims = verify_token(&token, &jwt_config).unwrap();
        assert_eq!(claims.admin_id(), Some(admin_id));
        assert_eq!(claims.role.parse::<AdminRole>().unwrap(), role);
    }
}

#[test]
fn test_token_rejected_after_secret_rotation() {
    let token = create_access_token(
        Uuid::new_v4(),
        "office@school.edu",
        AdminRole::Admin.as_str(),
        &get_test_jwt_config(),
    )
    .unwrap();

    let rotated = JwtConfig {
        secret: "rotated_secret".to_string(),
        ..get_test_jwt_config()
    };

    let err = verify_token(&token, &rotated).unwrap_err();
    assert_eq!(err.status.as_u16(), 401);
}

#[test]
fn test_tampered_token_rejected() {
    let jwt_config = get_test_jwt_config();
    let token = create_access_token(
        Uuid::new_v4(),
        "office@school.edu",
        AdminRole::Staff.as_str(),
        &jwt_config,
    )
    .unwrap();

    let mut parts: Vec<&str> = token.split('.').collect();
    let forged_payload = "eyJyb2xlIjoic3VwZXJfYWRtaW4ifQ";
    parts[1] = forged_payload;
    let forged = parts.join(".");

    assert!(verify_token(&forged, &jwt_config).is_err());
}
