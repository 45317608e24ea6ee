//! JWT claim structures for authentication tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// JWT claims for admin access tokens.
///
/// The role is embedded for convenience only. Authorization decisions use
/// the role re-read from the database on every request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Admin ID (subject claim)
    pub sub: String,
    /// Admin email address
    pub email: String,
    /// Admin role at issue time
    pub role: String,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    /// Parses the subject back into an admin id.
    pub fn admin_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize() {
        let claims = Claims {
            sub: "admin-id-123".to_string(),
            email: "office@school.edu".to_string(),
            role: "admin".to_string(),
            exp: 1234567890,
            iat: 1234567800,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""sub":"admin-id-123""#));
        assert!(serialized.contains(r#""role":"admin""#));
    }

    #[test]
    fn test_claims_deserialize() {
        let json = r#"{"sub":"admin-456","email":"staff@school.edu","role":"staff","exp":9999999999,"iat":9999999900}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.sub, "admin-456");
        assert_eq!(claims.role, "staff");
        assert_eq!(claims.exp, 9999999999);
    }

    #[test]
    fn test_admin_id_parses_uuid_subject() {
        let id = Uuid::new_v4();
        let claims = Claims {
            sub: id.to_string(),
            email: "a@b.c".to_string(),
            role: "admin".to_string(),
            exp: 0,
            iat: 0,
        };
        assert_eq!(claims.admin_id(), Some(id));

        let bad = Claims {
            sub: "not-a-uuid".to_string(),
            ..claims
        };
        assert_eq!(bad.admin_id(), None);
    }
}
