//! services/api/src/web/token.rs
//!
//! JWT issuing and verification. Tokens are HS256-signed with the secret
//! from the configuration and expire after seven days.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use recruit_core::domain::Role;

use crate::error::ApiError;

const TOKEN_LIFETIME_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account id.
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    /// Expiry as a unix timestamp.
    pub exp: i64,
}

/// Issues a signed token for the given account.
pub fn issue(secret: &str, account_id: Uuid, email: &str, role: Role) -> Result<String, ApiError> {
    let claims = Claims {
        sub: account_id,
        email: email.to_string(),
        role: role.as_str().to_string(),
        exp: (Utc::now() + Duration::days(TOKEN_LIFETIME_DAYS)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("failed to sign token: {e}")))
}

/// Verifies a token's signature and expiry, returning its claims.
pub fn verify(secret: &str, token: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::Unauthenticated("invalid or expired token".to_string()))
}

/// Extracts the bearer token from an `Authorization` header value.
pub fn bearer(header_value: &str) -> Result<&str, ApiError> {
    header_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthenticated("malformed authorization header".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_then_verify_round_trips_claims() {
        let account_id = Uuid::new_v4();
        let token = issue("test-secret", account_id, "a@b.c", Role::Student).unwrap();
        let claims = verify("test-secret", &token).unwrap();
        assert_eq!(claims.sub, account_id);
        assert_eq!(claims.email, "a@b.c");
        assert_eq!(claims.role, "STUDENT");
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let token = issue("secret-a", Uuid::new_v4(), "a@b.c", Role::Company).unwrap();
        assert!(verify("secret-b", &token).is_err());
    }

    #[test]
    fn verify_rejects_expired_token() {
        // Signed with the right secret but already past its expiry, well
        // beyond the default validation leeway.
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "a@b.c".to_string(),
            role: Role::Student.as_str().to_string(),
            exp: (Utc::now() - Duration::days(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test-secret".as_bytes()),
        )
        .unwrap();
        assert!(matches!(
            verify("test-secret", &token),
            Err(ApiError::Unauthenticated(_))
        ));
    }

    #[test]
    fn bearer_parses_and_rejects() {
        assert_eq!(bearer("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(bearer("Basic abc").is_err());
        assert!(bearer("bearer abc").is_err());
    }
}
