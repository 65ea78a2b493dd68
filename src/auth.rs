use argon2::{
    Argon2,
    PasswordHash,
    PasswordVerifier,
    PasswordHasher,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use argon2::password_hash::{SaltString, rand_core::OsRng as PHOsRng};

use crate::models::Role;

/// Tokens are short-lived; the dashboard re-authenticates on 401.
pub const TOKEN_TTL_HOURS: i64 = 2;

#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Claims carried by every bearer token: account id, role tag, expiry.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub role: Role,
    pub exp: i64,
}

/// Verify password using Argon2 hash stored in DB.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(p) => p,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Hash a new password using Argon2id with a random salt.
/// Store the returned string in patient/doctor password_hash.
pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut PHOsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| format!("argon2 hash error: {e}"))
}

/// Issue an HS256 bearer token for the given account.
pub fn sign_token(id: i64, role: Role, keys: &JwtKeys) -> Result<String, jsonwebtoken::errors::Error> {
    let exp = (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp();
    let claims = Claims { id, role, exp };
    encode(&Header::default(), &claims, &keys.encoding)
}

/// Check signature and expiry; returns the embedded claims.
pub fn verify_token(token: &str, keys: &JwtKeys) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(token, &keys.decoding, &Validation::default())?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{Header, encode};
    use pretty_assertions::assert_eq;

    use super::{Claims, JwtKeys, hash_password, sign_token, verify_password, verify_token};
    use crate::models::Role;

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("password123").unwrap();
        assert!(verify_password("password123", &hash));
        assert!(!verify_password("password124", &hash));
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(!verify_password("password123", "not-a-phc-string"));
    }

    #[test]
    fn token_round_trips_id_and_role() {
        let keys = JwtKeys::from_secret("test-secret");
        let token = sign_token(42, Role::Doctor, &keys).unwrap();
        let claims = verify_token(&token, &keys).unwrap();
        assert_eq!(claims.id, 42);
        assert_eq!(claims.role, Role::Doctor);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let keys = JwtKeys::from_secret("test-secret");
        let other = JwtKeys::from_secret("other-secret");
        let token = sign_token(7, Role::Patient, &keys).unwrap();
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = JwtKeys::from_secret("test-secret");
        let stale = Claims {
            id: 7,
            role: Role::Patient,
            exp: (chrono::Utc::now() - chrono::Duration::hours(3)).timestamp(),
        };
        let token = encode(&Header::default(), &stale, &keys.encoding).unwrap();
        assert!(verify_token(&token, &keys).is_err());
    }
}
