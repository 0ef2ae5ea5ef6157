use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

pub fn issue(user_id: Uuid, secret: &secrecy::SecretString, ttl: Duration) -> AppResult<String> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let exp = now + ttl.whole_seconds();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp,
    };
    let header = Header::new(Algorithm::HS256);
    encode(
        &header,
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.to_string()))
}

pub fn verify(token: &str, secret: &secrecy::SecretString) -> AppResult<Claims> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> secrecy::SecretString {
        secrecy::SecretString::new("test-secret-with-enough-entropy".into())
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let user_id = Uuid::new_v4();
        let token = issue(user_id, &secret(), Duration::hours(1)).unwrap();
        let claims = verify(&token, &secret()).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = issue(Uuid::new_v4(), &secret(), Duration::hours(1)).unwrap();
        let other = secrecy::SecretString::new("a-different-secret-entirely".into());
        assert!(matches!(
            verify(&token, &other),
            Err(AppError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let token = issue(Uuid::new_v4(), &secret(), Duration::seconds(-120)).unwrap();
        assert!(verify(&token, &secret()).is_err());
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(verify("not-a-token", &secret()).is_err());
    }
}
