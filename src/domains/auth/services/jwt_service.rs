// src/domains/auth/services/jwt_service.rs
use crate::shared::errors::AuthError;
use crate::domains::auth::models::jwt::Claims;
use crate::domains::auth::models::Role;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sha2::{Sha256, Digest};
use rand::Rng;
use rand::distributions::Alphanumeric;

/// JWT 서비스
/// JWT Service for token generation and verification
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_ttl_hours: i64,
}

impl JwtService {
    /// JWT Service 생성
    /// Create JWT Service
    pub fn new(secret: &str, access_token_ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_ttl_hours,
        }
    }

    /// Access Token 발급 (짧은 수명, 역할 포함)
    /// Generate Access Token (short lifetime, carries the role)
    pub fn generate_access_token(&self, user_id: u64, email: String, role: Role) -> Result<String, AuthError> {
        let claims = Claims::new(user_id, email, role, self.access_token_ttl_hours);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to generate access token: {}", e)))
    }

    /// Refresh Token 생성 (랜덤 문자열, DB에 저장할 것)
    /// Generate Refresh Token (random string, to be stored in DB)
    pub fn generate_refresh_token(&self) -> String {
        // 64자 랜덤 문자열 생성
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(64)
            .map(char::from)
            .collect()
    }

    /// Refresh Token 해싱 (DB 저장용)
    /// Hash Refresh Token (for database storage)
    pub fn hash_refresh_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Access Token 검증 (만료/서명 오류 모두 InvalidToken)
    /// Verify Access Token
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_round_trips_user_and_role() {
        let service = JwtService::new("test-secret", 1);
        let token = service
            .generate_access_token(7, "admin@example.com".into(), Role::Admin)
            .unwrap();

        let claims = service.verify_access_token(&token).unwrap();
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.email, "admin@example.com");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let issuer = JwtService::new("secret-a", 1);
        let verifier = JwtService::new("secret-b", 1);
        let token = issuer
            .generate_access_token(1, "user@example.com".into(), Role::User)
            .unwrap();

        assert!(matches!(verifier.verify_access_token(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let service = JwtService::new("test-secret", 1);
        assert!(matches!(service.verify_access_token("not-a-jwt"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn refresh_tokens_are_random_and_hash_deterministically() {
        let service = JwtService::new("test-secret", 1);
        let a = service.generate_refresh_token();
        let b = service.generate_refresh_token();

        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
        assert_eq!(service.hash_refresh_token(&a), service.hash_refresh_token(&a));
        assert_eq!(service.hash_refresh_token(&a).len(), 64);
    }
}
