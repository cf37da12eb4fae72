//! Authentication service - signup, login and session token verification.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Verified against when the email is unknown, so a miss costs a full
/// Argon2 run just like a wrong password.
const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$IF0GI5BWKxg9QeG7sWC8lg$/l8WaKilw9DOdHAnsroSKafuWHhc9r6YEaC8Va/4zyU";

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i32,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Signed session token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 259200)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user
    async fn register(&self, email: String, password: String) -> AppResult<User>;

    /// Check credentials and issue a session token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Verify a session token and extract its claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )
    .map_err(|e| AppError::internal(format!("Token signing failed: {}", e)))?;

    Ok(TokenResponse {
        token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| {
        tracing::debug!("Rejected session token: {}", e);
        AppError::Unauthorized
    })?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, email: String, password: String) -> AppResult<User> {
        // Email format is validated by the handler's ValidatedJson extractor
        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let password_hash = Password::new(&password)?.into_string();
        let user = self.uow.users().create(email, password_hash).await?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let user = self.uow.users().find_by_email(&email).await?;

        let stored_hash = user
            .as_ref()
            .map_or(DUMMY_PASSWORD_HASH, |u| u.password_hash.as_str());
        let password_valid = Password::from_hash(stored_hash.to_string()).verify(&password);

        match user {
            Some(user) if password_valid => generate_token(&user, &self.config),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockUserRepository;
    use crate::services::test_support::TestUnitOfWork;
    use mockall::predicate::eq;

    const SECRET: &str = "test-secret-key-for-testing-only-32chars";

    fn config() -> Config {
        Config::new("sqlite::memory:", SECRET).unwrap()
    }

    fn stored_user(password: &str) -> User {
        User {
            id: 42,
            email: "e@x.com".to_string(),
            password_hash: Password::new(password).unwrap().into_string(),
            created_at: Utc::now(),
        }
    }

    fn service(users: MockUserRepository) -> Authenticator<TestUnitOfWork> {
        let uow = TestUnitOfWork::builder().users(users).build();
        Authenticator::new(Arc::new(uow), config())
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|email, hash| email == "e@x.com" && hash.starts_with("$argon2id$") && hash != "p")
            .returning(|email, password_hash| {
                Ok(User {
                    id: 1,
                    email,
                    password_hash,
                    created_at: Utc::now(),
                })
            });

        let user = service(users)
            .register("e@x.com".to_string(), "p".to_string())
            .await
            .unwrap();

        assert_eq!(user.id, 1);
        assert!(Password::from_hash(user.password_hash).verify("p"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .with(eq("e@x.com"))
            .returning(|_| Ok(Some(stored_user("p"))));
        users.expect_create().never();

        let result = service(users)
            .register("e@x.com".to_string(), "p".to_string())
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_login_issues_token_for_user() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(Some(stored_user("p"))));
        let auth = service(users);

        let token = auth.login("e@x.com".to_string(), "p".to_string()).await.unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 72 * 3600);

        let claims = auth.verify_token(&token.token).unwrap();
        assert_eq!(claims.sub, 42);
        let lifetime = claims.exp - claims.iat;
        assert_eq!(lifetime, 72 * 3600);
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_email_look_the_same() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .with(eq("e@x.com"))
            .returning(|_| Ok(Some(stored_user("p"))));
        users
            .expect_find_by_email()
            .with(eq("nobody@x.com"))
            .returning(|_| Ok(None));
        let auth = service(users);

        let wrong = auth.login("e@x.com".to_string(), "nope".to_string()).await;
        let unknown = auth.login("nobody@x.com".to_string(), "p".to_string()).await;

        assert!(matches!(wrong, Err(AppError::InvalidCredentials)));
        assert!(matches!(unknown, Err(AppError::InvalidCredentials)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let result = verify_token_internal(&token, &config());
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let other = Config::new("sqlite::memory:", "another-secret-that-is-32-bytes-long!").unwrap();
        let token = generate_token(&stored_user("p"), &other).unwrap();

        let result = verify_token_internal(&token.token, &config());
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_algorithm_mismatch_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            exp: now + 3600,
            iat: now,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let result = verify_token_internal(&token, &config());
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let result = verify_token_internal("not.a.token", &config());
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}
