use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{SignupRequest, User, UserProfile};
use crate::repository::UserRepository;
use crate::validation::{
    validate_email, validate_password, validate_password_match, validate_username,
};

/// Service layer for account business logic
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Register a new, unconfirmed account
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn signup(&self, input: SignupRequest) -> UserResult<UserProfile> {
        let username = input.username.trim().to_string();
        let email = input.email.trim().to_string();

        validate_username(&username)?;
        validate_email(&email)?;
        validate_password(&input.password)?;
        if let Some(confirm) = &input.confirm_password {
            validate_password_match(&input.password, confirm)?;
        }

        if self.repository.username_exists(&username).await? {
            return Err(UserError::UsernameTaken(username));
        }
        if self.repository.email_exists(&email).await? {
            return Err(UserError::EmailTaken(email));
        }

        let password_hash = self.hash_password(&input.password)?;
        let user = self
            .repository
            .create(User::new(username, email, password_hash))
            .await?;

        Ok(user.into())
    }

    /// Whether a username is still free
    #[instrument(skip(self))]
    pub async fn verify_username(&self, username: &str) -> UserResult<bool> {
        let username = username.trim();
        validate_username(username)?;
        Ok(!self.repository.username_exists(username).await?)
    }

    /// Profile of the authenticated caller
    #[instrument(skip(self))]
    pub async fn me(&self, caller: Uuid) -> UserResult<UserProfile> {
        let user = self
            .repository
            .get_by_id(caller)
            .await?
            .ok_or(UserError::NotFound(caller))?;
        Ok(user.into())
    }

    fn hash_password(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryUserRepository, MockUserRepository};
    use argon2::{PasswordHash, PasswordVerifier};

    fn signup_input(username: &str, email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: None,
        }
    }

    #[tokio::test]
    async fn test_signup_stores_argon2_hash() {
        let repo = InMemoryUserRepository::new();
        let service = UserService::new(repo.clone());

        let profile = service
            .signup(signup_input("dana", "dana@example.com", "correct horse"))
            .await
            .unwrap();
        assert!(!profile.confirmed);

        let stored = repo.get_by_id(profile.id).await.unwrap().unwrap();
        assert_ne!(stored.password, "correct horse");
        let parsed = PasswordHash::new(&stored.password).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"correct horse", &parsed)
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_signup_rejects_invalid_fields_before_storage() {
        let mut repo = MockUserRepository::new();
        repo.expect_create().never();
        let service = UserService::new(repo);

        let err = service
            .signup(signup_input("da", "dana@example.com", "long enough"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Username must be at least 3 characters long.");

        let err = service
            .signup(signup_input("dana", "not-an-email", "long enough"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid email format.");

        let err = service
            .signup(signup_input("dana", "dana@example.com", "short"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 8 characters long.");

        let mut mismatched = signup_input("dana", "dana@example.com", "long enough");
        mismatched.confirm_password = Some("long enougj".into());
        let err = service.signup(mismatched).await.unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match.");
    }

    #[tokio::test]
    async fn test_signup_taken_username() {
        let mut repo = MockUserRepository::new();
        repo.expect_username_exists().returning(|_| Ok(true));
        repo.expect_create().never();
        let service = UserService::new(repo);

        let err = service
            .signup(signup_input("dana", "dana@example.com", "long enough"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::UsernameTaken(_)));
    }

    #[tokio::test]
    async fn test_signup_taken_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_username_exists().returning(|_| Ok(false));
        repo.expect_email_exists().returning(|_| Ok(true));
        let service = UserService::new(repo);

        let err = service
            .signup(signup_input("dana", "dana@example.com", "long enough"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::EmailTaken(_)));
    }

    #[tokio::test]
    async fn test_verify_username() {
        let repo = InMemoryUserRepository::new();
        let service = UserService::new(repo);
        service
            .signup(signup_input("dana", "dana@example.com", "long enough"))
            .await
            .unwrap();

        assert!(!service.verify_username("Dana").await.unwrap());
        assert!(service.verify_username("noa_b").await.unwrap());
        assert!(service.verify_username("x").await.is_err());
    }

    #[tokio::test]
    async fn test_me_for_missing_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));
        let service = UserService::new(repo);

        let err = service.me(Uuid::now_v7()).await.unwrap_err();
        assert_eq!(err.to_string(), "User not found.");
    }
}
