//! Registration, OTP login and logout.

use std::sync::Arc;

use log::{info, warn};
use minifeed_core::validate::{validate_mobile, validate_name, validate_otp};
use minifeed_core::{AuthSession, ValidationError};
use thiserror::Error;

use crate::api::{ApiError, AuthApi};
use crate::credentials::{Credentials, StoredAuth};
use crate::feed::Feed;
use crate::store::StoreError;

pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const LOGIN_FAILED: &str = "Login failed";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Could not save session: {0}")]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Single-line text, with `fallback` standing in for unexplained failures.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AuthError::Validation(err) => err.to_string(),
            AuthError::Api(err) => err.backend_message().unwrap_or(fallback).to_string(),
            AuthError::Store(err) => err.to_string(),
        }
    }
}

pub struct AuthService {
    api: Arc<dyn AuthApi>,
    credentials: Credentials,
}

impl AuthService {
    pub fn new(api: Arc<dyn AuthApi>, credentials: Credentials) -> Self {
        Self { api, credentials }
    }

    /// Create an account. The user still has to log in afterwards.
    pub async fn register(&self, mobile: &str, name: &str) -> Result<(), AuthError> {
        let mobile = validate_mobile(mobile)?;
        let name = validate_name(name)?;

        self.api.register(&mobile, name).await?;
        info!("Registered {}", mobile);
        Ok(())
    }

    /// Exchange a mobile number and OTP for a session and store it.
    pub async fn login(&self, mobile: &str, otp: &str) -> Result<AuthSession, AuthError> {
        let mobile = validate_mobile(mobile)?;
        let otp = validate_otp(otp)?;

        let session = self.api.login(&mobile, otp).await?;
        self.credentials.save(&session)?;
        info!("Logged in as {}", session.user.name);
        Ok(session)
    }

    /// Forget the stored session and the posts fetched with it.
    pub fn logout(&self, feed: Option<&Feed>) -> Result<(), AuthError> {
        if let Err(err) = self.credentials.clear() {
            warn!("Failed to clear session: {}", err);
            return Err(err.into());
        }
        if let Some(feed) = feed {
            feed.clear();
        }
        info!("Logged out");
        Ok(())
    }

    pub fn current(&self) -> StoredAuth {
        self.credentials.stored_auth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use minifeed_core::User;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeAuth {
        calls: Mutex<Vec<(String, String)>>,
        fail_with: Mutex<Option<ApiError>>,
    }

    impl FakeAuth {
        fn answer(&self, first: &str, second: &str) -> Result<(), ApiError> {
            self.calls
                .lock()
                .unwrap()
                .push((first.to_string(), second.to_string()));
            match self.fail_with.lock().unwrap().clone() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl AuthApi for FakeAuth {
        async fn register(&self, mobile: &str, name: &str) -> Result<(), ApiError> {
            self.answer(mobile, name)
        }

        async fn login(&self, mobile: &str, otp: &str) -> Result<AuthSession, ApiError> {
            self.answer(mobile, otp)?;
            Ok(AuthSession {
                token: "jwt-token".to_string(),
                user: User {
                    id: "u1".to_string(),
                    name: "Asha".to_string(),
                    mobile: mobile.to_string(),
                },
            })
        }
    }

    fn service() -> (Arc<FakeAuth>, AuthService) {
        let api = Arc::new(FakeAuth::default());
        let credentials = Credentials::new(Arc::new(MemoryStore::new()));
        (api.clone(), AuthService::new(api, credentials))
    }

    #[tokio::test]
    async fn test_login_persists_session() {
        let (api, auth) = service();

        let session = auth.login(" 9876543210 ", "123456").await.unwrap();
        assert_eq!(session.token, "jwt-token");
        assert_eq!(
            api.calls.lock().unwrap()[0],
            ("9876543210".to_string(), "123456".to_string())
        );

        let current = auth.current();
        assert!(current.is_authenticated);
        assert_eq!(current.token.as_deref(), Some("jwt-token"));
    }

    #[tokio::test]
    async fn test_invalid_input_makes_no_call() {
        let (api, auth) = service();

        let err = auth.login("12345", "123456").await.unwrap_err();
        assert_eq!(
            err.user_message(LOGIN_FAILED),
            "Please enter a valid mobile number (at least 10 digits)"
        );
        let err = auth.login("9876543210", "12").await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::Validation(ValidationError::InvalidOtp)
        ));
        let err = auth.register("9876543210", "A").await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::Validation(ValidationError::InvalidName)
        ));

        assert!(api.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_does_not_sign_in() {
        let (api, auth) = service();

        auth.register("9876543210", "  Asha ").await.unwrap();
        assert_eq!(api.calls.lock().unwrap()[0].1, "Asha");
        assert!(!auth.current().is_authenticated);
    }

    #[tokio::test]
    async fn test_failure_messages() {
        let (api, auth) = service();

        *api.fail_with.lock().unwrap() = Some(ApiError::Backend {
            status: 400,
            message: Some("Invalid OTP".to_string()),
        });
        let err = auth.login("9876543210", "000000").await.unwrap_err();
        assert_eq!(err.user_message(LOGIN_FAILED), "Invalid OTP");
        assert!(!auth.current().is_authenticated);

        *api.fail_with.lock().unwrap() = Some(ApiError::Transport("offline".into()));
        let err = auth.register("9876543210", "Asha").await.unwrap_err();
        assert_eq!(err.user_message(REGISTRATION_FAILED), REGISTRATION_FAILED);
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_feed() {
        use crate::submit::tests::{post, FakePosts};

        let (_api, auth) = service();
        auth.login("9876543210", "123456").await.unwrap();

        let posts = Arc::new(FakePosts::default());
        *posts.mine.lock().unwrap() = vec![post("1", "a")];
        let feed = Feed::new(posts);
        feed.fetch_mine().await.unwrap();

        auth.logout(Some(&feed)).unwrap();
        assert!(!auth.current().is_authenticated);
        assert!(feed.posts().is_empty());
    }
}
