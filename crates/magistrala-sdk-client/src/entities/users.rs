//! Users service client.

use crate::credential::Credential;
use crate::executor::{endpoint, Executor, RequestSpec};
use magistrala_sdk_core::defs::{Login, PageMetadata, Response, Token, User, UsersPage};
use magistrala_sdk_core::DomainError;
use reqwest::header::REFERER;
use serde_json::json;
use url::Url;

/// Client for user accounts, tokens and password management.
#[derive(Debug, Clone)]
pub struct Users {
    executor: Executor,
    base: Url,
}

impl Users {
    /// Create a client for the users service at `base`.
    #[must_use]
    pub fn new(executor: Executor, base: Url) -> Self {
        Self { executor, base }
    }

    /// Register a user. Self-registration needs no token.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn create(&self, user: &User, token: Option<&str>) -> Result<User, DomainError> {
        let url = endpoint(&self.base, ["users"], None)?;
        let credential = token.map_or(Credential::None, Credential::bearer);
        self.executor
            .run_json(RequestSpec::post(url).credential(credential).json(user)?)
            .await
    }

    /// Issue an access and refresh token pair.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn create_token(&self, login: &Login) -> Result<Token, DomainError> {
        let url = endpoint(&self.base, ["users", "tokens", "issue"], None)?;
        self.executor.run_json(RequestSpec::post(url).json(login)?).await
    }

    /// Exchange a refresh token for a new token pair.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<Token, DomainError> {
        let url = endpoint(&self.base, ["users", "tokens", "refresh"], None)?;
        self.executor
            .run_json(RequestSpec::post(url).credential(Credential::bearer(refresh_token)))
            .await
    }

    /// List users.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn list(&self, pm: &PageMetadata, token: &str) -> Result<UsersPage, DomainError> {
        let url = endpoint(&self.base, ["users"], Some(&pm.to_query()))?;
        self.get_as(url, token).await
    }

    /// Search users by name or identity.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn search(&self, pm: &PageMetadata, token: &str) -> Result<UsersPage, DomainError> {
        let url = endpoint(&self.base, ["users", "search"], Some(&pm.to_query()))?;
        self.get_as(url, token).await
    }

    /// Retrieve a user.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn get(&self, user_id: &str, token: &str) -> Result<User, DomainError> {
        let url = endpoint(&self.base, ["users", user_id], None)?;
        self.get_as(url, token).await
    }

    /// Retrieve the user owning `token`.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn profile(&self, token: &str) -> Result<User, DomainError> {
        let url = endpoint(&self.base, ["users", "profile"], None)?;
        self.get_as(url, token).await
    }

    /// Update name and metadata.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if `user.id` is missing, otherwise the
    /// normalized error of the call.
    pub async fn update(&self, user: &User, token: &str) -> Result<User, DomainError> {
        self.patch_user(user, None, token).await
    }

    /// Replace tags.
    ///
    /// # Errors
    ///
    /// See [`Users::update`].
    pub async fn update_tags(&self, user: &User, token: &str) -> Result<User, DomainError> {
        self.patch_user(user, Some("tags"), token).await
    }

    /// Change the login identity.
    ///
    /// # Errors
    ///
    /// See [`Users::update`].
    pub async fn update_email(&self, user: &User, token: &str) -> Result<User, DomainError> {
        self.patch_user(user, Some("email"), token).await
    }

    /// Change the platform role.
    ///
    /// # Errors
    ///
    /// See [`Users::update`].
    pub async fn update_role(&self, user: &User, token: &str) -> Result<User, DomainError> {
        self.patch_user(user, Some("role"), token).await
    }

    /// Change the caller's own password.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn update_secret(
        &self,
        old_secret: &str,
        new_secret: &str,
        token: &str,
    ) -> Result<User, DomainError> {
        let url = endpoint(&self.base, ["users", "secret"], None)?;
        let body = json!({ "old_secret": old_secret, "new_secret": new_secret });
        self.executor
            .run_json(RequestSpec::patch(url).credential(Credential::bearer(token)).json(&body)?)
            .await
    }

    /// Enable a user.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn enable(&self, user_id: &str, token: &str) -> Result<User, DomainError> {
        let url = endpoint(&self.base, ["users", user_id, "enable"], None)?;
        self.executor
            .run_json(RequestSpec::post(url).credential(Credential::bearer(token)))
            .await
    }

    /// Disable a user.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn disable(&self, user_id: &str, token: &str) -> Result<User, DomainError> {
        let url = endpoint(&self.base, ["users", user_id, "disable"], None)?;
        self.executor
            .run_json(RequestSpec::post(url).credential(Credential::bearer(token)))
            .await
    }

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn delete(&self, user_id: &str, token: &str) -> Result<Response, DomainError> {
        let url = endpoint(&self.base, ["users", user_id], None)?;
        self.executor
            .run_ack(
                RequestSpec::delete(url).credential(Credential::bearer(token)),
                "User deleted successfully",
            )
            .await
    }

    /// Ask for a password reset link to be mailed to `email`.
    ///
    /// `host` is the UI origin the link points back to.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn reset_password_request(
        &self,
        email: &str,
        host: &str,
    ) -> Result<Response, DomainError> {
        let url = endpoint(&self.base, ["password", "reset-request"], None)?;
        let body = json!({ "email": email, "host": host });
        let spec = RequestSpec::post(url).header(REFERER, host)?.json(&body)?;
        self.executor
            .run_ack(spec, "Email with reset link sent successfully")
            .await
    }

    /// Set a new password using the token from the reset link.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn reset_password(
        &self,
        password: &str,
        confirm_password: &str,
        reset_token: &str,
    ) -> Result<Response, DomainError> {
        let url = endpoint(&self.base, ["password", "reset"], None)?;
        let body = json!({
            "password": password,
            "confirm_password": confirm_password,
            "token": reset_token,
        });
        self.executor
            .run_ack(RequestSpec::put(url).json(&body)?, "Password reset successfully")
            .await
    }

    async fn patch_user(
        &self,
        user: &User,
        field: Option<&str>,
        token: &str,
    ) -> Result<User, DomainError> {
        let user_id = user
            .id
            .as_deref()
            .ok_or_else(|| DomainError::invalid_request("user id is required"))?;
        let url = endpoint(&self.base, ["users", user_id].into_iter().chain(field), None)?;
        self.executor
            .run_json(RequestSpec::patch(url).credential(Credential::bearer(token)).json(user)?)
            .await
    }

    async fn get_as<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        token: &str,
    ) -> Result<T, DomainError> {
        self.executor
            .run_json(RequestSpec::get(url).credential(Credential::bearer(token)))
            .await
    }
}
