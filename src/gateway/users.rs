//! User lookup and registration.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{GatewayError, Result};

use super::client::{ApiClient, expect_json, server_error};

/// Identity sent to `/users`; at least one of phone or email is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserCredentials {
    phone: Option<String>,
    email: Option<String>,
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl UserCredentials {
    pub fn new(phone: Option<String>, email: Option<String>) -> Result<Self> {
        let phone = non_blank(phone);
        let email = non_blank(email);
        if phone.is_none() && email.is_none() {
            return Err(GatewayError::InvalidArgument(
                "phone or email must be provided".into(),
            ));
        }
        Ok(Self { phone, email })
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// A user as stored by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub role: String,
}

#[derive(Debug, Clone)]
pub struct UserGateway {
    api: ApiClient,
}

impl UserGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `POST /users`
    pub async fn add_user(&self, user: &UserCredentials) -> Result<UserRecord> {
        let url = self.api.url("users");
        debug!(url = %url, "Adding user");

        let response = self.api.http().post(&url).json(user).send().await?;
        expect_json(response, "user").await
    }

    /// `GET /users/find?phone=...&email=...`; `Ok(None)` when the server has no match.
    pub async fn find_user(
        &self,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<UserRecord>> {
        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(p) = phone.map(str::trim).filter(|p| !p.is_empty()) {
            params.push(("phone", p));
        }
        if let Some(e) = email.map(str::trim).filter(|e| !e.is_empty()) {
            params.push(("email", e));
        }
        if params.is_empty() {
            return Err(GatewayError::InvalidArgument(
                "must provide phone or email".into(),
            ));
        }

        let url = self.api.url("users/find");
        debug!(url = %url, "Looking up user");

        let response = self.api.http().get(&url).query(&params).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => expect_json(response, "user").await.map(Some),
            _ => Err(server_error(response).await),
        }
    }

    /// Find the user, creating it when the server does not know it yet.
    pub async fn login_user(&self, user: &UserCredentials) -> Result<UserRecord> {
        if let Some(existing) = self.find_user(user.phone(), user.email()).await? {
            info!(id = existing.id, "User found");
            return Ok(existing);
        }

        info!("User not found, creating");
        let created = self.add_user(user).await?;
        info!(id = created.id, "User created");
        Ok(created)
    }

    /// `GET /users`
    pub async fn list_users(&self) -> Result<Vec<UserRecord>> {
        let url = self.api.url("users");
        let response = self.api.http().get(&url).send().await?;
        expect_json(response, "user list").await
    }
}
