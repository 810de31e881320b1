use serde_json::Value;

use crate::auth::dto::{Credentials, ProfileUpdate, Registration, User};
use crate::client::{ApiClient, ApiResponse, HttpMethod};
use crate::error::ApiResult;

// Login and registration answers are inspected whatever their status, so
// these return the raw response instead of a decoded body.

pub async fn login(client: &ApiClient, credentials: &Credentials) -> ApiResult<ApiResponse> {
    let body = serde_json::to_value(credentials)?;
    client
        .execute(HttpMethod::Post, client.endpoints().login(), Some(body))
        .await
}

pub async fn register(client: &ApiClient, registration: &Registration) -> ApiResult<ApiResponse> {
    let body = serde_json::to_value(registration)?;
    client
        .execute(HttpMethod::Post, client.endpoints().register(), Some(body))
        .await
}

pub async fn logout(client: &ApiClient) -> ApiResult<()> {
    client
        .execute(HttpMethod::Post, client.endpoints().logout(), None)
        .await?
        .into_success()
        .map(|_| ())
}

impl User {
    /// Profile of the signed-in account.
    pub async fn fetch_profile(client: &ApiClient) -> ApiResult<User> {
        client.get(client.endpoints().profile()).await
    }

    pub async fn update_profile(client: &ApiClient, update: &ProfileUpdate) -> ApiResult<ApiResponse> {
        let body: Value = serde_json::to_value(update)?;
        client
            .execute(HttpMethod::Put, client.endpoints().profile(), Some(body))
            .await
    }
}
