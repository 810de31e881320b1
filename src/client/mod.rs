mod endpoints;

pub use endpoints::Endpoints;

use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, error, instrument, warn};
use url::Url;

use crate::auth::session::SessionHandle;
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult, FieldErrors};
use crate::routes::{Navigator, Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Status plus the decoded body. Non-JSON bodies are kept as a string value.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The body on 2xx; field errors or a status error otherwise.
    pub fn into_success(self) -> ApiResult<Value> {
        if self.status.is_success() {
            return Ok(self.body);
        }
        if self.body.is_object() {
            return Err(ApiError::Validation(FieldErrors::from_body(&self.body)));
        }
        let body = match self.body {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        };
        Err(ApiError::Status {
            status: self.status.as_u16(),
            body,
        })
    }

    pub fn into_json<T: DeserializeOwned>(self) -> ApiResult<T> {
        Ok(serde_json::from_value(self.into_success()?)?)
    }
}

/// Backend client: token header on every request, forced logout on 401.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    endpoints: Endpoints,
    session: SessionHandle,
    navigator: Navigator,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: SessionHandle, navigator: Navigator) -> ApiResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            endpoints: Endpoints::new(config)?,
            session,
            navigator,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Sends one request. Any status other than 401 is returned as-is.
    #[instrument(skip_all, fields(method = ?method, path = %url.path()))]
    pub async fn execute(
        &self,
        method: HttpMethod,
        url: Url,
        body: Option<Value>,
    ) -> ApiResult<ApiResponse> {
        let mut request = self.http.request(method.into(), url);
        if let Some(token) = self.session.token().await {
            request = request.header(AUTHORIZATION, format!("Token {token}"));
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "request failed");
            ApiError::Transport(e)
        })?;
        let status = response.status();
        debug!(%status, "response");

        if status == StatusCode::UNAUTHORIZED {
            self.expire_session().await;
            return Err(ApiError::Unauthorized);
        }

        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        Ok(ApiResponse { status, body })
    }

    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        self.execute(HttpMethod::Get, url, None).await?.into_json()
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, url: Url, body: &B) -> ApiResult<T> {
        let body = serde_json::to_value(body)?;
        self.execute(HttpMethod::Post, url, Some(body))
            .await?
            .into_json()
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(&self, url: Url, body: &B) -> ApiResult<T> {
        let body = serde_json::to_value(body)?;
        self.execute(HttpMethod::Put, url, Some(body))
            .await?
            .into_json()
    }

    pub async fn delete(&self, url: Url) -> ApiResult<()> {
        self.execute(HttpMethod::Delete, url, None)
            .await?
            .into_success()
            .map(|_| ())
    }

    async fn expire_session(&self) {
        warn!("backend rejected credentials; signing out");
        if let Err(e) = self.session.clear().await {
            error!(error = %e, "failed to clear stored session");
        }
        self.navigator.navigate(Route::Login);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_error_body_becomes_validation() {
        let response = ApiResponse {
            status: StatusCode::BAD_REQUEST,
            body: json!({"grade": ["Invalid choice"]}),
        };
        match response.into_success() {
            Err(ApiError::Validation(errors)) => {
                assert_eq!(errors.describe("grade").as_deref(), Some("Grade: Invalid choice"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn plain_error_body_becomes_status() {
        let response = ApiResponse {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: Value::String("<html>boom</html>".into()),
        };
        match response.into_success() {
            Err(ApiError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "<html>boom</html>");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn success_body_decodes() {
        let response = ApiResponse {
            status: StatusCode::OK,
            body: json!([1, 2, 3]),
        };
        let values: Vec<i32> = response.into_json().unwrap();
        assert_eq!(values, vec![1, 2, 3]);
    }
}
