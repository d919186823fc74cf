use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Dog, DogId},
    error::{ApiError, ErrorCode},
    protocol::{LoginRequest, MatchResponse, SearchPage, SearchQuery},
};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

pub mod dashboard;
pub mod login;
pub mod matching;
pub mod pagination;
pub mod screen;
pub mod search;
pub mod selection;

pub use dashboard::{Dashboard, DashboardAction, DashboardEvent};
pub use login::{submit_login, validate, LoginError, LoginField, LoginFieldError, LoginForm};
pub use matching::{MatchError, MatchFlow, Navigation};
pub use pagination::Pagination;
pub use screen::ScreenState;
pub use search::{BreedFilter, FetchKey, SearchFormState};
pub use selection::{SelectedDogs, SelectionError, SELECTED_DOGS_PARAM};

pub const DEFAULT_BASE_URL: &str = "https://frontend-take-home-service.fetch.com";

const LOGIN_OK_BODY: &str = "OK";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Network(String),
    #[error("HTTP error! Status: {status}")]
    Status { endpoint: &'static str, status: u16 },
    #[error("unexpected response from {endpoint}: {reason}")]
    Decode {
        endpoint: &'static str,
        reason: String,
    },
    #[error("{0}")]
    Rejected(String),
    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ClientError {
    /// The single message shown to the user; no retryable/fatal distinction is made.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn to_api_error(&self) -> ApiError {
        let code = match self {
            ClientError::Network(_) => ErrorCode::Transport,
            ClientError::Status { status, .. } => ErrorCode::from_status(*status),
            ClientError::Decode { .. } => ErrorCode::MalformedResponse,
            ClientError::Rejected(_) => ErrorCode::Unauthorized,
            ClientError::InvalidBaseUrl { .. } => ErrorCode::Validation,
        };
        ApiError::new(code, self.user_message())
    }

    /// Whether the session cookie is gone or was refused and a fresh login is needed.
    pub fn requires_reauth(&self) -> bool {
        self.to_api_error().requires_reauth()
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

/// Remote operations of the shelter service.
#[async_trait]
pub trait DogApi: Send + Sync {
    async fn login(&self, credentials: &LoginRequest) -> Result<(), ClientError>;
    async fn logout(&self) -> Result<(), ClientError>;
    async fn breeds(&self) -> Result<Vec<String>, ClientError>;
    async fn search(&self, query: &SearchQuery) -> Result<SearchPage, ClientError>;
    async fn fetch_by_ids(&self, ids: &[DogId]) -> Result<Vec<Dog>, ClientError>;
    async fn match_dogs(&self, ids: &[DogId]) -> Result<DogId, ClientError>;
}

/// HTTP implementation of [`DogApi`]. The session cookie issued by `/auth/login`
/// is kept in the client's cookie store and sent on every later call.
pub struct ShelterClient {
    http: Client,
    base_url: String,
}

impl ShelterClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into();
        Url::parse(&base_url).map_err(|err| ClientError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: err.to_string(),
        })?;
        let http = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn ensure_success(endpoint: &'static str, res: Response) -> Result<Response, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    warn!(endpoint, status = status.as_u16(), "shelter api returned failure status");
    Err(ClientError::Status {
        endpoint,
        status: status.as_u16(),
    })
}

async fn decode_json<T: DeserializeOwned>(
    endpoint: &'static str,
    res: Response,
) -> Result<T, ClientError> {
    let bytes = res.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| {
        warn!(endpoint, "shelter api response did not match schema: {err}");
        ClientError::Decode {
            endpoint,
            reason: err.to_string(),
        }
    })
}

#[async_trait]
impl DogApi for ShelterClient {
    async fn login(&self, credentials: &LoginRequest) -> Result<(), ClientError> {
        debug!(endpoint = "/auth/login", "sending login");
        let res = self
            .http
            .post(self.url("/auth/login"))
            .json(credentials)
            .send()
            .await
            .map_err(|err| {
                warn!("login request failed: {err}");
                ClientError::from(err)
            })?;
        if !res.status().is_success() {
            warn!(status = res.status().as_u16(), "login rejected");
            return Err(ClientError::Rejected("Authentication failed".to_string()));
        }
        let body = res.text().await?;
        if body == LOGIN_OK_BODY {
            info!(name = %credentials.name, "logged in");
            Ok(())
        } else {
            Err(ClientError::Rejected("Login failed".to_string()))
        }
    }

    async fn logout(&self) -> Result<(), ClientError> {
        debug!(endpoint = "/auth/logout", "sending logout");
        let res = self.http.post(self.url("/auth/logout")).send().await?;
        ensure_success("/auth/logout", res)?;
        info!("logged out");
        Ok(())
    }

    async fn breeds(&self) -> Result<Vec<String>, ClientError> {
        debug!(endpoint = "/dogs/breeds", "fetching breeds");
        let res = self.http.get(self.url("/dogs/breeds")).send().await?;
        let res = ensure_success("/dogs/breeds", res)?;
        decode_json("/dogs/breeds", res).await
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchPage, ClientError> {
        debug!(
            endpoint = "/dogs/search",
            from = query.from,
            breeds = query.breeds.len(),
            sort = %query.sort,
            "searching dogs"
        );
        let res = self
            .http
            .get(self.url("/dogs/search"))
            .query(&query.query_pairs())
            .send()
            .await?;
        let res = ensure_success("/dogs/search", res)?;
        decode_json("/dogs/search", res).await
    }

    async fn fetch_by_ids(&self, ids: &[DogId]) -> Result<Vec<Dog>, ClientError> {
        debug!(endpoint = "/dogs", count = ids.len(), "hydrating dogs");
        let res = self.http.post(self.url("/dogs")).json(ids).send().await?;
        let res = ensure_success("/dogs", res)?;
        decode_json("/dogs", res).await
    }

    async fn match_dogs(&self, ids: &[DogId]) -> Result<DogId, ClientError> {
        debug!(endpoint = "/dogs/match", count = ids.len(), "requesting match");
        let res = self
            .http
            .post(self.url("/dogs/match"))
            .json(ids)
            .send()
            .await?;
        let res = ensure_success("/dogs/match", res)?;
        let body: MatchResponse = decode_json("/dogs/match", res).await?;
        Ok(body.matched)
    }
}

#[cfg(test)]
#[path = "tests/fake_api.rs"]
pub(crate) mod fake_api;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
