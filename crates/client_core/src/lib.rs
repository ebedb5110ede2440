use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    domain::{activities_from_roster, Activity},
    protocol::{MutationAck, RejectionBody, RosterByName},
};
use thiserror::Error;
use tracing::debug;
use url::Url;


/// Where the signup backend listens when started with its stock settings.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Environment variable both binaries consult for the server url.
pub const SERVER_URL_ENV: &str = "ROSTER_SERVER_URL";

/// Resolution order: explicit flag, then the environment, then the default.
/// Blank values are treated as unset.
pub fn resolve_server_url(flag: Option<&str>, env_value: Option<&str>) -> String {
    let pick = |value: Option<&str>| {
        value
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };
    pick(flag)
        .or_else(|| pick(env_value))
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
}

fn rejection_message(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => detail.clone(),
        None => format!("server rejected the request (status {status})"),
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-2xx response. `detail` is present when the body carried the
    /// server's usual `{"detail": ...}` shape.
    #[error("{}", rejection_message(.status, .detail))]
    Rejected { status: u16, detail: Option<String> },
    /// 2xx response whose body did not match the documented shape.
    #[error("malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error("invalid server url: {0}")]
    InvalidServerUrl(String),
}

impl ClientError {
    /// Server-supplied failure detail, when the response carried one.
    /// Callers fall back to their own wording otherwise.
    pub fn server_detail(&self) -> Option<&str> {
        match self {
            ClientError::Rejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// The three operations the signup service exposes. The GUI worker and the
/// admin CLI both talk through this trait so tests can substitute a
/// recording implementation.
#[async_trait]
pub trait RosterApi: Send + Sync {
    /// Fetches every activity, in display order.
    async fn fetch_activities(&self) -> Result<Vec<Activity>, ClientError>;
    /// Registers `email` for the named activity and returns the server's
    /// acknowledgement message.
    async fn signup(&self, activity: &str, email: &str) -> Result<String, ClientError>;
    /// Removes `email` from the named activity and returns the server's
    /// acknowledgement message.
    async fn unregister(&self, activity: &str, email: &str) -> Result<String, ClientError>;
}

/// HTTP client for the activity signup service.
///
/// Requests carry no timeout, matching the page this client replaces: a hung
/// server leaves the call pending rather than failing it.
#[derive(Debug, Clone)]
pub struct RosterClient {
    http: Client,
    base_url: Url,
}

impl RosterClient {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(server_url)
            .map_err(|err| ClientError::InvalidServerUrl(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidServerUrl(format!(
                "{server_url} cannot serve as a base url"
            )));
        }
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    /// Extends the base url with percent-encoded path segments, so an
    /// activity name like "Chess Club" becomes `Chess%20Club` on the wire.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::InvalidServerUrl(format!(
                    "{} cannot carry path segments",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn mutation_endpoint(
        &self,
        activity: &str,
        operation: &str,
        email: &str,
    ) -> Result<Url, ClientError> {
        let mut url = self.endpoint(&["activities", activity, operation])?;
        url.query_pairs_mut().append_pair("email", email);
        Ok(url)
    }

    async fn run_mutation(
        &self,
        activity: &str,
        operation: &str,
        email: &str,
    ) -> Result<String, ClientError> {
        let url = self.mutation_endpoint(activity, operation, email)?;
        debug!(%activity, %email, operation, "submitting roster mutation");
        let response = self.http.post(url).send().await?;
        let ack: MutationAck = decode_body(response).await?;
        Ok(ack.message)
    }
}

#[async_trait]
impl RosterApi for RosterClient {
    async fn fetch_activities(&self) -> Result<Vec<Activity>, ClientError> {
        let url = self.endpoint(&["activities"])?;
        debug!("fetching activity roster");
        let response = self.http.get(url).send().await?;
        let roster: RosterByName = decode_body(response).await?;
        Ok(activities_from_roster(roster))
    }

    async fn signup(&self, activity: &str, email: &str) -> Result<String, ClientError> {
        self.run_mutation(activity, "signup", email).await
    }

    async fn unregister(&self, activity: &str, email: &str) -> Result<String, ClientError> {
        self.run_mutation(activity, "unregister", email).await
    }
}

/// Reads the body as text before decoding, so a non-JSON failure body (a
/// proxy error page, say) degrades to a detail-less rejection instead of an
/// opaque decode error.
async fn decode_body<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        let detail = serde_json::from_str::<RejectionBody>(&body)
            .ok()
            .map(|rejection| rejection.detail);
        return Err(ClientError::Rejected {
            status: status.as_u16(),
            detail,
        });
    }
    Ok(serde_json::from_str(&body)?)
}
