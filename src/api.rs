// API client module: a small blocking HTTP client that talks to the CTF
// scoring server. Every call blocks until the server answers or the fixed
// timeout expires; nothing is retried.
//
// Command handlers only see the `ScoreServer` trait so they can be run
// against a fake server in tests.

use crate::config::Config;
use crate::model::{FlagSubmission, RegisterRequest, RegisterResponse, ScoreboardEntry};
use anyhow::{Context, Result};
use log::debug;
use reqwest::blocking::Client;
use reqwest::StatusCode;

/// Path segment that authorizes registration requests.
pub const REGISTER_TOKEN: &str = "068b661109426b3e284c0ef892eba655a776177cd248a4294c24c861c0573748";
/// Path segment that authorizes flag submissions.
pub const SUBMIT_TOKEN: &str = "c86eca4b5dcc75000c39e9963fa05bc9aca0b20d0e8118ac849ea59ade081bf1";

/// The three remote operations the tool needs.
///
/// `register` and `submit` return `Ok(None)` when the server answers with
/// anything other than 200. Transport failures and an undecodable
/// registration body are errors.
pub trait ScoreServer {
    fn register(&self, req: &RegisterRequest<'_>) -> Result<Option<RegisterResponse>>;

    /// Returns the raw response body on 200.
    fn submit(&self, submission: &FlagSubmission) -> Result<Option<String>>;

    /// A body that is not a JSON list of entries yields an empty list.
    fn scoreboard(&self) -> Result<Vec<ScoreboardEntry>>;
}

/// Blocking reqwest client bound to one server base URL.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: config.api_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

impl ScoreServer for ApiClient {
    fn register(&self, req: &RegisterRequest<'_>) -> Result<Option<RegisterResponse>> {
        let url = self.url(&format!("Register/{REGISTER_TOKEN}"));
        debug!("POST {url}");
        let res = self
            .client
            .post(&url)
            .json(req)
            .send()
            .context("Failed to send register request")?;
        if res.status() != StatusCode::OK {
            debug!("register answered {}, ignoring", res.status());
            return Ok(None);
        }
        let resp: RegisterResponse = res.json().context("Parsing register response json")?;
        Ok(Some(resp))
    }

    fn submit(&self, submission: &FlagSubmission) -> Result<Option<String>> {
        let url = self.url(&format!("Submit/{SUBMIT_TOKEN}"));
        debug!("POST {url}");
        let res = self
            .client
            .post(&url)
            .json(submission)
            .send()
            .context("Failed to send submit request")?;
        if res.status() != StatusCode::OK {
            debug!("submit answered {}, ignoring", res.status());
            return Ok(None);
        }
        let body = res.text().context("Reading submit response body")?;
        Ok(Some(body))
    }

    fn scoreboard(&self) -> Result<Vec<ScoreboardEntry>> {
        let url = self.url("score");
        debug!("GET {url}");
        let res = self
            .client
            .get(&url)
            .send()
            .context("Failed to send scoreboard request")?;
        debug!("scoreboard answered {}", res.status());
        let body = res.text().context("Reading scoreboard response body")?;
        Ok(decode_scoreboard(&body))
    }
}

/// Decode a scoreboard body, treating anything unexpected as "no entries".
pub fn decode_scoreboard(body: &str) -> Vec<ScoreboardEntry> {
    serde_json::from_str(body).unwrap_or_else(|e| {
        debug!("scoreboard body is not a list of entries: {e}");
        Vec::new()
    })
}
