//! Client for the remote Contest Service.
//!
//! Only the batch "create problems" call is used: the whole draft set goes out as
//! `{ "problems": [...] }` in one POST. Calls are instrumented and log the
//! contest id, batch size, status and latency (never the token or test data).

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::config::ContestServiceConfig;
use crate::domain::Problem;
use crate::error::ContestError;
use crate::util::trunc_for_log;

/// Source of the bearer token attached to Contest Service requests.
pub trait CredentialProvider: Send + Sync {
  fn bearer_token(&self) -> Option<String>;
}

/// A token fixed at startup (config file or `CONTEST_API_TOKEN`).
#[derive(Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
  pub fn new(token: Option<String>) -> Self {
    Self(token.filter(|t| !t.trim().is_empty()))
  }
}

impl CredentialProvider for StaticToken {
  fn bearer_token(&self) -> Option<String> { self.0.clone() }
}

/// Anything that can accept a batch of problem drafts for a contest.
pub trait ContestService {
  fn create_problems(
    &self,
    contest_id: u64,
    problems: &[Problem],
  ) -> impl Future<Output = Result<CreatedProblems, ContestError>> + Send;
}

/// Success payload. Only the number of returned problems is read; any 2xx counts
/// as success even when the body has some other shape.
#[derive(Debug, Default, Deserialize)]
pub struct CreatedProblems {
  #[serde(default)] pub message: Option<String>,
  #[serde(default)] pub problems: Vec<serde_json::Value>,
}

impl CreatedProblems {
  pub fn count(&self) -> usize { self.problems.len() }
}

#[derive(Serialize)]
struct CreateProblemsRequest<'a> {
  problems: &'a [Problem],
}

#[derive(Clone)]
pub struct ContestClient {
  pub client: reqwest::Client,
  pub base_url: String,
  credentials: Arc<dyn CredentialProvider>,
}

impl ContestClient {
  pub fn new(cfg: &ContestServiceConfig, credentials: Arc<dyn CredentialProvider>) -> Result<Self, ContestError> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(cfg.timeout_secs))
      .build()?;
    Ok(Self {
      client,
      base_url: cfg.base_url.trim_end_matches('/').to_string(),
      credentials,
    })
  }

  fn problems_url(&self, contest_id: u64) -> String {
    format!("{}/contests/{}/problems/", self.base_url, contest_id)
  }
}

impl ContestService for ContestClient {
  #[instrument(level = "info", target = "contest", skip(self, problems), fields(problems = problems.len()))]
  async fn create_problems(&self, contest_id: u64, problems: &[Problem]) -> Result<CreatedProblems, ContestError> {
    let url = self.problems_url(contest_id);
    let mut req = self.client.post(&url)
      .header(USER_AGENT, "problemset-author/0.1")
      .header(CONTENT_TYPE, "application/json")
      .json(&CreateProblemsRequest { problems });
    if let Some(token) = self.credentials.bearer_token() {
      req = req.header(AUTHORIZATION, format!("Bearer {token}"));
    }

    let start = Instant::now();
    let res = req.send().await.map_err(|e| {
      error!(target: "contest", elapsed = ?start.elapsed(), error = %e, "Contest service request failed");
      ContestError::from(e)
    })?;
    let status = res.status();
    let body = res.text().await?;
    let elapsed = start.elapsed();

    if !status.is_success() {
      let detail = extract_detail(&body);
      error!(target: "contest", status = status.as_u16(), ?elapsed, body = %trunc_for_log(&body, 200), "Contest service rejected batch");
      return Err(ContestError::Rejected { status: status.as_u16(), detail });
    }

    let created = if body.trim().is_empty() {
      CreatedProblems::default()
    } else {
      serde_json::from_str::<CreatedProblems>(&body).unwrap_or_else(|e| {
        warn!(target: "contest", status = status.as_u16(), error = %e, body = %trunc_for_log(&body, 200), "Unrecognized success body; batch treated as created");
        CreatedProblems::default()
      })
    };
    info!(
      target: "contest",
      status = status.as_u16(),
      ?elapsed,
      created = created.count(),
      message = created.message.as_deref().unwrap_or(""),
      "Contest service accepted batch"
    );
    Ok(created)
  }
}

/// Pull the human-readable `detail` string out of an error body, if there is one.
fn extract_detail(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EBody { detail: Option<serde_json::Value> }
  match serde_json::from_str::<EBody>(body) {
    Ok(EBody { detail: Some(serde_json::Value::String(s)) }) => Some(s),
    _ => None,
  }
}
