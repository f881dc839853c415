//! Application state: the authoring session, the Contest Service client and the
//! completion hook run after each successful commit.
//!
//! The editor sits behind a `RwLock`. Commits hold the write lock only while
//! taking the batch out and while settling the outcome; the network call itself
//! runs in a spawned task so it always completes, even if the HTTP caller goes away.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info, instrument};

use crate::config::AuthorConfig;
use crate::contest::{ContestClient, ContestService, StaticToken};
use crate::editor::{CommitReceipt, ProblemSetEditor};
use crate::error::{ContestError, EditorError};

/// Called once per successful commit.
pub type CompletionHook = Arc<dyn Fn(&CommitReceipt) + Send + Sync>;

pub struct AppState<S = ContestClient> {
    pub editor: Arc<RwLock<ProblemSetEditor>>,
    pub contest: Arc<S>,
    pub on_commit: CompletionHook,
}

impl AppState<ContestClient> {
    /// Build state from config: fresh session from the configured template and a Contest Service client.
    #[instrument(level = "info", skip_all)]
    pub fn from_config(cfg: &AuthorConfig) -> Result<Self, ContestError> {
        let token = StaticToken::new(cfg.contest_service.token.clone());
        let contest = ContestClient::new(&cfg.contest_service, Arc::new(token))?;
        info!(
            target: "problemset_author",
            base_url = %contest.base_url,
            timeout_secs = cfg.contest_service.timeout_secs,
            authenticated = cfg.contest_service.token.is_some(),
            "Contest service client ready"
        );
        let hook: CompletionHook = Arc::new(|r: &CommitReceipt| {
            info!(target: "contest", commit_id = %r.commit_id, contest_id = r.contest_id, created = r.created, "Commit completed");
        });
        Ok(Self::new(ProblemSetEditor::new(cfg.defaults.clone()), contest, hook))
    }
}

impl<S> AppState<S>
where
    S: ContestService + Send + Sync + 'static,
{
    pub fn new(editor: ProblemSetEditor, contest: S, on_commit: CompletionHook) -> Self {
        Self {
            editor: Arc::new(RwLock::new(editor)),
            contest: Arc::new(contest),
            on_commit,
        }
    }

    /// Commit the current drafts to `contest_id`.
    #[instrument(level = "info", skip(self))]
    pub async fn commit(&self, contest_id: u64) -> Result<CommitReceipt, EditorError> {
        let pending = { self.editor.write().await.begin_commit(contest_id)? };

        let editor = self.editor.clone();
        let contest = self.contest.clone();
        let hook = self.on_commit.clone();
        let task = tokio::spawn(async move {
            let outcome = contest.create_problems(pending.contest_id, &pending.problems).await;
            editor.write().await.finish_commit(pending, outcome, |r| hook(r))
        });

        match task.await {
            Ok(result) => result,
            Err(e) => {
                error!(target: "contest", error = %e, "Commit task aborted");
                self.editor.write().await.abandon_commit();
                Err(EditorError::Commit(ContestError::Aborted(e.to_string())))
            }
        }
    }
}
