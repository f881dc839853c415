//! Public protocol structs for the local authoring API (serde ready).
//! Keep this small and stable to evolve backend and admin UI independently.

use serde::{Deserialize, Serialize};

use crate::domain::{FieldValue, Problem};
use crate::editor::{CommitReceipt, ProblemSetEditor};
use crate::languages::{Language, SUPPORTED_LANGUAGES};
use crate::validate::ValidationIssue;

pub const COMMIT_SUCCESS_MESSAGE: &str = "Problems added successfully!";

#[derive(Debug, Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct LanguagesOut {
    pub languages: &'static [Language],
}

impl Default for LanguagesOut {
    fn default() -> Self {
        Self { languages: &SUPPORTED_LANGUAGES }
    }
}

/// One field edit. `field` accepts editor (camelCase) or wire (snake_case) names.
#[derive(Debug, Deserialize)]
pub struct FieldUpdateIn {
    pub field: String,
    pub value: FieldValue,
}

/// A problem draft as shown in the UI: the wire fields plus the memory limit in KB.
#[derive(Debug, Serialize)]
pub struct ProblemOut {
    #[serde(flatten)]
    pub problem: Problem,
    pub memory_limit_kb: i32,
}

/// Full view of the session, returned by every mutation.
#[derive(Debug, Serialize)]
pub struct EditorSnapshot {
    pub committing: bool,
    pub problems: Vec<ProblemOut>,
}

impl EditorSnapshot {
    pub fn of(editor: &ProblemSetEditor) -> Self {
        Self {
            committing: editor.is_committing(),
            problems: editor
                .problems()
                .iter()
                .map(|p| ProblemOut { memory_limit_kb: p.memory_limit_kb(), problem: p.clone() })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IssuesOut {
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
}

#[derive(Debug, Serialize)]
pub struct CommitOut {
    pub message: &'static str,
    #[serde(flatten)]
    pub receipt: CommitReceipt,
}
