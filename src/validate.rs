//! Commit-time checks for problem drafts. Editing never rejects a value on range
//! grounds; these checks run only when a batch is about to leave the editor.

use std::fmt;
use std::ops::RangeInclusive;

use serde::Serialize;

use crate::domain::Problem;
use crate::languages::is_supported;

pub const MIN_POINTS: i32 = 1;
pub const TIME_LIMIT_MS: RangeInclusive<i32> = 100..=20_000;
pub const MEMORY_LIMIT_KB: RangeInclusive<i32> = 32..=512;
pub const MAX_SUBMISSIONS: RangeInclusive<i32> = 1..=50;
pub const MIN_ORDER: i32 = 1;

/// One problem found in a draft. Indices are zero-based positions in the editor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub problem: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_case: Option<usize>,
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "problem {}", self.problem + 1)?;
        if let Some(tc) = self.test_case {
            write!(f, ", test case {}", tc + 1)?;
        }
        write!(f, ": {} {}", self.field, self.message)
    }
}

fn check_range(
    issues: &mut Vec<ValidationIssue>,
    problem: usize,
    field: &'static str,
    value: i32,
    range: &RangeInclusive<i32>,
) {
    if !range.contains(&value) {
        issues.push(ValidationIssue {
            problem,
            test_case: None,
            field,
            message: format!("must be between {} and {} (got {value})", range.start(), range.end()),
        });
    }
}

/// Collect every issue of one problem draft.
pub fn validate_problem(index: usize, p: &Problem) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut push = |field: &'static str, message: String| {
        issues.push(ValidationIssue { problem: index, test_case: None, field, message })
    };

    if p.title.trim().is_empty() {
        push("title", "is required".into());
    }
    if p.statement.trim().is_empty() {
        push("statement", "is required".into());
    }
    if p.points < MIN_POINTS {
        push("points", format!("must be at least {MIN_POINTS} (got {})", p.points));
    }
    if !is_supported(p.default_language_id) {
        push(
            "defaultLanguageId",
            format!("{} is not a supported language", p.default_language_id),
        );
    }
    if p.test_cases.is_empty() {
        push("testCases", "must contain at least one test case".into());
    }

    check_range(&mut issues, index, "timeLimitMs", p.time_limit_ms, &TIME_LIMIT_MS);
    check_range(&mut issues, index, "memoryLimitKb", p.memory_limit_kb(), &MEMORY_LIMIT_KB);
    check_range(&mut issues, index, "maxSubmissions", p.max_submissions, &MAX_SUBMISSIONS);

    for (i, tc) in p.test_cases.iter().enumerate() {
        if tc.order < MIN_ORDER {
            issues.push(ValidationIssue {
                problem: index,
                test_case: Some(i),
                field: "order",
                message: format!("must be at least {MIN_ORDER} (got {})", tc.order),
            });
        }
    }

    issues
}

/// Collect every issue across a whole batch, in editor order.
pub fn validate_problems(problems: &[Problem]) -> Vec<ValidationIssue> {
    problems
        .iter()
        .enumerate()
        .flat_map(|(i, p)| validate_problem(i, p))
        .collect()
}
