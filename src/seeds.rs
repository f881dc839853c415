//! Template data for fresh drafts: the problem defaults and the seeded sample test case.

use serde::{Deserialize, Serialize};

use crate::domain::{Difficulty, Problem, TestCase};
use crate::editor::TestCaseEditor;
use crate::languages::PYTHON;

pub const SAMPLE_TEST_CASE_NAME: &str = "Sample Test Case";

/// Values every new problem draft starts from.
/// Overridable from the `[defaults]` table of the TOML config; missing keys keep these values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemDefaults {
    pub title: String,
    pub statement: String,
    pub difficulty: Difficulty,
    pub points: i32,
    pub time_limit_ms: i32,
    pub memory_limit_kb: i32,
    pub cpu_time_limit_ms: i32,
    pub enable_network: bool,
    pub max_submissions: i32,
    pub allow_multiple_languages: bool,
    pub default_language_id: i32,
}

impl Default for ProblemDefaults {
    fn default() -> Self {
        Self {
            title: String::new(),
            statement: String::new(),
            difficulty: Difficulty::Medium,
            points: 100,
            time_limit_ms: 2000,
            memory_limit_kb: 128,
            cpu_time_limit_ms: 2000,
            enable_network: false,
            max_submissions: 10,
            allow_multiple_languages: true,
            default_language_id: PYTHON,
        }
    }
}

impl ProblemDefaults {
    /// Build a fresh draft carrying one seeded sample test case.
    pub fn instantiate(&self) -> Problem {
        Problem {
            title: self.title.clone(),
            statement: self.statement.clone(),
            difficulty: self.difficulty,
            points: self.points,
            time_limit_ms: self.time_limit_ms,
            memory_limit: crate::util::kb_to_stored(self.memory_limit_kb),
            cpu_time_limit_ms: self.cpu_time_limit_ms,
            enable_network: self.enable_network,
            max_submissions: self.max_submissions,
            allow_multiple_languages: self.allow_multiple_languages,
            default_language_id: self.default_language_id,
            test_cases: TestCaseEditor::seeded(),
        }
    }
}

/// The test case every fresh problem starts with.
pub fn sample_test_case() -> TestCase {
    TestCase {
        name: SAMPLE_TEST_CASE_NAME.into(),
        input_data: String::new(),
        expected_output: String::new(),
        is_sample: true,
        is_public: true,
        order: 1,
    }
}

/// A blank hidden test case at the given position.
pub fn blank_test_case(order: i32) -> TestCase {
    TestCase {
        name: format!("Test Case {order}"),
        input_data: String::new(),
        expected_output: String::new(),
        is_sample: false,
        is_public: false,
        order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_matches_judge_defaults() {
        let p = ProblemDefaults::default().instantiate();
        assert_eq!(p.difficulty, Difficulty::Medium);
        assert_eq!(p.points, 100);
        assert_eq!(p.time_limit_ms, 2000);
        assert_eq!(p.memory_limit, 128_000);
        assert_eq!(p.memory_limit_kb(), 128);
        assert_eq!(p.cpu_time_limit_ms, 2000);
        assert!(!p.enable_network);
        assert_eq!(p.max_submissions, 10);
        assert!(p.allow_multiple_languages);
        assert_eq!(p.default_language_id, 71);
        assert_eq!(p.test_cases.len(), 1);
        assert_eq!(p.test_cases.get(0), Some(&sample_test_case()));
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let d: ProblemDefaults = toml::from_str("points = 250\ndifficulty = \"Hard\"").unwrap();
        assert_eq!(d.points, 250);
        assert_eq!(d.difficulty, Difficulty::Hard);
        assert_eq!(d.max_submissions, 10);
    }
}
