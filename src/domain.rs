//! Domain models for the authoring session: problem and test-case drafts,
//! difficulty, and the field selectors/raw values used by field-level setters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::editor::TestCaseEditor;

/// How hard a problem is. Serialized exactly as the Contest Service stores it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
  Easy,
  #[default]
  Medium,
  Hard,
}

impl Difficulty {
  pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

  pub fn as_str(self) -> &'static str {
    match self {
      Difficulty::Easy => "Easy",
      Difficulty::Medium => "Medium",
      Difficulty::Hard => "Hard",
    }
  }
}

impl fmt::Display for Difficulty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Difficulty {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Difficulty::ALL
      .into_iter()
      .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| format!("unknown difficulty '{s}' (expected Easy, Medium or Hard)"))
  }
}

/// One test case draft. Field names match the Contest Service wire format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
  pub name: String,
  #[serde(default)] pub input_data: String,
  #[serde(default)] pub expected_output: String,
  #[serde(default)] pub is_sample: bool,
  #[serde(default)] pub is_public: bool,
  pub order: i32,
}

/// One problem draft, including its judge-execution parameters.
///
/// `memory_limit` is the stored value; the administrator edits it in KB and
/// the stored value is always `kb * 1000` (see [`crate::util::kb_to_stored`]).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
  pub title: String,
  pub statement: String,
  pub difficulty: Difficulty,
  pub points: i32,
  #[serde(rename = "time_limit")] pub time_limit_ms: i32,
  pub memory_limit: i64,
  #[serde(rename = "cpu_time_limit")] pub cpu_time_limit_ms: i32,
  pub enable_network: bool,
  pub max_submissions: i32,
  pub allow_multiple_languages: bool,
  pub default_language_id: i32,
  pub test_cases: TestCaseEditor,
}

impl Problem {
  /// Memory limit as displayed to the administrator.
  pub fn memory_limit_kb(&self) -> i32 {
    crate::util::stored_to_kb(self.memory_limit)
  }
}

/// Selector for `ProblemSetEditor::update_problem_field`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProblemField {
  Title,
  Statement,
  Difficulty,
  Points,
  TimeLimitMs,
  MemoryLimitKb,
  CpuTimeLimitMs,
  EnableNetwork,
  MaxSubmissions,
  AllowMultipleLanguages,
  DefaultLanguageId,
}

impl ProblemField {
  pub fn name(self) -> &'static str {
    use ProblemField::*;
    match self {
      Title => "title",
      Statement => "statement",
      Difficulty => "difficulty",
      Points => "points",
      TimeLimitMs => "timeLimitMs",
      MemoryLimitKb => "memoryLimitKb",
      CpuTimeLimitMs => "cpuTimeLimitMs",
      EnableNetwork => "enableNetwork",
      MaxSubmissions => "maxSubmissions",
      AllowMultipleLanguages => "allowMultipleLanguages",
      DefaultLanguageId => "defaultLanguageId",
    }
  }
}

impl FromStr for ProblemField {
  type Err = String;

  /// Accepts the camelCase editor names and the snake_case wire names.
  /// The memory limit is only addressable in KB (`memoryLimitKb` / `memory_limit_kb`).
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    use ProblemField::*;
    Ok(match s {
      "title" => Title,
      "statement" => Statement,
      "difficulty" => Difficulty,
      "points" => Points,
      "timeLimitMs" | "time_limit" => TimeLimitMs,
      "memoryLimitKb" | "memory_limit_kb" => MemoryLimitKb,
      "cpuTimeLimitMs" | "cpu_time_limit" => CpuTimeLimitMs,
      "enableNetwork" | "enable_network" => EnableNetwork,
      "maxSubmissions" | "max_submissions" => MaxSubmissions,
      "allowMultipleLanguages" | "allow_multiple_languages" => AllowMultipleLanguages,
      "defaultLanguageId" | "default_language_id" => DefaultLanguageId,
      other => return Err(other.to_string()),
    })
  }
}

/// Selector for `TestCaseEditor::update_test_case_field`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestCaseField {
  Name,
  InputData,
  ExpectedOutput,
  IsSample,
  IsPublic,
  Order,
}

impl TestCaseField {
  pub fn name(self) -> &'static str {
    use TestCaseField::*;
    match self {
      Name => "name",
      InputData => "inputData",
      ExpectedOutput => "expectedOutput",
      IsSample => "isSample",
      IsPublic => "isPublic",
      Order => "order",
    }
  }
}

impl FromStr for TestCaseField {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    use TestCaseField::*;
    Ok(match s {
      "name" => Name,
      "inputData" | "input_data" => InputData,
      "expectedOutput" | "expected_output" => ExpectedOutput,
      "isSample" | "is_sample" => IsSample,
      "isPublic" | "is_public" => IsPublic,
      "order" => Order,
      other => return Err(other.to_string()),
    })
  }
}

/// Raw value coming from an input control: text boxes send strings, switches send booleans.
/// JSON numbers are accepted too and treated as their decimal text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
  Flag(bool),
  Number(serde_json::Number),
  Text(String),
}

impl From<&str> for FieldValue {
  fn from(s: &str) -> Self { FieldValue::Text(s.to_string()) }
}

impl From<String> for FieldValue {
  fn from(s: String) -> Self { FieldValue::Text(s) }
}

impl From<bool> for FieldValue {
  fn from(b: bool) -> Self { FieldValue::Flag(b) }
}

impl From<i64> for FieldValue {
  fn from(n: i64) -> Self { FieldValue::Number(n.into()) }
}
