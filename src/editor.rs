//! The authoring session: an ordered set of problem drafts, each owning an ordered
//! set of test case drafts, and the batch commit that hands them to the Contest Service.
//!
//! Mutations are synchronous and never touch the network. Commit is the only
//! suspension point and is exclusive: a second commit while one is in flight is
//! refused with [`EditorError::CommitInProgress`], not queued.
//!
//! Numeric fields are coerced with [`parse_bounded_int`] (fallback `0`); range
//! checks happen in [`crate::validate`] right before a commit, never while editing.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::contest::{ContestService, CreatedProblems};
use crate::domain::{FieldValue, Problem, ProblemField, TestCase, TestCaseField};
use crate::error::{ContestError, EditorError};
use crate::seeds::{blank_test_case, sample_test_case, ProblemDefaults};
use crate::util::{kb_to_stored, parse_bounded_int, parse_flag};
use crate::validate::{validate_problems, ValidationIssue};

/// Integer coercion shared by every numeric field: text and numbers go through
/// `parse_bounded_int`, a switch value is not a number and becomes `0`.
fn coerce_int(raw: &FieldValue) -> i32 {
  match raw {
    FieldValue::Text(s) => parse_bounded_int(s, 0),
    FieldValue::Number(n) => parse_bounded_int(&n.to_string(), 0),
    FieldValue::Flag(_) => 0,
  }
}

fn coerce_flag(field: &'static str, raw: FieldValue) -> Result<bool, EditorError> {
  match raw {
    FieldValue::Flag(b) => Ok(b),
    FieldValue::Text(s) => parse_flag(&s).ok_or(EditorError::FieldType { field, expected: "a boolean" }),
    FieldValue::Number(_) => Err(EditorError::FieldType { field, expected: "a boolean" }),
  }
}

fn coerce_text(field: &'static str, raw: FieldValue) -> Result<String, EditorError> {
  match raw {
    FieldValue::Text(s) => Ok(s),
    FieldValue::Number(n) => Ok(n.to_string()),
    FieldValue::Flag(_) => Err(EditorError::FieldType { field, expected: "text" }),
  }
}

fn out_of_range(what: &'static str, index: usize, len: usize) -> EditorError {
  EditorError::IndexOutOfRange { what, index, len }
}

/// Ordered test case drafts of one problem. Serializes as the bare `test_cases` array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestCaseEditor {
  cases: Vec<TestCase>,
}

impl TestCaseEditor {
  /// A list holding only the sample test case.
  pub fn seeded() -> Self {
    Self { cases: vec![sample_test_case()] }
  }

  pub fn len(&self) -> usize { self.cases.len() }

  pub fn is_empty(&self) -> bool { self.cases.is_empty() }

  pub fn iter(&self) -> std::slice::Iter<'_, TestCase> { self.cases.iter() }

  /// Append a hidden test case numbered after the current count.
  /// Orders are never compacted, so the new order may repeat an edited one.
  pub fn add_test_case(&mut self) -> &TestCase {
    let order = i32::try_from(self.cases.len()).unwrap_or(i32::MAX - 1) + 1;
    self.cases.push(blank_test_case(order));
    &self.cases[self.cases.len() - 1]
  }

  /// Remove one test case. The last remaining one cannot be removed.
  pub fn remove_test_case(&mut self, index: usize) -> Result<TestCase, EditorError> {
    if index >= self.cases.len() {
      return Err(out_of_range("test case", index, self.cases.len()));
    }
    if self.cases.len() == 1 {
      return Err(EditorError::LastTestCase);
    }
    Ok(self.cases.remove(index))
  }

  pub fn update_test_case_field(
    &mut self,
    index: usize,
    field: TestCaseField,
    raw: FieldValue,
  ) -> Result<(), EditorError> {
    let len = self.cases.len();
    let tc = self.cases.get_mut(index).ok_or_else(|| out_of_range("test case", index, len))?;
    let name = field.name();
    match field {
      TestCaseField::Name => tc.name = coerce_text(name, raw)?,
      TestCaseField::InputData => tc.input_data = coerce_text(name, raw)?,
      TestCaseField::ExpectedOutput => tc.expected_output = coerce_text(name, raw)?,
      TestCaseField::IsSample => tc.is_sample = coerce_flag(name, raw)?,
      TestCaseField::IsPublic => tc.is_public = coerce_flag(name, raw)?,
      TestCaseField::Order => tc.order = coerce_int(&raw),
    }
    Ok(())
  }
}

#[cfg(test)]
impl TestCaseEditor {
  pub fn get(&self, index: usize) -> Option<&TestCase> { self.cases.get(index) }

  pub fn orders(&self) -> Vec<i32> { self.cases.iter().map(|c| c.order).collect() }
}

impl<'a> IntoIterator for &'a TestCaseEditor {
  type Item = &'a TestCase;
  type IntoIter = std::slice::Iter<'a, TestCase>;

  fn into_iter(self) -> Self::IntoIter { self.cases.iter() }
}

/// Outcome of a successful commit, handed to the completion hook.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommitReceipt {
  pub commit_id: Uuid,
  pub contest_id: u64,
  /// Problems sent in the batch.
  pub submitted: usize,
  /// Problems the service reports as created.
  pub created: usize,
}

/// A batch that has left the editor and awaits the service's answer.
#[derive(Debug)]
pub struct PendingCommit {
  pub commit_id: Uuid,
  pub contest_id: u64,
  pub problems: Vec<Problem>,
}

/// Ordered problem drafts of one authoring session.
#[derive(Debug)]
pub struct ProblemSetEditor {
  template: ProblemDefaults,
  problems: Vec<Problem>,
  committing: bool,
}

impl Default for ProblemSetEditor {
  fn default() -> Self { Self::new(ProblemDefaults::default()) }
}

impl ProblemSetEditor {
  /// Start a session with one fresh draft built from `template`.
  pub fn new(template: ProblemDefaults) -> Self {
    let problems = vec![template.instantiate()];
    Self { template, problems, committing: false }
  }

  pub fn problems(&self) -> &[Problem] { &self.problems }

  pub fn len(&self) -> usize { self.problems.len() }

  pub fn is_committing(&self) -> bool { self.committing }

  #[instrument(level = "debug", target = "contest", skip(self))]
  pub fn add_problem(&mut self) -> usize {
    self.problems.push(self.template.instantiate());
    debug!(target: "contest", len = self.problems.len(), "Problem draft added");
    self.problems.len() - 1
  }

  /// Remove one draft. The last remaining draft cannot be removed.
  #[instrument(level = "debug", target = "contest", skip(self))]
  pub fn remove_problem(&mut self, index: usize) -> Result<Problem, EditorError> {
    if index >= self.problems.len() {
      return Err(out_of_range("problem", index, self.problems.len()));
    }
    if self.problems.len() == 1 {
      return Err(EditorError::LastProblem);
    }
    let removed = self.problems.remove(index);
    debug!(target: "contest", len = self.problems.len(), "Problem draft removed");
    Ok(removed)
  }

  fn problem_mut(&mut self, index: usize) -> Result<&mut Problem, EditorError> {
    let len = self.problems.len();
    self.problems.get_mut(index).ok_or_else(|| out_of_range("problem", index, len))
  }

  /// Apply one field edit. `MemoryLimitKb` takes the displayed KB value and stores `kb * 1000`.
  pub fn update_problem_field(
    &mut self,
    index: usize,
    field: ProblemField,
    raw: FieldValue,
  ) -> Result<(), EditorError> {
    let p = self.problem_mut(index)?;
    let name = field.name();
    match field {
      ProblemField::Title => p.title = coerce_text(name, raw)?,
      ProblemField::Statement => p.statement = coerce_text(name, raw)?,
      ProblemField::Difficulty => {
        p.difficulty = coerce_text(name, raw)?
          .parse()
          .map_err(|message| EditorError::InvalidValue { field: name, message })?
      }
      ProblemField::Points => p.points = coerce_int(&raw),
      ProblemField::TimeLimitMs => p.time_limit_ms = coerce_int(&raw),
      ProblemField::MemoryLimitKb => p.memory_limit = kb_to_stored(coerce_int(&raw)),
      ProblemField::CpuTimeLimitMs => p.cpu_time_limit_ms = coerce_int(&raw),
      ProblemField::EnableNetwork => p.enable_network = coerce_flag(name, raw)?,
      ProblemField::MaxSubmissions => p.max_submissions = coerce_int(&raw),
      ProblemField::AllowMultipleLanguages => p.allow_multiple_languages = coerce_flag(name, raw)?,
      ProblemField::DefaultLanguageId => p.default_language_id = coerce_int(&raw),
    }
    Ok(())
  }

  /// Test case editor of one problem.
  pub fn test_cases_mut(&mut self, problem: usize) -> Result<&mut TestCaseEditor, EditorError> {
    Ok(&mut self.problem_mut(problem)?.test_cases)
  }

  pub fn add_test_case(&mut self, problem: usize) -> Result<i32, EditorError> {
    Ok(self.test_cases_mut(problem)?.add_test_case().order)
  }

  pub fn remove_test_case(&mut self, problem: usize, index: usize) -> Result<TestCase, EditorError> {
    self.test_cases_mut(problem)?.remove_test_case(index)
  }

  pub fn update_test_case_field(
    &mut self,
    problem: usize,
    index: usize,
    field: TestCaseField,
    raw: FieldValue,
  ) -> Result<(), EditorError> {
    self.test_cases_mut(problem)?.update_test_case_field(index, field, raw)
  }

  pub fn validate(&self) -> Vec<ValidationIssue> {
    validate_problems(&self.problems)
  }

  /// Check the drafts and hand out the batch. Sets the in-progress flag; every
  /// successful call must be paired with [`finish_commit`](Self::finish_commit).
  #[instrument(level = "info", target = "contest", skip(self), fields(problems = self.problems.len()))]
  pub fn begin_commit(&mut self, contest_id: u64) -> Result<PendingCommit, EditorError> {
    if self.committing {
      warn!(target: "contest", contest_id, "Commit refused: another commit is in flight");
      return Err(EditorError::CommitInProgress);
    }
    let issues = self.validate();
    if !issues.is_empty() {
      info!(target: "contest", contest_id, issues = issues.len(), "Commit refused: drafts are invalid");
      return Err(EditorError::Invalid(issues));
    }
    self.committing = true;
    Ok(PendingCommit { commit_id: Uuid::new_v4(), contest_id, problems: self.problems.clone() })
  }

  /// Settle a commit. On success the editor resets to one fresh draft and
  /// `on_complete` runs; on failure the drafts are left exactly as they are.
  #[instrument(level = "info", target = "contest", skip_all, fields(commit_id = %pending.commit_id, contest_id = pending.contest_id))]
  pub fn finish_commit<F>(
    &mut self,
    pending: PendingCommit,
    outcome: Result<CreatedProblems, ContestError>,
    on_complete: F,
  ) -> Result<CommitReceipt, EditorError>
  where
    F: FnOnce(&CommitReceipt),
  {
    self.committing = false;
    match outcome {
      Ok(created) => {
        self.problems = vec![self.template.instantiate()];
        let receipt = CommitReceipt {
          commit_id: pending.commit_id,
          contest_id: pending.contest_id,
          submitted: pending.problems.len(),
          created: created.count(),
        };
        info!(target: "contest", submitted = receipt.submitted, created = receipt.created, "Problems committed; editor reset");
        on_complete(&receipt);
        Ok(receipt)
      }
      Err(e) => {
        warn!(target: "contest", error = %e, "Commit failed; drafts kept");
        Err(EditorError::Commit(e))
      }
    }
  }

  /// Clear the in-progress flag without touching the drafts, for a commit whose
  /// outcome will never arrive.
  pub fn abandon_commit(&mut self) {
    if self.committing {
      warn!(target: "contest", "Commit abandoned; drafts kept");
      self.committing = false;
    }
  }

  /// Validate, submit and settle in one call, for callers that own the editor outright.
  pub async fn commit<S, F>(
    &mut self,
    service: &S,
    contest_id: u64,
    on_complete: F,
  ) -> Result<CommitReceipt, EditorError>
  where
    S: ContestService,
    F: FnOnce(&CommitReceipt),
  {
    let pending = self.begin_commit(contest_id)?;
    let outcome = service.create_problems(contest_id, &pending.problems).await;
    self.finish_commit(pending, outcome, on_complete)
  }
}
