//! Single-applicant and batch evaluation.
//!
//! The batch path is deliberately best-effort: one applicant's failure is
//! recorded and the pass moves on. Applicants are processed one at a time, so
//! at most one model call is outstanding per batch.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::prompts::{build_evaluation_prompt, EVALUATION_SYSTEM};
use crate::llm_client::ChatModel;
use crate::models::screening::{ApplicantRow, FitCategory};
use crate::screening::parser::{parse_evaluation, Evaluation};
use crate::screening::store::ScreeningStore;

/// Reasoning stored when the provider refuses the call on quota grounds.
/// Quota refusal is degradation, not failure: the applicant still receives a
/// well-formed (Maybe Fit, reasoning) pair.
pub const QUOTA_FALLBACK_REASONING: &str =
    "Unable to evaluate due to API quota limits. Please check your API subscription.";

/// Per-applicant result of a batch pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantOutcome {
    pub applicant_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<FitCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApplicantOutcome {
    fn updated(applicant_id: Uuid, category: FitCategory) -> Self {
        Self {
            applicant_id,
            category: Some(category),
            error: None,
        }
    }

    fn failed(applicant_id: Uuid, error: String) -> Self {
        Self {
            applicant_id,
            category: None,
            error: Some(error),
        }
    }
}

/// Aggregate outcome of one batch pass. The batch "succeeds" when the
/// iteration finishes, independent of how many applicants failed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<ApplicantOutcome>,
}

impl BatchReport {
    fn from_outcomes(outcomes: Vec<ApplicantOutcome>) -> Self {
        let attempted = outcomes.len();
        let succeeded = outcomes.iter().filter(|o| o.error.is_none()).count();
        Self {
            attempted,
            succeeded,
            failed: attempted - succeeded,
            outcomes,
        }
    }
}

/// Drives evaluation for one applicant or a whole applicant set.
#[derive(Clone)]
pub struct Evaluator {
    store: Arc<dyn ScreeningStore>,
    model: Arc<dyn ChatModel>,
}

impl Evaluator {
    pub fn new(store: Arc<dyn ScreeningStore>, model: Arc<dyn ChatModel>) -> Self {
        Self { store, model }
    }

    /// Evaluates one applicant and persists the result.
    ///
    /// Category and reasoning are written together in a single store call;
    /// every failure path leaves the applicant record untouched.
    pub async fn evaluate_applicant(
        &self,
        applicant_id: Uuid,
        criteria: Option<&str>,
    ) -> Result<Evaluation, AppError> {
        let applicant = self
            .store
            .get_applicant(applicant_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Applicant {applicant_id} not found")))?;

        let job = self
            .store
            .get_job(applicant.job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {} not found", applicant.job_id)))?;

        let prompt = build_evaluation_prompt(
            &job.description,
            criteria,
            &job.skills,
            &applicant.resume_summary,
        );

        let evaluation = match self.model.complete(EVALUATION_SYSTEM, &prompt).await {
            Ok(raw) => parse_evaluation(&raw),
            Err(e) if e.is_quota() => {
                warn!("Provider quota exhausted; degrading applicant {applicant_id} to fallback");
                Evaluation {
                    category: FitCategory::MaybeFit,
                    reasoning: QUOTA_FALLBACK_REASONING.to_string(),
                }
            }
            Err(e) => {
                return Err(AppError::Llm(format!(
                    "Evaluation call failed for applicant {applicant_id}: {e}"
                )))
            }
        };

        self.store
            .update_applicant_evaluation(applicant_id, evaluation.category, &evaluation.reasoning)
            .await?;

        Ok(evaluation)
    }

    /// Records the submitted criteria, then evaluates every applicant of one
    /// job against it. A criteria-persistence failure aborts the whole
    /// operation before any applicant is touched.
    pub async fn evaluate_job(&self, job_id: Uuid, criteria: &str) -> Result<BatchReport, AppError> {
        let criteria = criteria.trim();
        if criteria.is_empty() {
            return Err(AppError::Validation(
                "Evaluation criteria must not be empty".to_string(),
            ));
        }

        let job = self
            .store
            .get_job(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

        self.store.insert_criteria(job.id, criteria).await?;

        let applicants = self.store.list_applicants(Some(job.id)).await?;
        info!(
            "Starting batch evaluation of {} applicant(s) for job '{}'",
            applicants.len(),
            job.title
        );
        Ok(self.run_batch(&applicants, Some(criteria)).await)
    }

    /// Evaluates every applicant across all jobs. Criteria is optional here
    /// and is not persisted, since there is no single owning job.
    pub async fn evaluate_all(&self, criteria: Option<&str>) -> Result<BatchReport, AppError> {
        let criteria = criteria.map(str::trim).filter(|c| !c.is_empty());
        let applicants = self.store.list_applicants(None).await?;
        info!(
            "Starting batch evaluation of all {} applicant(s)",
            applicants.len()
        );
        Ok(self.run_batch(&applicants, criteria).await)
    }

    async fn run_batch(
        &self,
        applicants: &[ApplicantRow],
        criteria: Option<&str>,
    ) -> BatchReport {
        let mut outcomes = Vec::with_capacity(applicants.len());

        for applicant in applicants {
            match self.evaluate_applicant(applicant.id, criteria).await {
                Ok(evaluation) => {
                    outcomes.push(ApplicantOutcome::updated(applicant.id, evaluation.category));
                }
                Err(err) => {
                    // One applicant's failure never aborts the batch.
                    warn!("Skipping applicant {}: {err}", applicant.id);
                    outcomes.push(ApplicantOutcome::failed(applicant.id, err.to_string()));
                }
            }
        }

        let report = BatchReport::from_outcomes(outcomes);
        info!(
            "Batch evaluation finished: {}/{} applicant(s) updated",
            report.succeeded, report.attempted
        );
        report
    }
}
