use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::prompts::{build_evaluation_prompt, EVALUATION_SYSTEM};
use crate::llm_client::LlmError;
use crate::models::screening::{ApplicantRow, FitCategory, JobRow};
use crate::screening::evaluator::{BatchReport, Evaluator, QUOTA_FALLBACK_REASONING};
use crate::screening::parser::parse_evaluation;
use crate::state::AppState;

/// Reasoning returned when the model call itself fails on the stateless
/// evaluation endpoint. Still HTTP 200 so the client flow never breaks.
pub const FAILURE_FALLBACK_REASONING: &str =
    "Could not perform evaluation due to API service issues.";

#[derive(Deserialize)]
pub struct ApplicantFilter {
    pub job_id: Option<Uuid>,
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    Ok(Json(state.store.list_jobs().await?))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    let job = state
        .store
        .get_job(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(job))
}

/// GET /api/v1/applicants?job_id=...
pub async fn handle_list_applicants(
    State(state): State<AppState>,
    Query(filter): Query<ApplicantFilter>,
) -> Result<Json<Vec<ApplicantRow>>, AppError> {
    Ok(Json(state.store.list_applicants(filter.job_id).await?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub job_description: Option<String>,
    pub job_skills: Option<Vec<String>>,
    pub resume_summary: Option<String>,
}

#[derive(Serialize)]
pub struct EvaluateResponse {
    pub category: FitCategory,
    pub reasoning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// POST /api/v1/evaluate
///
/// Stateless evaluation of one (job description, skills, resume) triple.
/// Missing fields are the only 400 here; once the request is well-formed the
/// endpoint always answers 200 with a valid pair, degrading to a fixed
/// fallback when the provider refuses or the call fails.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    let job_description = req
        .job_description
        .ok_or_else(|| AppError::Validation("jobDescription is required".to_string()))?;
    let job_skills = req
        .job_skills
        .ok_or_else(|| AppError::Validation("jobSkills is required".to_string()))?;
    let resume_summary = req
        .resume_summary
        .ok_or_else(|| AppError::Validation("resumeSummary is required".to_string()))?;

    let prompt = build_evaluation_prompt(&job_description, None, &job_skills, &resume_summary);
    let result = state.model.complete(EVALUATION_SYSTEM, &prompt).await;

    Ok(Json(to_evaluate_response(result)))
}

/// Maps the model call outcome to the endpoint response. Once the request is
/// well-formed the endpoint never fails: a quota refusal and a broken call
/// both degrade to a fixed Maybe Fit pair, the latter carrying the underlying
/// message in `error`.
fn to_evaluate_response(result: Result<String, LlmError>) -> EvaluateResponse {
    match result {
        Ok(raw) => {
            let evaluation = parse_evaluation(&raw);
            EvaluateResponse {
                category: evaluation.category,
                reasoning: evaluation.reasoning,
                error: None,
            }
        }
        Err(e) if e.is_quota() => EvaluateResponse {
            category: FitCategory::MaybeFit,
            reasoning: QUOTA_FALLBACK_REASONING.to_string(),
            error: None,
        },
        Err(e) => {
            tracing::error!("Evaluation call failed: {e}");
            EvaluateResponse {
                category: FitCategory::MaybeFit,
                reasoning: FAILURE_FALLBACK_REASONING.to_string(),
                error: Some(e.to_string()),
            }
        }
    }
}

#[derive(Deserialize)]
pub struct CategorizeJobRequest {
    pub criteria: String,
}

/// POST /api/v1/jobs/:id/categorize
/// Persists the criteria, then re-evaluates every applicant of the job.
pub async fn handle_categorize_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CategorizeJobRequest>,
) -> Result<Json<BatchReport>, AppError> {
    let evaluator = Evaluator::new(state.store.clone(), state.model.clone());
    let report = evaluator.evaluate_job(id, &req.criteria).await?;
    Ok(Json(report))
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct CategorizeAllRequest {
    pub criteria: Option<String>,
}

/// POST /api/v1/applicants/categorize
/// Re-evaluates every applicant across all jobs.
pub async fn handle_categorize_all(
    State(state): State<AppState>,
    Json(req): Json<CategorizeAllRequest>,
) -> Result<Json<BatchReport>, AppError> {
    let evaluator = Evaluator::new(state.store.clone(), state.model.clone());
    let report = evaluator.evaluate_all(req.criteria.as_deref()).await?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successful_model_call_is_parsed_into_response() {
        let response =
            to_evaluate_response(Ok(r#"{"category":"Good Fit","reasoning":"Strong match"}"#
                .to_string()));
        assert_eq!(response.category, FitCategory::GoodFit);
        assert_eq!(response.reasoning, "Strong match");
        assert!(response.error.is_none());
    }

    #[test]
    fn test_quota_refusal_degrades_without_error_field() {
        let response = to_evaluate_response(Err(LlmError::QuotaExhausted));
        assert_eq!(response.category, FitCategory::MaybeFit);
        assert_eq!(response.reasoning, QUOTA_FALLBACK_REASONING);
        assert!(response.error.is_none());
    }

    #[test]
    fn test_generic_failure_degrades_with_error_field() {
        let response = to_evaluate_response(Err(LlmError::Api {
            status: 500,
            message: "upstream down".to_string(),
        }));
        assert_eq!(response.category, FitCategory::MaybeFit);
        assert_eq!(response.reasoning, FAILURE_FALLBACK_REASONING);
        let error = response.error.expect("error field should be set");
        assert!(error.contains("upstream down"));
    }

    #[test]
    fn test_empty_model_content_degrades_with_error_field() {
        let response = to_evaluate_response(Err(LlmError::EmptyContent));
        assert_eq!(response.category, FitCategory::MaybeFit);
        assert_eq!(response.reasoning, FAILURE_FALLBACK_REASONING);
        assert!(response.error.is_some());
    }
}
