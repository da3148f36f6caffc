use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Fit classification assigned to an applicant relative to a job.
///
/// INVARIANT: every stored applicant carries exactly one of these three values.
/// Anything else coming back from the model resolves to `MaybeFit` — see
/// `FitCategory::parse` and the response parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitCategory {
    #[serde(rename = "Good Fit")]
    GoodFit,
    #[default]
    #[serde(rename = "Maybe Fit")]
    MaybeFit,
    #[serde(rename = "Not a Fit")]
    NotAFit,
}

impl FitCategory {
    pub const ALL: [FitCategory; 3] =
        [FitCategory::GoodFit, FitCategory::MaybeFit, FitCategory::NotAFit];

    pub fn as_str(&self) -> &'static str {
        match self {
            FitCategory::GoodFit => "Good Fit",
            FitCategory::MaybeFit => "Maybe Fit",
            FitCategory::NotAFit => "Not a Fit",
        }
    }

    /// Exact-literal parse. Returns `None` for anything that is not one of the
    /// three category strings; callers decide whether that defaults or errors.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Good Fit" => Some(FitCategory::GoodFit),
            "Maybe Fit" => Some(FitCategory::MaybeFit),
            "Not a Fit" => Some(FitCategory::NotAFit),
            _ => None,
        }
    }
}

impl std::fmt::Display for FitCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A job opening. Created by external administration; read-only to this service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
}

/// An applicant to one job. `category` and `reasoning` are mutated only by the
/// evaluation flow, and always together in a single write.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub name: String,
    pub resume_summary: String,
    pub category: String,
    pub reasoning: String,
}

/// Append-only audit record of criteria submitted against a job.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationCriteriaRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub criteria: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_category_serde_uses_spaced_literals() {
        let json = serde_json::to_string(&FitCategory::NotAFit).unwrap();
        assert_eq!(json, r#""Not a Fit""#);
        let parsed: FitCategory = serde_json::from_str(r#""Good Fit""#).unwrap();
        assert_eq!(parsed, FitCategory::GoodFit);
    }

    #[test]
    fn test_fit_category_parse_round_trips_all_literals() {
        for category in FitCategory::ALL {
            assert_eq!(FitCategory::parse(category.as_str()), Some(category));
        }
    }

    #[test]
    fn test_fit_category_parse_rejects_unknown_values() {
        assert_eq!(FitCategory::parse("Excellent"), None);
        assert_eq!(FitCategory::parse("good fit"), None);
        assert_eq!(FitCategory::parse(""), None);
    }

    #[test]
    fn test_fit_category_default_is_maybe_fit() {
        assert_eq!(FitCategory::default(), FitCategory::MaybeFit);
    }
}
