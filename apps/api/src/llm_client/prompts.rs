//! Prompt constants and builders for applicant evaluation.

/// System prompt for applicant evaluation.
/// The three category literals MUST appear verbatim here: the lenient response
/// parser falls back to searching the model output for these exact strings.
pub const EVALUATION_SYSTEM: &str = "\
You are an AI assistant that helps HR departments evaluate job applicants. \
You will be given a job description, required skills, and a resume summary. \
Your task is to evaluate whether the applicant is a good fit for the position. \
Categorize the applicant as either:\n\
- \"Good Fit\": The applicant meets almost all requirements and has relevant experience.\n\
- \"Maybe Fit\": The applicant meets some requirements but lacks in other areas.\n\
- \"Not a Fit\": The applicant does not meet the core requirements for the position.\n\
\n\
Provide a brief reasoning for your decision (1-2 sentences only). \
Return ONLY a JSON object with two fields:\n\
- \"category\": one of the three categories above\n\
- \"reasoning\": your brief explanation";

/// Composes the user-facing prompt for one evaluation.
/// Extra criteria, when present, is appended to the job description as an
/// additional paragraph so it biases the evaluation the same way the
/// description does.
pub fn build_evaluation_prompt(
    job_description: &str,
    extra_criteria: Option<&str>,
    job_skills: &[String],
    resume_summary: &str,
) -> String {
    let mut description = job_description.to_string();
    if let Some(criteria) = extra_criteria.map(str::trim).filter(|c| !c.is_empty()) {
        description.push_str("\n\nAdditional evaluation criteria:\n");
        description.push_str(criteria);
    }

    format!(
        "Job Description:\n{description}\n\nRequired Skills:\n{skills}\n\nResume Summary:\n{resume_summary}",
        skills = job_skills.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::screening::FitCategory;

    #[test]
    fn test_system_prompt_contains_all_category_literals() {
        for category in FitCategory::ALL {
            assert!(
                EVALUATION_SYSTEM.contains(category.as_str()),
                "system prompt missing literal {:?}",
                category.as_str()
            );
        }
    }

    #[test]
    fn test_prompt_joins_skills_with_commas() {
        let prompt = build_evaluation_prompt(
            "Build UIs",
            None,
            &["React".to_string(), "TypeScript".to_string()],
            "5 years React",
        );
        assert!(prompt.contains("React, TypeScript"));
        assert!(prompt.contains("Job Description:\nBuild UIs"));
        assert!(prompt.contains("Resume Summary:\n5 years React"));
    }

    #[test]
    fn test_prompt_appends_criteria_paragraph_when_present() {
        let prompt = build_evaluation_prompt(
            "Build UIs",
            Some("Prefer candidates with design systems experience"),
            &[],
            "resume",
        );
        assert!(prompt.contains("Additional evaluation criteria:\nPrefer candidates"));
    }

    #[test]
    fn test_prompt_omits_criteria_paragraph_when_absent_or_blank() {
        for criteria in [None, Some(""), Some("   ")] {
            let prompt = build_evaluation_prompt("Build UIs", criteria, &[], "resume");
            assert!(!prompt.contains("Additional evaluation criteria"));
        }
    }

    #[test]
    fn test_prompt_handles_empty_skill_list() {
        let prompt = build_evaluation_prompt("desc", None, &[], "resume");
        assert!(prompt.contains("Required Skills:\n\n"));
    }
}
