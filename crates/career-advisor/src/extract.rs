//! Pull the recommendation JSON out of free-form model output.

use career_core::CareerRecommendation;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Locate the JSON payload inside model output.
///
/// A fence labeled `json` wins; otherwise the first fenced block; otherwise
/// the whole text. An unterminated fence runs to the end of the text.
pub fn extract_json_block(text: &str) -> &str {
    if let Some((_, rest)) = text.split_once(JSON_FENCE) {
        return rest.split(FENCE).next().unwrap_or(rest);
    }

    if text.contains(FENCE) {
        return text.split(FENCE).nth(1).unwrap_or(text);
    }

    text
}

/// Parse model output as a recommendation, without any fallback.
pub fn parse_recommendation(text: &str) -> Result<CareerRecommendation, serde_json::Error> {
    serde_json::from_str(extract_json_block(text).trim())
}

/// Parse model output, substituting the static fallback when it is unusable.
///
/// Returns the recommendation and whether the fallback was used.
pub fn extract_recommendation(text: &str) -> (CareerRecommendation, bool) {
    match parse_recommendation(text) {
        Ok(recommendation) => (recommendation, false),
        Err(e) => {
            tracing::warn!(
                "Model output is not a valid recommendation ({}), using fallback",
                e
            );
            (CareerRecommendation::fallback(), true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use career_core::Course;

    const RECOMMENDATION: &str = r#"{
        "primaryGoal": "Become a data analyst within 12 months",
        "recommendedSkills": ["SQL", "Tableau"],
        "suggestedCourses": [
            {"name": "SQL Basics", "provider": "Khan Academy", "estimatedCost": "$0"}
        ],
        "financialAdvice": "Redirect dining budget to courses",
        "nextSteps": ["Enroll this week", "Build a portfolio"]
    }"#;

    fn expected() -> CareerRecommendation {
        CareerRecommendation {
            primary_goal: "Become a data analyst within 12 months".into(),
            recommended_skills: vec!["SQL".into(), "Tableau".into()],
            suggested_courses: vec![Course {
                name: "SQL Basics".into(),
                provider: "Khan Academy".into(),
                estimated_cost: "$0".into(),
            }],
            financial_advice: "Redirect dining budget to courses".into(),
            next_steps: vec!["Enroll this week".into(), "Build a portfolio".into()],
        }
    }

    #[test]
    fn test_json_fence() {
        let text = format!("Here is your plan:\n```json\n{}\n```\nGood luck!", RECOMMENDATION);
        let (rec, used_fallback) = extract_recommendation(&text);
        assert!(!used_fallback);
        assert_eq!(rec, expected());
    }

    #[test]
    fn test_json_fence_preferred_over_earlier_plain_fence() {
        let text = format!("```\nnot json\n```\n```json\n{}\n```", RECOMMENDATION);
        assert_eq!(parse_recommendation(&text).unwrap(), expected());
    }

    #[test]
    fn test_plain_fence() {
        let text = format!("```\n{}\n```", RECOMMENDATION);
        assert_eq!(parse_recommendation(&text).unwrap(), expected());
    }

    #[test]
    fn test_unterminated_fence_runs_to_end() {
        let text = format!("```json\n{}", RECOMMENDATION);
        assert_eq!(parse_recommendation(&text).unwrap(), expected());
    }

    #[test]
    fn test_raw_json() {
        assert_eq!(parse_recommendation(RECOMMENDATION).unwrap(), expected());
    }

    #[test]
    fn test_extract_json_block_without_fence() {
        assert_eq!(extract_json_block("plain text"), "plain text");
        assert_eq!(extract_json_block("a ```b``` c"), "b");
        assert_eq!(extract_json_block("x ```json{}``` y"), "{}");
    }

    #[test]
    fn test_non_json_uses_fallback() {
        let (rec, used_fallback) =
            extract_recommendation("I recommend learning Python and saving more.");
        assert!(used_fallback);
        assert_eq!(rec, CareerRecommendation::fallback());
        assert_eq!(
            rec.primary_goal,
            "Build technical skills for career advancement"
        );
        assert_eq!(
            rec.recommended_skills,
            vec!["Data Analysis", "Python Programming", "Communication"]
        );
    }

    #[test]
    fn test_wrong_shape_uses_fallback() {
        let (rec, used_fallback) = extract_recommendation(r#"```json
{"primaryGoal": "Only a goal"}
```"#);
        assert!(used_fallback);
        assert_eq!(rec, CareerRecommendation::fallback());
    }
}
