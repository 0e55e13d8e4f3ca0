//! Prompt rendering for career analysis.

use career_core::{CareerError, CareerResult, UserFinancialData};

const RESPONSE_SCHEMA: &str = r#"{
    "primaryGoal": "One main career objective based on their profile",
    "recommendedSkills": ["skill1", "skill2", "skill3"],
    "suggestedCourses": [
        {"name": "Course Name", "provider": "Platform", "estimatedCost": "$XX"},
        {"name": "Course Name 2", "provider": "Platform", "estimatedCost": "$XX"}
    ],
    "financialAdvice": "Specific financial recommendation based on their spending",
    "nextSteps": ["actionable step 1", "actionable step 2", "actionable step 3"]
}"#;

/// Render the instruction sent to the model for one user profile.
///
/// Spending categories and transactions are pretty-printed with two-space
/// indentation; goals are joined with `", "`.
pub fn build_career_prompt(data: &UserFinancialData) -> CareerResult<String> {
    let spending = serde_json::to_string_pretty(&data.spending_categories)
        .map_err(|e| CareerError::Malformed(format!("spending categories: {}", e)))?;
    let transactions = serde_json::to_string_pretty(&data.recent_transactions)
        .map_err(|e| CareerError::Malformed(format!("recent transactions: {}", e)))?;

    Ok(format!(
        "Analyze this financial profile and provide career guidance:

User Profile: {name} - {profile}
Monthly Income: ${income}
Career Stage: {stage}

Spending Breakdown:
{spending}

Recent Transactions:
{transactions}

Current Goals: {goals}

Please provide career guidance in this JSON format:
{schema}

Focus on practical, actionable advice based on their current financial situation and career stage.
",
        name = data.name,
        profile = data.profile,
        income = data.monthly_income,
        stage = data.career_stage,
        spending = spending,
        transactions = transactions,
        goals = data.goals.join(", "),
        schema = RESPONSE_SCHEMA,
    ))
}
