// Prompt templates for career recommendations.

use crate::careers::models::{Profile, ProfileValue};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

const UNSPECIFIED: &str = "unspecified";

/// Role line sent ahead of the JSON-only instruction.
const CAREER_ADVISOR_ROLE: &str = "You are a career advisor.";

/// Output schema appended after the profile section.
const OUTPUT_FORMAT: &str = r#"OUTPUT FORMAT (STRICT JSON ONLY):
{
  "recommendations": [
    {
      "major": "Major Name",
      "matchScore": 0-100,
      "description": "Brief description",
      "whyMatch": "Why it matches the student",
      "careers": ["Career 1", "Career 2", "Career 3"],
      "advice": "Practical advice for the student to succeed in this major (e.g., self-learning, bootcamps, certifications)"
    }
  ]
}
"#;

/// Steers advice toward resources available to students in Lebanon.
const SPECIAL_INSTRUCTIONS: &str = "SPECIAL INSTRUCTIONS:
- For each major, provide 2-3 practical pieces of advice
- Advice should include self-learning resources, certifications, or bootcamps
- Make advice specific to Lebanese students and local opportunities
- Focus on actionable steps they can take while studying
- Include Lebanese-specific resources when possible
- Example for Computer Science: 'Start learning Python through freeCodeCamp while in university and join Beirut-based coding bootcamps like SE Factory'
";

pub fn system_prompt() -> String {
    format!("{CAREER_ADVISOR_ROLE} {JSON_ONLY_INSTRUCTION}")
}

/// Renders the user prompt for a validated profile.
pub fn build_recommendation_prompt(profile: &Profile) -> String {
    format!(
        "Recommend 3 college majors for a {age}-year-old {gender} named {name}. \
         ### Interests:\n{interests}\n\
         ### Personality Traits:\n{traits}\n\
         ### Learning Style: {learning_style}\n\
         ### Values:\n{values}\n\n\
         {OUTPUT_FORMAT}\n{SPECIAL_INSTRUCTIONS}",
        age = or_unspecified(&profile.age),
        gender = or_unspecified(&profile.gender),
        name = or_unspecified(&profile.name),
        interests = profile.interests.join(", "),
        traits = profile.personality_traits.join(", "),
        learning_style = profile.learning_style,
        values = profile.values.join(", "),
    )
}

fn or_unspecified(field: &Option<ProfileValue>) -> String {
    field
        .as_ref()
        .map(|v| v.to_string())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| UNSPECIFIED.to_string())
}
