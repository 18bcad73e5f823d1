use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound student profile as posted by the web client.
///
/// Every field is optional at the wire level so that missing data surfaces
/// as a validation error rather than a deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileRequest {
    pub name: Option<ProfileValue>,
    /// The web form sends age as a string; API callers may send a number.
    pub age: Option<ProfileValue>,
    pub gender: Option<ProfileValue>,
    pub interests: Option<Vec<String>>,
    pub personality_traits: Option<Vec<String>>,
    pub learning_style: Option<String>,
    pub values: Option<Vec<String>>,
}

/// A descriptive field that only ends up in the prompt, so any JSON value is
/// accepted. Strings render bare, everything else as compact JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ProfileValue(pub Value);

#[cfg(test)]
impl ProfileValue {
    pub fn text(s: &str) -> Self {
        ProfileValue(Value::String(s.to_string()))
    }
}

impl fmt::Display for ProfileValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

/// A profile that passed validation: all list fields non-empty and a learning style present.
#[derive(Debug, Clone)]
pub struct Profile {
    pub name: Option<ProfileValue>,
    pub age: Option<ProfileValue>,
    pub gender: Option<ProfileValue>,
    pub interests: Vec<String>,
    pub personality_traits: Vec<String>,
    pub learning_style: String,
    pub values: Vec<String>,
}

impl ProfileRequest {
    /// Returns `None` if any of interests, personality traits, learning style
    /// or values is absent or empty.
    pub fn validate(self) -> Option<Profile> {
        Some(Profile {
            interests: non_empty(self.interests)?,
            personality_traits: non_empty(self.personality_traits)?,
            learning_style: self.learning_style.filter(|s| !s.is_empty())?,
            values: non_empty(self.values)?,
            name: self.name,
            age: self.age,
            gender: self.gender,
        })
    }
}

fn non_empty(list: Option<Vec<String>>) -> Option<Vec<String>> {
    list.filter(|items| !items.is_empty())
}

/// One suggested college major.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub major: String,
    /// 0-100
    pub match_score: u8,
    pub description: String,
    pub why_match: String,
    pub careers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationSet {
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseFailure {
    pub error: String,
}

/// What the parser hands back to the handler. Serialized untagged so each
/// variant is exactly the JSON body the client receives.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CareerResponse {
    /// JSON the model produced, passed through untouched.
    Verbatim(Value),
    Extracted(RecommendationSet),
    Failed(ParseFailure),
}
