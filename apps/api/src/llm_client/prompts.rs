// Shared prompt fragments for every caller of the completion API.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_INSTRUCTION: &str =
    "OUTPUT ONLY VALID JSON. Do not include any additional text or explanations.";
