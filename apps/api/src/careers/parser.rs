//! Recommendation Parser — turns raw model output into a `CareerResponse`.
//!
//! Models are told to answer with strict JSON but do not always comply, so
//! parsing is ordered, first match wins:
//! 1. The first `{` through the last `}` is parsed as JSON and returned as-is.
//! 2. Otherwise the text is split into blocks and each block is scanned for
//!    `Major:`, `Match Score: N%`, `Description:`, `Why Match:` and a dashed
//!    `Careers:` list.
//!
//! Any failure yields the fixed parse-failure payload instead of an error.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::careers::models::{CareerResponse, ParseFailure, Recommendation, RecommendationSet};

pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse recommendations";

const MAX_MATCH_SCORE: u64 = 100;
const MAJOR_LABEL: &str = "Major:";
const CAREERS_LABEL: &str = "Careers:";
const UNIVERSITIES_LABEL: &str = "Universities:";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON in model output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("match score '{0}' is not a valid integer")]
    Score(String),
}

struct Patterns {
    json_object: Regex,
    blank_line: Regex,
    major_list_item: Regex,
    major: Regex,
    match_score: Regex,
    description: Regex,
    why_match: Regex,
    career_item: Regex,
    decimal_digit: Regex,
}

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| Patterns {
        json_object: Regex::new(r"(?s)\{.*\}").unwrap(),
        blank_line: Regex::new(r"\r?\n[ \t]*\r?\n").unwrap(),
        major_list_item: Regex::new(r"\n-[ \t]*Major:").unwrap(),
        major: Regex::new(r"Major:\s*(.+)").unwrap(),
        match_score: Regex::new(r"Match Score:\s*(\d+)%").unwrap(),
        description: Regex::new(r"Description:\s*(.+)").unwrap(),
        why_match: Regex::new(r"Why Match:\s*(.+)").unwrap(),
        career_item: Regex::new(r"-\s*(.+)").unwrap(),
        decimal_digit: Regex::new(r"^\d$").unwrap(),
    })
}

/// Parses raw model output. Never fails: parse errors are logged and turned
/// into `{"error": "Failed to parse recommendations"}`.
pub fn parse_recommendations(text: &str) -> CareerResponse {
    match try_parse(text) {
        Ok(response) => response,
        Err(e) => {
            warn!("Parsing error: {e}");
            CareerResponse::Failed(ParseFailure {
                error: PARSE_FAILURE_MESSAGE.to_string(),
            })
        }
    }
}

fn try_parse(text: &str) -> Result<CareerResponse, ParseError> {
    if let Some(candidate) = patterns().json_object.find(text) {
        let value: Value = serde_json::from_str(candidate.as_str())?;
        return Ok(CareerResponse::Verbatim(value));
    }

    let mut recommendations = Vec::new();
    for block in split_blocks(text) {
        if block.trim().is_empty() {
            continue;
        }
        if let Some(rec) = parse_block(block)? {
            recommendations.push(rec);
        }
    }

    Ok(CareerResponse::Extracted(RecommendationSet { recommendations }))
}

/// Splits on blank lines, and on list items that open a new `Major:` entry.
/// Ordinary dashed lines (career lists) stay inside their block.
fn split_blocks(text: &str) -> Vec<&str> {
    let p = patterns();
    let mut blocks = Vec::new();

    for chunk in p.blank_line.split(text) {
        let mut start = 0;
        for m in p.major_list_item.find_iter(chunk) {
            blocks.push(&chunk[start..m.start()]);
            start = m.end() - MAJOR_LABEL.len();
        }
        blocks.push(&chunk[start..]);
    }

    blocks
}

/// Returns `None` when the block carries no `Major:` line.
fn parse_block(block: &str) -> Result<Option<Recommendation>, ParseError> {
    let p = patterns();

    let Some(major) = capture(&p.major, block) else {
        return Ok(None);
    };

    let match_score = match capture(&p.match_score, block) {
        Some(digits) => parse_score(digits)
            .ok_or_else(|| ParseError::Score(digits.to_string()))?
            .min(MAX_MATCH_SCORE) as u8,
        None => 0,
    };

    Ok(Some(Recommendation {
        major: major.to_string(),
        match_score,
        description: capture(&p.description, block).unwrap_or_default().to_string(),
        why_match: capture(&p.why_match, block).unwrap_or_default().to_string(),
        careers: extract_careers(block),
        advice: None,
    }))
}

/// `\d` matches any Unicode decimal digit (Arabic-Indic, fullwidth, ...),
/// so the score is folded digit by digit. `None` on overflow.
fn parse_score(digits: &str) -> Option<u64> {
    digits.chars().try_fold(0u64, |acc, c| {
        acc.checked_mul(10)?.checked_add(decimal_value(c)? as u64)
    })
}

/// Unicode lays out every decimal digit set as a contiguous run starting at
/// zero, and adjacent sets are back to back, so the value is the offset from
/// the start of the run modulo 10.
fn decimal_value(c: char) -> Option<u32> {
    if let Some(d) = c.to_digit(10) {
        return Some(d);
    }
    if !is_decimal_digit(c) {
        return None;
    }

    let mut start = c as u32;
    while let Some(prev) = start.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        start -= 1;
    }

    Some((c as u32 - start) % 10)
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    patterns().decimal_digit.is_match(c.encode_utf8(&mut buf))
}

fn capture<'a>(re: &Regex, block: &'a str) -> Option<&'a str> {
    re.captures(block)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}

/// Dash-prefixed items between `Careers:` and the next `Universities:` label
/// (or the end of the block).
fn extract_careers(block: &str) -> Vec<String> {
    let Some(label_at) = block.find(CAREERS_LABEL) else {
        return Vec::new();
    };
    let body = &block[label_at + CAREERS_LABEL.len()..];
    let body = match body.find(UNIVERSITIES_LABEL) {
        Some(end) => &body[..end],
        None => body,
    };

    patterns()
        .career_item
        .captures_iter(body)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}
