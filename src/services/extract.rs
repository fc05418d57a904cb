//! Response Content Extraction
//!
//! A single generation call can return several text fragments: thinking
//! variants of the upstream model sometimes emit an internal deliberation
//! trace alongside (or concatenated with) the final answer. This module
//! isolates the fragment intended as the actual result.
//!
//! The classification is deliberately heuristic and language-specific: the
//! marker phrases match the deliberation leakage observed from one model
//! family, and "target-language content" means the CJK Unified Ideographs
//! block because the pipeline generates Chinese. Treat it as a policy to
//! swap out if the backend changes, not a general solution.

use crate::services::gemini::{GenError, GenResult, GenerateResponse};

/// Returns true when the text contains at least one character in the CJK
/// Unified Ideographs block (U+4E00–U+9FFF).
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(|c| ('\u{4e00}'..='\u{9fff}').contains(&c))
}

/// Returns true when a fragment reads as exposed model deliberation rather
/// than the intended answer.
pub fn is_deliberation(text: &str) -> bool {
    let trimmed = text.trim_start();
    trimmed.starts_with("**Reflections")
        || trimmed.starts_with("Okay, here")
        || text.to_lowercase().contains("running through my mind")
        || text.contains("I'm thinking")
        || (text.contains("I need to") && text.contains("I want to"))
}

/// Select the final usable text from a generation response.
///
/// Selection order: the first fragment that contains target-language
/// content and is not deliberation; otherwise the last fragment (the
/// final-answer position when deliberation streams first); fails with
/// `NoContent` when nothing is selectable. A selected fragment that still
/// carries deliberation markers gets a line-level cleanup pass.
pub fn final_text(response: &GenerateResponse, raw: &str) -> GenResult<String> {
    let candidate = response.candidates.first().ok_or_else(|| GenError::Malformed {
        detail: "no candidates in response".to_string(),
        payload: raw.to_string(),
    })?;
    let content = candidate.content.as_ref().ok_or_else(|| GenError::Malformed {
        detail: "candidate has no content, generation may have been refused".to_string(),
        payload: raw.to_string(),
    })?;

    let fragments: Vec<&str> = content
        .parts
        .iter()
        .filter_map(|part| part.text.as_deref())
        .collect();

    let selected = fragments
        .iter()
        .copied()
        .find(|text| contains_cjk(text) && !is_deliberation(text))
        .or_else(|| fragments.last().copied());

    let Some(text) = selected else {
        return Err(GenError::NoContent);
    };

    let cleaned = if text.contains("**Reflections") || text.contains("Okay, here") {
        strip_deliberation_lines(text)
    } else {
        text.to_string()
    };

    let result = cleaned.trim();
    if result.is_empty() {
        return Err(GenError::NoContent);
    }
    Ok(result.to_string())
}

/// Recover the answer from a fragment where deliberation and answer are
/// concatenated: drop deliberation-marked lines and keep the contiguous
/// run of lines starting at the first target-language line, including
/// later non-empty lines even when individually non-CJK (trailing
/// punctuation or markup lines belong to the answer).
fn strip_deliberation_lines(text: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut in_answer = false;

    for line in text.lines() {
        if line.trim_start().starts_with("**Reflections")
            || line.to_lowercase().contains("running through my mind")
        {
            continue;
        }
        if contains_cjk(line) {
            in_answer = true;
            kept.push(line);
        } else if in_answer && !line.trim().is_empty() {
            kept.push(line);
        }
    }

    if kept.is_empty() {
        text.to_string()
    } else {
        kept.join("\n")
    }
}
