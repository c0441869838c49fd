//! Quiz payload parsing and local file loading.
//!
//! Remote quiz files come in two shapes: a bare array of questions, or an
//! object carrying a `perguntas`/`questions` array and an optional `name`.
//! Anything else is treated as a quiz with zero questions rather than a
//! hard error; the start screen simply refuses to start an empty quiz.

use std::fs;
use std::io;
use std::path::Path;

use crate::models::{Question, QuizDoc};

/// Error loading a quiz from a local file.
#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "failed to read quiz file: {}", e),
            LoadError::Parse(e) => write!(f, "quiz file is not valid JSON: {}", e),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Parse(e) => Some(e),
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Parse(err)
    }
}

/// Interpret a fetched JSON value as a quiz document.
///
/// Questions that fail to deserialize individually are dropped; a payload
/// with no recognizable question array yields an empty quiz.
pub fn parse_quiz_payload(id: &str, fallback_name: &str, value: serde_json::Value) -> QuizDoc {
    let name = value
        .get("name")
        .and_then(|n| n.as_str())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from)
        .or_else(|| {
            let trimmed = fallback_name.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        });

    let array = match &value {
        serde_json::Value::Array(items) => Some(items.as_slice()),
        serde_json::Value::Object(map) => map
            .get("perguntas")
            .or_else(|| map.get("questions"))
            .and_then(|v| v.as_array())
            .map(|v| v.as_slice()),
        _ => None,
    };

    let questions: Vec<Question> = array
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    serde_json::from_value(item.clone())
                        .map_err(|e| log::warn!("skipping malformed question in {}: {}", id, e))
                        .ok()
                })
                .collect()
        })
        .unwrap_or_default();

    if questions.is_empty() {
        log::warn!("quiz {} parsed with zero questions", id);
    }

    QuizDoc {
        id: id.to_string(),
        name,
        questions,
    }
}

/// Load a quiz from a local JSON file, tolerating the same payload shapes
/// as the remote fetch.
pub fn load_quiz_from_json<P: AsRef<Path>>(path: P) -> Result<QuizDoc, LoadError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    Ok(parse_quiz_payload(
        &path.display().to_string(),
        stem,
        value,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_bare_array() {
        let payload = json!([
            {"id": "1", "pergunta": "p1", "alternativas": ["A", "B"], "respostaCorreta": "A"},
            {"id": "2", "pergunta": "p2", "alternativas": ["C", "D"], "respostaCorreta": "D"}
        ]);
        let doc = parse_quiz_payload("f1", "Genesis", payload);
        assert_eq!(doc.questions.len(), 2);
        assert_eq!(doc.name.as_deref(), Some("Genesis"));
    }

    #[test]
    fn parses_object_with_perguntas() {
        let payload = json!({
            "name": "Êxodo",
            "perguntas": [
                {"id": "1", "pergunta": "p", "alternativas": ["A"], "respostaCorreta": "A"}
            ]
        });
        let doc = parse_quiz_payload("f2", "fallback", payload);
        assert_eq!(doc.name.as_deref(), Some("Êxodo"));
        assert_eq!(doc.questions.len(), 1);
    }

    #[test]
    fn parses_object_with_questions_key() {
        let payload = json!({
            "questions": [
                {"id": "1", "prompt": "p", "options": ["A"], "correct_option": "A"}
            ]
        });
        let doc = parse_quiz_payload("f3", "", payload);
        assert!(doc.name.is_none());
        assert_eq!(doc.questions.len(), 1);
    }

    #[test]
    fn malformed_payload_is_zero_questions() {
        let doc = parse_quiz_payload("f4", "x", json!({"unexpected": true}));
        assert!(doc.questions.is_empty());
        let doc = parse_quiz_payload("f5", "x", json!("just a string"));
        assert!(doc.questions.is_empty());
    }

    #[test]
    fn malformed_entries_are_dropped_not_fatal() {
        let payload = json!([
            {"id": "1", "pergunta": "p", "alternativas": ["A"], "respostaCorreta": "A"},
            {"nonsense": 42}
        ]);
        let doc = parse_quiz_payload("f6", "x", payload);
        assert_eq!(doc.questions.len(), 1);
    }

    #[test]
    fn blank_name_falls_back() {
        let payload = json!({"name": "   ", "perguntas": []});
        let doc = parse_quiz_payload("f7", "Salmos", payload);
        assert_eq!(doc.name.as_deref(), Some("Salmos"));
    }
}
