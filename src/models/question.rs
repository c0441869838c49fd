use serde::{Deserialize, Serialize};

/// Pacing tier assigned to a question by the preparer.
///
/// Tiers are derived, never part of the source data; a freshly
/// deserialized question carries no tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Easy,
    Medium,
    Hard,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Tier::Easy => "easy",
            Tier::Medium => "medium",
            Tier::Hard => "hard",
        }
    }
}

/// One quiz item as stored in the catalog files.
///
/// The original feed uses Portuguese field names; both spellings
/// deserialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    #[serde(default)]
    pub id: String,
    #[serde(alias = "pergunta")]
    pub prompt: String,
    #[serde(alias = "alternativas", default)]
    pub options: Vec<String>,
    #[serde(alias = "respostaCorreta")]
    pub correct_option: String,
    #[serde(skip)]
    pub tier: Option<Tier>,
}

impl Question {
    /// Index of the correct option by value equality, if present.
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| *o == self.correct_option)
    }
}

/// A fetched quiz: id, optional display name and its raw question set.
#[derive(Debug, Clone)]
pub struct QuizDoc {
    pub id: String,
    pub name: Option<String>,
    pub questions: Vec<Question>,
}

/// One entry of the remote catalog listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<String>,
}

impl CatalogItem {
    /// Catalog files are named `<title>.json`; strip the suffix for display.
    pub fn display_name(&self) -> &str {
        let name = self.name.as_str();
        let cut = name.len().wrapping_sub(5);
        if name.len() >= 5
            && name.is_char_boundary(cut)
            && name[cut..].eq_ignore_ascii_case(".json")
        {
            &name[..cut]
        } else {
            name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_original_field_names() {
        let json = r#"{
            "id": "q1",
            "pergunta": "Quem construiu a arca?",
            "alternativas": ["Noé", "Moisés", "Abraão", "Davi"],
            "respostaCorreta": "Noé"
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.prompt, "Quem construiu a arca?");
        assert_eq!(q.options.len(), 4);
        assert_eq!(q.correct_index(), Some(0));
        assert!(q.tier.is_none());
    }

    #[test]
    fn deserializes_english_field_names() {
        let json = r#"{
            "id": "q2",
            "prompt": "Pick one",
            "options": ["A", "B"],
            "correct_option": "B"
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.correct_index(), Some(1));
    }

    #[test]
    fn correct_index_none_when_value_missing() {
        let q = Question {
            id: "x".into(),
            prompt: "p".into(),
            options: vec!["A".into(), "B".into()],
            correct_option: "C".into(),
            tier: None,
        };
        assert_eq!(q.correct_index(), None);
    }

    #[test]
    fn display_name_strips_json_suffix() {
        let item = CatalogItem {
            id: "1".into(),
            name: "Genesis.JSON".into(),
            updated_at: None,
        };
        assert_eq!(item.display_name(), "Genesis");

        let item = CatalogItem {
            id: "2".into(),
            name: "Exodus".into(),
            updated_at: None,
        };
        assert_eq!(item.display_name(), "Exodus");
    }
}
