//! FAQ file loading and context flattening.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A question/answer pair from the FAQ file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FaqEntry {
    /// The question as written in the file.
    pub question: String,
    /// The answer as written in the file.
    pub answer: String,
}

impl FaqEntry {
    /// Create a new entry.
    #[must_use]
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Extract an entry from a raw JSON record.
    ///
    /// Returns `None` unless the record is an object with string `question`
    /// and `answer` fields. Extra fields are ignored.
    #[must_use]
    pub fn from_record(record: &serde_json::Value) -> Option<Self> {
        let question = record.get("question")?.as_str()?;
        let answer = record.get("answer")?.as_str()?;
        Some(Self::new(question, answer))
    }

    /// Render this entry as a context block.
    fn write_block(&self, out: &mut String) {
        out.push_str("Q: ");
        out.push_str(&self.question);
        out.push_str("\nA: ");
        out.push_str(&self.answer);
        out.push_str("\n\n");
    }
}

/// Errors from loading the FAQ file.
#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("FAQ file '{}' not found. Please provide your FAQ JSON file.", path.display())]
    NotFound { path: PathBuf },

    #[error(
        "Could not decode JSON from '{}'. Please check its format: {}",
        path.display(),
        source
    )]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read FAQ file '{}': {}", path.display(), source)]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Flattened FAQ text inserted into the system prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeContext {
    text: String,
    entries: usize,
}

impl KnowledgeContext {
    /// Build a context from entries, preserving their order.
    #[must_use]
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a FaqEntry>,
    {
        let mut text = String::new();
        let mut count = 0;
        for entry in entries {
            entry.write_block(&mut text);
            count += 1;
        }
        Self {
            text,
            entries: count,
        }
    }

    /// Parse FAQ JSON content into a context.
    ///
    /// Blank content yields an empty context. Records missing either field
    /// are skipped.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the content is not a JSON array.
    pub fn parse_str(content: &str) -> Result<Self, serde_json::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let records: Vec<serde_json::Value> = serde_json::from_str(content)?;
        let entries: Vec<FaqEntry> = records.iter().filter_map(FaqEntry::from_record).collect();

        let skipped = records.len() - entries.len();
        if skipped > 0 {
            tracing::debug!(skipped, "Skipped FAQ records without question and answer");
        }

        Ok(Self::from_entries(&entries))
    }

    /// Load and flatten the FAQ file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `KnowledgeError::NotFound` if the file does not exist,
    /// `KnowledgeError::Malformed` if it is not a JSON array of records, and
    /// `KnowledgeError::Read` for any other IO failure.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, KnowledgeError> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                KnowledgeError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                KnowledgeError::Read {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        let context = Self::parse_str(&content).map_err(|e| KnowledgeError::Malformed {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::info!(
            path = %path.display(),
            entries = context.entries,
            "Loaded FAQ knowledge base"
        );
        Ok(context)
    }

    /// The flattened text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of FAQ entries in the context.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for KnowledgeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_entry_format() {
        let context = KnowledgeContext::parse_str(
            r#"[{"question":"How do I pair my phone?","answer":"Use Bluetooth settings."}]"#,
        )
        .unwrap();

        assert_eq!(
            context.as_str(),
            "Q: How do I pair my phone?\nA: Use Bluetooth settings.\n\n"
        );
        assert_eq!(context.entry_count(), 1);
    }

    #[test]
    fn test_skips_incomplete_records() {
        let json = r#"[
            {"question": "First?", "answer": "One."},
            {"question": "No answer"},
            {"answer": "No question"},
            {"question": "Second?", "answer": "Two.", "category": "extra"}
        ]"#;
        let context = KnowledgeContext::parse_str(json).unwrap();

        assert_eq!(
            context.as_str(),
            "Q: First?\nA: One.\n\nQ: Second?\nA: Two.\n\n"
        );
        assert_eq!(context.entry_count(), 2);
    }

    #[test]
    fn test_skips_non_string_and_non_object_records() {
        let json = r#"[
            "just a string",
            42,
            {"question": 7, "answer": "Number question"},
            {"question": "Null answer?", "answer": null},
            {"question": "Kept?", "answer": "Yes."}
        ]"#;
        let context = KnowledgeContext::parse_str(json).unwrap();

        assert_eq!(context.as_str(), "Q: Kept?\nA: Yes.\n\n");
    }

    #[test]
    fn test_empty_inputs_are_valid() {
        assert!(KnowledgeContext::parse_str("").unwrap().is_empty());
        assert!(KnowledgeContext::parse_str("  \n").unwrap().is_empty());
        assert!(KnowledgeContext::parse_str("[]").unwrap().is_empty());
    }

    #[test]
    fn test_non_array_is_malformed() {
        assert!(KnowledgeContext::parse_str(r#"{"question": "q"}"#).is_err());
        assert!(KnowledgeContext::parse_str("[{").is_err());
    }

    #[test]
    fn test_from_entries_preserves_order() {
        let entries = vec![FaqEntry::new("B", "2"), FaqEntry::new("A", "1")];
        let context = KnowledgeContext::from_entries(&entries);

        assert_eq!(context.to_string(), "Q: B\nA: 2\n\nQ: A\nA: 1\n\n");
    }

    #[test]
    fn test_error_messages_are_distinct() {
        let not_found = KnowledgeError::NotFound {
            path: PathBuf::from("faqs.json"),
        };
        let malformed = KnowledgeError::Malformed {
            path: PathBuf::from("faqs.json"),
            source: serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        };

        assert!(not_found.to_string().contains("not found"));
        assert!(malformed.to_string().contains("Could not decode JSON"));
        assert_ne!(not_found.to_string(), malformed.to_string());
    }
}
