//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into [`crate::ReportExtractor`].
//! Extraction never reads environment variables itself, so every report in a batch is processed
//! under the same settings regardless of which worker thread picks it up.

use crate::{CoreError, CoreResult};
use std::fmt;
use std::str::FromStr;

/// How narrative fields are cleaned before they are written to a specimen record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NarrativeCleanup {
    /// Keep only the first line of the field, trimmed.
    #[default]
    FirstLine,
    /// Keep the whole field, trimmed.
    FullText,
}

impl NarrativeCleanup {
    /// Applies the cleanup rule to one narrative value.
    pub fn apply(&self, value: &str) -> String {
        match self {
            Self::FirstLine => value.split('\n').next().unwrap_or_default().trim().to_owned(),
            Self::FullText => value.trim().to_owned(),
        }
    }
}

impl FromStr for NarrativeCleanup {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "first-line" => Ok(Self::FirstLine),
            "full-text" => Ok(Self::FullText),
            other => Err(CoreError::InvalidConfig(format!(
                "unknown narrative cleanup '{other}' (expected 'first-line' or 'full-text')"
            ))),
        }
    }
}

impl fmt::Display for NarrativeCleanup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstLine => f.write_str("first-line"),
            Self::FullText => f.write_str("full-text"),
        }
    }
}

/// Extraction configuration resolved at startup.
#[derive(Clone, Debug, Default)]
pub struct ExtractorConfig {
    narrative_cleanup: NarrativeCleanup,
}

impl ExtractorConfig {
    /// Create a new `ExtractorConfig`.
    pub fn new(narrative_cleanup: NarrativeCleanup) -> Self {
        Self { narrative_cleanup }
    }

    pub fn narrative_cleanup(&self) -> NarrativeCleanup {
        self.narrative_cleanup
    }
}

/// Parse the narrative cleanup rule from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`NarrativeCleanup::FirstLine`].
pub fn narrative_cleanup_from_env_value(value: Option<String>) -> CoreResult<NarrativeCleanup> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value.map(|v| v.parse::<NarrativeCleanup>()).transpose()?;

    Ok(parsed.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line_keeps_only_first_line() {
        let cleanup = NarrativeCleanup::FirstLine;
        assert_eq!(
            cleanup.apply("Basal cell carcinoma\nsuperficial type"),
            "Basal cell carcinoma"
        );
        assert_eq!(cleanup.apply("  padded  "), "padded");
        assert_eq!(cleanup.apply(""), "");
    }

    #[test]
    fn test_full_text_keeps_all_lines() {
        let cleanup = NarrativeCleanup::FullText;
        assert_eq!(cleanup.apply(" one\ntwo \n"), "one\ntwo");
    }

    #[test]
    fn test_parse_accepts_both_spellings() {
        assert_eq!(
            "first-line".parse::<NarrativeCleanup>().unwrap(),
            NarrativeCleanup::FirstLine
        );
        assert_eq!(
            "FULL_TEXT".parse::<NarrativeCleanup>().unwrap(),
            NarrativeCleanup::FullText
        );
    }

    #[test]
    fn test_parse_rejects_unknown_value() {
        let err = "everything".parse::<NarrativeCleanup>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(msg) if msg.contains("everything")));
    }

    #[test]
    fn test_env_value_defaults_when_missing_or_blank() {
        assert_eq!(
            narrative_cleanup_from_env_value(None).unwrap(),
            NarrativeCleanup::FirstLine
        );
        assert_eq!(
            narrative_cleanup_from_env_value(Some("   ".into())).unwrap(),
            NarrativeCleanup::FirstLine
        );
        assert_eq!(
            narrative_cleanup_from_env_value(Some("full-text".into())).unwrap(),
            NarrativeCleanup::FullText
        );
        assert!(narrative_cleanup_from_env_value(Some("bogus".into())).is_err());
    }
}
