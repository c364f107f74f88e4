//! Correlation of narrative section text with specimens.
//!
//! Each narrative field has its own tagging convention in practice, so each has its own scanner:
//!
//! - Clinical impression: inline tokens (`A)`, `B:`, `#2-`, `Lesion C`) split the section body
//!   into spans, resolved through the [`IdentifierMapping`].
//! - Microscopic description: explicit rows of the form `A. location - description`.
//! - Diagnosis: scanned over the whole report; a specimen line followed by a line opening with
//!   `--` carries the diagnosis text. Letters are used as written, without normalization.
//!
//! When a scanner finds no identifier structure, the whole section body becomes one span
//! targeting every specimen (broadcast).

use crate::constants::{DIAGNOSIS_MARKER, LESION_KEYWORD};
use crate::mapping::IdentifierMapping;
use crate::section::{self, Section};
use pathreport_types::SpecimenId;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static IMPRESSION_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][):]|#\d+-|\b(?i:lesion)[ \t]+[A-Z]\b").expect("valid impression token regex")
});

static MICROSCOPIC_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Z])[.)]\s*(.*?)\s*-\s*(.+?)\s*$").expect("valid microscopic row regex")
});

static DIAGNOSIS_SPECIMEN_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Z])(?:[.):]|\s|$)").expect("valid diagnosis specimen line regex")
});

static IDENTIFIER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[A-Z][.):]").expect("valid identifier line regex"));

/// The narrative fields correlated with specimens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NarrativeField {
    Diagnosis,
    MicroscopicDescription,
    ClinicalImpression,
}

impl NarrativeField {
    /// The report section holding this field.
    pub fn section(&self) -> Section {
        match self {
            Self::Diagnosis => Section::Diagnosis,
            Self::MicroscopicDescription => Section::MicroscopicDescription,
            Self::ClinicalImpression => Section::ClinicalImpression,
        }
    }
}

/// The specimen(s) a span of narrative text applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpanTarget {
    Specimen(SpecimenId),
    All,
}

impl fmt::Display for SpanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Specimen(id) => write!(f, "{id}"),
            Self::All => f.write_str("ALL"),
        }
    }
}

impl Serialize for SpanTarget {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// A chunk of narrative text attributed to one specimen or broadcast to all of them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldSpan {
    pub target: SpanTarget,
    pub text: String,
}

impl FieldSpan {
    pub fn specimen(identifier: SpecimenId, text: impl Into<String>) -> Self {
        Self {
            target: SpanTarget::Specimen(identifier),
            text: text.into(),
        }
    }

    pub fn broadcast(text: impl Into<String>) -> Self {
        Self {
            target: SpanTarget::All,
            text: text.into(),
        }
    }
}

/// Scans the report for spans of `field`.
///
/// Never fails: text without recognizable structure falls back to a broadcast span, and an
/// absent section yields no spans.
pub fn correlate(text: &str, field: NarrativeField, mapping: &IdentifierMapping) -> Vec<FieldSpan> {
    match field {
        NarrativeField::Diagnosis => scan_diagnosis(text),
        NarrativeField::MicroscopicDescription => scan_microscopic_description(text),
        NarrativeField::ClinicalImpression => scan_clinical_impression(text, mapping),
    }
}

/// Splits the clinical impression section at identifier tokens.
///
/// Each span runs from the end of one token to the start of the next. Tokens that do not
/// resolve through `mapping` are dropped along with their text. Text before the first token
/// is not attributed to any specimen.
pub fn scan_clinical_impression(text: &str, mapping: &IdentifierMapping) -> Vec<FieldSpan> {
    let Some(body) = section::locate(text, Section::ClinicalImpression) else {
        return Vec::new();
    };

    let tokens: Vec<_> = IMPRESSION_TOKEN.find_iter(body).collect();
    if tokens.is_empty() {
        tracing::debug!("clinical impression has no identifier tokens; broadcasting");
        return vec![FieldSpan::broadcast(body)];
    }

    let mut spans = Vec::with_capacity(tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        let end = tokens.get(i + 1).map_or(body.len(), |next| next.start());
        let normalized = normalize_token(token.as_str());
        match mapping.resolve(&normalized) {
            Some(identifier) => {
                spans.push(FieldSpan::specimen(identifier, body[token.end()..end].trim()));
            }
            None => {
                tracing::debug!(token = token.as_str(), "unresolved impression identifier dropped");
            }
        }
    }
    spans
}

/// Strips decoration from an impression token: `)`, `-`, `:`, `#` and the lesion keyword.
fn normalize_token(token: &str) -> String {
    let stripped: String = token
        .chars()
        .filter(|c| !matches!(c, ')' | '-' | ':' | '#'))
        .collect();
    let stripped = stripped.trim();
    let without_keyword = stripped
        .get(..LESION_KEYWORD.len())
        .filter(|prefix| prefix.eq_ignore_ascii_case(LESION_KEYWORD))
        .map_or(stripped, |prefix| &stripped[prefix.len()..]);
    without_keyword.trim().to_owned()
}

/// Reads `A. location - description` rows from the microscopic description section.
///
/// A row's description (the text after the first dash) becomes the span text. Rows using any
/// other separator are not recognized; if no row matches, the whole body is broadcast.
pub fn scan_microscopic_description(text: &str) -> Vec<FieldSpan> {
    let Some(body) = section::locate(text, Section::MicroscopicDescription) else {
        return Vec::new();
    };

    let spans: Vec<FieldSpan> = body
        .lines()
        .filter_map(|line| {
            let caps = MICROSCOPIC_ROW.captures(line)?;
            let identifier = SpecimenId::parse(caps.get(1)?.as_str()).ok()?;
            Some(FieldSpan::specimen(identifier, caps.get(3)?.as_str().trim()))
        })
        .collect();

    if spans.is_empty() {
        tracing::debug!("microscopic description has no specimen rows; broadcasting");
        return vec![FieldSpan::broadcast(body)];
    }
    spans
}

/// Scans the whole report for specimen lines followed by a `--` diagnosis line.
///
/// The diagnosis text runs from the marker to the next identifier line, a blank line, or the
/// end of the text. Ordinal-tagged lines (`1.`) are not recognized. When nothing matches, the
/// `DIAGNOSIS` section body is broadcast if present.
pub fn scan_diagnosis(text: &str) -> Vec<FieldSpan> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some((identifier, first)) = diagnosis_block_start(&lines, i) else {
            i += 1;
            continue;
        };

        let mut collected = vec![first];
        let mut j = i + 2;
        while let Some(line) = lines.get(j) {
            if line.trim().is_empty()
                || IDENTIFIER_LINE.is_match(line)
                || diagnosis_block_start(&lines, j).is_some()
            {
                break;
            }
            collected.push(line.trim());
            j += 1;
        }

        spans.push(FieldSpan::specimen(identifier, collected.join("\n").trim()));
        i = j;
    }

    if spans.is_empty() {
        if let Some(body) = section::locate(text, Section::Diagnosis) {
            tracing::debug!("diagnosis has no tagged specimen lines; broadcasting");
            spans.push(FieldSpan::broadcast(body));
        }
    }
    spans
}

/// A specimen line at `i` followed by a `--` marker line opens a diagnosis block.
fn diagnosis_block_start<'a>(lines: &[&'a str], i: usize) -> Option<(SpecimenId, &'a str)> {
    let identifier = diagnosis_specimen(lines.get(i)?)?;
    let first = diagnosis_marker_text(lines.get(i + 1).copied()?)?;
    Some((identifier, first))
}

fn diagnosis_specimen(line: &str) -> Option<SpecimenId> {
    let caps = DIAGNOSIS_SPECIMEN_LINE.captures(line)?;
    SpecimenId::parse(caps.get(1)?.as_str()).ok()
}

fn diagnosis_marker_text(line: &str) -> Option<&str> {
    line.trim_start()
        .strip_prefix(DIAGNOSIS_MARKER)
        .map(str::trim)
}
