//! Identifier normalization.
//!
//! Downstream sections reference specimens in several surface forms: by ordinal (`#1-`), by
//! bare or decorated letter (`A)`, `B:`), or by lesion phrase (`Lesion C`). Scanners strip the
//! decoration and resolve what remains through an [`IdentifierMapping`], which maps ordinals and
//! letters to canonical specimen identifiers.

use crate::section::{self, Section};
use crate::specimen::{self, Specimen};
use pathreport_types::SpecimenId;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

static RESCAN_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\n\n|DIAGNOSIS:").expect("valid rescan end regex"));

/// Immutable lookup from surface-form tokens to canonical specimen identifiers.
///
/// Every canonical identifier maps to itself. Ordinals (`"1"`, `"2"`, ...) map to the specimen
/// at that 1-based position in the specimen section.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdentifierMapping {
    entries: BTreeMap<String, SpecimenId>,
}

impl IdentifierMapping {
    /// Resolves a normalized token to its canonical identifier.
    pub fn resolve(&self, token: &str) -> Option<SpecimenId> {
        self.entries.get(token.trim()).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds the identifier mapping for a report.
///
/// The specimen section is scanned again, this time bounded by the next blank line or a
/// `DIAGNOSIS:` marker, to pair each specimen line's 1-based position with its letter. Only
/// letters that are canonical specimens are mapped.
///
/// # Returns
///
/// An empty mapping when `specimens` is empty.
pub fn build_mapping(text: &str, specimens: &[Specimen]) -> IdentifierMapping {
    let mut entries = BTreeMap::new();
    if specimens.is_empty() {
        return IdentifierMapping { entries };
    }

    let canonical: HashSet<SpecimenId> = specimens.iter().map(|s| s.identifier).collect();
    for identifier in &canonical {
        entries.insert(identifier.to_string(), *identifier);
    }

    if let Some(body) = section::locate_until(text, Section::SpecimenSubmitted, &RESCAN_END) {
        for (ordinal, listed) in specimen::parse_specimen_lines(body).iter().enumerate() {
            let ordinal = ordinal + 1;
            let letter = listed.identifier;
            if canonical.contains(&letter) {
                entries.insert(ordinal.to_string(), letter);
            } else {
                tracing::debug!(ordinal, %letter, "ordinal letter is not a listed specimen");
            }
        }
    }

    IdentifierMapping { entries }
}
