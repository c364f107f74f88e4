//! Accession number and specimen list extraction.
//!
//! The specimen list is read from the `SPECIMEN SUBMITTED` section. Two layouts are supported:
//!
//! - Lettered: one or more lines open with a capital letter and a period (`A. skin, left arm`).
//!   Each such line is a specimen; the letter is its identifier.
//! - Plain: no lettered lines. Every non-blank line is a specimen and identifiers are
//!   synthesized as `A`, `B`, `C`, ... in line order.
//!
//! The resulting order is document order and is the order of the final specimen records.

use crate::constants::ACCESSION_LABEL;
use crate::section::{self, Section};
use pathreport_types::{AccessionNumber, SpecimenId};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static ACCESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i){}\s*(\S+)", regex::escape(ACCESSION_LABEL)))
        .expect("valid accession regex")
});

static LETTERED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Z])\.\s*(\S.*)$").expect("valid specimen line regex"));

/// One physical sample listed in a report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Specimen {
    pub identifier: SpecimenId,
    pub description: String,
}

/// Extracts the accession number and the ordered specimen list from a report.
pub fn extract(text: &str) -> (Option<AccessionNumber>, Vec<Specimen>) {
    (extract_accession(text), extract_specimens(text))
}

/// Reads the first token following `Accession No:` anywhere in the text.
pub fn extract_accession(text: &str) -> Option<AccessionNumber> {
    let token = ACCESSION.captures(text)?.get(1)?;
    AccessionNumber::new(token.as_str()).ok()
}

/// Parses the `SPECIMEN SUBMITTED` section into specimens.
///
/// Returns an empty list when the section is absent.
pub fn extract_specimens(text: &str) -> Vec<Specimen> {
    match section::locate(text, Section::SpecimenSubmitted) {
        Some(body) => parse_specimen_lines(body),
        None => {
            tracing::debug!("no specimen submitted section found");
            Vec::new()
        }
    }
}

/// Splits a lettered specimen line into its identifier and description.
fn lettered_line(line: &str) -> Option<(SpecimenId, &str)> {
    let caps = LETTERED_LINE.captures(line)?;
    let letter = caps.get(1)?.as_str();
    let description = caps.get(2)?.as_str().trim();
    SpecimenId::parse(letter)
        .ok()
        .map(|identifier| (identifier, description))
}

/// Returns true when the specimen body uses the lettered layout.
fn is_lettered(body: &str) -> bool {
    body.lines().any(|line| lettered_line(line).is_some())
}

/// Reads specimens from a section body in document order.
///
/// A repeated letter keeps its first line. Synthesized letters stop at `Z`.
pub(crate) fn parse_specimen_lines(body: &str) -> Vec<Specimen> {
    if is_lettered(body) {
        let mut seen = HashSet::new();
        let mut specimens = Vec::new();
        for (identifier, description) in body.lines().filter_map(lettered_line) {
            if !seen.insert(identifier) {
                tracing::warn!(%identifier, "duplicate specimen identifier ignored");
                continue;
            }
            specimens.push(Specimen {
                identifier,
                description: description.to_owned(),
            });
        }
        return specimens;
    }

    let mut specimens = Vec::new();
    for (position, line) in body
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
    {
        let Some(identifier) = SpecimenId::from_position(position) else {
            tracing::warn!(position, "specimen list exceeds identifier range; remaining lines dropped");
            break;
        };
        specimens.push(Specimen {
            identifier,
            description: line.to_owned(),
        });
    }
    specimens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(letter: char) -> SpecimenId {
        SpecimenId::new(letter).unwrap()
    }

    #[test]
    fn test_extract_lettered_specimens_and_accession() {
        let text = "Accession No: S24-1234\nSPECIMEN SUBMITTED: A. skin, left arm\nB. skin, right arm";
        let (accession, specimens) = extract(text);

        assert_eq!(accession.unwrap().as_str(), "S24-1234");
        assert_eq!(
            specimens,
            vec![
                Specimen {
                    identifier: id('A'),
                    description: "skin, left arm".into(),
                },
                Specimen {
                    identifier: id('B'),
                    description: "skin, right arm".into(),
                },
            ]
        );
    }

    #[test]
    fn test_extract_synthesizes_identifier_for_plain_line() {
        let (_, specimens) = extract("SPECIMEN SUBMITTED:\nskin biopsy");
        assert_eq!(specimens.len(), 1);
        assert_eq!(specimens[0].identifier, id('A'));
        assert_eq!(specimens[0].description, "skin biopsy");
    }

    #[test]
    fn test_extract_synthesizes_in_line_order_skipping_blank_lines() {
        let text = "SPECIMEN SUBMITTED:\nshave, back\n   \npunch, scalp\nexcision, nose";
        let specimens = extract_specimens(text);
        let ids: Vec<char> = specimens.iter().map(|s| s.identifier.as_char()).collect();
        assert_eq!(ids, vec!['A', 'B', 'C']);
        assert_eq!(specimens[2].description, "excision, nose");
    }

    #[test]
    fn test_extract_reuses_letters_verbatim() {
        let text = "SPECIMEN SUBMITTED:\nC. shave, back\nD. punch, scalp";
        let ids: Vec<char> = extract_specimens(text)
            .iter()
            .map(|s| s.identifier.as_char())
            .collect();
        assert_eq!(ids, vec!['C', 'D']);
    }

    #[test]
    fn test_lettered_layout_ignores_untagged_lines() {
        let text = "SPECIMEN SUBMITTED:\nA. shave, back\n(received in formalin)\nB. punch, scalp";
        let specimens = extract_specimens(text);
        assert_eq!(specimens.len(), 2);
        assert_eq!(specimens[1].description, "punch, scalp");
    }

    #[test]
    fn test_duplicate_letters_keep_first() {
        let text = "SPECIMEN SUBMITTED:\nA. shave, back\nA. punch, scalp";
        let specimens = extract_specimens(text);
        assert_eq!(specimens.len(), 1);
        assert_eq!(specimens[0].description, "shave, back");
    }

    #[test]
    fn test_missing_section_yields_no_specimens() {
        let (accession, specimens) = extract("DIAGNOSIS: Lipoma");
        assert!(accession.is_none());
        assert!(specimens.is_empty());
    }

    #[test]
    fn test_accession_is_case_insensitive() {
        let accession = extract_accession("accession no:   P25-77 received");
        assert_eq!(accession.unwrap().as_str(), "P25-77");
    }

    #[test]
    fn test_synthesized_identifiers_stop_at_z() {
        let lines: Vec<String> = (0..30).map(|i| format!("fragment {i}")).collect();
        let text = format!("SPECIMEN SUBMITTED:\n{}", lines.join("\n"));
        let specimens = extract_specimens(&text);
        assert_eq!(specimens.len(), 26);
        assert_eq!(specimens[25].identifier, id('Z'));
    }

    #[test]
    fn test_lettered_line_requires_single_capital_and_period() {
        assert!(lettered_line("A. left arm").is_some());
        assert!(lettered_line("  B.left arm").is_some());
        assert!(lettered_line("A) left arm").is_none());
        assert!(lettered_line("Dr. Smith").is_none());
        assert!(lettered_line("a. left arm").is_none());
        assert!(lettered_line("A.").is_none());
    }
}
