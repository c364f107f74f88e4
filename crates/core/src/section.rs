//! Section location within raw report text.
//!
//! A section starts after `<HEADER>:` (matched case-insensitively) and ends at the first blank
//! line, the first line that opens with capital letters and spaces followed by a colon (the
//! next header), or the end of the text.

use crate::constants::{
    CLINICAL_IMPRESSION_HEADER, DIAGNOSIS_HEADER, MICROSCOPIC_DESCRIPTION_HEADER,
    SPECIMEN_SUBMITTED_HEADER,
};
use regex::Regex;
use std::sync::LazyLock;

static SECTION_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\n|\n[A-Z ]+:").expect("valid section end regex"));

/// The named sections of a pathology report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    SpecimenSubmitted,
    Diagnosis,
    MicroscopicDescription,
    ClinicalImpression,
}

impl Section {
    /// The header text that introduces this section.
    pub fn header(&self) -> &'static str {
        match self {
            Self::SpecimenSubmitted => SPECIMEN_SUBMITTED_HEADER,
            Self::Diagnosis => DIAGNOSIS_HEADER,
            Self::MicroscopicDescription => MICROSCOPIC_DESCRIPTION_HEADER,
            Self::ClinicalImpression => CLINICAL_IMPRESSION_HEADER,
        }
    }

    pub(crate) fn header_pattern(&self) -> &'static Regex {
        static SPECIMEN_SUBMITTED: LazyLock<Regex> =
            LazyLock::new(|| header_regex(SPECIMEN_SUBMITTED_HEADER));
        static DIAGNOSIS: LazyLock<Regex> = LazyLock::new(|| header_regex(DIAGNOSIS_HEADER));
        static MICROSCOPIC_DESCRIPTION: LazyLock<Regex> =
            LazyLock::new(|| header_regex(MICROSCOPIC_DESCRIPTION_HEADER));
        static CLINICAL_IMPRESSION: LazyLock<Regex> =
            LazyLock::new(|| header_regex(CLINICAL_IMPRESSION_HEADER));

        match self {
            Self::SpecimenSubmitted => &SPECIMEN_SUBMITTED,
            Self::Diagnosis => &DIAGNOSIS,
            Self::MicroscopicDescription => &MICROSCOPIC_DESCRIPTION,
            Self::ClinicalImpression => &CLINICAL_IMPRESSION,
        }
    }
}

fn header_regex(header: &str) -> Regex {
    Regex::new(&format!("(?i){}:", regex::escape(header))).expect("valid section header regex")
}

/// Locates the body of `section` in `text`.
///
/// Whitespace between the header and the body is skipped and the body is trimmed.
///
/// # Returns
///
/// The trimmed section body, or `None` if the header is absent or the body is empty.
pub fn locate(text: &str, section: Section) -> Option<&str> {
    locate_until(text, section, &SECTION_END)
}

/// Locates the body of `section`, ending it at the first match of `end`.
///
/// The end search starts at the first body character, so the opening line of the body is
/// never taken for a terminator.
pub(crate) fn locate_until<'a>(text: &'a str, section: Section, end: &Regex) -> Option<&'a str> {
    let header = section.header_pattern().find(text)?;
    let rest = &text[header.end()..];

    let lead = rest.len() - rest.trim_start().len();
    let end = end.find_at(rest, lead).map_or(rest.len(), |m| m.start());

    let body = rest[..end].trim();
    (!body.is_empty()).then_some(body)
}
