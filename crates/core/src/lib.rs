//! # Pathology Report Core
//!
//! Turns one free-text pathology report into structured per-specimen records.
//!
//! The pipeline runs leaves first and data only flows downward:
//! - [`section`]: locate named sections in the raw text
//! - [`specimen`]: read the accession number and the canonical specimen list
//! - [`mapping`]: map every surface form of a specimen reference to its canonical letter
//! - [`correlate`]: attribute diagnosis, microscopic description and clinical impression text
//!   to specimens, broadcasting untagged sections to all of them
//! - [`assemble`]: merge everything into one [`SpecimenRecord`] per specimen
//!
//! Extraction never fails. Absent sections produce empty fields, unresolvable identifiers are
//! dropped and a report without specimens produces no records.
//!
//! **No I/O concerns**: reading reports, fanning rows out and writing tables belong in
//! `pathreport-batch` and the CLI.

pub mod assemble;
pub mod config;
pub mod constants;
pub mod correlate;
mod error;
pub mod mapping;
pub mod section;
pub mod specimen;

pub use assemble::SpecimenRecord;
pub use config::{ExtractorConfig, NarrativeCleanup};
pub use correlate::{FieldSpan, NarrativeField, SpanTarget};
pub use error::{CoreError, CoreResult};
pub use mapping::IdentifierMapping;
pub use pathreport_types::{AccessionNumber, SpecimenId};
pub use specimen::Specimen;

use serde::Serialize;

/// Structured output for one report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Report {
    pub accession: Option<AccessionNumber>,
    pub records: Vec<SpecimenRecord>,
}

/// Pure report extraction - no I/O concerns.
///
/// Holds no per-report state, so one instance can be shared by every worker in a pool.
#[derive(Clone, Debug, Default)]
pub struct ReportExtractor {
    cfg: ExtractorConfig,
}

impl ReportExtractor {
    /// Creates a new `ReportExtractor` with the given configuration.
    pub fn new(cfg: ExtractorConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.cfg
    }

    /// Extracts the accession number and one record per specimen from raw report text.
    ///
    /// # Arguments
    ///
    /// * `text` - The full report text. An empty string yields an empty report.
    ///
    /// # Returns
    ///
    /// A [`Report`] whose records follow the order of the specimen section.
    pub fn extract(&self, text: &str) -> Report {
        let (accession, specimens) = specimen::extract(text);
        if specimens.is_empty() {
            return Report {
                accession,
                records: Vec::new(),
            };
        }

        let mapping = mapping::build_mapping(text, &specimens);
        let diagnosis = correlate::correlate(text, NarrativeField::Diagnosis, &mapping);
        let microscopic =
            correlate::correlate(text, NarrativeField::MicroscopicDescription, &mapping);
        let impression = correlate::correlate(text, NarrativeField::ClinicalImpression, &mapping);

        let records = assemble::assemble(
            &specimens,
            &diagnosis,
            &microscopic,
            &impression,
            self.cfg.narrative_cleanup(),
        );

        tracing::debug!(
            accession = accession.as_ref().map(AccessionNumber::as_str),
            specimens = records.len(),
            "report extracted"
        );

        Report { accession, records }
    }
}

/// Extracts a report with the default configuration.
pub fn extract_report(text: &str) -> Report {
    ReportExtractor::default().extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(letter: char) -> SpecimenId {
        SpecimenId::new(letter).unwrap()
    }

    const FULL_REPORT: &str = "\
Accession No: S24-1234
SPECIMEN SUBMITTED: A. skin, left arm
B. skin, right arm

DIAGNOSIS:
A. Skin, left arm, shave:
-- Basal cell carcinoma
superficial type
B. Skin, right arm, punch:
-- Seborrheic keratosis

MICROSCOPIC DESCRIPTION:
A. left arm - Nests of basaloid cells.
B. right arm - Acanthosis with horn cysts.

CLINICAL IMPRESSION: A) r/o BCC B) r/o SK";

    #[test]
    fn test_extract_full_report() {
        let report = extract_report(FULL_REPORT);

        assert_eq!(report.accession.as_ref().unwrap().as_str(), "S24-1234");
        assert_eq!(report.records.len(), 2);

        let a = &report.records[0];
        assert_eq!(a.identifier, id('A'));
        assert_eq!(a.description, "skin, left arm");
        assert_eq!(a.diagnosis, "Basal cell carcinoma");
        assert_eq!(a.microscopic_description, "Nests of basaloid cells.");
        assert_eq!(a.clinical_impression, "r/o BCC");

        let b = &report.records[1];
        assert_eq!(b.identifier, id('B'));
        assert_eq!(b.diagnosis, "Seborrheic keratosis");
        assert_eq!(b.microscopic_description, "Acanthosis with horn cysts.");
        assert_eq!(b.clinical_impression, "r/o SK");
    }

    #[test]
    fn test_extract_impression_tokens_starting_below_header() {
        let text = "SPECIMEN SUBMITTED: A. skin, left arm\nB. skin, right arm\n\nCLINICAL IMPRESSION:\nA: benign nevus";
        let report = extract_report(text);
        assert_eq!(report.records[0].clinical_impression, "benign nevus");
        assert_eq!(report.records[1].clinical_impression, "");
    }

    #[test]
    fn test_extract_without_accession() {
        let report = extract_report("SPECIMEN SUBMITTED:\nskin biopsy");
        assert!(report.accession.is_none());
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].identifier, id('A'));
        assert_eq!(report.records[0].description, "skin biopsy");
    }

    #[test]
    fn test_extract_broadcasts_untagged_impression() {
        let text = "SPECIMEN SUBMITTED: A. skin, left arm\nB. skin, right arm\n\nCLINICAL IMPRESSION: Benign nevus.";
        let report = extract_report(text);
        assert!(report
            .records
            .iter()
            .all(|r| r.clinical_impression == "Benign nevus."));
    }

    #[test]
    fn test_extract_broadcast_reaches_five_specimens() {
        let text = "SPECIMEN SUBMITTED:\none\ntwo\nthree\nfour\nfive\n\nMICROSCOPIC DESCRIPTION: Unremarkable skin.";
        let report = extract_report(text);
        assert_eq!(report.records.len(), 5);
        assert!(report
            .records
            .iter()
            .all(|r| r.microscopic_description == "Unremarkable skin."));
    }

    #[test]
    fn test_extract_impression_by_ordinal_for_synthesized_specimens() {
        let text = "SPECIMEN SUBMITTED:\nshave, back\npunch, scalp\n\nCLINICAL IMPRESSION: #1- SK #2- BCC";
        let report = extract_report(text);
        assert_eq!(report.records[0].clinical_impression, "SK");
        assert_eq!(report.records[1].clinical_impression, "BCC");
    }

    #[test]
    fn test_extract_ordinal_diagnosis_is_not_resolved() {
        // Known limitation: ordinal-tagged diagnoses do not reach any specimen.
        let text = "SPECIMEN SUBMITTED: A. skin, left arm\n\n1. left arm\n-- Basal cell carcinoma";
        let report = extract_report(text);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].diagnosis, "");
    }

    #[test]
    fn test_extract_without_specimens_yields_no_records() {
        let report = extract_report("Accession No: X1\nDIAGNOSIS: Lipoma");
        assert_eq!(report.accession.unwrap().as_str(), "X1");
        assert!(report.records.is_empty());
        assert!(extract_report("").records.is_empty());
    }

    #[test]
    fn test_extract_is_idempotent() {
        assert_eq!(extract_report(FULL_REPORT), extract_report(FULL_REPORT));
    }

    #[test]
    fn test_extract_full_text_cleanup() {
        let extractor = ReportExtractor::new(ExtractorConfig::new(NarrativeCleanup::FullText));
        let report = extractor.extract(FULL_REPORT);
        assert_eq!(
            report.records[0].diagnosis,
            "Basal cell carcinoma\nsuperficial type"
        );
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = extract_report("Accession No: S1\nSPECIMEN SUBMITTED: A. skin");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["accession"], "S1");
        assert_eq!(json["records"][0]["identifier"], "A");
        assert_eq!(json["records"][0]["clinical_impression"], "");
    }
}
