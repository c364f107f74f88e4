//! Specimen record assembly.
//!
//! Merges the specimen list with the correlated narrative spans. Span lists are applied in the
//! order diagnosis, microscopic description, clinical impression; within a list the last span
//! targeting a record wins. Broadcast spans overwrite the field on every record.

use crate::config::NarrativeCleanup;
use crate::correlate::{FieldSpan, NarrativeField, SpanTarget};
use crate::specimen::Specimen;
use pathreport_types::SpecimenId;
use serde::Serialize;

/// The structured output for one specimen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SpecimenRecord {
    pub identifier: SpecimenId,
    pub description: String,
    pub diagnosis: String,
    pub microscopic_description: String,
    pub clinical_impression: String,
}

impl SpecimenRecord {
    fn new(specimen: &Specimen) -> Self {
        Self {
            identifier: specimen.identifier,
            description: specimen.description.clone(),
            diagnosis: String::new(),
            microscopic_description: String::new(),
            clinical_impression: String::new(),
        }
    }

    fn field_mut(&mut self, field: NarrativeField) -> &mut String {
        match field {
            NarrativeField::Diagnosis => &mut self.diagnosis,
            NarrativeField::MicroscopicDescription => &mut self.microscopic_description,
            NarrativeField::ClinicalImpression => &mut self.clinical_impression,
        }
    }
}

/// Builds one record per specimen, in specimen order.
///
/// Spans targeting identifiers that are not in `specimens` are discarded.
pub fn assemble(
    specimens: &[Specimen],
    diagnosis: &[FieldSpan],
    microscopic_description: &[FieldSpan],
    clinical_impression: &[FieldSpan],
    cleanup: NarrativeCleanup,
) -> Vec<SpecimenRecord> {
    let mut records: Vec<SpecimenRecord> = specimens.iter().map(SpecimenRecord::new).collect();

    for (field, spans) in [
        (NarrativeField::Diagnosis, diagnosis),
        (NarrativeField::MicroscopicDescription, microscopic_description),
        (NarrativeField::ClinicalImpression, clinical_impression),
    ] {
        for span in spans {
            apply_span(&mut records, field, span);
        }
    }

    for record in &mut records {
        for field in [
            NarrativeField::Diagnosis,
            NarrativeField::MicroscopicDescription,
            NarrativeField::ClinicalImpression,
        ] {
            let value = record.field_mut(field);
            let cleaned = cleanup.apply(value);
            *value = cleaned;
        }
    }

    records
}

fn apply_span(records: &mut [SpecimenRecord], field: NarrativeField, span: &FieldSpan) {
    let mut matched = false;
    for record in records.iter_mut() {
        let applies = match span.target {
            SpanTarget::All => true,
            SpanTarget::Specimen(id) => record.identifier == id,
        };
        if applies {
            *record.field_mut(field) = span.text.clone();
            matched = true;
        }
    }
    if !matched {
        tracing::debug!(span_target = %span.target, ?field, "span matched no specimen record");
    }
}
