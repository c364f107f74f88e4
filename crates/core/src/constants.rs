//! Constants used throughout the pathology report core crate.
//!
//! Section header names, output column names and configuration keys live here so the
//! scanners, the batch driver and the CLI agree on spelling.

/// Header of the section listing the submitted specimens.
pub const SPECIMEN_SUBMITTED_HEADER: &str = "SPECIMEN SUBMITTED";

/// Header of the diagnosis section.
pub const DIAGNOSIS_HEADER: &str = "DIAGNOSIS";

/// Header of the microscopic description section.
pub const MICROSCOPIC_DESCRIPTION_HEADER: &str = "MICROSCOPIC DESCRIPTION";

/// Header of the clinical impression section.
pub const CLINICAL_IMPRESSION_HEADER: &str = "CLINICAL IMPRESSION";

/// Label preceding the accession number.
pub const ACCESSION_LABEL: &str = "Accession No:";

/// Keyword used by authors to reference a specimen as a lesion ("Lesion B").
pub const LESION_KEYWORD: &str = "Lesion";

/// Marker that opens the diagnosis text beneath a specimen line.
pub const DIAGNOSIS_MARKER: &str = "--";

/// Environment variable selecting the narrative cleanup rule.
pub const NARRATIVE_CLEANUP_ENV: &str = "PATHREPORT_NARRATIVE_CLEANUP";
