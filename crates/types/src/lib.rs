//! Validated value types shared across the pathology report workspace.
//!
//! - [`SpecimenId`]: the canonical single-letter identifier of one specimen in a report.
//! - [`AccessionNumber`]: the laboratory's tracking token for a report.

use std::fmt;

/// Errors that can occur when creating validated report types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypeError {
    /// The input was empty or contained only whitespace
    #[error("text cannot be empty")]
    Empty,
    /// The input was not a single capital letter A-Z
    #[error("invalid specimen identifier: {0:?}")]
    InvalidSpecimenId(String),
    /// The accession token contained whitespace after trimming
    #[error("accession number must be a single token: {0:?}")]
    InvalidAccession(String),
}

/// Canonical identifier of a specimen within one report.
///
/// Always a single ASCII capital letter. Ordering follows the alphabet, which matches
/// document order for synthesized identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpecimenId(char);

impl SpecimenId {
    /// Creates a `SpecimenId` from a single character.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidSpecimenId` unless `letter` is in `A..=Z`.
    pub fn new(letter: char) -> Result<Self, TypeError> {
        if letter.is_ascii_uppercase() {
            Ok(Self(letter))
        } else {
            Err(TypeError::InvalidSpecimenId(letter.to_string()))
        }
    }

    /// Parses a `SpecimenId` from a string holding exactly one capital letter.
    pub fn parse(input: &str) -> Result<Self, TypeError> {
        let mut chars = input.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => Self::new(letter),
            _ => Err(TypeError::InvalidSpecimenId(input.to_owned())),
        }
    }

    /// Returns the identifier synthesized for the specimen at a zero-based position.
    ///
    /// Position 0 is `A`, 25 is `Z`. Positions past `Z` have no identifier.
    pub fn from_position(position: usize) -> Option<Self> {
        u8::try_from(position)
            .ok()
            .filter(|p| *p < 26)
            .map(|p| Self(char::from(b'A' + p)))
    }

    /// Returns the identifier letter.
    pub fn as_char(&self) -> char {
        self.0
    }
}

impl fmt::Display for SpecimenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SpecimenId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for SpecimenId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for SpecimenId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SpecimenId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A report's accession number.
///
/// Holds one trimmed, whitespace-free token such as `S24-1234`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessionNumber(String);

impl AccessionNumber {
    /// Creates an `AccessionNumber`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::Empty` for blank input and `TypeError::InvalidAccession` if the
    /// trimmed input still contains whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TypeError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypeError::Empty);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(TypeError::InvalidAccession(trimmed.to_owned()));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccessionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for AccessionNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for AccessionNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for AccessionNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        AccessionNumber::new(&s).map_err(serde::de::Error::custom)
    }
}
