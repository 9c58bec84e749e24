//! Shared primitive IDs, format versions, and ADIF data type indicators.

use serde::{Deserialize, Serialize};

/// Numeric id of a user-defined field (`USERDEF<n>`).
pub type UserDefId = u32;
/// Archive id of one imported document.
pub type ImportId = u64;

/// Target ADIF major version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AdifVersion {
    /// ADIF 2.x.
    V2,
    /// ADIF 3.x.
    #[default]
    V3,
}

impl AdifVersion {
    /// Value written to the `adif_ver` header field.
    pub fn adif_ver(self) -> &'static str {
        match self {
            Self::V2 => "2.2.7",
            Self::V3 => "3.1.4",
        }
    }

    /// Major version number.
    pub fn major(self) -> u8 {
        match self {
            Self::V2 => 2,
            Self::V3 => 3,
        }
    }
}

impl TryFrom<u8> for AdifVersion {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Self::V2),
            3 => Ok(Self::V3),
            other => Err(other),
        }
    }
}

/// ADIF data type indicator carried in the third slot of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// `B`
    Boolean,
    /// `N`
    Number,
    /// `D`, YYYYMMDD.
    Date,
    /// `T`, HHMM or HHMMSS.
    Time,
    /// `S`
    String,
    /// `I`
    IntlString,
    /// `M`
    MultilineString,
    /// `G`
    IntlMultilineString,
    /// `E`
    Enumeration,
    /// `L`
    Location,
    /// Any indicator outside the ADIF set, kept verbatim.
    Other(char),
}

impl DataType {
    /// Parses a type indicator, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for an empty indicator.
    pub fn from_code(code: &str) -> Option<Self> {
        let mut chars = code.trim().chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Some(match c.to_ascii_uppercase() {
            'B' => Self::Boolean,
            'N' => Self::Number,
            'D' => Self::Date,
            'T' => Self::Time,
            'S' => Self::String,
            'I' => Self::IntlString,
            'M' => Self::MultilineString,
            'G' => Self::IntlMultilineString,
            'E' => Self::Enumeration,
            'L' => Self::Location,
            other => Self::Other(other),
        })
    }

    /// Single-letter indicator as written in ADI tags.
    pub fn code(self) -> char {
        match self {
            Self::Boolean => 'B',
            Self::Number => 'N',
            Self::Date => 'D',
            Self::Time => 'T',
            Self::String => 'S',
            Self::IntlString => 'I',
            Self::MultilineString => 'M',
            Self::IntlMultilineString => 'G',
            Self::Enumeration => 'E',
            Self::Location => 'L',
            Self::Other(c) => c,
        }
    }
}

/// Folds a field or marker name to its canonical (lower-case) form.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_codes_are_case_insensitive() {
        assert_eq!(DataType::from_code("e"), Some(DataType::Enumeration));
        assert_eq!(DataType::from_code(" N "), Some(DataType::Number));
        assert_eq!(DataType::from_code("x"), Some(DataType::Other('X')));
        assert_eq!(DataType::from_code(""), None);
        assert_eq!(DataType::from_code("NN"), None);
    }

    #[test]
    fn version_from_major() {
        assert_eq!(AdifVersion::try_from(2), Ok(AdifVersion::V2));
        assert_eq!(AdifVersion::try_from(3), Ok(AdifVersion::V3));
        assert_eq!(AdifVersion::try_from(4), Err(4));
    }
}
