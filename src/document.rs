//! Decoded ADIF document: header, user-defined field declarations, and QSO records.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    field::{Field, FieldMap},
    types::{DataType, UserDefId},
};

/// Failure of a derived accessor over already-parsed fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessorError {
    /// One half of a paired field is absent.
    #[error("missing field `{field}`")]
    MissingField {
        /// Name of the absent field.
        field: &'static str,
    },
    /// The field text is not a valid date or time.
    #[error("field `{field}` has invalid value {value:?}")]
    Format {
        /// Name of the offending field.
        field: &'static str,
        /// Raw field text.
        value: String,
    },
}

/// Value constraint attached to a user-defined field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constraint {
    /// `{A,B,C}`: allowed values.
    Enum(Vec<String>),
    /// `{min:max}`: inclusive numeric range.
    Range {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
}

impl Constraint {
    /// Parses `{S,M,L}` or `{5:20}`. Returns `None` for anything else.
    pub fn parse(text: &str) -> Option<Self> {
        let inner = text.trim().strip_prefix('{')?.strip_suffix('}')?;
        if let Some((lo, hi)) = inner.split_once(':') {
            let min = lo.trim().parse().ok()?;
            let max = hi.trim().parse().ok()?;
            return Some(Self::Range { min, max });
        }
        let values: Vec<String> = inner
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();
        if values.is_empty() {
            return None;
        }
        Some(Self::Enum(values))
    }

    /// Brace-delimited form used in both ADI and ADX.
    pub fn to_braced(&self) -> String {
        match self {
            Self::Enum(values) => format!("{{{}}}", values.join(",")),
            Self::Range { min, max } => format!("{{{min}:{max}}}"),
        }
    }
}

/// Declaration of a custom field carried in the header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDef {
    /// Field id, the `n` in `USERDEF<n>`.
    pub id: UserDefId,
    /// Declared data type, if any.
    pub data_type: Option<DataType>,
    /// Enumeration or range constraint, if any.
    pub constraint: Option<Constraint>,
    /// Display name used by records to refer to this field.
    pub name: String,
}

impl UserDef {
    /// Creates a declaration with no type or constraint.
    pub fn new(id: UserDefId, name: impl Into<String>) -> Self {
        Self {
            id,
            data_type: None,
            constraint: None,
            name: name.into(),
        }
    }

    /// Sets the declared type.
    pub fn with_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    /// Sets the value constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    /// Builds a declaration from an ADI `USERDEF<n>` tag.
    ///
    /// The value is `NAME` or `NAME,{...}`; an unparseable constraint is
    /// dropped and the name kept.
    pub fn from_adi(id: UserDefId, type_hint: Option<&str>, value: &str) -> Self {
        let (name, constraint) = match value.split_once(',') {
            Some((name, rest)) => (name, Constraint::parse(rest)),
            None => (value, None),
        };
        Self {
            id,
            data_type: type_hint.and_then(DataType::from_code),
            constraint,
            name: name.trim().to_string(),
        }
    }

    /// ADI value text: the name, followed by `,{...}` when constrained.
    pub fn adi_value(&self) -> String {
        match &self.constraint {
            Some(c) => format!("{},{}", self.name, c.to_braced()),
            None => self.name.clone(),
        }
    }

    /// Header field name carrying this declaration, e.g. `userdef2`.
    pub fn field_name(&self) -> String {
        format!("userdef{}", self.id)
    }
}

/// Returns the id when `name` is a `userdef<n>` field name (any case).
pub fn userdef_id(name: &str) -> Option<UserDefId> {
    if !name.get(..7)?.eq_ignore_ascii_case("userdef") {
        return None;
    }
    let digits = &name[7..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Document header: metadata fields plus user-defined field declarations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    fields: FieldMap,
    userdefs: Vec<UserDef>,
}

impl Header {
    /// Creates an empty header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a header from ordered name/value pairs.
    pub fn from_pairs<K: AsRef<str>, V: Into<String>>(
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        Self {
            fields: pairs.into_iter().collect(),
            userdefs: Vec::new(),
        }
    }

    /// Builder form of [`Header::set`].
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Builder form of [`Header::add_userdef`].
    pub fn with_userdef(mut self, userdef: UserDef) -> Self {
        self.add_userdef(userdef);
        self
    }

    /// Sets a header field.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Option<String> {
        self.fields.insert(name, value)
    }

    /// Looks up a header field, ignoring case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name)
    }

    /// Header fields in order.
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Adds a declaration, replacing any earlier one with the same id.
    pub fn add_userdef(&mut self, userdef: UserDef) {
        match self.userdefs.iter_mut().find(|u| u.id == userdef.id) {
            Some(slot) => *slot = userdef,
            None => self.userdefs.push(userdef),
        }
    }

    /// Declarations in order of first appearance.
    pub fn userdefs(&self) -> &[UserDef] {
        &self.userdefs
    }

    /// Declaration by id.
    pub fn userdef(&self, id: UserDefId) -> Option<&UserDef> {
        self.userdefs.iter().find(|u| u.id == id)
    }

    /// Declaration by display name, ignoring case.
    pub fn userdef_named(&self, name: &str) -> Option<&UserDef> {
        self.userdefs.iter().find(|u| u.name.eq_ignore_ascii_case(name))
    }

    /// Returns true when the header carries neither fields nor declarations.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.userdefs.is_empty()
    }
}

/// One QSO.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    fields: FieldMap,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Record::set`].
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a field.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Option<String> {
        self.fields.insert(name, value)
    }

    /// Looks up a field, ignoring case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name)
    }

    /// Fields in the order they were first set.
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Iterates fields in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when no fields are set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Start of the contact, from `qso_date` and `time_on`.
    pub fn datetime_on(&self) -> Result<NaiveDateTime, AccessorError> {
        self.datetime("qso_date", "time_on")
    }

    /// End of the contact, from `qso_date_off` and `time_off`.
    pub fn datetime_off(&self) -> Result<NaiveDateTime, AccessorError> {
        self.datetime("qso_date_off", "time_off")
    }

    /// Combines an 8-digit date field with a 4- or 6-digit time field.
    pub fn datetime(
        &self,
        date_field: &'static str,
        time_field: &'static str,
    ) -> Result<NaiveDateTime, AccessorError> {
        let date_raw = self
            .get(date_field)
            .ok_or(AccessorError::MissingField { field: date_field })?;
        let time_raw = self
            .get(time_field)
            .ok_or(AccessorError::MissingField { field: time_field })?;

        let date = parse_date(date_raw).ok_or_else(|| AccessorError::Format {
            field: date_field,
            value: date_raw.to_string(),
        })?;
        let time = parse_time(time_raw).ok_or_else(|| AccessorError::Format {
            field: time_field,
            value: time_raw.to_string(),
        })?;
        Ok(date.and_time(time))
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl From<FieldMap> for Record {
    fn from(fields: FieldMap) -> Self {
        Self { fields }
    }
}

/// A header plus its records, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document header; empty when the input had none.
    pub header: Header,
    /// Terminated records.
    pub records: Vec<Record>,
}

impl Document {
    /// Creates a document with `header` and no records.
    pub fn new(header: Header) -> Self {
        Self {
            header,
            records: Vec::new(),
        }
    }

    /// Appends a record.
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.len() != 8 || !all_digits(raw) {
        return None;
    }
    let y = raw[0..4].parse().ok()?;
    let m = raw[4..6].parse().ok()?;
    let d = raw[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(y, m, d)
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    if !(raw.len() == 4 || raw.len() == 6) || !all_digits(raw) {
        return None;
    }
    let h = raw[0..2].parse().ok()?;
    let m = raw[2..4].parse().ok()?;
    let s = if raw.len() == 6 { raw[4..6].parse().ok()? } else { 0 };
    NaiveTime::from_hms_opt(h, m, s)
}
