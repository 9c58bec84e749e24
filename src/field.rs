//! Ordered, case-insensitive field storage shared by headers and records.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::types::normalize_name;

/// One named field value. The name is always lower-case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Normalized field name.
    pub name: String,
    /// Raw field text, never coerced.
    pub value: String,
}

/// Insertion-ordered field map keyed by normalized name.
///
/// Setting a name that already exists replaces its value in place, so the
/// last occurrence wins while the first position is kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Field>", into = "Vec<Field>")]
pub struct FieldMap {
    entries: Vec<Field>,
    pos: HashMap<String, usize>,
}

impl FieldMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, returning the replaced value if any.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) -> Option<String> {
        let name = normalize_name(name);
        let value = value.into();
        if let Some(&idx) = self.pos.get(&name) {
            return Some(std::mem::replace(&mut self.entries[idx].value, value));
        }
        self.pos.insert(name.clone(), self.entries.len());
        self.entries.push(Field { name, value });
        None
    }

    /// Looks up a value by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&str> {
        let idx = *self.pos.get(&normalize_name(name))?;
        Some(self.entries[idx].value.as_str())
    }

    /// Returns true when `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.pos.contains_key(&normalize_name(name))
    }

    /// Removes `name`, keeping the order of the remaining fields.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let idx = self.pos.remove(&normalize_name(name))?;
        let field = self.entries.remove(idx);
        for slot in self.pos.values_mut() {
            if *slot > idx {
                *slot -= 1;
            }
        }
        Some(field.value)
    }

    /// Iterates fields in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.entries.iter()
    }

    /// Number of distinct fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no fields are set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for FieldMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for FieldMap {}

impl From<Vec<Field>> for FieldMap {
    fn from(fields: Vec<Field>) -> Self {
        fields.into_iter().map(|f| (f.name, f.value)).collect()
    }
}

impl From<FieldMap> for Vec<Field> {
    fn from(map: FieldMap) -> Self {
        map.entries
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: AsRef<str>, V: Into<String>> Extend<(K, V)> for FieldMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k.as_ref(), v);
        }
    }
}

impl<'a> IntoIterator for &'a FieldMap {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
