//! Hydrated result rows.
//!
//! Query backends hydrate rows in the scalar wire format: a column selected
//! as `u.name` arrives as `u_name`. [`column_key`] performs that mapping so
//! callers can keep addressing fields by their query path.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Scalar;

/// Maps a query path to the column name used in hydrated rows.
///
/// Only the first `.` is replaced; names without a `.` are returned as is.
///
/// ```
/// use datagrid_seeker::column_key;
///
/// assert_eq!(column_key("u.name"), "u_name");
/// assert_eq!(column_key("u.profile.city"), "u_profile.city");
/// assert_eq!(column_key("total"), "total");
/// ```
pub fn column_key(field: &str) -> Cow<'_, str> {
    match field.find('.') {
        Some(pos) => {
            let mut key = String::with_capacity(field.len());
            key.push_str(&field[..pos]);
            key.push('_');
            key.push_str(&field[pos + 1..]);
            Cow::Owned(key)
        }
        None => Cow::Borrowed(field),
    }
}

/// One hydrated row: column name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    values: BTreeMap<String, Scalar>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column, builder style.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.insert(column, value);
        self
    }

    /// Sets a column value, returning the previous one.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Scalar>) -> Option<Scalar> {
        self.values.insert(column.into(), value.into())
    }

    /// Returns the value stored under the exact column name.
    pub fn get(&self, column: &str) -> Option<&Scalar> {
        self.values.get(column)
    }

    /// Resolves a query path (`u.name`) or a column name (`u_name`).
    ///
    /// The hydrated column name is tried first, then the name as given.
    pub fn lookup(&self, field: &str) -> Option<&Scalar> {
        self.values
            .get(column_key(field).as_ref())
            .or_else(|| self.values.get(field))
    }

    /// Returns `true` if `field` resolves to a column of this record.
    pub fn has_field(&self, field: &str) -> bool {
        self.lookup(field).is_some()
    }

    /// Iterates column names in sorted order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterates `(column, value)` pairs in sorted column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the record has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<Scalar>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}
