//! Example records the search is scored against.
//!
//! A [`Dataset`] is an ordered, non-empty list of [`Record`]s sharing one
//! target field. Every other field name that appears in any record is an
//! *input* that expressions may reference.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Errors detected while building a [`Dataset`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum DatasetError {
    #[display("dataset has no records")]
    Empty,
    #[display("record #{index} does not define target field `{target}`")]
    MissingTarget { index: usize, target: String },
    #[display("record #{index} has non-finite value for field `{field}`")]
    NonFiniteValue { index: usize, field: String },
    #[display("dataset has no input fields besides target `{target}`")]
    NoInputFields { target: String },
}

/// A single example: field name to numeric value.
///
/// Looking up a field the record does not define yields `0.0`.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Record {
    values: BTreeMap<String, f64>,
}

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of `field`, or `0.0` if the record does not define it.
    #[must_use]
    pub fn get(&self, field: &str) -> f64 {
        self.values.get(field).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    pub fn set<S>(&mut self, field: S, value: f64)
    where
        S: Into<String>,
    {
        self.values.insert(field.into(), value);
    }

    /// Iterates over the field names in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<S> FromIterator<(S, f64)> for Record
where
    S: Into<String>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
    {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Read-only table of records with a designated target field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    target: String,
    records: Vec<Record>,
    #[serde(skip)]
    inputs: Vec<String>,
}

impl Dataset {
    /// Builds a dataset, checking the invariants the search relies on.
    ///
    /// - there is at least one record
    /// - every record defines `target`
    /// - every value is finite
    /// - at least one field other than `target` exists
    ///
    /// The input names are the sorted union of all record fields except `target`.
    pub fn new<S>(target: S, records: Vec<Record>) -> Result<Self, DatasetError>
    where
        S: Into<String>,
    {
        let target = target.into();
        if records.is_empty() {
            return Err(DatasetError::Empty);
        }

        let mut inputs = BTreeSet::new();
        for (index, record) in records.iter().enumerate() {
            if !record.contains(&target) {
                return Err(DatasetError::MissingTarget { index, target });
            }
            for (field, value) in record.iter() {
                if !value.is_finite() {
                    return Err(DatasetError::NonFiniteValue {
                        index,
                        field: field.to_owned(),
                    });
                }
                if field != target {
                    inputs.insert(field);
                }
            }
        }
        if inputs.is_empty() {
            return Err(DatasetError::NoInputFields { target });
        }
        let inputs = inputs.into_iter().map(str::to_owned).collect();

        Ok(Self {
            target,
            records,
            inputs,
        })
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Field names an [`Expr::Input`](crate::Expr::Input) may reference.
    ///
    /// Never empty and never contains the target.
    #[must_use]
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    #[must_use]
    pub fn is_input(&self, name: &str) -> bool {
        self.inputs.binary_search_by(|n| n.as_str().cmp(name)).is_ok()
    }
}

impl<'de> Deserialize<'de> for Dataset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawDataset {
            target: String,
            records: Vec<Record>,
        }

        let RawDataset { target, records } = RawDataset::deserialize(deserializer)?;
        Dataset::new(target, records).map_err(serde::de::Error::custom)
    }
}
