//! Parse-and-filter boundary between raw tabular data and the statistics.
//!
//! Rows arrive as loosely typed records. Everything past this module works
//! on [`Sample`], which only ever holds finite `f64` values.

use std::{
    collections::{BTreeMap, HashMap},
    ops::Deref,
};

use serde::{Deserialize, Serialize};

/// A single cell of a heterogeneous row record.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Missing or explicitly null cell.
    Null,
    Bool(bool),
    /// Numeric cell; may be non-finite.
    Number(f64),
    /// Free text, parsed on demand by [`CellValue::to_number`].
    Text(String),
}

impl CellValue {
    /// Interprets the cell as a finite number.
    ///
    /// Text is trimmed and parsed; empty text, booleans and null are not
    /// numbers.
    ///
    /// # Examples
    ///
    /// ```
    /// use distlens_stats::sample::CellValue;
    ///
    /// assert_eq!(CellValue::Text(" 4.5 ".into()).to_number(), Some(4.5));
    /// assert_eq!(CellValue::Text(String::new()).to_number(), None);
    /// assert_eq!(CellValue::Number(f64::NAN).to_number(), None);
    /// assert_eq!(CellValue::Bool(true).to_number(), None);
    /// ```
    #[must_use]
    pub fn to_number(&self) -> Option<f64> {
        let value = match self {
            Self::Number(v) => *v,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
            Self::Bool(_) | Self::Null => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Renders the cell as a category label (not trimmed).
    ///
    /// # Examples
    ///
    /// ```
    /// use distlens_stats::sample::CellValue;
    ///
    /// assert_eq!(CellValue::Number(3.0).to_label(), "3");
    /// assert_eq!(CellValue::Bool(false).to_label(), "false");
    /// assert_eq!(CellValue::Null.to_label(), "");
    /// ```
    #[must_use]
    pub fn to_label(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Number(v) => v.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A row record addressable by column name.
pub trait Record {
    /// Returns the cell stored under `column`, or `None` if the column is
    /// absent from this row.
    fn cell(&self, column: &str) -> Option<&CellValue>;
}

impl Record for BTreeMap<String, CellValue> {
    fn cell(&self, column: &str) -> Option<&CellValue> {
        self.get(column)
    }
}

impl Record for HashMap<String, CellValue> {
    fn cell(&self, column: &str) -> Option<&CellValue> {
        self.get(column)
    }
}

/// An ordered sequence of finite values.
///
/// Non-finite inputs are dropped on construction, so every statistic
/// computed from a `Sample` sees finite data only.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Sample {
    values: Vec<f64>,
}

impl Sample {
    /// Builds a sample, silently dropping NaN and infinite values.
    ///
    /// # Examples
    ///
    /// ```
    /// use distlens_stats::sample::Sample;
    ///
    /// let sample = Sample::from_values([1.0, f64::NAN, 2.0, f64::INFINITY]);
    /// assert_eq!(sample.as_slice(), &[1.0, 2.0]);
    /// ```
    #[must_use]
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        Self {
            values: values.into_iter().filter(|v| v.is_finite()).collect(),
        }
    }

    /// Builds a sample from raw cells, keeping those that parse as finite numbers.
    #[must_use]
    pub fn from_cells<'a, I>(cells: I) -> Self
    where
        I: IntoIterator<Item = &'a CellValue>,
    {
        Self {
            values: cells.into_iter().filter_map(CellValue::to_number).collect(),
        }
    }

    pub(crate) fn push(&mut self, value: f64) {
        debug_assert!(value.is_finite());
        self.values.push(value);
    }

    /// The values in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Consumes the sample, returning its values in insertion order.
    #[must_use]
    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }

    /// Returns the values sorted in ascending order.
    #[must_use]
    pub fn sorted(&self) -> Vec<f64> {
        let mut sorted = self.values.clone();
        sorted.sort_by(f64::total_cmp);
        sorted
    }
}

impl Deref for Sample {
    type Target = [f64];

    fn deref(&self) -> &Self::Target {
        &self.values
    }
}

impl AsRef<[f64]> for Sample {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

impl FromIterator<f64> for Sample {
    fn from_iter<T: IntoIterator<Item = f64>>(iter: T) -> Self {
        Self::from_values(iter)
    }
}
