//! Splitting raw rows into labelled groups.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    boxplot::BoxSummary,
    sample::{CellValue, Record, Sample},
};

/// Label of the single group produced when no category column is given.
pub const ALL_DATA_LABEL: &str = "All data";

/// Label used for rows whose category cell is blank.
pub const EMPTY_CATEGORY_LABEL: &str = "(empty)";

/// One category's values together with its box-plot summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub label: String,
    pub values: Sample,
    pub summary: BoxSummary,
}

impl GroupSummary {
    /// Builds a group from already filtered values.
    #[must_use]
    pub fn new(label: impl Into<String>, values: Sample, whisker_multiplier: f64) -> Self {
        let summary = BoxSummary::from_sorted(&values.sorted(), whisker_multiplier);
        Self {
            label: label.into(),
            values,
            summary,
        }
    }
}

/// Groups `rows` by `category_column` and summarizes `numeric_column` per group.
///
/// Rows whose numeric cell is missing or not a finite number are skipped
/// entirely, so they never create an empty group. Groups appear in the order
/// their category was first seen. Without a category column every row lands
/// in a single [`ALL_DATA_LABEL`] group.
///
/// # Arguments
///
/// * `rows` - Records to read cells from
/// * `numeric_column` - Column holding the values to summarize
/// * `category_column` - Column to group by; `None` or an empty name means no grouping
/// * `whisker_multiplier` - Fence distance in IQRs for each [`BoxSummary`]
///
/// # Returns
///
/// One [`GroupSummary`] per category that has at least one finite value.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
///
/// use distlens_stats::{grouping::group_numeric, sample::CellValue};
///
/// let rows = [("b", 1.0), ("a", 2.0), ("b", 3.0)]
///     .into_iter()
///     .map(|(g, v)| {
///         BTreeMap::from([
///             ("group".to_owned(), CellValue::from(g)),
///             ("value".to_owned(), CellValue::from(v)),
///         ])
///     })
///     .collect::<Vec<_>>();
///
/// let groups = group_numeric(&rows, "value", Some("group"), 1.5);
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].label, "b");
/// assert_eq!(groups[0].values.as_slice(), &[1.0, 3.0]);
/// assert_eq!(groups[1].label, "a");
/// ```
#[must_use]
pub fn group_numeric<R>(
    rows: &[R],
    numeric_column: &str,
    category_column: Option<&str>,
    whisker_multiplier: f64,
) -> Vec<GroupSummary>
where
    R: Record,
{
    let category_column = category_column.filter(|c| !c.is_empty());
    let mut buckets: Vec<(String, Sample)> = vec![];
    // label -> position in `buckets`, which keeps first-seen order
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut skipped = 0_usize;

    for row in rows {
        let Some(value) = row.cell(numeric_column).and_then(CellValue::to_number) else {
            skipped += 1;
            continue;
        };
        let key = category_key(row, category_column);
        let position = *index.entry(key).or_insert_with_key(|key| {
            buckets.push((key.clone(), Sample::default()));
            buckets.len() - 1
        });
        buckets[position].1.push(value);
    }

    if skipped > 0 {
        tracing::debug!(
            skipped,
            total = rows.len(),
            numeric_column,
            "skipped rows without a finite numeric value"
        );
    }

    buckets
        .into_iter()
        .map(|(label, values)| GroupSummary::new(label, values, whisker_multiplier))
        .collect()
}

fn category_key<R>(row: &R, category_column: Option<&str>) -> String
where
    R: Record,
{
    let Some(column) = category_column else {
        return ALL_DATA_LABEL.to_owned();
    };
    let label = row.cell(column).map(CellValue::to_label).unwrap_or_default();
    let trimmed = label.trim();
    if trimmed.is_empty() {
        EMPTY_CATEGORY_LABEL.to_owned()
    } else {
        trimmed.to_owned()
    }
}
