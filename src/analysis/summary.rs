//! Group Summary Module
//! Aggregates the per-unit control metrics by a grouping column.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Median, Statistics};

use crate::data::model::{FieldValue, Unit, UnitDataset};
use crate::error::{Result, TuningError};

/// Aggregate applied per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStat {
    #[default]
    Mean,
    Median,
    Count,
}

impl SummaryStat {
    pub const ALL: [SummaryStat; 3] = [SummaryStat::Mean, SummaryStat::Median, SummaryStat::Count];

    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryStat::Mean => "mean",
            SummaryStat::Median => "median",
            SummaryStat::Count => "count",
        }
    }
}

impl fmt::Display for SummaryStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryStat {
    type Err = TuningError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mean" => Ok(SummaryStat::Mean),
            "median" => Ok(SummaryStat::Median),
            "count" => Ok(SummaryStat::Count),
            other => Err(TuningError::InvalidOption {
                option: "stat",
                value: other.to_string(),
                expected: "'mean' | 'median' | 'count'",
            }),
        }
    }
}

/// Column whose value defines the groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    Layer,
    Group,
    Id,
    /// Any other column, fixed or extra.
    Column(String),
}

impl GroupBy {
    pub fn column(&self) -> &str {
        match self {
            GroupBy::Layer => "layer",
            GroupBy::Group => "group",
            GroupBy::Id => "id",
            GroupBy::Column(name) => name,
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for GroupBy {
    type Err = TuningError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" => Err(TuningError::InvalidOption {
                option: "group_by",
                value: s.to_string(),
                expected: "a column name",
            }),
            "layer" => Ok(GroupBy::Layer),
            "group" => Ok(GroupBy::Group),
            "id" => Ok(GroupBy::Id),
            other => Ok(GroupBy::Column(other.to_string())),
        }
    }
}

/// Per-column aggregates of one group; `None` when the column was null for
/// every unit of the group.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColumnAggregates {
    pub osi_control: Option<f64>,
    pub hbw_control: Option<f64>,
    pub mean_control: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GroupValues {
    Aggregates(ColumnAggregates),
    Count(usize),
}

/// One output row: a distinct grouping value and its result.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRow {
    pub key: FieldValue,
    pub values: GroupValues,
}

/// Result of [`summarize`], one row per distinct key in ascending key order
/// with the null key last.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedSummary {
    pub group_by: GroupBy,
    pub stat: SummaryStat,
    pub rows: Vec<GroupRow>,
}

impl GroupedSummary {
    /// Look up the result for a grouping value.
    pub fn get(&self, key: &FieldValue) -> Option<&GroupValues> {
        self.rows.iter().find(|r| &r.key == key).map(|r| &r.values)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Group `dataset` by `group_by` and reduce each group with `stat`.
///
/// A null grouping value forms its own group.  `Mean` and `Median` reduce
/// `osi_control`, `hbw_control` and `mean_control` independently, skipping
/// nulls; `Count` reports group sizes.
pub fn summarize(
    dataset: &UnitDataset,
    group_by: &GroupBy,
    stat: SummaryStat,
) -> Result<GroupedSummary> {
    let column = group_by.column();
    if !dataset.has_column(column) {
        return Err(TuningError::InvalidOption {
            option: "group_by",
            value: column.to_string(),
            expected: "a column of the dataset",
        });
    }

    let mut groups: BTreeMap<FieldValue, Vec<&Unit>> = BTreeMap::new();
    for unit in &dataset.units {
        groups.entry(unit.field(column)).or_default().push(unit);
    }

    let rows: Vec<GroupRow> = groups
        .into_iter()
        .map(|(key, units)| {
            let values = match stat {
                SummaryStat::Count => GroupValues::Count(units.len()),
                SummaryStat::Mean | SummaryStat::Median => {
                    GroupValues::Aggregates(ColumnAggregates {
                        osi_control: aggregate(units.iter().map(|u| Some(u.osi_control)), stat),
                        hbw_control: aggregate(units.iter().map(|u| u.hbw_control), stat),
                        mean_control: aggregate(units.iter().map(|u| Some(u.mean_control)), stat),
                    })
                }
            };
            GroupRow { key, values }
        })
        .collect();

    log::debug!(
        "Summarized {} units into {} groups by '{column}' ({stat})",
        dataset.len(),
        rows.len()
    );
    Ok(GroupedSummary {
        group_by: group_by.clone(),
        stat,
        rows,
    })
}

fn aggregate(values: impl Iterator<Item = Option<f64>>, stat: SummaryStat) -> Option<f64> {
    let present: Vec<f64> = values.flatten().collect();
    if present.is_empty() {
        return None;
    }
    match stat {
        SummaryStat::Mean => Some(present.iter().mean()),
        SummaryStat::Median => Some(Data::new(present).median()),
        SummaryStat::Count => Some(present.len() as f64),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::data::model::unit;

    fn aggregates(values: &GroupValues) -> ColumnAggregates {
        match values {
            GroupValues::Aggregates(a) => *a,
            other => panic!("expected aggregates, got {other:?}"),
        }
    }

    #[test]
    fn mean_of_two_units() {
        let ds = UnitDataset::from_units(vec![
            unit(1, "SG", Some("MUL"), 0.2, Some(20.0)),
            unit(2, "SG", Some("MUL"), 0.8, Some(40.0)),
        ]);
        let summary = summarize(&ds, &GroupBy::Layer, SummaryStat::Mean).unwrap();
        assert_eq!(summary.len(), 1);

        let agg = aggregates(summary.get(&FieldValue::String("SG".into())).unwrap());
        assert_relative_eq!(agg.osi_control.unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(agg.hbw_control.unwrap(), 30.0, epsilon = 1e-12);
        assert_relative_eq!(agg.mean_control.unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn median_skips_nulls_and_all_null_is_none() {
        let ds = UnitDataset::from_units(vec![
            unit(1, "G", None, 0.1, Some(10.0)),
            unit(2, "G", None, 0.3, None),
            unit(3, "G", None, 0.9, Some(50.0)),
            unit(4, "SG", None, 0.4, None),
        ]);
        let summary = summarize(&ds, &GroupBy::Layer, SummaryStat::Median).unwrap();

        let g = aggregates(summary.get(&FieldValue::String("G".into())).unwrap());
        assert_relative_eq!(g.osi_control.unwrap(), 0.3, epsilon = 1e-12);
        assert_relative_eq!(g.hbw_control.unwrap(), 30.0, epsilon = 1e-12);

        let sg = aggregates(summary.get(&FieldValue::String("SG".into())).unwrap());
        assert_eq!(sg.hbw_control, None);
        assert_relative_eq!(sg.osi_control.unwrap(), 0.4, epsilon = 1e-12);
    }

    #[test]
    fn null_key_forms_its_own_group_last() {
        let ds = UnitDataset::from_units(vec![
            unit(1, "SG", None, 0.1, None),
            unit(2, "SG", Some("MXH"), 0.2, None),
            unit(3, "G", Some("MUL"), 0.3, None),
            unit(4, "G", None, 0.4, None),
        ]);
        let summary = summarize(&ds, &GroupBy::Group, SummaryStat::Count).unwrap();
        let keys: Vec<String> = summary.rows.iter().map(|r| r.key.to_string()).collect();
        assert_eq!(keys, vec!["MUL", "MXH", "<null>"]);
        assert_eq!(summary.get(&FieldValue::Null), Some(&GroupValues::Count(2)));
    }

    #[test]
    fn counts_sum_to_row_count() {
        let ds = UnitDataset::from_units(
            (0..17)
                .map(|i| unit(i, ["SG", "G", "IG"][i as usize % 3], None, 0.5, None))
                .collect(),
        );
        let summary = summarize(&ds, &GroupBy::Layer, SummaryStat::Count).unwrap();
        let total: usize = summary
            .rows
            .iter()
            .map(|r| match r.values {
                GroupValues::Count(n) => n,
                _ => 0,
            })
            .sum();
        assert_eq!(total, ds.len());
    }

    #[test]
    fn groups_by_extra_column() {
        let mut a = unit(1, "SG", None, 0.2, None);
        a.extra.insert("animal".into(), FieldValue::String("m1".into()));
        let b = unit(2, "SG", None, 0.6, None);
        let ds = UnitDataset::from_units(vec![a, b]);

        let by: GroupBy = "animal".parse().unwrap();
        let summary = summarize(&ds, &by, SummaryStat::Count).unwrap();
        assert_eq!(
            summary.get(&FieldValue::String("m1".into())),
            Some(&GroupValues::Count(1))
        );
        assert_eq!(summary.get(&FieldValue::Null), Some(&GroupValues::Count(1)));
    }

    #[test]
    fn nan_key_is_found_again() {
        let mut a = unit(1, "SG", None, 0.2, None);
        a.extra.insert("gain".into(), FieldValue::Float(f64::NAN));
        let mut b = unit(2, "SG", None, 0.6, None);
        b.extra.insert("gain".into(), FieldValue::Float(f64::NAN));
        let ds = UnitDataset::from_units(vec![a, b]);

        let summary = summarize(&ds, &GroupBy::Column("gain".into()), SummaryStat::Count).unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(
            summary.get(&FieldValue::Float(f64::NAN)),
            Some(&GroupValues::Count(2))
        );
    }

    #[test]
    fn unknown_stat_and_column_are_rejected() {
        let err = "mode".parse::<SummaryStat>().unwrap_err();
        assert!(matches!(err, TuningError::InvalidOption { option: "stat", .. }));

        let ds = UnitDataset::from_units(vec![unit(1, "SG", None, 0.2, None)]);
        let err = summarize(&ds, &GroupBy::Column("colour".into()), SummaryStat::Mean).unwrap_err();
        assert!(matches!(err, TuningError::InvalidOption { option: "group_by", .. }));
    }

    #[test]
    fn empty_dataset_gives_empty_summary() {
        let ds = UnitDataset::default();
        let summary = summarize(&ds, &GroupBy::Layer, SummaryStat::Mean).unwrap();
        assert!(summary.is_empty());
    }
}
