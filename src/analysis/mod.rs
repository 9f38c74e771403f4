//! Analysis module - group summaries, curve matrices and modulation labels

pub mod classify;
pub mod matrix;
pub mod summary;

pub use classify::{classify, classify_dataset, pearson, Label, DEFAULT_FLANK_DEG};
pub use matrix::{build_matrix, CurveKind, Matrix};
pub use summary::{
    summarize, ColumnAggregates, GroupBy, GroupRow, GroupValues, GroupedSummary, SummaryStat,
};
