//! Data layer: core types, loading, and filtering.
//!
//! Architecture:
//! ```text
//!  .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → (UnitDataset, orientations)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌─────────────┐
//!   │ UnitDataset │  Vec<Unit>, layer index
//!   └─────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  apply FilterCriteria → derived UnitDataset
//!   └──────────┘
//! ```

pub mod loader;
pub mod model;
pub mod filter;
