/// Data layer: core types, loading, filtering, and chart projections.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → PovertyDataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ PovertyDataset │  Vec<Record>, facet indices, read-only
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply selection predicates → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  project  │  derive line / bar / table views
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod project;
