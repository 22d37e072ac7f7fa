/// Data layer: core types, loading, cleaning steps and plot summaries.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  store    │  current Dataset, replaced by every step
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐      ┌──────────┐
///   │ transform  │ ◄─── │ pipeline  │  fixed step order
///   └───────────┘      └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ summary   │  density curves, boxplot stats
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod pipeline;
pub mod stats;
pub mod store;
pub mod summary;
pub mod transform;
