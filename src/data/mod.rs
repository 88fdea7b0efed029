/// Data layer: core types, loading, and summaries.
///
/// Architecture:
/// ```text
///  .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → raw cells per column
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  infer    │  dtype per column, header clean-up
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ DataFrame │  Vec<Column>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ summary   │  shape, dtypes, numeric columns
///   └──────────┘
/// ```

pub mod infer;
pub mod loader;
pub mod model;
pub mod sample;
pub mod summary;
