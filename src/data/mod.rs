/// Data layer: table model, loading, and export.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (schema fixed here)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Column>, aligned rows
///   └──────────┘
///        │   (outlier::clean)
///        ▼
///   ┌──────────┐
///   │  export   │  cleaned Dataset → .csv
///   └──────────┘
/// ```

pub mod export;
pub mod loader;
pub mod model;
