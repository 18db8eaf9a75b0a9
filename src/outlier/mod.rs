//! Outlier detection and treatment.
//!
//! ```text
//!  column values ──► classify (Z-score | IQR | percentiles) ──► mask + bounds
//!                                                                   │
//!                              treat (trim | cap) ◄─────────────────┘
//!                                   │
//!  clean: applies the above to each selected column of a working Dataset
//! ```

pub mod classify;
pub mod clean;
pub mod error;
pub mod stats;
pub mod summary;
pub mod treat;

pub use classify::MethodConfig;
pub use clean::{CleaningConfig, CleaningReport, ColumnOutcome, ColumnReport, TrimOrder, clean};
pub use summary::Summary;
pub use treat::HandlingMode;
