/// Data layer: loading, cleaning and the immutable listings table.
///
/// Architecture:
/// ```text
///  .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Frame (all input columns checked)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ currency  │  derive exchange rate, convert non-local prices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  prune    │  drop geocoordinates and USD duplicates
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ outlier   │  IQR filter, one column after another
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ CleanTable │  typed listings, read-only for the session
///   └────────────┘
/// ```

pub mod currency;
pub mod error;
pub mod loader;
pub mod model;
pub mod outlier;
pub mod pipeline;
pub mod prune;
pub mod schema;
pub mod table;
