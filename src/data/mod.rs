/// Data layer: core types, loading, cleaning, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize │  "$1,234" / "95%" → numbers, once, before sharing
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐      ┌───────────┐
///   │  filter  │  →   │ aggregate │  counts, top-K, extents
///   └──────────┘      └───────────┘
///   predicates → View (row indices)
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
