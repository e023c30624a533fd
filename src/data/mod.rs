/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///   yearly_deaths_by_clinic.csv
///        │
///        ▼
///   ┌──────────────┐
///   │ DatasetCache  │  memoized per path → Arc<Dataset>
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<YearlyClinicRecord>, clinic index, year bounds
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  clinic set + year interval → ordered subset
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
