use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// YearlyClinicRecord – one row of the CSV
// ---------------------------------------------------------------------------

/// Births and deaths for one clinic in one calendar year.
///
/// `None` is the missing-value marker: the cell was empty or not a number.
/// It is never the same thing as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyClinicRecord {
    pub year: i64,
    pub clinic: String,
    pub birth: Option<f64>,
    pub deaths: Option<f64>,
}

impl YearlyClinicRecord {
    pub fn new(year: i64, clinic: &str, birth: Option<f64>, deaths: Option<f64>) -> Self {
        Self {
            year,
            clinic: clinic.to_string(),
            birth,
            deaths,
        }
    }
}

/// Display wrapper for a nullable numeric cell.
pub struct Cell(pub Option<f64>);

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            // Counts are whole numbers; print them without a trailing ".0".
            Some(v) if v.fract() == 0.0 => write!(f, "{v:.0}"),
            Some(v) => write!(f, "{v}"),
            None => write!(f, "N/A"),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The loaded table with pre-computed indices. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// All records, in file order.
    pub records: Vec<YearlyClinicRecord>,
    /// Sorted unique clinic labels.
    pub clinics: BTreeSet<String>,
    /// Smallest and largest year, `None` when there are no records.
    pub year_bounds: Option<(i64, i64)>,
}

impl Dataset {
    /// Build indices from the loaded records.
    pub fn from_records(records: Vec<YearlyClinicRecord>) -> Self {
        let clinics = records.iter().map(|r| r.clinic.clone()).collect();
        let year_bounds = records.iter().fold(None, |acc, r| match acc {
            None => Some((r.year, r.year)),
            Some((lo, hi)) => Some((lo.min(r.year), hi.max(r.year))),
        });

        Dataset {
            records,
            clinics,
            year_bounds,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_are_built_from_records() {
        let ds = Dataset::from_records(vec![
            YearlyClinicRecord::new(1846, "clinic 2", Some(3754.0), Some(105.0)),
            YearlyClinicRecord::new(1841, "clinic 1", Some(3036.0), Some(237.0)),
            YearlyClinicRecord::new(1849, "clinic 1", None, Some(103.0)),
        ]);

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.year_bounds, Some((1841, 1849)));
        assert_eq!(
            ds.clinics.iter().cloned().collect::<Vec<_>>(),
            vec!["clinic 1".to_string(), "clinic 2".to_string()]
        );
        // File order is kept.
        assert_eq!(ds.records[0].year, 1846);
    }

    #[test]
    fn test_empty_dataset_has_no_bounds() {
        let ds = Dataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.year_bounds, None);
        assert!(ds.clinics.is_empty());
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell(Some(459.0)).to_string(), "459");
        assert_eq!(Cell(Some(12.5)).to_string(), "12.5");
        assert_eq!(Cell(None).to_string(), "N/A");
    }
}
