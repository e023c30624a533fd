use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::model::{Dataset, YearlyClinicRecord};
use crate::error::{DashboardError, DashboardResult};

const YEAR: &str = "Year";
const CLINIC: &str = "Clinic";
const BIRTH: &str = "Birth";
const DEATHS: &str = "Deaths";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the yearly clinic table from a CSV file.
///
/// Expected layout: a header row naming `Year`, `Clinic`, `Birth` and
/// `Deaths` (case-sensitive, any order, extra columns ignored).
///
/// * `Year` must coerce to a number (fractions truncate), otherwise the file
///   is corrupt.
/// * `Clinic` is taken verbatim, surrounding whitespace included.
/// * `Birth` / `Deaths` that are empty or not numbers become `None`.
pub fn load_dataset(path: &Path) -> DashboardResult<Dataset> {
    let unavailable = |reason: String| DashboardError::data_unavailable(path, reason);

    let mut reader =
        csv::Reader::from_path(path).map_err(|e| unavailable(format!("opening CSV: {e}")))?;
    let headers = reader
        .headers()
        .map_err(|e| unavailable(format!("reading CSV headers: {e}")))?
        .clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| unavailable(format!("CSV missing '{name}' column")))
    };
    let year_idx = column(YEAR)?;
    let clinic_idx = column(CLINIC)?;
    let birth_idx = column(BIRTH)?;
    let deaths_idx = column(DEATHS)?;

    let mut records = Vec::new();
    let mut missing_cells = 0usize;

    for (row_no, result) in reader.records().enumerate() {
        // 1-based, counting the header.
        let line = row_no + 2;
        let record = result.map_err(|e| unavailable(format!("CSV line {line}: {e}")))?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let year = coerce_year(cell(year_idx)).ok_or_else(|| {
            unavailable(format!(
                "CSV line {line}: '{}' is not a year",
                cell(year_idx)
            ))
        })?;
        let birth = coerce_numeric(cell(birth_idx));
        let deaths = coerce_numeric(cell(deaths_idx));
        missing_cells += usize::from(birth.is_none()) + usize::from(deaths.is_none());

        records.push(YearlyClinicRecord::new(year, cell(clinic_idx), birth, deaths));
    }

    if missing_cells > 0 {
        log::warn!(
            "{}: {missing_cells} Birth/Deaths cells were empty or not numeric",
            path.display()
        );
    }

    Ok(Dataset::from_records(records))
}

/// Integer years; float text such as `1841.5` is truncated toward zero.
fn coerce_year(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Some(i);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.abs() < i64::MAX as f64 {
        Some(f.trunc() as i64)
    } else {
        None
    }
}

/// Numeric cell or the missing-value marker. Infinities count as missing.
fn coerce_numeric(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Load cache
// ---------------------------------------------------------------------------

/// Memoizes loaded datasets per path.
///
/// Entries live until [`DatasetCache::invalidate`] or [`DatasetCache::clear`];
/// there is no eviction. Failed loads are never stored.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `path`, loading it on first use.
    pub fn get_or_load(&mut self, path: &Path) -> DashboardResult<Arc<Dataset>> {
        if let Some(ds) = self.entries.get(path) {
            log::debug!("Cache hit for {}", path.display());
            return Ok(Arc::clone(ds));
        }

        let dataset = match load_dataset(path) {
            Ok(ds) => Arc::new(ds),
            Err(e) => {
                log::error!("{e}");
                return Err(e);
            }
        };
        log::info!(
            "Loaded {} records from {} (clinics: {:?})",
            dataset.len(),
            path.display(),
            dataset.clinics
        );

        self.entries.insert(path.to_path_buf(), Arc::clone(&dataset));
        log::debug!("{} datasets cached", self.len());
        Ok(dataset)
    }

    /// Drop the entry for one path so the next call re-reads it.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_loads_and_coerces_columns() {
        let file = write_csv(
            "Year,Birth,Deaths,Clinic\n\
             1841,3036,237,clinic 1\n\
             1842.0,,518,clinic 1\n\
             1843,3060,n/a,clinic 2\n",
        );

        let ds = load_dataset(file.path()).unwrap();
        assert_eq!(
            ds.records,
            vec![
                YearlyClinicRecord::new(1841, "clinic 1", Some(3036.0), Some(237.0)),
                YearlyClinicRecord::new(1842, "clinic 1", None, Some(518.0)),
                YearlyClinicRecord::new(1843, "clinic 2", Some(3060.0), None),
            ]
        );
        assert_eq!(ds.year_bounds, Some((1841, 1843)));
    }

    #[test]
    fn test_header_order_and_extra_columns_do_not_matter() {
        let file = write_csv("Note,Deaths,Clinic,Year,Birth\nx,7,C1,1841,254\n");
        let ds = load_dataset(file.path()).unwrap();
        assert_eq!(
            ds.records,
            vec![YearlyClinicRecord::new(1841, "C1", Some(254.0), Some(7.0))]
        );
    }

    #[test]
    fn test_missing_file_is_data_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dataset(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::DataUnavailable { .. }));
    }

    #[test]
    fn test_missing_column_is_data_unavailable() {
        // Header names are case-sensitive.
        let file = write_csv("year,Clinic,Birth,Deaths\n1841,C1,1,2\n");
        let err = load_dataset(file.path()).unwrap_err();
        assert!(err.to_string().contains("'Year'"));
    }

    #[test]
    fn test_unparseable_year_is_data_unavailable() {
        let file = write_csv("Year,Clinic,Birth,Deaths\n1841,C1,1,2\nabc,C1,1,2\n");
        let err = load_dataset(file.path()).unwrap_err();
        assert!(matches!(err, DashboardError::DataUnavailable { .. }));
    }

    #[test]
    fn test_fractional_year_truncates() {
        let file = write_csv("Year,Clinic,Birth,Deaths\n1841.5,C1,1,2\n-1.9,C1,1,2\n");
        let ds = load_dataset(file.path()).unwrap();
        assert_eq!(
            ds.records.iter().map(|r| r.year).collect::<Vec<_>>(),
            vec![1841, -1]
        );
    }

    #[test]
    fn test_empty_year_is_reported_by_line() {
        let file = write_csv("Year,Clinic,Birth,Deaths\n1841,C1,1,2\n,C1,1,2\n");
        let err = load_dataset(file.path()).unwrap_err();
        assert!(err.to_string().contains("CSV line 3"), "{err}");
    }

    #[test]
    fn test_clinic_labels_are_kept_verbatim() {
        let file = write_csv("Year,Clinic,Birth,Deaths\n1841,C1,1,2\n1841, C1,inf,2\n");
        let ds = load_dataset(file.path()).unwrap();
        assert_eq!(ds.records[1].clinic, " C1");
        assert_eq!(ds.records[1].birth, None);
        assert_eq!(ds.clinics.len(), 2);
    }

    #[test]
    fn test_ragged_row_is_data_unavailable() {
        let file = write_csv("Year,Clinic,Birth,Deaths\n1841,C1,1\n");
        assert!(load_dataset(file.path()).is_err());
    }

    #[test]
    fn test_cache_returns_identical_value_without_rereading() {
        let file = write_csv("Year,Clinic,Birth,Deaths\n1841,C1,254,7\n");
        let path = file.path().to_path_buf();
        let mut cache = DatasetCache::new();

        let first = cache.get_or_load(&path).unwrap();
        // Deleting the file proves the second call never touches the disk.
        drop(file);
        let second = cache.get_or_load(&path).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let mut file = write_csv("Year,Clinic,Birth,Deaths\n1841,C1,254,7\n");
        let path = file.path().to_path_buf();
        let mut cache = DatasetCache::new();

        let first = cache.get_or_load(&path).unwrap();
        file.write_all(b"1842,C1,300,9\n").unwrap();
        file.flush().unwrap();

        // Still the cached copy.
        assert_eq!(cache.get_or_load(&path).unwrap().len(), 1);

        assert!(cache.invalidate(&path));
        let reloaded = cache.get_or_load(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &reloaded));
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn test_failed_loads_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("later.csv");
        let mut cache = DatasetCache::new();

        assert!(cache.get_or_load(&path).is_err());
        assert!(cache.is_empty());

        std::fs::write(&path, "Year,Clinic,Birth,Deaths\n1841,C1,254,7\n").unwrap();
        assert_eq!(cache.get_or_load(&path).unwrap().len(), 1);
        assert!(cache.contains(&path));

        cache.clear();
        assert!(cache.is_empty());
    }
}
