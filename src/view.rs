use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::chart::{bar_chart, line_chart, scatter_chart, ChartSpec};
use crate::data::filter::{filter_records, FilterCriteria};
use crate::data::model::{Cell, Dataset, YearlyClinicRecord};
use crate::metrics::ThresholdMetrics;

pub const TABLE_COLUMNS: [&str; 4] = ["Year", "Clinic", "Birth", "Deaths"];

// ---------------------------------------------------------------------------
// Table view
// ---------------------------------------------------------------------------

/// The filtered rows as shown in the data table, re-indexed from zero.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub rows: Vec<YearlyClinicRecord>,
}

impl TableView {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Display text for one row: index followed by the four columns.
    pub fn row_cells(&self, index: usize) -> Option<[String; 5]> {
        let r = self.rows.get(index)?;
        Some([
            index.to_string(),
            r.year.to_string(),
            r.clinic.clone(),
            Cell(r.birth).to_string(),
            Cell(r.deaths).to_string(),
        ])
    }
}

// ---------------------------------------------------------------------------
// Everything derived from one interaction
// ---------------------------------------------------------------------------

/// Output of one pass of the pipeline. Rebuilt from scratch on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub table: TableView,
    pub metrics: ThresholdMetrics,
    pub line: ChartSpec,
    pub bar: ChartSpec,
    pub scatter: ChartSpec,
}

impl DashboardView {
    /// Filter once, then derive the table, metrics and charts from that subset.
    pub fn build(dataset: &Dataset, criteria: &FilterCriteria, threshold: i64) -> Self {
        let subset = filter_records(dataset, criteria);
        log::debug!(
            "{} of {} records match {:?}",
            subset.len(),
            dataset.len(),
            criteria
        );

        Self {
            metrics: ThresholdMetrics::compute(&subset, threshold),
            line: line_chart(&subset, threshold),
            bar: bar_chart(&subset),
            scatter: scatter_chart(&subset),
            table: TableView { rows: subset },
        }
    }

    /// Write the three chart specifications as `<name>.vl.json` files.
    pub fn export_specs(&self, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
        let charts = [
            ("line_chart", &self.line),
            ("bar_chart", &self.bar),
            ("scatter_chart", &self.scatter),
        ];

        let mut written = Vec::with_capacity(charts.len());
        for (name, spec) in charts {
            let path = dir.join(format!("{name}.vl.json"));
            let json = spec
                .to_json()
                .with_context(|| format!("serializing {name}"))?;
            std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
            written.push(path);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::HANDWASH_YEAR;

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            YearlyClinicRecord::new(1841, "C1", Some(254.0), Some(7.0)),
            YearlyClinicRecord::new(1841, "C2", Some(2442.0), Some(86.0)),
            YearlyClinicRecord::new(1846, "C1", Some(4010.0), Some(459.0)),
            YearlyClinicRecord::new(1847, "C1", Some(3754.0), Some(105.0)),
            YearlyClinicRecord::new(1848, "C1", Some(3073.0), None),
            YearlyClinicRecord::new(1848, "C1", Some(3073.0), Some(47.0)),
        ])
    }

    #[test]
    fn test_table_and_metrics_share_one_subset() {
        let ds = dataset();
        let criteria = FilterCriteria {
            clinics: ["C1".to_string()].into_iter().collect(),
            years: (1841, 1848),
        };

        let view = DashboardView::build(&ds, &criteria, HANDWASH_YEAR);
        assert_eq!(view.table.len(), 5);
        assert!(view.table.rows.iter().all(|r| r.clinic == "C1"));
        assert_eq!(view.metrics.pre, Some(233.0));
        assert_eq!(view.metrics.post, Some(76.0));
        assert_eq!(
            view.line.units()[0].data.as_ref().unwrap().values.len(),
            view.table.len()
        );
    }

    #[test]
    fn test_rebuilding_is_idempotent() {
        let ds = dataset();
        let criteria = FilterCriteria::all(&ds);
        assert_eq!(
            DashboardView::build(&ds, &criteria, HANDWASH_YEAR),
            DashboardView::build(&ds, &criteria, HANDWASH_YEAR)
        );
    }

    #[test]
    fn test_row_cells_reindex_and_mark_missing() {
        let ds = dataset();
        let criteria = FilterCriteria {
            clinics: ["C1".to_string()].into_iter().collect(),
            years: (1848, 1848),
        };
        let view = DashboardView::build(&ds, &criteria, HANDWASH_YEAR);

        let cells = view.table.row_cells(0).unwrap();
        assert_eq!(cells, ["0", "1848", "C1", "3073", "N/A"].map(String::from));
        assert!(view.table.row_cells(2).is_none());
    }

    #[test]
    fn test_export_writes_three_files_and_reports_bad_dir() {
        let ds = dataset();
        let view = DashboardView::build(&ds, &FilterCriteria::all(&ds), HANDWASH_YEAR);
        let dir = tempfile::tempdir().unwrap();

        let written = view.export_specs(dir.path()).unwrap();
        assert_eq!(written.len(), 3);
        assert!(view.export_specs(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_empty_selection_renders_na() {
        let ds = dataset();
        let criteria = FilterCriteria {
            clinics: Default::default(),
            years: (1841, 1848),
        };
        let view = DashboardView::build(&ds, &criteria, HANDWASH_YEAR);
        assert!(view.table.is_empty());
        assert_eq!(view.metrics.pre_text(), "N/A");
        assert_eq!(view.metrics.post_text(), "N/A");
        assert_eq!(view.metrics.delta_text(), None);
    }
}
