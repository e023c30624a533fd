use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::filter::FilterCriteria;
use crate::data::loader::DatasetCache;
use crate::data::model::Dataset;
use crate::metrics::HANDWASH_YEAR;
use crate::view::DashboardView;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded datasets, keyed by path.
    pub cache: DatasetCache,

    /// Path of the dataset currently shown.
    pub data_path: PathBuf,

    /// Current dataset (None until a load succeeds).
    pub dataset: Option<Arc<Dataset>>,

    /// Sidebar selection.
    pub criteria: FilterCriteria,

    /// Table, metrics and charts for the current selection (cached until the
    /// selection changes).
    pub view: Option<DashboardView>,

    /// Clinic colours for the current dataset.
    pub color_map: Option<ColorMap>,

    /// Fatal load error. While set the dashboard is replaced by the message.
    pub fatal_error: Option<String>,

    /// Non-fatal status shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(data_path: PathBuf) -> Self {
        Self {
            cache: DatasetCache::new(),
            data_path,
            dataset: None,
            criteria: FilterCriteria {
                clinics: Default::default(),
                years: (0, 0),
            },
            view: None,
            color_map: None,
            fatal_error: None,
            status_message: None,
        }
    }

    /// Load (or fetch from cache) the dataset at `path` and reset the selection.
    pub fn load(&mut self, path: &Path) {
        self.data_path = path.to_path_buf();
        self.status_message = None;
        if self.cache.contains(path) {
            log::info!("Showing cached {}", path.display());
        }
        match self.cache.get_or_load(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                self.dataset = None;
                self.view = None;
                self.color_map = None;
                self.fatal_error = Some(e.to_string());
            }
        }
    }

    /// Drop the current path from the cache and read it again.
    pub fn reload(&mut self) {
        let path = self.data_path.clone();
        self.cache.invalidate(&path);
        self.load(&path);
    }

    /// Forget every cached dataset, then reload the current one.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        let path = self.data_path.clone();
        self.load(&path);
    }

    /// Ingest a loaded dataset, initialise the selection and colours.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.criteria = FilterCriteria::all(&dataset);
        self.color_map = Some(ColorMap::new(&dataset.clinics));
        self.dataset = Some(dataset);
        self.fatal_error = None;
        self.rebuild_view();
    }

    /// Recompute the view after a selection change.
    pub fn rebuild_view(&mut self) {
        self.view = self
            .dataset
            .as_deref()
            .map(|ds| DashboardView::build(ds, &self.criteria, HANDWASH_YEAR));
    }

    /// Write the current chart specifications as Vega-Lite JSON into `dir`.
    pub fn export_charts(&mut self, dir: &Path) {
        let Some(view) = &self.view else {
            return;
        };
        self.status_message = Some(match view.export_specs(dir) {
            Ok(paths) => {
                log::info!("Exported {} chart specs to {}", paths.len(), dir.display());
                format!("Exported {} chart specs", paths.len())
            }
            Err(e) => {
                log::error!("Chart export failed: {e:#}");
                format!("Error: {e:#}")
            }
        });
    }

    /// Toggle a single clinic in the selection.
    pub fn toggle_clinic(&mut self, clinic: &str) {
        if !self.criteria.clinics.remove(clinic) {
            self.criteria.clinics.insert(clinic.to_string());
        }
        self.rebuild_view();
    }

    pub fn select_all_clinics(&mut self) {
        if let Some(ds) = &self.dataset {
            self.criteria.clinics = ds.clinics.clone();
            self.rebuild_view();
        }
    }

    pub fn select_no_clinics(&mut self) {
        self.criteria.clinics.clear();
        self.rebuild_view();
    }

    /// Move the lower bound; the upper bound follows so the range never inverts.
    pub fn set_year_start(&mut self, year: i64) {
        let (_, hi) = self.criteria.years;
        self.criteria.years = (year, hi.max(year));
        self.rebuild_view();
    }

    /// Move the upper bound; the lower bound follows so the range never inverts.
    pub fn set_year_end(&mut self, year: i64) {
        let (lo, _) = self.criteria.years;
        self.criteria.years = (lo.min(year), year);
        self.rebuild_view();
    }
}
