use crate::data::model::YearlyClinicRecord;

/// Year hand-washing was introduced in Clinic 1.
pub const HANDWASH_YEAR: i64 = 1847;

// ---------------------------------------------------------------------------
// Before/after threshold metrics
// ---------------------------------------------------------------------------

/// Mean deaths before and from the threshold year, plus the relative change.
///
/// `None` means the value is undefined (empty group, or a zero baseline for
/// the percent change). It is displayed as "N/A", never as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdMetrics {
    pub threshold: i64,
    pub pre: Option<f64>,
    pub post: Option<f64>,
    pub pct_change: Option<f64>,
}

impl ThresholdMetrics {
    pub fn compute(subset: &[YearlyClinicRecord], threshold: i64) -> Self {
        let pre = mean_deaths(subset.iter().filter(|r| r.year < threshold));
        let post = mean_deaths(subset.iter().filter(|r| r.year >= threshold));

        let pct_change = match (pre, post) {
            (Some(pre), Some(post)) if pre != 0.0 => Some((post - pre) / pre * 100.0),
            _ => None,
        };

        Self {
            threshold,
            pre,
            post,
            pct_change,
        }
    }

    pub fn pre_label(&self) -> String {
        format!("Avg deaths (before {})", self.threshold)
    }

    pub fn post_label(&self) -> String {
        format!("Avg deaths (from {})", self.threshold)
    }

    pub fn pre_text(&self) -> String {
        format_value(self.pre)
    }

    pub fn post_text(&self) -> String {
        format_value(self.post)
    }

    /// Signed percent delta, only when the change is defined.
    pub fn delta_text(&self) -> Option<String> {
        self.pct_change.map(|pct| format!("{pct:+.1}%"))
    }
}

/// Mean of the present `deaths` values; missing cells are skipped.
fn mean_deaths<'a>(records: impl Iterator<Item = &'a YearlyClinicRecord>) -> Option<f64> {
    let (sum, n) = records
        .filter_map(|r| r.deaths)
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// One decimal, or "N/A" for an undefined value.
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}"),
        None => "N/A".to_string(),
    }
}
