use std::collections::BTreeSet;

use super::model::{Dataset, YearlyClinicRecord};

// ---------------------------------------------------------------------------
// Filter predicate: selected clinics and an inclusive year interval
// ---------------------------------------------------------------------------

/// What the user currently has selected in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub clinics: BTreeSet<String>,
    /// Inclusive `(min, max)`. An inverted interval matches nothing.
    pub years: (i64, i64),
}

impl FilterCriteria {
    /// Every clinic, full year range (i.e., show everything).
    pub fn all(dataset: &Dataset) -> Self {
        Self {
            clinics: dataset.clinics.clone(),
            years: dataset.year_bounds.unwrap_or((0, 0)),
        }
    }

    pub fn matches(&self, record: &YearlyClinicRecord) -> bool {
        let (lo, hi) = self.years;
        self.clinics.contains(&record.clinic) && (lo..=hi).contains(&record.year)
    }
}

/// Return indices of records passing both predicates, in dataset order.
pub fn filtered_indices(dataset: &Dataset, criteria: &FilterCriteria) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| criteria.matches(r))
        .map(|(i, _)| i)
        .collect()
}

/// Return the matching records themselves, in dataset order.
pub fn filter_records(dataset: &Dataset, criteria: &FilterCriteria) -> Vec<YearlyClinicRecord> {
    filtered_indices(dataset, criteria)
        .into_iter()
        .map(|i| dataset.records[i].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            YearlyClinicRecord::new(1841, "clinic 1", Some(3036.0), Some(237.0)),
            YearlyClinicRecord::new(1841, "clinic 2", Some(2442.0), Some(86.0)),
            YearlyClinicRecord::new(1846, "clinic 1", Some(4010.0), Some(459.0)),
            YearlyClinicRecord::new(1846, "clinic 2", Some(3754.0), Some(105.0)),
            YearlyClinicRecord::new(1848, "clinic 1", Some(3556.0), Some(45.0)),
            YearlyClinicRecord::new(1843, "clinic 1", None, None),
        ])
    }

    fn criteria(clinics: &[&str], years: (i64, i64)) -> FilterCriteria {
        FilterCriteria {
            clinics: clinics.iter().map(|c| c.to_string()).collect(),
            years,
        }
    }

    #[test]
    fn test_all_selects_everything() {
        let ds = sample();
        let all = FilterCriteria::all(&ds);
        assert_eq!(all.years, (1841, 1848));
        assert_eq!(filter_records(&ds, &all), ds.records);
    }

    #[test]
    fn test_both_predicates_apply_and_order_is_kept() {
        let ds = sample();
        let crit = criteria(&["clinic 1"], (1843, 1848));

        let idx = filtered_indices(&ds, &crit);
        assert_eq!(idx, vec![2, 4, 5]);

        for (i, r) in ds.records.iter().enumerate() {
            assert_eq!(idx.contains(&i), r.clinic == "clinic 1" && (1843..=1848).contains(&r.year));
        }

        let years: Vec<i64> = filter_records(&ds, &crit).iter().map(|r| r.year).collect();
        // Not re-sorted by year.
        assert_eq!(years, vec![1846, 1848, 1843]);
    }

    #[test]
    fn test_interval_is_inclusive() {
        let ds = sample();
        let idx = filtered_indices(&ds, &criteria(&["clinic 1", "clinic 2"], (1846, 1846)));
        assert_eq!(idx, vec![2, 3]);
    }

    #[test]
    fn test_empty_clinic_set_yields_empty_subset() {
        let ds = sample();
        assert!(filter_records(&ds, &criteria(&[], (1841, 1848))).is_empty());
    }

    #[test]
    fn test_empty_intersection_yields_empty_subset() {
        let ds = sample();
        assert!(filter_records(&ds, &criteria(&["clinic 3"], (1841, 1848))).is_empty());
        assert!(filter_records(&ds, &criteria(&["clinic 2"], (1847, 1849))).is_empty());
        assert!(filter_records(&ds, &criteria(&["clinic 1"], (1848, 1841))).is_empty());
    }
}
