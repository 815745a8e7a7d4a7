use std::collections::BTreeSet;

use super::model::{PovertyDataset, PppVersion, ReportingLevel, WelfareType};

// ---------------------------------------------------------------------------
// Selection – current values of the dashboard controls
// ---------------------------------------------------------------------------

/// The filter state as set by the control panel. Transient: rebuilt from the
/// widgets on every interaction, no identity beyond the current values.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub welfare_type: WelfareType,
    pub reporting_level: ReportingLevel,
    pub ppp_version: PppVersion,
    /// Name of the numeric column plotted on the y-axis. `None` renders
    /// nothing.
    pub indicator: Option<String>,
    /// Countries ticked in the checklist. Empty renders nothing, it does NOT
    /// mean "all countries".
    pub countries: BTreeSet<String>,
    /// Inclusive year bounds, min ≤ max.
    pub year_range: (i32, i32),
}

impl Selection {
    /// Default control values for a freshly loaded dataset, mirroring the
    /// dashboard's initial view: consumption / national / PPP 2017, the
    /// international poverty line if present, China pre-ticked, full year
    /// span.
    pub fn for_dataset(dataset: &PovertyDataset) -> Self {
        let preferred = "headcount_ratio_international_povline";
        let indicator = if dataset.has_indicator(preferred) {
            Some(preferred.to_string())
        } else {
            dataset.indicator_columns.first().cloned()
        };

        let mut countries = BTreeSet::new();
        if dataset.countries.iter().any(|c| c == "China") {
            countries.insert("China".to_string());
        }

        Selection {
            welfare_type: WelfareType::Consumption,
            reporting_level: ReportingLevel::National,
            ppp_version: PppVersion::Ppp2017,
            indicator,
            countries,
            year_range: (dataset.year_min, dataset.year_max),
        }
    }

    /// Clamp the year range into the dataset's observed bounds and restore
    /// min ≤ max after a slider drag.
    pub fn normalize_years(&mut self, dataset: &PovertyDataset) {
        let (mut lo, mut hi) = self.year_range;
        lo = lo.clamp(dataset.year_min, dataset.year_max);
        hi = hi.clamp(dataset.year_min, dataset.year_max);
        if lo > hi {
            std::mem::swap(&mut lo, &mut hi);
        }
        self.year_range = (lo, hi);
    }
}

// ---------------------------------------------------------------------------
// Filter engine
// ---------------------------------------------------------------------------

/// Return indices of records matching the selection, in dataset order.
///
/// Five conjunctive predicates over disjoint attributes: ppp version, welfare
/// type, reporting level, year within the inclusive range, country in the
/// ticked set. Short-circuit policy: an empty country set, or an indicator
/// that is unset or does not name a numeric column, yields an empty view
/// without evaluating predicates ("nothing selected, render nothing").
/// A selection that simply matches no rows is not an error.
pub fn filtered_indices(dataset: &PovertyDataset, selection: &Selection) -> Vec<usize> {
    if selection.countries.is_empty() {
        return Vec::new();
    }
    match &selection.indicator {
        Some(name) if dataset.has_indicator(name) => {}
        _ => return Vec::new(),
    }

    let (year_lo, year_hi) = selection.year_range;
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            rec.ppp_version == selection.ppp_version
                && rec.welfare_type == selection.welfare_type
                && rec.reporting_level == selection.reporting_level
                && (year_lo..=year_hi).contains(&rec.year)
                && selection.countries.contains(&rec.country)
        })
        .map(|(i, _)| i)
        .collect()
}
