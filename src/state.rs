use std::collections::BTreeSet;
use std::path::Path;

use crate::color::CountryColors;
use crate::data::filter::Selection;
use crate::data::loader;
use crate::data::model::{PovertyDataset, PppVersion, ReportingLevel, WelfareType};
use crate::data::project::{Projections, compute_views};
use crate::theme::Theme;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which of the three result views the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewTab {
    #[default]
    LineChart,
    BarChart,
    Table,
}

impl ViewTab {
    pub const ALL: [ViewTab; 3] = [ViewTab::LineChart, ViewTab::BarChart, ViewTab::Table];

    pub fn label(&self) -> &'static str {
        match self {
            ViewTab::LineChart => "Line Chart",
            ViewTab::BarChart => "Bar Chart",
            ViewTab::Table => "Table",
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded). Read-only once set.
    pub dataset: Option<PovertyDataset>,

    /// Current values of the controls.
    pub selection: Selection,

    /// Projections for the current selection (cached between interactions).
    pub views: Projections,

    /// Stable per-country chart colours.
    pub country_colors: CountryColors,

    /// Active cosmetic theme.
    pub theme: Theme,

    /// Tab shown in the central panel.
    pub active_tab: ViewTab,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            selection: Selection {
                welfare_type: WelfareType::Consumption,
                reporting_level: ReportingLevel::National,
                ppp_version: PppVersion::Ppp2017,
                indicator: None,
                countries: BTreeSet::new(),
                year_range: (0, 0),
            },
            views: Projections::default(),
            country_colors: CountryColors::default(),
            theme: Theme::default(),
            active_tab: ViewTab::default(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset: reset the controls to their default
    /// values, rebuild country colours, compute the initial views.
    pub fn set_dataset(&mut self, dataset: PovertyDataset) {
        self.selection = Selection::for_dataset(&dataset);
        self.country_colors = CountryColors::new(&dataset.countries);
        self.views = compute_views(&dataset, &self.selection);
        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Recompute all three views after a control change. One synchronous
    /// pass; the previous views are simply replaced.
    pub fn recompute(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selection.normalize_years(ds);
            self.views = compute_views(ds, &self.selection);
        }
    }

    /// Load a dataset file and ingest it, reporting failures in the status
    /// bar rather than tearing the session down.
    pub fn load_from_path(&mut self, path: &Path) {
        match loader::load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows, {} countries, years {}..={}",
                    dataset.len(),
                    dataset.countries.len(),
                    dataset.year_min,
                    dataset.year_max
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Toggle one country in the checklist.
    pub fn toggle_country(&mut self, country: &str) {
        if !self.selection.countries.remove(country) {
            self.selection.countries.insert(country.to_string());
        }
        self.recompute();
    }

    /// Tick every country.
    pub fn select_all_countries(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selection.countries = ds.countries.iter().cloned().collect();
        }
        self.recompute();
    }

    /// Untick every country (renders nothing, by policy).
    pub fn select_no_countries(&mut self) {
        self.selection.countries.clear();
        self.recompute();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;
    use std::collections::BTreeMap;

    const HC: &str = "headcount_ratio_international_povline";

    fn dataset() -> PovertyDataset {
        let record = |country: &str, year: i32| Record {
            country: country.to_string(),
            year,
            welfare_type: WelfareType::Consumption,
            reporting_level: ReportingLevel::National,
            ppp_version: PppVersion::Ppp2017,
            indicators: BTreeMap::from([(HC.to_string(), 10.0)]),
        };
        PovertyDataset::from_records(
            vec![record("China", 2010), record("India", 2015)],
            vec![HC.to_string()],
        )
    }

    #[test]
    fn set_dataset_applies_dashboard_defaults() {
        let mut state = AppState::default();
        state.set_dataset(dataset());

        assert_eq!(state.selection.welfare_type, WelfareType::Consumption);
        assert_eq!(state.selection.reporting_level, ReportingLevel::National);
        assert_eq!(state.selection.ppp_version, PppVersion::Ppp2017);
        assert_eq!(state.selection.indicator.as_deref(), Some(HC));
        assert!(state.selection.countries.contains("China"));
        assert_eq!(state.selection.year_range, (2010, 2015));
        // Initial views are already computed: China's single row is visible.
        assert_eq!(state.views.rows.len(), 1);
    }

    #[test]
    fn toggling_countries_recomputes_views() {
        let mut state = AppState::default();
        state.set_dataset(dataset());

        state.toggle_country("India");
        assert_eq!(state.views.rows.len(), 2);

        state.select_no_countries();
        assert!(state.views.is_empty());

        state.select_all_countries();
        assert_eq!(state.views.rows.len(), 2);
    }

    #[test]
    fn load_failure_sets_status_and_keeps_session() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.load_from_path(Path::new("does-not-exist.csv"));

        assert!(state.status_message.is_some());
        assert!(state.dataset.is_some());
    }
}
