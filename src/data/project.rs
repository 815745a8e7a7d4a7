use super::filter::{Selection, filtered_indices};
use super::loader::REQUIRED_COLUMNS;
use super::model::PovertyDataset;

// ---------------------------------------------------------------------------
// Chart-ready projections of a filtered view
// ---------------------------------------------------------------------------

/// One country's `(year, value)` points, in dataset order.
#[derive(Debug, Clone, PartialEq)]
pub struct CountrySeries {
    pub country: String,
    /// `[year, indicator value]` pairs, ready for plotting.
    pub points: Vec<[f64; 2]>,
}

/// Everything the chart and table widgets render, derived together from one
/// filtered snapshot so they can never reflect two different selections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projections {
    /// Line chart: one connected series per country.
    pub line: Vec<CountrySeries>,
    /// Bar chart: the same `(year, country, value)` relation, rendered as
    /// grouped bars instead of connected lines.
    pub bar: Vec<CountrySeries>,
    /// Table header, required columns first then indicator columns.
    pub columns: Vec<String>,
    /// Table body: one cell row per filtered record, verbatim, no
    /// aggregation. Cells are strings so the grid can edit them in place.
    pub rows: Vec<Vec<String>>,
}

impl Projections {
    pub fn is_empty(&self) -> bool {
        self.line.is_empty() && self.bar.is_empty() && self.rows.is_empty()
    }
}

/// Filter the dataset and derive all three projections in one pass.
///
/// Pure and stateless: the same `(dataset, selection)` pair always produces
/// the same projections, recomputed in full on every call.
pub fn compute_views(dataset: &PovertyDataset, selection: &Selection) -> Projections {
    let visible = filtered_indices(dataset, selection);

    let mut columns: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
    columns.extend(dataset.indicator_columns.iter().cloned());

    if visible.is_empty() {
        return Projections {
            columns,
            ..Projections::default()
        };
    }

    // The filter engine already guaranteed the indicator names a real column.
    let indicator = selection
        .indicator
        .as_deref()
        .unwrap_or_default()
        .to_string();

    // Group (year, value) points per country, countries ordered by first
    // appearance in the view.
    let mut series: Vec<CountrySeries> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(visible.len());

    for &idx in &visible {
        let rec = &dataset.records[idx];

        if let Some(value) = rec.indicator(&indicator) {
            let pos = match series.iter().position(|s| s.country == rec.country) {
                Some(pos) => pos,
                None => {
                    series.push(CountrySeries {
                        country: rec.country.clone(),
                        points: Vec::new(),
                    });
                    series.len() - 1
                }
            };
            series[pos].points.push([rec.year as f64, value]);
        }

        let mut cells = Vec::with_capacity(columns.len());
        cells.push(rec.country.clone());
        cells.push(rec.year.to_string());
        cells.push(rec.welfare_type.to_string());
        cells.push(rec.reporting_level.to_string());
        cells.push(rec.ppp_version.to_string());
        for col in &dataset.indicator_columns {
            cells.push(match rec.indicator(col) {
                Some(v) => v.to_string(),
                None => String::new(),
            });
        }
        rows.push(cells);
    }

    Projections {
        bar: series.clone(),
        line: series,
        columns,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{PppVersion, Record, ReportingLevel, WelfareType};
    use std::collections::{BTreeMap, BTreeSet};

    const HC: &str = "headcount_ratio_international_povline";

    fn record(country: &str, year: i32, value: Option<f64>) -> Record {
        let mut indicators = BTreeMap::new();
        if let Some(v) = value {
            indicators.insert(HC.to_string(), v);
        }
        Record {
            country: country.to_string(),
            year,
            welfare_type: WelfareType::Consumption,
            reporting_level: ReportingLevel::National,
            ppp_version: PppVersion::Ppp2017,
            indicators,
        }
    }

    fn sample_dataset() -> PovertyDataset {
        PovertyDataset::from_records(
            vec![
                record("China", 2015, Some(9.8)),
                record("India", 2015, Some(24.8)),
                record("China", 2016, Some(7.2)),
                record("India", 2016, Some(22.5)),
                record("China", 2017, Some(5.4)),
            ],
            vec![HC.to_string()],
        )
    }

    fn selection(countries: &[&str], years: (i32, i32)) -> Selection {
        Selection {
            welfare_type: WelfareType::Consumption,
            reporting_level: ReportingLevel::National,
            ppp_version: PppVersion::Ppp2017,
            indicator: Some(HC.to_string()),
            countries: countries.iter().map(|c| c.to_string()).collect(),
            year_range: years,
        }
    }

    #[test]
    fn single_country_line_series() {
        let ds = sample_dataset();
        let views = compute_views(&ds, &selection(&["China"], (2015, 2020)));

        assert_eq!(views.line.len(), 1);
        let series = &views.line[0];
        assert_eq!(series.country, "China");
        assert_eq!(
            series.points,
            vec![[2015.0, 9.8], [2016.0, 7.2], [2017.0, 5.4]]
        );
    }

    #[test]
    fn line_bar_and_rows_agree_on_countries() {
        let ds = sample_dataset();
        let views = compute_views(&ds, &selection(&["China", "India"], (2015, 2017)));

        let line_countries: BTreeSet<&str> =
            views.line.iter().map(|s| s.country.as_str()).collect();
        let bar_countries: BTreeSet<&str> =
            views.bar.iter().map(|s| s.country.as_str()).collect();
        let row_countries: BTreeSet<&str> =
            views.rows.iter().map(|r| r[0].as_str()).collect();

        assert_eq!(line_countries, bar_countries);
        assert_eq!(line_countries, row_countries);
        assert_eq!(line_countries, BTreeSet::from(["China", "India"]));
    }

    #[test]
    fn bar_is_the_same_relation_as_line() {
        let ds = sample_dataset();
        let views = compute_views(&ds, &selection(&["China", "India"], (2015, 2017)));
        assert_eq!(views.line, views.bar);
    }

    #[test]
    fn empty_country_set_empties_all_three_projections() {
        let ds = sample_dataset();
        let views = compute_views(&ds, &selection(&[], (1900, 2100)));
        assert!(views.line.is_empty());
        assert!(views.bar.is_empty());
        assert!(views.rows.is_empty());
        assert!(views.is_empty());
    }

    #[test]
    fn rows_are_verbatim_and_in_dataset_order() {
        let ds = sample_dataset();
        let views = compute_views(&ds, &selection(&["China", "India"], (2015, 2016)));

        assert_eq!(views.rows.len(), 4);
        assert_eq!(views.columns[0], "country");
        assert_eq!(*views.columns.last().unwrap(), HC.to_string());
        // Source order: China 2015, India 2015, China 2016, India 2016
        assert_eq!(views.rows[0][0], "China");
        assert_eq!(views.rows[1][0], "India");
        assert_eq!(views.rows[1][1], "2015");
        assert_eq!(views.rows[3][0], "India");
        assert_eq!(views.rows[3][5], "22.5");
    }

    #[test]
    fn missing_indicator_value_skips_point_but_keeps_row() {
        let mut ds = sample_dataset();
        ds.records.push(record("China", 2018, None));
        let ds = PovertyDataset::from_records(ds.records, ds.indicator_columns);

        let views = compute_views(&ds, &selection(&["China"], (2015, 2020)));
        let china = &views.line[0];
        assert!(china.points.iter().all(|p| p[0] != 2018.0));
        assert_eq!(views.rows.len(), 4);
        assert_eq!(views.rows[3][5], "");
    }

    #[test]
    fn recompute_is_deterministic() {
        let ds = sample_dataset();
        let sel = selection(&["China", "India"], (2015, 2017));
        assert_eq!(compute_views(&ds, &sel), compute_views(&ds, &sel));
    }
}
