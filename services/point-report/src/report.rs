//! Console report of an analysis run.

use serde::Serialize;
use std::path::{Path, PathBuf};

use era5_common::{GridShape, SeriesSummary};

use crate::pipeline::PointAnalysis;

#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub lat_index: usize,
    pub lon_index: usize,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimedValue {
    pub time: String,
    pub celsius: f64,
}

/// Everything printed at the end of a run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub input: PathBuf,
    pub variable: String,
    pub shape: GridShape,
    pub location: Location,
    pub title: String,
    pub summary: SeriesSummary,
    pub series: Vec<TimedValue>,
    pub chart: Option<PathBuf>,
}

impl AnalysisReport {
    pub fn new(input: &Path, variable: &str, analysis: &PointAnalysis, chart: Option<PathBuf>) -> Self {
        let series = analysis
            .labels
            .iter()
            .zip(analysis.series.values())
            .map(|(time, &celsius)| TimedValue {
                time: time.clone(),
                celsius,
            })
            .collect();

        Self {
            input: input.to_path_buf(),
            variable: variable.to_string(),
            shape: analysis.shape,
            location: Location {
                lat_index: analysis.series.lat_index(),
                lon_index: analysis.series.lon_index(),
                latitude: analysis.series.latitude(),
                longitude: analysis.series.longitude(),
            },
            title: analysis.title.clone(),
            summary: analysis.summary.clone(),
            series,
            chart,
        }
    }

    /// Plain-text report: axis sizes, then the hot count.
    pub fn to_text(&self) -> String {
        let v = &self.variable;
        let mut out = format!(
            "No. of timesteps of {v}\n{}\n\
             No. of latitude steps of {v}\n{}\n\
             No. of longitude steps of {v}\n{}\n\
             Number of hot 2 m temperatures (>= {} °C) during the day {}\n",
            self.shape.n_time,
            self.shape.n_lat,
            self.shape.n_lon,
            self.summary.threshold,
            self.summary.hot_count,
        );
        if let Some(path) = &self.chart {
            out.push_str(&format!("Chart written to {}\n", path.display()));
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::pipeline::analyze_grid;
    use era5_common::Grid;

    fn report() -> AnalysisReport {
        let grid = Grid::new(
            vec![1_685_145_600, 1_685_149_200],
            vec![47.75],
            vec![8.25],
            vec![295.0, 305.0],
        )
        .unwrap();
        let mut config = AnalysisConfig::default();
        config.location.lat_index = 0;
        config.location.lon_index = 0;
        let analysis = analyze_grid(&grid, Some("K"), &config).unwrap();
        AnalysisReport::new(Path::new("day.nc"), "t2m", &analysis, None)
    }

    #[test]
    fn test_text_report() {
        let text = report().to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "No. of timesteps of t2m");
        assert_eq!(lines[1], "2");
        assert_eq!(lines[3], "1");
        assert_eq!(lines[5], "1");
        assert_eq!(lines[6], "Number of hot 2 m temperatures (>= 30 °C) during the day 1");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_text_report_mentions_chart() {
        let mut report = report();
        report.chart = Some(PathBuf::from("t2m_point.png"));
        let text = report.to_text();
        assert_eq!(text.lines().last(), Some("Chart written to t2m_point.png"));
        assert_eq!(text.lines().count(), 8);
    }

    #[test]
    fn test_json_report() {
        let json: serde_json::Value = serde_json::from_str(&report().to_json().unwrap()).unwrap();
        assert_eq!(json["shape"]["n_time"], 2);
        assert_eq!(json["summary"]["hot_count"], 1);
        assert_eq!(json["series"][1]["time"], "01:00:00");
        assert_eq!(json["location"]["longitude"], 8.25);
        assert!(json["chart"].is_null());
    }
}
