//! Seven-day tax exposure series

use chrono::{Days, Local, NaiveDate};
use rand::Rng;

pub const SERIES_DAYS: u64 = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

/// Cosmetic baseline generated once per dashboard session.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalSeries {
    points: Vec<SeriesPoint>,
}

impl HistoricalSeries {
    /// Builds the trailing seven days ending at `today`, oldest first, with
    /// values uniform in [5000, 20000).
    pub fn generate<R: Rng>(today: NaiveDate, rng: &mut R) -> Self {
        let points = (0..SERIES_DAYS)
            .rev()
            .map(|offset| {
                let date = today.checked_sub_days(Days::new(offset)).unwrap_or(today);
                SeriesPoint {
                    label: date.format("%b %-d").to_string(),
                    value: rng.gen_range(5000.0..20000.0),
                }
            })
            .collect();
        Self { points }
    }

    pub fn generate_now() -> Self {
        Self::generate(Local::now().date_naive(), &mut rand::thread_rng())
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }
}

/// Daily exposure projected onto the series labels.
///
/// Points are only re-drawn when the volume or the current rate changes, so
/// repeated renders with the same inputs show the same chart.
#[derive(Debug, Clone, Default)]
pub struct ExposureChart {
    key: Option<(u64, u64)>,
    points: Vec<SeriesPoint>,
}

impl ExposureChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points_for<R: Rng>(
        &mut self,
        series: &HistoricalSeries,
        volume: f64,
        current_rate: f64,
        rng: &mut R,
    ) -> &[SeriesPoint] {
        let key = (volume.to_bits(), current_rate.to_bits());
        if self.key != Some(key) || self.points.len() != series.points().len() {
            self.points = project(series, volume, current_rate, rng);
            self.key = Some(key);
        }
        &self.points
    }
}

/// `volume / 30 * rate / 100`, perturbed by up to ±10%.
pub fn project<R: Rng>(
    series: &HistoricalSeries,
    volume: f64,
    current_rate: f64,
    rng: &mut R,
) -> Vec<SeriesPoint> {
    let daily = (volume / 30.0) * (current_rate / 100.0);
    series
        .points()
        .iter()
        .map(|p| SeriesPoint {
            label: p.label.clone(),
            value: daily * (1.0 + rng.gen_range(-0.1..0.1)),
        })
        .collect()
}
