//! Current vs optimized effective tax comparison

use super::country::Country;
use super::structure::Structure;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalculationInput {
    /// Monthly stablecoin volume in USD-equivalent units.
    pub volume: f64,
    pub country: Country,
    pub structure: Structure,
}

impl CalculationInput {
    pub fn new(volume: f64, country: Country, structure: Structure) -> Self {
        Self {
            volume,
            country,
            structure,
        }
    }

    pub fn compute(&self) -> CalculationResult {
        compute(self.volume, self.country, self.structure)
    }
}

/// Monthly tax figures in USD, rates in percent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalculationResult {
    pub current_tax: f64,
    pub optimized_tax: f64,
    pub savings: f64,
    pub current_rate: f64,
    pub optimized_rate: f64,
}

impl CalculationResult {
    pub fn annual_savings(&self) -> f64 {
        self.savings * 12.0
    }

    /// Savings as a share of the current tax. `None` when there is no current tax.
    pub fn reduction_percent(&self) -> Option<f64> {
        if self.current_tax == 0.0 {
            None
        } else {
            Some(self.savings / self.current_tax * 100.0)
        }
    }
}

/// Parses a volume entered by the user. Anything unparsable, non-finite or
/// negative becomes 0.
pub fn parse_volume(input: &str) -> f64 {
    let cleaned: String = input
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

pub fn compute(volume: f64, country: Country, structure: Structure) -> CalculationResult {
    if volume.is_nan() || volume <= 0.0 {
        return CalculationResult::default();
    }

    let profile = country.profile();
    let current_rate = profile.combined_rate() * structure.multiplier();
    // The optimized path always assumes the same offshore + local entity setup.
    let optimized_rate = profile.optimized_rate;

    let current_tax = volume * (current_rate / 100.0);
    let optimized_tax = volume * (optimized_rate / 100.0);

    CalculationResult {
        current_tax,
        optimized_tax,
        savings: current_tax - optimized_tax,
        current_rate,
        optimized_rate,
    }
}
