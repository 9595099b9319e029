use super::ui;
use crate::core::format::{format_grouped, format_local, format_percent, format_usd};
use crate::core::series::{ExposureChart, HistoricalSeries};
use crate::core::{CalculationInput, CalculationResult, Country, LivePrice, Structure};
use comfy_table::{Cell, CellAlignment, Color};
use rand::SeedableRng;
use rand::rngs::StdRng;

const CHART_WIDTH: usize = 40;

/// Renders the tax leakage dashboard for the current inputs.
///
/// Rendering has no side effects beyond refreshing the cached exposure chart
/// when the volume or the current rate changed.
pub struct Dashboard {
    input: CalculationInput,
    series: HistoricalSeries,
    chart: ExposureChart,
    rng: StdRng,
}

impl Dashboard {
    pub fn new(input: CalculationInput) -> Self {
        Self::with_series(input, HistoricalSeries::generate_now(), StdRng::from_entropy())
    }

    pub fn with_series(input: CalculationInput, series: HistoricalSeries, rng: StdRng) -> Self {
        Self {
            input,
            series,
            chart: ExposureChart::new(),
            rng,
        }
    }

    pub fn input(&self) -> &CalculationInput {
        &self.input
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.input.volume = volume;
    }

    pub fn set_country(&mut self, country: Country) {
        self.input.country = country;
    }

    pub fn set_structure(&mut self, structure: Structure) {
        self.input.structure = structure;
    }

    pub fn result(&self) -> CalculationResult {
        self.input.compute()
    }

    pub fn render(&mut self, live: &LivePrice) -> String {
        let tax = self.result();
        let mut out = String::new();

        out.push_str(&format!(
            "{}\n{}\n\n",
            ui::style_text("Africa Crypto Tax Leakage Dashboard", ui::StyleType::Title),
            ui::style_text(
                "Real-time tax optimization for Web3 businesses in Africa",
                ui::StyleType::Subtle
            )
        ));

        out.push_str(&self.render_inputs());
        out.push_str("\n\n");
        out.push_str(&self.render_rates(live));
        out.push_str("\n\n");
        out.push_str(&self.render_breakdown());
        out.push_str("\n\n");

        if self.input.volume > 0.0 {
            out.push_str(&self.render_impact(&tax));
            out.push_str("\n\n");
            out.push_str(&self.render_chart(tax.current_rate));
            out.push_str("\n\n");

            if tax.savings > 0.0 {
                let headline = format!("Ready to save {}/year?", format_usd(tax.annual_savings()));
                out.push_str(&ui::style_text(&headline, ui::StyleType::Good));
                out.push_str(&format!(
                    "\nSwitch to an optimized structure and reduce your effective tax rate from {} to {}\n\n",
                    format_percent(tax.current_rate),
                    format_percent(tax.optimized_rate)
                ));
            }
        }

        out.push_str(&ui::style_text(
            "Tax rates are illustrative estimates based on 2025 regulations. Consult licensed tax professionals.",
            ui::StyleType::Warning,
        ));
        out.push('\n');
        out.push_str(&ui::style_text(
            "Live data via CoinGecko",
            ui::StyleType::Subtle,
        ));
        out.push('\n');
        out
    }

    fn render_inputs(&self) -> String {
        let profile = self.input.country.profile();
        let volume = if self.input.volume > 0.0 {
            format_usd(self.input.volume)
        } else {
            "not set".to_string()
        };

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Monthly Volume (USDC/USDT)"),
            ui::header_cell("Country"),
            ui::header_cell("Current Structure"),
        ]);
        table.add_row(vec![
            Cell::new(volume).set_alignment(CellAlignment::Right),
            Cell::new(format!("{} {}", profile.flag, self.input.country)),
            Cell::new(format!(
                "{} (x{:.2})",
                self.input.structure,
                self.input.structure.multiplier()
            )),
        ]);
        table.to_string()
    }

    fn render_rates(&self, live: &LivePrice) -> String {
        let profile = self.input.country.profile();
        let status = if live.loading {
            ui::style_text("● updating", ui::StyleType::Warning)
        } else {
            ui::style_text("● live", ui::StyleType::Good)
        };

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Live USDC Rate"),
            ui::header_cell(&format!("USDC → {}", profile.currency)),
        ]);
        table.add_row(vec![
            ui::figure_cell(format!("${:.4}", live.display_price()), Color::Green),
            ui::figure_cell(
                format!(
                    "{} {}",
                    format_grouped(profile.exchange_rate, 3),
                    profile.currency
                ),
                Color::Blue,
            ),
        ]);
        table.add_row(vec![
            Cell::new(format!(
                "{status} Last update: {}",
                live.updated_at.format("%H:%M:%S")
            )),
            Cell::new(format!(
                "1 USDC = {} {}",
                profile.exchange_rate, profile.currency
            )),
        ]);
        table.add_row(vec![
            Cell::new("Source: CoinGecko API").fg(Color::DarkGrey),
            Cell::new("Interbank rate (2025)").fg(Color::DarkGrey),
        ]);
        table.to_string()
    }

    fn render_breakdown(&self) -> String {
        let profile = self.input.country.profile();

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("VAT"),
            ui::header_cell("Withholding"),
            ui::header_cell("Capital Gains"),
            ui::header_cell("Digital Services"),
            ui::header_cell("Surcharge"),
        ]);
        table.add_row(vec![
            ui::rate_cell(format_percent(profile.vat)),
            ui::rate_cell(format_percent(profile.withholding_tax)),
            ui::rate_cell(format_percent(profile.capital_gains)),
            ui::rate_cell(format_percent(profile.digital_services_tax)),
            ui::rate_cell(format_percent(profile.surcharge)),
        ]);

        format!(
            "{}\n{}",
            ui::style_text(
                &format!("{} Tax Rates 2025", self.input.country),
                ui::StyleType::Heading
            ),
            table
        )
    }

    fn render_impact(&self, tax: &CalculationResult) -> String {
        let profile = self.input.country.profile();
        let local = |usd: f64| format_local(profile.to_local(usd), profile.currency);

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell(""),
            ui::header_cell("USD"),
            ui::header_cell(profile.currency),
            ui::header_cell("Rate"),
        ]);
        table.add_row(vec![
            Cell::new("Tax paid today (current structure)"),
            ui::figure_cell(format_usd(tax.current_tax), Color::Red),
            Cell::new(local(tax.current_tax)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{} effective", format_percent(tax.current_rate)))
                .set_alignment(CellAlignment::Right),
        ]);
        table.add_row(vec![
            Cell::new("Tax with optimized structure"),
            ui::figure_cell(format_usd(tax.optimized_tax), Color::Green),
            Cell::new(local(tax.optimized_tax)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{} effective", format_percent(tax.optimized_rate)))
                .set_alignment(CellAlignment::Right),
        ]);
        table.add_row(vec![
            Cell::new("Monthly savings"),
            ui::signed_cell(tax.savings, format_usd(tax.savings)),
            Cell::new(local(tax.savings)).set_alignment(CellAlignment::Right),
            tax.reduction_percent().map_or_else(ui::na_cell, |r| {
                Cell::new(format!("{} reduction", format_percent(r)))
                    .set_alignment(CellAlignment::Right)
            }),
        ]);
        table.add_row(vec![
            Cell::new("Annual savings"),
            ui::signed_cell(tax.annual_savings(), format_usd(tax.annual_savings())),
            Cell::new(local(tax.annual_savings())).set_alignment(CellAlignment::Right),
            Cell::new("12 months").set_alignment(CellAlignment::Right),
        ]);

        format!(
            "{}\n{}",
            ui::style_text("Tax Impact Analysis", ui::StyleType::Heading),
            table
        )
    }

    fn render_chart(&mut self, current_rate: f64) -> String {
        let points = self.chart.points_for(
            &self.series,
            self.input.volume,
            current_rate,
            &mut self.rng,
        );
        let max = points.iter().map(|p| p.value).fold(0.0, f64::max);

        let mut out = format!(
            "{}\n",
            ui::style_text("7-Day Tax Exposure Trend", ui::StyleType::Heading)
        );
        for p in points {
            out.push_str(&format!(
                "{:>6} │ {:<width$} {}\n",
                p.label,
                ui::bar(p.value, max, CHART_WIDTH),
                format_usd(p.value),
                width = CHART_WIDTH
            ));
        }
        out.push_str(&ui::style_text(
            "Based on daily pro-rata calculation of monthly volume",
            ui::StyleType::Subtle,
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dashboard(volume: f64, country: Country, structure: Structure) -> Dashboard {
        let mut rng = StdRng::seed_from_u64(3);
        let today = NaiveDate::from_ymd_opt(2025, 10, 16).unwrap();
        let series = HistoricalSeries::generate(today, &mut rng);
        Dashboard::with_series(CalculationInput::new(volume, country, structure), series, rng)
    }

    fn live(price: f64) -> LivePrice {
        LivePrice {
            price: Some(price),
            loading: false,
            ..LivePrice::new()
        }
    }

    #[test]
    fn test_render_with_volume_shows_impact_and_chart() {
        let mut d = dashboard(1_000_000.0, Country::Nigeria, Structure::DirectBank);
        let out = d.render(&live(1.0023));

        assert!(out.contains("$1.0023"));
        assert!(out.contains("1,650 NGN"));
        assert!(out.contains("Nigeria Tax Rates 2025"));
        assert!(out.contains("7.5%"));
        assert!(out.contains("$335,000"));
        assert!(out.contains("$25,000"));
        assert!(out.contains("$310,000"));
        assert!(out.contains("$3,720,000"));
        assert!(out.contains("33.5% effective"));
        assert!(out.contains("92.5% reduction"));
        assert!(out.contains("552,750,000 NGN"));
        assert!(out.contains("7-Day Tax Exposure Trend"));
        assert!(out.contains("Oct 10"));
        assert!(out.contains("Oct 16"));
        assert!(out.contains("Ready to save $3,720,000/year?"));
    }

    #[test]
    fn test_render_without_volume_hides_results() {
        let mut d = dashboard(0.0, Country::Kenya, Structure::FintechPartner);
        let out = d.render(&LivePrice::new());

        assert!(out.contains("not set"));
        assert!(out.contains("$1.0000"));
        assert!(out.contains("updating"));
        assert!(out.contains("Kenya Tax Rates 2025"));
        assert!(!out.contains("Tax Impact Analysis"));
        assert!(!out.contains("7-Day Tax Exposure Trend"));
        assert!(!out.contains("Ready to save"));
    }

    #[test]
    fn test_chart_stable_across_price_ticks() {
        let mut d = dashboard(500_000.0, Country::Ghana, Structure::CexRamp);
        let price = live(1.0);
        let first = d.render(&price);
        let second = d.render(&price);
        assert_eq!(first, second);
    }

    #[test]
    fn test_input_changes_recompute() {
        let mut d = dashboard(1_000_000.0, Country::Nigeria, Structure::DirectBank);
        d.set_structure(Structure::DefiOnRamp);
        assert!((d.result().current_tax - 201_000.0).abs() < 1e-6);

        d.set_country(Country::Mauritius);
        d.set_volume(100_000.0);
        let out = d.render(&live(1.0));
        assert!(out.contains("MUR"));
        assert!(out.contains("Mauritius Tax Rates 2025"));
        assert_eq!(d.input().country, Country::Mauritius);
    }
}
