use super::ui;
use crate::core::format::{format_grouped, format_percent};
use crate::core::{Country, Structure};
use comfy_table::{Cell, CellAlignment};

/// Lists the country tax table and the structure multipliers.
pub fn run() {
    println!("{}", render());
}

pub fn render() -> String {
    let mut countries = ui::new_styled_table();
    countries.set_header(vec![
        ui::header_cell("Country"),
        ui::header_cell("Currency"),
        ui::header_cell("Per USDC"),
        ui::header_cell("VAT"),
        ui::header_cell("Withholding"),
        ui::header_cell("Capital Gains"),
        ui::header_cell("Digital Services"),
        ui::header_cell("Surcharge"),
        ui::header_cell("Combined"),
        ui::header_cell("Optimized"),
    ]);

    for country in Country::ALL {
        let p = country.profile();
        let pct = |v: f64| Cell::new(format_percent(v)).set_alignment(CellAlignment::Right);
        countries.add_row(vec![
            Cell::new(format!("{} {}", p.flag, country)),
            Cell::new(p.currency),
            Cell::new(format_grouped(p.exchange_rate, 3)).set_alignment(CellAlignment::Right),
            pct(p.vat),
            pct(p.withholding_tax),
            pct(p.capital_gains),
            pct(p.digital_services_tax),
            pct(p.surcharge),
            ui::rate_cell(format_percent(p.combined_rate())),
            ui::figure_cell(format_percent(p.optimized_rate), comfy_table::Color::Green),
        ]);
    }

    let mut structures = ui::new_styled_table();
    structures.set_header(vec![
        ui::header_cell("Structure"),
        ui::header_cell("Key"),
        ui::header_cell("Multiplier"),
    ]);
    for structure in Structure::ALL {
        structures.add_row(vec![
            Cell::new(structure.label()),
            Cell::new(structure.slug()),
            Cell::new(format!("{:.2}", structure.multiplier())).set_alignment(CellAlignment::Right),
        ]);
    }

    format!(
        "{}\n{}\n\n{}\n{}",
        ui::style_text("Country Tax Rates 2025", ui::StyleType::Heading),
        countries,
        ui::style_text("Business Structures", ui::StyleType::Heading),
        structures
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_every_country_and_structure() {
        let out = render();
        for country in Country::ALL {
            assert!(out.contains(country.name()), "missing {country}");
            assert!(out.contains(country.profile().currency));
        }
        for structure in Structure::ALL {
            assert!(out.contains(structure.slug()));
        }
        assert!(out.contains("33.5%"));
        assert!(out.contains("3,750"));
        assert!(out.contains("0.85"));
    }
}
