//! Number formatting for the dashboard

/// Formats with thousands separators and at most `max_decimals` fractional
/// digits, trailing zeros trimmed.
pub fn format_grouped(value: f64, max_decimals: usize) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }

    let rounded = round_half_away(value, max_decimals);
    let negative = rounded < 0.0;
    let text = format!("{:.*}", max_decimals, rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (text.as_str(), ""),
    };

    let mut out = String::with_capacity(text.len() + int_part.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// US dollars with no decimals, e.g. `$1,234` or `-$1,234`.
pub fn format_usd(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    let grouped = format_grouped(value, 0);
    match grouped.strip_prefix('-') {
        Some(rest) => format!("-${rest}"),
        None => format!("${grouped}"),
    }
}

/// Local currency amount with its ISO code, e.g. `552,750,000 NGN`.
pub fn format_local(value: f64, currency: &str) -> String {
    format!("{} {}", format_grouped(value, 0), currency)
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

fn round_half_away(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    // avoid "-0"
    if rounded == 0.0 { 0.0 } else { rounded }
}
