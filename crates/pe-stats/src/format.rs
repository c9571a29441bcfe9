//! Number formatting for reports

/// Fixed number of decimals
pub fn format_number(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

/// A 0-1 ratio rendered as a percentage
pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{:.decimals$}%", value * 100.0)
}

/// Abbreviate with K, M or B suffixes
pub fn format_large_number(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if magnitude >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if magnitude >= 1e3 {
        format!("{:.1}K", value / 1e3)
    } else {
        format!("{value:.0}")
    }
}

/// Statistic cell for tables; absent values render as `N/A`
pub fn format_optional(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format_number(v, decimals))
}
