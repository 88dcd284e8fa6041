//! Color constants and auto-scaling helpers for the TUI.

use ratatui::style::Color;

/// Pool total line color.
pub const TOTAL_COLOR: Color = Color::DarkGray;
/// Pool available line color.
pub const AVAILABLE_COLOR: Color = Color::Cyan;
/// Headroom gauge color when high (>= 50%).
pub const HEADROOM_HIGH: Color = Color::Green;
/// Headroom gauge color when medium (>= 20%).
pub const HEADROOM_MID: Color = Color::Yellow;
/// Headroom gauge color when low (< 20%).
pub const HEADROOM_LOW: Color = Color::Red;
/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Household drawing from the pool.
pub const CONSUMING: Color = Color::Magenta;
/// Renewable list entries.
pub const RENEWABLE: Color = Color::Green;

/// Returns a color based on the fraction of capacity still available.
pub fn headroom_color(ratio: f64) -> Color {
    if ratio >= 0.5 {
        HEADROOM_HIGH
    } else if ratio >= 0.2 {
        HEADROOM_MID
    } else {
        HEADROOM_LOW
    }
}

/// Computes Y-axis bounds from chart data points.
///
/// The lower bound is pinned to zero since pool counters never go negative.
pub fn auto_bounds_y(series: &[&[(f64, f64)]]) -> [f64; 2] {
    let max = series
        .iter()
        .flat_map(|s| s.iter())
        .map(|&(_, y)| y)
        .fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return [0.0, 1.0];
    }
    [0.0, (max * 1.1).max(1.0)]
}
