//! Color tables used by the charts.

use serde_json::{json, Value};

/// Fixed bar colors for the volatility chart.
const VOLATILITY_COLORS: [(&str, &str); 10] = [
    ("ADANIENT", "#3E0703"),
    ("ADANIPORTS", "#116D6E"),
    ("BEL", "#910A67"),
    ("TRENT", "#FCDAB7"),
    ("ONGC", "#9467bd"),
    ("BPCL", "#8c564b"),
    ("SHRIRAMFIN", "#e377c2"),
    ("COALINDIA", "#7f7f7f"),
    ("HINDALCO", "#C30E59"),
    ("NTPC", "maroon"),
];

/// Plotly's default qualitative sequence.
pub const DEFAULT_QUALITATIVE: [&str; 10] = [
    "#636efa", "#EF553B", "#00cc96", "#ab63fa", "#FFA15A", "#19d3f3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

pub const SUNSET: [&str; 7] = [
    "rgb(243, 231, 155)",
    "rgb(250, 196, 132)",
    "rgb(248, 160, 126)",
    "rgb(235, 127, 134)",
    "rgb(206, 102, 147)",
    "rgb(160, 89, 160)",
    "rgb(92, 83, 165)",
];

/// Red for -1 through white to blue for +1.
pub const RDBU: [&str; 11] = [
    "rgb(103,0,31)",
    "rgb(178,24,43)",
    "rgb(214,96,77)",
    "rgb(244,165,130)",
    "rgb(253,219,199)",
    "rgb(247,247,247)",
    "rgb(209,229,240)",
    "rgb(146,197,222)",
    "rgb(67,147,195)",
    "rgb(33,102,172)",
    "rgb(5,48,97)",
];

pub fn volatility_color(ticker: &str) -> Option<&'static str> {
    VOLATILITY_COLORS
        .iter()
        .find(|(t, _)| *t == ticker)
        .map(|(_, c)| *c)
}

/// Assigns a color to each ticker: mapped tickers get their fixed color, the rest walk the
/// default sequence in order of appearance.
pub fn assign_colors<'a>(tickers: impl IntoIterator<Item = &'a str>) -> Vec<&'static str> {
    let mut next_default = 0;
    tickers
        .into_iter()
        .map(|t| {
            volatility_color(t).unwrap_or_else(|| {
                let c = DEFAULT_QUALITATIVE[next_default % DEFAULT_QUALITATIVE.len()];
                next_default += 1;
                c
            })
        })
        .collect()
}

/// Evenly spaced Plotly colorscale stops.
pub fn colorscale(colors: &[&str]) -> Value {
    let last = colors.len().saturating_sub(1).max(1) as f64;
    Value::Array(
        colors
            .iter()
            .enumerate()
            .map(|(i, c)| json!([i as f64 / last, c]))
            .collect(),
    )
}
