//! Plotly figure descriptions for each section. The browser renders them with Plotly.js.

pub mod palette;

use crate::domain::metrics::VolatilityRow;
use crate::transform::correlation::CorrelationMatrix;
use crate::transform::cumulative::ReturnPivot;
use crate::transform::sector::SectorAverage;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Value>,
    pub layout: Value,
}

fn base_layout() -> Value {
    json!({
        "autosize": true,
        "margin": { "t": 40, "r": 20, "b": 60, "l": 60 },
    })
}

pub fn volatility_bar(rows: &[VolatilityRow]) -> Figure {
    let colors = palette::assign_colors(rows.iter().map(|r| r.ticker.as_str()));
    let data = rows
        .iter()
        .zip(colors)
        .map(|(r, color)| {
            json!({
                "type": "bar",
                "name": r.ticker,
                "legendgroup": r.ticker,
                "x": [r.ticker],
                "y": [r.std_dev_daily_return],
                "marker": { "color": color },
                "hovertemplate": "Ticker=%{x}<br>Volatility=%{y}<extra></extra>",
            })
        })
        .collect();

    let mut layout = base_layout();
    layout["xaxis"] = json!({ "title": { "text": "Ticker" }, "categoryorder": "trace" });
    layout["yaxis"] = json!({ "title": { "text": "Volatility" } });
    layout["legend"] = json!({ "title": { "text": "Ticker" } });
    layout["barmode"] = json!("relative");
    Figure { data, layout }
}

pub fn cumulative_lines(pivot: &ReturnPivot) -> Figure {
    let x: Vec<String> = pivot
        .dates
        .iter()
        .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
        .collect();
    let data = pivot
        .tickers
        .iter()
        .zip(&pivot.series)
        .map(|(ticker, ys)| {
            json!({
                "type": "scatter",
                "mode": "lines",
                "name": ticker,
                "x": x,
                "y": ys,
                "connectgaps": false,
            })
        })
        .collect();

    let mut layout = base_layout();
    layout["xaxis"] = json!({ "title": { "text": "date" }, "type": "date" });
    layout["yaxis"] = json!({ "title": { "text": "value" } });
    layout["legend"] = json!({ "title": { "text": "Ticker" } });
    Figure { data, layout }
}

pub fn sector_bar(sectors: &[SectorAverage]) -> Figure {
    let x: Vec<&str> = sectors.iter().map(|s| s.sector.as_str()).collect();
    let y: Vec<Option<f64>> = sectors.iter().map(|s| s.average_return).collect();
    let data = vec![json!({
        "type": "bar",
        "x": x,
        "y": y,
        "text": y,
        "textposition": "auto",
        "marker": {
            "color": y,
            "colorscale": palette::colorscale(&palette::SUNSET),
            "showscale": true,
            "colorbar": { "title": { "text": "Return" } },
        },
        "hovertemplate": "Sector=%{x}<br>Avg Yearly Return=%{y}<extra></extra>",
    })];

    let layout = json!({
        "title": { "text": "Average Yearly Return by Sector", "font": { "size": 24 } },
        "height": 600,
        "xaxis": {
            "title": { "text": "Sector", "font": { "size": 18 } },
            "tickangle": -45,
            "tickfont": { "size": 14 },
        },
        "yaxis": {
            "title": { "text": "Average Yearly Return", "font": { "size": 18 } },
            "tickfont": { "size": 14 },
            "gridcolor": "#EBF0F8",
        },
        "uniformtext": { "minsize": 10, "mode": "hide" },
        "paper_bgcolor": "white",
        "plot_bgcolor": "white",
    });
    Figure { data, layout }
}

pub fn correlation_heatmap(matrix: &CorrelationMatrix) -> Figure {
    let data = vec![json!({
        "type": "heatmap",
        "x": matrix.columns,
        "y": matrix.rows,
        "z": matrix.values,
        "zmin": -1.0,
        "zmax": 1.0,
        "colorscale": palette::colorscale(&palette::RDBU),
        "hovertemplate": "Ticker_2=%{x}<br>Ticker_1=%{y}<br>Correlation=%{z}<extra></extra>",
    })];

    let mut layout = base_layout();
    layout["xaxis"] = json!({ "title": { "text": "Ticker_2" }, "constrain": "domain" });
    layout["yaxis"] = json!({
        "title": { "text": "Ticker_1" },
        "autorange": "reversed",
        "scaleanchor": "x",
        "constrain": "domain",
    });
    Figure { data, layout }
}
