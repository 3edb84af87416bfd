//! Terminal output for the CLI commands.

use analytics::{Comparison, HistogramBin, PriceSummary, RiskReport};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

/// `0.0523` -> `5.23%`
pub fn pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Two decimals, or `n/a` when the ratio is undefined.
pub fn ratio(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

/// Names the VaR level the way it is usually quoted: a 0.05 tail is "95%".
pub fn confidence_label(tail: f64) -> String {
    let level = (1.0 - tail) * 100.0;
    if (level - level.round()).abs() < 1e-9 {
        format!("{level:.0}%")
    } else {
        format!("{level:.1}%")
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn value_cell(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

pub fn risk_table(ticker: &str, report: &RiskReport) -> Table {
    let level = confidence_label(report.confidence_level);
    let (var_label, cvar_label) = (format!("VaR ({level})"), format!("CVaR ({level})"));
    let mut table = new_table(vec!["Metric", ticker]);
    let rows = [
        ("Annualized Return", pct(report.annualized_return)),
        ("Volatility", pct(report.volatility)),
        ("Sharpe Ratio", ratio(report.sharpe_ratio)),
        ("Max Drawdown", pct(report.max_drawdown)),
        (var_label.as_str(), pct(report.var)),
        (cvar_label.as_str(), pct(report.cvar)),
        ("Observations", report.observations.to_string()),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), value_cell(value)]);
    }
    table
}

/// Signed price move, e.g. `-2.15`.
fn change(value: f64) -> String {
    format!("{value:+.2}")
}

pub fn summary_table(ticker: &str, summary: &PriceSummary) -> Table {
    let mut table = new_table(vec!["Metric", ticker]);
    let volume = summary
        .last_volume
        .map_or_else(|| "n/a".to_string(), |v| format!("{v:.0}"));
    let rows = [
        ("Current Price", format!("{:.2}", summary.last_close)),
        ("Daily Change", change(summary.change)),
        ("Daily Change %", pct(summary.change_pct)),
        ("Volume", volume),
        ("Observations", summary.observations.to_string()),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), value_cell(value)]);
    }
    table
}

/// Longest bar drawn for the fullest bin.
const BAR_WIDTH: usize = 40;

pub fn histogram_table(histogram: &[HistogramBin]) -> Table {
    let mut table = new_table(vec!["Return Range", "Count", ""]);
    let fullest = histogram.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    for bin in histogram {
        let bar = "#".repeat(bin.count * BAR_WIDTH / fullest);
        table.add_row(vec![
            Cell::new(format!("{} to {}", pct(bin.lower), pct(bin.upper))),
            value_cell(bin.count.to_string()),
            Cell::new(bar),
        ]);
    }
    table
}

pub fn comparison_table(comparison: &Comparison) -> Table {
    let mut table = new_table(vec![
        "Ticker",
        "Total Return",
        "Annualized Return",
        "Volatility",
        "Sharpe Ratio",
        "Max Drawdown",
    ]);
    for row in &comparison.rows {
        let total = row.cumulative_returns.last().map_or(0.0, |o| o.value);
        table.add_row(vec![
            Cell::new(&row.ticker),
            value_cell(pct(total)),
            value_cell(pct(row.summary.annualized_return)),
            value_cell(pct(row.summary.volatility)),
            value_cell(ratio(row.summary.sharpe_ratio)),
            value_cell(pct(row.summary.max_drawdown)),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> RiskReport {
        RiskReport {
            annualized_return: 0.1234,
            volatility: 0.2,
            sharpe_ratio: None,
            max_drawdown: -0.0512,
            var: -0.021,
            cvar: -0.03,
            confidence_level: 0.05,
            observations: 250,
        }
    }

    #[test]
    fn test_formatting_helpers() {
        assert_eq!(pct(0.0523), "5.23%");
        assert_eq!(pct(-0.25), "-25.00%");
        assert_eq!(ratio(Some(1.234)), "1.23");
        assert_eq!(ratio(None), "n/a");
        assert_eq!(confidence_label(0.05), "95%");
        assert_eq!(confidence_label(0.025), "97.5%");
    }

    #[test]
    fn test_summary_table_shows_signed_change() {
        let summary = PriceSummary {
            last_close: 98.0,
            previous_close: 100.0,
            change: -2.0,
            change_pct: -0.02,
            last_volume: Some(1_234_567.0),
            observations: 3,
        };
        let rendered = summary_table("AAPL", &summary).to_string();
        for needle in ["98.00", "-2.00", "-2.00%", "1234567"] {
            assert!(rendered.contains(needle), "missing {needle} in\n{rendered}");
        }
    }

    #[test]
    fn test_histogram_bars_scale_to_fullest_bin() {
        let histogram = [
            HistogramBin { lower: -0.02, upper: 0.0, count: 1 },
            HistogramBin { lower: 0.0, upper: 0.02, count: 4 },
        ];
        let rendered = histogram_table(&histogram).to_string();
        assert!(rendered.contains("-2.00% to 0.00%"));
        assert!(rendered.contains(&"#".repeat(BAR_WIDTH)));
        assert!(!rendered.contains(&"#".repeat(BAR_WIDTH + 1)));
    }

    #[test]
    fn test_risk_table_lists_every_metric() {
        let rendered = risk_table("AAPL", &report()).to_string();
        for needle in ["AAPL", "12.34%", "n/a", "-5.12%", "VaR (95%)", "CVaR (95%)", "250"] {
            assert!(rendered.contains(needle), "missing {needle} in\n{rendered}");
        }
    }
}
