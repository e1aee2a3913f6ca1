// =============================================================================
// HTML Report Renderer
// =============================================================================
//
// Single self-contained page (inline CSS, no scripts) suitable for static
// hosting:
//   header  →  stat cards (oversold / neutral / overbought)  →  result table
// An empty report swaps the cards and table for a "No data available" block.
// All data-derived text is HTML-escaped.
// =============================================================================

use std::fmt::Write;

use crate::classifier::{OVERBOUGHT_THRESHOLD, OVERSOLD_THRESHOLD};
use crate::report::Report;
use crate::types::AssetResult;

const POSITIVE_COLOR: &str = "#28a745";
const NEGATIVE_COLOR: &str = "#dc3545";

const STYLE: &str = r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            max-width: 1200px;
            margin: 0 auto;
            padding: 20px;
            background-color: #f5f5f5;
        }
        .header, .stat-card, .empty {
            background: white;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }
        .header { text-align: center; margin-bottom: 30px; padding: 20px; }
        .stats {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
            gap: 20px;
            margin-bottom: 30px;
        }
        .stat-card { padding: 20px; text-align: center; }
        .stat-number { font-size: 2em; font-weight: bold; margin-bottom: 5px; }
        .oversold { color: #28a745; }
        .overbought { color: #dc3545; }
        .neutral { color: #6c757d; }
        table {
            width: 100%;
            border-collapse: collapse;
            background: white;
            border-radius: 8px;
            overflow: hidden;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }
        th, td { padding: 12px; text-align: left; border-bottom: 1px solid #ddd; }
        th { background-color: #f8f9fa; font-weight: 600; }
        tr:hover { background-color: #f8f9fa; }
        .rsi-cell { font-weight: bold; }
        .category-badge {
            padding: 4px 8px;
            border-radius: 4px;
            font-size: 0.85em;
            font-weight: bold;
            color: white;
        }
        .badge-oversold { background-color: #28a745; }
        .badge-overbought { background-color: #dc3545; }
        .badge-neutral { background-color: #6c757d; }
        .empty { text-align: center; padding: 40px; }
        .updated { text-align: center; margin-top: 20px; color: #6c757d; font-size: 0.9em; }
"#;

/// Render the full page.
pub fn render_html(report: &Report) -> String {
    let mut out = String::with_capacity(8 * 1024 + report.results.len() * 512);

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("    <meta charset=\"UTF-8\">\n");
    out.push_str("    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    out.push_str("    <title>Crypto RSI Screener</title>\n");
    let _ = write!(out, "    <style>{STYLE}    </style>\n</head>\n<body>\n");

    out.push_str("    <div class=\"header\">\n");
    out.push_str("        <h1>Crypto RSI Screener</h1>\n");
    out.push_str(
        "        <p>Relative Strength Index analysis for the top cryptocurrencies by market cap</p>\n",
    );
    out.push_str("    </div>\n");

    if report.is_empty() {
        out.push_str("    <div class=\"empty\">\n");
        out.push_str("        <h3>No data available</h3>\n");
        out.push_str("        <p>Unable to fetch cryptocurrency data at this time.</p>\n");
        out.push_str("    </div>\n");
    } else {
        render_stats(&mut out, report);
        render_table(&mut out, &report.results, &report.currency);
    }

    let _ = write!(
        out,
        "    <div class=\"updated\">\n        <p>Last updated: {}</p>\n        \
         <p>Data source: <a href=\"https://www.coingecko.com/\" target=\"_blank\">CoinGecko API</a></p>\n    \
         </div>\n</body>\n</html>\n",
        escape_html(&report.timestamp())
    );

    out
}

fn render_stats(out: &mut String, report: &Report) {
    let cards = [
        ("oversold", report.stats.oversold, format!("Oversold (RSI &le; {OVERSOLD_THRESHOLD})")),
        (
            "neutral",
            report.stats.neutral,
            format!("Neutral ({OVERSOLD_THRESHOLD} &lt; RSI &lt; {OVERBOUGHT_THRESHOLD})"),
        ),
        ("overbought", report.stats.overbought, format!("Overbought (RSI &ge; {OVERBOUGHT_THRESHOLD})")),
    ];

    out.push_str("    <div class=\"stats\">\n");
    for (class, count, caption) in cards {
        let _ = write!(
            out,
            "        <div class=\"stat-card\">\n            \
             <div class=\"stat-number {class}\">{count}</div>\n            \
             <div>{caption}</div>\n        </div>\n"
        );
    }
    out.push_str("    </div>\n");
}

fn render_table(out: &mut String, results: &[AssetResult], currency: &str) {
    out.push_str("    <table>\n        <thead>\n            <tr>\n");
    let price_heading = format!("Price ({})", escape_html(&currency.to_uppercase()));
    for heading in ["Rank", "Symbol", "Name", price_heading.as_str(), "24h Change", "7d Change", "RSI", "Category"] {
        let _ = writeln!(out, "                <th>{heading}</th>");
    }
    out.push_str("            </tr>\n        </thead>\n        <tbody>\n");

    for r in results {
        let class = r.classification.css_class();
        let rank = r
            .market_cap_rank
            .map_or_else(|| "-".to_string(), |n| format!("#{n}"));

        out.push_str("            <tr>\n");
        let _ = writeln!(out, "                <td>{rank}</td>");
        let _ = writeln!(out, "                <td><strong>{}</strong></td>", escape_html(&r.symbol));
        let _ = writeln!(out, "                <td>{}</td>", escape_html(&r.name));
        let _ = writeln!(out, "                <td>{}</td>", format_price(r.current_price, currency));
        let _ = writeln!(
            out,
            "                <td style=\"{}\">{:+.2}%</td>",
            change_style(r.price_change_24h_pct),
            r.price_change_24h_pct
        );
        let _ = writeln!(
            out,
            "                <td style=\"{}\">{:+.2}%</td>",
            change_style(r.price_change_7d_pct),
            r.price_change_7d_pct
        );
        let _ = writeln!(out, "                <td class=\"rsi-cell {class}\">{:.2}</td>", r.rsi);
        let _ = writeln!(
            out,
            "                <td><span class=\"category-badge badge-{class}\">{}</span></td>",
            r.classification
        );
        out.push_str("            </tr>\n");
    }

    out.push_str("        </tbody>\n    </table>\n");
}

/// Inline colour for a signed percentage change; flat values are uncoloured.
fn change_style(pct: f64) -> String {
    if pct > 0.0 {
        format!("color: {POSITIVE_COLOR};")
    } else if pct < 0.0 {
        format!("color: {NEGATIVE_COLOR};")
    } else {
        String::new()
    }
}

/// Four-decimal price; dollar-prefixed for USD, currency-suffixed otherwise.
fn format_price(value: f64, currency: &str) -> String {
    let amount = format_thousands(value, 4);
    if currency.eq_ignore_ascii_case("usd") {
        format!("${amount}")
    } else {
        format!("{amount} {}", escape_html(&currency.to_uppercase()))
    }
}

/// Fixed-point formatting with `,` grouping in the integer part.
pub fn format_thousands(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 1);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Minimal escaping for text nodes and double-quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classification;
    use crate::report::test_support::{asset, fixed_time, sample_report};

    #[test]
    fn renders_stats_and_rows() {
        let html = render_html(&sample_report());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<div class=\"stat-number oversold\">2</div>"));
        assert!(html.contains("<div class=\"stat-number neutral\">1</div>"));
        assert!(html.contains("<div class=\"stat-number overbought\">2</div>"));
        assert_eq!(html.matches("<tr>").count(), 6); // header + 5 rows
        assert!(html.contains("<td>#7</td>"));
        assert!(html.contains("<td>$1,234.5000</td>"));
        assert!(html.contains("<td class=\"rsi-cell overbought\">88.80</td>"));
        assert!(html.contains("badge-oversold\">Oversold</span>"));
        assert!(html.contains("Last updated: 2026-10-19 08:30:00 UTC"));
        assert!(!html.contains("No data available"));
    }

    #[test]
    fn rows_follow_result_order() {
        let html = render_html(&sample_report());
        let a = html.find("<strong>AAA</strong>").unwrap();
        let e = html.find("<strong>EEE</strong>").unwrap();
        assert!(a < e);
    }

    #[test]
    fn price_column_follows_quote_currency() {
        let usd = render_html(&sample_report());
        assert!(usd.contains("<th>Price (USD)</th>"));

        let eur = render_html(&sample_report().with_currency("eur"));
        assert!(eur.contains("<th>Price (EUR)</th>"));
        assert!(eur.contains("<td>1,234.5000 EUR</td>"));
        assert!(!eur.contains("USD"));
        assert!(!eur.contains("<td>$"));
    }

    #[test]
    fn signed_changes_are_coloured() {
        let html = render_html(&sample_report());
        assert!(html.contains("<td style=\"color: #28a745;\">+2.50%</td>"));
        assert!(html.contains("<td style=\"color: #dc3545;\">-4.25%</td>"));
    }

    #[test]
    fn empty_report_renders_no_data_state() {
        let html = render_html(&Report::new(Vec::new(), fixed_time()));
        assert!(html.contains("No data available"));
        assert!(!html.contains("<table>"));
        assert!(html.contains("Last updated: 2026-10-19 08:30:00 UTC"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn unranked_and_hostile_names() {
        let mut a = asset("X<Y", 50.0, Classification::Neutral);
        a.name = "<script>alert('x')</script>".to_string();
        a.market_cap_rank = None;
        a.price_change_24h_pct = 0.0;
        let html = render_html(&Report::new(vec![a], fixed_time()));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(html.contains("<strong>X&lt;Y</strong>"));
        assert!(html.contains("<td>-</td>"));
        assert!(html.contains("<td style=\"\">+0.00%</td>"));
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(format_thousands(0.0, 4), "0.0000");
        assert_eq!(format_thousands(999.5, 2), "999.50");
        assert_eq!(format_thousands(1000.0, 0), "1,000");
        assert_eq!(format_thousands(64_123.456_78, 4), "64,123.4568");
        assert_eq!(format_thousands(1_234_567.0, 1), "1,234,567.0");
        assert_eq!(format_thousands(-12_345.6, 1), "-12,345.6");
        assert_eq!(format_thousands(-0.00001, 2), "0.00");
    }
}
