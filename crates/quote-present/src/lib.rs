#![deny(warnings)]

//! Presentation of computed quotes: French currency formatting, chart series
//! with a fixed color palette, and the text table printed by the CLI.
//!
//! No domain logic lives here; everything is formatting and color
//! assignment over an already-computed breakdown.

use quote_core::Quote;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Chart colors, assigned round-robin by row index.
pub const PALETTE: [&str; 8] = [
    "#3b82f6", "#f59e0b", "#10b981", "#ef4444", "#8b5cf6", "#14b8a6", "#f97316", "#64748b",
];

/// User-facing disclaimer shown next to any IRR figure. The rate is an
/// approximation by construction and must never be presented as an exact
/// legal or financial calculation.
pub const IRR_CAVEAT: &str = "Taux annuel effectif approximatif, donné à titre indicatif ; \
     ne constitue pas un calcul financier ou juridique exact.";

/// Format an amount in euros under French conventions: space-grouped
/// thousands, decimal comma, two decimals. `12345.67` → `"12 345,67 €"`.
pub fn format_eur(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    let text = rounded.to_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let mut frac = frac_part.to_string();
    frac.truncate(2);
    while frac.len() < 2 {
        frac.push('0');
    }
    format!("{sign}{},{frac} €", group_thousands(int_part))
}

fn group_thousands(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut out = String::with_capacity(chars.len() + chars.len() / 3);
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(*c);
    }
    out
}

/// Format a percentage with two decimals and a decimal comma: `"8,75 %"`.
pub fn format_pct(value: f64) -> String {
    format!("{value:.2} %").replace('.', ",")
}

/// One slice of the breakdown chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartSlice {
    pub label: String,
    pub value: f64,
    pub color: &'static str,
}

/// Build the chart series for a breakdown, colors drawn round-robin from
/// [`PALETTE`]. Zero rows stay in the series so the chart keeps a stable
/// legend regardless of what was selected.
pub fn chart_series(quote: &Quote) -> Vec<ChartSlice> {
    quote
        .breakdown
        .iter()
        .enumerate()
        .map(|(i, row)| ChartSlice {
            label: row.label.clone(),
            value: row.amount.to_f64().unwrap_or(0.0),
            color: PALETTE[i % PALETTE.len()],
        })
        .collect()
}

/// Render the breakdown as an aligned text table with a total row.
pub fn render_table(quote: &Quote) -> String {
    let amounts: Vec<String> = quote
        .breakdown
        .iter()
        .map(|row| format_eur(row.amount))
        .collect();
    let total = format_eur(quote.total);

    let label_width = quote
        .breakdown
        .iter()
        .map(|row| row.label.chars().count())
        .chain(std::iter::once("Total".chars().count()))
        .max()
        .unwrap_or(0);
    let amount_width = amounts
        .iter()
        .map(|a| a.chars().count())
        .chain(std::iter::once(total.chars().count()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (row, amount) in quote.breakdown.iter().zip(&amounts) {
        push_line(&mut out, &row.label, amount, label_width, amount_width);
    }
    out.push_str(&"-".repeat(label_width + 2 + amount_width));
    out.push('\n');
    push_line(&mut out, "Total", &total, label_width, amount_width);
    out
}

fn push_line(out: &mut String, label: &str, amount: &str, label_width: usize, amount_width: usize) {
    let label_pad = label_width - label.chars().count();
    let amount_pad = amount_width - amount.chars().count();
    out.push_str(label);
    out.push_str(&" ".repeat(label_pad + 2 + amount_pad));
    out.push_str(amount);
    out.push('\n');
}
