//! Réméré simulator: sale with right of repurchase, modeled as a monthly
//! cash-flow series whose internal rate of return approximates the cost of
//! the scheme for the owner.

use crate::{IrrEstimate, SimulatorError};
use quote_core::{BreakdownRow, Quote, QuoteError, QuoteRequest};
use quote_finance::{annualize_monthly_rate, irr_monthly, FinanceError, MAX_TERM_MONTHS};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Starting point for the Newton–Raphson iteration, 1% monthly.
const IRR_INITIAL_GUESS: f64 = 0.01;

/// Estimate the total cost of a réméré and its approximate annual rate.
///
/// The breakdown sums the occupancy indemnities, the repurchase premium
/// (buy-back price above sale proceeds, zero when the owner buys back at a
/// discount) and the file fees. Breakdown rows are never negative; a
/// discount shows up in the IRR, which is solved over the true flows: sale
/// proceeds at signing, then one indemnity outflow per month, the last one
/// additionally carrying the buy-back cost.
pub fn estimate(request: &QuoteRequest) -> Result<(Quote, IrrEstimate), SimulatorError> {
    let sale_price = request.magnitude("sale_price")?;
    let indemnity = request.magnitude("monthly_indemnity")?;
    let buyback = request.magnitude("buyback_price")?;
    let fees = request.magnitude_or_zero("fees")?;
    let term = request.count("term_months")?;
    if term == 0 {
        return Err(FinanceError::ZeroTerm.into());
    }
    if term > MAX_TERM_MONTHS {
        return Err(FinanceError::TermTooLong(term).into());
    }

    let premium = (buyback - sale_price).max(Decimal::ZERO);
    let quote = Quote::from_rows(vec![
        BreakdownRow::new("Indemnités d'occupation", indemnity * Decimal::from(term)),
        BreakdownRow::new("Surcoût de rachat", premium),
        BreakdownRow::new("Frais", fees),
    ]);

    let irr = annual_irr(sale_price - fees, indemnity, buyback, term)?;
    Ok((quote, irr))
}

fn annual_irr(
    net_proceeds: Decimal,
    indemnity: Decimal,
    buyback: Decimal,
    term: u32,
) -> Result<IrrEstimate, SimulatorError> {
    let net = net_proceeds.to_f64().ok_or(QuoteError::NonFinite)?;
    let indemnity = indemnity.to_f64().ok_or(QuoteError::NonFinite)?;
    let buyback = buyback.to_f64().ok_or(QuoteError::NonFinite)?;

    let mut flows = Vec::with_capacity(term as usize + 1);
    flows.push(net);
    for _ in 1..term {
        flows.push(-indemnity);
    }
    flows.push(-(indemnity + buyback));

    Ok(match irr_monthly(&flows, IRR_INITIAL_GUESS) {
        Some(monthly) => IrrEstimate::ApproxAnnualPct(annualize_monthly_rate(monthly) * 100.0),
        None => IrrEstimate::NotAvailable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_request() -> QuoteRequest {
        QuoteRequest::default()
            .with_magnitude("sale_price", "100000")
            .with_magnitude("monthly_indemnity", "800")
            .with_magnitude("buyback_price", "95000")
            .with_magnitude("term_months", "12")
    }

    #[test]
    fn breakdown_sums_the_scheme_cost() {
        // Buy-back above the sale price: the premium is a cost row.
        let request = reference_request().with_magnitude("buyback_price", "110000");
        let (quote, _) = estimate(&request).unwrap();
        // 12×800 + (110000 − 100000) + 0
        assert_eq!(quote.total, Decimal::new(19_600, 0));
        assert_eq!(quote.breakdown.len(), 3);
        assert_eq!(quote.breakdown[1].amount, Decimal::new(10_000, 0));
    }

    #[test]
    fn discounted_buyback_never_yields_a_negative_row() {
        // Buy-back below the sale price: the premium row clamps to zero and
        // the discount is only visible through the IRR.
        let (quote, _) = estimate(&reference_request()).unwrap();
        assert_eq!(quote.breakdown[1].amount, Decimal::ZERO);
        assert!(quote.breakdown.iter().all(|row| row.amount >= Decimal::ZERO));
        assert_eq!(quote.total, Decimal::new(9_600, 0));
    }

    #[test]
    fn oversized_term_is_refused() {
        let request = reference_request().with_magnitude("term_months", "4000000000");
        assert_eq!(
            estimate(&request).unwrap_err(),
            SimulatorError::Finance(FinanceError::TermTooLong(4_000_000_000))
        );
    }

    #[test]
    fn irr_is_positive_for_a_costly_scheme() {
        let (_, irr) = estimate(&reference_request()).unwrap();
        match irr {
            IrrEstimate::ApproxAnnualPct(pct) => {
                assert!(pct > 0.0 && pct < 30.0, "implausible rate {pct}")
            }
            IrrEstimate::NotAvailable => panic!("expected convergence"),
        }
    }

    #[test]
    fn rootless_series_reports_not_available() {
        // No outflow at all: the NPV has no sign change and no root.
        let request = QuoteRequest::default()
            .with_magnitude("sale_price", "100000")
            .with_magnitude("monthly_indemnity", "0")
            .with_magnitude("buyback_price", "0")
            .with_magnitude("term_months", "12");
        let (_, irr) = estimate(&request).unwrap();
        assert_eq!(irr, IrrEstimate::NotAvailable);
    }

    #[test]
    fn missing_sale_price_refuses_to_run() {
        let request = QuoteRequest::default()
            .with_magnitude("monthly_indemnity", "800")
            .with_magnitude("buyback_price", "95000")
            .with_magnitude("term_months", "12");
        assert_eq!(
            estimate(&request).unwrap_err(),
            SimulatorError::Quote(QuoteError::MissingField("sale_price".to_string()))
        );
    }
}
