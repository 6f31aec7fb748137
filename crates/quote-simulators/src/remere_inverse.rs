//! Réméré inversé simulator: financing the repurchase of a property sold in
//! réméré, priced as a standard fixed-rate annuity over the financed amount.

use crate::SimulatorError;
use quote_core::{BreakdownRow, Quote, QuoteError, QuoteRequest};
use quote_finance::{amortization_schedule, monthly_payment, ScheduleRow};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

struct Inputs {
    financed: Decimal,
    annual_rate_pct: f64,
    term: u32,
    fees: Decimal,
}

fn inputs(request: &QuoteRequest) -> Result<Inputs, SimulatorError> {
    let buyback = request.magnitude("buyback_price")?;
    let contribution = request.magnitude_or_zero("contribution")?;
    let annual_rate_pct = request
        .magnitude("annual_rate")?
        .to_f64()
        .ok_or(QuoteError::NonFinite)?;
    Ok(Inputs {
        financed: buyback - contribution,
        annual_rate_pct,
        term: request.count("term_months")?,
        fees: request.magnitude_or_zero("file_fees")?,
    })
}

/// Monthly payment and total cost of financing the buy-back.
pub fn estimate(request: &QuoteRequest) -> Result<(Quote, Decimal), SimulatorError> {
    let inputs = inputs(request)?;
    let payment = monthly_payment(inputs.financed, inputs.annual_rate_pct, inputs.term)?;
    let quote = Quote::from_rows(vec![
        BreakdownRow::new("Mensualités", payment * Decimal::from(inputs.term)),
        BreakdownRow::new("Frais de dossier", inputs.fees),
    ]);
    Ok((quote, payment))
}

/// Full amortization table for the financed amount.
pub fn schedule(
    request: &QuoteRequest,
    first_due: chrono::NaiveDate,
) -> Result<Vec<ScheduleRow>, SimulatorError> {
    let inputs = inputs(request)?;
    Ok(amortization_schedule(
        inputs.financed,
        inputs.annual_rate_pct,
        inputs.term,
        first_due,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use quote_finance::FinanceError;

    fn reference_request() -> QuoteRequest {
        QuoteRequest::default()
            .with_magnitude("buyback_price", "120000")
            .with_magnitude("contribution", "20000")
            .with_magnitude("annual_rate", "3")
            .with_magnitude("term_months", "240")
            .with_magnitude("file_fees", "2000")
    }

    #[test]
    fn annuity_over_the_financed_amount() {
        let (quote, payment) = estimate(&reference_request()).unwrap();
        // 100 000 € at 3% over 240 months ≈ 554.60 €/month.
        let p = payment.to_f64().unwrap();
        assert!((554.55..=554.65).contains(&p), "got {p}");
        assert_eq!(
            quote.total,
            payment * Decimal::from(240u32) + Decimal::new(2000, 0)
        );
    }

    #[test]
    fn contribution_covering_the_buyback_is_rejected() {
        let request = reference_request().with_magnitude("contribution", "120000");
        assert_eq!(
            estimate(&request).unwrap_err(),
            SimulatorError::Finance(FinanceError::NonPositivePrincipal)
        );
    }

    #[test]
    fn schedule_matches_the_estimate() {
        let request = reference_request();
        let (_, payment) = estimate(&request).unwrap();
        let first_due = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let rows = schedule(&request, first_due).unwrap();
        assert_eq!(rows.len(), 240);
        assert_eq!(rows[0].payment, payment);
        assert_eq!(rows.last().unwrap().balance, Decimal::ZERO);
    }
}
