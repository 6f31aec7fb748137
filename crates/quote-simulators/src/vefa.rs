//! VEFA simulator: purchase off-plan, financed by a fixed-rate loan over the
//! price plus reduced new-build notary fees, minus the buyer's deposit.

use crate::SimulatorError;
use quote_core::{BreakdownRow, Quote, QuoteError, QuoteRequest};
use quote_finance::{amortization_schedule, monthly_payment, ScheduleRow};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

struct Inputs {
    deposit: Decimal,
    borrowed: Decimal,
    annual_rate_pct: f64,
    term: u32,
}

fn inputs(request: &QuoteRequest) -> Result<Inputs, SimulatorError> {
    let price = request.magnitude("price")?;
    let deposit = request.magnitude_or_zero("deposit")?;
    // New builds carry reduced notary fees, around 2.5% instead of 7-8%.
    let notary_pct = request.magnitude_or("notary_pct", Decimal::new(25, 1))?;
    let notary_fees = (price * notary_pct / Decimal::new(100, 0))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    let annual_rate_pct = request
        .magnitude("annual_rate")?
        .to_f64()
        .ok_or(QuoteError::NonFinite)?;
    Ok(Inputs {
        deposit,
        borrowed: price + notary_fees - deposit,
        annual_rate_pct,
        term: request.count("term_months")?,
    })
}

/// Monthly payment and total cost of the operation: deposit up front, then
/// the annuity over the borrowed amount. The interest row shows the cost of
/// credit; at rate zero the cent-rounded payment can repay slightly less
/// than the principal, so the row floors at zero rather than going negative.
pub fn estimate(request: &QuoteRequest) -> Result<(Quote, Decimal), SimulatorError> {
    let inputs = inputs(request)?;
    let payment = monthly_payment(inputs.borrowed, inputs.annual_rate_pct, inputs.term)?;
    let repaid = payment * Decimal::from(inputs.term);
    let quote = Quote::from_rows(vec![
        BreakdownRow::new("Apport", inputs.deposit),
        BreakdownRow::new("Capital emprunté", inputs.borrowed),
        BreakdownRow::new("Intérêts", (repaid - inputs.borrowed).max(Decimal::ZERO)),
    ]);
    Ok((quote, payment))
}

/// Full amortization table for the loan.
pub fn schedule(
    request: &QuoteRequest,
    first_due: chrono::NaiveDate,
) -> Result<Vec<ScheduleRow>, SimulatorError> {
    let inputs = inputs(request)?;
    Ok(amortization_schedule(
        inputs.borrowed,
        inputs.annual_rate_pct,
        inputs.term,
        first_due,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_request() -> QuoteRequest {
        QuoteRequest::default()
            .with_magnitude("price", "200000")
            .with_magnitude("deposit", "20000")
            .with_magnitude("annual_rate", "3")
            .with_magnitude("term_months", "240")
    }

    #[test]
    fn reduced_notary_fees_enter_the_loan() {
        let (quote, payment) = estimate(&reference_request()).unwrap();
        // Borrowed: 200 000 + 2.5% notary − 20 000 = 185 000.
        assert_eq!(quote.breakdown[1].amount, Decimal::new(185_000, 0));
        let p = payment.to_f64().unwrap();
        assert!((1025.0..=1027.5).contains(&p), "got {p}");
    }

    #[test]
    fn total_is_deposit_plus_all_installments() {
        let (quote, payment) = estimate(&reference_request()).unwrap();
        assert_eq!(
            quote.total,
            Decimal::new(20000, 0) + payment * Decimal::from(240u32)
        );
    }

    #[test]
    fn notary_percentage_can_be_overridden() {
        let request = reference_request().with_magnitude("notary_pct", "0");
        let (quote, _) = estimate(&request).unwrap();
        assert_eq!(quote.breakdown[1].amount, Decimal::new(180_000, 0));
    }

    #[test]
    fn zero_rate_interest_row_floors_at_zero() {
        let request = reference_request().with_magnitude("annual_rate", "0");
        let (quote, payment) = estimate(&request).unwrap();
        // 185 000 / 240 rounds the payment down to 770.83, so the repaid sum
        // lands 80 cents under the principal; the row clamps instead of
        // showing negative interest.
        let interest = quote.breakdown[2].amount;
        assert_eq!(interest, Decimal::ZERO);
        assert!(quote.breakdown.iter().all(|row| row.amount >= Decimal::ZERO));
        assert_eq!(
            payment,
            (Decimal::new(185_000, 0) / Decimal::from(240u32))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
        );
    }
}
