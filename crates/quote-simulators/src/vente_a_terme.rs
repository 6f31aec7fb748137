//! Vente à terme simulator: a bouquet paid at signing and the remainder in
//! equal monthly installments. The seller credit is interest-free by
//! construction, so no annuity formula applies.

use crate::SimulatorError;
use quote_core::{BreakdownRow, Quote, QuoteRequest};
use quote_finance::FinanceError;
use rust_decimal::{Decimal, RoundingStrategy};

/// Monthly installment and total: bouquet plus term payments.
pub fn estimate(request: &QuoteRequest) -> Result<(Quote, Decimal), SimulatorError> {
    let price = request.magnitude("price")?;
    let bouquet = request.magnitude_or_zero("bouquet")?;
    let term = request.count("term_months")?;
    if term == 0 {
        return Err(FinanceError::ZeroTerm.into());
    }
    let remainder = price - bouquet;
    if remainder <= Decimal::ZERO {
        return Err(FinanceError::NonPositivePrincipal.into());
    }
    let monthly = (remainder / Decimal::from(term))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    let quote = Quote::from_rows(vec![
        BreakdownRow::new("Bouquet", bouquet),
        BreakdownRow::new("Mensualités", monthly * Decimal::from(term)),
    ]);
    Ok((quote, monthly))
}
