#![deny(warnings)]

//! Annuity and internal-rate-of-return math for the financing simulators.
//!
//! The fixed-rate annuity formula is shared by the réméré inversé, VEFA and
//! vente à terme simulators; the Newton–Raphson IRR solver is used by the
//! réméré simulator alone. All money stays in `Decimal`; the transcendental
//! steps run in `f64` behind finiteness guards so NaN and Infinity never
//! escape into a result.

use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Iteration cap for the IRR solver.
pub const MAX_ITERATIONS: u32 = 100;

/// Longest accepted loan term, 50 years. Terms are user input; the cap is
/// checked before any schedule or cash-flow series is allocated.
pub const MAX_TERM_MONTHS: u32 = 600;

/// Convergence threshold on successive IRR estimates.
pub const CONVERGENCE_EPS: f64 = 1e-8;

/// Errors produced by the financing math.
#[derive(Debug, Error, PartialEq)]
pub enum FinanceError {
    /// Loans are only defined for a strictly positive principal.
    #[error("principal must be strictly positive")]
    NonPositivePrincipal,
    /// A loan needs at least one monthly installment.
    #[error("term must be at least one month")]
    ZeroTerm,
    /// The requested term exceeds [`MAX_TERM_MONTHS`].
    #[error("term of {0} months exceeds the {MAX_TERM_MONTHS}-month limit")]
    TermTooLong(u32),
    /// Annual rate must be finite and non-negative (in percent).
    #[error("invalid annual rate: {0}")]
    InvalidRate(f64),
    /// Numeric conversion to or from floating point failed.
    #[error("non-finite numeric conversion")]
    NonFinite,
}

/// Fixed monthly payment of a standard annuity loan, rounded to the cent.
///
/// `payment = P·r·(1+r)^n / ((1+r)^n − 1)` with `r = annual_rate_pct/100/12`.
/// A zero rate (and any rate so small that `(1+r)^n` collapses to 1 in f64)
/// takes the no-interest limit `P / n` instead of dividing by zero.
pub fn monthly_payment(
    principal: Decimal,
    annual_rate_pct: f64,
    term_months: u32,
) -> Result<Decimal, FinanceError> {
    if principal <= Decimal::ZERO {
        return Err(FinanceError::NonPositivePrincipal);
    }
    if term_months == 0 {
        return Err(FinanceError::ZeroTerm);
    }
    if term_months > MAX_TERM_MONTHS {
        return Err(FinanceError::TermTooLong(term_months));
    }
    if !annual_rate_pct.is_finite() || annual_rate_pct < 0.0 {
        return Err(FinanceError::InvalidRate(annual_rate_pct));
    }

    let no_interest = || {
        Ok((principal / Decimal::from(term_months))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
    };
    if annual_rate_pct == 0.0 {
        return no_interest();
    }

    let p = principal.to_f64().ok_or(FinanceError::NonFinite)?;
    let r = annual_rate_pct / 100.0 / 12.0;
    let growth = (1.0 + r).powi(term_months as i32);
    let denom = growth - 1.0;
    if !growth.is_finite() {
        return Err(FinanceError::NonFinite);
    }
    if denom <= 0.0 {
        return no_interest();
    }
    let payment = p * r * growth / denom;
    if !payment.is_finite() {
        return Err(FinanceError::NonFinite);
    }
    let payment = Decimal::from_f64(payment).ok_or(FinanceError::NonFinite)?;
    Ok(payment.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
}

/// Total cost of the loan: all installments plus fixed fees.
pub fn total_cost(payment: Decimal, term_months: u32, fixed_fees: Decimal) -> Decimal {
    payment * Decimal::from(term_months) + fixed_fees
}

/// One month of an amortization schedule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// 1-based installment number.
    pub period: u32,
    /// Due date of the installment.
    pub due: NaiveDate,
    /// Amount paid this month.
    pub payment: Decimal,
    /// Interest share of the payment.
    pub interest: Decimal,
    /// Principal share of the payment.
    pub principal: Decimal,
    /// Remaining balance after the payment.
    pub balance: Decimal,
}

/// Full amortization table for a fixed-rate loan.
///
/// Interest is computed on the running balance and rounded to the cent each
/// month; the final installment absorbs the rounding remainder so the
/// balance lands exactly on zero.
pub fn amortization_schedule(
    principal: Decimal,
    annual_rate_pct: f64,
    term_months: u32,
    first_due: NaiveDate,
) -> Result<Vec<ScheduleRow>, FinanceError> {
    let payment = monthly_payment(principal, annual_rate_pct, term_months)?;
    let monthly_rate =
        Decimal::from_f64(annual_rate_pct / 100.0 / 12.0).ok_or(FinanceError::NonFinite)?;

    let mut rows = Vec::with_capacity(term_months as usize);
    let mut balance = principal;
    for period in 1..=term_months {
        let due = add_months(first_due, period - 1);
        let interest = (balance * monthly_rate)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
        let (paid, principal_share) = if period == term_months {
            // Close out exactly, absorbing accumulated cent rounding.
            (balance + interest, balance)
        } else {
            (payment, payment - interest)
        };
        balance -= principal_share;
        rows.push(ScheduleRow {
            period,
            due,
            payment: paid,
            interest,
            principal: principal_share,
            balance,
        });
    }
    debug!(months = term_months, %payment, "amortization schedule built");
    Ok(rows)
}

fn add_months(start: NaiveDate, months: u32) -> NaiveDate {
    let mut y = start.year();
    let mut m = start.month() as i32 + months as i32;
    y += (m - 1) / 12;
    m = (m - 1) % 12 + 1;
    let m = u32::try_from(m).unwrap_or(1);
    // Clamp the day when the target month is shorter (31st, leap years).
    NaiveDate::from_ymd_opt(y, m, start.day())
        .or_else(|| NaiveDate::from_ymd_opt(y, m, 30))
        .or_else(|| NaiveDate::from_ymd_opt(y, m, 29))
        .or_else(|| NaiveDate::from_ymd_opt(y, m, 28))
        .unwrap_or(start)
}

/// Net present value of a monthly cash-flow series at monthly rate `rate`,
/// together with its derivative with respect to the rate.
fn npv_and_derivative(cash_flows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;
    for (i, cf) in cash_flows.iter().enumerate() {
        let i = i as f64;
        let discount = (1.0 + rate).powf(i);
        npv += cf / discount;
        dnpv -= i * cf / ((1.0 + rate).powf(i + 1.0));
    }
    (npv, dnpv)
}

/// Monthly internal rate of return of a cash-flow series, by Newton–Raphson
/// on the NPV. The first flow is the cash received at signing; subsequent
/// flows are outflows.
///
/// Returns `None` when the series cannot have a root (no sign change), when
/// any iterate goes non-finite or at or below −100%, when the derivative
/// vanishes, or when the iteration cap is reached without convergence. The
/// caller shows "n/a" in that case; there is no fallback root-finder.
pub fn irr_monthly(cash_flows: &[f64], initial_guess: f64) -> Option<f64> {
    if cash_flows.len() < 2 {
        return None;
    }
    if !cash_flows.iter().all(|cf| cf.is_finite()) {
        return None;
    }
    let has_positive = cash_flows.iter().any(|cf| *cf > 0.0);
    let has_negative = cash_flows.iter().any(|cf| *cf < 0.0);
    if !has_positive || !has_negative {
        return None;
    }

    let mut rate = initial_guess;
    for _ in 0..MAX_ITERATIONS {
        if !rate.is_finite() || rate <= -1.0 {
            return None;
        }
        let (npv, dnpv) = npv_and_derivative(cash_flows, rate);
        if !npv.is_finite() || !dnpv.is_finite() || dnpv == 0.0 {
            return None;
        }
        let next = rate - npv / dnpv;
        if !next.is_finite() {
            return None;
        }
        if (next - rate).abs() < CONVERGENCE_EPS {
            return Some(next);
        }
        rate = next;
    }
    None
}

/// Effective annual rate for a monthly rate: `(1+r)^12 − 1`.
///
/// The result is an approximation of the scheme's yield, not an exact legal
/// or financial figure; presentation layers must keep that caveat visible.
pub fn annualize_monthly_rate(monthly_rate: f64) -> f64 {
    (1.0 + monthly_rate).powi(12) - 1.0
}
