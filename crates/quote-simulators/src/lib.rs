#![deny(warnings)]

//! The nine quote simulators of the marketplace, one module each, all built
//! on the shared pricing, geo and finance crates.
//!
//! Five simulators (cleaning, moving, diagnostics, works, furnishing) are
//! plain linear quotes; the four financing simulators (réméré, réméré
//! inversé, VEFA, vente à terme) add annuity or IRR math on top. Every
//! simulator is a single-shot pure evaluation of a request snapshot.

pub mod cleaning;
pub mod diagnostics;
pub mod furnishing;
pub mod moving;
pub mod remere;
pub mod remere_inverse;
pub mod vefa;
pub mod vente_a_terme;
pub mod works;

use quote_core::{Quote, QuoteError, QuoteRequest};
use quote_finance::FinanceError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// Errors surfaced by a simulator run. Validation failures carry the field
/// that blocked the computation; no partial result is ever produced.
#[derive(Debug, Error, PartialEq)]
pub enum SimulatorError {
    #[error(transparent)]
    Quote(#[from] QuoteError),
    #[error(transparent)]
    Finance(#[from] FinanceError),
    #[error("unknown simulator: {0}")]
    UnknownSimulator(String),
}

/// Outcome of the réméré IRR estimation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum IrrEstimate {
    /// Approximate effective annual rate, in percent. An approximation by
    /// construction; presentation must keep the caveat visible.
    ApproxAnnualPct(f64),
    /// The solver did not converge; rendered as "n/a".
    NotAvailable,
}

/// A computed estimate plus the simulator-specific extras.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulatorQuote {
    pub simulator: Simulator,
    pub quote: Quote,
    /// Monthly installment, financing simulators only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_payment: Option<Decimal>,
    /// Annualized IRR estimate, réméré only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub irr: Option<IrrEstimate>,
}

/// All simulators offered by the marketplace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Simulator {
    Cleaning,
    Moving,
    Diagnostics,
    Works,
    Furnishing,
    Remere,
    RemereInverse,
    Vefa,
    VenteATerme,
}

impl Simulator {
    pub const ALL: [Simulator; 9] = [
        Simulator::Cleaning,
        Simulator::Moving,
        Simulator::Diagnostics,
        Simulator::Works,
        Simulator::Furnishing,
        Simulator::Remere,
        Simulator::RemereInverse,
        Simulator::Vefa,
        Simulator::VenteATerme,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Simulator::Cleaning => "cleaning",
            Simulator::Moving => "moving",
            Simulator::Diagnostics => "diagnostics",
            Simulator::Works => "works",
            Simulator::Furnishing => "furnishing",
            Simulator::Remere => "remere",
            Simulator::RemereInverse => "remere-inverse",
            Simulator::Vefa => "vefa",
            Simulator::VenteATerme => "vente-a-terme",
        }
    }

    /// Evaluate this simulator against a request snapshot.
    pub fn estimate(self, request: &QuoteRequest) -> Result<SimulatorQuote, SimulatorError> {
        let result = match self {
            Simulator::Cleaning => Self::linear(self, cleaning::estimate(request)?),
            Simulator::Moving => Self::linear(self, moving::estimate(request)?),
            Simulator::Diagnostics => Self::linear(self, diagnostics::estimate(request)?),
            Simulator::Works => Self::linear(self, works::estimate(request)?),
            Simulator::Furnishing => Self::linear(self, furnishing::estimate(request)?),
            Simulator::Remere => {
                let (quote, irr) = remere::estimate(request)?;
                SimulatorQuote {
                    simulator: self,
                    quote,
                    monthly_payment: None,
                    irr: Some(irr),
                }
            }
            Simulator::RemereInverse => {
                let (quote, payment) = remere_inverse::estimate(request)?;
                Self::financed(self, quote, payment)
            }
            Simulator::Vefa => {
                let (quote, payment) = vefa::estimate(request)?;
                Self::financed(self, quote, payment)
            }
            Simulator::VenteATerme => {
                let (quote, payment) = vente_a_terme::estimate(request)?;
                Self::financed(self, quote, payment)
            }
        };
        info!(simulator = %self, total = %result.quote.total, "estimate computed");
        Ok(result)
    }

    fn linear(simulator: Simulator, quote: Quote) -> SimulatorQuote {
        SimulatorQuote {
            simulator,
            quote,
            monthly_payment: None,
            irr: None,
        }
    }

    fn financed(simulator: Simulator, quote: Quote, payment: Decimal) -> SimulatorQuote {
        SimulatorQuote {
            simulator,
            quote,
            monthly_payment: Some(payment),
            irr: None,
        }
    }
}

impl fmt::Display for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Simulator {
    type Err = SimulatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Simulator::ALL
            .into_iter()
            .find(|sim| sim.name() == s)
            .ok_or_else(|| SimulatorError::UnknownSimulator(s.to_string()))
    }
}
