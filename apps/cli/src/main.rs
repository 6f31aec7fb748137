#![deny(warnings)]

//! Headless CLI: evaluate a quote simulator over a request file.
//!
//! The request file is the same flat form snapshot the web UI holds, in
//! YAML (or JSON, by extension). Validation failures exit non-zero with the
//! typed error message and print no partial result.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use quote_core::QuoteRequest;
use quote_present::{format_eur, format_pct, render_table, IRR_CAVEAT};
use quote_simulators::{remere_inverse, vefa, IrrEstimate, Simulator};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Default)]
struct Args {
    simulator: Option<String>,
    input: Option<String>,
    first_due: Option<String>,
    json: bool,
    schedule: bool,
    list: bool,
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--simulator" => args.simulator = it.next(),
            "--input" => args.input = it.next(),
            "--first-due" => args.first_due = it.next(),
            "--json" => args.json = true,
            "--schedule" => args.schedule = true,
            "--list" => args.list = true,
            _ => {}
        }
    }
    args
}

fn read_request(path: &str) -> Result<QuoteRequest> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    if path.ends_with(".json") {
        serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
    } else {
        serde_yaml::from_str(&text).with_context(|| format!("parsing {path}"))
    }
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = parse_args();
    if args.list {
        for sim in Simulator::ALL {
            println!("{sim}");
        }
        return Ok(());
    }

    let Some(ref name) = args.simulator else {
        bail!("--simulator <name> is required (see --list)");
    };
    let Some(ref input) = args.input else {
        bail!("--input <file> is required");
    };
    let simulator: Simulator = name.parse()?;
    let request = read_request(&input)?;
    info!(%simulator, input = %input, "estimating");

    if args.schedule {
        return print_schedule(simulator, &request, &args);
    }

    let result = simulator.estimate(&request)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{}", render_table(&result.quote));
    if let Some(payment) = result.monthly_payment {
        println!("Mensualité : {}", format_eur(payment));
    }
    match result.irr {
        Some(IrrEstimate::ApproxAnnualPct(pct)) => {
            println!("Taux annuel estimé : {}", format_pct(pct));
            println!("{IRR_CAVEAT}");
        }
        Some(IrrEstimate::NotAvailable) => println!("Taux annuel estimé : n/a"),
        None => {}
    }
    Ok(())
}

fn print_schedule(simulator: Simulator, request: &QuoteRequest, args: &Args) -> Result<()> {
    let due_text = args
        .first_due
        .as_deref()
        .context("--schedule requires --first-due YYYY-MM-DD")?;
    let first_due = NaiveDate::parse_from_str(due_text, "%Y-%m-%d")
        .context("--first-due must be a YYYY-MM-DD date")?;
    let rows = match simulator {
        Simulator::RemereInverse => remere_inverse::schedule(request, first_due)?,
        Simulator::Vefa => vefa::schedule(request, first_due)?,
        _ => bail!("--schedule is only available for remere-inverse and vefa"),
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    for row in rows {
        println!(
            "{:>3}  {}  {:>14}  (intérêts {}, capital {}, restant dû {})",
            row.period,
            row.due,
            format_eur(row.payment),
            format_eur(row.interest),
            format_eur(row.principal),
            format_eur(row.balance)
        );
    }
    Ok(())
}
