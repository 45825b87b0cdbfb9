//!  Delulu Travel Agent
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! CLI for Amadeus single flight search.

use anyhow::{Context, Result};
use clap::Parser;
use delulu_flight_agent::{
    AmadeusArgs, AmadeusClient, AmadeusConfig, FlightSearchOutcome, FlightSearchRequest,
    Itinerary,
};
use std::cmp::max;

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "delulu-flights")]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Origin airport code (e.g., BOM, SFO)
    #[arg(short, long)]
    from: String,

    /// Destination airport code (e.g., JFK, LHR)
    #[arg(short, long)]
    to: String,

    /// Earliest departure (YYYY-MM-DDTHH:MM:SS)
    #[arg(short, long)]
    earliest: String,

    /// Latest departure (YYYY-MM-DDTHH:MM:SS), same date as earliest
    #[arg(short, long)]
    latest: String,

    /// Page of results, 10 per page
    #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
    page: i64,

    /// Print the raw JSON itineraries instead of a table
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    #[command(flatten)]
    amadeus: AmadeusArgs,
}

/// Configure logging based on verbosity level
fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Get terminal width for responsive tables
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(100)
}

fn dash_bar() -> String {
    "-".repeat(get_terminal_width().min(100))
}

/// "10:00" from "2024-05-01T10:00:00", or the raw value.
fn fmt_clock(at: &str) -> &str {
    at.split_once('T')
        .map(|(_, time)| time.get(..5).unwrap_or(time))
        .unwrap_or(at)
}

/// "BOM → DEL → JFK"
fn fmt_route(itin: &Itinerary) -> String {
    let mut stops: Vec<&str> = itin
        .segments
        .iter()
        .map(|s| s.departure.iata_code.as_str())
        .collect();
    if let Some(last) = itin.segments.last() {
        stops.push(&last.arrival.iata_code);
    }
    stops.join(" → ")
}

fn fmt_times(itin: &Itinerary) -> String {
    match (itin.segments.first(), itin.segments.last()) {
        (Some(first), Some(last)) => format!(
            "{} → {}",
            fmt_clock(&first.departure.at),
            fmt_clock(&last.arrival.at)
        ),
        _ => "??:?? → ??:??".to_string(),
    }
}

fn fmt_carriers(itin: &Itinerary) -> String {
    let mut carriers: Vec<&str> = Vec::new();
    for seg in &itin.segments {
        if !carriers.contains(&seg.carrier.as_str()) {
            carriers.push(&seg.carrier);
        }
    }
    carriers.join(", ")
}

fn fmt_flight_numbers(itin: &Itinerary) -> String {
    itin.segments
        .iter()
        .map(|s| s.flight_number.as_str())
        .collect::<Vec<_>>()
        .join("/")
}

fn render_results(args: &CliArgs, itineraries: &[Itinerary]) {
    let title_bar = format!(
        "================================================================================================\n  🛫  {} → {} departing {} … {} (page {})\n================================================================================================",
        args.from, args.to, args.earliest, args.latest, args.page
    );
    println!("{}\n", title_bar);
    println!("📊 Flights on this page: {}", itineraries.len());
    if itineraries.is_empty() {
        return;
    }

    let mut cw = 7;
    let mut fw = 6;
    let mut tw = 13;
    let mut rw = 5;
    for itin in itineraries {
        cw = max(cw, fmt_carriers(itin).chars().count());
        fw = max(fw, fmt_flight_numbers(itin).chars().count());
        tw = max(tw, fmt_times(itin).chars().count());
        rw = max(rw, fmt_route(itin).chars().count());
    }

    println!("\n{}", dash_bar());
    println!(
        "  {:>3}  {:<cw$}  {:<fw$}  {:<tw$}  {:<rw$}  PRICE",
        "#", "CARRIER", "FLIGHT", "DEP → ARR", "ROUTE",
    );
    println!("{}", dash_bar());

    for (i, itin) in itineraries.iter().enumerate() {
        println!(
            "  {:>3}  {:<cw$}  {:<fw$}  {:<tw$}  {:<rw$}  {} {}",
            i + 1,
            fmt_carriers(itin),
            fmt_flight_numbers(itin),
            fmt_times(itin),
            fmt_route(itin),
            itin.price.total,
            itin.price.currency,
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    setup_logging(args.verbose);

    tracing::info!("Starting delulu-flights CLI");
    tracing::debug!("Args: {:?}", args);

    let config = AmadeusConfig::from(args.amadeus.clone());
    let client = AmadeusClient::new(&config).context("Failed to create Amadeus client")?;

    let request = FlightSearchRequest::new(
        args.from.to_uppercase(),
        args.to.to_uppercase(),
        args.earliest.clone(),
        args.latest.clone(),
    )
    .page_number(args.page);

    let outcome = client
        .single_flight_search(&request)
        .await
        .context("Search failed")?;

    match &outcome {
        FlightSearchOutcome::DepartureWindowSpansDays { earliest, latest } => {
            tracing::warn!(
                "Departure window spans {} to {}; narrow it to a single day",
                earliest,
                latest
            );
        }
        FlightSearchOutcome::ApiError(e) => {
            tracing::warn!("No results because the API call failed: {}", e);
        }
        FlightSearchOutcome::Page(_) => {}
    }

    let itineraries = outcome.into_itineraries();
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&itineraries).context("Serialize itineraries")?
        );
    } else {
        render_results(&args, &itineraries);
    }

    Ok(())
}
