use std::error::Error;
use std::path::Path;

use colored::*;
use csv::{ReaderBuilder, Writer};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{info, span, warn, Level};

use crate::cli::args::{parse_args, Command};
use crate::config::Settings;
use crate::database::parcels::{book_parcel, find_parcel, sender_stats, update_status};
use crate::database::sqlx::db_connection;
use crate::domain::parcel::SenderStats;
use crate::domain::types::{PriorityClass, Quote, ShipmentRequest, SizeClass};
use crate::error::LedgerError;
use crate::pricing::CostEstimator;
use crate::setup::init::{init_tracing_and_env, load_estimator};
use crate::tracking::number;
use crate::tracking::status::ParcelStatus;
use crate::tracking::timeline::TrackingView;

/// One row of a batch quote file.
#[derive(Debug, Deserialize)]
struct BatchRow {
    origin: String,
    destination: String,
    weight_kg: f64,
    size: Option<SizeClass>,
    priority: Option<PriorityClass>,
    insured: Option<bool>,
}

impl From<BatchRow> for ShipmentRequest {
    fn from(row: BatchRow) -> Self {
        ShipmentRequest::new(row.origin, row.destination, row.weight_kg)
            .with_size(row.size.unwrap_or_default())
            .with_priority(row.priority.unwrap_or_default())
            .with_insurance(row.insured.unwrap_or(false))
    }
}

pub async fn run() -> Result<(), Box<dyn Error>> {
    init_tracing_and_env()?;

    let command = parse_args(std::env::args().skip(1))?;
    let settings = Settings::from_env();
    let estimator = load_estimator(&settings)?;

    match command {
        Command::Quote { request, json } => {
            let quote = estimator.estimate(&request);
            if json {
                println!("{}", serde_json::to_string_pretty(&quote)?);
            } else {
                print_quote(&request, &quote);
            }
        }
        Command::Batch { input, output } => run_batch(&estimator, &input, &output)?,
        Command::Routes { from, to } => print_routes(&estimator, &from, &to),
        Command::Districts => {
            for district in estimator.catalog().districts() {
                println!("{district}");
            }
        }
        Command::Book { booking } => {
            let pool = db_connection(&settings.database_url).await?;
            let quote = estimator.estimate(&booking.request);
            let mut rng = ChaCha8Rng::from_entropy();
            let parcel = book_parcel(&pool, &booking, &quote, &mut rng).await?;

            println!(
                "{} {}",
                "Package booking confirmed! Tracking number:".green().bold(),
                parcel.tracking_number.yellow().bold()
            );
            print_quote(&booking.request, &quote);
        }
        Command::Track { tracking_number } => {
            let pool = db_connection(&settings.database_url).await?;
            track(&pool, &tracking_number).await?;
        }
        Command::Status {
            tracking_number,
            status,
            location,
            description,
        } => {
            let pool = db_connection(&settings.database_url).await?;
            let tracking_number = number::normalize(&tracking_number);
            let parcel = update_status(
                &pool,
                &tracking_number,
                status,
                &location,
                description.as_deref(),
            )
            .await?;
            print_tracking(&TrackingView::from_parcel(&parcel));
        }
        Command::Parcels { sender } => {
            let pool = db_connection(&settings.database_url).await?;
            list_parcels(&pool, &sender).await?;
        }
    }

    Ok(())
}

fn print_quote(request: &ShipmentRequest, quote: &Quote) {
    let b = &quote.breakdown;
    println!(
        "{} {} -> {} ({} kg, {}, {}{})",
        "Quote:".bold(),
        request.origin,
        request.destination,
        request.weight_kg,
        request.size,
        request.priority,
        if request.insured { ", insured" } else { "" }
    );
    println!("  distance      {} km ({} x 50 km)", b.distance_km, b.distance_units);
    println!("  base          {:.0}", b.base);
    println!("  after floor   {:.0}", b.floored);
    println!("  after size    {:.0}", b.after_size);
    println!("  after prio    {:.0}", b.after_priority);
    println!("  after insur.  {:.0}", b.after_insurance);

    let total = format!("UGX {}", quote.cost_units);
    if b.after_insurance > b.capped {
        println!("  {} {} (capped)", "total".bold(), total.yellow().bold());
    } else {
        println!("  {} {}", "total".bold(), total.green().bold());
    }
    println!("  {} {}", "eta".bold(), quote.eta_label.cyan());
}

fn print_routes(estimator: &CostEstimator, from: &str, to: &str) {
    let routes = estimator.bus_routes().routes_between(from, to);
    if routes.is_empty() {
        println!(
            "{}",
            format!("No direct bus between {from} and {to}; parcels go via connecting route")
                .yellow()
        );
        return;
    }
    for route in routes {
        println!("{} <-> {}  {}", route.from, route.to, route.operator.cyan());
    }
}

fn run_batch(estimator: &CostEstimator, input: &Path, output: &Path) -> Result<(), Box<dyn Error>> {
    let batch_span = span!(Level::INFO, "batch", input = %input.display());
    let _guard = batch_span.enter();

    let mut reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(input)?;
    let mut requests = Vec::new();
    for row in reader.deserialize::<BatchRow>() {
        requests.push(ShipmentRequest::from(row?));
    }
    info!("Read {} shipments from {}", requests.len(), input.display());

    let quotes = estimator.estimate_batch(&requests);
    save_to_csv(&requests, &quotes, output)?;

    println!(
        "{} {} quotes to {}",
        "Wrote".green(),
        quotes.len(),
        output.display()
    );
    Ok(())
}

fn save_to_csv(
    requests: &[ShipmentRequest],
    quotes: &[Quote],
    filename: &Path,
) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_path(filename)?;

    wtr.write_record([
        "origin",
        "destination",
        "weight_kg",
        "size",
        "priority",
        "insured",
        "distance_km",
        "cost_units",
        "eta",
    ])?;

    for (request, quote) in requests.iter().zip(quotes) {
        wtr.write_record([
            request.origin.clone(),
            request.destination.clone(),
            request.weight_kg.to_string(),
            request.size.to_string(),
            request.priority.to_string(),
            request.insured.to_string(),
            quote.breakdown.distance_km.to_string(),
            quote.cost_units.to_string(),
            quote.eta_label.clone(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

async fn track(pool: &SqlitePool, tracking_number: &str) -> Result<(), LedgerError> {
    let tracking_number = number::normalize(tracking_number);
    if !number::is_valid(&tracking_number) {
        warn!("'{}' does not look like a tracking number", tracking_number);
    }

    match find_parcel(pool, &tracking_number).await? {
        Some(parcel) => print_tracking(&TrackingView::from_parcel(&parcel)),
        None => println!(
            "{}",
            "Parcel not found. Please check your tracking number.".red()
        ),
    }
    Ok(())
}

fn print_tracking(view: &TrackingView) {
    println!(
        "{} {}  {} -> {}",
        "Tracking:".bold(),
        view.tracking_number.yellow().bold(),
        view.from,
        view.to
    );
    println!("  status    {}", view.status.cyan());
    println!("  location  {}", view.current_location);
    println!("  eta       {}", view.eta);
    println!("  parcel    {} from {} to {}", view.weight, view.sender, view.recipient);
    if !view.parcel_type.is_empty() {
        println!("  type      {}", view.parcel_type);
    }
    if !view.pickup_location.is_empty() {
        println!("  pickup    {}", view.pickup_location);
    }
    if !view.delivery_location.is_empty() {
        println!("  deliver   {}", view.delivery_location);
    }
    for entry in &view.timeline {
        let mark = if entry.completed {
            "●".green()
        } else {
            "○".dimmed()
        };
        println!("  {} {:<28} {:<14} {}", mark, entry.label, entry.location, entry.time);
    }
}

async fn list_parcels(pool: &SqlitePool, sender: &str) -> Result<(), LedgerError> {
    let stats = sender_stats(pool, sender).await?;
    if stats.total_parcels == 0 {
        println!("No parcels for {sender}");
        return Ok(());
    }

    for parcel in &stats.recent {
        let status = if parcel.status == ParcelStatus::Delivered {
            parcel.status.label().green()
        } else {
            parcel.status.label().cyan()
        };
        println!(
            "{}  {} -> {}  UGX {}  {}",
            parcel.tracking_number.yellow(),
            parcel.origin,
            parcel.destination,
            parcel.cost_units,
            status
        );
    }
    print_stats(&stats);
    Ok(())
}

fn print_stats(stats: &SenderStats) {
    if stats.total_parcels > stats.recent.len() as u64 {
        println!("  ... {} older parcels", stats.total_parcels - stats.recent.len() as u64);
    }
    println!(
        "{} {} parcels: {} delivered, {} in transit, {} pending",
        "Total".bold(),
        stats.total_parcels,
        stats.delivered_parcels.to_string().green(),
        stats.in_transit_parcels.to_string().cyan(),
        stats.pending_parcels.to_string().yellow()
    );
    println!(
        "{} UGX {}, {} reward points",
        "Spent".bold(),
        stats.total_revenue,
        stats.reward_points
    );
}
