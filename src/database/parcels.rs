use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

use crate::config::constant::{RECENT_PARCELS, TRACKING_NUMBER_ATTEMPTS};
use crate::domain::parcel::{reward_points, Booking, Parcel, SenderStats};
use crate::domain::types::{PriorityClass, Quote, SizeClass};
use crate::error::LedgerError;
use crate::tracking::number;
use crate::tracking::status::{ParcelStatus, StatusEvent};

const PARCEL_COLUMNS: &str = "tracking_number, sender, sender_phone, recipient, recipient_phone, \
     package_type, pickup_location, delivery_location, origin, destination, weight_kg, \
     size, priority, insured, cost_units, eta_label, status, created_at";

const BOOKING_CONFIRMED: &str = "Parcel booking confirmed";

#[derive(Debug, sqlx::FromRow)]
struct ParcelRow {
    tracking_number: String,
    sender: String,
    sender_phone: String,
    recipient: String,
    recipient_phone: String,
    package_type: String,
    pickup_location: String,
    delivery_location: String,
    origin: String,
    destination: String,
    weight_kg: f64,
    size: String,
    priority: String,
    insured: bool,
    cost_units: i64,
    eta_label: String,
    status: String,
    created_at: String,
}

#[derive(Debug, sqlx::FromRow)]
struct HistoryRow {
    status: String,
    recorded_at: String,
    location: String,
    description: String,
}

impl ParcelRow {
    fn into_parcel(self, history: Vec<StatusEvent>) -> Result<Parcel, LedgerError> {
        let corrupt = |reason: String| LedgerError::CorruptRow {
            tracking_number: self.tracking_number.clone(),
            reason,
        };

        let size: SizeClass = self.size.parse().map_err(|e| corrupt(format!("{e}")))?;
        let priority: PriorityClass = self.priority.parse().map_err(|e| corrupt(format!("{e}")))?;
        let status: ParcelStatus = self.status.parse().map_err(|e| corrupt(format!("{e}")))?;
        let created_at = parse_timestamp(&self.created_at).map_err(&corrupt)?;
        let cost_units = u64::try_from(self.cost_units)
            .map_err(|_| corrupt(format!("negative cost {}", self.cost_units)))?;

        Ok(Parcel {
            tracking_number: self.tracking_number,
            sender: self.sender,
            sender_phone: self.sender_phone,
            recipient: self.recipient,
            recipient_phone: self.recipient_phone,
            package_type: self.package_type,
            pickup_location: self.pickup_location,
            delivery_location: self.delivery_location,
            origin: self.origin,
            destination: self.destination,
            weight_kg: self.weight_kg,
            size,
            priority,
            insured: self.insured,
            cost_units,
            eta_label: self.eta_label,
            status,
            created_at,
            history,
        })
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| format!("bad timestamp '{raw}': {e}"))
}

/// Stores a confirmed booking under a fresh tracking number with a single
/// `pending` history event at the origin.
/// Only a finite, positive weight can be booked.
pub async fn book_parcel<R: Rng + ?Sized>(
    pool: &SqlitePool,
    booking: &Booking,
    quote: &Quote,
    rng: &mut R,
) -> Result<Parcel, LedgerError> {
    let request = &booking.request;
    if !(request.weight_kg.is_finite() && request.weight_kg > 0.0) {
        return Err(LedgerError::InvalidWeight(request.weight_kg));
    }

    for attempt in 1..=TRACKING_NUMBER_ATTEMPTS {
        let tracking_number = number::generate(&mut *rng);
        let created_at = Utc::now();

        let mut tx = pool.begin().await?;
        let inserted = sqlx::query(&format!(
            "INSERT INTO parcels ({PARCEL_COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(&tracking_number)
        .bind(&booking.sender)
        .bind(&booking.sender_phone)
        .bind(&booking.recipient)
        .bind(&booking.recipient_phone)
        .bind(&booking.package_type)
        .bind(&booking.pickup_location)
        .bind(&booking.delivery_location)
        .bind(&request.origin)
        .bind(&request.destination)
        .bind(request.weight_kg)
        .bind(request.size.as_str())
        .bind(request.priority.as_str())
        .bind(request.insured)
        .bind(quote.cost_units as i64)
        .bind(&quote.eta_label)
        .bind(ParcelStatus::Pending.as_str())
        .bind(timestamp(created_at))
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {}
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                warn!(
                    "Tracking number {} already taken (attempt {}/{})",
                    tracking_number, attempt, TRACKING_NUMBER_ATTEMPTS
                );
                continue;
            }
            Err(e) => return Err(e.into()),
        }

        let event = StatusEvent::new(
            ParcelStatus::Pending,
            created_at,
            request.origin.as_str(),
            BOOKING_CONFIRMED,
        );
        insert_event(&mut tx, &tracking_number, &event).await?;
        tx.commit().await?;

        info!(
            "Booked parcel {} for {}: {} -> {}, {} UGX",
            tracking_number, booking.sender, request.origin, request.destination, quote.cost_units
        );
        return load(pool, &tracking_number).await;
    }

    Err(LedgerError::TrackingNumbersExhausted(TRACKING_NUMBER_ATTEMPTS))
}

pub async fn find_parcel(
    pool: &SqlitePool,
    tracking_number: &str,
) -> Result<Option<Parcel>, LedgerError> {
    let row: Option<ParcelRow> = sqlx::query_as(&format!(
        "SELECT {PARCEL_COLUMNS} FROM parcels WHERE tracking_number = ?"
    ))
    .bind(tracking_number)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let history = load_history(pool, &row.tracking_number).await?;
            Ok(Some(row.into_parcel(history)?))
        }
        None => Ok(None),
    }
}

/// Sets the parcel's status and appends the matching history event.
/// Without a description the status label is recorded.
pub async fn update_status(
    pool: &SqlitePool,
    tracking_number: &str,
    status: ParcelStatus,
    location: &str,
    description: Option<&str>,
) -> Result<Parcel, LedgerError> {
    let event = StatusEvent::new(
        status,
        Utc::now(),
        location,
        description.unwrap_or(status.label()),
    );

    let mut tx = pool.begin().await?;
    let updated = sqlx::query("UPDATE parcels SET status = ? WHERE tracking_number = ?")
        .bind(status.as_str())
        .bind(tracking_number)
        .execute(&mut *tx)
        .await?;

    if updated.rows_affected() == 0 {
        return Err(LedgerError::NotFound(tracking_number.to_string()));
    }

    insert_event(&mut tx, tracking_number, &event).await?;
    tx.commit().await?;

    info!("Parcel {} is now {} at {}", tracking_number, status.label(), location);
    load(pool, tracking_number).await
}

/// A sender's parcels, newest first.
pub async fn parcels_for_sender(pool: &SqlitePool, sender: &str) -> Result<Vec<Parcel>, LedgerError> {
    latest_for_sender(pool, sender, None).await
}

/// Parcel counts by stage, revenue and reward points for one sender, plus
/// their most recent parcels.
pub async fn sender_stats(pool: &SqlitePool, sender: &str) -> Result<SenderStats, LedgerError> {
    let rows: Vec<(String, String, i64)> =
        sqlx::query_as("SELECT tracking_number, status, cost_units FROM parcels WHERE sender = ?")
            .bind(sender)
            .fetch_all(pool)
            .await?;

    let mut stats = SenderStats {
        total_parcels: 0,
        delivered_parcels: 0,
        in_transit_parcels: 0,
        pending_parcels: 0,
        total_revenue: 0,
        reward_points: 0,
        recent: Vec::new(),
    };

    for (tracking_number, status, cost) in rows {
        let status: ParcelStatus = status.parse().map_err(|e| LedgerError::CorruptRow {
            tracking_number,
            reason: format!("{e}"),
        })?;
        let cost = cost.max(0) as u64;

        stats.total_parcels += 1;
        match status {
            ParcelStatus::Delivered => stats.delivered_parcels += 1,
            ParcelStatus::Pending => stats.pending_parcels += 1,
            s if s.is_moving() => stats.in_transit_parcels += 1,
            _ => {}
        }
        stats.total_revenue += cost;
        stats.reward_points += reward_points(cost);
    }

    stats.recent = latest_for_sender(pool, sender, Some(RECENT_PARCELS)).await?;
    Ok(stats)
}

async fn latest_for_sender(
    pool: &SqlitePool,
    sender: &str,
    limit: Option<u32>,
) -> Result<Vec<Parcel>, LedgerError> {
    // LIMIT -1 is unbounded in SQLite
    let rows: Vec<ParcelRow> = sqlx::query_as(&format!(
        "SELECT {PARCEL_COLUMNS} FROM parcels WHERE sender = ? \
         ORDER BY created_at DESC, rowid DESC LIMIT ?"
    ))
    .bind(sender)
    .bind(limit.map_or(-1, i64::from))
    .fetch_all(pool)
    .await?;

    let mut parcels = Vec::with_capacity(rows.len());
    for row in rows {
        let history = load_history(pool, &row.tracking_number).await?;
        parcels.push(row.into_parcel(history)?);
    }
    Ok(parcels)
}

/// Reward points accumulated over all of a sender's parcels.
pub async fn sender_rewards(pool: &SqlitePool, sender: &str) -> Result<u64, LedgerError> {
    let costs: Vec<(i64,)> = sqlx::query_as("SELECT cost_units FROM parcels WHERE sender = ?")
        .bind(sender)
        .fetch_all(pool)
        .await?;

    Ok(costs
        .into_iter()
        .map(|(cost,)| reward_points(cost.max(0) as u64))
        .sum())
}

async fn load(pool: &SqlitePool, tracking_number: &str) -> Result<Parcel, LedgerError> {
    find_parcel(pool, tracking_number)
        .await?
        .ok_or_else(|| LedgerError::NotFound(tracking_number.to_string()))
}

async fn load_history(pool: &SqlitePool, tracking_number: &str) -> Result<Vec<StatusEvent>, LedgerError> {
    let rows: Vec<HistoryRow> = sqlx::query_as(
        r#"
        SELECT status, recorded_at, location, description
        FROM parcel_status_history
        WHERE tracking_number = ?
        ORDER BY id
        "#,
    )
    .bind(tracking_number)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| -> Result<StatusEvent, LedgerError> {
            let corrupt = |reason: String| LedgerError::CorruptRow {
                tracking_number: tracking_number.to_string(),
                reason,
            };
            Ok(StatusEvent {
                status: row.status.parse::<ParcelStatus>().map_err(|e| corrupt(format!("{e}")))?,
                timestamp: parse_timestamp(&row.recorded_at).map_err(corrupt)?,
                location: row.location,
                description: row.description,
            })
        })
        .collect()
}

async fn insert_event(
    conn: &mut SqliteConnection,
    tracking_number: &str,
    event: &StatusEvent,
) -> Result<(), LedgerError> {
    sqlx::query(
        r#"
        INSERT INTO parcel_status_history (tracking_number, status, recorded_at, location, description)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(tracking_number)
    .bind(event.status.as_str())
    .bind(timestamp(event.timestamp))
    .bind(&event.location)
    .bind(&event.description)
    .execute(conn)
    .await?;
    Ok(())
}
