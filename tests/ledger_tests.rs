use fwen::database::parcels::{
    book_parcel, find_parcel, parcels_for_sender, sender_rewards, sender_stats, update_status,
};
use fwen::database::sqlx::db_connection;
use fwen::domain::parcel::Booking;
use fwen::error::LedgerError;
use fwen::tracking::number;
use fwen::tracking::status::ParcelStatus;
use fwen::tracking::timeline::TrackingView;
use fwen::{CostEstimator, PriorityClass, ShipmentRequest, SizeClass};
use rand::rngs::mock::StepRng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sqlx::SqlitePool;

async fn memory_pool() -> SqlitePool {
    db_connection("sqlite::memory:").await.unwrap()
}

fn booking(sender: &str, to: &str, weight: f64) -> Booking {
    Booking::new(
        sender,
        "Okello",
        ShipmentRequest::new("Kampala", to, weight)
            .with_size(SizeClass::Medium)
            .with_priority(PriorityClass::Express),
    )
}

async fn count(pool: &SqlitePool, table: &str) -> i64 {
    let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap();
    n
}

#[tokio::test]
async fn booking_starts_pending_with_one_event() {
    let pool = memory_pool().await;
    let estimator = CostEstimator::default();
    let mut rng = ChaCha8Rng::seed_from_u64(64);

    let booking = booking("Amina", "Gulu", 1.0);
    let quote = estimator.estimate(&booking.request);
    let parcel = book_parcel(&pool, &booking, &quote, &mut rng).await.unwrap();

    assert!(number::is_valid(&parcel.tracking_number));
    assert_eq!(parcel.status, ParcelStatus::Pending);
    assert_eq!(parcel.cost_units, quote.cost_units);
    assert_eq!(parcel.eta_label, "8-11 hours");
    assert_eq!(parcel.size, SizeClass::Medium);
    assert_eq!(parcel.history.len(), 1);
    assert_eq!(parcel.history[0].location, "Kampala");
    assert_eq!(parcel.history[0].description, "Parcel booking confirmed");

    let found = find_parcel(&pool, &parcel.tracking_number).await.unwrap();
    assert_eq!(found, Some(parcel));
}

#[tokio::test]
async fn status_updates_append_history() {
    let pool = memory_pool().await;
    let estimator = CostEstimator::default();
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let booking = booking("Amina", "Gulu", 2.0);
    let quote = estimator.estimate(&booking.request);
    let parcel = book_parcel(&pool, &booking, &quote, &mut rng).await.unwrap();
    let tn = parcel.tracking_number.as_str();

    update_status(&pool, tn, ParcelStatus::Collected, "Kampala", None).await.unwrap();
    let parcel = update_status(&pool, tn, ParcelStatus::InTransit, "Luwero", Some("On the Gateway bus"))
        .await
        .unwrap();

    assert_eq!(parcel.status, ParcelStatus::InTransit);
    let statuses: Vec<ParcelStatus> = parcel.history.iter().map(|e| e.status).collect();
    assert_eq!(
        statuses,
        vec![ParcelStatus::Pending, ParcelStatus::Collected, ParcelStatus::InTransit]
    );
    assert_eq!(parcel.history[1].description, "Collected");

    let view = TrackingView::from_parcel(&parcel);
    assert_eq!(view.current_location, "Luwero");
    assert_eq!(view.status, "In Transit");
    assert_eq!(view.weight, "2kg");
    assert_eq!(view.timeline.len(), 4);
    assert!(!view.timeline[3].completed);
    assert_eq!(view.timeline[3].location, "Gulu");
}

#[tokio::test]
async fn unknown_parcels() {
    let pool = memory_pool().await;
    assert_eq!(find_parcel(&pool, "FWEN 1234AB").await.unwrap(), None);

    let err = update_status(&pool, "FWEN 1234AB", ParcelStatus::OutForDelivery, "Gulu", None)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(tn) if tn == "FWEN 1234AB"));
}

#[tokio::test]
async fn sender_listing_and_rewards() {
    let pool = memory_pool().await;
    let estimator = CostEstimator::default();
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    let mut booked = Vec::new();
    for (sender, to, weight) in [
        ("Amina", "Wakiso", 1.0),
        ("Brian", "Jinja", 1.0),
        ("Amina", "Mbale", 0.5),
    ] {
        let booking = booking(sender, to, weight);
        let quote = estimator.estimate(&booking.request);
        booked.push(book_parcel(&pool, &booking, &quote, &mut rng).await.unwrap());
    }

    let amina = parcels_for_sender(&pool, "Amina").await.unwrap();
    assert_eq!(amina.len(), 2);
    // newest first
    assert_eq!(amina[0].tracking_number, booked[2].tracking_number);
    assert_eq!(amina[1].tracking_number, booked[0].tracking_number);

    // Wakiso: 6000 x1.3 x1.5 = 11700 -> 11; Mbale: 5 units x 0.5 kg = 15000 x1.95 = 29250 -> 29
    assert_eq!(amina[1].cost_units, 11_700);
    assert_eq!(amina[0].cost_units, 29_250);
    assert_eq!(sender_rewards(&pool, "Amina").await.unwrap(), 40);
    assert_eq!(sender_rewards(&pool, "Nobody").await.unwrap(), 0);
}

#[tokio::test]
async fn booking_details_are_kept() {
    let pool = memory_pool().await;
    let estimator = CostEstimator::default();
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let booking = booking("Amina", "Masaka", 2.0)
        .with_phones("0700000000", "0701234567")
        .with_package_type("documents")
        .with_locations("Old Taxi Park", "Nyendo market");
    let quote = estimator.estimate(&booking.request);
    let parcel = book_parcel(&pool, &booking, &quote, &mut rng).await.unwrap();

    assert_eq!(parcel.sender_phone, "0700000000");
    assert_eq!(parcel.recipient_phone, "0701234567");
    assert_eq!(parcel.package_type, "documents");

    let stored = find_parcel(&pool, &parcel.tracking_number).await.unwrap().unwrap();
    let view = TrackingView::from_parcel(&stored);
    assert_eq!(view.parcel_type, "documents");
    assert_eq!(view.pickup_location, "Old Taxi Park");
    assert_eq!(view.delivery_location, "Nyendo market");
}

#[tokio::test]
async fn unusable_weight_is_not_booked() {
    let pool = memory_pool().await;
    let estimator = CostEstimator::default();
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    for weight in [f64::NAN, f64::INFINITY, 0.0, -1.0] {
        let booking = booking("Amina", "Gulu", weight);
        let quote = estimator.estimate(&booking.request);
        let err = book_parcel(&pool, &booking, &quote, &mut rng).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidWeight(_)), "{weight}: {err:?}");
    }
    assert_eq!(count(&pool, "parcels").await, 0);
    assert_eq!(count(&pool, "parcel_status_history").await, 0);
}

#[tokio::test]
async fn tracking_number_collisions_give_up_cleanly() {
    let pool = memory_pool().await;
    let estimator = CostEstimator::default();
    // always draws the same tracking number
    let mut rng = StepRng::new(0, 0);

    let booking = booking("Amina", "Gulu", 1.0);
    let quote = estimator.estimate(&booking.request);
    let first = book_parcel(&pool, &booking, &quote, &mut rng).await.unwrap();
    assert!(number::is_valid(&first.tracking_number));

    let err = book_parcel(&pool, &booking, &quote, &mut rng).await.unwrap_err();
    assert!(matches!(err, LedgerError::TrackingNumbersExhausted(8)), "{err:?}");

    assert_eq!(count(&pool, "parcels").await, 1);
    assert_eq!(count(&pool, "parcel_status_history").await, 1);
    let stored = find_parcel(&pool, &first.tracking_number).await.unwrap().unwrap();
    assert_eq!(stored.history.len(), 1);
}

#[tokio::test]
async fn sender_dashboard_stats() {
    let pool = memory_pool().await;
    let estimator = CostEstimator::default();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    let mut booked = Vec::new();
    for i in 0..12 {
        // Wakiso at 1 kg, medium, express: 11700 each
        let amina = booking("Amina", "Wakiso", 1.0);
        let quote = estimator.estimate(&amina.request);
        booked.push(book_parcel(&pool, &amina, &quote, &mut rng).await.unwrap());
        if i == 0 {
            let other = booking("Brian", "Jinja", 1.0);
            let quote = estimator.estimate(&other.request);
            book_parcel(&pool, &other, &quote, &mut rng).await.unwrap();
        }
    }

    let tn = |i: usize| booked[i].tracking_number.as_str();
    update_status(&pool, tn(0), ParcelStatus::Delivered, "Wakiso", None).await.unwrap();
    update_status(&pool, tn(1), ParcelStatus::Collected, "Kampala", None).await.unwrap();
    update_status(&pool, tn(2), ParcelStatus::Dispatched, "Kampala", None).await.unwrap();
    update_status(&pool, tn(3), ParcelStatus::InTransit, "Nansana", None).await.unwrap();
    update_status(&pool, tn(4), ParcelStatus::OutForDelivery, "Wakiso", None).await.unwrap();

    let stats = sender_stats(&pool, "Amina").await.unwrap();
    assert_eq!(stats.total_parcels, 12);
    assert_eq!(stats.delivered_parcels, 1);
    assert_eq!(stats.in_transit_parcels, 3);
    // out for delivery is in none of the buckets
    assert_eq!(stats.pending_parcels, 7);
    assert_eq!(stats.total_revenue, 12 * 11_700);
    assert_eq!(stats.reward_points, 12 * 11);

    assert_eq!(stats.recent.len(), 10);
    assert_eq!(stats.recent[0].tracking_number, booked[11].tracking_number);
    assert_eq!(stats.recent[9].tracking_number, booked[2].tracking_number);
    assert!(stats.recent.iter().all(|p| p.sender == "Amina"));

    let empty = sender_stats(&pool, "Nobody").await.unwrap();
    assert_eq!(empty.total_parcels, 0);
    assert!(empty.recent.is_empty());
}
