use fwen::distance::bus_routes::BusRouteTable;
use fwen::distance::catalog::RouteCatalog;
use fwen::pricing::cost::apply_adjustments;
use fwen::pricing::tariff::Tariff;
use fwen::{CostEstimator, PriorityClass, ShipmentRequest, SizeClass};

fn all_districts() -> Vec<String> {
    let mut districts: Vec<String> = RouteCatalog::builtin()
        .districts()
        .into_iter()
        .map(String::from)
        .collect();
    districts.push("Nebbi".to_string());
    districts.push("Kotido".to_string());
    districts
}

#[test]
fn distance_to_self_is_zero() {
    let catalog = RouteCatalog::builtin();
    for district in all_districts() {
        assert_eq!(catalog.estimate_distance(&district, &district), 0.0);
    }
}

#[test]
fn distance_is_symmetric() {
    let catalog = RouteCatalog::builtin();
    let districts = all_districts();
    for a in &districts {
        for b in &districts {
            assert_eq!(
                catalog.estimate_distance(a, b),
                catalog.estimate_distance(b, a),
                "{a} <-> {b}"
            );
        }
    }
}

#[test]
fn minimum_charge_for_short_light_parcel() {
    let estimator = CostEstimator::default();
    for to in ["Wakiso", "Mukono", "Entebbe"] {
        let quote = estimator.estimate(&ShipmentRequest::new("Kampala", to, 1.0));
        assert_eq!(quote.cost_units, 6_000, "Kampala -> {to}");
    }
}

#[test]
fn cost_never_decreases_with_weight() {
    let estimator = CostEstimator::default();
    let routes = [("Kampala", "Wakiso"), ("Jinja", "Gulu"), ("Arua", "Nebbi")];

    for (from, to) in routes {
        for size in SizeClass::ALL {
            for priority in PriorityClass::ALL {
                for insured in [false, true] {
                    let mut previous = 0;
                    for step in 0..=80 {
                        let request = ShipmentRequest::new(from, to, step as f64 * 0.25)
                            .with_size(size)
                            .with_priority(priority)
                            .with_insurance(insured);
                        let cost = estimator.estimate(&request).cost_units;
                        assert!(cost >= previous, "{request:?}: {cost} < {previous}");
                        previous = cost;
                    }
                }
            }
        }
    }
}

#[test]
fn cap_engages_for_large_urgent() {
    let cost = apply_adjustments(
        20_000.0,
        SizeClass::Large,
        PriorityClass::Urgent,
        false,
        &Tariff::default(),
    );
    assert_eq!(cost, 50_000);
}

#[test]
fn cap_absorbs_insurance() {
    let cost = apply_adjustments(
        48_000.0,
        SizeClass::Small,
        PriorityClass::Standard,
        true,
        &Tariff::default(),
    );
    assert_eq!(cost, 50_000);
}

#[test]
fn eta_upper_bound_never_exceeds_fifteen() {
    let estimator = CostEstimator::default();
    let districts = all_districts();
    for a in &districts {
        for b in &districts {
            for priority in PriorityClass::ALL {
                let request = ShipmentRequest::new(a.as_str(), b.as_str(), 1.0).with_priority(priority);
                let eta = estimator.compute_eta(&request);
                assert!(eta.max_hours <= 15, "{a} -> {b} {priority}: {eta}");
                assert!(eta.min_hours <= eta.max_hours);
            }
        }
    }
}

#[test]
fn kampala_to_mbarara_end_to_end() {
    let estimator = CostEstimator::default();
    let request = ShipmentRequest::new("Kampala", "Mbarara", 5.0)
        .with_size(SizeClass::Medium)
        .with_priority(PriorityClass::Express)
        .with_insurance(true);
    let quote = estimator.estimate(&request);
    let b = quote.breakdown;

    assert_eq!(b.distance_km, 266.0);
    assert_eq!(b.distance_units, 6);
    assert_eq!(b.base, 180_000.0);
    assert_eq!(b.floored, 180_000.0);
    assert!((b.after_size - 234_000.0).abs() < 1e-6);
    assert!((b.after_priority - 351_000.0).abs() < 1e-6);
    assert!((b.after_insurance - 355_000.0).abs() < 1e-6);
    assert_eq!(quote.cost_units, 50_000);
    assert_eq!(quote.eta_label, "8-11 hours");
}

#[test]
fn connecting_route_quote() {
    let estimator = CostEstimator::default();
    let request = ShipmentRequest::new("Gulu", "Mbarara", 0.5).with_priority(PriorityClass::Urgent);
    let quote = estimator.estimate(&request);

    // 333 + 266 via Kampala = 599 km, 12 units, 6000*12*0.5 = 36000, x2 -> cap
    assert_eq!(quote.breakdown.distance_km, 599.0);
    assert_eq!(quote.breakdown.distance_units, 12);
    assert_eq!(quote.cost_units, 50_000);
    assert_eq!(quote.eta_label, "4-9 hours (via connecting route)");
}

#[test]
fn csv_overrides_feed_the_estimator() {
    let catalog = RouteCatalog::from_reader("from,to,distance_km\nGulu,Kitgum,98\n".as_bytes())
        .unwrap()
        .with_hub("Gulu");
    let bus_routes = BusRouteTable::from_reader("from,to,operator\n".as_bytes()).unwrap();
    let estimator = CostEstimator::new(catalog, bus_routes);

    let quote = estimator.estimate(&ShipmentRequest::new("Kitgum", "Pader", 1.0));
    // Kitgum -> Gulu 98 + Gulu -> Pader default 200
    assert_eq!(quote.breakdown.distance_km, 298.0);
    assert_eq!(quote.cost_units, 36_000);
    assert!(quote.eta.via_connecting_route);
}
