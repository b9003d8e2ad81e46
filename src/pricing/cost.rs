use crate::distance::catalog::RouteCatalog;
use crate::domain::types::{CostBreakdown, PriorityClass, ShipmentRequest, SizeClass};
use crate::pricing::tariff::Tariff;

/// Amounts after each post-floor step, in order.
struct Adjusted {
    after_size: f64,
    after_priority: f64,
    after_insurance: f64,
    capped: f64,
}

/// Price a shipment. Steps run in a fixed order: bucket the distance, linear
/// base, minimum charge, size, priority, insurance surcharge, cap, rounding.
pub fn compute_cost(request: &ShipmentRequest, catalog: &RouteCatalog, tariff: &Tariff) -> CostBreakdown {
    let distance_km = catalog.estimate_distance(&request.origin, &request.destination);
    let distance_units = distance_units(distance_km, tariff);
    let weight = billable_weight(request.weight_kg);

    let base = if distance_units == 0 {
        0.0
    } else {
        tariff.rate_per_unit_per_kg * distance_units as f64 * weight
    };
    let floored = base.max(tariff.minimum_charge);
    let adjusted = adjust(floored, request.size, request.priority, request.insured, tariff);

    CostBreakdown {
        distance_km,
        distance_units,
        base,
        floored,
        after_size: adjusted.after_size,
        after_priority: adjusted.after_priority,
        after_insurance: adjusted.after_insurance,
        capped: adjusted.capped,
        cost_units: to_units(adjusted.capped),
    }
}

/// Steps after the minimum charge, applied to an already floored amount.
pub fn apply_adjustments(
    floored: f64,
    size: SizeClass,
    priority: PriorityClass,
    insured: bool,
    tariff: &Tariff,
) -> u64 {
    to_units(adjust(floored, size, priority, insured, tariff).capped)
}

/// Number of started distance buckets.
pub fn distance_units(distance_km: f64, tariff: &Tariff) -> u64 {
    (distance_km / tariff.distance_unit_km).ceil() as u64
}

// NaN and negative weights bill as zero, which lands on the minimum charge.
// Infinity stays, so it runs into the cap like any other huge weight.
fn billable_weight(weight_kg: f64) -> f64 {
    if weight_kg > 0.0 {
        weight_kg
    } else {
        0.0
    }
}

fn adjust(
    floored: f64,
    size: SizeClass,
    priority: PriorityClass,
    insured: bool,
    tariff: &Tariff,
) -> Adjusted {
    let after_size = floored * tariff.size_multiplier(size);
    let after_priority = after_size * tariff.priority_multiplier(priority);
    let after_insurance = if insured {
        after_priority + tariff.insurance_surcharge
    } else {
        after_priority
    };
    let capped = after_insurance.min(tariff.maximum_charge);

    Adjusted {
        after_size,
        after_priority,
        after_insurance,
        capped,
    }
}

fn to_units(amount: f64) -> u64 {
    amount.round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(request: &ShipmentRequest) -> CostBreakdown {
        compute_cost(request, RouteCatalog::builtin(), &Tariff::default())
    }

    #[test]
    fn short_light_parcel_pays_minimum_charge() {
        let breakdown = quote(&ShipmentRequest::new("Kampala", "Wakiso", 1.0));
        assert_eq!(breakdown.distance_units, 1);
        assert_eq!(breakdown.base, 6_000.0);
        assert_eq!(breakdown.cost_units, 6_000);

        let breakdown = quote(&ShipmentRequest::new("Kampala", "Wakiso", 0.2));
        assert!(breakdown.base < 6_000.0);
        assert_eq!(breakdown.floored, 6_000.0);
        assert_eq!(breakdown.cost_units, 6_000);
    }

    #[test]
    fn partial_bucket_counts_as_full() {
        let tariff = Tariff::default();
        assert_eq!(distance_units(0.0, &tariff), 0);
        assert_eq!(distance_units(50.0, &tariff), 1);
        assert_eq!(distance_units(50.5, &tariff), 2);
        assert_eq!(distance_units(266.0, &tariff), 6);
    }

    #[test]
    fn multipliers_apply_after_floor() {
        // floored at 6000, then x1.3 x1.5
        let request = ShipmentRequest::new("Kampala", "Entebbe", 0.5)
            .with_size(SizeClass::Medium)
            .with_priority(PriorityClass::Express);
        let breakdown = quote(&request);
        assert_eq!(breakdown.floored, 6_000.0);
        assert_eq!(breakdown.cost_units, 11_700);
    }

    #[test]
    fn insurance_is_additive() {
        let request = ShipmentRequest::new("Kampala", "Mukono", 1.0)
            .with_priority(PriorityClass::Urgent)
            .with_insurance(true);
        // 6000 x2 + 4000
        assert_eq!(quote(&request).cost_units, 16_000);
    }

    #[test]
    fn cap_engages_after_multipliers() {
        let tariff = Tariff::default();
        let cost = apply_adjustments(20_000.0, SizeClass::Large, PriorityClass::Urgent, false, &tariff);
        assert_eq!(cost, 50_000);
    }

    #[test]
    fn cap_absorbs_insurance_surcharge() {
        let tariff = Tariff::default();
        let uninsured = apply_adjustments(48_000.0, SizeClass::Small, PriorityClass::Standard, false, &tariff);
        let insured = apply_adjustments(48_000.0, SizeClass::Small, PriorityClass::Standard, true, &tariff);
        assert_eq!(uninsured, 48_000);
        assert_eq!(insured, 50_000);
    }

    #[test]
    fn unusable_weights_degrade_to_minimum() {
        for weight in [0.0, -4.0, f64::NAN, f64::NEG_INFINITY] {
            let breakdown = quote(&ShipmentRequest::new("Kampala", "Gulu", weight));
            assert_eq!(breakdown.cost_units, 6_000, "weight {weight}");
        }
    }

    #[test]
    fn infinite_weight_hits_the_cap() {
        let huge = quote(&ShipmentRequest::new("Kampala", "Gulu", 1e300));
        let infinite = quote(&ShipmentRequest::new("Kampala", "Gulu", f64::INFINITY));
        assert_eq!(huge.cost_units, 50_000);
        assert_eq!(infinite.cost_units, 50_000);

        // no distance buckets: nothing to multiply, minimum charge
        let local = quote(&ShipmentRequest::new("Gulu", "Gulu", f64::INFINITY));
        assert_eq!(local.base, 0.0);
        assert_eq!(local.cost_units, 6_000);
    }

    #[test]
    fn rounding_goes_to_nearest_unit() {
        // 6000 x 1 x 1.15 = 6900, x1.3 = 8970
        let request = ShipmentRequest::new("Kampala", "Wakiso", 1.15).with_size(SizeClass::Medium);
        assert_eq!(quote(&request).cost_units, 8_970);
    }
}
