//! Trip cost computation engine.
//!
//! The `engine` module turns a [`TripCostInputs`] record into an
//! itemised [`CalculationResult`].  Each invoice line is rounded to the
//! cent on its own before it feeds any later line, so the totals match
//! an invoice built up by hand line by line.  The engine holds no state
//! and performs no validation; negative inputs simply produce negative
//! lines.  [`compute_batch`] uses [`rayon`] to price many independent
//! quotes across CPU cores.

use crate::models::{CalculationResult, TripCostInputs};
use rayon::prelude::*;

/// Rounds to two decimal places, half up.
///
/// `f64::EPSILON` is added first so that values such as `1.005`, whose
/// binary representation sits just below the half cent, still round up.
pub fn round_to_two(value: f64) -> f64 {
    round_half_up((value + f64::EPSILON) * 100.0) / 100.0
}

/// Nearest integer, with exact halves going toward positive infinity
/// (`-2.5` becomes `-2`).
fn round_half_up(value: f64) -> f64 {
    let rounded = value.round();
    if value - rounded == 0.5 {
        rounded + 1.0
    } else {
        rounded
    }
}

/// Computes every derived total for one set of trip cost inputs.
pub fn compute(costs: &TripCostInputs) -> CalculationResult {
    let per_hour_total = if costs.per_hour_hours > 0.0 {
        round_to_two(costs.per_hour_hours * costs.per_hour_base_rate)
    } else {
        0.0
    };

    let per_mile_total = if costs.per_mile_miles > 0.0 {
        round_to_two(costs.per_mile_rate * costs.per_mile_miles)
    } else {
        0.0
    };

    // Partial stops and partial wait units are not billed.
    let extra_stops_total =
        round_to_two(costs.extra_stops_count.floor() * costs.extra_stops_rate);
    let ot_wait_time = costs.ot_wait_time.floor();

    // Parking is left out of the gratuity base.
    let gratuitable_amount =
        per_hour_total + per_mile_total + ot_wait_time + extra_stops_total + costs.meet_and_greet;
    let grat_total = round_to_two(gratuitable_amount * costs.std_grat / 100.0);

    let fuel_surcharge_total =
        round_to_two((per_hour_total + per_mile_total) * costs.fuel_surcharge / 100.0);

    // Only the hourly charge is discounted.
    let discount_total = round_to_two(per_hour_total * costs.discount / 100.0);

    let subtotal_before_tax = round_to_two(
        per_hour_total
            + per_mile_total
            + grat_total
            + costs.parking
            + costs.meet_and_greet
            + ot_wait_time
            + extra_stops_total
            + fuel_surcharge_total
            - discount_total,
    );

    let gst_total = round_to_two(subtotal_before_tax * costs.gst_tax / 100.0);
    let grand_total = round_to_two(subtotal_before_tax + gst_total);

    CalculationResult {
        per_hour_total,
        per_mile_total,
        grat_total,
        extra_stops_total,
        fuel_surcharge_total,
        discount_total,
        gst_total,
        grand_total,
        payments_deposits: 0.0,
        total_due: round_to_two(grand_total),
    }
}

/// Computes a list of independent quotes in parallel.
///
/// Results are returned in the same order as `inputs`.
pub fn compute_batch(inputs: &[TripCostInputs]) -> Vec<CalculationResult> {
    inputs.par_iter().map(compute).collect()
}
