//! Input checks applied before records reach the engine or the store.
//!
//! The engine itself accepts any number.  Everything that comes in over
//! the API passes through these functions first, and the first failing
//! field is reported.

use crate::models::{AffiliateInfo, CustomerInfo, MeetGreetInfo, TripCostInputs, TripDetails};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{3}-\d{3}-\d{4}$").expect("Invalid phone regex"));

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("{field} must be in format: {expected}")]
    InvalidFormat {
        field: &'static str,
        expected: &'static str,
    },

    #[error("{field} {message}")]
    OutOfRange {
        field: &'static str,
        message: &'static str,
    },
}

/// Rejects non‑finite or negative cost inputs.
pub fn validate_cost_inputs(costs: &TripCostInputs) -> Result<(), ValidationError> {
    let fields = [
        ("perHourBaseRate", costs.per_hour_base_rate),
        ("perHourHours", costs.per_hour_hours),
        ("perMileRate", costs.per_mile_rate),
        ("perMileMiles", costs.per_mile_miles),
        ("stdGrat", costs.std_grat),
        ("parking", costs.parking),
        ("meetAndGreet", costs.meet_and_greet),
        ("otWaitTime", costs.ot_wait_time),
        ("extraStopsCount", costs.extra_stops_count),
        ("extraStopsRate", costs.extra_stops_rate),
        ("fuelSurcharge", costs.fuel_surcharge),
        ("discount", costs.discount),
        ("gstTax", costs.gst_tax),
    ];
    for (field, value) in fields {
        if !value.is_finite() {
            return Err(ValidationError::OutOfRange {
                field,
                message: "must be a number",
            });
        }
        if value < 0.0 {
            return Err(ValidationError::OutOfRange {
                field,
                message: "cannot be negative",
            });
        }
    }
    Ok(())
}

pub fn validate_customer(customer: &CustomerInfo) -> Result<(), ValidationError> {
    let required = [
        ("firstName", &customer.first_name),
        ("lastName", &customer.last_name),
        ("email", &customer.email),
        ("phone", &customer.phone),
        ("addressLine1", &customer.address_line1),
        ("city", &customer.city),
        ("province", &customer.province),
        ("country", &customer.country),
        ("postalCode", &customer.postal_code),
        ("pickupAddress", &customer.pickup_address),
        ("dropoffAddress", &customer.dropoff_address),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingField { field });
        }
    }
    if !EMAIL_PATTERN.is_match(&customer.email) {
        return Err(ValidationError::InvalidFormat {
            field: "email",
            expected: "name@domain.tld",
        });
    }
    if !PHONE_PATTERN.is_match(&customer.phone) {
        return Err(ValidationError::InvalidFormat {
            field: "phone",
            expected: "XXX-XXX-XXXX",
        });
    }
    Ok(())
}

pub fn validate_affiliate(affiliate: &AffiliateInfo) -> Result<(), ValidationError> {
    let required = [
        ("name", &affiliate.name),
        ("email", &affiliate.email),
        ("phone", &affiliate.phone),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingField { field });
        }
    }
    if !EMAIL_PATTERN.is_match(&affiliate.email) {
        return Err(ValidationError::InvalidFormat {
            field: "email",
            expected: "name@domain.tld",
        });
    }
    Ok(())
}

/// The amount paid to an affiliate must be a non‑negative number.
pub fn validate_farm_out_amount(amount: f64) -> Result<(), ValidationError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ValidationError::OutOfRange {
            field: "farmOutAmount",
            message: "must be a non-negative number",
        });
    }
    Ok(())
}

pub fn validate_trip_details(trip: &TripDetails) -> Result<(), ValidationError> {
    let required = [
        ("pickupDate", &trip.pickup_date),
        ("pickupTime", &trip.pickup_time),
        ("pickupLocation", &trip.pickup_location),
        ("dropoffLocation", &trip.dropoff_location),
    ];
    for (field, value) in required {
        if value.is_empty() {
            return Err(ValidationError::MissingField { field });
        }
    }
    if trip.passenger_count < 1 {
        return Err(ValidationError::OutOfRange {
            field: "passengerCount",
            message: "must be at least 1",
        });
    }
    Ok(())
}

/// A blank meet‑and‑greet section is accepted as "not requested".
pub fn validate_meet_greet(info: &MeetGreetInfo) -> Result<(), ValidationError> {
    if info.is_blank() {
        return Ok(());
    }
    if !info.airline_and_flight.is_empty() && info.arrival_time.is_empty() {
        return Err(ValidationError::MissingField {
            field: "arrivalTime",
        });
    }
    if !info.arrival_time.is_empty() && info.airline_and_flight.is_empty() {
        return Err(ValidationError::MissingField {
            field: "airlineAndFlight",
        });
    }
    if info.passenger_count < 1 {
        return Err(ValidationError::OutOfRange {
            field: "passengerCount",
            message: "must be at least 1",
        });
    }
    if info.luggage_count < 0 {
        return Err(ValidationError::OutOfRange {
            field: "luggageCount",
            message: "cannot be negative",
        });
    }
    Ok(())
}
