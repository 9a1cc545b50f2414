//! Data models for the Trip Cost Engine.
//!
//! The `models` module defines the serialisable records exchanged with
//! the engine and with the surrounding intake screens: the trip cost
//! inputs and their computed totals, plus the customer, trip,
//! meet‑and‑greet and affiliate records that are stored alongside them.  Field names
//! are serialised in camelCase so that the JSON shape matches the cost
//! data stored by the booking front end.

use serde::{Deserialize, Serialize};

/// Raw inputs for a single trip quotation.
///
/// The engine reads this record but never mutates it.  Rates given in
/// percentage points (`std_grat`, `fuel_surcharge`, `discount`,
/// `gst_tax`) are plain numbers such as `15` for 15%.  Any field left
/// out of an incoming JSON document is treated as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TripCostInputs {
    /// Hourly billing rate.
    pub per_hour_base_rate: f64,
    /// Billed hours.
    pub per_hour_hours: f64,
    /// Per‑mile billing rate.
    pub per_mile_rate: f64,
    /// Billed miles.
    pub per_mile_miles: f64,
    /// Standard gratuity, in percentage points.
    pub std_grat: f64,
    /// Flat parking charge.  Not part of the gratuity base.
    pub parking: f64,
    /// Flat meet‑and‑greet fee.
    pub meet_and_greet: f64,
    /// Overtime / wait charge.  Truncated to a whole number before use.
    pub ot_wait_time: f64,
    /// Number of extra stops.  Truncated to a whole number before use.
    pub extra_stops_count: f64,
    /// Charge per extra stop.
    pub extra_stops_rate: f64,
    /// Fuel surcharge, in percentage points of the hourly and mileage
    /// totals.
    pub fuel_surcharge: f64,
    /// Discount, in percentage points of the hourly total only.
    pub discount: f64,
    /// Sales tax, in percentage points of the pre‑tax subtotal.
    pub gst_tax: f64,
    /// Display label for amounts.  Never used in arithmetic.
    pub currency: String,
}

impl Default for TripCostInputs {
    fn default() -> Self {
        Self {
            per_hour_base_rate: 0.0,
            per_hour_hours: 0.0,
            per_mile_rate: 0.0,
            per_mile_miles: 0.0,
            std_grat: 0.0,
            parking: 0.0,
            meet_and_greet: 0.0,
            ot_wait_time: 0.0,
            extra_stops_count: 0.0,
            extra_stops_rate: 0.0,
            fuel_surcharge: 0.0,
            discount: 0.0,
            gst_tax: 0.0,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

/// Currency label used when a request does not carry one.
pub const DEFAULT_CURRENCY: &str = "CAD";

/// Itemised totals produced by [`crate::engine::compute`].
///
/// Every amount is rounded to two decimal places.  The record has no
/// identity of its own; callers attach it to whatever they store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub per_hour_total: f64,
    pub per_mile_total: f64,
    pub grat_total: f64,
    pub extra_stops_total: f64,
    pub fuel_surcharge_total: f64,
    pub discount_total: f64,
    pub gst_total: f64,
    pub grand_total: f64,
    /// Always zero.  Deposits are not tracked by the engine.
    pub payments_deposits: f64,
    pub total_due: f64,
}

/// Contact and address details captured by the customer intake form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Expected in `XXX-XXX-XXXX` form.
    pub phone: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub postal_code: String,
    pub pickup_address: String,
    pub dropoff_address: String,
}

impl CustomerInfo {
    /// First and last name separated by a single space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// The non‑empty address parts joined into one line.
    pub fn full_address(&self) -> String {
        [
            &self.address_line1,
            &self.address_line2,
            &self.city,
            &self.province,
            &self.country,
            &self.postal_code,
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .map(|part| part.as_str())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Scheduling details for a single trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TripDetails {
    pub pickup_date: String,
    pub pickup_time: String,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub passenger_count: i64,
    pub special_notes: String,
}

impl Default for TripDetails {
    fn default() -> Self {
        Self {
            pickup_date: String::new(),
            pickup_time: String::new(),
            pickup_location: String::new(),
            dropoff_location: String::new(),
            passenger_count: 1,
            special_notes: String::new(),
        }
    }
}

/// Airport meet‑and‑greet details attached to a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeetGreetInfo {
    pub airline_and_flight: String,
    pub arrival_time: String,
    pub passenger_count: i64,
    pub luggage_count: i64,
    pub special_notes: String,
}

impl Default for MeetGreetInfo {
    fn default() -> Self {
        Self {
            airline_and_flight: String::new(),
            arrival_time: String::new(),
            passenger_count: 1,
            luggage_count: 0,
            special_notes: String::new(),
        }
    }
}

impl MeetGreetInfo {
    /// True when nothing beyond the form defaults has been filled in.
    pub fn is_blank(&self) -> bool {
        self.airline_and_flight.is_empty()
            && self.arrival_time.is_empty()
            && self.passenger_count == 1
            && self.luggage_count == 0
    }
}

/// An affiliate operator that trips can be farmed out to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffiliateInfo {
    /// Affiliate or company name.
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// An affiliate as held by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffiliateRecord {
    pub id: String,
    pub affiliate: AffiliateInfo,
}

/// A customer as held by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub id: String,
    pub customer: CustomerInfo,
}

/// A scheduled trip, optionally with meet‑and‑greet details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRecord {
    pub id: String,
    pub customer_id: String,
    pub trip: TripDetails,
    pub meet_and_greet: Option<MeetGreetInfo>,
}

/// Saved cost inputs for a customer together with the totals computed
/// when they were saved, if the caller chose to keep them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripCostRecord {
    pub id: String,
    pub customer_id: String,
    pub inputs: TripCostInputs,
    pub calculations: Option<CalculationResult>,
}
