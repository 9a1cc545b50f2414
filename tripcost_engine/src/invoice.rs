//! Invoice formatting and dispatch.
//!
//! An [`Invoice`] pairs the cost inputs with the totals the engine
//! produced for them and renders a plain‑text message.  A [`FarmOut`]
//! carries the pickup, dropoff and meet‑and‑greet details of a trip to
//! an affiliate operator.  Delivery goes through the [`InvoiceNotifier`]
//! trait so that a mail transport can be plugged in without touching the
//! API handlers.

use crate::models::{
    AffiliateInfo, CalculationResult, CustomerInfo, MeetGreetInfo, TripCostInputs,
};
use std::fmt;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("recipient has no email address")]
    MissingRecipient,

    #[error("failed to deliver invoice: {0}")]
    Delivery(String),
}

/// Delivers a rendered invoice to a recipient.
pub trait InvoiceNotifier: Send + Sync {
    fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// Writes each invoice to the log instead of sending mail.
pub struct TracingNotifier;

impl InvoiceNotifier for TracingNotifier {
    fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        if recipient.trim().is_empty() {
            return Err(NotifyError::MissingRecipient);
        }
        info!(recipient, subject, bytes = body.len(), "invoice dispatched");
        Ok(())
    }
}

pub struct Invoice<'a> {
    pub customer: &'a CustomerInfo,
    pub inputs: &'a TripCostInputs,
    pub calculations: &'a CalculationResult,
}

impl<'a> Invoice<'a> {
    pub fn new(
        customer: &'a CustomerInfo,
        inputs: &'a TripCostInputs,
        calculations: &'a CalculationResult,
    ) -> Self {
        Self {
            customer,
            inputs,
            calculations,
        }
    }

    pub fn subject(&self) -> String {
        format!("Trip invoice for {}", self.customer.full_name())
    }

    /// Renders the invoice body.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Renders and sends the invoice to the customer's email address.
    pub fn send(&self, notifier: &dyn InvoiceNotifier) -> Result<(), NotifyError> {
        if self.customer.email.trim().is_empty() {
            return Err(NotifyError::MissingRecipient);
        }
        notifier.send(&self.customer.email, &self.subject(), &self.render())
    }
}

/// Every amount carries two decimals and the currency label of the
/// inputs.
impl fmt::Display for Invoice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.inputs;
        let t = self.calculations;
        let cur = c.currency.as_str();
        let money = |amount: f64| format!("{amount:.2} {cur}");

        writeln!(f, "Invoice for {}", self.customer.full_name())?;
        let address = self.customer.full_address();
        if !address.is_empty() {
            writeln!(f, "{address}")?;
        }
        if !self.customer.phone.is_empty() {
            writeln!(f, "Phone: {}", self.customer.phone)?;
        }
        writeln!(f)?;

        let lines = [
            (
                format!("Hourly ({} h @ {})", c.per_hour_hours, money(c.per_hour_base_rate)),
                t.per_hour_total,
            ),
            (
                format!("Mileage ({} mi @ {})", c.per_mile_miles, money(c.per_mile_rate)),
                t.per_mile_total,
            ),
            (format!("Gratuity ({}%)", c.std_grat), t.grat_total),
            ("Parking".to_string(), c.parking),
            ("Meet & greet".to_string(), c.meet_and_greet),
            ("OT / wait time".to_string(), c.ot_wait_time.floor()),
            (
                format!(
                    "Extra stops ({} @ {})",
                    c.extra_stops_count.floor(),
                    money(c.extra_stops_rate)
                ),
                t.extra_stops_total,
            ),
            (format!("Fuel surcharge ({}%)", c.fuel_surcharge), t.fuel_surcharge_total),
            (format!("Discount ({}%)", c.discount), 0.0 - t.discount_total),
            (format!("GST ({}%)", c.gst_tax), t.gst_total),
        ];
        for (label, amount) in lines {
            writeln!(f, "{label:<40} {:>16}", money(amount))?;
        }
        writeln!(f)?;
        writeln!(f, "{:<40} {:>16}", "Grand total", money(t.grand_total))?;
        writeln!(f, "{:<40} {:>16}", "Payments / deposits", money(t.payments_deposits))?;
        writeln!(f, "{:<40} {:>16}", "Total due", money(t.total_due))
    }
}

/// Hands a trip over to an affiliate operator for a fixed amount.
pub struct FarmOut<'a> {
    pub affiliate: &'a AffiliateInfo,
    pub customer: &'a CustomerInfo,
    pub meet_and_greet: Option<&'a MeetGreetInfo>,
    pub amount: f64,
    pub currency: &'a str,
}

impl FarmOut<'_> {
    pub fn subject(&self) -> String {
        format!("Farm-out: {}", self.customer.full_name())
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Sends the farm‑out details to the affiliate's email address.
    pub fn send(&self, notifier: &dyn InvoiceNotifier) -> Result<(), NotifyError> {
        if self.affiliate.email.trim().is_empty() {
            return Err(NotifyError::MissingRecipient);
        }
        notifier.send(&self.affiliate.email, &self.subject(), &self.render())
    }
}

impl fmt::Display for FarmOut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Hello {},", self.affiliate.name)?;
        writeln!(f)?;
        writeln!(f, "Customer: {}", self.customer.full_name())?;
        writeln!(f, "Pickup: {}", self.customer.pickup_address)?;
        writeln!(f, "Dropoff: {}", self.customer.dropoff_address)?;
        if let Some(mg) = self.meet_and_greet {
            writeln!(f, "Flight: {}", mg.airline_and_flight)?;
            writeln!(f, "Arrival: {}", mg.arrival_time)?;
            writeln!(f, "Passengers: {}", mg.passenger_count)?;
            writeln!(f, "Luggage: {}", mg.luggage_count)?;
            if !mg.special_notes.is_empty() {
                writeln!(f, "Notes: {}", mg.special_notes)?;
            }
        }
        writeln!(f)?;
        writeln!(f, "Farm-out amount: {:.2} {}", self.amount, self.currency)
    }
}
