//! HTTP API for the Trip Cost Engine.
//!
//! This module exposes a small REST API around the calculation engine
//! using the [`axum`](https://crates.io/crates/axum) framework.  Clients
//! can price a trip, register customers and their trips, save quoted
//! costs against a customer, have an invoice sent and farm a customer's
//! trip out to an affiliate operator.  Storage and
//! invoice delivery go through the [`RecordStore`] and
//! [`InvoiceNotifier`] traits held in [`AppState`].

use crate::config::Config;
use crate::engine::{compute, compute_batch};
use crate::error::ApiError;
use crate::invoice::{FarmOut, Invoice, InvoiceNotifier, TracingNotifier};
use crate::models::{
    AffiliateInfo, AffiliateRecord, CalculationResult, CustomerInfo, CustomerRecord, MeetGreetInfo,
    TripCostInputs, TripCostRecord, TripDetails, TripRecord,
};
use crate::store::{InMemoryStore, RecordStore};
use crate::validation::{
    validate_affiliate, validate_cost_inputs, validate_customer, validate_farm_out_amount,
    validate_meet_greet, validate_trip_details,
};
use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Application state shared across requests.
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub notifier: Arc<dyn InvoiceNotifier>,
    pub default_currency: String,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RecordStore>,
        notifier: Arc<dyn InvoiceNotifier>,
        default_currency: impl Into<String>,
    ) -> Self {
        Self {
            store,
            notifier,
            default_currency: default_currency.into(),
        }
    }

    /// Fills an empty currency label and validates the inputs.
    fn prepare(&self, mut inputs: TripCostInputs) -> Result<TripCostInputs, ApiError> {
        if inputs.currency.trim().is_empty() {
            inputs.currency = self.default_currency.clone();
        }
        validate_cost_inputs(&inputs)?;
        Ok(inputs)
    }

    fn customer(&self, id: &str) -> Result<CustomerRecord, ApiError> {
        self.store
            .get_customer(id)?
            .ok_or_else(|| ApiError::NotFound(format!("customer {id} not found")))
    }

    fn affiliate(&self, id: &str) -> Result<AffiliateRecord, ApiError> {
        self.store
            .get_affiliate(id)?
            .ok_or_else(|| ApiError::NotFound(format!("affiliate {id} not found")))
    }
}

/// `?name=` filter shared by the customer and affiliate searches.
#[derive(Debug, Deserialize)]
pub struct NameSearch {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrip {
    pub trip: TripDetails,
    #[serde(default)]
    pub meet_and_greet: Option<MeetGreetInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSent {
    pub recipient: String,
    pub trip_cost_id: String,
    pub calculations: CalculationResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmOutRequest {
    pub customer_id: String,
    pub farm_out_amount: f64,
    #[serde(default)]
    pub currency: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmOutSent {
    pub recipient: String,
    pub affiliate_id: String,
    pub customer_id: String,
    pub farm_out_amount: f64,
}

/// Build the API router around the given state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/calculate", post(calculate_handler))
        .route("/api/calculate/batch", post(calculate_batch_handler))
        .route(
            "/api/customers",
            post(create_customer_handler).get(search_customers_handler),
        )
        .route("/api/customers/:id", get(get_customer_handler))
        .route(
            "/api/customers/:id/trips",
            post(create_trip_handler).get(list_trips_handler),
        )
        .route(
            "/api/customers/:id/trip-costs",
            post(save_trip_costs_handler).get(list_trip_costs_handler),
        )
        .route("/api/customers/:id/invoice", post(send_invoice_handler))
        .route(
            "/api/affiliates",
            post(create_affiliate_handler).get(search_affiliates_handler),
        )
        .route("/api/affiliates/:id/farm-out", post(farm_out_handler))
        .with_state(state)
}

/// Handler for POST /api/calculate
pub async fn calculate_handler(
    State(state): State<Arc<AppState>>,
    Json(inputs): Json<TripCostInputs>,
) -> Result<Json<CalculationResult>, ApiError> {
    let inputs = state.prepare(inputs)?;
    let result = compute(&inputs);
    debug!(grand_total = result.grand_total, "quote computed");
    Ok(Json(result))
}

/// Handler for POST /api/calculate/batch
pub async fn calculate_batch_handler(
    State(state): State<Arc<AppState>>,
    Json(inputs): Json<Vec<TripCostInputs>>,
) -> Result<Json<Vec<CalculationResult>>, ApiError> {
    let inputs = inputs
        .into_iter()
        .map(|i| state.prepare(i))
        .collect::<Result<Vec<_>, _>>()?;
    let results = tokio::task::spawn_blocking(move || compute_batch(&inputs))
        .await
        .map_err(|err| ApiError::Internal(format!("batch worker failed: {err}")))?;
    debug!(count = results.len(), "batch computed");
    Ok(Json(results))
}

/// Handler for POST /api/customers
pub async fn create_customer_handler(
    State(state): State<Arc<AppState>>,
    Json(customer): Json<CustomerInfo>,
) -> Result<(StatusCode, Json<CustomerRecord>), ApiError> {
    validate_customer(&customer)?;
    let record = state.store.insert_customer(customer)?;
    info!(customer_id = %record.id, "customer created");
    Ok((StatusCode::CREATED, Json(record)))
}

/// Handler for GET /api/customers?name=
pub async fn search_customers_handler(
    State(state): State<Arc<AppState>>,
    Query(search): Query<NameSearch>,
) -> Result<Json<Vec<CustomerRecord>>, ApiError> {
    Ok(Json(state.store.search_customers(search.name.trim())?))
}

/// Handler for GET /api/customers/:id
pub async fn get_customer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CustomerRecord>, ApiError> {
    Ok(Json(state.customer(&id)?))
}

/// Handler for POST /api/customers/:id/trips
pub async fn create_trip_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<NewTrip>,
) -> Result<(StatusCode, Json<TripRecord>), ApiError> {
    validate_trip_details(&body.trip)?;
    let meet_and_greet = match body.meet_and_greet {
        Some(info) if info.is_blank() => None,
        Some(info) => {
            validate_meet_greet(&info)?;
            Some(info)
        }
        None => None,
    };
    let record = state.store.insert_trip(&id, body.trip, meet_and_greet)?;
    info!(customer_id = %id, trip_id = %record.id, "trip saved");
    Ok((StatusCode::CREATED, Json(record)))
}

/// Handler for GET /api/customers/:id/trips
pub async fn list_trips_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<TripRecord>>, ApiError> {
    state.customer(&id)?;
    Ok(Json(state.store.trips_for(&id)?))
}

/// Handler for POST /api/customers/:id/trip-costs
///
/// Saves the inputs together with a snapshot of the totals computed
/// from them.
pub async fn save_trip_costs_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(inputs): Json<TripCostInputs>,
) -> Result<(StatusCode, Json<TripCostRecord>), ApiError> {
    let inputs = state.prepare(inputs)?;
    let result = compute(&inputs);
    let record = state.store.insert_trip_costs(&id, inputs, Some(result))?;
    info!(customer_id = %id, trip_cost_id = %record.id, total_due = result.total_due, "trip costs saved");
    Ok((StatusCode::CREATED, Json(record)))
}

/// Handler for GET /api/customers/:id/trip-costs
pub async fn list_trip_costs_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<TripCostRecord>>, ApiError> {
    state.customer(&id)?;
    Ok(Json(state.store.trip_costs_for(&id)?))
}

/// Handler for POST /api/customers/:id/invoice
///
/// Totals are recomputed from the latest saved inputs rather than taken
/// from the stored snapshot.
pub async fn send_invoice_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<InvoiceSent>, ApiError> {
    let customer = state.customer(&id)?;
    let saved = state
        .store
        .latest_trip_costs(&id)?
        .ok_or_else(|| ApiError::NotFound(format!("no trip costs saved for customer {id}")))?;
    let calculations = compute(&saved.inputs);
    Invoice::new(&customer.customer, &saved.inputs, &calculations).send(state.notifier.as_ref())?;
    info!(customer_id = %id, trip_cost_id = %saved.id, "invoice sent");
    Ok(Json(InvoiceSent {
        recipient: customer.customer.email,
        trip_cost_id: saved.id,
        calculations,
    }))
}

/// Handler for POST /api/affiliates
pub async fn create_affiliate_handler(
    State(state): State<Arc<AppState>>,
    Json(affiliate): Json<AffiliateInfo>,
) -> Result<(StatusCode, Json<AffiliateRecord>), ApiError> {
    validate_affiliate(&affiliate)?;
    let record = state.store.insert_affiliate(affiliate)?;
    info!(affiliate_id = %record.id, "affiliate created");
    Ok((StatusCode::CREATED, Json(record)))
}

/// Handler for GET /api/affiliates?name=
pub async fn search_affiliates_handler(
    State(state): State<Arc<AppState>>,
    Query(search): Query<NameSearch>,
) -> Result<Json<Vec<AffiliateRecord>>, ApiError> {
    Ok(Json(state.store.search_affiliates(search.name.trim())?))
}

/// Handler for POST /api/affiliates/:id/farm-out
///
/// The meet‑and‑greet details come from the customer's most recent trip
/// that has them.
pub async fn farm_out_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<FarmOutRequest>,
) -> Result<Json<FarmOutSent>, ApiError> {
    validate_farm_out_amount(request.farm_out_amount)?;
    let affiliate = state.affiliate(&id)?;
    let customer = state.customer(&request.customer_id)?;
    let meet_and_greet = state
        .store
        .trips_for(&customer.id)?
        .into_iter()
        .rev()
        .find_map(|trip| trip.meet_and_greet);
    let currency = if request.currency.trim().is_empty() {
        state.default_currency.as_str()
    } else {
        request.currency.as_str()
    };
    FarmOut {
        affiliate: &affiliate.affiliate,
        customer: &customer.customer,
        meet_and_greet: meet_and_greet.as_ref(),
        amount: request.farm_out_amount,
        currency,
    }
    .send(state.notifier.as_ref())?;
    info!(
        affiliate_id = %id,
        customer_id = %customer.id,
        amount = request.farm_out_amount,
        "trip farmed out"
    );
    Ok(Json(FarmOutSent {
        recipient: affiliate.affiliate.email,
        affiliate_id: affiliate.id,
        customer_id: customer.id,
        farm_out_amount: request.farm_out_amount,
    }))
}

/// Launch the API server.  Builds an in‑memory store and a logging
/// notifier, binds to the configured address and blocks until the
/// server terminates.
pub async fn serve(config: Config) -> Result<()> {
    let state = Arc::new(AppState::new(
        Arc::new(InMemoryStore::new()),
        Arc::new(TracingNotifier),
        config.default_currency,
    ));
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "server listening");
    axum::serve(listener, router).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::NotifyError;
    use std::sync::Mutex;

    /// Recipient and body of every message sent.
    #[derive(Default)]
    struct Outbox(Mutex<Vec<(String, String)>>);

    impl Outbox {
        fn recipients(&self) -> Vec<String> {
            self.0.lock().unwrap().iter().map(|(to, _)| to.clone()).collect()
        }
    }

    impl InvoiceNotifier for Outbox {
        fn send(&self, recipient: &str, _subject: &str, body: &str) -> Result<(), NotifyError> {
            self.0
                .lock()
                .unwrap()
                .push((recipient.to_string(), body.to_string()));
            Ok(())
        }
    }

    fn state_with(outbox: Arc<Outbox>) -> Arc<AppState> {
        Arc::new(AppState::new(Arc::new(InMemoryStore::new()), outbox, "CAD"))
    }

    fn customer() -> CustomerInfo {
        CustomerInfo {
            first_name: "Dana".into(),
            last_name: "Reyes".into(),
            email: "dana.reyes@example.com".into(),
            phone: "416-555-0199".into(),
            address_line1: "12 King St".into(),
            city: "Toronto".into(),
            province: "ON".into(),
            country: "Canada".into(),
            postal_code: "M5H 1A1".into(),
            pickup_address: "12 King St".into(),
            dropoff_address: "Pearson Airport".into(),
            ..Default::default()
        }
    }

    fn hourly(rate: f64, hours: f64) -> TripCostInputs {
        TripCostInputs {
            per_hour_base_rate: rate,
            per_hour_hours: hours,
            currency: String::new(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_calculate_rejects_negative_inputs() {
        let state = state_with(Arc::default());
        let err = calculate_handler(State(state), Json(hourly(-5.0, 2.0)))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_calculate_batch() {
        let state = state_with(Arc::default());
        let Json(results) =
            calculate_batch_handler(State(state), Json(vec![hourly(40.0, 2.0), hourly(60.0, 1.5)]))
                .await
                .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].total_due, 80.0);
        assert_eq!(results[1].total_due, 90.0);
    }

    #[tokio::test]
    async fn test_save_costs_and_send_invoice() {
        let outbox = Arc::new(Outbox::default());
        let state = state_with(outbox.clone());

        let (status, Json(created)) = create_customer_handler(State(state.clone()), Json(customer()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let (_, Json(saved)) = save_trip_costs_handler(
            State(state.clone()),
            Path(created.id.clone()),
            Json(hourly(75.0, 4.0)),
        )
        .await
        .unwrap();
        assert_eq!(saved.inputs.currency, "CAD");
        assert_eq!(saved.calculations.map(|c| c.total_due), Some(300.0));

        let Json(sent) = send_invoice_handler(State(state.clone()), Path(created.id.clone()))
            .await
            .unwrap();
        assert_eq!(sent.recipient, "dana.reyes@example.com");
        assert_eq!(sent.trip_cost_id, saved.id);
        assert_eq!(outbox.recipients(), vec!["dana.reyes@example.com".to_string()]);

        let Json(listed) = list_trip_costs_handler(State(state), Path(created.id))
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_invoice_without_saved_costs() {
        let state = state_with(Arc::default());
        let (_, Json(created)) = create_customer_handler(State(state.clone()), Json(customer()))
            .await
            .unwrap();
        let err = send_invoice_handler(State(state), Path(created.id))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_customer_rejected() {
        let state = state_with(Arc::default());
        let bad = CustomerInfo {
            phone: "4165550199".into(),
            ..customer()
        };
        let err = create_customer_handler(State(state), Json(bad))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "phone must be in format: XXX-XXX-XXXX");
    }

    #[tokio::test]
    async fn test_trip_for_unknown_customer() {
        let state = state_with(Arc::default());
        let body = NewTrip {
            trip: TripDetails {
                pickup_date: "2026-11-02".into(),
                pickup_time: "07:30".into(),
                pickup_location: "12 King St".into(),
                dropoff_location: "Pearson Airport".into(),
                ..Default::default()
            },
            meet_and_greet: Some(MeetGreetInfo::default()),
        };
        let err = create_trip_handler(State(state), Path("nobody".into()), Json(body))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_search_customers() {
        let state = state_with(Arc::default());
        let (status, _) = create_customer_handler(State(state.clone()), Json(customer()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        let Json(found) = search_customers_handler(
            State(state),
            Query(NameSearch {
                name: " reyes ".into(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].customer.full_name(), "Dana Reyes");
    }

    fn airport_trip() -> TripDetails {
        TripDetails {
            pickup_date: "2026-11-02".into(),
            pickup_time: "07:30".into(),
            pickup_location: "Pearson Airport".into(),
            dropoff_location: "12 King St".into(),
            ..Default::default()
        }
    }

    fn flight() -> MeetGreetInfo {
        MeetGreetInfo {
            airline_and_flight: "AC 101".into(),
            arrival_time: "07:05".into(),
            passenger_count: 2,
            luggage_count: 3,
            ..Default::default()
        }
    }

    fn affiliate() -> AffiliateInfo {
        AffiliateInfo {
            name: "Lakeshore Limo".into(),
            email: "dispatch@lakeshore.example".into(),
            phone: "905-555-0142".into(),
        }
    }

    #[tokio::test]
    async fn test_trips_listed_with_meet_and_greet() {
        let state = state_with(Arc::default());
        let (_, Json(created)) = create_customer_handler(State(state.clone()), Json(customer()))
            .await
            .unwrap();
        let body = NewTrip {
            trip: airport_trip(),
            meet_and_greet: Some(flight()),
        };
        let (status, _) =
            create_trip_handler(State(state.clone()), Path(created.id.clone()), Json(body))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(trips) = list_trips_handler(State(state.clone()), Path(created.id))
            .await
            .unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].trip.pickup_location, "Pearson Airport");
        assert_eq!(trips[0].meet_and_greet, Some(flight()));

        let err = list_trips_handler(State(state), Path("nobody".into()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_affiliates_created_and_searched() {
        let state = state_with(Arc::default());
        let (status, Json(record)) =
            create_affiliate_handler(State(state.clone()), Json(affiliate()))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(found) = search_affiliates_handler(
            State(state.clone()),
            Query(NameSearch {
                name: "lakeshore".into(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(found, vec![record]);

        let no_email = AffiliateInfo {
            email: String::new(),
            ..affiliate()
        };
        let err = create_affiliate_handler(State(state), Json(no_email))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "email is required");
    }

    #[tokio::test]
    async fn test_farm_out_sends_trip_to_affiliate() {
        let outbox = Arc::new(Outbox::default());
        let state = state_with(outbox.clone());
        let (_, Json(created)) = create_customer_handler(State(state.clone()), Json(customer()))
            .await
            .unwrap();
        let body = NewTrip {
            trip: airport_trip(),
            meet_and_greet: Some(flight()),
        };
        let (status, _) =
            create_trip_handler(State(state.clone()), Path(created.id.clone()), Json(body))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        let (_, Json(operator)) = create_affiliate_handler(State(state.clone()), Json(affiliate()))
            .await
            .unwrap();

        let request = FarmOutRequest {
            customer_id: created.id.clone(),
            farm_out_amount: 145.5,
            currency: String::new(),
        };
        let Json(sent) = farm_out_handler(State(state), Path(operator.id.clone()), Json(request))
            .await
            .unwrap();
        assert_eq!(sent.recipient, "dispatch@lakeshore.example");
        assert_eq!(sent.customer_id, created.id);

        let messages = outbox.0.lock().unwrap();
        assert_eq!(messages.len(), 1);
        let (to, body) = &messages[0];
        assert_eq!(to, "dispatch@lakeshore.example");
        assert!(body.contains("Pickup: 12 King St"));
        assert!(body.contains("Dropoff: Pearson Airport"));
        assert!(body.contains("Flight: AC 101"));
        assert!(body.contains("Farm-out amount: 145.50 CAD"));
    }

    #[tokio::test]
    async fn test_farm_out_rejects_bad_requests() {
        let state = state_with(Arc::default());
        let (_, Json(created)) = create_customer_handler(State(state.clone()), Json(customer()))
            .await
            .unwrap();

        let unknown_affiliate = FarmOutRequest {
            customer_id: created.id.clone(),
            farm_out_amount: 100.0,
            currency: "CAD".into(),
        };
        let err = farm_out_handler(
            State(state.clone()),
            Path("missing".into()),
            Json(unknown_affiliate),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let (_, Json(operator)) = create_affiliate_handler(State(state.clone()), Json(affiliate()))
            .await
            .unwrap();
        let negative = FarmOutRequest {
            customer_id: created.id,
            farm_out_amount: -20.0,
            currency: "CAD".into(),
        };
        let err = farm_out_handler(State(state), Path(operator.id), Json(negative))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
