//! Record store abstraction.
//!
//! The `store` module defines the [`RecordStore`] trait through which the
//! API persists customers, trips, saved trip costs and affiliates,
//! together with an in‑memory implementation.  A database‑backed store only needs to
//! implement the trait; nothing else in the crate depends on how records
//! are kept.

use crate::models::{
    AffiliateInfo, AffiliateRecord, CalculationResult, CustomerInfo, CustomerRecord, MeetGreetInfo,
    TripCostInputs, TripCostRecord, TripDetails, TripRecord,
};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("customer {0} not found")]
    UnknownCustomer(String),

    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence for intake records.
///
/// Stores must be thread‑safe (`Send + Sync`) because the HTTP handlers
/// share a single instance across requests.
pub trait RecordStore: Send + Sync {
    fn insert_customer(&self, customer: CustomerInfo) -> Result<CustomerRecord, StoreError>;

    fn get_customer(&self, id: &str) -> Result<Option<CustomerRecord>, StoreError>;

    /// Customers whose full name contains `name`, ignoring case, ordered
    /// by full name.  An empty `name` lists everyone.
    fn search_customers(&self, name: &str) -> Result<Vec<CustomerRecord>, StoreError>;

    fn insert_trip(
        &self,
        customer_id: &str,
        trip: TripDetails,
        meet_and_greet: Option<MeetGreetInfo>,
    ) -> Result<TripRecord, StoreError>;

    /// Trips saved for a customer, oldest first.
    fn trips_for(&self, customer_id: &str) -> Result<Vec<TripRecord>, StoreError>;

    fn insert_trip_costs(
        &self,
        customer_id: &str,
        inputs: TripCostInputs,
        calculations: Option<CalculationResult>,
    ) -> Result<TripCostRecord, StoreError>;

    /// Saved trip costs for a customer, oldest first.
    fn trip_costs_for(&self, customer_id: &str) -> Result<Vec<TripCostRecord>, StoreError>;

    /// The most recently saved trip costs for a customer, if any.
    fn latest_trip_costs(&self, customer_id: &str) -> Result<Option<TripCostRecord>, StoreError> {
        Ok(self.trip_costs_for(customer_id)?.pop())
    }

    fn insert_affiliate(&self, affiliate: AffiliateInfo) -> Result<AffiliateRecord, StoreError>;

    fn get_affiliate(&self, id: &str) -> Result<Option<AffiliateRecord>, StoreError>;

    /// Affiliates whose name contains `name`, ignoring case, ordered by
    /// name.
    fn search_affiliates(&self, name: &str) -> Result<Vec<AffiliateRecord>, StoreError>;
}

#[derive(Default)]
struct Tables {
    customers: HashMap<String, CustomerRecord>,
    trips: Vec<TripRecord>,
    trip_costs: Vec<TripCostRecord>,
    affiliates: HashMap<String, AffiliateRecord>,
}

/// A [`RecordStore`] held entirely in process memory.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|err| StoreError::Unavailable(err.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|err| StoreError::Unavailable(err.to_string()))
    }
}

impl RecordStore for InMemoryStore {
    fn insert_customer(&self, customer: CustomerInfo) -> Result<CustomerRecord, StoreError> {
        let record = CustomerRecord {
            id: Uuid::new_v4().to_string(),
            customer,
        };
        self.write()?
            .customers
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn get_customer(&self, id: &str) -> Result<Option<CustomerRecord>, StoreError> {
        Ok(self.read()?.customers.get(id).cloned())
    }

    fn search_customers(&self, name: &str) -> Result<Vec<CustomerRecord>, StoreError> {
        let needle = name.to_lowercase();
        let mut found: Vec<CustomerRecord> = self
            .read()?
            .customers
            .values()
            .filter(|record| record.customer.full_name().to_lowercase().contains(&needle))
            .cloned()
            .collect();
        found.sort_by_key(|record| record.customer.full_name());
        Ok(found)
    }

    fn insert_trip(
        &self,
        customer_id: &str,
        trip: TripDetails,
        meet_and_greet: Option<MeetGreetInfo>,
    ) -> Result<TripRecord, StoreError> {
        let mut tables = self.write()?;
        if !tables.customers.contains_key(customer_id) {
            return Err(StoreError::UnknownCustomer(customer_id.to_string()));
        }
        let record = TripRecord {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            trip,
            meet_and_greet,
        };
        tables.trips.push(record.clone());
        Ok(record)
    }

    fn trips_for(&self, customer_id: &str) -> Result<Vec<TripRecord>, StoreError> {
        Ok(self
            .read()?
            .trips
            .iter()
            .filter(|record| record.customer_id == customer_id)
            .cloned()
            .collect())
    }

    fn insert_trip_costs(
        &self,
        customer_id: &str,
        inputs: TripCostInputs,
        calculations: Option<CalculationResult>,
    ) -> Result<TripCostRecord, StoreError> {
        let mut tables = self.write()?;
        if !tables.customers.contains_key(customer_id) {
            return Err(StoreError::UnknownCustomer(customer_id.to_string()));
        }
        let record = TripCostRecord {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            inputs,
            calculations,
        };
        tables.trip_costs.push(record.clone());
        Ok(record)
    }

    fn trip_costs_for(&self, customer_id: &str) -> Result<Vec<TripCostRecord>, StoreError> {
        Ok(self
            .read()?
            .trip_costs
            .iter()
            .filter(|record| record.customer_id == customer_id)
            .cloned()
            .collect())
    }

    fn insert_affiliate(&self, affiliate: AffiliateInfo) -> Result<AffiliateRecord, StoreError> {
        let record = AffiliateRecord {
            id: Uuid::new_v4().to_string(),
            affiliate,
        };
        self.write()?
            .affiliates
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn get_affiliate(&self, id: &str) -> Result<Option<AffiliateRecord>, StoreError> {
        Ok(self.read()?.affiliates.get(id).cloned())
    }

    fn search_affiliates(&self, name: &str) -> Result<Vec<AffiliateRecord>, StoreError> {
        let needle = name.to_lowercase();
        let mut found: Vec<AffiliateRecord> = self
            .read()?
            .affiliates
            .values()
            .filter(|record| record.affiliate.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.affiliate.name.cmp(&b.affiliate.name));
        Ok(found)
    }
}
