//! Trip Cost Engine library crate.
//!
//! This crate exposes the trip cost calculation engine and the API
//! components around it as reusable modules.  External applications
//! may depend on the `tripcost_engine` crate and call
//! `engine::compute` directly or embed the API via `api::build_router`.

pub mod models;
pub mod engine;
pub mod validation;
pub mod store;
pub mod invoice;
pub mod error;
pub mod config;
pub mod api;
