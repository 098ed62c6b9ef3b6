//! I/O-free client core for the bike rental API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and holds the page logic that
//! sits between the user and those requests: catalog state, reservation form
//! validation and pricing, and confirmation reconciliation.
//!
//! # Design
//! - `RentalClient` is stateless and built from an injected `ClientConfig`.
//! - Each API operation is split into `build_*` and `parse_*`.
//! - Pages (`Catalog`, `RentalForm`, `ConfirmationPage`) are state machines
//!   the host drives with fetch results, so cancellation and transport
//!   choices stay with the host.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod catalog;
pub mod client;
pub mod config;
pub mod confirmation;
pub mod dates;
pub mod error;
pub mod form;
pub mod http;
pub mod money;
pub mod router;
pub mod types;

pub use catalog::{BikeCard, Catalog, FetchStatus};
pub use client::RentalClient;
pub use config::ClientConfig;
pub use confirmation::{ConfirmationDetails, ConfirmationPage};
pub use error::ApiError;
pub use form::{Field, FieldErrors, FormValues, PendingSubmission, RentalForm, SubmitBlocked};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use router::{Navigation, Route};
pub use types::{AvailabilityStatus, Bike, CreatedRental, RentalPreview, RentalRecord, RentalRequest};
