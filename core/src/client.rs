//! Stateless HTTP request builder and response parser for the rental API.
//!
//! # Design
//! `RentalClient` holds only an optional base URL. Each operation is split
//! into a `build_*` method that produces an `HttpRequest` and a `parse_*`
//! method that consumes an `HttpResponse`. The host executes the round-trip,
//! which keeps this crate deterministic and lets the host abort requests.

use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Bike, CreatedRental, RentalRecord, RentalRequest};

/// Synchronous, stateless client for the rental API.
#[derive(Debug, Clone)]
pub struct RentalClient {
    base_url: Option<String>,
}

impl RentalClient {
    /// Client rooted at `base_url`. An empty string yields relative paths.
    pub fn new(base_url: &str) -> Self {
        let base = base_url.trim().trim_end_matches('/');
        Self {
            base_url: (!base.is_empty()).then(|| base.to_string()),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
        }
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    fn url(&self, path: &str) -> String {
        match &self.base_url {
            Some(base) => format!("{base}{path}"),
            None => path.to_string(),
        }
    }

    pub fn build_list_bikes(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.url("/api/bikes"),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_rental(&self, input: &RentalRequest) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.url("/api/rentals"),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_get_rental(&self, id: i64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.url(&format!("/api/rentals/{id}")),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_bikes(&self, response: HttpResponse) -> Result<Vec<Bike>, ApiError> {
        check_status(&response, &[200])?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// Parse a create-rental response. Only the id is trusted; a missing or
    /// non-integer id is a failure even on a 2xx status.
    pub fn parse_create_rental(&self, response: HttpResponse) -> Result<CreatedRental, ApiError> {
        check_status(&response, &[200, 201])?;
        let value: Value =
            serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))?;
        value
            .get("id")
            .and_then(integral_id)
            .map(|id| CreatedRental { id })
            .ok_or(ApiError::MissingRentalId)
    }

    pub fn parse_get_rental(&self, response: HttpResponse) -> Result<RentalRecord, ApiError> {
        check_status(&response, &[200])?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }
}

/// A JSON number with no fractional part, so `10` and `10.0` both count.
fn integral_id(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: &[u16]) -> Result<(), ApiError> {
    if expected.contains(&response.status) {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound {
            body: response.body.clone(),
        });
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
