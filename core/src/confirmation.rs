//! Confirmation page: fetch state plus field-by-field reconciliation of the
//! server record with the preview handed over by the form.
//!
//! Each displayed attribute resolves record → preview → (bike only) a
//! `Bike #id` label → omitted.

use tracing::warn;

use crate::catalog::FetchStatus;
use crate::dates::{format_display_date, stay_length};
use crate::error::ApiError;
use crate::money::format_usd;
use crate::types::{non_blank, RentalPreview, RentalRecord};

const MISSING_ID: &str = "Rental identifier was not provided.";
const INVALID_ID: &str = "Rental identifier is invalid.";
const LOAD_FALLBACK: &str = "We could not load your rental details. Please try again shortly.";

#[derive(Debug, Clone)]
pub struct ConfirmationPage {
    rental_id: Option<i64>,
    preview: Option<RentalPreview>,
    status: FetchStatus,
    error: Option<String>,
    record: Option<RentalRecord>,
}

impl ConfirmationPage {
    /// Enter the page for `route_id`. A missing or malformed id is an
    /// immediate error and no fetch should be issued.
    pub fn mount(route_id: Option<&str>, preview: Option<RentalPreview>) -> Self {
        let mut page = Self {
            rental_id: None,
            preview,
            status: FetchStatus::Idle,
            error: None,
            record: None,
        };
        match route_id.map(str::trim).filter(|id| !id.is_empty()) {
            None => page.fail(MISSING_ID),
            Some(raw) => match raw.parse::<i64>() {
                Ok(id) => {
                    page.rental_id = Some(id);
                    page.status = FetchStatus::Loading;
                }
                Err(_) => page.fail(INVALID_ID),
            },
        }
        page
    }

    fn fail(&mut self, message: &str) {
        self.status = FetchStatus::Error;
        self.error = Some(message.to_string());
    }

    /// The id to fetch, or `None` when the page already failed.
    pub fn rental_id(&self) -> Option<i64> {
        self.rental_id
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn finish_load(&mut self, result: Result<RentalRecord, ApiError>) {
        match result {
            Ok(record) => {
                self.record = Some(record);
                self.status = FetchStatus::Success;
                self.error = None;
            }
            Err(err) => {
                warn!(rental_id = ?self.rental_id, error = %err, "failed to load rental");
                self.fail(&err.user_message(LOAD_FALLBACK));
            }
        }
    }

    pub fn details(&self) -> ConfirmationDetails {
        ConfirmationDetails::resolve(self.record.as_ref(), self.preview.as_ref())
    }
}

/// Display-ready values; `None` means the row is omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmationDetails {
    pub reservation_id: Option<i64>,
    pub bike: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub duration_days: Option<i64>,
    pub total_price: Option<String>,
    pub user_id: Option<i64>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

impl ConfirmationDetails {
    pub fn resolve(record: Option<&RentalRecord>, preview: Option<&RentalPreview>) -> Self {
        let from_preview = |pick: fn(&RentalPreview) -> Option<&String>| {
            preview.and_then(pick).and_then(|s| non_blank(s))
        };

        let start = record
            .and_then(|r| r.start_date.clone())
            .or_else(|| from_preview(|p| p.start_date.as_ref()));
        let end = record
            .and_then(|r| r.end_date.clone())
            .or_else(|| from_preview(|p| p.end_date.as_ref()));

        let duration_days = stay_length(start.as_deref(), end.as_deref())
            .or_else(|| preview.and_then(|p| p.duration_days))
            .filter(|days| *days > 0);

        let bike = record
            .and_then(|r| r.bike_name.clone())
            .or_else(|| from_preview(|p| p.bike_name.as_ref()))
            .or_else(|| {
                record
                    .and_then(|r| r.bike_id)
                    .or_else(|| preview.and_then(|p| p.selected_bike))
                    .map(|id| format!("Bike #{id}"))
            });

        let total_price = record
            .and_then(|r| r.total_price_cents)
            .or_else(|| preview.and_then(|p| p.total_price_cents))
            .map(format_usd);

        Self {
            reservation_id: record.map(|r| r.id),
            bike,
            start_date: start.as_deref().and_then(format_display_date),
            end_date: end.as_deref().and_then(format_display_date),
            duration_days,
            total_price,
            user_id: record.and_then(|r| r.user_id),
            contact_name: record
                .and_then(|r| r.contact_name.clone())
                .or_else(|| from_preview(|p| p.name.as_ref())),
            contact_email: record
                .and_then(|r| r.contact_email.clone())
                .or_else(|| from_preview(|p| p.email.as_ref())),
            contact_phone: record
                .and_then(|r| r.contact_phone.clone())
                .or_else(|| from_preview(|p| p.phone.as_ref())),
        }
    }

    pub fn has_contact(&self) -> bool {
        self.contact_name.is_some() || self.contact_email.is_some() || self.contact_phone.is_some()
    }
}
