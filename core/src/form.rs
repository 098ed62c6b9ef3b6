//! Reservation form: field state, validation, pricing preview and the
//! submit hand-off to the confirmation page.
//!
//! # Design
//! `RentalForm` is a plain state machine. The host feeds it the catalog
//! fetch result and user input, calls `begin_submit` to obtain the request to
//! send, executes it, and hands the outcome back to `finish_submit`. The form
//! never performs I/O, so every rule below is testable without a server.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::dates::{day_word, duration_days};
use crate::error::ApiError;
use crate::router::{Navigation, Route};
use crate::types::{non_blank, Bike, CreatedRental, RentalPreview, RentalRequest};

/// Longest rental the client will submit, in days.
pub const MAX_RENTAL_DAYS: i64 = 3;

const SUBMIT_FALLBACK: &str = "An unexpected error occurred. Please try again.";
const BIKE_GONE: &str = "The selected bike is no longer available. Please choose another bike.";
const BAD_DURATION: &str = "Provide valid rental dates (up to three days).";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Phone,
    StartDate,
    EndDate,
    Bike,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Phone => "Phone",
            Field::StartDate => "Start date",
            Field::EndDate => "End date",
            Field::Bike => "Bike",
        }
    }
}

/// Raw field values as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub start_date: String,
    pub end_date: String,
    pub bike_id: String,
}

impl FormValues {
    fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::StartDate => &mut self.start_date,
            Field::EndDate => &mut self.end_date,
            Field::Bike => &mut self.bike_id,
        }
    }
}

/// One message per invalid field, reported all at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    fn set(&mut self, field: Field, message: &str) {
        self.0.insert(field, message.to_string());
    }

    fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }
}

/// Why `begin_submit` did not produce a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitBlocked {
    AlreadySubmitting,
    CatalogNotReady,
    Invalid(FieldErrors),
    BikeUnavailable,
    InvalidDuration,
}

/// A validated submission waiting for the server's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub request: RentalRequest,
    pub preview: RentalPreview,
}

#[derive(Debug, Clone)]
pub struct RentalForm {
    values: FormValues,
    bike_hint: Option<String>,
    catalog: Catalog,
    field_errors: FieldErrors,
    form_error: Option<String>,
    submitting: bool,
}

impl RentalForm {
    /// New form, pre-selecting `bike_hint` (the `/rent/:bikeId` segment).
    pub fn new(bike_hint: Option<&str>) -> Self {
        let bike_hint = bike_hint.map(str::to_string);
        Self {
            values: FormValues {
                bike_id: bike_hint.clone().unwrap_or_default(),
                ..FormValues::default()
            },
            bike_hint,
            catalog: Catalog::new(),
            field_errors: FieldErrors::default(),
            form_error: None,
            submitting: false,
        }
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.values.get_mut(field) = value.into();
    }

    pub fn begin_catalog_load(&mut self) {
        self.catalog.begin_load();
    }

    /// Store the catalog fetch outcome and re-check the bike selection.
    pub fn apply_catalog(&mut self, result: Result<Vec<Bike>, ApiError>) {
        self.catalog.finish_load(result);
        self.reconcile_selection();
    }

    /// Keep the selection pointing at an available bike.
    ///
    /// If the current choice is not available, silently switch to the hinted
    /// bike when it is available, otherwise to the first available bike.
    pub fn reconcile_selection(&mut self) {
        if !self.catalog.has_available() || self.selected_bike().is_some() {
            return;
        }
        let hinted = self
            .bike_hint
            .as_deref()
            .and_then(parse_bike_id)
            .and_then(|id| self.catalog.find_available(id));
        let preferred = hinted.or_else(|| self.catalog.available().next());
        if let Some(bike) = preferred {
            debug!(from = %self.values.bike_id, to = bike.id, "re-selecting available bike");
            self.values.bike_id = bike.id.to_string();
        }
    }

    /// The chosen bike, if it is in the currently available set.
    pub fn selected_bike(&self) -> Option<&Bike> {
        parse_bike_id(&self.values.bike_id).and_then(|id| self.catalog.find_available(id))
    }

    /// Whole days between the entered dates, or `None` if either is missing
    /// or unparseable.
    pub fn duration_days(&self) -> Option<i64> {
        duration_days(non_empty(&self.values.start_date), non_empty(&self.values.end_date))
    }

    /// Display-only price estimate. The server's total is authoritative.
    /// `None` unless the range is one the form would accept.
    pub fn estimated_total_cents(&self) -> Option<i64> {
        let bike = self.selected_bike()?;
        let days = self.rental_days()?;
        bike.rate_per_day_cents.checked_mul(days)
    }

    fn rental_days(&self) -> Option<i64> {
        self.duration_days().filter(|d| (1..=MAX_RENTAL_DAYS).contains(d))
    }

    /// Summary line shown under the rental details.
    pub fn summary(&self) -> Option<String> {
        let bike = self.selected_bike()?;
        let days = self.rental_days()?;
        Some(format!(
            "You are reserving the {} for {} {}.",
            bike.name,
            days,
            day_word(days)
        ))
    }

    /// Run every field rule and return all violations.
    pub fn validate(&self) -> FieldErrors {
        let v = &self.values;
        let mut errors = FieldErrors::default();

        if v.name.trim().is_empty() {
            errors.set(Field::Name, "Name is required.");
        }

        let email = v.email.trim();
        if email.is_empty() {
            errors.set(Field::Email, "Email is required.");
        } else if !is_valid_email(email) {
            errors.set(Field::Email, "Enter a valid email address.");
        }

        if v.start_date.is_empty() {
            errors.set(Field::StartDate, "Start date is required.");
        }
        if v.end_date.is_empty() {
            errors.set(Field::EndDate, "End date is required.");
        }
        if v.bike_id.is_empty() {
            errors.set(Field::Bike, "Select a bike to continue.");
        }

        match self.duration_days() {
            None => {
                let both_present = !v.start_date.is_empty() && !v.end_date.is_empty();
                if both_present && !errors.contains(Field::EndDate) {
                    errors.set(Field::EndDate, "Provide valid rental dates.");
                }
            }
            Some(days) if days <= 0 => errors.set(Field::EndDate, "End date must be after start date."),
            Some(days) if days > MAX_RENTAL_DAYS => {
                errors.set(Field::EndDate, "Rentals cannot exceed 3 days.")
            }
            Some(_) => {}
        }

        errors
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.submitting
            && self.catalog.status() == crate::catalog::FetchStatus::Success
            && self.catalog.has_available()
    }

    /// Validate and build the request to send.
    ///
    /// The bike is re-resolved against the current available set, so a bike
    /// that became unavailable since it was picked is rejected here.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SubmitBlocked> {
        if self.submitting {
            return Err(SubmitBlocked::AlreadySubmitting);
        }
        if !self.can_submit() {
            return Err(SubmitBlocked::CatalogNotReady);
        }
        self.form_error = None;

        let errors = self.validate();
        if !errors.is_empty() {
            self.field_errors = errors.clone();
            return Err(SubmitBlocked::Invalid(errors));
        }
        self.field_errors = FieldErrors::default();

        let Some(bike) = self.selected_bike().cloned() else {
            self.form_error = Some(BIKE_GONE.to_string());
            return Err(SubmitBlocked::BikeUnavailable);
        };
        let priced = self
            .rental_days()
            .and_then(|days| Some((days, bike.rate_per_day_cents.checked_mul(days)?)));
        let Some((days, total_price_cents)) = priced else {
            self.form_error = Some(BAD_DURATION.to_string());
            return Err(SubmitBlocked::InvalidDuration);
        };

        let v = &self.values;
        let name = v.name.trim().to_string();
        let email = v.email.trim().to_string();
        let phone = non_blank(&v.phone);

        let request = RentalRequest {
            name: name.clone(),
            email: email.clone(),
            phone: phone.clone(),
            start_date: v.start_date.clone(),
            end_date: v.end_date.clone(),
            selected_bike: bike.id,
            bike_id: bike.id,
            total_price_cents,
            duration_days: days,
        };
        let preview = RentalPreview {
            name: Some(name),
            email: Some(email),
            phone,
            start_date: Some(v.start_date.clone()),
            end_date: Some(v.end_date.clone()),
            selected_bike: Some(bike.id),
            bike_name: Some(bike.name.clone()),
            total_price_cents: Some(total_price_cents),
            duration_days: Some(days),
        };

        self.submitting = true;
        Ok(PendingSubmission { request, preview })
    }

    /// Apply the create-rental outcome. On success, returns the navigation
    /// to the confirmation page carrying the preview.
    pub fn finish_submit(
        &mut self,
        pending: PendingSubmission,
        result: Result<CreatedRental, ApiError>,
    ) -> Option<Navigation> {
        self.submitting = false;
        match result {
            Ok(created) => Some(Navigation::with_preview(
                Route::Confirmation {
                    id: created.id.to_string(),
                },
                pending.preview,
            )),
            Err(err) => {
                warn!(error = %err, "rental submission failed");
                self.form_error = Some(err.user_message(SUBMIT_FALLBACK));
                None
            }
        }
    }
}

fn parse_bike_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

/// `local@domain.tld` shape: one `@`, no whitespace, a dot inside the domain.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}
