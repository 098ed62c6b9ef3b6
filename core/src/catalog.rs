//! Bike catalog state and per-bike card data.

use tracing::{debug, error};

use crate::error::ApiError;
use crate::money::format_usd;
use crate::router::Route;
use crate::types::Bike;

/// Progress of a page's single fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// The fetched bike list and how far the fetch got.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    status: FetchStatus,
    bikes: Vec<Bike>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn bikes(&self) -> &[Bike] {
        &self.bikes
    }

    pub fn begin_load(&mut self) {
        self.status = FetchStatus::Loading;
    }

    /// Apply the outcome of `GET /api/bikes`. A failure keeps the previous
    /// list (empty on first load) and is terminal for this page visit.
    pub fn finish_load(&mut self, result: Result<Vec<Bike>, ApiError>) {
        match result {
            Ok(bikes) => {
                debug!(count = bikes.len(), "bike catalog loaded");
                self.bikes = bikes;
                self.status = FetchStatus::Success;
            }
            Err(err) => {
                error!(error = %err, "failed to fetch bikes");
                self.status = FetchStatus::Error;
            }
        }
    }

    /// Bikes that can be reserved, in API order.
    pub fn available(&self) -> impl Iterator<Item = &Bike> {
        self.bikes.iter().filter(|bike| bike.is_available())
    }

    pub fn has_available(&self) -> bool {
        self.available().next().is_some()
    }

    pub fn find_available(&self, id: i64) -> Option<&Bike> {
        self.available().find(|bike| bike.id == id)
    }

    /// Loaded successfully but the API returned no bikes.
    pub fn is_empty_success(&self) -> bool {
        self.status == FetchStatus::Success && self.bikes.is_empty()
    }
}

/// Display data for one bike in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BikeCard {
    pub id: i64,
    pub name: String,
    pub kind: String,
    pub price_per_day: String,
    pub availability: &'static str,
    pub available: bool,
}

impl BikeCard {
    /// Where the card's "Rent" action leads; unavailable bikes have none.
    pub fn rent_route(&self) -> Option<Route> {
        self.available.then(|| Route::Rent {
            bike_id: Some(self.id.to_string()),
        })
    }
}

impl From<&Bike> for BikeCard {
    fn from(bike: &Bike) -> Self {
        let available = bike.is_available();
        Self {
            id: bike.id,
            name: bike.name.clone(),
            kind: bike.kind.clone(),
            price_per_day: format_usd(bike.rate_per_day_cents),
            availability: if available {
                "Available now"
            } else {
                "Currently unavailable"
            },
            available,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::AvailabilityStatus;

    pub(crate) fn bike(id: i64, name: &str, rate: i64, available: bool) -> Bike {
        Bike {
            id,
            name: name.to_string(),
            kind: "city".to_string(),
            rate_per_day_cents: rate,
            availability_status: if available {
                AvailabilityStatus::Available
            } else {
                AvailabilityStatus::Unavailable
            },
        }
    }

    #[test]
    fn available_excludes_unavailable_bikes() {
        let mut catalog = Catalog::new();
        catalog.begin_load();
        assert_eq!(catalog.status(), FetchStatus::Loading);
        catalog.finish_load(Ok(vec![
            bike(1, "Cruiser", 1500, false),
            bike(2, "Roadie", 2000, true),
        ]));
        let ids: Vec<i64> = catalog.available().map(|b| b.id).collect();
        assert_eq!(ids, vec![2]);
        assert!(catalog.find_available(1).is_none());
        assert!(catalog.find_available(2).is_some());
    }

    #[test]
    fn failed_load_sets_error() {
        let mut catalog = Catalog::new();
        catalog.begin_load();
        catalog.finish_load(Err(ApiError::Transport("connection refused".to_string())));
        assert_eq!(catalog.status(), FetchStatus::Error);
        assert!(!catalog.has_available());
        assert!(!catalog.is_empty_success());
    }

    #[test]
    fn empty_success() {
        let mut catalog = Catalog::new();
        catalog.finish_load(Ok(Vec::new()));
        assert!(catalog.is_empty_success());
    }

    #[test]
    fn card_for_available_bike() {
        let card = BikeCard::from(&bike(5, "Roadie", 1500, true));
        assert_eq!(card.price_per_day, "$15.00");
        assert_eq!(card.availability, "Available now");
        assert_eq!(card.rent_route().map(|r| r.path()).as_deref(), Some("/rent/5"));
    }

    #[test]
    fn card_for_unavailable_bike_has_no_rent_route() {
        let card = BikeCard::from(&bike(5, "Roadie", 1500, false));
        assert_eq!(card.availability, "Currently unavailable");
        assert!(card.rent_route().is_none());
    }
}
