//! Route table and navigation hand-off.

use crate::types::RentalPreview;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Home,
    /// `/bikes`
    Bikes,
    /// `/rent` or `/rent/:bikeId`
    Rent { bike_id: Option<String> },
    /// `/confirmation/:id`
    Confirmation { id: String },
    NotFound(String),
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let trimmed = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Home,
            ["bikes"] => Route::Bikes,
            ["rent"] => Route::Rent { bike_id: None },
            ["rent", id] => Route::Rent {
                bike_id: Some((*id).to_string()),
            },
            ["confirmation", id] => Route::Confirmation { id: (*id).to_string() },
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Bikes => "/bikes".to_string(),
            Route::Rent { bike_id: None } => "/rent".to_string(),
            Route::Rent { bike_id: Some(id) } => format!("/rent/{id}"),
            Route::Confirmation { id } => format!("/confirmation/{id}"),
            Route::NotFound(path) => path.clone(),
        }
    }
}

/// A transition to `route`, optionally carrying in-memory state that never
/// appears in the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: Route,
    pub preview: Option<RentalPreview>,
}

impl Navigation {
    pub fn to(route: Route) -> Self {
        Self { route, preview: None }
    }

    pub fn with_preview(route: Route, preview: RentalPreview) -> Self {
        Self {
            route,
            preview: Some(preview),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_route() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/bikes"), Route::Bikes);
        assert_eq!(Route::parse("/rent"), Route::Rent { bike_id: None });
        assert_eq!(
            Route::parse("/rent/7/"),
            Route::Rent {
                bike_id: Some("7".to_string())
            }
        );
        assert_eq!(
            Route::parse("/confirmation/12?ref=mail"),
            Route::Confirmation { id: "12".to_string() }
        );
        assert_eq!(Route::parse("/admin"), Route::NotFound("/admin".to_string()));
    }

    #[test]
    fn paths_round_trip() {
        for path in ["/", "/bikes", "/rent", "/rent/3", "/confirmation/9"] {
            assert_eq!(Route::parse(path).path(), path);
        }
    }

    #[test]
    fn preview_is_not_part_of_the_path() {
        let nav = Navigation::with_preview(
            Route::Confirmation { id: "4".to_string() },
            RentalPreview {
                total_price_cents: Some(3000),
                ..RentalPreview::default()
            },
        );
        assert_eq!(nav.route.path(), "/confirmation/4");
        assert!(nav.preview.is_some());
    }
}
