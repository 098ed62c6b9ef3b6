use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

pub const MAX_RENTAL_DAYS: i64 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    Available,
    Unavailable,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bike {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub rate_per_day_cents: i64,
    pub availability_status: AvailabilityStatus,
}

#[derive(Deserialize)]
pub struct CreateRental {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub bike_id: Option<i64>,
    pub selected_bike: Option<i64>,
}

/// Stored rental. Contact fields use the `customer_*` spelling on the wire.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Rental {
    pub id: i64,
    pub bike_id: i64,
    pub user_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price_cents: i64,
    pub created_at: DateTime<Utc>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
}

#[derive(Default)]
pub struct Store {
    bikes: Vec<Bike>,
    rentals: HashMap<i64, Rental>,
    users: HashMap<String, i64>,
    next_rental_id: i64,
    next_user_id: i64,
}

impl Store {
    pub fn with_bikes(bikes: Vec<Bike>) -> Self {
        Self {
            bikes,
            next_rental_id: 1,
            next_user_id: 1,
            ..Self::default()
        }
    }

    fn user_id_for(&mut self, email: &str) -> i64 {
        let key = email.trim().to_lowercase();
        if let Some(id) = self.users.get(&key) {
            return *id;
        }
        let id = self.next_user_id;
        self.next_user_id += 1;
        self.users.insert(key, id);
        id
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Error body shared by every endpoint: `{"error": {"code", "message"}}`.
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "error": { "code": self.code, "message": self.message } });
        (self.status, Json(body)).into_response()
    }
}

pub fn seed_bikes() -> Vec<Bike> {
    let bike = |id, name: &str, kind: &str, rate, availability_status| Bike {
        id,
        name: name.to_string(),
        kind: kind.to_string(),
        rate_per_day_cents: rate,
        availability_status,
    };
    vec![
        bike(1, "City Cruiser", "city", 1500, AvailabilityStatus::Available),
        bike(2, "Trail Blazer", "mountain", 2500, AvailabilityStatus::Available),
        bike(3, "Speedster", "road", 3000, AvailabilityStatus::Unavailable),
        bike(4, "Folding Commuter", "folding", 1200, AvailabilityStatus::Available),
    ]
}

pub fn app() -> Router {
    app_with_bikes(seed_bikes())
}

pub fn app_with_bikes(bikes: Vec<Bike>) -> Router {
    let db: Db = Arc::new(RwLock::new(Store::with_bikes(bikes)));
    Router::new()
        .route("/api/bikes", get(list_bikes))
        .route("/api/rentals", post(create_rental))
        .route("/api/rentals/{id}", get(get_rental))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_bikes(State(db): State<Db>) -> Json<Vec<Bike>> {
    Json(db.read().await.bikes.clone())
}

async fn create_rental(
    State(db): State<Db>,
    Json(input): Json<CreateRental>,
) -> Result<(StatusCode, Json<Rental>), ApiError> {
    let days = (input.end_date - input.start_date).num_days();
    if days <= 0 {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "INVALID_RANGE",
            "end_date must be after start_date",
        ));
    }
    if days > MAX_RENTAL_DAYS {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "INVALID_RANGE",
            "Rental duration must be between 1 and 3 days",
        ));
    }
    let bike_id = input.bike_id.or(input.selected_bike).ok_or_else(|| {
        ApiError::new(StatusCode::BAD_REQUEST, "INVALID_BIKE", "bike_id is required")
    })?;

    let mut store = db.write().await;
    let bike = store
        .bikes
        .iter()
        .find(|b| b.id == bike_id)
        .cloned()
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Bike not found"))?;
    if bike.availability_status != AvailabilityStatus::Available {
        return Err(ApiError::new(
            StatusCode::CONFLICT,
            "UNAVAILABLE",
            "Bike is not available for the selected dates.",
        ));
    }

    let user_id = store.user_id_for(&input.email);
    let id = store.next_rental_id;
    store.next_rental_id += 1;
    let rental = Rental {
        id,
        bike_id,
        user_id,
        start_date: input.start_date,
        end_date: input.end_date,
        total_price_cents: bike.rate_per_day_cents * days,
        created_at: Utc::now(),
        customer_name: input.name.trim().to_string(),
        customer_email: input.email.trim().to_string(),
        customer_phone: input.phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()),
    };
    store.rentals.insert(id, rental.clone());
    info!(rental_id = id, bike_id, days, "rental created");
    Ok((StatusCode::CREATED, Json(rental)))
}

async fn get_rental(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Rental>, ApiError> {
    let store = db.read().await;
    store
        .rentals
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Rental not found"))
}
