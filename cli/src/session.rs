//! Cancellable API calls for one page visit.
//!
//! Every request races a `CancellationToken`. When the token fires, the
//! request future is dropped, which aborts the underlying connection, and the
//! caller gets `ApiError::Cancelled`.

use std::future::Future;

use rental_core::{ApiError, Bike, CreatedRental, RentalClient, RentalRecord, RentalRequest};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::transport::ReqwestTransport;

/// Await `fut` unless `token` is cancelled first.
pub async fn run_cancellable<T, F>(token: &CancellationToken, fut: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => {
            debug!("request aborted");
            Err(ApiError::Cancelled)
        }
        result = fut => result,
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    client: RentalClient,
    transport: ReqwestTransport,
    cancel: CancellationToken,
}

impl Session {
    pub fn new(client: RentalClient, transport: ReqwestTransport, cancel: CancellationToken) -> Self {
        Self {
            client,
            transport,
            cancel,
        }
    }

    /// Session for a nested scope: cancelling the parent cancels it, not the
    /// other way round.
    pub fn child(&self) -> Self {
        Self {
            client: self.client.clone(),
            transport: self.transport.clone(),
            cancel: self.cancel.child_token(),
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub async fn list_bikes(&self) -> Result<Vec<Bike>, ApiError> {
        let req = self.client.build_list_bikes();
        let response = run_cancellable(&self.cancel, self.transport.execute(req)).await?;
        self.client.parse_list_bikes(response)
    }

    pub async fn create_rental(&self, input: &RentalRequest) -> Result<CreatedRental, ApiError> {
        let req = self.client.build_create_rental(input)?;
        let response = run_cancellable(&self.cancel, self.transport.execute(req)).await?;
        self.client.parse_create_rental(response)
    }

    pub async fn get_rental(&self, id: i64) -> Result<RentalRecord, ApiError> {
        let req = self.client.build_get_rental(id);
        let response = run_cancellable(&self.cancel, self.transport.execute(req)).await?;
        self.client.parse_get_rental(response)
    }
}
