use std::time::Duration;

use async_trait::async_trait;
use sunclock_core::FlareEvent;
use sunclock_flares::{FlareClient, FlareError};

use crate::guard::guarded;

/// Source of upcoming flare listings.
#[async_trait]
pub trait FlareFeed: Send + Sync {
    async fn upcoming_flares(&self) -> Result<Vec<FlareEvent>, FlareError>;
}

#[async_trait]
impl FlareFeed for FlareClient {
    async fn upcoming_flares(&self) -> Result<Vec<FlareEvent>, FlareError> {
        self.fetch_flares().await
    }
}

/// Fetches flares under `guard`. Any failure yields an empty list.
pub async fn lookup_flares(feed: &dyn FlareFeed, guard: Duration) -> Vec<FlareEvent> {
    match guarded(guard, feed.upcoming_flares()).await {
        Ok(Ok(flares)) => flares,
        Ok(Err(e)) => {
            tracing::debug!(error = %e, "flare lookup failed");
            Vec::new()
        }
        Err(elapsed) => {
            tracing::debug!(%elapsed, "flare lookup guard fired");
            Vec::new()
        }
    }
}
