//! Bounded venue calls.

use std::future::Future;
use std::time::Duration;

use crate::error::VenueError;

/// Run a venue call with a deadline. Expiry maps to [`VenueError::Timeout`].
pub(crate) async fn bounded<T, F>(venue: &str, limit: Duration, call: F) -> Result<T, VenueError>
where
    F: Future<Output = Result<T, VenueError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(VenueError::Timeout {
            venue: venue.to_string(),
            secs: limit.as_secs(),
        }),
    }
}
