//! Booking reservation saga constants and the bound on downstream calls.

use std::time::Duration;

use store::StoreError;

use crate::error::{BookingError, Result};

/// The saga type identifier for booking reservation.
pub const SAGA_TYPE: &str = "BookingReservation";

/// Step name: Price the stay.
pub const STEP_CALCULATE_PRICE: &str = "calculate_price";

/// Step name: Reserve inventory and create the booking rows.
pub const STEP_RESERVE_AND_CREATE: &str = "reserve_and_create";

/// Step name: Notify the guest on every channel they gave.
pub const STEP_NOTIFY_GUEST: &str = "notify_guest";

/// Upper bound on every call the saga makes to a collaborator.
pub const DOWNSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs a store call under `limit`, mapping a timeout to a retryable
/// dependency error.
pub(crate) async fn bounded<T, F>(dependency: &'static str, limit: Duration, call: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, StoreError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(BookingError::from),
        Err(_) => {
            tracing::warn!(dependency, ?limit, "downstream call timed out");
            Err(BookingError::timed_out(dependency, limit))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok::<_, StoreError>(1)
        };

        let result = bounded("catalog", DOWNSTREAM_TIMEOUT, slow).await;
        assert!(matches!(
            result,
            Err(BookingError::Dependency {
                dependency: "catalog",
                retryable: true,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_bounded_maps_store_errors() {
        let failing = async { Err::<u32, _>(StoreError::Unavailable("down".to_string())) };
        let result = bounded("store", DOWNSTREAM_TIMEOUT, failing).await;
        assert!(matches!(result, Err(BookingError::Dependency { .. })));

        let ok = async { Ok::<_, StoreError>(7) };
        assert_eq!(bounded("store", DOWNSTREAM_TIMEOUT, ok).await.unwrap(), 7);
    }
}
