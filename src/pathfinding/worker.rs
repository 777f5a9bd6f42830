//! Background route requests
//!
//! Each request searches its own snapshot of the mask on tokio's blocking
//! pool, so the caller may keep editing the mask while a search runs. A new
//! request cancels the one still in flight.

use tokio::task::JoinHandle;
use tracing::debug;

use crate::core::types::PixelPoint;
use crate::mask::WalkMask;
use crate::pathfinding::router::GridRouter;
use crate::pathfinding::types::{CancelToken, RouteOutcome, RouterConfig};

#[derive(Debug, Default)]
pub struct RouteWorker {
    in_flight: Option<CancelToken>,
}

impl RouteWorker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a search on a snapshot of `mask`; must be called inside a tokio runtime
    pub fn request(
        &mut self,
        mask: &WalkMask,
        start: PixelPoint,
        end: PixelPoint,
        config: &RouterConfig,
    ) -> JoinHandle<RouteOutcome> {
        self.cancel();

        let token = CancelToken::new();
        self.in_flight = Some(token.clone());

        let snapshot = mask.clone();
        let config = config.clone();
        debug!("Route request {} -> {} (stride {})", start, end, config.stride);

        tokio::task::spawn_blocking(move || {
            GridRouter::new(&snapshot, config).search(start, end, Some(&token))
        })
    }

    /// Cancel the in-flight search, if any
    pub fn cancel(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathfinding::SearchStatus;

    #[tokio::test]
    async fn test_request_finds_route() {
        let mask = WalkMask::filled(50, 50, true).unwrap();
        let mut worker = RouteWorker::new();

        let outcome = worker
            .request(&mask, PixelPoint::new(0, 0), PixelPoint::new(49, 49), &RouterConfig::default())
            .await
            .unwrap();

        assert_eq!(outcome.status, SearchStatus::Found);
        let path = outcome.path.unwrap();
        assert_eq!(path.last(), Some(&PixelPoint::new(49, 49)));
    }

    #[tokio::test]
    async fn test_snapshot_ignores_later_edits() {
        let mut mask = WalkMask::filled(20, 20, true).unwrap();
        let mut worker = RouteWorker::new();

        let handle = worker.request(
            &mask,
            PixelPoint::new(0, 0),
            PixelPoint::new(19, 0),
            &RouterConfig::default(),
        );
        mask.fill(false);

        let outcome = handle.await.unwrap();
        assert!(outcome.is_found());
    }

    #[tokio::test]
    async fn test_blocked_request_returns_status() {
        let mask = WalkMask::new(10, 10).unwrap();
        let mut worker = RouteWorker::new();

        let outcome = worker
            .request(&mask, PixelPoint::new(0, 0), PixelPoint::new(5, 5), &RouterConfig::default())
            .await
            .unwrap();
        assert_eq!(outcome.status, SearchStatus::StartBlocked);
    }
}
