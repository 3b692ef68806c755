//! Ephemeral seat state.
//!
//! Seat occupancy comes from the on-board sensor unit and only matters while
//! the display is running; it is never persisted. Handlers share the state
//! through [`SeatStore`] and notify WebSocket subscribers through
//! [`SeatUpdateSender`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use utoipa::ToSchema;

/// Occupancy state of one seat
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct SeatStatus {
    pub id: u32,
    pub occupied: bool,
    /// Whether the sensor for this seat has stopped reporting
    pub disconnected: bool,
}

/// Shared in-memory seat state
pub type SeatStore = Arc<RwLock<Vec<SeatStatus>>>;

/// Snapshot pushed to subscribers whenever a seat changes
#[derive(Debug, Clone, Serialize)]
pub struct SeatUpdate {
    /// Timestamp when this update was generated (RFC 3339)
    pub timestamp: String,
    pub seats: Vec<SeatStatus>,
}

/// Sender for seat change notifications
pub type SeatUpdateSender = broadcast::Sender<SeatUpdate>;

/// All seats start vacant and connected
pub fn new_seat_store(seat_count: u32) -> SeatStore {
    let seats = (0..seat_count)
        .map(|id| SeatStatus {
            id,
            occupied: false,
            disconnected: false,
        })
        .collect();
    Arc::new(RwLock::new(seats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seats_start_vacant() {
        let store = new_seat_store(2);
        let seats = store.read().await;
        assert_eq!(seats.len(), 2);
        assert!(seats.iter().all(|s| !s.occupied && !s.disconnected));
        assert_eq!(seats[0].id, 0);
        assert_eq!(seats[1].id, 1);
    }
}
