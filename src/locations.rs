//! The fixed registry of stops served by the route.
//!
//! Locations are statically enumerated and immutable for the lifetime of the
//! process; the pricing and ledger tables reference them by id.

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A named stop on the route
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Location {
    /// Registry identifier, unique within the registry
    pub id: &'static str,
    pub name: &'static str,
    pub coordinates: Coordinates,
}

const LOCATIONS: &[Location] = &[
    Location {
        id: "1",
        name: "KU",
        coordinates: Coordinates { lat: -1.180, lng: 36.939 },
    },
    Location {
        id: "2",
        name: "Kahawa Sukari",
        coordinates: Coordinates { lat: -1.189, lng: 36.931 },
    },
    Location {
        id: "3",
        name: "Kahawa Wendani",
        coordinates: Coordinates { lat: -1.196, lng: 36.923 },
    },
    Location {
        id: "4",
        name: "Allsops",
        coordinates: Coordinates { lat: -1.244, lng: 36.867 },
    },
    Location {
        id: "5",
        name: "Odeon",
        coordinates: Coordinates { lat: -1.283, lng: 36.825 },
    },
];

/// All registered locations, in route order
pub fn all() -> &'static [Location] {
    LOCATIONS
}

/// Look up a location by registry id
pub fn find(id: &str) -> Option<&'static Location> {
    LOCATIONS.iter().find(|loc| loc.id == id)
}
