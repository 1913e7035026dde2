//! Fixed registry of coastal observation points.

use serde::Serialize;

/// A named coastal point. Static for the lifetime of the program.
///
/// Only `Serialize` is derived: the `&'static str` fields cannot be
/// deserialized, so persisted state refers to locations by id and resolves
/// them through [`get_location`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub id: &'static str,
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

static LOCATIONS: [Location; 6] = [
    Location {
        id: "nord",
        name: "Côte Nord Bretagne",
        latitude: 48.7333,
        longitude: -3.4667,
    },
    Location {
        id: "sud",
        name: "Côte Sud Bretagne",
        latitude: 47.4833,
        longitude: -2.4833,
    },
    Location {
        id: "morlaix",
        name: "Baie de Morlaix",
        latitude: 48.6833,
        longitude: -3.8333,
    },
    Location {
        id: "brest",
        name: "Rade de Brest",
        latitude: 48.3833,
        longitude: -4.4833,
    },
    Location {
        id: "quiberon",
        name: "Presqu'île de Quiberon",
        latitude: 47.4833,
        longitude: -3.1167,
    },
    Location {
        id: "finistere",
        name: "Pointe du Finistère",
        latitude: 48.3833,
        longitude: -4.7667,
    },
];

/// All registered locations, in menu order.
pub fn all_locations() -> &'static [Location] {
    &LOCATIONS
}

/// Look up a location by its stable id.
pub fn get_location(id: &str) -> Option<&'static Location> {
    LOCATIONS.iter().find(|loc| loc.id == id)
}

/// The location shown when nothing (or something unknown) is selected.
pub fn default_location() -> &'static Location {
    &LOCATIONS[0]
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_has_six_unique_ids() {
        let ids: HashSet<_> = all_locations().iter().map(|l| l.id).collect();
        assert_eq!(all_locations().len(), 6);
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn test_lookup_by_id() {
        let brest = get_location("brest").unwrap();
        assert_eq!(brest.name, "Rade de Brest");
        assert!((brest.latitude - 48.3833).abs() < 1e-9);
        assert!(get_location("paris").is_none());
    }

    #[test]
    fn test_default_matches_core_default() {
        assert_eq!(default_location().id, meteomar_core::DEFAULT_LOCATION_ID);
    }

    #[test]
    fn test_coordinates_are_on_the_breton_coast() {
        for loc in all_locations() {
            assert!((47.0..49.0).contains(&loc.latitude), "{}", loc.id);
            assert!((-5.0..-2.0).contains(&loc.longitude), "{}", loc.id);
        }
    }
}
