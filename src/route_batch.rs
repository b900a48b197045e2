use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;

use crate::routes::{RouteDescriptor, ValidRoute};

/// Canonical identity of a route descriptor inside one batch
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    airline_iata: String,
    origin_iata: String,
    destination_iata: String,
    flight_number: String,
}

impl From<&ValidRoute> for RouteKey {
    fn from(route: &ValidRoute) -> Self {
        Self {
            airline_iata: route.airline_iata.clone(),
            origin_iata: route.origin_iata.clone(),
            destination_iata: route.destination_iata.clone(),
            flight_number: route.flight_number.clone(),
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}",
            self.airline_iata, self.origin_iata, self.destination_iata, self.flight_number
        )
    }
}

/// Routes left after collapsing a batch, in first-seen key order
#[derive(Debug, Clone, Default)]
pub struct DedupedBatch {
    pub routes: Vec<ValidRoute>,
    /// Malformed plus duplicate descriptors dropped from the input
    pub skipped: usize,
}

impl DedupedBatch {
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn airline_codes(&self) -> BTreeSet<String> {
        self.routes
            .iter()
            .map(|route| route.airline_iata.clone())
            .collect()
    }

    /// Origin and destination codes together, since both live in airports
    pub fn airport_codes(&self) -> BTreeSet<String> {
        self.routes
            .iter()
            .flat_map(|route| [route.origin_iata.clone(), route.destination_iata.clone()])
            .collect()
    }
}

/// Collapse a batch before any store access.
///
/// Descriptors missing a field are dropped. For duplicate keys the last
/// descriptor wins but keeps the position of the first occurrence.
pub fn dedupe_routes(descriptors: &[RouteDescriptor]) -> DedupedBatch {
    let mut unique: IndexMap<RouteKey, ValidRoute> = IndexMap::new();

    for descriptor in descriptors {
        let Ok(route) = descriptor.validate() else {
            continue;
        };
        unique.insert(RouteKey::from(&route), route);
    }

    DedupedBatch {
        skipped: descriptors.len() - unique.len(),
        routes: unique.into_values().collect(),
    }
}
