// Surf spot domain model
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Name returned for spot ids that are not in the directory.
pub const UNKNOWN_SPOT_NAME: &str = "Unknown";

/// Torquay Surf Beach, the spot served when a request names none.
pub const DEFAULT_SPOT_ID: &str = "607776017a3e100333600795";

/// Opaque forecast-service identifier for a surf location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpotId(String);

impl SpotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SpotId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spot {
    pub id: SpotId,
    pub name: String,
}

impl Spot {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: SpotId::new(id),
            name: name.to_string(),
        }
    }
}

/// Closed lookup table from spot id to a human-readable name.
#[derive(Debug, Clone)]
pub struct SpotDirectory {
    spots: BTreeMap<SpotId, String>,
}

impl SpotDirectory {
    pub fn new(spots: impl IntoIterator<Item = Spot>) -> Self {
        Self {
            spots: spots.into_iter().map(|s| (s.id, s.name)).collect(),
        }
    }

    /// Built-in spot table, replaced by `[[spots]]` when configured.
    pub fn known_spots() -> Vec<Spot> {
        vec![
            Spot::new("584204204e65fad6a77099c7", "Bells Beach"),
            Spot::new("607776017a3e100333600795", "Torquay Surf Beach"),
        ]
    }

    /// Returns the spot's name, or [`UNKNOWN_SPOT_NAME`] with a warning when
    /// the id is not in the table.
    pub fn resolve_spot_name(&self, spot_id: &SpotId) -> &str {
        match self.spots.get(spot_id) {
            Some(name) => name.as_str(),
            None => {
                tracing::warn!(spot_id = %spot_id, "Unknown surf spot id");
                UNKNOWN_SPOT_NAME
            }
        }
    }

    pub fn spots(&self) -> Vec<Spot> {
        self.spots
            .iter()
            .map(|(id, name)| Spot {
                id: id.clone(),
                name: name.clone(),
            })
            .collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = &SpotId> {
        self.spots.keys()
    }
}

impl Default for SpotDirectory {
    fn default() -> Self {
        Self::new(Self::known_spots())
    }
}
