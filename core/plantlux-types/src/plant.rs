//! The plant record as exchanged with the inventory service.

use crate::draft::NewPlant;
use crate::light::{LightReport, LightStatus};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier assigned to a plant by the inventory service.
///
/// `0` is reserved for records that have not been created remotely yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlantId(i64);

impl PlantId {
    /// Marker for a record that has never round-tripped through create.
    pub const UNASSIGNED: PlantId = PlantId(0);

    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Whether the service has assigned this id.
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        self.0 != 0
    }
}

impl From<i64> for PlantId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for PlantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlantId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| Error::InvalidId(s.to_string()))
    }
}

/// A plant tracked by the inventory service.
///
/// Records are never patched locally. A change is expressed by sending the
/// full desired record to the service and reloading the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    #[serde(default)]
    pub id: PlantId,
    pub name: String,
    #[serde(alias = "type")]
    pub category: String,
    pub required_lux: f64,
    /// Last sample stored with the record. Advisory only; the live reading
    /// held by the controller supersedes it.
    #[serde(default)]
    pub current_lux: f64,
    #[serde(default, alias = "imageUrl")]
    pub image_ref: Option<String>,
}

impl Plant {
    /// Builds the record submitted on create: unassigned id, no light sample.
    #[must_use]
    pub fn provisional(new: NewPlant) -> Self {
        Self {
            id: PlantId::UNASSIGNED,
            name: new.name,
            category: new.category,
            required_lux: new.required_lux,
            current_lux: 0.0,
            image_ref: new.image_ref,
        }
    }

    /// Whether the record has been persisted by the service.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.id.is_assigned()
    }

    /// Classifies `current` lux against this plant's requirement.
    pub fn light_status(&self, current: f64) -> Result<LightStatus> {
        self.light_report(current).map(|r| r.status)
    }

    /// Full recommendation for `current` lux.
    pub fn light_report(&self, current: f64) -> Result<LightReport> {
        LightReport::evaluate(self.required_lux, current)
    }
}
