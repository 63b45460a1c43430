//! Add/edit form model.
//!
//! The form holds raw text as typed by the user. Validation turns it into a
//! [`NewPlant`] for create, or into a full [`Plant`] for update.

use crate::plant::Plant;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Validated input for creating a plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlant {
    pub name: String,
    pub category: String,
    pub required_lux: f64,
    pub image_ref: Option<String>,
}

impl NewPlant {
    /// Convenience constructor for already-validated values.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        required_lux: f64,
        image_ref: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            required_lux,
            image_ref,
        }
    }
}

/// Raw form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantDraft {
    pub name: String,
    pub category: String,
    pub required_lux: String,
    pub image_ref: String,
}

impl PlantDraft {
    /// Pre-populates an edit form from an already loaded record.
    pub fn from_plant(plant: &Plant) -> Self {
        Self {
            name: plant.name.clone(),
            category: plant.category.clone(),
            required_lux: plant.required_lux.to_string(),
            image_ref: plant.image_ref.clone().unwrap_or_default(),
        }
    }

    /// Validates the form for create.
    pub fn validate(&self) -> Result<NewPlant> {
        let name = non_blank(&self.name, "name")?;
        let category = non_blank(&self.category, "category")?;
        let required_lux = parse_required_lux(&self.required_lux)?;
        let image_ref = match self.image_ref.trim() {
            "" => None,
            s => Some(s.to_string()),
        };

        Ok(NewPlant {
            name,
            category,
            required_lux,
            image_ref,
        })
    }

    /// Builds the full desired record for updating `existing`.
    ///
    /// The id and stored light sample are carried over. A blank image field
    /// keeps the existing image.
    pub fn apply_to(&self, existing: &Plant) -> Result<Plant> {
        let new = self.validate()?;
        Ok(Plant {
            id: existing.id,
            name: new.name,
            category: new.category,
            required_lux: new.required_lux,
            current_lux: existing.current_lux,
            image_ref: new.image_ref.or_else(|| existing.image_ref.clone()),
        })
    }
}

fn non_blank(value: &str, field: &'static str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::BlankField { field });
    }
    Ok(trimmed.to_string())
}

fn parse_required_lux(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::BlankField {
            field: "required_lux",
        });
    }
    let value: f64 = trimmed.parse().map_err(|_| Error::InvalidLux {
        input: input.to_string(),
        reason: "not a number",
    })?;
    if !value.is_finite() {
        return Err(Error::InvalidLux {
            input: input.to_string(),
            reason: "not finite",
        });
    }
    if value <= 0.0 {
        return Err(Error::NonPositiveRequirement(value));
    }
    Ok(value)
}
