//! Settings and rendering shared by the `plantlux` binary.

use anyhow::{Context, Result};
use plantlux_sync::{ControllerConfig, InventoryConfig, Snapshot};
use plantlux_types::{Plant, PlantDraft};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Everything the binary needs to reach the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub inventory: InventoryConfig,
    pub controller: ControllerConfig,
}

impl Settings {
    /// Reads settings from a JSON file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Applies command-line flags on top of the file or defaults.
    pub fn with_overrides(mut self, base_url: Option<String>, timeout_secs: Option<u64>) -> Self {
        if let Some(url) = base_url {
            self.inventory.base_url = url;
        }
        if let Some(secs) = timeout_secs {
            self.inventory.request_timeout_secs = secs;
            self.controller.operation_timeout_ms = secs.saturating_mul(1000);
        }
        self
    }
}

/// Field overrides for `edit`. Unset fields keep the loaded value.
#[derive(Debug, Clone, Default)]
pub struct EditFields {
    pub name: Option<String>,
    pub category: Option<String>,
    pub required_lux: Option<String>,
    pub image: Option<String>,
}

impl EditFields {
    /// Form for `plant` with these overrides applied.
    pub fn draft_for(&self, plant: &Plant) -> PlantDraft {
        let mut draft = PlantDraft::from_plant(plant);
        if let Some(name) = &self.name {
            draft.name = name.clone();
        }
        if let Some(category) = &self.category {
            draft.category = category.clone();
        }
        if let Some(lux) = &self.required_lux {
            draft.required_lux = lux.clone();
        }
        if let Some(image) = &self.image {
            draft.image_ref = image.clone();
        }
        draft
    }
}

/// One line per record. The status column is only filled when a light
/// reading is known.
pub fn render_rows(snapshot: &Snapshot, with_status: bool) -> Vec<String> {
    snapshot
        .statuses()
        .map(|(plant, status)| {
            let status = match (with_status, status) {
                (false, _) => String::new(),
                (true, Some(status)) => status.to_string(),
                (true, None) => "unknown".to_string(),
            };
            format!(
                "{:>5}  {:<24} {:<14} {:>8.0} lux  {}",
                plant.id.get(),
                plant.name,
                plant.category,
                plant.required_lux,
                status
            )
            .trim_end()
            .to_string()
        })
        .collect()
}

/// Whether a prompt answer means yes.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
