//! Light adequacy classification.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fraction of the required lux accepted on either side of the target.
pub const TOLERANCE_RATIO: f64 = 0.15;

/// How a light reading compares to a plant's requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightStatus {
    /// Too much light; move the plant somewhere dimmer.
    Excess,
    /// Not enough light; move the plant somewhere brighter.
    Deficient,
    /// Within tolerance of the requirement.
    Optimal,
}

impl LightStatus {
    /// Classifies `current` against `required`.
    ///
    /// Both bounds are exclusive: a reading exactly on `required ± 15%` is
    /// `Optimal`. `required` must be positive and `current` finite; use
    /// [`LightReport::evaluate`] when the input has not been checked.
    #[must_use]
    pub fn classify(required: f64, current: f64) -> Self {
        debug_assert!(required > 0.0, "required lux must be positive");
        let tolerance = TOLERANCE_RATIO * required;
        if current > required + tolerance {
            LightStatus::Excess
        } else if current < required - tolerance {
            LightStatus::Deficient
        } else {
            LightStatus::Optimal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LightStatus::Excess => "excess",
            LightStatus::Deficient => "deficient",
            LightStatus::Optimal => "optimal",
        }
    }
}

impl fmt::Display for LightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classification together with the range it was judged against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightReport {
    pub status: LightStatus,
    pub required_lux: f64,
    pub current_lux: f64,
    pub min_lux: f64,
    pub max_lux: f64,
}

impl LightReport {
    /// Evaluates a reading, rejecting a non-positive or non-finite requirement
    /// and a non-finite reading.
    pub fn evaluate(required: f64, current: f64) -> Result<Self> {
        if !required.is_finite() || required <= 0.0 {
            return Err(Error::NonPositiveRequirement(required));
        }
        if !current.is_finite() {
            return Err(Error::InvalidLux {
                input: current.to_string(),
                reason: "reading is not finite",
            });
        }
        let tolerance = TOLERANCE_RATIO * required;
        Ok(Self {
            status: LightStatus::classify(required, current),
            required_lux: required,
            current_lux: current,
            min_lux: required - tolerance,
            max_lux: required + tolerance,
        })
    }

    /// Whether the plant should be moved.
    pub fn needs_relocation(&self) -> bool {
        self.status != LightStatus::Optimal
    }
}

impl fmt::Display for LightReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            LightStatus::Excess => write!(
                f,
                "Too much light ({:.0} lux). Move the plant somewhere dimmer. Ideal: {:.0} lux.",
                self.current_lux, self.required_lux
            ),
            LightStatus::Deficient => write!(
                f,
                "Not enough light ({:.0} lux). Move the plant somewhere brighter. Ideal: {:.0} lux.",
                self.current_lux, self.required_lux
            ),
            LightStatus::Optimal => write!(
                f,
                "Optimal. The current light ({:.0} lux) is within the ideal range ({:.0} - {:.0} lux).",
                self.current_lux, self.min_lux, self.max_lux
            ),
        }
    }
}
