//! Scheduling configuration.
//!
//! Loaded from TOML. Every section is optional; missing values fall
//! back to the conference defaults (90-minute activities on a
//! 15-minute grid).
//!
//! ```toml
//! [slots]
//! duration_minutes = 90
//! granularity_minutes = 15
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::planner::{SlotPlanner, SlotPolicy};

/// Top-level scheduling configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingConfig {
    #[serde(default)]
    pub slots: SlotPolicy,
}

impl SchedulingConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Checks that the slot policy can drive the planner.
    pub fn validate(&self) -> Result<()> {
        let slots = &self.slots;
        if slots.duration_minutes <= 0 {
            return Err(Error::InvalidConfig {
                message: format!(
                    "slots.duration_minutes must be positive, got {}",
                    slots.duration_minutes
                ),
            });
        }
        if slots.granularity_minutes <= 0 {
            return Err(Error::InvalidConfig {
                message: format!(
                    "slots.granularity_minutes must be positive, got {}",
                    slots.granularity_minutes
                ),
            });
        }
        if slots.granularity_minutes > slots.duration_minutes {
            return Err(Error::InvalidConfig {
                message: "slots.granularity_minutes cannot exceed slots.duration_minutes".into(),
            });
        }
        Ok(())
    }

    /// Builds a planner with this configuration's policy.
    pub fn planner(&self) -> SlotPlanner {
        SlotPlanner::new().with_policy(self.slots)
    }
}
