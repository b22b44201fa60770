//! Attachment-table configuration.
//!
//! The candidate set of attachment points is injected from a TOML file
//! rather than baked in with conditional compilation. A built-in default
//! mirrors the usual board wiring: one internal bus plus two expansion
//! buses, all at the BMM150 address `0x10`.
//!
//! # Example TOML format:
//! ```toml
//! [[points]]
//! class = "internal"
//! bus = 0
//! address = 0x10
//!
//! [[points]]
//! class = "external"
//! bus = 1
//! address = 0x10
//! ```

use crate::bus::{AttachmentPoint, BusClass, BusTable};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Default I2C address of the BMM150.
pub const BMM150_I2C_ADDR: u16 = 0x10;

/// One configured attachment point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointConfig {
    /// Bus class the point belongs to.
    pub class: BusClass,
    /// Physical bus number.
    pub bus: u8,
    /// Peripheral address on that bus.
    #[serde(default = "default_address")]
    pub address: u16,
}

fn default_address() -> u16 {
    BMM150_I2C_ADDR
}

/// Attachment table loaded from a TOML file (or the built-in default).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusConfig {
    /// Candidate attachment points, in scan order.
    pub points: Vec<PointConfig>,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            points: vec![
                PointConfig {
                    class: BusClass::Internal,
                    bus: 0,
                    address: BMM150_I2C_ADDR,
                },
                PointConfig {
                    class: BusClass::External,
                    bus: 1,
                    address: BMM150_I2C_ADDR,
                },
                PointConfig {
                    class: BusClass::External,
                    bus: 2,
                    address: BMM150_I2C_ADDR,
                },
            ],
        }
    }
}

impl BusConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Semantic validation, fail-fast before any driver is constructed.
    ///
    /// Collects every problem instead of stopping at the first, so a config
    /// file can be fixed in one pass.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if self.points.is_empty() {
            problems.push("attachment table is empty".to_string());
        }

        let mut seen = HashSet::new();
        for point in &self.points {
            if !seen.insert((point.bus, point.address)) {
                problems.push(format!(
                    "duplicate attachment point: bus {} address {:#04x}",
                    point.bus, point.address
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::Configuration(problems.join("; ")))
        }
    }

    /// Build the runtime attachment table, preserving declaration order.
    pub fn into_table(self) -> Result<BusTable> {
        self.validate()?;
        Ok(BusTable::new(
            self.points
                .into_iter()
                .map(|p| AttachmentPoint::new(p.class, p.bus, p.address))
                .collect(),
        ))
    }
}
