//! Lifecycle registry over the attachment table.
//!
//! [`BusRegistry`] is the only component that creates and destroys driver
//! instances. It owns the table and an injected [`DriverFactory`], and
//! exposes the three command operations:
//!
//! - `start` — sequential first-success scan over unoccupied in-scope
//!   entries; a failed candidate is released on the spot and the scan moves
//!   on, so `start` over `All` falls through to the next wired bus.
//! - `stop` — detach and drop the first occupied in-scope instance.
//! - `status` — delegate to the occupied instance's status report.
//!
//! Each operation runs to completion before returning; the table is not
//! internally locked, so callers serialize invocations (the CLI dispatch
//! layer runs them as one-shot actions).

use crate::bus::{BusSelector, BusTable};
use crate::driver::{DriverFactory, Rotation};
use crate::error::{Error, Result};
use tracing::{error, info, warn};

/// Owns the attachment table and arbitrates driver lifecycles over it.
pub struct BusRegistry {
    table: BusTable,
    factory: Box<dyn DriverFactory>,
}

impl BusRegistry {
    /// Create a registry over a table, with the given driver factory.
    pub fn new(table: BusTable, factory: Box<dyn DriverFactory>) -> Self {
        Self { table, factory }
    }

    /// Read access to the attachment table.
    pub fn table(&self) -> &BusTable {
        &self.table
    }

    /// Start one driver instance within the selector scope.
    ///
    /// Scans the table in declaration order. Occupied entries in scope are
    /// skipped with a warning (diagnostic noise, not an error); entries out
    /// of scope are skipped silently. The first matching unoccupied entry is
    /// tried: build, then `init`. On success the instance is recorded in the
    /// slot and the scan stops. On failure the instance is dropped
    /// immediately and the scan continues with the next candidate.
    ///
    /// Returns [`Error::NoDeviceStarted`] if the scan exhausts without a
    /// successful start.
    pub async fn start(&mut self, selector: BusSelector, rotation: Rotation) -> Result<()> {
        let factory = &self.factory;

        for point in self.table.points_mut() {
            if point.is_occupied() {
                if selector.matches(point.class()) {
                    warn!(bus = point.bus(), "already started");
                }
                continue;
            }

            if !selector.matches(point.class()) {
                continue;
            }

            let bus = point.bus();
            let address = point.address();

            let attempt = match factory.build(bus, address, rotation).await {
                Ok(mut device) => device.init().await.map(|()| device),
                Err(e) => Err(e),
            };

            match attempt {
                Ok(device) => {
                    point.attach(device);
                    info!(bus, address, %rotation, "driver started");
                    return Ok(());
                }
                Err(e) => {
                    // The failed instance is already dropped; keep scanning so
                    // a start over `All` can fall through to the next bus.
                    error!(bus, address, "driver start failed: {}", e);
                }
            }
        }

        Err(Error::NoDeviceStarted)
    }

    /// Stop the first occupied driver instance within the selector scope.
    ///
    /// Detaches the instance from its slot and drops it, releasing all its
    /// resources deterministically. Returns [`Error::NotRunning`] if no
    /// occupied entry matches the scope.
    pub async fn stop(&mut self, selector: BusSelector) -> Result<()> {
        match self.table.find_occupied_mut(selector) {
            Some(point) => {
                let bus = point.bus();
                let device = point.detach();
                drop(device);
                info!(bus, "driver stopped");
                Ok(())
            }
            None => {
                warn!(%selector, "driver not running");
                Err(Error::NotRunning)
            }
        }
    }

    /// Report status of the first occupied driver instance in scope.
    ///
    /// Delegates to the instance's status-report contract. Returns
    /// [`Error::NotRunning`] if no occupied entry matches the scope.
    pub async fn status(&self, selector: BusSelector) -> Result<()> {
        match self.table.find_occupied(selector) {
            Some(point) => {
                if let Some(device) = point.device() {
                    device.print_status().await;
                }
                Ok(())
            }
            None => {
                warn!(%selector, "driver not running");
                Err(Error::NotRunning)
            }
        }
    }
}
