//! Driver collaborator contract.
//!
//! The registry treats the sensor driver as an opaque resource: a factory
//! builds an instance bound to a bus number, peripheral address and mounting
//! rotation, the instance then proves itself through an explicit `init`
//! call, and release is plain `Drop`. Register-protocol details live
//! entirely behind this seam.
//!
//! # Implementing a driver
//!
//! ```rust,ignore
//! use bmm150_ctl::driver::{DriverFactory, Rotation, SensorDriver};
//! use bmm150_ctl::error::DriverError;
//!
//! struct MyFactory;
//!
//! #[async_trait::async_trait]
//! impl DriverFactory for MyFactory {
//!     async fn build(
//!         &self,
//!         bus: u8,
//!         address: u16,
//!         rotation: Rotation,
//!     ) -> Result<Box<dyn SensorDriver>, DriverError> {
//!         Ok(Box::new(MyDriver::new(bus, address, rotation)))
//!     }
//! }
//! ```

use crate::error::DriverError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Mounting-rotation parameter, passed through to the driver at
/// construction. Opaque to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rotation(
    /// Raw rotation index as the driver expects it.
    pub u8,
);

/// No rotation applied (the default).
pub const ROTATION_NONE: Rotation = Rotation(0);

impl std::fmt::Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A live driver instance owned by an attachment-point slot.
///
/// Contract the registry depends on:
/// - `init` is called exactly once per instance, immediately after
///   construction; failure means the instance is dropped on the spot.
/// - `print_status` is only called while initialized; it reports through
///   the log output channel and returns nothing.
/// - dropping the box releases all resources; no further interaction is
///   possible afterwards.
#[async_trait]
pub trait SensorDriver: Send {
    /// Probe and configure the device. Returns an explicit status rather
    /// than panicking; the registry's start scan continues past failures.
    async fn init(&mut self) -> Result<(), DriverError>;

    /// Report driver state through the output channel.
    async fn print_status(&self);
}

/// Constructs driver instances bound to an attachment point.
///
/// Factories are injected into the registry at composition time, which keeps
/// the candidate table free of driver-specific conditional compilation.
/// Construction may fail without panicking; a failed build is reported the
/// same way as a failed `init`.
#[async_trait]
pub trait DriverFactory: Send + Sync {
    /// Build an uninitialized instance for the given wiring.
    async fn build(
        &self,
        bus: u8,
        address: u16,
        rotation: Rotation,
    ) -> Result<Box<dyn SensorDriver>, DriverError>;
}
