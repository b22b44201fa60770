//! Bus-scoped lifecycle registry for the BMM150 magnetometer.
//!
//! The crate enumerates the candidate (bus, address) attachment points
//! where the sensor can be wired and arbitrates start/stop/status of a
//! driver instance at each point, guaranteeing at most one live instance
//! per point. The sensor register protocol itself sits behind the
//! [`driver::SensorDriver`] seam and is out of scope here.
//!
//! # Components
//!
//! - [`bus`] - the attachment table: a fixed, configuration-derived list of
//!   candidate wiring points with one owning slot each
//! - [`registry`] - the lifecycle controller over the table
//! - [`driver`] - the collaborator contract (driver trait + factory)
//! - [`config`] - TOML-injected attachment table
//! - [`drivers`] - shipped collaborators (simulated BMM150, test mock)

pub mod bus;
pub mod config;
pub mod driver;
pub mod drivers;
pub mod error;
pub mod registry;

pub use bus::{AttachmentPoint, BusClass, BusSelector, BusTable};
pub use config::{BusConfig, PointConfig, BMM150_I2C_ADDR};
pub use driver::{DriverFactory, Rotation, SensorDriver, ROTATION_NONE};
pub use error::{DriverError, DriverErrorKind, Error, Result};
pub use registry::BusRegistry;
