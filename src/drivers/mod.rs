//! Driver collaborators shipped with the crate.
//!
//! - [`sim`] - simulated BMM150, the CLI's default factory
//! - [`mock`] - instrumented mock with failure injection, for tests

pub mod mock;
pub mod sim;

pub use mock::{InitBehavior, MockFactory, MockProbe, MockSensor};
pub use sim::{SimBmm150, SimFactory};
