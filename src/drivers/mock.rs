//! Instrumented mock driver for testing the lifecycle registry without
//! hardware.
//!
//! [`MockFactory`] builds [`MockSensor`] instances and shares a
//! [`MockProbe`] with the test, which tracks how many instances were built,
//! how many are still alive (decremented on `Drop`, proving release), how
//! many status reports ran, and the last rotation the factory saw.
//! [`InitBehavior`] injects construction and initialization failures.

use crate::driver::{DriverFactory, Rotation, SensorDriver};
use crate::error::DriverError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Failure-injection policy for a [`MockFactory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitBehavior {
    /// Every instance initializes successfully.
    AlwaysOk,
    /// Every instance fails `init`.
    AlwaysFail,
    /// The first `n` instances fail `init`; later ones succeed.
    FailFirst(usize),
    /// The first `n` build calls fail outright, producing no instance.
    RefuseBuildFirst(usize),
}

/// Shared counters observed by tests.
#[derive(Default)]
struct ProbeState {
    built: AtomicUsize,
    live: AtomicUsize,
    status_reports: AtomicUsize,
    last_rotation: Mutex<Option<Rotation>>,
}

/// Handle onto a factory's counters.
#[derive(Clone, Default)]
pub struct MockProbe {
    state: Arc<ProbeState>,
}

impl MockProbe {
    /// Instances the factory has constructed.
    pub fn built(&self) -> usize {
        self.state.built.load(Ordering::SeqCst)
    }

    /// Instances constructed and not yet dropped.
    pub fn live(&self) -> usize {
        self.state.live.load(Ordering::SeqCst)
    }

    /// Completed `print_status` calls across all instances.
    pub fn status_reports(&self) -> usize {
        self.state.status_reports.load(Ordering::SeqCst)
    }

    /// Rotation passed to the most recent build call.
    #[allow(clippy::unwrap_used)]
    pub fn last_rotation(&self) -> Option<Rotation> {
        *self.state.last_rotation.lock().unwrap()
    }
}

/// Mock sensor instance.
pub struct MockSensor {
    bus: u8,
    address: u16,
    init_ok: bool,
    probe: MockProbe,
}

impl MockSensor {
    /// Standalone instance that always initializes, for table-level tests.
    pub fn always_ok() -> Self {
        let probe = MockProbe::default();
        probe.state.built.fetch_add(1, Ordering::SeqCst);
        probe.state.live.fetch_add(1, Ordering::SeqCst);
        Self {
            bus: 0,
            address: 0,
            init_ok: true,
            probe,
        }
    }
}

#[async_trait]
impl SensorDriver for MockSensor {
    async fn init(&mut self) -> Result<(), DriverError> {
        if self.init_ok {
            Ok(())
        } else {
            Err(DriverError::initialization(format!(
                "mock sensor on bus {} at {:#04x} refused init",
                self.bus, self.address
            )))
        }
    }

    async fn print_status(&self) {
        self.probe.state.status_reports.fetch_add(1, Ordering::SeqCst);
        tracing::info!(bus = self.bus, address = self.address, "mock sensor status");
    }
}

impl Drop for MockSensor {
    fn drop(&mut self) {
        self.probe.state.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Factory producing [`MockSensor`] instances under an [`InitBehavior`].
pub struct MockFactory {
    behavior: InitBehavior,
    attempts: AtomicUsize,
    probe: MockProbe,
}

impl MockFactory {
    /// Create a factory with the given failure-injection policy.
    pub fn new(behavior: InitBehavior) -> Self {
        Self {
            behavior,
            attempts: AtomicUsize::new(0),
            probe: MockProbe::default(),
        }
    }

    /// Counter handle to hand to the test before the factory is boxed.
    pub fn probe(&self) -> MockProbe {
        self.probe.clone()
    }
}

#[async_trait]
impl DriverFactory for MockFactory {
    #[allow(clippy::unwrap_used)]
    async fn build(
        &self,
        bus: u8,
        address: u16,
        rotation: Rotation,
    ) -> Result<Box<dyn SensorDriver>, DriverError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        *self.probe.state.last_rotation.lock().unwrap() = Some(rotation);

        let init_ok = match self.behavior {
            InitBehavior::AlwaysOk => true,
            InitBehavior::AlwaysFail => false,
            InitBehavior::FailFirst(n) => attempt >= n,
            InitBehavior::RefuseBuildFirst(n) => {
                if attempt < n {
                    return Err(DriverError::construction(format!(
                        "mock factory refused to build for bus {}",
                        bus
                    )));
                }
                true
            }
        };

        self.probe.state.built.fetch_add(1, Ordering::SeqCst);
        self.probe.state.live.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(MockSensor {
            bus,
            address,
            init_ok,
            probe: self.probe.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn probe_tracks_build_and_drop() {
        let factory = MockFactory::new(InitBehavior::AlwaysOk);
        let probe = factory.probe();

        let device = factory.build(1, 0x10, Rotation(2)).await.unwrap();
        assert_eq!(probe.built(), 1);
        assert_eq!(probe.live(), 1);
        assert_eq!(probe.last_rotation(), Some(Rotation(2)));

        drop(device);
        assert_eq!(probe.live(), 0);
    }

    #[tokio::test]
    async fn fail_first_recovers_after_n_attempts() {
        let factory = MockFactory::new(InitBehavior::FailFirst(1));

        let mut first = factory.build(1, 0x10, Rotation::default()).await.unwrap();
        assert!(first.init().await.is_err());

        let mut second = factory.build(2, 0x10, Rotation::default()).await.unwrap();
        assert!(second.init().await.is_ok());
    }

    #[tokio::test]
    async fn refuse_build_produces_no_instance() {
        let factory = MockFactory::new(InitBehavior::RefuseBuildFirst(1));
        let probe = factory.probe();

        assert!(factory.build(1, 0x10, Rotation::default()).await.is_err());
        assert_eq!(probe.built(), 0);

        assert!(factory.build(2, 0x10, Rotation::default()).await.is_ok());
        assert_eq!(probe.built(), 1);
    }
}
