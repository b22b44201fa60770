//! Attachment table: the closed set of (bus, address) points where the
//! sensor can be wired.
//!
//! The table is built once from configuration and read-mostly afterwards.
//! Each [`AttachmentPoint`] carries an owning slot for a live driver
//! instance; the slot is the only mutable state in the table. Lookup is
//! always a declaration-order scan, so config order doubles as the
//! tie-break order for `start`.

use crate::driver::SensorDriver;
use serde::{Deserialize, Serialize};

/// Logical category of the bus an attachment point sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusClass {
    /// Not categorized; only matched by the `All` selector.
    Unspecified,
    /// On-board I2C bus.
    Internal,
    /// Expansion-connector I2C bus.
    External,
}

/// Scope restriction a command applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BusSelector {
    /// Match every attachment point.
    #[default]
    All,
    /// Only internal-bus points.
    Internal,
    /// Only external-bus points.
    External,
}

impl BusSelector {
    /// Whether an attachment point of the given class is in scope.
    pub fn matches(self, class: BusClass) -> bool {
        match self {
            BusSelector::All => true,
            BusSelector::Internal => class == BusClass::Internal,
            BusSelector::External => class == BusClass::External,
        }
    }
}

impl std::fmt::Display for BusSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BusSelector::All => "all",
            BusSelector::Internal => "internal",
            BusSelector::External => "external",
        };
        write!(f, "{}", label)
    }
}

/// One candidate wiring of the sensor: a bus class, a physical bus number,
/// a peripheral address, and the owning slot for a live driver instance.
pub struct AttachmentPoint {
    class: BusClass,
    bus: u8,
    address: u16,
    device: Option<Box<dyn SensorDriver>>,
}

impl AttachmentPoint {
    /// Create an unoccupied attachment point.
    pub fn new(class: BusClass, bus: u8, address: u16) -> Self {
        Self {
            class,
            bus,
            address,
            device: None,
        }
    }

    /// Bus class of this point.
    pub fn class(&self) -> BusClass {
        self.class
    }

    /// Physical bus number.
    pub fn bus(&self) -> u8 {
        self.bus
    }

    /// Peripheral address on the bus.
    pub fn address(&self) -> u16 {
        self.address
    }

    /// Whether the slot currently owns a live driver instance.
    pub fn is_occupied(&self) -> bool {
        self.device.is_some()
    }

    /// Record ownership of a live driver instance.
    ///
    /// Callers must only attach to an unoccupied slot; the registry enforces
    /// this by skipping occupied entries during `start`.
    pub(crate) fn attach(&mut self, device: Box<dyn SensorDriver>) {
        debug_assert!(self.device.is_none());
        self.device = Some(device);
    }

    /// Clear the slot, returning the owned instance for explicit release.
    pub(crate) fn detach(&mut self) -> Option<Box<dyn SensorDriver>> {
        self.device.take()
    }

    /// Borrow the owned instance, if any.
    pub(crate) fn device(&self) -> Option<&dyn SensorDriver> {
        self.device.as_deref()
    }
}

impl std::fmt::Debug for AttachmentPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttachmentPoint")
            .field("class", &self.class)
            .field("bus", &self.bus)
            .field("address", &format_args!("{:#04x}", self.address))
            .field("occupied", &self.is_occupied())
            .finish()
    }
}

/// Fixed, ordered sequence of attachment points.
///
/// Order is declaration (configuration) order. The table guarantees
/// distinct `(bus, address)` pairs; the config loader rejects duplicates
/// before a table is ever built.
#[derive(Debug, Default)]
pub struct BusTable {
    points: Vec<AttachmentPoint>,
}

impl BusTable {
    /// Build a table from an ordered list of points.
    pub fn new(points: Vec<AttachmentPoint>) -> Self {
        Self { points }
    }

    /// Number of attachment points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the table has no attachment points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of points currently owning a live instance.
    pub fn occupied_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_occupied()).count()
    }

    /// First occupied point in declaration order whose class matches the
    /// selector. No side effects.
    ///
    /// First-match is intentional: the registry's start policy keeps at most
    /// one entry occupied per selector scope in normal use.
    pub fn find_occupied(&self, selector: BusSelector) -> Option<&AttachmentPoint> {
        self.points
            .iter()
            .find(|p| selector.matches(p.class()) && p.is_occupied())
    }

    /// Mutable variant of [`find_occupied`](Self::find_occupied), used by
    /// `stop` to clear the slot it finds.
    pub(crate) fn find_occupied_mut(&mut self, selector: BusSelector) -> Option<&mut AttachmentPoint> {
        self.points
            .iter_mut()
            .find(|p| selector.matches(p.class()) && p.is_occupied())
    }

    /// Iterate points in declaration order.
    pub fn points(&self) -> impl Iterator<Item = &AttachmentPoint> {
        self.points.iter()
    }

    pub(crate) fn points_mut(&mut self) -> impl Iterator<Item = &mut AttachmentPoint> {
        self.points.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_matching() {
        assert!(BusSelector::All.matches(BusClass::Internal));
        assert!(BusSelector::All.matches(BusClass::External));
        assert!(BusSelector::All.matches(BusClass::Unspecified));

        assert!(BusSelector::Internal.matches(BusClass::Internal));
        assert!(!BusSelector::Internal.matches(BusClass::External));
        assert!(!BusSelector::Internal.matches(BusClass::Unspecified));

        assert!(BusSelector::External.matches(BusClass::External));
        assert!(!BusSelector::External.matches(BusClass::Internal));
    }

    #[test]
    fn find_occupied_on_empty_table() {
        let table = BusTable::default();
        assert!(table.find_occupied(BusSelector::All).is_none());
    }

    #[test]
    fn find_occupied_respects_declaration_order_and_scope() {
        use crate::drivers::mock::MockSensor;

        let mut table = BusTable::new(vec![
            AttachmentPoint::new(BusClass::Internal, 1, 0x10),
            AttachmentPoint::new(BusClass::External, 2, 0x12),
        ]);

        // Nothing occupied yet.
        assert!(table.find_occupied(BusSelector::All).is_none());

        // Occupy the external entry only.
        for point in table.points_mut() {
            if point.class() == BusClass::External {
                point.attach(Box::new(MockSensor::always_ok()));
            }
        }

        assert!(table.find_occupied(BusSelector::Internal).is_none());
        let found = table.find_occupied(BusSelector::External);
        assert_eq!(found.map(|p| p.bus()), Some(2));
        // "All" falls through the unoccupied internal entry to the external one.
        let found = table.find_occupied(BusSelector::All);
        assert_eq!(found.map(|p| p.bus()), Some(2));
    }
}
