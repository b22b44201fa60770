//! End-to-end lifecycle tests: config file through registry operations.

use bmm150_ctl::drivers::{InitBehavior, MockFactory};
use bmm150_ctl::{BusClass, BusConfig, BusRegistry, BusSelector, Error, Rotation};
use std::io::Write;

fn registry_from_toml(toml: &str, behavior: InitBehavior) -> (BusRegistry, bmm150_ctl::drivers::MockProbe) {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", toml).unwrap();

    let config = BusConfig::from_file(file.path()).unwrap();
    let factory = MockFactory::new(behavior);
    let probe = factory.probe();
    (
        BusRegistry::new(config.into_table().unwrap(), Box::new(factory)),
        probe,
    )
}

const TWO_POINT_TABLE: &str = r#"
[[points]]
class = "internal"
bus = 1
address = 0x10

[[points]]
class = "external"
bus = 2
address = 0x12
"#;

#[tokio::test]
async fn configured_table_drives_full_lifecycle() {
    let (mut registry, probe) = registry_from_toml(TWO_POINT_TABLE, InitBehavior::AlwaysOk);

    assert_eq!(registry.table().len(), 2);

    registry
        .start(BusSelector::All, Rotation::default())
        .await
        .unwrap();
    let claimed = registry.table().find_occupied(BusSelector::All).unwrap();
    assert_eq!(claimed.class(), BusClass::Internal);

    registry.status(BusSelector::All).await.unwrap();
    assert_eq!(probe.status_reports(), 1);

    assert!(matches!(
        registry.stop(BusSelector::External).await,
        Err(Error::NotRunning)
    ));
    registry.stop(BusSelector::Internal).await.unwrap();
    assert!(registry.status(BusSelector::All).await.is_err());
    assert_eq!(probe.live(), 0);
}

#[tokio::test]
async fn start_twice_saturates_then_scoped_stops_release_each() {
    let (mut registry, probe) = registry_from_toml(TWO_POINT_TABLE, InitBehavior::AlwaysOk);

    // Two starts over All claim internal then external.
    registry
        .start(BusSelector::All, Rotation::default())
        .await
        .unwrap();
    registry
        .start(BusSelector::All, Rotation::default())
        .await
        .unwrap();
    assert_eq!(registry.table().occupied_count(), 2);
    assert_eq!(probe.live(), 2);

    // The table is full; a third start fails with no new instance.
    let third = registry.start(BusSelector::All, Rotation::default()).await;
    assert!(matches!(third, Err(Error::NoDeviceStarted)));
    assert_eq!(probe.built(), 2);

    registry.stop(BusSelector::External).await.unwrap();
    registry.stop(BusSelector::Internal).await.unwrap();
    assert_eq!(probe.live(), 0);
    assert_eq!(registry.table().occupied_count(), 0);
}

#[tokio::test]
async fn failing_init_over_configured_table_leaves_nothing_owned() {
    let (mut registry, probe) = registry_from_toml(TWO_POINT_TABLE, InitBehavior::AlwaysFail);

    let result = registry.start(BusSelector::All, Rotation::default()).await;

    assert!(matches!(result, Err(Error::NoDeviceStarted)));
    // Both candidates were attempted and both instances released.
    assert_eq!(probe.built(), 2);
    assert_eq!(probe.live(), 0);
    assert_eq!(registry.table().occupied_count(), 0);
}

#[tokio::test]
async fn scoped_start_ignores_out_of_scope_candidates() {
    let (mut registry, probe) = registry_from_toml(TWO_POINT_TABLE, InitBehavior::AlwaysOk);

    registry
        .start(BusSelector::External, Rotation(2))
        .await
        .unwrap();

    let claimed = registry.table().find_occupied(BusSelector::All).unwrap();
    assert_eq!(claimed.class(), BusClass::External);
    assert_eq!(claimed.bus(), 2);
    assert_eq!(probe.built(), 1);
    assert_eq!(probe.last_rotation(), Some(Rotation(2)));

    // Internal scope saw nothing.
    assert!(registry.status(BusSelector::Internal).await.is_err());
}

#[tokio::test]
async fn malformed_config_is_rejected_before_any_driver_exists() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[[points]]
class = "internal"
bus = 1
address = 0x10

[[points]]
class = "external"
bus = 1
address = 0x10
"#
    )
    .unwrap();

    let err = BusConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}
