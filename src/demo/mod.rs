//! Process-wide demo singletons, one per policy.
//!
//! Each holder is a private `static` reached only through its accessor. None
//! is ever torn down.

mod settings;

pub use settings::ConnectionSettings;

use crate::cell::{EagerCell, LockCell, OnceLockCell, RacyCell};
use crate::config::{DEFAULT_HOST, DEFAULT_PORT, MOCK_DATABASE_NAME};
use crate::error::FactoryResult;

/// Database name the lazy-safe payload starts from.
pub const MOCKED_DATABASE_NAME: &str = "mockedDatabaseName";
/// Port the lazy-safe factory assigns after construction.
pub const LAZY_SAFE_PORT: &str = "1234";

static EAGER_SAFE_STATIC: EagerCell<ConnectionSettings> = EagerCell::new(
    ConnectionSettings::from_static(MOCK_DATABASE_NAME, DEFAULT_HOST, DEFAULT_PORT),
);

static LAZY_SAFE: OnceLockCell<LazySafeSingleton> = OnceLockCell::new(LazySafeSingleton::build);

static LAZY_SAFE_LOCK: LockCell<ConnectionSettings> = LockCell::new(mock_settings);

static LAZY_UNSAFE: RacyCell<ConnectionSettings> = RacyCell::new(mock_settings);

fn mock_settings() -> FactoryResult<ConnectionSettings> {
    Ok(ConnectionSettings::from_static(
        MOCK_DATABASE_NAME,
        DEFAULT_HOST,
        DEFAULT_PORT,
    ))
}

/// Payload of the `OnceLock`-backed singleton: settings behind a `data` field.
#[derive(Debug)]
pub struct LazySafeSingleton {
    data: ConnectionSettings,
}

impl LazySafeSingleton {
    fn build() -> FactoryResult<Self> {
        let data = ConnectionSettings::from_static(MOCKED_DATABASE_NAME, "", "");
        data.set_host(DEFAULT_HOST);
        data.set_port(LAZY_SAFE_PORT);
        Ok(Self { data })
    }

    /// The wrapped settings.
    pub fn data(&self) -> &ConnectionSettings {
        &self.data
    }
}

/// Eager singleton; built at compile time, so it cannot fail.
pub fn eager_safe_static() -> &'static ConnectionSettings {
    EAGER_SAFE_STATIC.instance()
}

/// `OnceLock`-backed singleton.
///
/// # Errors
/// Only if the factory fails, which the mock factory never does.
pub fn lazy_safe() -> FactoryResult<&'static LazySafeSingleton> {
    LAZY_SAFE.instance()
}

/// Double-checked-locking singleton.
///
/// # Errors
/// Only if the factory fails, which the mock factory never does.
pub fn lazy_safe_lock() -> FactoryResult<&'static ConnectionSettings> {
    LAZY_SAFE_LOCK.instance()
}

/// Unsynchronized singleton. Concurrent first calls can return different instances.
///
/// # Errors
/// Only if the factory fails, which the mock factory never does.
pub fn lazy_unsafe() -> FactoryResult<&'static ConnectionSettings> {
    LAZY_UNSAFE.instance()
}

/// How many instances [`lazy_unsafe`] has built and then lost to a race.
pub fn lazy_unsafe_discarded_instances() -> usize {
    LAZY_UNSAFE.discarded_instances()
}
