//! Mock connection payload shared by the demo singletons.

use std::borrow::Cow;
use std::sync::{PoisonError, RwLock};

use crate::config::ConnectionConfig;

type Text = Cow<'static, str>;

/// Placeholder database connection details. Never connected to anything.
///
/// `database_name` is fixed when the value is built. `host` and `port` can be
/// changed through a shared reference, and every holder of that reference
/// sees the change.
#[derive(Debug)]
pub struct ConnectionSettings {
    database_name: Text,
    host: RwLock<Text>,
    port: RwLock<Text>,
}

impl ConnectionSettings {
    /// Builds settings from string literals; usable in a `static`.
    pub const fn from_static(
        database_name: &'static str,
        host: &'static str,
        port: &'static str,
    ) -> Self {
        Self {
            database_name: Cow::Borrowed(database_name),
            host: RwLock::new(Cow::Borrowed(host)),
            port: RwLock::new(Cow::Borrowed(port)),
        }
    }

    /// Builds settings from owned or borrowed text.
    pub fn new(
        database_name: impl Into<Text>,
        host: impl Into<Text>,
        port: impl Into<Text>,
    ) -> Self {
        Self {
            database_name: database_name.into(),
            host: RwLock::new(host.into()),
            port: RwLock::new(port.into()),
        }
    }

    /// Builds settings from their serde form.
    pub fn from_config(config: &ConnectionConfig) -> Self {
        Self::new(
            config.database_name.clone(),
            config.host.clone(),
            config.port.clone(),
        )
    }

    /// Current values in serde form.
    pub fn to_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            database_name: self.database_name.to_string(),
            host: self.host(),
            port: self.port(),
        }
    }

    /// Fixed at construction.
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// A copy of the current host.
    pub fn host(&self) -> String {
        read(&self.host)
    }

    /// Replaces the host for every holder of this reference.
    pub fn set_host(&self, host: impl Into<Text>) {
        write(&self.host, host.into());
    }

    /// A copy of the current port.
    pub fn port(&self) -> String {
        read(&self.port)
    }

    /// Replaces the port for every holder of this reference.
    pub fn set_port(&self, port: impl Into<Text>) {
        write(&self.port, port.into());
    }
}

// A writer that panicked left a complete string behind, so poisoning is ignored.
fn read(field: &RwLock<Text>) -> String {
    field
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .to_string()
}

fn write(field: &RwLock<Text>, value: Text) {
    *field.write().unwrap_or_else(PoisonError::into_inner) = value;
}
