//! Connection descriptor derived from [`Settings`].

use std::fmt;

use crate::settings::Settings;

/// URL scheme accepted by the PostgreSQL client
pub const POSTGRES_SCHEME: &str = "postgresql";

/// Resolved address and credentials for one database.
///
/// `Display` gives the full connection string; use [`redacted`](Self::redacted)
/// for anything that ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    scheme: &'static str,
    host: String,
    port: u16,
    user: String,
    password: String,
    database_name: String,
}

impl ConnectionDescriptor {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            scheme: POSTGRES_SCHEME,
            host: settings.host().to_owned(),
            port: settings.port(),
            user: settings.user().to_owned(),
            password: settings.password().to_owned(),
            database_name: settings.database_name().to_owned(),
        }
    }

    pub fn scheme(&self) -> &str {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Connection string with the password replaced by `***`.
    pub fn redacted(&self) -> String {
        self.render("***")
    }

    fn render(&self, password: &str) -> String {
        format!(
            "{}://{}:{}@{}:{}/{}",
            self.scheme, self.user, password, self.host, self.port, self.database_name
        )
    }
}

impl From<&Settings> for ConnectionDescriptor {
    fn from(settings: &Settings) -> Self {
        Self::from_settings(settings)
    }
}

impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&self.password))
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConnectionDescriptor")
            .field(&self.redacted())
            .finish()
    }
}
