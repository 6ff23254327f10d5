//! Connection options.
//!
//! An explicit value passed to whatever opens the connection; defaults are
//! documented constants, never mutable process-wide state.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 3306;
pub const DEFAULT_CHARSET: &str = "utf8";

/// Options describing one database connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectOptions {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub charset: String,
}

impl ConnectOptions {
    pub fn new(
        host: impl Into<String>,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            database: database.into(),
            username: username.into(),
            password: password.into(),
            charset: DEFAULT_CHARSET.to_string(),
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    /// Render the options as a MySQL DSN.
    pub fn dsn(&self) -> String {
        format!(
            "mysql:host={};port={};dbname={};charset={}",
            self.host, self.port, self.database, self.charset
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dsn_format() {
        let options = ConnectOptions::new("localhost", "app", "root", "secret");
        assert_eq!(
            options.dsn(),
            "mysql:host=localhost;port=3306;dbname=app;charset=utf8"
        );

        let options = options.port(3307).charset("utf8mb4");
        assert_eq!(
            options.dsn(),
            "mysql:host=localhost;port=3307;dbname=app;charset=utf8mb4"
        );
    }
}
