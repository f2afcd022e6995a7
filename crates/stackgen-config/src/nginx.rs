//! Nginx web server configuration.

use serde::Deserialize;

use crate::error::ValidationErrors;
use crate::service::ServiceConfig;

/// Default port for plain HTTP traffic.
pub const DEFAULT_HTTP_PORT: u16 = 80;
/// Default port for TLS traffic.
pub const DEFAULT_HTTPS_PORT: u16 = 443;
/// Default port the PHP FastCGI process listens on.
pub const DEFAULT_FASTCGI_PASS_PORT: u16 = 9000;
/// Default FastCGI read timeout in seconds.
pub const DEFAULT_FASTCGI_READ_TIMEOUT: u64 = 60;

/// Nginx service block of a stack description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NginxConfig {
    /// Published HTTP port. Defaults to 80.
    pub http_port: Option<u16>,
    /// Published HTTPS port. Defaults to 443.
    pub https_port: Option<u16>,
    /// Value for the `server_name` directive.
    pub server_name: String,
    /// FastCGI pass-through to the PHP runtime.
    #[serde(rename = "fastCGI")]
    pub fast_cgi: Option<FastCgi>,
}

/// FastCGI sub-block of the Nginx configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FastCgi {
    /// Port requests are passed through to. Defaults to 9000.
    pub pass_port: Option<u16>,
    /// Read timeout in seconds. Defaults to 60.
    pub read_timeout_seconds: Option<u64>,
}

impl ServiceConfig for NginxConfig {
    fn fill_defaults_if_not_set(&mut self) {
        if self.http_port.is_none() {
            self.http_port = Some(DEFAULT_HTTP_PORT);
        }

        if self.https_port.is_none() {
            self.https_port = Some(DEFAULT_HTTPS_PORT);
        }

        // A configured web server always needs a pass-through target for the
        // PHP runtime, so an absent sub-block is created with full defaults.
        let fast_cgi = self.fast_cgi.get_or_insert_with(FastCgi::default);

        if fast_cgi.pass_port.is_none() {
            fast_cgi.pass_port = Some(DEFAULT_FASTCGI_PASS_PORT);
        }

        if fast_cgi.read_timeout_seconds.is_none() {
            fast_cgi.read_timeout_seconds = Some(DEFAULT_FASTCGI_READ_TIMEOUT);
        }
    }

    fn validate(&self) -> Option<ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.server_name.is_empty() {
            errors.add("Nginx server name is required");
        }

        if self.http_port == Some(0) {
            errors.add("Nginx HTTP port must be a positive number");
        }

        if self.https_port == Some(0) {
            errors.add("Nginx HTTPS port must be a positive number");
        }

        if let Some(fast_cgi) = &self.fast_cgi {
            if fast_cgi.pass_port == Some(0) {
                errors.add("Nginx FastCGI pass port must be a positive number");
            }
        }

        errors.into_option()
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
