//! Cart configuration.
//!
//! Mirrors the shipped defaults: a cart-level tax rate applied to items
//! that do not carry their own, number-format defaults used when a
//! formatted accessor is called without explicit separators, and cookie
//! attributes for the cookie storage handler.

use crate::error::CartError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level cart configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    /// Default tax rate in percent, applied to items without their own rate.
    pub tax: f64,
    /// Defaults for formatted monetary accessors.
    pub format: FormatConfig,
    /// Attributes applied by the cookie storage handler.
    pub cookie: CookieOptions,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            tax: 20.0,
            format: FormatConfig::default(),
            cookie: CookieOptions::default(),
        }
    }
}

impl CartConfig {
    /// Validate the configuration. Called at cart construction; a failure
    /// here is fatal and never retried.
    pub fn validate(&self) -> Result<(), CartError> {
        if !self.tax.is_finite() || self.tax < 0.0 || self.tax > 100.0 {
            return Err(CartError::InvalidHandlerConfiguration(format!(
                "default tax rate must be a percentage between 0 and 100, got {}",
                self.tax
            )));
        }
        if self.cookie.same_site == SameSite::None && !self.cookie.secure {
            return Err(CartError::InvalidHandlerConfiguration(
                "SameSite=None cookies must also be marked secure".to_string(),
            ));
        }
        Ok(())
    }
}

/// Number-format defaults used when a formatted accessor is called with
/// `None` arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Fractional digits.
    pub decimals: u32,
    /// Separator between integer and fractional parts.
    pub decimal_point: String,
    /// Separator between groups of three integer digits.
    pub thousand_separator: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            decimals: 2,
            decimal_point: ".".to_string(),
            thousand_separator: ",".to_string(),
        }
    }
}

/// Cookie attributes for the cookie storage handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieOptions {
    /// Lifetime in minutes. `None` produces a session cookie with no
    /// `Expires` attribute.
    pub expires_minutes: Option<u32>,
    /// Cookie path.
    pub path: String,
    /// Cookie domain; set to `.your-domain.com` for site-wide cookies.
    pub domain: String,
    /// Only send over HTTPS.
    pub secure: bool,
    /// Not accessible from client-side scripts.
    pub http_only: bool,
    /// SameSite attribute.
    pub same_site: SameSite,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            expires_minutes: Some(60),
            path: "/".to_string(),
            domain: String::new(),
            secure: false,
            http_only: true,
            same_site: SameSite::Lax,
        }
    }
}

/// Cookie SameSite attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    None,
    Lax,
    Strict,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::None => "None",
            SameSite::Lax => "Lax",
            SameSite::Strict => "Strict",
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
