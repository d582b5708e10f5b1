//! Branding and feature-flag configuration.

use serde::{Deserialize, Serialize};

/// Shop identity shown on every page and used as the token issuer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_tagline")]
    pub tagline: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default = "default_primary")]
    pub primary_color: String,
    #[serde(default = "default_secondary")]
    pub secondary_color: String,
    #[serde(default = "default_accent")]
    pub accent_color: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: String,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            tagline: default_tagline(),
            logo: String::new(),
            primary_color: default_primary(),
            secondary_color: default_secondary(),
            accent_color: default_accent(),
            contact_email: String::new(),
            contact_phone: String::new(),
        }
    }
}

/// Optional collaborators switched on per deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturesConfig {
    #[serde(default)]
    pub payments: bool,
    #[serde(default)]
    pub sms: bool,
    #[serde(default = "default_true")]
    pub surveys: bool,
    #[serde(default)]
    pub email_notifications: bool,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            payments: false,
            sms: false,
            surveys: true,
            email_notifications: false,
        }
    }
}

fn default_name() -> String {
    "BicicletApp".to_string()
}

fn default_tagline() -> String {
    "Bicycle workshop".to_string()
}

fn default_primary() -> String {
    "#2563eb".to_string()
}

fn default_secondary() -> String {
    "#1e293b".to_string()
}

fn default_accent() -> String {
    "#f59e0b".to_string()
}

fn default_true() -> bool {
    true
}
