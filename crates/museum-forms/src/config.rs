// File: src/config.rs
// Purpose: Configuration parsing from museum-forms.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Form pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FormsConfig {
    #[serde(default)]
    pub drafts: DraftConfig,

    #[serde(default)]
    pub booking: BookingConfig,

    #[serde(default)]
    pub contact: ContactConfig,
}

/// Draft persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftConfig {
    /// Quiescence window before a draft is written
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_booking_key")]
    pub booking_key: String,

    #[serde(default = "default_contact_key")]
    pub contact_key: String,

    /// Delay, counted from the start of a valid contact submission, before its
    /// draft is removed
    #[serde(default = "default_contact_clear_delay_ms")]
    pub contact_clear_delay_ms: u64,

    #[serde(default)]
    pub storage: StorageBackend,
}

/// Storage backend configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageBackend {
    /// In-memory storage (lost when the process ends)
    #[default]
    Memory,

    /// One JSON file per draft key
    Filesystem(FilesystemConfig),
}

/// Filesystem storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilesystemConfig {
    /// Draft directory path
    #[serde(default = "default_drafts_dir")]
    pub path: PathBuf,
}

impl Default for FilesystemConfig {
    fn default() -> Self {
        Self {
            path: default_drafts_dir(),
        }
    }
}

/// Booking form settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Stand-in for the network round-trip
    #[serde(default = "default_booking_submit_delay_ms")]
    pub submit_delay_ms: u64,

    /// How long advisory notices stay on screen
    #[serde(default = "default_notice_dismiss_ms")]
    pub notice_dismiss_ms: u64,

    /// How far ahead a visit can be booked
    #[serde(default = "default_booking_window_months")]
    pub booking_window_months: u32,
}

/// Contact form settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    #[serde(default = "default_contact_submit_delay_ms")]
    pub submit_delay_ms: u64,

    #[serde(default = "default_message_min_chars")]
    pub message_min_chars: usize,

    #[serde(default = "default_message_max_chars")]
    pub message_max_chars: usize,
}

// Default values
fn default_debounce_ms() -> u64 {
    1000
}

fn default_booking_key() -> String {
    "museum-booking-draft".to_string()
}

fn default_contact_key() -> String {
    "museum-contact-draft".to_string()
}

fn default_contact_clear_delay_ms() -> u64 {
    2000
}

fn default_drafts_dir() -> PathBuf {
    PathBuf::from(".museum/drafts")
}

fn default_booking_submit_delay_ms() -> u64 {
    2000
}

fn default_notice_dismiss_ms() -> u64 {
    5000
}

fn default_booking_window_months() -> u32 {
    3
}

fn default_contact_submit_delay_ms() -> u64 {
    1500
}

fn default_message_min_chars() -> usize {
    museum_forms_validation::MESSAGE_MIN_CHARS
}

fn default_message_max_chars() -> usize {
    museum_forms_validation::MESSAGE_MAX_CHARS
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            booking_key: default_booking_key(),
            contact_key: default_contact_key(),
            contact_clear_delay_ms: default_contact_clear_delay_ms(),
            storage: StorageBackend::default(),
        }
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: default_booking_submit_delay_ms(),
            notice_dismiss_ms: default_notice_dismiss_ms(),
            booking_window_months: default_booking_window_months(),
        }
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: default_contact_submit_delay_ms(),
            message_min_chars: default_message_min_chars(),
            message_max_chars: default_message_max_chars(),
        }
    }
}

impl DraftConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn contact_clear_delay(&self) -> Duration {
        Duration::from_millis(self.contact_clear_delay_ms)
    }
}

impl BookingConfig {
    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn notice_dismiss(&self) -> Duration {
        Duration::from_millis(self.notice_dismiss_ms)
    }
}

impl ContactConfig {
    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }
}

impl FormsConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: FormsConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./museum-forms.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("museum-forms.toml")
    }
}
