//! Single-shot ADC sampling on top of the ESP-IDF `adc_oneshot` and
//! `adc_cali` drivers.
//!
//! A fixed table maps GPIO numbers to ADC1 channels, so callers address
//! pins by number instead of carrying per-pin driver types around:
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! let mut adc = esp32_adc::Adc::new();
//! adc.enable(2)?;
//! let mv = adc.read_voltage(2)?;
//! # Ok(()) }
//! ```

/// the service itself: enable pins, read raw counts or millivolts
mod adc;

/// pin → channel descriptors and the default table
mod channel;

/// attenuation and width enums, plus the JSON-loadable settings
mod config;

/// RAII wrappers around the vendor driver handles
mod oneshot;

pub use adc::Adc;
pub use config::{Attenuation, Config, Width};
