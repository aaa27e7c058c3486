#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![deny(unsafe_code)]

mod channel;
mod config;
mod driver;
mod error;

pub use channel::Channel;
pub use config::{Config, ConversionMode, Gain, SampleRate};
pub use driver::{Mcp342x, Variant};
pub use error::Error;

/// Factory-default I2C address shared across the family.
///
/// Chips are also sold pre-programmed with other addresses, and the MCP3427
/// and MCP3428 take further address bits from their Adr0 and Adr1 pins, so
/// check the marking on your part if the device does not respond here.
pub const DEFAULT_ADDRESS: u8 = 0x68;

/// On-board voltage reference, in volts.
///
/// Every chip in the family converts against the same internal 2.048 V
/// reference. Together with the PGA gain this fixes the usable input range:
/// see [`Channel::max_voltage`].
pub const REFERENCE_VOLTAGE: f64 = 2.048;
