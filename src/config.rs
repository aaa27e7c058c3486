//! Types for the single 8-bit configuration register.
//!
//! The whole of the device's configuration lives in one byte, written over
//! I2C to select the mux channel, conversion mode, sample rate and PGA gain.
//! The same byte comes back at the end of every result read, with bit 7
//! changed to report whether the latest conversion is complete.

use std::time::Duration;

use bit_field::BitField;

/// Programmable gain amplifier setting.
///
/// The PGA amplifies the input before conversion, dividing the effective
/// full-scale range. At a gain of 8 the ±2.048 V differential range shrinks
/// to ±256 mV.
///
/// # Datasheet
///
/// See section 5.2 for the configuration register (bits 1-0) and section
/// 4.5 for the PGA itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gain {
    /// 1 V/V (no amplification).
    X1,
    /// 2 V/V
    X2,
    /// 4 V/V
    X4,
    /// 8 V/V
    X8,
}

impl Gain {
    /// Look up the setting for a plain multiplier.
    ///
    /// Returns `None` unless the multiplier is 1, 2, 4 or 8, the only gains
    /// the PGA offers.
    pub fn from_multiplier(multiplier: u8) -> Option<Self> {
        match multiplier {
            1 => Some(Self::X1),
            2 => Some(Self::X2),
            4 => Some(Self::X4),
            8 => Some(Self::X8),
            _ => None,
        }
    }

    /// The gain as a plain multiplier.
    pub fn multiplier(self) -> u8 {
        match self {
            Self::X1 => 1,
            Self::X2 => 2,
            Self::X4 => 4,
            Self::X8 => 8,
        }
    }
}

impl From<u8> for Gain {
    fn from(value: u8) -> Self {
        assert!(value <= 0b11, "Incorrect use of the from constructor.");
        match value {
            0b00 => Self::X1,
            0b01 => Self::X2,
            0b10 => Self::X4,
            0b11 => Self::X8,
            _ => unreachable!(),
        }
    }
}

impl From<Gain> for u8 {
    fn from(value: Gain) -> Self {
        match value {
            Gain::X1 => 0b00,
            Gain::X2 => 0b01,
            Gain::X4 => 0b10,
            Gain::X8 => 0b11,
        }
    }
}

/// Sample rate, which also fixes the conversion resolution.
///
/// The delta-sigma modulator trades speed for resolution:
///
/// | Rate     | Resolution | Full-scale code |
/// |----------|------------|-----------------|
/// | 240 sps  | 12 bits    | ±2047           |
/// | 60 sps   | 14 bits    | ±8191           |
/// | 15 sps   | 16 bits    | ±32767          |
/// | 3.75 sps | 18 bits    | ±131071         |
///
/// # Datasheet
///
/// See section 5.2 for the configuration register (bits 3-2) and table 4-1
/// for the rate and resolution pairings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleRate {
    /// 240 samples per second, 12-bit resolution.
    Sps240,
    /// 60 samples per second, 14-bit resolution.
    Sps60,
    /// 15 samples per second, 16-bit resolution.
    Sps15,
    /// 3.75 samples per second, 18-bit resolution.
    Sps3_75,
}

impl SampleRate {
    /// Look up the setting for a whole number of samples per second.
    ///
    /// Returns `None` unless the rate is 15, 60 or 240. The 3.75 sps rate
    /// has no integer spelling; select [`SampleRate::Sps3_75`] directly.
    pub fn from_sps(samples_per_second: u32) -> Option<Self> {
        match samples_per_second {
            240 => Some(Self::Sps240),
            60 => Some(Self::Sps60),
            15 => Some(Self::Sps15),
            _ => None,
        }
    }

    /// The rate in samples per second.
    pub fn samples_per_second(self) -> f64 {
        match self {
            Self::Sps240 => 240.0,
            Self::Sps60 => 60.0,
            Self::Sps15 => 15.0,
            Self::Sps3_75 => 3.75,
        }
    }

    /// Resolution of a conversion at this rate, in bits.
    pub fn bit_width(self) -> u32 {
        match self {
            Self::Sps240 => 12,
            Self::Sps60 => 14,
            Self::Sps15 => 16,
            Self::Sps3_75 => 18,
        }
    }

    /// Largest positive code a conversion at this rate can produce.
    ///
    /// Codes run from `-(max_code + 1)` to `max_code`. The value is used
    /// both for two's-complement sign correction and for working out the
    /// voltage each count represents.
    pub fn max_code(self) -> i32 {
        match self {
            Self::Sps240 => 2047,
            Self::Sps60 => 8191,
            Self::Sps15 => 32767,
            Self::Sps3_75 => 131071,
        }
    }

    /// Number of bytes in a result read at this rate.
    ///
    /// Up to 16 bits the device sends two data bytes and then the
    /// configuration byte; the 18-bit rate needs a third data byte.
    pub fn read_length(self) -> usize {
        match self {
            Self::Sps240 | Self::Sps60 | Self::Sps15 => 3,
            Self::Sps3_75 => 4,
        }
    }

    /// Estimated time for one conversion at this rate.
    pub fn conversion_time(self) -> Duration {
        Duration::from_secs_f64(1.0 / self.samples_per_second())
    }

    /// Mask covering the bits a conversion at this rate actually drives.
    pub(crate) fn code_mask(self) -> u32 {
        (1 << self.bit_width()) - 1
    }
}

impl From<u8> for SampleRate {
    fn from(value: u8) -> Self {
        assert!(value <= 0b11, "Incorrect use of the from constructor.");
        match value {
            0b00 => Self::Sps240,
            0b01 => Self::Sps60,
            0b10 => Self::Sps15,
            0b11 => Self::Sps3_75,
            _ => unreachable!(),
        }
    }
}

impl From<SampleRate> for u8 {
    fn from(value: SampleRate) -> Self {
        match value {
            SampleRate::Sps240 => 0b00,
            SampleRate::Sps60 => 0b01,
            SampleRate::Sps15 => 0b10,
            SampleRate::Sps3_75 => 0b11,
        }
    }
}

/// Acquisition mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionMode {
    /// Convert once when the start bit is written, then idle in low power.
    OneShot,
    /// Convert back to back without further prompting.
    Continuous,
}

impl ConversionMode {
    /// Whether this is the continuous mode.
    pub fn is_continuous(self) -> bool {
        matches!(self, Self::Continuous)
    }
}

impl From<bool> for ConversionMode {
    fn from(continuous: bool) -> Self {
        if continuous {
            Self::Continuous
        } else {
            Self::OneShot
        }
    }
}

/// The device's 8-bit configuration register.
///
/// Field layout, most significant bit first:
///
/// | Bits | Field                                        |
/// |------|----------------------------------------------|
/// | 7    | ready flag (reads), start bit (writes)       |
/// | 6-5  | mux channel                                  |
/// | 4    | conversion mode                              |
/// | 3-2  | sample rate                                  |
/// | 1-0  | PGA gain                                     |
///
/// Every `with_` method rewrites only its own bit range, so settings can be
/// layered in any order without disturbing each other. The zero value (all
/// fields clear) means channel 0, one-shot, 240 sps, gain 1.
///
/// # Datasheet
///
/// See register 5-1 in section 5.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config(u8);

impl Config {
    /// The raw register value.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Replace the gain bits.
    pub fn with_gain(mut self, gain: Gain) -> Self {
        self.0.set_bits(0..=1, gain.into());
        self
    }

    /// The configured PGA gain.
    pub fn gain(self) -> Gain {
        self.0.get_bits(0..=1).into()
    }

    /// Replace the sample rate bits.
    pub fn with_sample_rate(mut self, rate: SampleRate) -> Self {
        self.0.set_bits(2..=3, rate.into());
        self
    }

    /// The configured sample rate.
    pub fn sample_rate(self) -> SampleRate {
        self.0.get_bits(2..=3).into()
    }

    /// Replace the conversion mode bit.
    pub fn with_mode(mut self, mode: ConversionMode) -> Self {
        self.0.set_bit(4, mode.is_continuous());
        self
    }

    /// The configured conversion mode.
    pub fn mode(self) -> ConversionMode {
        ConversionMode::from(self.0.get_bit(4))
    }

    /// Replace the mux channel bits.
    ///
    /// The register has room for four channels, so `channel` must be in
    /// `0..=3`. Whether the chip on the bus actually has that many inputs
    /// is checked by [`Mcp342x::channel`](crate::Mcp342x::channel).
    pub fn with_channel(mut self, channel: u8) -> Self {
        assert!(channel <= 0b11, "Mux field only addresses channels 0 to 3.");
        self.0.set_bits(5..=6, channel);
        self
    }

    /// The configured mux channel index.
    pub fn channel(self) -> u8 {
        self.0.get_bits(5..=6)
    }

    /// Set bit 7, turning the register value into a conversion trigger.
    ///
    /// Only the byte put on the bus carries this bit. Cached and compared
    /// configuration values stay without it, where bit 7 instead means "not
    /// ready" when the register is read back.
    pub fn with_start_bit(mut self) -> Self {
        self.0.set_bit(7, true);
        self
    }
}
