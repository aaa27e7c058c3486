//! Device-level access: bus transactions and the configuration cache.

use std::cell::{Cell, RefCell};

use bit_field::BitField;
use embedded_hal::i2c::I2c;

use crate::channel::Channel;
use crate::config::{Config, SampleRate};
use crate::error::Error;

/// The chip variants this driver supports.
///
/// The family shares a single register layout and conversion engine; the
/// variants differ in the number of multiplexed differential inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// MCP3425, one input channel.
    Mcp3425,
    /// MCP3426, two input channels.
    Mcp3426,
    /// MCP3427, two input channels.
    Mcp3427,
    /// MCP3428, four input channels.
    Mcp3428,
}

impl Variant {
    /// Number of mux channels on this chip.
    pub fn channel_count(self) -> u8 {
        match self {
            Variant::Mcp3425 => 1,
            Variant::Mcp3426 | Variant::Mcp3427 => 2,
            Variant::Mcp3428 => 4,
        }
    }
}

/// Driver for one MCP342x chip.
///
/// # Quick start
///
/// Construct the driver with [`Mcp342x::new`] over any bus implementing
/// [`embedded_hal::i2c::I2c`], then take per-input [`Channel`] views with
/// [`Mcp342x::channel`]. Configuration and reads happen on the channels;
/// the driver itself only moves bytes and remembers the last configuration
/// it wrote.
///
/// # Shared state
///
/// The chip has one configuration register, so all channels of one chip
/// share this driver value. The last-written configuration (and with it
/// [`Mcp342x::active_channel`]) is a property of the device, observable and
/// overwritten by whichever channel starts a conversion. The bus handle and
/// the cache sit behind interior mutability so that channels only need a
/// shared reference; the driver is consequently not `Sync`, and serialized
/// access is up to the caller.
#[derive(Debug)]
pub struct Mcp342x<I2C> {
    /// Underlying I2C bus.
    bus: RefCell<I2C>,
    /// 7-bit bus address of the chip.
    address: u8,
    variant: Variant,
    /// Copy of the most recently written configuration byte.
    ///
    /// A result read returns whichever conversion the last written
    /// configuration selected, so the driver echoes that byte as the
    /// command byte and must remember it between calls.
    last_config: Cell<Config>,
}

impl<I2C, E> Mcp342x<I2C>
where
    I2C: I2c<Error = E>,
{
    /// Create a driver for the chip `variant` at `address` on the given bus.
    ///
    /// The address is the 7-bit form; chips ship at
    /// [`DEFAULT_ADDRESS`](crate::DEFAULT_ADDRESS) unless ordered otherwise.
    /// No bus traffic happens until a conversion is started.
    pub fn new(bus: I2C, address: u8, variant: Variant) -> Self {
        Self {
            bus: RefCell::new(bus),
            address,
            variant,
            last_config: Cell::new(Config::default()),
        }
    }

    /// The chip variant this driver was constructed for.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Take a [`Channel`] view of one mux input.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidChannel`] if the index is out of range for the chip
    /// variant: the MCP3425 has a single channel 0, the MCP3426 and MCP3427
    /// have channels 0 and 1, and the MCP3428 has channels 0 to 3.
    pub fn channel(&self, index: u8) -> Result<Channel<'_, I2C>, Error<E>> {
        self.validate_channel(index)?;
        Ok(Channel::new(self, index))
    }

    /// Check a channel index against the chip variant's channel count.
    pub fn validate_channel(&self, channel: u8) -> Result<(), Error<E>> {
        let channel_count = self.variant.channel_count();
        if channel < channel_count {
            Ok(())
        } else {
            Err(Error::InvalidChannel {
                channel,
                channel_count,
            })
        }
    }

    /// The mux channel selected by the last written configuration.
    ///
    /// This is the channel a result read will report on. Before the first
    /// conversion the cache is the register's zero value, which reads as
    /// channel 0.
    pub fn active_channel(&self) -> u8 {
        self.last_config.get().channel()
    }

    /// Write `config` to the device with the start bit set.
    ///
    /// In one-shot mode this triggers a single conversion; in continuous
    /// mode it (re)starts free-running acquisition with the new settings.
    /// On success the configuration, without the start bit, becomes the
    /// cached value that subsequent reads are keyed to.
    ///
    /// # Errors
    ///
    /// [`Error::I2c`] if the transfer fails.
    pub fn initiate_conversion(&self, config: Config) -> Result<(), Error<E>> {
        self.bus
            .borrow_mut()
            .write(self.address, &[config.with_start_bit().bits()])
            .map_err(Error::I2c)?;
        self.last_config.set(config);
        Ok(())
    }

    /// Fetch the latest conversion as a signed raw code.
    ///
    /// Reads [`SampleRate::read_length`] bytes, echoing the cached
    /// configuration as the command byte so the device hands back the
    /// conversion that configuration selected. The final byte is the
    /// configuration register, whose bit 7 reports readiness. The data
    /// bytes are assembled most significant first, masked to the rate's
    /// width and sign corrected: a value above
    /// [`max_code`](SampleRate::max_code) wraps to its negative
    /// two's-complement reading.
    ///
    /// `rate` must match the rate the conversion was started with, as the
    /// device gives no other indication of how wide the result is.
    ///
    /// # Errors
    ///
    /// [`Error::ConversionNotReady`] if the device is still converting; the
    /// caller should wait and retry. [`Error::I2c`] if the transfer fails.
    pub fn read_conversion(&self, rate: SampleRate) -> Result<i32, Error<E>> {
        let mut buf = [0u8; 4];
        let read = &mut buf[..rate.read_length()];
        self.bus
            .borrow_mut()
            .write_read(self.address, &[self.last_config.get().bits()], read)
            .map_err(Error::I2c)?;

        let (status, data) = read.split_last().expect("Result reads are never empty.");
        if status.get_bit(7) {
            return Err(Error::ConversionNotReady);
        }

        let mut code: u32 = 0;
        for byte in data {
            code = (code << 8) | u32::from(*byte);
        }
        // Bits above the conversion width repeat the sign and are not part
        // of the code.
        let code = (code & rate.code_mask()) as i32;
        let max_code = rate.max_code();
        if code > max_code {
            Ok(code - 2 * (max_code + 1))
        } else {
            Ok(code)
        }
    }

    /// Destroy the driver and give back the bus handle.
    pub fn release(self) -> I2C {
        self.bus.into_inner()
    }
}
