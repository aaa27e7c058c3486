//! Per-input configuration and reads.

use std::time::Duration;

use embedded_hal::i2c::I2c;

use crate::REFERENCE_VOLTAGE;
use crate::config::{Config, ConversionMode, Gain, SampleRate};
use crate::driver::Mcp342x;
use crate::error::Error;

/// One mux input of an MCP342x.
///
/// A channel is a view over a shared [`Mcp342x`] driver. It remembers the
/// gain, sample rate and conversion mode to use for its input, composes
/// them into the configuration byte sent when a conversion starts, and
/// scales raw results into volts. Obtain one with [`Mcp342x::channel`],
/// which checks the index against the chip variant; channels start out at
/// gain 1, 240 sps, continuous.
///
/// Channels do not reserve the device. Starting a conversion on one channel
/// points the chip's mux away from every other channel of the same chip,
/// and a result read always reflects whichever channel started the last
/// conversion. Check [`Channel::is_active`] when several channels share a
/// driver.
#[derive(Debug)]
pub struct Channel<'d, I2C> {
    device: &'d Mcp342x<I2C>,
    config: Config,
}

impl<'d, I2C, E> Channel<'d, I2C>
where
    I2C: I2c<Error = E>,
{
    pub(crate) fn new(device: &'d Mcp342x<I2C>, index: u8) -> Self {
        let config = Config::default()
            .with_channel(index)
            .with_gain(Gain::X1)
            .with_sample_rate(SampleRate::Sps240)
            .with_mode(ConversionMode::Continuous);
        Self { device, config }
    }

    /// Set gain, sample rate and conversion mode in one call.
    ///
    /// `gain` is the plain PGA multiplier (1, 2, 4 or 8) and `sample_rate`
    /// is in samples per second (15, 60 or 240). Both are checked before
    /// either is applied, so a rejected call leaves the channel exactly as
    /// it was. New settings take effect on the next
    /// [`Channel::start_conversion`].
    ///
    /// The 3.75 sps rate has no integer spelling; reach the 18-bit mode
    /// through [`Channel::set_sample_rate`] instead.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidGain`] or [`Error::InvalidSampleRate`] for values
    /// the chip cannot be programmed with.
    pub fn configure(
        &mut self,
        gain: u8,
        sample_rate: u32,
        continuous: bool,
    ) -> Result<(), Error<E>> {
        let gain = Gain::from_multiplier(gain).ok_or(Error::InvalidGain(gain))?;
        let rate =
            SampleRate::from_sps(sample_rate).ok_or(Error::InvalidSampleRate(sample_rate))?;
        self.config = self
            .config
            .with_gain(gain)
            .with_sample_rate(rate)
            .with_mode(continuous.into());
        Ok(())
    }

    /// Set the PGA gain.
    pub fn set_gain(&mut self, gain: Gain) {
        self.config = self.config.with_gain(gain);
    }

    /// Set the sample rate, and with it the resolution.
    pub fn set_sample_rate(&mut self, rate: SampleRate) {
        self.config = self.config.with_sample_rate(rate);
    }

    /// Choose between one-shot and continuous acquisition.
    pub fn set_conversion_mode(&mut self, mode: ConversionMode) {
        self.config = self.config.with_mode(mode);
    }

    /// The configured PGA gain.
    pub fn gain(&self) -> Gain {
        self.config.gain()
    }

    /// The configured sample rate.
    pub fn sample_rate(&self) -> SampleRate {
        self.config.sample_rate()
    }

    /// The configured conversion mode.
    pub fn conversion_mode(&self) -> ConversionMode {
        self.config.mode()
    }

    /// The mux channel index this view is bound to.
    pub fn index(&self) -> u8 {
        self.config.channel()
    }

    /// The configuration byte this channel would send, for inspection.
    pub fn configuration(&self) -> Config {
        self.config
    }

    /// Push this channel's configuration to the device and start converting.
    ///
    /// In continuous mode the device then produces fresh results on its own
    /// at the configured rate; in one-shot mode it performs a single
    /// conversion and idles, and every sample needs a new call. Either way
    /// the device's mux now points at this channel.
    ///
    /// # Errors
    ///
    /// [`Error::I2c`] if the transfer fails.
    pub fn start_conversion(&self) -> Result<(), Error<E>> {
        self.device.initiate_conversion(self.config)
    }

    /// Estimated time for one conversion at the current sample rate.
    ///
    /// The driver never waits on its own. Sleep at least this long between
    /// starting a conversion and reading it, or be ready to retry on
    /// [`Error::ConversionNotReady`].
    pub fn conversion_time(&self) -> Duration {
        self.config.sample_rate().conversion_time()
    }

    /// Whether this channel is the one the device last converted for.
    ///
    /// On multi-channel chips a conversion started on another channel
    /// leaves the result register pointing at that channel; a read here
    /// would then decode the other input's data. False until this channel's
    /// [`Channel::start_conversion`] has run.
    pub fn is_active(&self) -> bool {
        self.device.active_channel() == self.config.channel()
    }

    /// Fetch the latest conversion as a signed raw code.
    ///
    /// # Errors
    ///
    /// [`Error::ConversionNotReady`] while the device is still converting,
    /// [`Error::I2c`] if the transfer fails.
    pub fn read_raw(&self) -> Result<i32, Error<E>> {
        self.device.read_conversion(self.config.sample_rate())
    }

    /// Fetch the latest conversion, scaled to volts.
    ///
    /// The scaling is `raw * lsb_voltage`, so the result accounts for both
    /// the resolution and the PGA gain currently configured.
    ///
    /// # Errors
    ///
    /// As [`Channel::read_raw`].
    pub fn read_voltage(&self) -> Result<f64, Error<E>> {
        Ok(f64::from(self.read_raw()?) * self.lsb_voltage())
    }

    /// Largest input voltage this channel can represent at its gain.
    pub fn max_voltage(&self) -> f64 {
        REFERENCE_VOLTAGE / f64::from(self.config.gain().multiplier())
    }

    /// Input change represented by one count, at the current gain and rate.
    pub fn lsb_voltage(&self) -> f64 {
        self.max_voltage() / f64::from(self.config.sample_rate().max_code())
    }
}
