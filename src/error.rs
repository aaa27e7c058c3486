/// Wrapper for problems when talking to an MCP342x.
///
/// The cases call for different handling: the `Invalid` variants point at a
/// bug in the calling code and are raised before any bus traffic,
/// [`Error::ConversionNotReady`] clears on its own once the device has had
/// time to finish, and [`Error::I2c`] reports a fault on the bus itself
/// (wiring, addressing, a missing device) that retrying will not fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// The requested mux channel does not exist on this chip variant.
    InvalidChannel {
        /// Channel index that was requested.
        channel: u8,
        /// Number of mux channels this variant has.
        channel_count: u8,
    },
    /// The requested PGA gain is not one of 1, 2, 4 or 8.
    InvalidGain(u8),
    /// The requested sample rate is not one of 15, 60 or 240 sps.
    InvalidSampleRate(u32),
    /// The device has not finished the conversion that was asked for.
    ///
    /// The result register still holds the previous conversion, so nothing
    /// is returned rather than handing back stale data. Wait at least
    /// [`conversion_time`](crate::Channel::conversion_time) and read again.
    ConversionNotReady,
    /// The underlying I2C transfer failed.
    ///
    /// The enclosed value is the bus implementation's own error.
    I2c(E),
}
