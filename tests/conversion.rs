//! Driver behaviour against a mocked I2C bus.
//!
//! Every expectation spells out the exact bytes the chip family defines:
//! a one-byte configuration write with bit 7 set to start a conversion,
//! and a result read that echoes the cached configuration byte as the
//! command and ends with the status byte.

use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
use mcp342x_hal::{DEFAULT_ADDRESS, Error, Mcp342x, SampleRate, Variant};

type TestResult = Result<(), Error<ErrorKind>>;

fn assert_close(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "{actual} is not within {epsilon} of {expected}"
    );
}

/// Starting a conversion writes the channel's configuration with the start
/// bit set, and marks the channel active.
#[test]
fn start_conversion_writes_config_with_start_bit() -> TestResult {
    // Channel 0, continuous, 240 sps, gain 1 is 0x10; the start bit makes
    // it 0x90 on the wire.
    let expectations = [I2cTransaction::write(DEFAULT_ADDRESS, vec![0x90])];
    let mut bus = I2cMock::new(&expectations);

    let adc = Mcp342x::new(bus.clone(), DEFAULT_ADDRESS, Variant::Mcp3425);
    let channel = adc.channel(0)?;
    channel.start_conversion()?;
    assert_eq!(adc.active_channel(), 0);
    assert!(channel.is_active());

    bus.done();
    Ok(())
}

#[test]
fn positive_reading_scales_to_volts() -> TestResult {
    // Raw code 1000 at 240 sps: data 0x03 0xE8, status byte ready.
    let expectations = [
        I2cTransaction::write(DEFAULT_ADDRESS, vec![0x90]),
        I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0x10], vec![0x03, 0xE8, 0x00]),
        I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0x10], vec![0x03, 0xE8, 0x00]),
    ];
    let mut bus = I2cMock::new(&expectations);

    let adc = Mcp342x::new(bus.clone(), DEFAULT_ADDRESS, Variant::Mcp3425);
    let channel = adc.channel(0)?;
    channel.start_conversion()?;

    assert_eq!(channel.read_raw()?, 1000);
    let volts = channel.read_voltage()?;
    assert_close(volts, 1000.0 * (2.048 / 2047.0), 1e-12);
    assert_close(volts, 1.000488, 1e-6);

    bus.done();
    Ok(())
}

#[test]
fn gain_divides_the_voltage_scale() -> TestResult {
    // Same raw code 1000, gain 8: config 0x13, start byte 0x93.
    let expectations = [
        I2cTransaction::write(DEFAULT_ADDRESS, vec![0x93]),
        I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0x13], vec![0x03, 0xE8, 0x00]),
    ];
    let mut bus = I2cMock::new(&expectations);

    let adc = Mcp342x::new(bus.clone(), DEFAULT_ADDRESS, Variant::Mcp3425);
    let mut channel = adc.channel(0)?;
    channel.configure(8, 240, true)?;
    channel.start_conversion()?;

    let volts = channel.read_voltage()?;
    assert_close(volts, 1000.0 * (2.048 / 2047.0) / 8.0, 1e-12);
    assert_close(volts, 0.125061, 1e-6);

    bus.done();
    Ok(())
}

/// Codes above the full-scale positive range wrap to negative readings.
#[test]
fn codes_above_max_wrap_negative_at_240_sps() -> TestResult {
    // Unsigned 2600 is 0x0A28; at 12 bits that reads as 2600 - 4096.
    let expectations = [
        I2cTransaction::write(DEFAULT_ADDRESS, vec![0x90]),
        I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0x10], vec![0x0A, 0x28, 0x00]),
    ];
    let mut bus = I2cMock::new(&expectations);

    let adc = Mcp342x::new(bus.clone(), DEFAULT_ADDRESS, Variant::Mcp3425);
    let channel = adc.channel(0)?;
    channel.start_conversion()?;
    assert_eq!(channel.read_raw()?, -1496);

    bus.done();
    Ok(())
}

#[test]
fn codes_above_max_wrap_negative_at_15_sps() -> TestResult {
    // Unsigned 40000 is 0x9C40; at 16 bits that reads as 40000 - 65536.
    let expectations = [
        I2cTransaction::write(DEFAULT_ADDRESS, vec![0x98]),
        I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0x18], vec![0x9C, 0x40, 0x00]),
    ];
    let mut bus = I2cMock::new(&expectations);

    let adc = Mcp342x::new(bus.clone(), DEFAULT_ADDRESS, Variant::Mcp3425);
    let mut channel = adc.channel(0)?;
    channel.configure(1, 15, true)?;
    channel.start_conversion()?;
    assert_eq!(channel.read_raw()?, -25536);

    bus.done();
    Ok(())
}

/// The device sign-extends the unused high bits of the first data byte;
/// they must not leak into the decoded value.
#[test]
fn undriven_high_bits_are_masked_before_decoding() -> TestResult {
    // A code of -1 at 12 bits arrives sign extended as 0xFF 0xFF.
    let expectations = [
        I2cTransaction::write(DEFAULT_ADDRESS, vec![0x90]),
        I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0x10], vec![0xFF, 0xFF, 0x00]),
    ];
    let mut bus = I2cMock::new(&expectations);

    let adc = Mcp342x::new(bus.clone(), DEFAULT_ADDRESS, Variant::Mcp3425);
    let channel = adc.channel(0)?;
    channel.start_conversion()?;
    assert_eq!(channel.read_raw()?, -1);

    bus.done();
    Ok(())
}

/// Status bit 7 set means the conversion is stale, and nothing is returned.
/// A later read with the bit clear succeeds.
#[test]
fn stale_conversion_reports_not_ready() -> TestResult {
    let expectations = [
        I2cTransaction::write(DEFAULT_ADDRESS, vec![0x90]),
        I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0x10], vec![0x00, 0x00, 0x80]),
        I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0x10], vec![0x07, 0xFF, 0x00]),
    ];
    let mut bus = I2cMock::new(&expectations);

    let adc = Mcp342x::new(bus.clone(), DEFAULT_ADDRESS, Variant::Mcp3425);
    let channel = adc.channel(0)?;
    channel.start_conversion()?;

    assert_eq!(channel.read_raw(), Err(Error::ConversionNotReady));
    assert_eq!(channel.read_raw()?, 2047);

    bus.done();
    Ok(())
}

#[test]
fn channel_counts_are_enforced_per_variant() {
    let cases = [
        (Variant::Mcp3425, 1),
        (Variant::Mcp3426, 2),
        (Variant::Mcp3427, 2),
        (Variant::Mcp3428, 4),
    ];
    for (variant, count) in cases {
        let mut bus = I2cMock::new(&[]);
        let adc = Mcp342x::new(bus.clone(), DEFAULT_ADDRESS, variant);
        for index in 0..count {
            assert!(adc.channel(index).is_ok(), "{variant:?} channel {index}");
        }
        assert_eq!(
            adc.channel(count).err(),
            Some(Error::InvalidChannel {
                channel: count,
                channel_count: count,
            }),
            "{variant:?} channel {count}"
        );
        bus.done();
    }
}

/// Triggering one channel steals the device from the others, and the
/// active marker follows the most recent trigger.
#[test]
fn active_channel_follows_the_last_trigger() -> TestResult {
    let expectations = [
        I2cTransaction::write(DEFAULT_ADDRESS, vec![0x90]),
        I2cTransaction::write(DEFAULT_ADDRESS, vec![0xB0]),
    ];
    let mut bus = I2cMock::new(&expectations);

    let adc = Mcp342x::new(bus.clone(), DEFAULT_ADDRESS, Variant::Mcp3428);
    let first = adc.channel(0)?;
    let second = adc.channel(1)?;

    first.start_conversion()?;
    assert!(first.is_active());
    assert!(!second.is_active());

    second.start_conversion()?;
    assert!(!first.is_active());
    assert!(second.is_active());

    bus.done();
    Ok(())
}

/// In continuous mode the device keeps producing results, so repeated
/// reads without a new trigger all succeed.
#[test]
fn continuous_mode_reads_repeat_without_retriggering() -> TestResult {
    let expectations = [
        I2cTransaction::write(DEFAULT_ADDRESS, vec![0x90]),
        I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0x10], vec![0x01, 0x00, 0x00]),
        I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0x10], vec![0x01, 0x05, 0x00]),
    ];
    let mut bus = I2cMock::new(&expectations);

    let adc = Mcp342x::new(bus.clone(), DEFAULT_ADDRESS, Variant::Mcp3426);
    let channel = adc.channel(0)?;
    channel.start_conversion()?;
    assert_eq!(channel.read_raw()?, 256);
    assert_eq!(channel.read_raw()?, 261);

    bus.done();
    Ok(())
}

/// In one-shot mode the device latches its single result; reading again
/// without a new trigger hands back the same latched data.
#[test]
fn one_shot_rereads_return_the_latched_result() -> TestResult {
    let expectations = [
        I2cTransaction::write(DEFAULT_ADDRESS, vec![0x80]),
        I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0x00], vec![0x01, 0x00, 0x00]),
        I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0x00], vec![0x01, 0x00, 0x00]),
    ];
    let mut bus = I2cMock::new(&expectations);

    let adc = Mcp342x::new(bus.clone(), DEFAULT_ADDRESS, Variant::Mcp3425);
    let mut channel = adc.channel(0)?;
    channel.configure(1, 240, false)?;
    channel.start_conversion()?;
    assert_eq!(channel.read_raw()?, 256);
    assert_eq!(channel.read_raw()?, 256);

    bus.done();
    Ok(())
}

/// The 18-bit rate reads a third data byte ahead of the status byte and
/// folds against its own full-scale code.
#[test]
fn eighteen_bit_mode_reads_four_bytes() -> TestResult {
    let expectations = [
        I2cTransaction::write(DEFAULT_ADDRESS, vec![0x9C]),
        I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0x1C], vec![0x01, 0x00, 0x00, 0x00]),
        I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0x1C], vec![0x03, 0x0D, 0x40, 0x00]),
    ];
    let mut bus = I2cMock::new(&expectations);

    let adc = Mcp342x::new(bus.clone(), DEFAULT_ADDRESS, Variant::Mcp3425);
    let mut channel = adc.channel(0)?;
    channel.set_sample_rate(SampleRate::Sps3_75);
    channel.start_conversion()?;

    assert_eq!(channel.read_raw()?, 65536);
    // Unsigned 200000 exceeds 131071 and reads as 200000 - 262144.
    assert_eq!(channel.read_raw()?, -62144);

    bus.done();
    Ok(())
}

/// A rejected configure call leaves every setting as it was.
#[test]
fn configure_validates_before_touching_settings() -> TestResult {
    let mut bus = I2cMock::new(&[]);
    let adc = Mcp342x::new(bus.clone(), DEFAULT_ADDRESS, Variant::Mcp3426);
    let mut channel = adc.channel(1)?;
    channel.configure(8, 15, false)?;
    let before = channel.configuration();

    assert_eq!(channel.configure(3, 240, true), Err(Error::InvalidGain(3)));
    assert_eq!(
        channel.configure(1, 30, true),
        Err(Error::InvalidSampleRate(30))
    );
    assert_eq!(channel.configuration(), before);

    bus.done();
    Ok(())
}

#[test]
fn bus_failures_surface_as_i2c_errors() -> TestResult {
    let expectations = [
        I2cTransaction::write(DEFAULT_ADDRESS, vec![0x90]).with_error(ErrorKind::Other),
        I2cTransaction::write(DEFAULT_ADDRESS, vec![0x90]),
        I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0x10], vec![0x00, 0x00, 0x00])
            .with_error(ErrorKind::Other),
    ];
    let mut bus = I2cMock::new(&expectations);

    let adc = Mcp342x::new(bus.clone(), DEFAULT_ADDRESS, Variant::Mcp3425);
    let channel = adc.channel(0)?;

    assert!(matches!(channel.start_conversion(), Err(Error::I2c(_))));
    channel.start_conversion()?;
    assert!(matches!(channel.read_raw(), Err(Error::I2c(_))));

    bus.done();
    Ok(())
}
