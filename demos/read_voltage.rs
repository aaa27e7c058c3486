//! Read voltages from an MCP3426 on a Linux I2C bus.
//!
//! Wires up two channels of the same chip, samples the first continuously
//! at 240 sps, then switches it to one-shot 16-bit acquisition. The driver
//! never sleeps on its own, so the pacing you see here (sleeping for the
//! channel's `conversion_time` between trigger and read) is the caller's
//! job everywhere this chip family is used.
//!
//! Run with the bus number and address adjusted for your wiring:
//!
//! ```sh
//! cargo run --example read_voltage
//! ```
use linux_embedded_hal::I2cdev;
use mcp342x_hal::{DEFAULT_ADDRESS, Error, Mcp342x, Variant};

fn main() -> Result<(), Error<linux_embedded_hal::I2CError>> {
    let bus = I2cdev::new("/dev/i2c-1").expect("no I2C bus at /dev/i2c-1");
    let adc = Mcp342x::new(bus, DEFAULT_ADDRESS, Variant::Mcp3426);

    // Two views over the one chip. Starting a conversion on either of them
    // repoints the chip's mux, which is why `is_active` exists.
    let mut first = adc.channel(0)?;
    let second = adc.channel(1)?;

    // Free-running 12-bit acquisition on channel 0. One trigger is enough;
    // the device then produces a fresh result every 1/240 s.
    println!("continuous mode");
    first.configure(1, 240, true)?;
    first.start_conversion()?;
    for _ in 0..5 {
        std::thread::sleep(first.conversion_time());
        println!("chan {}: {:.4} V", first.index(), first.read_voltage()?);
    }

    // The second channel has not triggered anything yet, so the device is
    // still converting for the first one.
    assert!(!second.is_active());

    // One-shot 16-bit acquisition: every sample needs its own trigger, and
    // at 15 sps each one takes a little under 67 ms to finish. Reading too
    // early is not fatal; it reports ConversionNotReady and you retry.
    println!("one-shot mode");
    first.configure(1, 15, false)?;
    for _ in 0..5 {
        first.start_conversion()?;
        std::thread::sleep(first.conversion_time());
        match first.read_voltage() {
            Ok(volts) => println!("chan {}: {:.5} V", first.index(), volts),
            Err(Error::ConversionNotReady) => println!("not ready, wait a little longer"),
            Err(other) => return Err(other),
        }
    }

    Ok(())
}
