//! MLX90615 infrared thermometer
//!
//! The sensor must run on a 100 kHz bus; it does not answer at 400 kHz.

use embedded_hal::i2c::I2c;

/// Factory default 7-bit address
pub const DEFAULT_ADDRESS: u8 = 0x5B;

/// Bus speed the sensor requires
pub const BUS_FREQUENCY_KHZ: u32 = 100;

// One LSB is 0.02 K, counted from absolute zero
const KELVIN_PER_LSB: f32 = 0.02;
const ZERO_CELSIUS_IN_KELVIN: f32 = 273.15;

/// Register map
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    // RAM
    RawIr = 0x05,
    Ambient = 0x26,
    Object = 0x27,

    // EEPROM
    PwmTMin = 0x00,
    PwmTRange = 0x01,
    Config = 0x02,
    Emissivity = 0x03,
    Id1 = 0x0E,
    Id2 = 0x0F,
}

impl Register {
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// Convert a raw temperature register value to Celsius.
///
/// The full 16 bits are treated as magnitude; no error flag is masked.
pub fn raw_to_celsius(raw: u16) -> f32 {
    raw as f32 * KELVIN_PER_LSB - ZERO_CELSIUS_IN_KELVIN
}

/// Sensor handle bound to one bus address.
///
/// `I` may be `&mut` a bus or a shared-bus device from `embedded-hal-bus`;
/// in the latter case the bus is locked for exactly one transaction.
pub struct Mlx90615<I> {
    i2c: I,
    address: u8,
    buf: [u8; 2],
}

impl<I: I2c> Mlx90615<I> {
    /// Bind to the default address. No bus traffic happens here.
    pub fn new(i2c: I) -> Self {
        Self::with_address(i2c, DEFAULT_ADDRESS)
    }

    pub fn with_address(i2c: I, address: u8) -> Self {
        Self {
            i2c,
            address,
            buf: [0; 2],
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Ambient (die) temperature in Celsius
    pub fn ambient_temperature(&mut self) -> Result<f32, I::Error> {
        self.read_temperature(Register::Ambient)
    }

    /// Object temperature in Celsius
    pub fn object_temperature(&mut self) -> Result<f32, I::Error> {
        self.read_temperature(Register::Object)
    }

    /// Give the bus back
    pub fn release(self) -> I {
        self.i2c
    }

    fn read_temperature(&mut self, register: Register) -> Result<f32, I::Error> {
        let raw = self.read_u16(register)?;
        Ok(raw_to_celsius(raw))
    }

    // Register pointer write and data read go out as one transaction with a
    // repeated start, so no other master can move the pointer in between.
    fn read_u16(&mut self, register: Register) -> Result<u16, I::Error> {
        if let Err(e) = self
            .i2c
            .write_read(self.address, &[register.addr()], &mut self.buf)
        {
            log::debug!(
                "mlx90615@{:#04x}: read of {:?} failed",
                self.address,
                register
            );
            return Err(e);
        }

        // Byte at offset 1 is the high byte
        let raw = ((self.buf[1] as u16) << 8) | self.buf[0] as u16;
        log::trace!(
            "mlx90615@{:#04x}: {:?} = {:#06x}",
            self.address,
            register,
            raw
        );
        Ok(raw)
    }
}
