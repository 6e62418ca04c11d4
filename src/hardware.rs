use core::cell::RefCell;
use core::panic::PanicInfo;

use embedded_hal_bus::i2c::RefCellDevice;
use esp_hal::{
    Blocking,
    delay::Delay,
    gpio::AnyPin,
    i2c::master::{Config as I2cConfig, ConfigError, I2c},
    peripherals::I2C0,
    time::Rate,
};

use crate::mlx90615::{BUS_FREQUENCY_KHZ, DEFAULT_ADDRESS, Mlx90615};

/// Blocking I2C bus that several sensor handles can share.
///
/// Every transaction borrows the bus for its duration only.
pub struct SensorBus<'a> {
    i2c: RefCell<I2c<'a, Blocking>>,
}

pub type SharedDevice<'b, 'a> = RefCellDevice<'b, I2c<'a, Blocking>>;

impl<'a> SensorBus<'a> {
    pub fn new<SDA, SCL>(i2c_periph: I2C0<'a>, sda: SDA, scl: SCL) -> Result<Self, ConfigError>
    where
        SDA: Into<AnyPin<'a>>,
        SCL: Into<AnyPin<'a>>,
    {
        // The MLX90615 does not work at 400 kHz
        let i2c = I2c::new(
            i2c_periph,
            I2cConfig::default().with_frequency(Rate::from_khz(BUS_FREQUENCY_KHZ)),
        )?
        .with_sda(sda.into())
        .with_scl(scl.into());

        Ok(Self {
            i2c: RefCell::new(i2c),
        })
    }

    pub fn device(&self) -> SharedDevice<'_, 'a> {
        RefCellDevice::new(&self.i2c)
    }

    /// MLX90615 at the factory address
    pub fn mlx90615(&self) -> Mlx90615<SharedDevice<'_, 'a>> {
        self.mlx90615_at(DEFAULT_ADDRESS)
    }

    pub fn mlx90615_at(&self, address: u8) -> Mlx90615<SharedDevice<'_, 'a>> {
        Mlx90615::with_address(self.device(), address)
    }
}

/// Print the panic and park the core. Firmware panic handlers end here.
pub fn halt(info: &PanicInfo) -> ! {
    esp_println::println!("[PANIC] {:?}", info);
    let delay = Delay::new();
    loop {
        delay.delay_millis(1_000);
    }
}
