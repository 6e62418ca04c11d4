use core::cell::RefCell;

use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
use embedded_hal_bus::i2c::RefCellDevice;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
use mlx90615::{DEFAULT_ADDRESS, Mlx90615, raw_to_celsius};

const SECOND_ADDRESS: u8 = 0x5C;

#[test]
fn two_sensors_share_one_bus() {
    let expectations = [
        I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0x26], vec![0x5A, 0x39]),
        I2cTransaction::write_read(SECOND_ADDRESS, vec![0x26], vec![0xB4, 0x3A]),
        I2cTransaction::write_read(SECOND_ADDRESS, vec![0x27], vec![0x00, 0x3C]),
        I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0x27], vec![0x34, 0x12]),
    ];
    let bus = RefCell::new(I2cMock::new(&expectations));

    let mut first = Mlx90615::new(RefCellDevice::new(&bus));
    let mut second = Mlx90615::with_address(RefCellDevice::new(&bus), SECOND_ADDRESS);

    assert_eq!(first.ambient_temperature(), Ok(raw_to_celsius(0x395A)));
    assert_eq!(second.ambient_temperature(), Ok(raw_to_celsius(0x3AB4)));
    assert_eq!(second.object_temperature(), Ok(raw_to_celsius(0x3C00)));
    assert_eq!(first.object_temperature(), Ok(raw_to_celsius(0x1234)));

    drop(first);
    drop(second);
    bus.into_inner().done();
}

#[test]
fn failure_on_one_device_leaves_the_bus_usable() {
    let expectations = [
        I2cTransaction::write_read(SECOND_ADDRESS, vec![0x27], vec![0x00, 0x00])
            .with_error(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)),
        I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0x27], vec![0x5A, 0x39]),
    ];
    let bus = RefCell::new(I2cMock::new(&expectations));

    let mut present = Mlx90615::new(RefCellDevice::new(&bus));
    let mut absent = Mlx90615::with_address(RefCellDevice::new(&bus), SECOND_ADDRESS);

    assert_eq!(
        absent.object_temperature(),
        Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))
    );
    assert_eq!(present.object_temperature(), Ok(raw_to_celsius(0x395A)));

    drop(present);
    drop(absent);
    bus.into_inner().done();
}
