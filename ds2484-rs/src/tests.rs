extern crate std;

use crate::{
    DS2484_ADDR, DeviceConfiguration, DeviceStatus, Ds2484, Ds2484Builder, Ds2484Error, Interact,
};
use embedded_hal_mock::eh1::{
    delay::NoopDelay,
    i2c::{Mock as I2cMock, Transaction as I2cTransaction},
};
use embedded_onewire::{OneWire, OneWireError, OneWireStatus};
use std::{vec, vec::Vec};

fn status_poll(status: u8) -> [I2cTransaction; 2] {
    [
        I2cTransaction::write(DS2484_ADDR, vec![0xe1, 0xf0]),
        I2cTransaction::read(DS2484_ADDR, vec![status]),
    ]
}

fn build_expectations() -> Vec<I2cTransaction> {
    let mut exp = vec![
        I2cTransaction::write(DS2484_ADDR, vec![0xf0]),
        I2cTransaction::read(DS2484_ADDR, vec![0x18]),
    ];
    exp.extend(status_poll(0x18));
    exp.push(I2cTransaction::write_read(
        DS2484_ADDR,
        vec![0xd2, 0xe1],
        vec![0x01],
    ));
    exp
}

fn build(i2c: &I2cMock) -> Ds2484<I2cMock, NoopDelay> {
    Ds2484Builder::default()
        .build(i2c.clone(), NoopDelay::new())
        .unwrap()
}

#[test]
fn build_resets_and_configures() {
    let mut i2c = I2cMock::new(&build_expectations());
    let dev = build(&i2c);
    assert_eq!(
        dev.config(),
        DeviceConfiguration::new().with_active_pullup(true)
    );
    i2c.done();
}

#[test]
fn device_reset_gives_up_after_retries() {
    let mut i2c = I2cMock::new(&[
        I2cTransaction::write(DS2484_ADDR, vec![0xf0]),
        I2cTransaction::read(DS2484_ADDR, vec![0x00]),
        I2cTransaction::read(DS2484_ADDR, vec![0x00]),
        I2cTransaction::read(DS2484_ADDR, vec![0x00]),
    ]);
    let res = Ds2484Builder::default()
        .with_retries(2)
        .build(i2c.clone(), NoopDelay::new());
    assert!(matches!(res, Err(Ds2484Error::RetriesExceeded)));
    i2c.done();
}

#[test]
fn reset_reports_presence() {
    let mut exp = build_expectations();
    exp.extend(status_poll(0x00));
    exp.push(I2cTransaction::write(DS2484_ADDR, vec![0xb4]));
    exp.extend(status_poll(0x01));
    exp.push(I2cTransaction::read(DS2484_ADDR, vec![0x02]));
    let mut i2c = I2cMock::new(&exp);
    let mut dev = build(&i2c);

    let status = dev.reset().unwrap();
    assert!(status.presence());
    assert!(!status.shortcircuit());
    i2c.done();
}

#[test]
fn reset_maps_missing_presence_and_shorts() {
    let mut exp = build_expectations();
    for status in [0x00, 0x06] {
        exp.extend(status_poll(0x00));
        exp.push(I2cTransaction::write(DS2484_ADDR, vec![0xb4]));
        exp.extend(status_poll(status));
    }
    let mut i2c = I2cMock::new(&exp);
    let mut dev = build(&i2c);

    assert!(matches!(dev.reset(), Err(OneWireError::NoDevicePresent)));
    assert!(matches!(dev.reset(), Err(OneWireError::ShortCircuit)));
    i2c.done();
}

#[test]
fn strong_pullup_is_armed_before_last_byte() {
    let mut exp = build_expectations();
    exp.extend(status_poll(0x00));
    exp.push(I2cTransaction::write(DS2484_ADDR, vec![0xa5, 0xcc]));
    exp.extend(status_poll(0x00));
    exp.push(I2cTransaction::write_read(
        DS2484_ADDR,
        vec![0xd2, 0xa5],
        vec![0x05],
    ));
    exp.extend(status_poll(0x00));
    exp.push(I2cTransaction::write(DS2484_ADDR, vec![0xa5, 0x44]));
    let mut i2c = I2cMock::new(&exp);
    let mut dev = build(&i2c);

    dev.write_bytes(&[0xcc, 0x44], true).unwrap();
    assert!(!dev.config().strong_pullup());
    assert!(dev.config().active_pullup());
    i2c.done();
}

#[test]
fn read_bytes_fetches_read_data_register() {
    let mut exp = build_expectations();
    for value in [0x50, 0x05] {
        exp.extend(status_poll(0x00));
        exp.push(I2cTransaction::write(DS2484_ADDR, vec![0x96]));
        exp.extend(status_poll(0x00));
        exp.push(I2cTransaction::write_read(
            DS2484_ADDR,
            vec![0xe1, 0xe1],
            vec![value],
        ));
    }
    let mut i2c = I2cMock::new(&exp);
    let mut dev = build(&i2c);

    let mut buf = [0; 2];
    dev.read_bytes(&mut buf).unwrap();
    assert_eq!(buf, [0x50, 0x05]);
    i2c.done();
}

#[test]
fn unconfigured_bridge_refuses_bus_traffic() {
    let expectations: [I2cTransaction; 0] = [];
    let mut i2c = I2cMock::new(&expectations);
    let mut dev = Ds2484 {
        i2c: i2c.clone(),
        addr: DS2484_ADDR,
        delay: NoopDelay::new(),
        retries: 1,
        config: DeviceConfiguration::new(),
        configured: false,
    };
    assert!(matches!(dev.reset(), Err(OneWireError::BusUninitialized)));
    assert!(matches!(
        dev.write_bytes(&[0xcc], false),
        Err(OneWireError::BusUninitialized)
    ));
    assert!(matches!(
        dev.read_bytes(&mut [0; 1]),
        Err(OneWireError::BusUninitialized)
    ));
    i2c.done();
}

#[test]
fn registers_are_read_through_the_read_pointer() {
    let mut exp = build_expectations();
    exp.push(I2cTransaction::write_read(
        DS2484_ADDR,
        vec![0xe1, 0xf0],
        vec![0x0a],
    ));
    exp.push(I2cTransaction::write_read(
        DS2484_ADDR,
        vec![0xe1, 0xc3],
        vec![0x09],
    ));
    let mut i2c = I2cMock::new(&exp);
    let mut dev = build(&i2c);

    let status = dev.get_status().unwrap();
    assert_eq!(
        status,
        DeviceStatus::new()
            .with_presence_pulse_detect(true)
            .with_logic_level(true)
    );
    let config = DeviceConfiguration::read(&mut dev).unwrap();
    assert!(config.active_pullup());
    assert!(config.onewire_speed());
    assert!(!config.strong_pullup());
    i2c.done();
}
