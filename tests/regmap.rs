mod common;

use common::{BusFault, FakeBus, Op};
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};
use qcom_pmic_charger::regmap::{COHERENT_CHECK_RETRY, MAX_COHERENT_LEN};
use qcom_pmic_charger::{Coherency, Error, I2cBus, RegisterBus, Regmap};

#[test]
fn coherent_read_accepts_first_matching_pair() {
    let bus = FakeBus::new();
    bus.set(0x4566, 0x34);
    bus.set(0x4567, 0x12);
    let mut map = Regmap::new(bus.clone(), 0x4500);

    let mut data = [0u8; 2];
    assert_eq!(map.coherent_read(0x66, &mut data), Ok(Coherency::Coherent));
    assert_eq!(data, [0x34, 0x12]);
    assert_eq!(bus.reads_of(0x4566), 2);
}

#[test]
fn coherent_read_retries_until_reads_agree() {
    let bus = FakeBus::new();
    bus.script(0x4594, &[0x01, 0x02, 0x03, 0x03]);
    bus.set(0x4595, 0x10);
    let mut map = Regmap::new(bus.clone(), 0x4500);

    let mut data = [0u8; 2];
    assert_eq!(map.coherent_read(0x94, &mut data), Ok(Coherency::Coherent));
    assert_eq!(data, [0x03, 0x10]);
    assert_eq!(bus.reads_of(0x4594), 4);
}

#[test]
fn coherent_read_returns_last_data_after_exhaustion() {
    let bus = FakeBus::new();
    let torn: Vec<u8> = (0..COHERENT_CHECK_RETRY * 2).map(|i| i as u8 + 1).collect();
    bus.script(0x4594, &torn);
    let mut map = Regmap::new(bus.clone(), 0x4500);

    let mut data = [0u8; 1];
    assert_eq!(map.coherent_read(0x94, &mut data), Ok(Coherency::RetriesExceeded));
    assert_eq!(data[0], *torn.last().unwrap());
    assert_eq!(bus.reads_of(0x4594), COHERENT_CHECK_RETRY * 2);
}

#[test]
fn coherent_read_rejects_oversized_span() {
    let bus = FakeBus::new();
    let mut map = Regmap::new(bus.clone(), 0x4500);

    let mut data = [0u8; MAX_COHERENT_LEN + 1];
    assert_eq!(map.coherent_read(0x50, &mut data), Err(Error::InvalidArgument));
    assert!(bus.log().is_empty());
}

#[test]
fn bus_errors_pass_through_without_retry() {
    let bus = FakeBus::new();
    bus.fail_reads(0x4552);
    let mut map = Regmap::new(bus.clone(), 0x4500);

    assert_eq!(map.read(0x52), Err(Error::Bus(BusFault)));
    assert_eq!(bus.log(), vec![Op::Read(0x4552)]);
}

#[test]
fn update_bits_keeps_unmasked_bits() {
    let bus = FakeBus::new();
    bus.set(0x4552, 0b1000_0001);
    let mut map = Regmap::new(bus.clone(), 0x4500);

    map.update_bits(0x52, 0b0000_1000, 0b0000_1000).unwrap();
    assert_eq!(bus.get(0x4552), 0b1000_1001);
    map.update_bits(0x52, 0b1000_0000, 0).unwrap();
    assert_eq!(bus.get(0x4552), 0b0000_1001);
}

#[test]
fn offsets_past_address_space_are_rejected() {
    let bus = FakeBus::new();
    let mut map = Regmap::new(bus.clone(), 0xFF00);

    assert_eq!(map.write(0x100, 1), Err(Error::InvalidArgument));
    assert!(bus.log().is_empty());
}

#[test]
fn i2c_bus_uses_big_endian_register_address() {
    let expectations = [
        I2cTrans::write_read(0x08, vec![0x45, 0x52], vec![0xAA]),
        I2cTrans::write(0x08, vec![0x10, 0x42, 0x01]),
        I2cTrans::write_read(0x08, vec![0x45, 0x66], vec![0x01, 0x02, 0x03]),
    ];
    let mock = I2cMock::new(&expectations);
    let mut bus = I2cBus::new(mock, 0x08);
    assert_eq!(bus.address(), 0x08);

    assert_eq!(bus.read(0x4552).unwrap(), 0xAA);
    bus.write(0x1042, 0x01).unwrap();
    let mut data = [0u8; 3];
    bus.bulk_read(0x4566, &mut data).unwrap();
    assert_eq!(data, [0x01, 0x02, 0x03]);

    bus.free().done();
}
