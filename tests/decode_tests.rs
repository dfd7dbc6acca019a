//! Integration tests for identification and SMART decoding.

use blockdev::config::{IDENTIFY_LEN, SMART_ATTRIBUTES, SMART_LEN};
use blockdev::endian;
use blockdev::smart::{checksum_valid, parse_smart_data};
use blockdev::{Capabilities, Identity, SmartAttribute, SmartData};

/// Build an identify buffer the way a drive reports one.
fn identify_buffer(model: &str, serial: &str, firmware: &str) -> [u8; IDENTIFY_LEN] {
    let mut raw = [0u8; IDENTIFY_LEN];
    raw[20..40].fill(b' ');
    raw[46..54].fill(b' ');
    raw[54..94].fill(b' ');
    raw[40 - serial.len()..40].copy_from_slice(serial.as_bytes());
    raw[46..46 + firmware.len()].copy_from_slice(firmware.as_bytes());
    raw[54..54 + model.len()].copy_from_slice(model.as_bytes());
    raw
}

#[test]
fn test_identity_from_space_padded_buffer() {
    let raw = identify_buffer("Samsung SSD 860 EVO 500GB", "S3Z1NB0K123456A", "RVT01B6Q");

    let id = Identity::decode(&raw);
    assert_eq!(id.model, "Samsung SSD 860 EVO 500GB");
    assert_eq!(id.serial, "S3Z1NB0K123456A");
    assert_eq!(id.firmware, "RVT01B6Q");
}

#[test]
fn test_identity_gated_by_capability() {
    let raw = identify_buffer("foo", "bar", "baz");

    let supported = Capabilities {
        block_device: true,
        identify_decode: true,
    };
    assert_eq!(supported.parse_id(&raw).unwrap().model, "foo");
    assert!(Capabilities::NONE.parse_id(&raw).is_none());
}

/// A SMART record with every slot populated.
fn populated_smart() -> SmartData {
    let mut sd = SmartData {
        revision: 0x0010,
        offline_status: 0x00,
        offline_timeout: 0x0258,
        offline_capability: 0x7B,
        smart_capability: 0x0003,
        ..Default::default()
    };
    for (i, slot) in sd.values.iter_mut().enumerate() {
        let n = i as u8 + 1;
        *slot = SmartAttribute {
            id: n,
            status: 0x0032 ^ u16::from(n),
            value: 100 + n,
            vendor: [n, n, n, n, n, n, n, n],
        };
    }
    sd
}

#[test]
fn test_smart_round_trip_all_slots() {
    let sd = populated_smart();
    let raw = sd.to_bytes();
    let decoded = parse_smart_data(&raw);

    assert_eq!(decoded.revision, 0x0010);
    assert_eq!(decoded.values.len(), SMART_ATTRIBUTES);
    for (i, (want, got)) in sd.values.iter().zip(decoded.values.iter()).enumerate() {
        assert_eq!(want, got, "slot {} differs", i);
    }
    assert_eq!(decoded, sd);
}

#[test]
fn test_smart_slots_are_twelve_bytes_apart() {
    let raw = populated_smart().to_bytes();

    for i in 0..SMART_ATTRIBUTES {
        let off = 6 + i * 12;
        assert_eq!(raw[off], i as u8 + 1, "slot {} id at wrong offset", i);
        assert_eq!(raw[off + 3], 101 + i as u8, "slot {} value at wrong offset", i);
    }
    // Trailer fields follow the last slot.
    let order = endian::native();
    assert_eq!(order.read_u16([raw[368], raw[369]]), 0x0258);
    assert_eq!(raw[371], 0x7B);
}

#[test]
fn test_smart_checksum_of_encoded_record() {
    let mut sd = populated_smart();
    let raw = sd.to_bytes();
    let sum = raw[4..SMART_LEN - 1]
        .iter()
        .fold(0u8, |s, b| s.wrapping_add(*b));
    sd.checksum = sum.wrapping_neg();

    assert!(checksum_valid(&sd.to_bytes()));
    // Decoding never validates.
    sd.checksum = sd.checksum.wrapping_add(1);
    let raw = sd.to_bytes();
    assert!(!checksum_valid(&raw));
    assert_eq!(parse_smart_data(&raw).checksum, sd.checksum);
}

#[test]
fn test_smart_health_from_decoded_buffer() {
    let mut sd = SmartData::default();
    sd.values[4] = SmartAttribute {
        id: 5,
        status: 0x33,
        value: 100,
        vendor: [100, 8, 0, 0, 0, 0, 0, 0],
    };
    sd.values[7] = SmartAttribute {
        id: 12,
        status: 0x32,
        value: 99,
        vendor: [99, 0xE8, 0x03, 0, 0, 0, 0, 0],
    };

    let health = parse_smart_data(&sd.to_bytes()).health();
    assert_eq!(health.reallocated_sectors, Some(8));
    assert_eq!(health.power_cycles, Some(1000));
    assert_eq!(health.temperature_celsius, None);
}
