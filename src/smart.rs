//! SMART data decoding.
//!
//! A SMART read returns a 4 byte command header followed by one 512 byte
//! sector. Decoding walks the buffer sequentially; every multi-byte field is
//! in host byte order.

use crate::config::{SMART_ATTRIBUTES, SMART_LEN};
use crate::endian::{self, ByteOrder};
use serde::{Deserialize, Serialize};

/// Length of the command header preceding the SMART sector.
const HEADER_LEN: usize = 4;

/// A single SMART attribute slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartAttribute {
    pub id: u8,
    pub status: u16,
    pub value: u8,
    #[serde(with = "hex_array")]
    pub vendor: [u8; 8],
}

impl SmartAttribute {
    /// Worst value seen, by ATA convention the first vendor byte.
    pub fn worst(&self) -> u8 {
        self.vendor[0]
    }

    /// 48-bit raw counter held in vendor bytes 1 through 6.
    pub fn raw(&self) -> u64 {
        let v = &self.vendor;
        u64::from_le_bytes([v[1], v[2], v[3], v[4], v[5], v[6], 0, 0])
    }

    /// Attribute failure indicates imminent drive failure.
    pub fn prefailure(&self) -> bool {
        self.status & 0x1 != 0
    }

    /// Attribute is updated during normal operation.
    pub fn online(&self) -> bool {
        self.status & 0x2 != 0
    }
}

/// Decoded SMART data sector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartData {
    pub revision: u16,
    pub values: [SmartAttribute; SMART_ATTRIBUTES],
    pub offline_status: u8,
    pub vendor1: u8,
    pub offline_timeout: u16,
    pub vendor2: u8,
    pub offline_capability: u8,
    pub smart_capability: u16,
    #[serde(with = "hex_array")]
    pub reserved: [u8; 16],
    #[serde(with = "hex_array")]
    pub vendor: [u8; 125],
    pub checksum: u8,
}

impl Default for SmartData {
    fn default() -> Self {
        Self {
            revision: 0,
            values: [SmartAttribute::default(); SMART_ATTRIBUTES],
            offline_status: 0,
            vendor1: 0,
            offline_timeout: 0,
            vendor2: 0,
            offline_capability: 0,
            smart_capability: 0,
            reserved: [0; 16],
            vendor: [0; 125],
            checksum: 0,
        }
    }
}

/// Decode a raw SMART buffer. Performs no validation.
pub fn parse_smart_data(raw: &[u8; SMART_LEN]) -> SmartData {
    let mut r = Reader::new(raw, endian::native());
    let mut sd = SmartData::default();

    // ATA command header
    r.skip(HEADER_LEN);
    sd.revision = r.u16();

    for attr in sd.values.iter_mut() {
        attr.id = r.u8();
        attr.status = r.u16();
        attr.value = r.u8();
        attr.vendor = r.bytes();
    }

    sd.offline_status = r.u8();
    sd.vendor1 = r.u8();
    sd.offline_timeout = r.u16();
    sd.vendor2 = r.u8();
    sd.offline_capability = r.u8();
    sd.smart_capability = r.u16();
    sd.reserved = r.bytes();
    sd.vendor = r.bytes();
    sd.checksum = r.u8();

    debug_assert_eq!(r.pos, SMART_LEN);
    sd
}

impl SmartData {
    /// Encode into the buffer layout read by [`parse_smart_data`].
    ///
    /// The command header bytes are left zeroed.
    pub fn to_bytes(&self) -> [u8; SMART_LEN] {
        let mut w = Writer::new(endian::native());

        w.skip(HEADER_LEN);
        w.u16(self.revision);

        for attr in &self.values {
            w.u8(attr.id);
            w.u16(attr.status);
            w.u8(attr.value);
            w.bytes(&attr.vendor);
        }

        w.u8(self.offline_status);
        w.u8(self.vendor1);
        w.u16(self.offline_timeout);
        w.u8(self.vendor2);
        w.u8(self.offline_capability);
        w.u16(self.smart_capability);
        w.bytes(&self.reserved);
        w.bytes(&self.vendor);
        w.u8(self.checksum);

        debug_assert_eq!(w.pos, SMART_LEN);
        w.buf
    }

    /// Populated attribute slots, in table order.
    pub fn attributes(&self) -> impl Iterator<Item = &SmartAttribute> {
        self.values.iter().filter(|a| a.id != 0)
    }

    /// Look up an attribute by ID.
    pub fn attribute(&self, id: u8) -> Option<&SmartAttribute> {
        self.attributes().find(|a| a.id == id)
    }

    /// Summary of the commonly reported health attributes.
    pub fn health(&self) -> SmartHealth {
        let raw = |id| self.attribute(id).map(|a| a.raw());
        SmartHealth {
            // Only the low byte carries the current temperature.
            temperature_celsius: raw(194).map(|r| r & 0xFF),
            power_on_hours: raw(9),
            power_cycles: raw(12),
            reallocated_sectors: raw(5),
        }
    }
}

/// Commonly reported health metrics. Not every drive reports every attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartHealth {
    pub temperature_celsius: Option<u64>,
    pub power_on_hours: Option<u64>,
    pub power_cycles: Option<u64>,
    pub reallocated_sectors: Option<u64>,
}

/// Whether the 512 byte data sector sums to zero, as ATA requires.
pub fn checksum_valid(raw: &[u8; SMART_LEN]) -> bool {
    raw[HEADER_LEN..]
        .iter()
        .fold(0u8, |sum, b| sum.wrapping_add(*b))
        == 0
}

/// Conventional name of a well-known attribute ID.
pub fn attribute_name(id: u8) -> Option<&'static str> {
    let name = match id {
        1 => "Raw_Read_Error_Rate",
        2 => "Throughput_Performance",
        3 => "Spin_Up_Time",
        4 => "Start_Stop_Count",
        5 => "Reallocated_Sector_Ct",
        7 => "Seek_Error_Rate",
        8 => "Seek_Time_Performance",
        9 => "Power_On_Hours",
        10 => "Spin_Retry_Count",
        11 => "Calibration_Retry_Count",
        12 => "Power_Cycle_Count",
        177 => "Wear_Leveling_Count",
        183 => "Runtime_Bad_Block",
        184 => "End-to-End_Error",
        187 => "Reported_Uncorrect",
        188 => "Command_Timeout",
        190 => "Airflow_Temperature_Cel",
        191 => "G-Sense_Error_Rate",
        192 => "Power-Off_Retract_Count",
        193 => "Load_Cycle_Count",
        194 => "Temperature_Celsius",
        196 => "Reallocated_Event_Count",
        197 => "Current_Pending_Sector",
        198 => "Offline_Uncorrectable",
        199 => "UDMA_CRC_Error_Count",
        200 => "Multi_Zone_Error_Rate",
        241 => "Total_LBAs_Written",
        242 => "Total_LBAs_Read",
        _ => return None,
    };
    Some(name)
}

struct Reader<'a> {
    buf: &'a [u8; SMART_LEN],
    pos: usize,
    order: ByteOrder,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8; SMART_LEN], order: ByteOrder) -> Self {
        Self { buf, pos: 0, order }
    }

    fn skip(&mut self, n: usize) {
        self.pos += n;
    }

    fn u8(&mut self) -> u8 {
        let b = self.buf[self.pos];
        self.pos += 1;
        b
    }

    fn u16(&mut self) -> u16 {
        self.order.read_u16(self.bytes())
    }

    fn bytes<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        out
    }
}

struct Writer {
    buf: [u8; SMART_LEN],
    pos: usize,
    order: ByteOrder,
}

impl Writer {
    fn new(order: ByteOrder) -> Self {
        Self {
            buf: [0u8; SMART_LEN],
            pos: 0,
            order,
        }
    }

    fn skip(&mut self, n: usize) {
        self.pos += n;
    }

    fn u8(&mut self, v: u8) {
        self.buf[self.pos] = v;
        self.pos += 1;
    }

    fn u16(&mut self, v: u16) {
        let b = self.order.write_u16(v);
        self.bytes(&b);
    }

    fn bytes(&mut self, b: &[u8]) {
        self.buf[self.pos..self.pos + b.len()].copy_from_slice(b);
        self.pos += b.len();
    }
}

/// Serialize fixed byte arrays as hex strings.
mod hex_array {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer, const N: usize>(b: &[u8; N], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(b))
    }

    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(d: D) -> Result<[u8; N], D::Error> {
        let s = String::deserialize(d)?;
        let mut out = [0u8; N];
        hex::decode_to_slice(&s, &mut out).map_err(serde::de::Error::custom)?;
        Ok(out)
    }
}
