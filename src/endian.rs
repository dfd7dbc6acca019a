//! Native byte order detection.
//!
//! Drives report multi-byte fields in host order, so every decoder reads
//! integers through the order resolved here.

use std::sync::OnceLock;

/// Integer byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

static NATIVE: OnceLock<ByteOrder> = OnceLock::new();

/// The byte order of the running machine, detected on first use.
pub fn native() -> ByteOrder {
    *NATIVE.get_or_init(|| {
        if 1u32.to_ne_bytes()[0] == 1 {
            ByteOrder::Little
        } else {
            ByteOrder::Big
        }
    })
}

impl ByteOrder {
    pub fn read_u16(self, b: [u8; 2]) -> u16 {
        match self {
            ByteOrder::Little => u16::from_le_bytes(b),
            ByteOrder::Big => u16::from_be_bytes(b),
        }
    }

    pub fn read_u64(self, b: [u8; 8]) -> u64 {
        match self {
            ByteOrder::Little => u64::from_le_bytes(b),
            ByteOrder::Big => u64::from_be_bytes(b),
        }
    }

    pub fn write_u16(self, v: u16) -> [u8; 2] {
        match self {
            ByteOrder::Little => v.to_le_bytes(),
            ByteOrder::Big => v.to_be_bytes(),
        }
    }
}
