//! Drive identification decoding.
//!
//! The identify buffer is the Linux `struct hd_driveid`; its text fields sit at
//! fixed offsets and are padded with spaces or NULs.

use crate::config::IDENTIFY_LEN;
use serde::{Deserialize, Serialize};
use std::ops::Range;

const SERIAL: Range<usize> = 20..40;
const FIRMWARE: Range<usize> = 46..54;
const MODEL: Range<usize> = 54..94;

/// Information parsed from a drive's raw identification bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub model: String,
    pub serial: String,
    pub firmware: String,
}

impl Identity {
    /// Decode the text fields of an identify buffer.
    pub fn decode(raw: &[u8; IDENTIFY_LEN]) -> Self {
        Self {
            model: byte_str(&raw[MODEL]),
            serial: byte_str(&raw[SERIAL]),
            firmware: byte_str(&raw[FIRMWARE]),
        }
    }
}

/// Convert a fixed-width field to text, trimming whitespace and NUL padding.
fn byte_str(b: &[u8]) -> String {
    String::from_utf8_lossy(b)
        .trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string()
}

/// What the current platform tier can do with a block device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Size, identify and SMART control calls are available.
    pub block_device: bool,
    /// Identify buffers can be decoded into an [`Identity`].
    pub identify_decode: bool,
}

impl Capabilities {
    /// Tier with no device support at all.
    pub const NONE: Capabilities = Capabilities {
        block_device: false,
        identify_decode: false,
    };

    /// Tier of the platform this crate was built for.
    #[cfg(target_os = "linux")]
    pub const NATIVE: Capabilities = Capabilities {
        block_device: true,
        identify_decode: true,
    };

    #[cfg(not(target_os = "linux"))]
    pub const NATIVE: Capabilities = Capabilities::NONE;

    /// Decode an identify buffer, or `None` if this tier cannot.
    pub fn parse_id(&self, raw: &[u8; IDENTIFY_LEN]) -> Option<Identity> {
        if !self.identify_decode {
            return None;
        }
        Some(Identity::decode(raw))
    }
}
