//! Layout constants, control request codes and open configuration.

use serde::{Deserialize, Serialize};

/// Size of the buffer filled by a drive identification query.
pub const IDENTIFY_LEN: usize = 512;

/// Size of the buffer filled by a SMART read: 4 byte command header plus one sector.
pub const SMART_LEN: usize = 516;

/// Number of attribute slots in a SMART data sector.
pub const SMART_ATTRIBUTES: usize = 30;

/// Bytes occupied by a single SMART attribute slot.
pub const SMART_ATTRIBUTE_LEN: usize = 12;

/// Linux ioctl request codes, taken from the kernel headers.
pub mod ioctl {
    /// `_IOR(0x12, 114, size_t)`: device size in bytes as a `u64`.
    pub const BLKGETSIZE64: u64 =
        (2 << 30) | ((std::mem::size_of::<usize>() as u64) << 16) | (0x12 << 8) | 114;

    /// Fetch the 512 byte `struct hd_driveid`.
    pub const HDIO_GET_IDENTITY: u64 = 0x030d;

    /// Issue a raw ATA command through the `{cmd, sector, feature, nsect}` header.
    pub const HDIO_DRIVE_CMD: u64 = 0x031f;
}

/// ATA command bytes used for SMART reads.
pub mod ata {
    /// SMART command opcode.
    pub const SMART_CMD: u8 = 0xB0;

    /// SMART READ DATA feature.
    pub const SMART_READ_VALUES: u8 = 0xD0;

    /// Sectors returned by SMART READ DATA.
    pub const SMART_SECTORS: u8 = 1;
}

/// Access mode a device is opened with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessMode {
    Read,
    Write,
    ReadWrite,
}

impl AccessMode {
    pub fn readable(self) -> bool {
        matches!(self, AccessMode::Read | AccessMode::ReadWrite)
    }

    pub fn writable(self) -> bool {
        matches!(self, AccessMode::Write | AccessMode::ReadWrite)
    }
}

/// Flags used when opening a block device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenFlags {
    /// Read, write or both.
    pub mode: AccessMode,

    /// Bypass the page cache (`O_DIRECT`).
    pub direct: bool,

    /// Extra raw platform open flags.
    pub custom_flags: i32,
}

impl Default for OpenFlags {
    fn default() -> Self {
        Self {
            mode: AccessMode::Read,
            direct: false,
            custom_flags: 0,
        }
    }
}

impl OpenFlags {
    /// Create open flags with the given access mode.
    pub fn new(mode: AccessMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Request `O_DIRECT`.
    pub fn direct(mut self, direct: bool) -> Self {
        self.direct = direct;
        self
    }

    /// Add raw platform open flags.
    pub fn custom_flags(mut self, flags: i32) -> Self {
        self.custom_flags |= flags;
        self
    }

    /// Validate the flags.
    pub fn validate(&self) -> Result<(), String> {
        #[cfg(unix)]
        if self.custom_flags & libc::O_ACCMODE != 0 {
            return Err("access mode must be set through `mode`, not custom flags".to_string());
        }
        Ok(())
    }

    /// Platform flags to pass to `OpenOptionsExt::custom_flags`.
    #[cfg(target_os = "linux")]
    pub fn platform_flags(&self) -> i32 {
        let mut flags = self.custom_flags;
        if self.direct {
            flags |= libc::O_DIRECT;
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_read_only() {
        let flags = OpenFlags::default();
        assert_eq!(flags.mode, AccessMode::Read);
        assert!(flags.mode.readable());
        assert!(!flags.mode.writable());
        assert!(!flags.direct);
        assert!(flags.validate().is_ok());
    }

    #[test]
    fn test_blkgetsize64_matches_headers() {
        #[cfg(target_pointer_width = "64")]
        assert_eq!(ioctl::BLKGETSIZE64, 0x8008_1272);
        #[cfg(target_pointer_width = "32")]
        assert_eq!(ioctl::BLKGETSIZE64, 0x8004_1272);
    }

    #[test]
    fn test_smart_buffer_layout_adds_up() {
        let body = 2 + SMART_ATTRIBUTES * SMART_ATTRIBUTE_LEN + 1 + 1 + 2 + 1 + 1 + 2 + 16 + 125 + 1;
        assert_eq!(4 + body, SMART_LEN);
        assert_eq!(body, IDENTIFY_LEN);
    }

    #[cfg(unix)]
    #[test]
    fn test_validate_rejects_access_mode_bits() {
        let flags = OpenFlags::new(AccessMode::Read).custom_flags(libc::O_RDWR);
        assert!(flags.validate().is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_platform_flags_direct() {
        let flags = OpenFlags::new(AccessMode::ReadWrite)
            .direct(true)
            .custom_flags(libc::O_SYNC);
        let raw = flags.platform_flags();
        assert_eq!(raw & libc::O_DIRECT, libc::O_DIRECT);
        assert_eq!(raw & libc::O_SYNC, libc::O_SYNC);
    }

    #[test]
    fn test_serialize_flags() {
        let flags = OpenFlags::new(AccessMode::ReadWrite);
        let json = serde_json::to_string(&flags).unwrap();
        assert!(json.contains("\"read-write\""));
        let restored: OpenFlags = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, flags);
    }
}
