//! Block device handles.
//!
//! Each platform tier provides a concrete handle implementing [`BlockDevice`];
//! the one matching the build target is exported as [`Device`] and opened
//! through [`open`].

#[cfg(target_os = "linux")]
pub mod control;
#[cfg(target_os = "linux")]
mod linux;
pub mod unsupported;

use crate::config::{OpenFlags, IDENTIFY_LEN};
use crate::error::Result;
use crate::identify::Capabilities;
use crate::smart::SmartData;
use std::io::{self, Read, Seek, Write};
use std::path::Path;

#[cfg(target_os = "linux")]
pub use linux::LinuxDevice;
pub use unsupported::UnsupportedDevice;

/// Handle type for the platform this crate was built for.
#[cfg(target_os = "linux")]
pub type Device = LinuxDevice;

#[cfg(not(target_os = "linux"))]
pub type Device = UnsupportedDevice;

/// Operations shared by every platform's block device handle.
///
/// Stream I/O comes from the `Read`, `Write` and `Seek` supertraits and goes
/// straight to the underlying file.
pub trait BlockDevice: Read + Write + Seek {
    /// Total size of the device in bytes.
    fn size(&self) -> Result<u64>;

    /// Raw drive identification data.
    ///
    /// Decode with [`Capabilities::parse_id`] when the platform supports it.
    fn identify(&self) -> Result<[u8; IDENTIFY_LEN]>;

    /// Read and decode the drive's SMART data sector.
    fn read_smart(&self) -> Result<SmartData>;

    /// Read at an absolute offset without moving the cursor.
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize>;

    /// Write at an absolute offset without moving the cursor.
    fn write_at(&self, buf: &[u8], offset: u64) -> io::Result<usize>;

    /// Release the device. Every later operation fails.
    fn close(&mut self) -> Result<()>;

    /// What this handle's platform tier supports.
    fn capabilities(&self) -> Capabilities;
}

/// Open a block device and verify that it is one.
///
/// Returns [`Error::NotBlockDevice`](crate::Error::NotBlockDevice) when the
/// path exists but is a regular file, pipe or character device, and
/// [`Error::NotImplemented`](crate::Error::NotImplemented) on platforms
/// without block device support.
pub fn open(path: impl AsRef<Path>, flags: &OpenFlags) -> Result<Device> {
    Device::open(path.as_ref(), flags)
}
