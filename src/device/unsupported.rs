//! Placeholder handle for platforms without block device support.

use super::BlockDevice;
use crate::config::{OpenFlags, IDENTIFY_LEN};
use crate::error::{Error, Result};
use crate::identify::Capabilities;
use crate::smart::SmartData;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// A block device handle that cannot be opened.
///
/// [`UnsupportedDevice::open`] fails without touching the filesystem, and
/// every operation reports [`Error::NotImplemented`].
#[derive(Debug)]
pub struct UnsupportedDevice {
    _private: (),
}

impl UnsupportedDevice {
    /// Always fails with [`Error::NotImplemented`].
    pub fn open(_path: &Path, _flags: &OpenFlags) -> Result<Self> {
        Err(Error::NotImplemented)
    }
}

fn unsupported() -> io::Error {
    Error::NotImplemented.into()
}

impl BlockDevice for UnsupportedDevice {
    fn size(&self) -> Result<u64> {
        Err(Error::NotImplemented)
    }

    fn identify(&self) -> Result<[u8; IDENTIFY_LEN]> {
        Err(Error::NotImplemented)
    }

    fn read_smart(&self) -> Result<SmartData> {
        Err(Error::NotImplemented)
    }

    fn read_at(&self, _buf: &mut [u8], _offset: u64) -> io::Result<usize> {
        Err(unsupported())
    }

    fn write_at(&self, _buf: &[u8], _offset: u64) -> io::Result<usize> {
        Err(unsupported())
    }

    fn close(&mut self) -> Result<()> {
        Err(Error::NotImplemented)
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE
    }
}

impl Read for UnsupportedDevice {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(unsupported())
    }
}

impl Write for UnsupportedDevice {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(unsupported())
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(unsupported())
    }
}

impl Seek for UnsupportedDevice {
    fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        Err(unsupported())
    }
}
