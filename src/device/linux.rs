//! Block device access for Linux.
//!
//! Size, identification and SMART data are fetched with ioctls; stream I/O
//! goes straight to the underlying file.

use super::control::{ControlCall, SyscallIoctl};
use super::BlockDevice;
use crate::config::{ata, ioctl, OpenFlags, IDENTIFY_LEN, SMART_LEN};
use crate::endian;
use crate::error::{Error, Result};
use crate::identify::Capabilities;
use crate::smart::{parse_smart_data, SmartData};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::os::unix::fs::{FileExt, OpenOptionsExt};
use std::os::unix::io::{AsRawFd, IntoRawFd, RawFd};
use std::path::{Path, PathBuf};

/// Descriptor value held by a closed handle.
const CLOSED_FD: RawFd = -1;

/// Handle for a Linux block device.
pub struct LinuxDevice {
    dev: Option<File>,
    fd: RawFd,
    path: PathBuf,
    control: Box<dyn ControlCall>,
}

impl fmt::Debug for LinuxDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinuxDevice")
            .field("path", &self.path)
            .field("fd", &self.fd)
            .finish()
    }
}

impl LinuxDevice {
    /// Open a block device with the given flags.
    pub fn open(path: &Path, flags: &OpenFlags) -> Result<Self> {
        flags.validate().map_err(Error::InvalidConfig)?;

        let file = OpenOptions::new()
            .read(flags.mode.readable())
            .write(flags.mode.writable())
            .custom_flags(flags.platform_flags())
            .open(path)?;

        Self::with_control(file, path, Box::new(SyscallIoctl))
    }

    /// Wrap an already open file, issuing control calls through `control`.
    ///
    /// The device size is queried immediately; regular files and the like
    /// answer `ENOTTY`, which is reported as [`Error::NotBlockDevice`]. On any
    /// failure the file is closed before returning.
    pub fn with_control(
        file: File,
        path: impl Into<PathBuf>,
        control: Box<dyn ControlCall>,
    ) -> Result<Self> {
        let mut dev = Self {
            fd: file.as_raw_fd(),
            dev: Some(file),
            path: path.into(),
            control,
        };

        let err = match dev.size() {
            Ok(size) => {
                log::debug!("opened {} ({} bytes)", dev.path.display(), size);
                return Ok(dev);
            }
            Err(err) => err,
        };

        if let Err(close_err) = dev.close() {
            log::debug!("closing {} after failed size check: {}", dev.path.display(), close_err);
        }

        if err.is_not_tty() {
            log::debug!("{} is not a block device", dev.path.display());
            return Err(Error::NotBlockDevice);
        }

        log::warn!("size check on {} failed: {}", dev.path.display(), err);
        Err(err)
    }

    /// Path the device was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn fd(&self) -> Result<RawFd> {
        match self.dev {
            Some(_) => Ok(self.fd),
            None => Err(Error::Closed),
        }
    }

    fn file(&self) -> io::Result<&File> {
        self.dev.as_ref().ok_or_else(|| Error::Closed.into())
    }
}

impl BlockDevice for LinuxDevice {
    fn size(&self) -> Result<u64> {
        let mut size = [0u8; 8];
        self.control.control(self.fd()?, ioctl::BLKGETSIZE64, &mut size)?;
        Ok(endian::native().read_u64(size))
    }

    fn identify(&self) -> Result<[u8; IDENTIFY_LEN]> {
        let mut b = [0u8; IDENTIFY_LEN];
        self.control.control(self.fd()?, ioctl::HDIO_GET_IDENTITY, &mut b)?;
        Ok(b)
    }

    fn read_smart(&self) -> Result<SmartData> {
        let mut b = [0u8; SMART_LEN];
        b[..4].copy_from_slice(&[ata::SMART_CMD, 0, ata::SMART_READ_VALUES, ata::SMART_SECTORS]);
        self.control.control(self.fd()?, ioctl::HDIO_DRIVE_CMD, &mut b)?;
        Ok(parse_smart_data(&b))
    }

    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        self.file()?.read_at(buf, offset)
    }

    fn write_at(&self, buf: &[u8], offset: u64) -> io::Result<usize> {
        self.file()?.write_at(buf, offset)
    }

    fn close(&mut self) -> Result<()> {
        let file = self.dev.take().ok_or(Error::Closed)?;
        self.fd = CLOSED_FD;

        // Dropping a File discards the result of close(2); report it instead.
        let fd = file.into_raw_fd();
        // SAFETY: `fd` came from `into_raw_fd`, so nothing else owns or closes it.
        if unsafe { libc::close(fd) } == -1 {
            return Err(Error::last_os_error("close"));
        }

        log::debug!("closed {}", self.path.display());
        Ok(())
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::NATIVE
    }
}

impl Read for LinuxDevice {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file()?.read(buf)
    }
}

impl Write for LinuxDevice {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file()?.flush()
    }
}

impl Seek for LinuxDevice {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file()?.seek(pos)
    }
}
