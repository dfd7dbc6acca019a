//! Error types for block device access.

use thiserror::Error;

/// Result type alias for block device operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while opening or querying a block device.
#[derive(Error, Debug)]
pub enum Error {
    /// The opened path answered the size check with `ENOTTY`.
    #[error("not a block device")]
    NotBlockDevice,

    /// Block device functionality is not implemented on this platform.
    #[error("not implemented")]
    NotImplemented,

    /// A device control call failed.
    #[error("{call}: {}", os_message(.errno))]
    Syscall { call: &'static str, errno: i32 },

    /// I/O error while opening or streaming the device.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The device handle was used after `close`.
    #[error("device handle is closed")]
    Closed,

    /// Open flags were rejected.
    #[error("invalid open flags: {0}")]
    InvalidConfig(String),
}

fn os_message(errno: &i32) -> std::io::Error {
    std::io::Error::from_raw_os_error(*errno)
}

impl Error {
    /// Build a control call error from a raw platform error code.
    pub fn syscall(call: &'static str, errno: i32) -> Self {
        Error::Syscall { call, errno }
    }

    /// Build a control call error from the last OS error of the calling thread.
    pub fn last_os_error(call: &'static str) -> Self {
        let errno = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
        Error::Syscall { call, errno }
    }

    /// Whether this is an `ioctl` failure reporting "inappropriate ioctl for device".
    #[cfg(unix)]
    pub fn is_not_tty(&self) -> bool {
        matches!(self, Error::Syscall { call: "ioctl", errno } if *errno == libc::ENOTTY)
    }
}

impl From<Error> for std::io::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Io(inner) => inner,
            Error::Syscall { errno, .. } => std::io::Error::from_raw_os_error(errno),
            Error::NotImplemented => std::io::Error::new(std::io::ErrorKind::Unsupported, e),
            other => std::io::Error::new(std::io::ErrorKind::Other, other),
        }
    }
}
