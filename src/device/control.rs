//! Device control calls.
//!
//! [`ControlCall`] is the seam between a device handle and the kernel: the
//! handle hands over a request code and an argument buffer, the call fills
//! the buffer in place. Tests swap in closures that script the result.

use crate::error::{Error, Result};
use std::os::unix::io::RawFd;

/// Issues a device control request against an open descriptor.
pub trait ControlCall: Send {
    /// Perform `request` on `fd`, letting the callee write into `arg`.
    fn control(&self, fd: RawFd, request: u64, arg: &mut [u8]) -> Result<i32>;
}

impl<F> ControlCall for F
where
    F: Fn(RawFd, u64, &mut [u8]) -> Result<i32> + Send,
{
    fn control(&self, fd: RawFd, request: u64, arg: &mut [u8]) -> Result<i32> {
        self(fd, request, arg)
    }
}

/// The `ioctl(2)` system call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyscallIoctl;

impl ControlCall for SyscallIoctl {
    fn control(&self, fd: RawFd, request: u64, arg: &mut [u8]) -> Result<i32> {
        log::trace!(
            "ioctl fd={} request={:#x} len={}",
            fd,
            request,
            arg.len()
        );

        // SAFETY: every request issued by this crate writes at most `arg.len()`
        // bytes, and `arg` stays borrowed for the duration of the call.
        let ret = unsafe { libc::ioctl(fd, request as libc::Ioctl, arg.as_mut_ptr()) };
        if ret == -1 {
            return Err(Error::last_os_error("ioctl"));
        }

        Ok(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ioctl::BLKGETSIZE64;
    use std::os::unix::io::AsRawFd;

    #[test]
    fn test_closure_is_a_control_call() {
        let call = |_fd: RawFd, request: u64, arg: &mut [u8]| -> Result<i32> {
            arg[0] = request as u8;
            Ok(7)
        };

        let mut buf = [0u8; 4];
        let ret = call.control(3, 0x42, &mut buf).unwrap();
        assert_eq!(ret, 7);
        assert_eq!(buf[0], 0x42);
    }

    #[test]
    fn test_syscall_on_regular_file_is_enotty() {
        let file = tempfile::tempfile().unwrap();
        let mut buf = [0u8; 8];

        let err = SyscallIoctl
            .control(file.as_raw_fd(), BLKGETSIZE64, &mut buf)
            .unwrap_err();
        assert!(err.is_not_tty(), "unexpected error: {:?}", err);
    }

    #[test]
    fn test_syscall_on_bad_descriptor() {
        let mut buf = [0u8; 8];
        let err = SyscallIoctl.control(-1, BLKGETSIZE64, &mut buf).unwrap_err();
        assert!(matches!(
            err,
            Error::Syscall { call: "ioctl", errno } if errno == libc::EBADF
        ));
    }
}
