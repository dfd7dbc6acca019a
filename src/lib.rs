//! Raw block device access
//!
//! Opens block devices, verifies that they really are block devices, and
//! queries their size, ATA identification and SMART data through device
//! control calls.
//!
//! # Features
//!
//! - **Block device detection**: opening a regular file, pipe or character device fails with
//!   [`Error::NotBlockDevice`]
//! - **Identification**: model, serial and firmware decoded from the 512 byte identify buffer
//! - **SMART**: the 516 byte SMART buffer decoded into [`SmartData`] with 30 attribute slots
//! - **Platform tiers**: Linux is fully supported; elsewhere every operation reports
//!   [`Error::NotImplemented`]
//!
//! # Architecture
//!
//! ```text
//! open(path) → size check (ENOTTY → NotBlockDevice) → Device
//! Device.identify() → [u8; 512] → Capabilities::parse_id → Identity
//! Device.read_smart() → [u8; 516] → parse_smart_data → SmartData
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use blockdev::{BlockDevice, Capabilities, OpenFlags};
//!
//! let dev = blockdev::open("/dev/sda", &OpenFlags::default()).unwrap();
//! println!("{} bytes", dev.size().unwrap());
//!
//! if let Some(id) = Capabilities::NATIVE.parse_id(&dev.identify().unwrap()) {
//!     println!("model: {}", id.model);
//! }
//! ```

pub mod config;
pub mod device;
pub mod endian;
pub mod error;
pub mod identify;
pub mod smart;

pub use config::{AccessMode, OpenFlags};
pub use device::{open, BlockDevice, Device};
pub use error::{Error, Result};
pub use identify::{Capabilities, Identity};
pub use smart::{SmartAttribute, SmartData, SmartHealth};
