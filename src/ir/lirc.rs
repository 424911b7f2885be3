//! Linux Infrared Remote Control character devices
//!
//! See the [kernel docs][1] for details.
//!
//! [1]: https://www.kernel.org/doc/html/latest/userspace-api/media/rc/lirc-dev-intro.html
use super::Transmitter;
use crate::{error::TransmitError, util::DEV_PATH};
use std::{
    fs::OpenOptions,
    io::{self, prelude::*},
    os::unix::io::AsRawFd,
    path::{Path, PathBuf},
};

/// Internal ioctl stuff
mod _impl {
    use nix::ioctl_write_ptr;

    ioctl_write_ptr!(
        /// The `LIRC_SET_SEND_CARRIER` ioctl, defined in
        /// <linux/lirc.h>
        set_send_carrier,
        b'i',
        0x13,
        u32
    );
}

/// A LIRC device, `/dev/lirc0` by default.
///
/// The device is opened for each transmission, and closed afterwards.
#[derive(Debug, Clone)]
pub struct Lirc {
    path: PathBuf,
}

impl Lirc {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for Lirc {
    fn default() -> Self {
        Self::new(Path::new(DEV_PATH).join("lirc0"))
    }
}

impl Transmitter for Lirc {
    /// # Implementation
    ///
    /// This uses the `LIRC_SET_SEND_CARRIER` ioctl, then a single `write(2)`
    /// of the pulses in native byte order.
    fn transmit(&self, carrier_hz: i32, pulses: &[i32]) -> Result<(), TransmitError> {
        let mut f = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(TransmitError::Open)?;

        let carrier = u32::try_from(carrier_hz).map_err(|_| {
            TransmitError::Carrier(carrier_hz, io::ErrorKind::InvalidInput.into())
        })?;
        // Safe because `f` is open for the duration of the call and `carrier`
        // outlives it.
        unsafe { _impl::set_send_carrier(f.as_raw_fd(), &carrier) }
            .map_err(|e| TransmitError::Carrier(carrier_hz, e.into()))?;

        let data: Vec<u8> = pulses.iter().flat_map(|p| p.to_ne_bytes()).collect();
        f.write_all(&data)
            .map_err(|e| TransmitError::Write(pulses.len(), e))
    }
}
