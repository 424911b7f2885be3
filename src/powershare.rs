//! Power share, or reverse wireless charging
//!
//! Lets the device charge other devices placed on its back, through a single
//! vendor attribute chosen at build time:
//!
//! | Variable | Meaning |
//! |---|---|
//! | `POWERSHARE_PATH` | attribute toggling power share |
//! | `POWERSHARE_ENABLED` | value meaning enabled, default `1` |
//! | `POWERSHARE_DISABLED` | value meaning disabled, default `0` |
//!
//! Without `POWERSHARE_PATH` every call touching the attribute fails with
//! [`ExceptionCode::UNSUPPORTED_OPERATION`].
use crate::{
    error::text,
    status::{ExceptionCode, Result, Status},
    sysfs::{read_node, write_node},
    util::env_or,
};
use log::error;
use std::path::{Path, PathBuf};

/// The power share interface, as called by the host runtime.
pub trait IPowerShare {
    fn is_enabled(&self) -> Result<bool>;

    fn set_enabled(&self, enable: bool) -> Result<()>;

    /// Battery level power sharing stops at
    fn get_min_battery(&self) -> Result<i32>;

    fn set_min_battery(&self, min_battery: i32) -> Result<()>;
}

/// The 1.0 power share interface.
///
/// Calls can't fail, so errors are folded into the returned values.
pub mod v1 {
    pub trait IPowerShare {
        /// `false` if the state can't be read
        fn is_enabled(&self) -> bool;

        /// Returns the state after the change
        fn set_enabled(&self, enable: bool) -> bool;

        fn get_min_battery(&self) -> u32;

        /// Returns the minimum battery level after the change
        fn set_min_battery(&self, min_battery: u32) -> u32;
    }
}

/// The power share attribute and its values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub path: Option<PathBuf>,
    pub enabled: String,
    pub disabled: String,
}

impl Default for Config {
    /// The build-time configuration
    fn default() -> Self {
        Self {
            path: option_env!("POWERSHARE_PATH").map(PathBuf::from),
            enabled: env_or(option_env!("POWERSHARE_ENABLED"), "1").into(),
            disabled: env_or(option_env!("POWERSHARE_DISABLED"), "0").into(),
        }
    }
}

/// Power share backed by a sysfs attribute
#[derive(Debug, Clone, Default)]
pub struct PowerShare {
    config: Config,
}

impl PowerShare {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn path(&self) -> Option<&Path> {
        self.config.path.as_deref()
    }

    fn node(&self) -> Result<&Path> {
        self.path().ok_or_else(|| {
            Status::new_exception(ExceptionCode::UNSUPPORTED_OPERATION, Some(text::NO_NODE))
        })
    }
}

impl IPowerShare for PowerShare {
    fn is_enabled(&self) -> Result<bool> {
        let value = read_node(self.node()?).map_err(|e| {
            error!("Failed to read current PowerShare state: {}", e);
            Status::new_exception(ExceptionCode::UNSUPPORTED_OPERATION, Some(&e.to_string()))
        })?;
        Ok(value == self.config.enabled)
    }

    fn set_enabled(&self, enable: bool) -> Result<()> {
        let value = if enable {
            &self.config.enabled
        } else {
            &self.config.disabled
        };
        write_node(self.node()?, value).map_err(|e| {
            error!("Failed to write PowerShare state: {}", e);
            Status::new_exception(ExceptionCode::SERVICE_SPECIFIC, Some(&e.to_string()))
        })
    }

    fn get_min_battery(&self) -> Result<i32> {
        Ok(0)
    }

    fn set_min_battery(&self, _min_battery: i32) -> Result<()> {
        Ok(())
    }
}

impl v1::IPowerShare for PowerShare {
    fn is_enabled(&self) -> bool {
        IPowerShare::is_enabled(self).unwrap_or(false)
    }

    fn set_enabled(&self, enable: bool) -> bool {
        // The v1 interface reports the resulting state, not the write.
        let _ = IPowerShare::set_enabled(self, enable);
        v1::IPowerShare::is_enabled(self)
    }

    fn get_min_battery(&self) -> u32 {
        0
    }

    fn set_min_battery(&self, _min_battery: u32) -> u32 {
        v1::IPowerShare::get_min_battery(self)
    }
}
