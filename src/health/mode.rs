//! Charging control capabilities
use bitflags::bitflags;

bitflags! {
    /// Charging control modes a device supports.
    ///
    /// Values match `ChargingControlSupportedMode` in the framework
    /// interface, and are reported to it as a plain integer.
    pub struct SupportedMode: i32 {
        /// Charging can be switched on and off.
        const TOGGLE = 1 << 0;

        /// With charging switched off the device runs from the charger
        /// directly, bypassing the battery.
        const BYPASS = 1 << 1;

        /// Charging can be scheduled to finish by a deadline.
        const DEADLINE = 1 << 2;

        /// Charging can be limited to a start and stop level.
        const LIMIT = 1 << 3;
    }
}

impl SupportedMode {
    /// Capabilities compiled into this build, see the crate features.
    pub fn compiled() -> Self {
        let mut mode = Self::empty();
        if cfg!(feature = "toggle") {
            mode |= Self::TOGGLE;
        }
        if cfg!(feature = "bypass") {
            mode |= Self::BYPASS;
        }
        if cfg!(feature = "deadline") {
            mode |= Self::DEADLINE;
        }
        if cfg!(feature = "limit") {
            mode |= Self::LIMIT;
        }
        mode
    }
}
