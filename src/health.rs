//! Battery charging control
//!
//! Lets the framework switch charging off, stop charging at a given level,
//! or schedule charging to complete by a deadline, using whichever vendor
//! attributes the device exposes.
//!
//! Which of these are available is decided at build time through the
//! `toggle`, `bypass`, `deadline` and `limit` features, see [`Config`] for
//! choosing the attributes.
use crate::{
    error::text,
    status::{ExceptionCode, Result, Status},
    sysfs::{parse_node, read_node, write_node},
};
use log::{error, info};
use std::{io, path::PathBuf};

pub use self::{
    config::{Candidates, ChargingEnabledNode, ChargingLimitNode, Config},
    mode::SupportedMode,
};

mod config;
mod mode;

/// Range the battery level is held in
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ChargingLimitInfo {
    /// Charging restarts below this level
    pub min: i32,

    /// Charging stops at this level
    pub max: i32,
}

/// The charging control interface, as called by the host runtime.
pub trait IChargingControl {
    fn get_charging_enabled(&self) -> Result<bool>;

    fn set_charging_enabled(&self, enabled: bool) -> Result<()>;

    /// Seconds from now charging should complete by.
    fn get_charging_deadline(&self) -> Result<i64>;

    fn set_charging_deadline(&self, deadline: i64) -> Result<()>;

    fn get_charging_limit(&self) -> Result<ChargingLimitInfo>;

    fn set_charging_limit(&self, limit: &ChargingLimitInfo) -> Result<()>;

    /// [`SupportedMode`] bits
    fn get_supported_mode(&self) -> Result<i32>;
}

fn unsupported(what: &str) -> Status {
    Status::new_exception(ExceptionCode::UNSUPPORTED_OPERATION, Some(what))
}

fn illegal_state(what: &str) -> Status {
    Status::new_exception(ExceptionCode::ILLEGAL_STATE, Some(what))
}

/// Charging control backed by sysfs attributes
///
/// Nodes are chosen once, in [`ChargingControl::new`], and never change.
#[derive(Debug, Clone)]
pub struct ChargingControl {
    capabilities: SupportedMode,
    enabled: Option<ChargingEnabledNode>,
    deadline: Option<PathBuf>,
    limit: Option<ChargingLimitNode>,
}

impl ChargingControl {
    /// Select a node for each capability in `config`.
    ///
    /// This may block while probing, see [`crate::sysfs::Probe`].
    /// Capabilities with no accessible node answer every call with
    /// [`ExceptionCode::UNSUPPORTED_OPERATION`].
    pub fn new(config: Config) -> Self {
        let caps = config.capabilities;
        let enabled = if caps.contains(SupportedMode::TOGGLE) {
            config.enabled.resolve(&config.probe)
        } else {
            None
        };
        let deadline = if caps.contains(SupportedMode::DEADLINE) {
            config.deadline.resolve(&config.probe)
        } else {
            None
        };
        let limit = if caps.contains(SupportedMode::LIMIT) {
            config.limit.resolve(&config.probe)
        } else {
            None
        };

        if let Some(node) = &enabled {
            info!("Charging control node selected: {}", node.path.display());
        } else if caps.contains(SupportedMode::TOGGLE) {
            error!("No accessible charging control node");
        }
        if let Some(node) = &deadline {
            info!("Charging deadline node selected: {}", node.display());
        } else if caps.contains(SupportedMode::DEADLINE) {
            error!("No accessible charging deadline node");
        }
        if let Some(node) = &limit {
            info!(
                "Charging limit node selected: {} {}",
                node.start_path.display(),
                node.stop_path.display()
            );
        } else if caps.contains(SupportedMode::LIMIT) {
            error!("No accessible charging limit node");
        }

        Self {
            capabilities: caps,
            enabled,
            deadline,
            limit,
        }
    }

    pub fn enabled_node(&self) -> Option<&ChargingEnabledNode> {
        self.enabled.as_ref()
    }

    pub fn deadline_node(&self) -> Option<&PathBuf> {
        self.deadline.as_ref()
    }

    pub fn limit_node(&self) -> Option<&ChargingLimitNode> {
        self.limit.as_ref()
    }

    /// Supported modes, as [`SupportedMode`]
    ///
    /// A selected [`ChargingEnabledNode`] with its own
    /// [`ChargingEnabledNode::supported_mode`] takes precedence.
    /// Otherwise this is every configured capability, less those whose node
    /// couldn't be found.
    pub fn supported_mode(&self) -> SupportedMode {
        if let Some(mode) = self.enabled.as_ref().and_then(|n| n.supported_mode) {
            return mode;
        }
        let mut mode = self.capabilities;
        mode.set(SupportedMode::TOGGLE, self.enabled.is_some());
        mode.set(SupportedMode::DEADLINE, self.deadline.is_some());
        mode.set(SupportedMode::LIMIT, self.limit.is_some());
        mode
    }

    fn enabled(&self) -> Result<&ChargingEnabledNode> {
        if !self.capabilities.contains(SupportedMode::TOGGLE) {
            return Err(unsupported(text::NOT_COMPILED));
        }
        self.enabled.as_ref().ok_or_else(|| unsupported(text::NO_NODE))
    }

    fn deadline(&self) -> Result<&PathBuf> {
        if !self.capabilities.contains(SupportedMode::DEADLINE) {
            return Err(unsupported(text::NOT_COMPILED));
        }
        self.deadline.as_ref().ok_or_else(|| unsupported(text::NO_NODE))
    }

    fn limit(&self) -> Result<&ChargingLimitNode> {
        if !self.capabilities.contains(SupportedMode::LIMIT) {
            return Err(unsupported(text::NOT_COMPILED));
        }
        self.limit.as_ref().ok_or_else(|| unsupported(text::NO_NODE))
    }

    /// Write human readable diagnostics to `out`
    pub fn dump<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        if let Some(node) = &self.enabled {
            writeln!(out, "Charging control node selected: {}", node.path.display())?;
            match self.get_charging_enabled() {
                Ok(enabled) => writeln!(out, "Charging enabled: {}", enabled)?,
                Err(e) => writeln!(out, "Charging enabled: unknown ({})", e)?,
            }
        }
        if let Some(node) = &self.deadline {
            writeln!(out, "Charging deadline node selected: {}", node.display())?;
        }
        if let Some(node) = &self.limit {
            writeln!(
                out,
                "Charging limit node selected: {} {}",
                node.start_path.display(),
                node.stop_path.display()
            )?;
        }
        writeln!(
            out,
            "Charging control supported mode: {}",
            self.supported_mode().bits()
        )
    }
}

impl Default for ChargingControl {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl IChargingControl for ChargingControl {
    fn get_charging_enabled(&self) -> Result<bool> {
        let node = self.enabled()?;
        let content = read_node(&node.path).map_err(|e| {
            error!("Failed to read current charging enabled value: {}", e);
            unsupported(&e.to_string())
        })?;

        if content == node.value_true {
            Ok(true)
        } else if content == node.value_false {
            Ok(false)
        } else {
            error!("Unknown value {}", content);
            Err(illegal_state(text::UNKNOWN_VALUE))
        }
    }

    fn set_charging_enabled(&self, enabled: bool) -> Result<()> {
        let node = self.enabled()?;
        let value = if enabled {
            &node.value_true
        } else {
            &node.value_false
        };
        write_node(&node.path, value).map_err(|e| {
            error!("Failed to write to charging enable node: {}", e);
            unsupported(&e.to_string())
        })
    }

    fn get_charging_deadline(&self) -> Result<i64> {
        let node = self.deadline()?;
        parse_node(node).map_err(|e| {
            error!("Failed to read current charging deadline value: {}", e);
            if e.is_io() {
                unsupported(&e.to_string())
            } else {
                illegal_state(text::BAD_VALUE)
            }
        })
    }

    fn set_charging_deadline(&self, deadline: i64) -> Result<()> {
        let node = self.deadline()?;
        write_node(node, &deadline.to_string()).map_err(|e| {
            error!("Failed to write to charging deadline node: {}", e);
            illegal_state(&e.to_string())
        })
    }

    fn get_charging_limit(&self) -> Result<ChargingLimitInfo> {
        let node = self.limit()?;
        let read = |path: &PathBuf, which: &str| {
            parse_node(path).map_err(|e| {
                error!("Failed to read current charging limit {} value: {}", which, e);
                if e.is_io() {
                    unsupported(&e.to_string())
                } else {
                    illegal_state(text::BAD_VALUE)
                }
            })
        };
        Ok(ChargingLimitInfo {
            min: read(&node.start_path, "min")?,
            max: read(&node.stop_path, "max")?,
        })
    }

    fn set_charging_limit(&self, limit: &ChargingLimitInfo) -> Result<()> {
        let node = self.limit()?;
        // Stop level, then start level.
        write_node(&node.stop_path, &limit.max.to_string()).map_err(|e| {
            error!("Failed to write to charging limit max node: {}", e);
            unsupported(&e.to_string())
        })?;
        write_node(&node.start_path, &limit.min.to_string()).map_err(|e| {
            error!("Failed to write to charging limit min node: {}", e);
            unsupported(&e.to_string())
        })
    }

    fn get_supported_mode(&self) -> Result<i32> {
        Ok(self.supported_mode().bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sysfs::{Probe, Rounds};
    use std::{fs, num::NonZeroU32, path::Path, time::Duration};
    use tempfile::TempDir;

    type TestResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

    fn probe() -> Probe {
        Probe::new(1, Duration::ZERO, Rounds::Limited(NonZeroU32::new(1).unwrap()))
    }

    /// Fake battery with every capability, rooted in `dir`
    fn battery(dir: &Path, capabilities: SupportedMode) -> TestResult<Config> {
        fs::write(dir.join("input_suspend"), "0\n")?;
        fs::write(dir.join("charge_deadline"), "-1\n")?;
        fs::write(dir.join("charge_start_level"), "0\n")?;
        fs::write(dir.join("charge_stop_level"), "100\n")?;
        Ok(Config {
            capabilities,
            enabled: Candidates::Probe(vec![
                ChargingEnabledNode::new(
                    dir.join("charging_enabled"),
                    "1",
                    "0",
                    Some(SupportedMode::TOGGLE | SupportedMode::BYPASS),
                ),
                ChargingEnabledNode::new(
                    dir.join("input_suspend"),
                    "0",
                    "1",
                    Some(SupportedMode::TOGGLE),
                ),
            ]),
            deadline: Candidates::Probe(vec![dir.join("charge_deadline")]),
            limit: Candidates::Probe(vec![ChargingLimitNode::new(
                dir.join("charge_start_level"),
                dir.join("charge_stop_level"),
            )]),
            probe: probe(),
        })
    }

    fn all() -> SupportedMode {
        SupportedMode::all()
    }

    #[test]
    fn toggle() -> TestResult<()> {
        let dir = TempDir::new()?;
        let control = ChargingControl::new(battery(dir.path(), all())?);
        assert_eq!(
            control.enabled_node().map(|n| n.path.clone()),
            Some(dir.path().join("input_suspend"))
        );

        assert!(control.get_charging_enabled()?);
        control.set_charging_enabled(false)?;
        assert_eq!(fs::read_to_string(dir.path().join("input_suspend"))?, "1");
        assert!(!control.get_charging_enabled()?);
        control.set_charging_enabled(true)?;
        assert!(control.get_charging_enabled()?);
        Ok(())
    }

    #[test]
    fn toggle_unknown_value() -> TestResult<()> {
        let dir = TempDir::new()?;
        let control = ChargingControl::new(battery(dir.path(), all())?);
        fs::write(dir.path().join("input_suspend"), "2\n")?;
        let e = control.get_charging_enabled().unwrap_err();
        assert_eq!(e.exception_code(), ExceptionCode::ILLEGAL_STATE);
        Ok(())
    }

    #[test]
    fn toggle_node_vanished() -> TestResult<()> {
        let dir = TempDir::new()?;
        let control = ChargingControl::new(battery(dir.path(), all())?);
        fs::remove_file(dir.path().join("input_suspend"))?;
        let e = control.get_charging_enabled().unwrap_err();
        assert_eq!(e.exception_code(), ExceptionCode::UNSUPPORTED_OPERATION);
        let e = control.set_charging_enabled(true).unwrap_err();
        assert_eq!(e.exception_code(), ExceptionCode::UNSUPPORTED_OPERATION);
        Ok(())
    }

    #[test]
    fn deadline() -> TestResult<()> {
        let dir = TempDir::new()?;
        let control = ChargingControl::new(battery(dir.path(), all())?);
        assert_eq!(control.get_charging_deadline()?, -1);
        control.set_charging_deadline(7200)?;
        assert_eq!(fs::read_to_string(dir.path().join("charge_deadline"))?, "7200");
        assert_eq!(control.get_charging_deadline()?, 7200);

        fs::write(dir.path().join("charge_deadline"), "soon\n")?;
        let e = control.get_charging_deadline().unwrap_err();
        assert_eq!(e.exception_code(), ExceptionCode::ILLEGAL_STATE);

        fs::remove_file(dir.path().join("charge_deadline"))?;
        let e = control.get_charging_deadline().unwrap_err();
        assert_eq!(e.exception_code(), ExceptionCode::UNSUPPORTED_OPERATION);
        let e = control.set_charging_deadline(1).unwrap_err();
        assert_eq!(e.exception_code(), ExceptionCode::ILLEGAL_STATE);
        Ok(())
    }

    #[test]
    fn limit() -> TestResult<()> {
        let dir = TempDir::new()?;
        let control = ChargingControl::new(battery(dir.path(), all())?);
        assert_eq!(
            control.get_charging_limit()?,
            ChargingLimitInfo { min: 0, max: 100 }
        );
        control.set_charging_limit(&ChargingLimitInfo { min: 70, max: 80 })?;
        assert_eq!(fs::read_to_string(dir.path().join("charge_start_level"))?, "70");
        assert_eq!(fs::read_to_string(dir.path().join("charge_stop_level"))?, "80");
        assert_eq!(
            control.get_charging_limit()?,
            ChargingLimitInfo { min: 70, max: 80 }
        );
        Ok(())
    }

    #[test]
    fn limit_stop_write_fails_first() -> TestResult<()> {
        let dir = TempDir::new()?;
        let control = ChargingControl::new(battery(dir.path(), all())?);
        fs::remove_file(dir.path().join("charge_stop_level"))?;
        let e = control
            .set_charging_limit(&ChargingLimitInfo { min: 50, max: 60 })
            .unwrap_err();
        assert_eq!(e.exception_code(), ExceptionCode::UNSUPPORTED_OPERATION);
        // Start level is untouched
        assert_eq!(fs::read_to_string(dir.path().join("charge_start_level"))?, "0\n");
        Ok(())
    }

    #[test]
    fn not_compiled() -> TestResult<()> {
        let dir = TempDir::new()?;
        let control = ChargingControl::new(battery(dir.path(), SupportedMode::empty())?);
        assert!(control.enabled_node().is_none());
        for e in [
            control.get_charging_enabled().unwrap_err(),
            control.set_charging_enabled(true).unwrap_err(),
            control.get_charging_deadline().unwrap_err(),
            control.set_charging_deadline(0).unwrap_err(),
            control.get_charging_limit().unwrap_err(),
            control.set_charging_limit(&ChargingLimitInfo::default()).unwrap_err(),
        ] {
            assert_eq!(e.exception_code(), ExceptionCode::UNSUPPORTED_OPERATION);
        }
        assert_eq!(control.get_supported_mode()?, 0);
        Ok(())
    }

    #[test]
    fn supported_mode_override() -> TestResult<()> {
        let dir = TempDir::new()?;
        let control = ChargingControl::new(battery(dir.path(), all())?);
        // input_suspend only supports toggling
        assert_eq!(control.get_supported_mode()?, SupportedMode::TOGGLE.bits());

        fs::write(dir.path().join("charging_enabled"), "1")?;
        let control = ChargingControl::new(battery(dir.path(), all())?);
        assert_eq!(control.get_supported_mode()?, 3);
        Ok(())
    }

    #[test]
    fn supported_mode_without_toggle() -> TestResult<()> {
        let dir = TempDir::new()?;
        let caps = SupportedMode::DEADLINE | SupportedMode::LIMIT;
        let control = ChargingControl::new(battery(dir.path(), caps)?);
        assert_eq!(control.get_supported_mode()?, 12);

        let mut config = battery(dir.path(), caps)?;
        config.limit = Candidates::Probe(vec![ChargingLimitNode::new(
            dir.path().join("charge_start_level"),
            dir.path().join("missing"),
        )]);
        let control = ChargingControl::new(config);
        assert!(control.limit_node().is_none());
        assert_eq!(control.get_supported_mode()?, SupportedMode::DEADLINE.bits());
        Ok(())
    }

    #[test]
    fn fixed_node() -> TestResult<()> {
        let dir = TempDir::new()?;
        let mut config = battery(dir.path(), SupportedMode::TOGGLE)?;
        config.enabled = Candidates::Fixed(ChargingEnabledNode::new(
            dir.path().join("charging_enabled"),
            "on",
            "off",
            None,
        ));
        let control = ChargingControl::new(config);
        // Not probed, so selected even though it doesn't exist
        assert!(control.enabled_node().is_some());
        assert_eq!(
            control.get_charging_enabled().unwrap_err().exception_code(),
            ExceptionCode::UNSUPPORTED_OPERATION
        );
        fs::write(dir.path().join("charging_enabled"), "off\n")?;
        assert!(!control.get_charging_enabled()?);
        assert_eq!(control.get_supported_mode()?, SupportedMode::TOGGLE.bits());
        Ok(())
    }

    #[test]
    fn dump() -> TestResult<()> {
        let dir = TempDir::new()?;
        let control = ChargingControl::new(battery(dir.path(), all())?);
        let mut out = Vec::new();
        control.dump(&mut out)?;
        let out = String::from_utf8(out)?;
        assert!(out.contains(&format!(
            "Charging control node selected: {}\n",
            dir.path().join("input_suspend").display()
        )));
        assert!(out.contains("Charging enabled: true\n"));
        assert!(out.contains("Charging deadline node selected: "));
        assert!(out.contains("Charging limit node selected: "));
        assert!(out.ends_with("Charging control supported mode: 1\n"));
        Ok(())
    }
}
