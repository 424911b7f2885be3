//! Which nodes the charging control service uses
//!
//! By default every compiled-in capability probes a table of known vendor
//! attributes. A device can instead pin a single node at build time:
//!
//! | Variable | Meaning |
//! |---|---|
//! | `HEALTH_CHARGING_CONTROL_CHARGING_PATH` | charging enabled attribute |
//! | `HEALTH_CHARGING_CONTROL_CHARGING_ENABLED` | value meaning enabled, default `1` |
//! | `HEALTH_CHARGING_CONTROL_CHARGING_DISABLED` | value meaning disabled, default `0` |
//! | `HEALTH_CHARGING_CONTROL_DEADLINE_PATH` | charging deadline attribute |
//! | `HEALTH_CHARGING_CONTROL_LIMIT_START_PATH` | charge start level attribute |
//! | `HEALTH_CHARGING_CONTROL_LIMIT_STOP_PATH` | charge stop level attribute |
//!
//! The limit pair is only used when both are set.
use super::SupportedMode;
use crate::{
    sysfs::{Node, Probe},
    util::{env_or, SYSFS_PATH},
};
use std::path::{Path, PathBuf};

/// An attribute switching charging on and off
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargingEnabledNode {
    pub path: PathBuf,

    /// Contents when charging is enabled
    pub value_true: String,

    /// Contents when charging is disabled
    pub value_false: String,

    /// Overrides the compiled-in [`SupportedMode`] when this node is selected.
    pub supported_mode: Option<SupportedMode>,
}

impl ChargingEnabledNode {
    pub fn new<P: Into<PathBuf>>(
        path: P,
        value_true: &str,
        value_false: &str,
        supported_mode: Option<SupportedMode>,
    ) -> Self {
        Self {
            path: path.into(),
            value_true: value_true.into(),
            value_false: value_false.into(),
            supported_mode,
        }
    }
}

impl Node for ChargingEnabledNode {
    fn paths(&self) -> Vec<&Path> {
        vec![&self.path]
    }
}

/// A pair of attributes limiting the battery level charging happens between
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargingLimitNode {
    /// Level charging (re)starts below, the limit `min`
    pub start_path: PathBuf,

    /// Level charging stops at, the limit `max`
    pub stop_path: PathBuf,
}

impl ChargingLimitNode {
    pub fn new<P: Into<PathBuf>>(start_path: P, stop_path: P) -> Self {
        Self {
            start_path: start_path.into(),
            stop_path: stop_path.into(),
        }
    }
}

impl Node for ChargingLimitNode {
    fn paths(&self) -> Vec<&Path> {
        vec![&self.start_path, &self.stop_path]
    }
}

/// Where a node comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidates<N> {
    /// Used as is, without probing
    Fixed(N),

    /// The first accessible one is used, see [`Probe`]
    Probe(Vec<N>),
}

impl<N: Node + Clone> Candidates<N> {
    /// Pick a node
    pub fn resolve(&self, probe: &Probe) -> Option<N> {
        match self {
            Self::Fixed(node) => Some(node.clone()),
            Self::Probe(nodes) => probe.select(nodes).cloned(),
        }
    }
}

/// Configuration for [`super::ChargingControl`]
#[derive(Debug, Clone)]
pub struct Config {
    /// Capabilities to enable.
    pub capabilities: SupportedMode,

    pub enabled: Candidates<ChargingEnabledNode>,

    pub deadline: Candidates<PathBuf>,

    pub limit: Candidates<ChargingLimitNode>,

    pub probe: Probe,
}

impl Config {
    /// Known charging enabled attributes, in probe order.
    pub fn default_enabled_nodes() -> Vec<ChargingEnabledNode> {
        let battery = Path::new(SYSFS_PATH).join("class/power_supply/battery");
        let both = Some(SupportedMode::TOGGLE | SupportedMode::BYPASS);
        let toggle = Some(SupportedMode::TOGGLE);
        vec![
            ChargingEnabledNode::new(battery.join("battery_charging_enabled"), "1", "0", both),
            ChargingEnabledNode::new(battery.join("charging_enabled"), "1", "0", both),
            ChargingEnabledNode::new(battery.join("input_suspend"), "0", "1", toggle),
            ChargingEnabledNode::new(
                Path::new(SYSFS_PATH).join("class/qcom-battery/input_suspend"),
                "0",
                "1",
                toggle,
            ),
        ]
    }

    /// Known charging deadline attributes, in probe order.
    pub fn default_deadline_nodes() -> Vec<PathBuf> {
        vec![Path::new(SYSFS_PATH).join("class/power_supply/battery/charge_deadline")]
    }

    /// Known charging limit attributes, in probe order.
    pub fn default_limit_nodes() -> Vec<ChargingLimitNode> {
        let charger = Path::new(SYSFS_PATH).join("devices/platform/google,charger");
        vec![ChargingLimitNode::new(
            charger.join("charge_start_level"),
            charger.join("charge_stop_level"),
        )]
    }
}

impl Default for Config {
    /// The build-time configuration
    fn default() -> Self {
        let enabled = match option_env!("HEALTH_CHARGING_CONTROL_CHARGING_PATH") {
            Some(path) => Candidates::Fixed(ChargingEnabledNode::new(
                path,
                env_or(option_env!("HEALTH_CHARGING_CONTROL_CHARGING_ENABLED"), "1"),
                env_or(option_env!("HEALTH_CHARGING_CONTROL_CHARGING_DISABLED"), "0"),
                None,
            )),
            None => Candidates::Probe(Self::default_enabled_nodes()),
        };
        let deadline = match option_env!("HEALTH_CHARGING_CONTROL_DEADLINE_PATH") {
            Some(path) => Candidates::Fixed(path.into()),
            None => Candidates::Probe(Self::default_deadline_nodes()),
        };
        let limit = match (
            option_env!("HEALTH_CHARGING_CONTROL_LIMIT_START_PATH"),
            option_env!("HEALTH_CHARGING_CONTROL_LIMIT_STOP_PATH"),
        ) {
            (Some(start), Some(stop)) => Candidates::Fixed(ChargingLimitNode::new(start, stop)),
            _ => Candidates::Probe(Self::default_limit_nodes()),
        };
        Self {
            capabilities: SupportedMode::compiled(),
            enabled,
            deadline,
            limit,
            probe: Probe::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables() {
        let enabled = Config::default_enabled_nodes();
        assert_eq!(enabled.len(), 4);
        assert_eq!(
            enabled[0].path,
            Path::new("/sys/class/power_supply/battery/battery_charging_enabled")
        );
        assert_eq!(enabled[2].value_true, "0");
        assert_eq!(enabled[2].value_false, "1");
        assert_eq!(enabled[3].supported_mode, Some(SupportedMode::TOGGLE));

        let limit = &Config::default_limit_nodes()[0];
        assert_eq!(
            limit.paths(),
            vec![
                Path::new("/sys/devices/platform/google,charger/charge_start_level"),
                Path::new("/sys/devices/platform/google,charger/charge_stop_level"),
            ]
        );
    }

    #[test]
    fn fixed_skips_probe() {
        let node = PathBuf::from("/nonexistent/charge_deadline");
        let candidates = Candidates::Fixed(node.clone());
        assert_eq!(candidates.resolve(&Probe::default()), Some(node));
    }
}
