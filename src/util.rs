//! Utility functions

/// Technically Linux requires sysfs to be at `/sys`, calling it a system
/// configuration error otherwise.
///
/// Every default candidate node is rooted here.
pub const SYSFS_PATH: &str = "/sys";

/// Device file location. Same reasons as [`SYSFS_PATH`].
pub const DEV_PATH: &str = "/dev";

/// Value of a build-time environment variable, or `default`.
pub const fn env_or(var: Option<&'static str>, default: &'static str) -> &'static str {
    match var {
        Some(v) => v,
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_default() {
        assert_eq!(env_or(None, "1"), "1");
        assert_eq!(env_or(Some("on"), "1"), "on");
    }
}
