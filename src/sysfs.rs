//! An interface to the individual nodes, or attributes, of the Linux `/sys`
//! filesystem.
//!
//! # Implementation Details
//!
//! Attributes are small text files. Reads return the whole value, usually
//! with a trailing newline. Writes replace the whole value, and the kernel
//! driver validates it, failing the `write(2)` if it's unacceptable.
//!
//! Which attributes exist is vendor and kernel specific, see [`Probe`] for
//! choosing between several candidates.
//!
//! # Stability
//!
//! Vendor power supply attributes are not covered by any of the kernel's
//! [ABI stability levels][1], and may change with any kernel update.
//!
//! [1]: https://www.kernel.org/doc/Documentation/ABI/README
use crate::error::NodeError;
use rustix::fs::{accessat, cwd, Access, AtFlags};
use std::{
    fs::{self, OpenOptions},
    io::{self, prelude::*},
    path::Path,
    str::FromStr,
};

pub use self::probe::{Node, Probe, Rounds};

mod probe;

/// Read the attribute at `path`, with surrounding whitespace removed.
pub fn read_node<P: AsRef<Path>>(path: P) -> io::Result<String> {
    let s = fs::read_to_string(path)?;
    Ok(s.trim().to_owned())
}

/// Replace the attribute at `path` with `value`.
///
/// Symlinks are followed. The attribute must already exist, it is never
/// created.
pub fn write_node<P: AsRef<Path>>(path: P, value: &str) -> io::Result<()> {
    let mut f = OpenOptions::new().write(true).truncate(true).open(path)?;
    f.write_all(value.as_bytes())
}

/// Read the attribute at `path` and parse it as a `T`
///
/// # Errors
///
/// - [`NodeError::Io`] if the attribute can't be read.
/// - [`NodeError::Parse`] if the contents are not a valid `T`.
pub fn parse_node<T: FromStr, P: AsRef<Path>>(path: P) -> Result<T, NodeError> {
    let path = path.as_ref();
    let s = read_node(path)?;
    s.parse()
        .map_err(|_| NodeError::Parse(path.to_path_buf(), s))
}

/// Check whether the attribute at `path` can be both read and written by
/// this process.
///
/// # Implementation
///
/// This uses `access(2)`, so it checks against the real uid/gid.
pub fn access<P: AsRef<Path>>(path: P) -> io::Result<()> {
    accessat(
        cwd(),
        path.as_ref(),
        Access::READ_OK | Access::WRITE_OK,
        AtFlags::empty(),
    )?;
    Ok(())
}

/// Like [`access`], but only whether it succeeded.
pub fn is_accessible<P: AsRef<Path>>(path: P) -> bool {
    access(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

    #[test]
    fn read_trims() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("charge_deadline");
        fs::write(&path, " 3600\n")?;
        assert_eq!(read_node(&path)?, "3600");
        assert_eq!(parse_node::<i64, _>(&path)?, 3600);
        Ok(())
    }

    #[test]
    fn write_replaces() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("input_suspend");
        fs::write(&path, "0\n")?;
        write_node(&path, "1")?;
        assert_eq!(fs::read_to_string(&path)?, "1");
        Ok(())
    }

    #[test]
    fn write_never_creates() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("missing");
        let e = write_node(&path, "1").unwrap_err();
        assert_eq!(e.kind(), ErrorKind::NotFound);
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn parse_errors() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("charge_stop_level");
        fs::write(&path, "full\n")?;
        match parse_node::<i32, _>(&path) {
            Err(NodeError::Parse(p, s)) => {
                assert_eq!(p, path);
                assert_eq!(s, "full");
            }
            r => panic!("unexpected {:?}", r),
        }
        assert!(parse_node::<i32, _>(dir.path().join("missing"))
            .unwrap_err()
            .is_io());
        Ok(())
    }

    #[test]
    fn accessible() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("charging_enabled");
        assert!(!is_accessible(&path));
        fs::write(&path, "1")?;
        assert!(is_accessible(&path));
        Ok(())
    }
}
