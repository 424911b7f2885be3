//! Choosing between candidate attributes at startup
use super::access;
use log::{debug, warn};
use std::{
    io,
    num::NonZeroU32,
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

/// Something backed by one or more sysfs attributes
pub trait Node {
    /// Every attribute that must be accessible for this node to be usable.
    fn paths(&self) -> Vec<&Path>;

    /// Check every attribute, returning the first failure
    fn access(&self) -> Result<(), (&Path, io::Error)> {
        for path in self.paths() {
            access(path).map_err(|e| (path, e))?;
        }
        Ok(())
    }
}

impl Node for PathBuf {
    fn paths(&self) -> Vec<&Path> {
        vec![self]
    }
}

/// How many passes [`Probe`] makes over the candidates
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Rounds {
    /// Give up after this many passes
    Limited(NonZeroU32),

    /// Keep going until a candidate becomes accessible.
    ///
    /// Useful when the driver creating the attributes may still be probing.
    Forever,
}

/// Probe an ordered list of candidate nodes for the first accessible one.
///
/// Each candidate is checked up to [`Probe::retries`] times, sleeping
/// [`Probe::delay`] after each failure, before moving on to the next.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Probe {
    retries: u32,
    delay: Duration,
    rounds: Rounds,
}

impl Probe {
    pub const DEFAULT_RETRIES: u32 = 10;

    pub const DEFAULT_DELAY: Duration = Duration::from_millis(10);

    pub fn new(retries: u32, delay: Duration, rounds: Rounds) -> Self {
        Self {
            retries,
            delay,
            rounds,
        }
    }

    /// Checks per candidate, per pass
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Sleep after each failed check
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn rounds(&self) -> Rounds {
        self.rounds
    }

    /// Return the first accessible candidate, in order.
    ///
    /// Returns [`None`] if no candidate became accessible within
    /// [`Probe::rounds`], or there are no candidates.
    pub fn select<'a, N: Node>(&self, candidates: &'a [N]) -> Option<&'a N> {
        if candidates.is_empty() || self.retries == 0 {
            return None;
        }
        let mut round = 0;
        loop {
            for node in candidates {
                for _ in 0..self.retries {
                    match node.access() {
                        Ok(()) => {
                            if let Some(path) = node.paths().first() {
                                debug!("Selected node {}", path.display());
                            }
                            return Some(node);
                        }
                        Err((path, e)) => {
                            warn!("Failed to access() file {}: {}", path.display(), e);
                        }
                    }
                    thread::sleep(self.delay);
                }
            }
            round += 1;
            if let Rounds::Limited(max) = self.rounds {
                if round >= max.get() {
                    return None;
                }
            }
        }
    }
}

impl Default for Probe {
    fn default() -> Self {
        Self {
            retries: Self::DEFAULT_RETRIES,
            delay: Self::DEFAULT_DELAY,
            rounds: Rounds::Limited(NonZeroU32::MIN),
        }
    }
}
