//! Consumer infrared
//!
//! Transmits remote control patterns through a LIRC device.
use crate::{
    error::TransmitError,
    status::{ExceptionCode, Result, Status},
};
use log::{error, warn};

pub use self::lirc::Lirc;

mod lirc;

/// Carrier frequencies used when none are configured.
pub const DEFAULT_CARRIER_RANGE: ConsumerIrFreqRange = ConsumerIrFreqRange {
    min_hz: 30000,
    max_hz: 60000,
};

/// Inclusive range of supported carrier frequencies, in Hz
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ConsumerIrFreqRange {
    pub min_hz: i32,
    pub max_hz: i32,
}

impl ConsumerIrFreqRange {
    pub fn contains(&self, hz: i32) -> bool {
        (self.min_hz..=self.max_hz).contains(&hz)
    }
}

/// Something that can emit an infrared pattern
pub trait Transmitter {
    /// Modulate `pulses` onto a `carrier_hz` carrier.
    ///
    /// `pulses` alternates on and off durations in microseconds, starting and
    /// ending with on, so always has an odd length.
    fn transmit(&self, carrier_hz: i32, pulses: &[i32]) -> Result<(), TransmitError>;
}

/// The consumer IR interface, as called by the host runtime.
pub trait IConsumerIr {
    fn get_carrier_freqs(&self) -> Result<Vec<ConsumerIrFreqRange>>;

    /// Transmit `pattern`, alternating on and off durations in microseconds.
    fn transmit(&self, carrier_freq_hz: i32, pattern: &[i32]) -> Result<()>;
}

/// Parse a comma separated list of carrier frequencies.
///
/// Empty or invalid entries are kept as [`None`], so pairs stay aligned.
///
/// # Example
///
/// `30000,60000,,40000` is `[Some(30000), Some(60000), None, Some(40000)]`
pub fn parse_carrier_freqs(s: &str) -> Vec<Option<i32>> {
    if s.trim().is_empty() {
        return Vec::new();
    }
    s.split(',').map(|f| f.trim().parse().ok()).collect()
}

/// Trim `pattern` to what the kernel accepts.
///
/// LIRC requires an odd number of entries, ending with a pulse, so a
/// trailing space is dropped.
fn pulses(pattern: &[i32]) -> &[i32] {
    if pattern.len() % 2 == 0 {
        &pattern[..pattern.len().saturating_sub(1)]
    } else {
        pattern
    }
}

/// Consumer IR, transmitting through `T`
#[derive(Debug, Clone)]
pub struct ConsumerIr<T = Lirc> {
    ranges: Vec<ConsumerIrFreqRange>,
    transmitter: T,
}

impl<T: Transmitter> ConsumerIr<T> {
    /// Create a new [`ConsumerIr`].
    ///
    /// `carrier_freqs` is read as consecutive `(min, max)` pairs. Pairs with
    /// either side missing are skipped, as is a trailing odd entry.
    ///
    /// With fewer than two entries [`DEFAULT_CARRIER_RANGE`] is used.
    pub fn new(carrier_freqs: &[Option<i32>], transmitter: T) -> Self {
        let ranges = if carrier_freqs.len() >= 2 {
            carrier_freqs
                .chunks_exact(2)
                .filter_map(|pair| match (pair[0], pair[1]) {
                    (Some(min_hz), Some(max_hz)) => Some(ConsumerIrFreqRange { min_hz, max_hz }),
                    _ => None,
                })
                .collect()
        } else {
            vec![DEFAULT_CARRIER_RANGE]
        };
        Self {
            ranges,
            transmitter,
        }
    }

    /// Whether `carrier_hz` is within any supported range
    pub fn is_in_range(&self, carrier_hz: i32) -> bool {
        self.ranges.iter().any(|r| r.contains(carrier_hz))
    }

    pub fn transmitter(&self) -> &T {
        &self.transmitter
    }
}

impl Default for ConsumerIr<Lirc> {
    fn default() -> Self {
        Self::new(&[], Lirc::default())
    }
}

impl<T: Transmitter> IConsumerIr for ConsumerIr<T> {
    fn get_carrier_freqs(&self) -> Result<Vec<ConsumerIrFreqRange>> {
        Ok(self.ranges.clone())
    }

    fn transmit(&self, carrier_freq_hz: i32, pattern: &[i32]) -> Result<()> {
        if pattern.is_empty() {
            return Ok(());
        }
        if !self.is_in_range(carrier_freq_hz) {
            warn!("Carrier {} outside supported ranges", carrier_freq_hz);
        }

        self.transmitter
            .transmit(carrier_freq_hz, pulses(pattern))
            .map_err(|e| {
                error!("Failed to transmit {} entries: {}", pattern.len(), e);
                let code = match e {
                    TransmitError::Carrier(..) => ExceptionCode::UNSUPPORTED_OPERATION,
                    TransmitError::Open(_) | TransmitError::Write(..) => {
                        ExceptionCode::ILLEGAL_STATE
                    }
                };
                Status::new_exception(code, Some(&e.to_string()))
            })
    }
}
