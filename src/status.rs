//! Status codes returned across the service interface
//!
//! The host runtime expects every call to produce either a value or a
//! [`Status`] carrying one of the platform's exception codes. The integer
//! values match `binder/Status.h`, as the host forwards them unchanged.
use displaydoc::Display;
use std::fmt;

/// Result of every interface call.
pub type Result<T, E = Status> = std::result::Result<T, E>;

/// Binder exception codes
#[allow(non_camel_case_types)]
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ExceptionCode {
    /// no exception
    NONE = 0,

    /// security exception
    SECURITY = -1,

    /// bad parcelable
    BAD_PARCELABLE = -2,

    /// illegal argument
    ILLEGAL_ARGUMENT = -3,

    /// null pointer
    NULL_POINTER = -4,

    /// illegal state
    ILLEGAL_STATE = -5,

    /// network operation on main thread
    NETWORK_MAIN_THREAD = -6,

    /// unsupported operation
    UNSUPPORTED_OPERATION = -7,

    /// service specific error
    SERVICE_SPECIFIC = -8,
}

impl ExceptionCode {
    /// Raw value, as sent over the wire.
    pub fn as_raw(self) -> i32 {
        self as i32
    }
}

/// A failed call.
///
/// Successful calls are represented by [`Ok`], so a [`Status`] built with
/// [`ExceptionCode::NONE`] only appears through [`Status::ok`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    exception: ExceptionCode,
    service_specific: i32,
    message: Option<String>,
}

impl Status {
    /// The successful status
    pub fn ok() -> Self {
        Self {
            exception: ExceptionCode::NONE,
            service_specific: 0,
            message: None,
        }
    }

    /// Create a status carrying `exception`
    pub fn new_exception(exception: ExceptionCode, message: Option<&str>) -> Self {
        Self {
            exception,
            service_specific: 0,
            message: message.map(str::to_owned),
        }
    }

    /// Create a [`ExceptionCode::SERVICE_SPECIFIC`] status with an
    /// interface-defined error `code`
    pub fn new_service_specific_error(code: i32, message: Option<&str>) -> Self {
        Self {
            exception: ExceptionCode::SERVICE_SPECIFIC,
            service_specific: code,
            message: message.map(str::to_owned),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.exception == ExceptionCode::NONE
    }

    pub fn exception_code(&self) -> ExceptionCode {
        self.exception
    }

    /// Interface-defined error code.
    ///
    /// Only meaningful when [`Status::exception_code`] is
    /// [`ExceptionCode::SERVICE_SPECIFIC`], zero otherwise.
    pub fn service_specific_error(&self) -> i32 {
        self.service_specific
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl From<ExceptionCode> for Status {
    fn from(exception: ExceptionCode) -> Self {
        Self::new_exception(exception, None)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.exception, self.exception.as_raw())?;
        if self.exception == ExceptionCode::SERVICE_SPECIFIC {
            write!(f, ": code {}", self.service_specific)?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for Status {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_values() {
        assert_eq!(ExceptionCode::ILLEGAL_STATE.as_raw(), -5);
        assert_eq!(ExceptionCode::UNSUPPORTED_OPERATION.as_raw(), -7);
        assert_eq!(ExceptionCode::SERVICE_SPECIFIC.as_raw(), -8);
    }

    #[test]
    fn display() {
        let status = Status::new_exception(ExceptionCode::ILLEGAL_STATE, Some("unknown node value"));
        assert_eq!(status.to_string(), "illegal state (-5): unknown node value");

        let status = Status::new_service_specific_error(3, None);
        assert_eq!(status.to_string(), "service specific error (-8): code 3");
        assert!(!status.is_ok());
        assert!(Status::ok().is_ok());
    }
}
