//! Sysfs-backed hardware services
//!
//! Each service maps a small, fixed set of interface calls onto a handful of
//! kernel nodes under `/sys` or `/dev`:
//!
//! - [`health::ChargingControl`], battery charge toggling, limits and
//!   deadline.
//! - [`ir::ConsumerIr`], consumer infrared transmission through LIRC.
//! - [`powershare::PowerShare`], reverse wireless charging.
//!
//! # Implementation details
//!
//! Every call performs exactly one read or write of a node, parses or
//! formats the string, and maps failure to a [`status::ExceptionCode`].
//! Registering these services with the service manager is left to the host
//! runtime, which calls into the traits in each module.
//!
//! Which node to use is decided once, at construction, by probing a
//! compile-time list of candidates. See [`sysfs::Probe`].
//!
//! Most of these nodes are vendor specific and undocumented, so behavior is
//! documented here on a best effort basis.

pub mod error;
pub mod health;
pub mod ir;
pub mod powershare;
pub mod status;
pub mod sysfs;

mod util;
