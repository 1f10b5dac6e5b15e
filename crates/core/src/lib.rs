//! Domain rules for EventEase.
//!
//! This crate has no internal dependencies: it holds the shared id and
//! timestamp types, the domain error type, and the pure decision logic
//! (booking validation, delete guards, venue defaults, image upload) that
//! the database and API layers build on.

pub mod booking;
pub mod error;
pub mod lifecycle;
pub mod storage;
pub mod types;
pub mod venue;
