//! Byte-level encoding support.
//!
//! All text handled by this library is reduced to bytes and lifted into a
//! printable symbol alphabet; this module owns that mapping.

pub mod byte_level;

pub use byte_level::ByteLevelMap;
