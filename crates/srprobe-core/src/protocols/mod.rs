//! Protocol decoding modules.
//!
//! Each protocol follows a layered structure:
//! - `layout`: byte offsets and constants (source of truth)
//! - `reader`: safe byte access and protocol conventions
//! - `parser`: domain-level decoding
//! - `error`: explicit, actionable errors
//!
//! Parsers are pure and contain no I/O. The frame decoder chains them
//! Ethernet -> IPv6 -> SRH, then looks for an IOAM trace in the same chain.

pub mod ethernet;
pub mod ioam;
pub mod ipv6;
pub mod srh;
