//! Memory-transfer micro-benchmarks.
//!
//! Two measurement paths share this crate: CPU-to-CPU copies between NUMA
//! nodes (interleaved placement, fork-join parallel memcpy, wall-clock
//! timing) and CPU-to-GPU transfers across multiple CUDA devices
//! (per-device streams, device-side event timestamps). The binaries
//! `numa-xfer-bench` and `gpu-xfer-bench` drive them; the library holds the
//! placement allocators, the chunk partitioner, the timed loops and the two
//! variant-specific statistics formulas.
//!
//! The GPU path is gated behind the `cuda` feature, which links against the
//! CUDA driver.

pub mod copy;
mod direction;
mod error;
pub mod mem;
mod nodeset;
pub mod partition;
pub mod stats;

#[cfg(feature = "cuda")]
pub mod cuda;

pub use direction::{Direction, OpsParseError, parse_operation_types};
pub use error::*;
pub use nodeset::{NodeSet, ParseError};
