//! CUDA driver API bindings and safe wrappers.

mod cuda;
mod error;
mod ffi;

pub use cuda::*;
pub use error::*;
pub use ffi::{CUdeviceptr, CUresult};
