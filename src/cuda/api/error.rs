pub type CudaResult<T> = core::result::Result<T, CudaError>;

/// A failed driver call, carrying the name of the failing operation so the
/// diagnostic names the exact call instead of terminating the process from
/// inside a helper.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CudaError {
    pub op: &'static str,
    pub kind: CudaErrorKind,
}

impl core::fmt::Debug for CudaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} failed: {}", self.op, self.kind)
    }
}

impl core::fmt::Display for CudaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for CudaError {}

/// Decoded driver status codes. Codes this crate never triggers collapse
/// into `Unknown` with the raw value preserved.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum CudaErrorKind {
    InvalidValue,
    OutOfMemory,
    NotInitialized,
    Deinitialized,
    NoDevice,
    InvalidDevice,
    InvalidContext,
    MapFailed,
    UnmapFailed,
    AlreadyMapped,
    InvalidHandle,
    NotReady,
    IllegalAddress,
    HostMemoryAlreadyRegistered,
    HostMemoryNotRegistered,
    LaunchFailed,
    NotSupported,
    InvalidDeviceIdx,
    InvalidAllocSize,
    Unknown(u32),
}

impl CudaErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CudaErrorKind::InvalidValue => "invalid value passed to the driver",
            CudaErrorKind::OutOfMemory => "device is out of memory",
            CudaErrorKind::NotInitialized => "driver not initialized, cuInit was not called",
            CudaErrorKind::Deinitialized => "driver is shutting down",
            CudaErrorKind::NoDevice => "no CUDA-capable device is available",
            CudaErrorKind::InvalidDevice => "invalid device ordinal",
            CudaErrorKind::InvalidContext => "invalid or destroyed context",
            CudaErrorKind::MapFailed => "mapping host memory failed",
            CudaErrorKind::UnmapFailed => "unmapping host memory failed",
            CudaErrorKind::AlreadyMapped => "memory is already mapped",
            CudaErrorKind::InvalidHandle => "invalid resource handle",
            CudaErrorKind::NotReady => "asynchronous operation has not completed",
            CudaErrorKind::IllegalAddress => "illegal memory address",
            CudaErrorKind::HostMemoryAlreadyRegistered => "host memory is already registered",
            CudaErrorKind::HostMemoryNotRegistered => "host memory is not registered",
            CudaErrorKind::LaunchFailed => "launch failed",
            CudaErrorKind::NotSupported => "operation not supported on this system",
            CudaErrorKind::InvalidDeviceIdx => "device ordinal is beyond the device count",
            CudaErrorKind::InvalidAllocSize => "device allocation size must be non-zero",
            CudaErrorKind::Unknown(_) => "unknown CUDA error",
        }
    }
}

impl From<u32> for CudaErrorKind {
    fn from(code: u32) -> Self {
        match code {
            1 => CudaErrorKind::InvalidValue,
            2 => CudaErrorKind::OutOfMemory,
            3 => CudaErrorKind::NotInitialized,
            4 => CudaErrorKind::Deinitialized,
            100 => CudaErrorKind::NoDevice,
            101 => CudaErrorKind::InvalidDevice,
            201 => CudaErrorKind::InvalidContext,
            205 => CudaErrorKind::MapFailed,
            206 => CudaErrorKind::UnmapFailed,
            208 => CudaErrorKind::AlreadyMapped,
            400 => CudaErrorKind::InvalidHandle,
            600 => CudaErrorKind::NotReady,
            700 => CudaErrorKind::IllegalAddress,
            712 => CudaErrorKind::HostMemoryAlreadyRegistered,
            713 => CudaErrorKind::HostMemoryNotRegistered,
            719 => CudaErrorKind::LaunchFailed,
            801 => CudaErrorKind::NotSupported,
            other => CudaErrorKind::Unknown(other),
        }
    }
}

impl core::fmt::Debug for CudaErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CudaErrorKind::Unknown(code) => write!(f, "unknown CUDA error (code {code})"),
            _ => write!(f, "{}", self.as_str()),
        }
    }
}

impl core::fmt::Display for CudaErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for CudaErrorKind {}

#[cfg(test)]
mod tests {
    use super::{CudaError, CudaErrorKind};

    #[test]
    fn decodes_common_codes() {
        assert_eq!(CudaErrorKind::from(2), CudaErrorKind::OutOfMemory);
        assert_eq!(CudaErrorKind::from(100), CudaErrorKind::NoDevice);
        assert_eq!(CudaErrorKind::from(713), CudaErrorKind::HostMemoryNotRegistered);
    }

    #[test]
    fn unknown_codes_keep_the_raw_value() {
        assert_eq!(CudaErrorKind::from(424242), CudaErrorKind::Unknown(424242));
        assert_eq!(
            format!("{}", CudaErrorKind::Unknown(999)),
            "unknown CUDA error (code 999)"
        );
    }

    #[test]
    fn error_names_the_failing_op() {
        let err = CudaError {
            op: "cuMemAlloc_v2",
            kind: CudaErrorKind::OutOfMemory,
        };
        assert_eq!(format!("{err}"), "cuMemAlloc_v2 failed: device is out of memory");
    }
}
