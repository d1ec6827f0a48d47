pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = core::result::Result<T, Error>;

pub trait ErrorKind {
    fn kind<E: std::error::Error + PartialEq + 'static>(&self) -> Option<&E>;
}

impl ErrorKind for Error {
    fn kind<E: std::error::Error + PartialEq + 'static>(&self) -> Option<&E> {
        self.downcast_ref::<E>()
    }
}

/// Benchmark precondition failures. All of these abort the run; they are
/// propagated to the binary driver instead of exiting deep inside a helper.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum BenchError {
    NumaUnavailable,
    NoUsableNodes,
    ZeroSizedAlloc,
}

impl BenchError {
    pub fn as_str(&self) -> &'static str {
        match self {
            BenchError::NumaUnavailable => "NUMA support is not available on this system",
            BenchError::NoUsableNodes => "none of the requested NUMA nodes are online",
            BenchError::ZeroSizedAlloc => "allocation size must be non-zero",
        }
    }
}

impl core::fmt::Debug for BenchError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl core::fmt::Display for BenchError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for BenchError {}
