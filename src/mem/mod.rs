//! Placement-aware buffer allocation.

#[cfg(target_os = "linux")]
pub mod numa;

use core::ffi::c_void;
use core::ptr::{self, NonNull};
use std::io;

use crate::error::BenchError;

/// Byte boundary a buffer's address and size must satisfy for DMA-capable
/// transfers.
pub const DMA_ALIGNMENT: usize = 4096;

/// Round `size` up to the next multiple of `align`.
pub const fn align_up(size: usize, align: usize) -> usize {
    size.div_ceil(align) * align
}

/// An alignment-guaranteed host buffer, allocated with `posix_memalign` at
/// [`DMA_ALIGNMENT`] and zero-filled on allocation so that every page is
/// physically committed before the first timed transfer.
#[derive(Debug)]
pub struct DmaBuf {
    ptr: NonNull<u8>,
    len: usize,
}

unsafe impl Send for DmaBuf {}

impl DmaBuf {
    pub fn zeroed(len: usize) -> crate::Result<Self> {
        if len == 0 {
            return Err(BenchError::ZeroSizedAlloc.into());
        }

        let mut ptr: *mut c_void = ptr::null_mut();
        let ret = unsafe { libc::posix_memalign(&mut ptr, DMA_ALIGNMENT, len) };
        if ret != 0 {
            return Err(io::Error::from_raw_os_error(ret).into());
        }
        let ptr = NonNull::new(ptr.cast::<u8>()).ok_or(BenchError::ZeroSizedAlloc)?;
        unsafe { ptr::write_bytes(ptr.as_ptr(), 0, len) };
        Ok(DmaBuf { ptr, len })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for DmaBuf {
    fn drop(&mut self) {
        unsafe { libc::free(self.ptr.as_ptr().cast()) };
    }
}
