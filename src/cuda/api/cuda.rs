use core::ffi::c_void;
use core::ptr::null_mut;

use log::warn;

use super::error::{CudaError, CudaErrorKind, CudaResult};
use super::ffi::*;
use crate::mem::DmaBuf;

/// Convert a driver status code into a structured error carrying the
/// failing call's name.
#[inline]
pub fn check(op: &'static str, status: CUresult) -> CudaResult<()> {
    if status == CUDA_SUCCESS {
        Ok(())
    } else {
        Err(CudaError {
            op,
            kind: CudaErrorKind::from(status),
        })
    }
}

pub fn init() -> CudaResult<()> {
    check("cuInit", unsafe { cuInit(0) })
}

pub fn device_count() -> CudaResult<i32> {
    let mut count = 0;
    check("cuDeviceGetCount", unsafe { cuDeviceGetCount(&mut count) })?;
    Ok(count)
}

#[derive(Debug)]
pub struct CudaDevice(pub CUdevice);

pub fn device(ordinal: i32) -> CudaResult<CudaDevice> {
    if ordinal >= device_count()? {
        return Err(CudaError {
            op: "cuDeviceGet",
            kind: CudaErrorKind::InvalidDeviceIdx,
        });
    }

    let mut device = CudaDevice(0);
    check("cuDeviceGet", unsafe { cuDeviceGet(&mut device.0, ordinal) })?;
    Ok(device)
}

#[derive(Debug)]
pub struct Context(CUcontext);

impl Context {
    /// Create a context on `device`. The new context becomes current on the
    /// calling thread.
    pub fn new(device: &CudaDevice) -> CudaResult<Self> {
        let mut context = Context(null_mut());
        check("cuCtxCreate_v2", unsafe {
            cuCtxCreate_v2(&mut context.0, 0, device.0)
        })?;
        Ok(context)
    }

    /// Make this context current on the calling thread. Required before
    /// issuing work for a device when driving several devices from one
    /// thread.
    pub fn set_current(&self) -> CudaResult<()> {
        check("cuCtxSetCurrent", unsafe { cuCtxSetCurrent(self.0) })
    }

    /// Block until all work issued to the current context has completed.
    pub fn synchronize(&self) -> CudaResult<()> {
        self.set_current()?;
        check("cuCtxSynchronize", unsafe { cuCtxSynchronize() })
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        if let Err(err) = check("cuCtxDestroy_v2", unsafe { cuCtxDestroy_v2(self.0) }) {
            warn!("{err}");
        }
    }
}

/// A device-resident buffer, freed on drop.
#[derive(Debug)]
pub struct DeviceBuf {
    ptr: CUdeviceptr,
    len: usize,
}

impl DeviceBuf {
    pub fn alloc(len: usize) -> CudaResult<Self> {
        if len == 0 {
            return Err(CudaError {
                op: "cuMemAlloc_v2",
                kind: CudaErrorKind::InvalidAllocSize,
            });
        }

        let mut ptr: CUdeviceptr = 0;
        check("cuMemAlloc_v2", unsafe { cuMemAlloc_v2(&mut ptr, len) })?;
        Ok(DeviceBuf { ptr, len })
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
    pub fn ptr(&self) -> CUdeviceptr {
        self.ptr
    }
}

impl Drop for DeviceBuf {
    fn drop(&mut self) {
        if self.ptr == 0 {
            return;
        }
        if let Err(err) = check("cuMemFree_v2", unsafe { cuMemFree_v2(self.ptr) }) {
            warn!("{err}");
        }
    }
}

#[derive(Debug)]
pub struct Stream(CUstream);

impl Stream {
    pub fn new() -> CudaResult<Self> {
        let mut stream = Stream(null_mut());
        check("cuStreamCreate", unsafe { cuStreamCreate(&mut stream.0, 0) })?;
        Ok(stream)
    }

    pub fn sync(&self) -> CudaResult<()> {
        check("cuStreamSynchronize", unsafe { cuStreamSynchronize(self.0) })
    }

    #[inline]
    pub fn raw(&self) -> CUstream {
        self.0
    }
}

impl Drop for Stream {
    fn drop(&mut self) {
        if let Err(err) = check("cuStreamDestroy_v2", unsafe { cuStreamDestroy_v2(self.0) }) {
            warn!("{err}");
        }
    }
}

/// A device-side timestamp marker.
#[derive(Debug)]
pub struct Event(CUevent);

impl Event {
    pub fn new() -> CudaResult<Self> {
        let mut event = Event(null_mut());
        check("cuEventCreate", unsafe {
            cuEventCreate(&mut event.0, CU_EVENT_DEFAULT)
        })?;
        Ok(event)
    }

    pub fn record(&self, stream: &Stream) -> CudaResult<()> {
        check("cuEventRecord", unsafe { cuEventRecord(self.0, stream.raw()) })
    }

    pub fn sync(&self) -> CudaResult<()> {
        check("cuEventSynchronize", unsafe { cuEventSynchronize(self.0) })
    }

    /// Milliseconds elapsed between two recorded events. Both events must
    /// have completed (the owning context synchronized) first.
    pub fn elapsed_ms(start: &Event, end: &Event) -> CudaResult<f32> {
        let mut ms = 0f32;
        check("cuEventElapsedTime", unsafe {
            cuEventElapsedTime(&mut ms, start.0, end.0)
        })?;
        Ok(ms)
    }
}

impl Drop for Event {
    fn drop(&mut self) {
        if let Err(err) = check("cuEventDestroy_v2", unsafe { cuEventDestroy_v2(self.0) }) {
            warn!("{err}");
        }
    }
}

pub fn memcpy_htod_async(dst: &DeviceBuf, src: &[u8], stream: &Stream) -> CudaResult<()> {
    check("cuMemcpyHtoDAsync_v2", unsafe {
        cuMemcpyHtoDAsync_v2(
            dst.ptr(),
            src.as_ptr() as *const c_void,
            src.len(),
            stream.raw(),
        )
    })
}

pub fn memcpy_dtoh_async(dst: &mut [u8], src: &DeviceBuf, stream: &Stream) -> CudaResult<()> {
    check("cuMemcpyDtoHAsync_v2", unsafe {
        cuMemcpyDtoHAsync_v2(
            dst.as_mut_ptr() as *mut c_void,
            src.ptr(),
            dst.len(),
            stream.raw(),
        )
    })
}

/// Page-locks a host buffer for the lifetime of the registration. Must be
/// dropped before the buffer it registers, so that unregistering always
/// precedes the underlying free.
#[derive(Debug)]
pub struct HostRegistration(*mut c_void);

impl HostRegistration {
    pub fn register(buf: &DmaBuf) -> CudaResult<Self> {
        let ptr = buf.as_ptr() as *mut c_void;
        check("cuMemHostRegister_v2", unsafe {
            cuMemHostRegister_v2(ptr, buf.len(), CU_MEMHOSTREGISTER_PORTABLE)
        })?;
        Ok(HostRegistration(ptr))
    }
}

impl Drop for HostRegistration {
    fn drop(&mut self) {
        if let Err(err) = check("cuMemHostUnregister", unsafe { cuMemHostUnregister(self.0) }) {
            warn!("{err}");
        }
    }
}
