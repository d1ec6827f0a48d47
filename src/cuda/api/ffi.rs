#![allow(non_camel_case_types)]

use core::ffi::{c_int, c_uint, c_ulonglong, c_void};

/// Raw driver API status code. Decoded into [`CudaErrorKind`] by
/// [`check`]; only success is special-cased here.
///
/// [`CudaErrorKind`]: super::error::CudaErrorKind
/// [`check`]: super::check
pub type CUresult = c_uint;
pub const CUDA_SUCCESS: CUresult = 0;

pub type CUdevice = c_int;
pub type CUdeviceptr = c_ulonglong;

pub enum CUctx_st {}
pub type CUcontext = *mut CUctx_st;

pub enum CUstream_st {}
pub type CUstream = *mut CUstream_st;

pub enum CUevent_st {}
pub type CUevent = *mut CUevent_st;

pub const CU_EVENT_DEFAULT: c_uint = 0;
pub const CU_MEMHOSTREGISTER_PORTABLE: c_uint = 0x1;

#[link(name = "cuda")]
unsafe extern "C" {
    pub fn cuInit(flags: c_uint) -> CUresult;
    pub fn cuDeviceGetCount(count: *mut c_int) -> CUresult;
    pub fn cuDeviceGet(device: *mut CUdevice, ordinal: c_int) -> CUresult;

    pub fn cuCtxCreate_v2(pctx: *mut CUcontext, flags: c_uint, dev: CUdevice) -> CUresult;
    pub fn cuCtxDestroy_v2(ctx: CUcontext) -> CUresult;
    pub fn cuCtxSetCurrent(ctx: CUcontext) -> CUresult;
    pub fn cuCtxSynchronize() -> CUresult;

    pub fn cuMemAlloc_v2(dptr: *mut CUdeviceptr, bytesize: usize) -> CUresult;
    pub fn cuMemFree_v2(dptr: CUdeviceptr) -> CUresult;
    pub fn cuMemcpyHtoDAsync_v2(
        dst_device: CUdeviceptr,
        src_host: *const c_void,
        byte_count: usize,
        stream: CUstream,
    ) -> CUresult;
    pub fn cuMemcpyDtoHAsync_v2(
        dst_host: *mut c_void,
        src_device: CUdeviceptr,
        byte_count: usize,
        stream: CUstream,
    ) -> CUresult;
    pub fn cuMemHostRegister_v2(p: *mut c_void, bytesize: usize, flags: c_uint) -> CUresult;
    pub fn cuMemHostUnregister(p: *mut c_void) -> CUresult;

    pub fn cuStreamCreate(phstream: *mut CUstream, flags: c_uint) -> CUresult;
    pub fn cuStreamDestroy_v2(hstream: CUstream) -> CUresult;
    pub fn cuStreamSynchronize(hstream: CUstream) -> CUresult;

    pub fn cuEventCreate(phevent: *mut CUevent, flags: c_uint) -> CUresult;
    pub fn cuEventDestroy_v2(hevent: CUevent) -> CUresult;
    pub fn cuEventRecord(hevent: CUevent, hstream: CUstream) -> CUresult;
    pub fn cuEventSynchronize(hevent: CUevent) -> CUresult;
    pub fn cuEventElapsedTime(ms: *mut f32, start: CUevent, end: CUevent) -> CUresult;
}
