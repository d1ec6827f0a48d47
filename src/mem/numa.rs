//! NUMA topology probing and interleaved allocation.
//!
//! Placement goes through the raw `mbind` syscall on an anonymous mapping
//! instead of libnuma. The interleave policy only takes effect when the
//! pages are faulted, which the parallel fill pass does before timing.

use core::ffi::c_void;
use core::ptr::{self, NonNull};
use std::io;
use std::path::Path;

use log::warn;

use crate::error::BenchError;
use crate::nodeset::NodeSet;

const MPOL_INTERLEAVE: libc::c_int = 3;
const ULONG_BITS: usize = libc::c_ulong::BITS as usize;

/// Whether the host exposes NUMA topology at all.
pub fn numa_available() -> bool {
    Path::new("/sys/devices/system/node/node0").exists()
}

/// The set of NUMA nodes currently online, from sysfs. The kernel reports
/// the list in the same `"0-3"` syntax the CLI accepts.
pub fn online_nodes() -> crate::Result<NodeSet> {
    let list = std::fs::read_to_string("/sys/devices/system/node/online")?;
    Ok(NodeSet::parse(list.trim())?)
}

fn nodemask(nodes: &NodeSet) -> Vec<libc::c_ulong> {
    let words = nodes.max().map_or(1, |max| max as usize / ULONG_BITS + 1);
    let mut mask = vec![0 as libc::c_ulong; words];
    for node in nodes.iter() {
        mask[node as usize / ULONG_BITS] |= 1 << (node as usize % ULONG_BITS);
    }
    mask
}

/// A buffer whose pages are interleaved round-robin across a set of NUMA
/// nodes. Backed by an anonymous private mapping bound with
/// `MPOL_INTERLEAVE`.
#[derive(Debug)]
pub struct NumaBuf {
    ptr: NonNull<u8>,
    len: usize,
}

unsafe impl Send for NumaBuf {}

impl NumaBuf {
    /// Allocate `len` bytes interleaved across `nodes`. Requested nodes that
    /// are not online are skipped best-effort; only an empty remainder is an
    /// error.
    pub fn interleaved(len: usize, nodes: &NodeSet) -> crate::Result<Self> {
        if len == 0 {
            return Err(BenchError::ZeroSizedAlloc.into());
        }

        let usable = nodes.intersection(&online_nodes()?);
        if usable.is_empty() {
            return Err(BenchError::NoUsableNodes.into());
        }

        let ptr = unsafe {
            libc::mmap(
                ptr::null_mut(),
                len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };
        if ptr == libc::MAP_FAILED {
            return Err(io::Error::last_os_error().into());
        }

        let mask = nodemask(&usable);
        let maxnode = mask.len() * ULONG_BITS + 1;
        let ret = unsafe {
            libc::syscall(
                libc::SYS_mbind,
                ptr,
                len,
                MPOL_INTERLEAVE,
                mask.as_ptr(),
                maxnode,
                0usize,
            )
        };
        if ret != 0 {
            let err = io::Error::last_os_error();
            unsafe { libc::munmap(ptr, len) };
            return Err(err.into());
        }

        // mmap never returns null without MAP_FAILED, but keep the invariant explicit
        let ptr = NonNull::new(ptr.cast::<u8>()).ok_or(BenchError::ZeroSizedAlloc)?;
        Ok(NumaBuf { ptr, len })
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
    pub fn as_slice(&self) -> &[u8] {
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for NumaBuf {
    fn drop(&mut self) {
        let ret = unsafe { libc::munmap(self.ptr.as_ptr().cast::<c_void>(), self.len) };
        if ret != 0 {
            warn!("munmap of {} bytes failed: {}", self.len, io::Error::last_os_error());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NumaBuf, nodemask, numa_available, online_nodes};
    use crate::error::{BenchError, ErrorKind};
    use crate::nodeset::NodeSet;

    #[test]
    fn nodemask_sets_requested_bits() {
        let mask = nodemask(&NodeSet::parse("0,2").unwrap());
        assert_eq!(mask, [0b101]);

        let mask = nodemask(&NodeSet::parse("64").unwrap());
        assert_eq!(mask.len(), 2);
        assert_eq!(mask[0], 0);
        assert_eq!(mask[1], 1);
    }

    #[test]
    fn online_nodes_contains_node_zero() {
        if !numa_available() {
            return;
        }
        assert!(online_nodes().unwrap().contains(0));
    }

    // Seccomp-sandboxed environments refuse mbind outright; treat the OS
    // error as "no NUMA here" and skip, like the availability check does.
    fn try_interleaved(len: usize, nodes: &NodeSet) -> Option<NumaBuf> {
        match NumaBuf::interleaved(len, nodes) {
            Ok(buf) => Some(buf),
            Err(err) if err.downcast_ref::<std::io::Error>().is_some() => None,
            Err(err) => panic!("interleaved allocation failed: {err}"),
        }
    }

    #[test]
    fn interleaved_alloc_is_writable() {
        if !numa_available() {
            return;
        }
        let nodes = online_nodes().unwrap();
        let Some(mut buf) = try_interleaved(1 << 20, &nodes) else {
            return;
        };
        buf.as_mut_slice().fill(0x5A);
        assert!(buf.as_slice().iter().all(|&b| b == 0x5A));
    }

    #[test]
    fn unknown_nodes_are_skipped_best_effort() {
        if !numa_available() {
            return;
        }
        // 1023 is the kernel's hard limit on node ids; no host has it online
        let nodes = NodeSet::parse("0,1023").unwrap();
        let Some(buf) = try_interleaved(4096, &nodes) else {
            return;
        };
        assert_eq!(buf.len(), 4096);
    }

    #[test]
    fn fully_offline_node_set_fails() {
        if !numa_available() {
            return;
        }
        let nodes = NodeSet::parse("1023").unwrap();
        let err = NumaBuf::interleaved(4096, &nodes).unwrap_err();
        assert_eq!(err.kind::<BenchError>(), Some(&BenchError::NoUsableNodes));
    }

    #[test]
    fn repeated_alloc_free_cycles_do_not_accumulate() {
        if !numa_available() {
            return;
        }
        let nodes = online_nodes().unwrap();
        for _ in 0..200 {
            let Some(mut buf) = try_interleaved(64 * 1024, &nodes) else {
                return;
            };
            buf.as_mut_slice()[0] = 1;
        }
    }
}
