//! Fork-join chunked copies and the timed CPU transfer loop.
//!
//! Workers only ever touch disjoint chunks of the shared buffers; the chunk
//! partition itself is the concurrency-safety mechanism, so no locking is
//! involved anywhere.

use std::time::Instant;

use crate::partition::chunk_ranges;

/// Fill `dst` with `value` using `threads` workers on disjoint chunks.
///
/// Writing every byte forces the OS to physically back the pages (and to
/// apply any interleaving policy) before anything is timed.
pub fn fill_chunked(dst: &mut [u8], value: u8, threads: usize) {
    let ranges = chunk_ranges(dst.len(), threads);
    std::thread::scope(|s| {
        let mut rest = dst;
        for range in ranges {
            let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
            rest = tail;
            s.spawn(move || chunk.fill(value));
        }
    });
}

/// Copy `src` into `dst` using `threads` workers on disjoint chunks. The
/// scope join is the completion barrier.
pub fn copy_chunked(src: &[u8], dst: &mut [u8], threads: usize) {
    assert_eq!(src.len(), dst.len());

    let ranges = chunk_ranges(src.len(), threads);
    std::thread::scope(|s| {
        let mut rest = dst;
        for range in ranges {
            let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
            rest = tail;
            let src_chunk = &src[range];
            s.spawn(move || chunk.copy_from_slice(src_chunk));
        }
    });
}

/// Run `iterations` chunked copies, timing each one with a monotonic clock
/// around the fully-joined parallel copy. Returns one latency sample in
/// milliseconds per iteration; no warm-up iterations are discarded.
pub fn time_copies(src: &[u8], dst: &mut [u8], threads: usize, iterations: u32) -> Vec<f64> {
    let mut samples_ms = Vec::with_capacity(iterations as usize);
    for _ in 0..iterations {
        let timer = Instant::now();
        copy_chunked(src, dst, threads);
        samples_ms.push(timer.elapsed().as_secs_f64() * 1000.0);
    }
    samples_ms
}

#[cfg(test)]
mod tests {
    use super::{copy_chunked, fill_chunked, time_copies};

    #[test]
    fn fill_touches_every_byte() {
        let mut buf = vec![0u8; 4099];
        fill_chunked(&mut buf, 0xAB, 4);
        assert!(buf.iter().all(|&b| b == 0xAB));
    }

    #[test]
    fn copy_is_exact_with_remainder_chunks() {
        // 1009 is prime; no multi-thread count divides it evenly
        let src: Vec<u8> = (0..1009).map(|i| (i % 251) as u8).collect();
        for threads in [1, 2, 3, 8] {
            let mut dst = vec![0u8; src.len()];
            copy_chunked(&src, &mut dst, threads);
            assert_eq!(src, dst);
        }
    }

    #[test]
    fn copy_handles_empty_buffers() {
        copy_chunked(&[], &mut [], 4);
    }

    #[test]
    fn one_sample_per_iteration() {
        let src = vec![7u8; 8192];
        let mut dst = vec![0u8; 8192];
        let samples = time_copies(&src, &mut dst, 2, 5);
        assert_eq!(samples.len(), 5);
        assert!(samples.iter().all(|&ms| ms >= 0.0));
        assert_eq!(src, dst);
    }
}
