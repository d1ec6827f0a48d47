//! Host-to-GPU transfer benchmarking across multiple devices.
//!
//! A single controlling thread issues asynchronous copies on one stream per
//! device, bracketed by device-side events, then synchronizes every device
//! before reading back the elapsed times. Each device contributes one
//! latency sample per iteration.

pub mod api;

use log::debug;

use crate::Direction;
use crate::mem::DmaBuf;
use api::{Context, DeviceBuf, Event, HostRegistration, Stream};

/// Per-device transfer state: context, device buffer, stream, start/end
/// events and the matching host buffer.
///
/// Field order is load-bearing twice over: the pin registration precedes
/// the host buffer so unregistering happens before the free, and the
/// context comes last so every other handle is destroyed while its context
/// still exists.
struct Lane {
    _registration: Option<HostRegistration>,
    host: DmaBuf,
    device_buf: DeviceBuf,
    stream: Stream,
    start: Event,
    end: Event,
    ctx: Context,
}

impl Lane {
    fn new(ordinal: i32, bytes: usize, pin: bool) -> crate::Result<Self> {
        let device = api::device(ordinal)?;
        let ctx = Context::new(&device)?;

        let device_buf = DeviceBuf::alloc(bytes)?;
        let stream = Stream::new()?;
        let start = Event::new()?;
        let end = Event::new()?;

        let host = DmaBuf::zeroed(bytes)?;
        let registration = if pin {
            Some(HostRegistration::register(&host)?)
        } else {
            None
        };

        debug!("device {ordinal}: lane ready, {bytes} bytes, pinned: {pin}");
        Ok(Lane {
            _registration: registration,
            host,
            device_buf,
            stream,
            start,
            end,
            ctx,
        })
    }
}

impl Drop for Lane {
    fn drop(&mut self) {
        // Child handles are destroyed by the field drops that follow; they
        // need this lane's context current on the thread.
        let _ = self.ctx.set_current();
    }
}

/// Time `iterations` asynchronous copies in `direction` on every one of the
/// first `ngpus` devices. Returns one latency sample in milliseconds per
/// device per iteration; no warm-up iterations are discarded.
///
/// `bytes` must already be padded to the DMA alignment; the padded size is
/// the allocation size and the copy extent.
pub fn run_direction(
    ngpus: u32,
    bytes: usize,
    iterations: u32,
    pin: bool,
    direction: Direction,
) -> crate::Result<Vec<f64>> {
    let mut lanes = Vec::with_capacity(ngpus as usize);
    for ordinal in 0..ngpus {
        lanes.push(Lane::new(ordinal as i32, bytes, pin)?);
    }

    let mut samples_ms = Vec::with_capacity(lanes.len() * iterations as usize);
    for _ in 0..iterations {
        for lane in &mut lanes {
            lane.ctx.set_current()?;
            lane.start.record(&lane.stream)?;
            match direction {
                Direction::HostToDevice => {
                    api::memcpy_htod_async(&lane.device_buf, lane.host.as_slice(), &lane.stream)?
                }
                Direction::DeviceToHost => {
                    api::memcpy_dtoh_async(lane.host.as_mut_slice(), &lane.device_buf, &lane.stream)?
                }
            }
            lane.end.record(&lane.stream)?;
        }

        for lane in &lanes {
            lane.ctx.synchronize()?;
        }

        for lane in &lanes {
            samples_ms.push(Event::elapsed_ms(&lane.start, &lane.end)? as f64);
        }
    }

    Ok(samples_ms)
}

#[cfg(test)]
mod tests {
    use super::{api, run_direction};
    use crate::Direction;
    use crate::mem::{DMA_ALIGNMENT, align_up};

    #[test]
    #[ignore = "requires a CUDA device"]
    fn one_sample_per_device_per_iteration() {
        api::init().unwrap();
        let bytes = align_up(1 << 20, DMA_ALIGNMENT);
        let samples = run_direction(1, bytes, 4, false, Direction::HostToDevice).unwrap();
        assert_eq!(samples.len(), 4);
        assert!(samples.iter().all(|&ms| ms >= 0.0));
    }

    #[test]
    #[ignore = "requires a CUDA device"]
    fn pinned_round_trip() {
        api::init().unwrap();
        let bytes = align_up(1 << 20, DMA_ALIGNMENT);
        for direction in [Direction::HostToDevice, Direction::DeviceToHost] {
            let samples = run_direction(1, bytes, 2, true, direction).unwrap();
            assert_eq!(samples.len(), 2);
        }
    }
}
