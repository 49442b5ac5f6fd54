//! Device-resident pool of lane streams.

use crate::device::{ComputeBackend, DeviceBuffer, DeviceError, KernelKind, LaunchShape};

use super::LaneStream;

/// One [`LaneStream`] per launched lane, stored in device memory.
///
/// The pool is sized by the launch shape, not by the number of paths: lanes
/// are reused across paths by the grid-stride loop. Results are therefore
/// reproducible for a fixed `(seed, lane_count)` and change when the lane
/// count changes.
pub struct StreamPool<'b, B: ComputeBackend> {
    streams: DeviceBuffer<'b, LaneStream, B>,
    seed: u64,
}

impl<'b, B: ComputeBackend> StreamPool<'b, B> {
    /// Allocates one stream per lane of `shape` and seeds lane `i` with
    /// `(seed, i, 0)` in an [`KernelKind::InitStreams`] pass.
    ///
    /// # Errors
    ///
    /// Fails if the allocation or the initialisation launch fails.
    pub fn init(backend: &'b B, shape: &LaunchShape, seed: u64) -> Result<Self, DeviceError> {
        let mut streams = DeviceBuffer::allocate(backend, "lane_streams", shape.lane_count())?;

        backend.launch(
            KernelKind::InitStreams,
            shape,
            streams.device_slice_mut(),
            |ctx, lanes| {
                for (lane, stream) in lanes.iter_mut().enumerate() {
                    *stream = LaneStream::keyed(seed, ctx.global_lane(lane) as u64, 0);
                }
            },
        )?;

        Ok(Self { streams, seed })
    }

    /// Number of lane streams.
    #[inline]
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// Returns `true` if the pool holds no streams.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Seed shared by every lane.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub(crate) fn lanes_mut(&mut self) -> &mut [LaneStream] {
        self.streams.device_slice_mut()
    }

    /// Lane streams in global lane order.
    #[inline]
    pub fn streams(&self) -> &[LaneStream] {
        self.streams.device_slice()
    }
}
