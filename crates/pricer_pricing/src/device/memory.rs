//! Device memory ownership.
//!
//! [`DeviceBuffer`] ties a backend [`Allocation`] to the storage it
//! describes and releases it on drop, so every exit path of a run
//! (including early error returns) gives its memory back to the device.

use std::marker::PhantomData;
use std::mem::size_of;

use tracing::{debug, warn};

use super::{Allocation, ComputeBackend, DeviceError, DeviceStatus};

/// Typed region of device global memory.
pub struct DeviceBuffer<'b, T, B: ComputeBackend> {
    backend: &'b B,
    allocation: Allocation,
    data: Vec<T>,
}

impl<'b, T: Clone + Default, B: ComputeBackend> DeviceBuffer<'b, T, B> {
    /// Allocates `len` default-initialised elements on `backend`.
    ///
    /// # Errors
    ///
    /// Returns the backend's error when the device cannot satisfy the request.
    pub fn allocate(backend: &'b B, label: &'static str, len: usize) -> Result<Self, DeviceError> {
        let bytes = len.checked_mul(size_of::<T>()).ok_or_else(|| {
            DeviceError::new(
                "allocate",
                DeviceStatus::OutOfMemory {
                    requested: usize::MAX,
                    available: 0,
                },
            )
        })?;

        let allocation = backend.allocate(label, bytes)?;
        debug!(buffer = label, bytes, len, "Allocated device buffer");

        Ok(Self {
            backend,
            allocation,
            data: vec![T::default(); len],
        })
    }
}

impl<'b, T, B: ComputeBackend> DeviceBuffer<'b, T, B> {
    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Label the buffer was allocated under.
    #[inline]
    pub fn label(&self) -> &'static str {
        self.allocation.label()
    }

    /// Size in bytes.
    #[inline]
    pub fn bytes(&self) -> usize {
        self.allocation.bytes()
    }

    #[inline]
    pub(crate) fn device_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub(crate) fn device_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<'b, T: Copy + Default, B: ComputeBackend> DeviceBuffer<'b, T, B> {
    /// Copies `src` into the buffer.
    pub fn upload(&mut self, src: &[T]) -> Result<(), DeviceError> {
        self.backend.copy_to_device(&mut self.data, src)
    }

    /// Copies the buffer back to a fresh host vector.
    pub fn download(&self) -> Result<Vec<T>, DeviceError> {
        let mut host = vec![T::default(); self.data.len()];
        self.backend.copy_to_host(&mut host, &self.data)?;
        Ok(host)
    }
}

impl<'b, T, B: ComputeBackend> Drop for DeviceBuffer<'b, T, B> {
    fn drop(&mut self) {
        match self.backend.release(&self.allocation) {
            Ok(()) => debug!(buffer = self.allocation.label(), "Released device buffer"),
            Err(err) => warn!(
                buffer = self.allocation.label(),
                error = %err,
                "Failed to release device buffer"
            ),
        }
    }
}

/// Shared write access to a slice whose indices are partitioned between lanes.
///
/// Kernels that scatter results with a grid-stride loop write each index from
/// exactly one lane; this wrapper lets all groups hold the slice at once.
pub(crate) struct DisjointWriter<'a, T> {
    ptr: *mut T,
    len: usize,
    _marker: PhantomData<&'a mut [T]>,
}

// Safety: the writer is only handed out for the duration of one launch, and
// callers of `write` guarantee each index is written by a single lane.
unsafe impl<T: Send> Send for DisjointWriter<'_, T> {}
// Safety: see above; there are no reads through the writer.
unsafe impl<T: Send> Sync for DisjointWriter<'_, T> {}

impl<'a, T: Copy> DisjointWriter<'a, T> {
    pub(crate) fn new(slice: &'a mut [T]) -> Self {
        Self {
            ptr: slice.as_mut_ptr(),
            len: slice.len(),
            _marker: PhantomData,
        }
    }

    /// Writes `value` at `index`.
    ///
    /// # Safety
    ///
    /// No other thread may write `index` while the writer is alive.
    #[inline]
    pub(crate) unsafe fn write(&self, index: usize, value: T) {
        assert!(index < self.len, "index {index} out of bounds for {}", self.len);
        // Safety: index is in bounds and exclusively owned by the caller.
        unsafe { self.ptr.add(index).write(value) }
    }
}
