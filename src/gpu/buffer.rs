//! Vertex buffer ownership and dynamic rewriting.

use wgpu::util::DeviceExt;

/// Vertex buffers start at this byte capacity even when created empty.
const MIN_CAPACITY: usize = 64;

/// One GPU-resident vertex buffer holding flat `f32` position data.
///
/// A write replaces the buffer's entire contents and may reallocate (2x
/// growth — GPU buffers cannot be resized in place), which supports
/// per-frame rewriting from a simulation. WebGL's `DYNAMIC_DRAW` usage
/// hint has no wgpu equivalent; [`wgpu::Queue::write_buffer`] is the
/// dynamic upload path.
///
/// The wrapper exclusively owns the GPU resource. [`GraphBuffer::delete`]
/// consumes it, so use-after-delete and double-delete are unrepresentable.
pub struct GraphBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
    len: usize,
    label: String,
}

impl GraphBuffer {
    const USAGE: wgpu::BufferUsages = wgpu::BufferUsages::VERTEX
        .union(wgpu::BufferUsages::COPY_DST);

    /// An empty buffer with a minimal allocation.
    #[must_use]
    pub fn new(device: &wgpu::Device, label: &str) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: MIN_CAPACITY as u64,
            usage: Self::USAGE,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            capacity: MIN_CAPACITY,
            len: 0,
            label: label.to_owned(),
        }
    }

    /// A buffer initialized from existing position data.
    #[must_use]
    pub fn new_with_data(
        device: &wgpu::Device,
        label: &str,
        data: &[f32],
    ) -> Self {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let capacity = bytes.len().max(MIN_CAPACITY);
        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytes,
                usage: Self::USAGE,
            });
        Self {
            buffer,
            capacity,
            len: bytes.len(),
            label: label.to_owned(),
        }
    }

    /// Replace the buffer's full contents, growing if necessary.
    ///
    /// Returns `true` if the buffer was reallocated.
    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[f32],
    ) -> bool {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let needed = bytes.len();

        let reallocated = if needed > self.capacity {
            let new_capacity = (needed * 2).max(self.capacity + 1024);
            self.buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&self.label),
                size: new_capacity as u64,
                usage: Self::USAGE,
                mapped_at_creation: false,
            });
            self.capacity = new_capacity;
            true
        } else {
            false
        };

        if needed > 0 {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
        self.len = needed;

        reallocated
    }

    /// Release the GPU resource, consuming the wrapper.
    pub fn delete(self) {
        self.buffer.destroy();
    }

    /// The underlying wgpu buffer.
    #[must_use]
    pub const fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Current data length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no data.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated capacity in bytes.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
