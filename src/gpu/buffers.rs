use wgpu::{Buffer, BufferUsages, Device, Queue};

use crate::config::{COLOR_SCALE_MAX, COLOR_SCALE_MIN};
use crate::simulation::{CellGrid, CellState};

/// Storage buffer holding the latest cell-state snapshot
pub struct GridBuffers {
    pub cells_buffer: Buffer,
    /// Uniform buffer for render parameters
    pub render_params_buffer: Buffer,
    pub size: u32,
}

/// Render parameters passed to the fragment shader (16 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RenderParams {
    pub grid_width: u32,
    pub grid_height: u32,
    /// States at or below this map to the cool end of the scale
    pub value_min: f32,
    /// States at or above this map to the warm end of the scale
    pub value_max: f32,
}

impl GridBuffers {
    /// Create buffers sized for `grid` and upload it
    pub fn new(device: &Device, queue: &Queue, grid: &CellGrid) -> Self {
        let size = grid.size() as u32;
        let buffer_size = (grid.as_slice().len() * std::mem::size_of::<CellState>()) as u64;

        let cells_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cell-state-buffer"),
            size: buffer_size,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let render_params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("render-params-buffer"),
            size: std::mem::size_of::<RenderParams>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let params = RenderParams {
            grid_width: size,
            grid_height: size,
            value_min: COLOR_SCALE_MIN,
            value_max: COLOR_SCALE_MAX,
        };
        queue.write_buffer(&render_params_buffer, 0, bytemuck::bytes_of(&params));

        let buffers = Self {
            cells_buffer,
            render_params_buffer,
            size,
        };
        buffers.upload(queue, grid);
        buffers
    }

    /// Replace the snapshot on the GPU
    pub fn upload(&self, queue: &Queue, grid: &CellGrid) {
        debug_assert_eq!(grid.size() as u32, self.size, "grid size changed");
        queue.write_buffer(&self.cells_buffer, 0, bytemuck::cast_slice(grid.as_slice()));
    }
}
