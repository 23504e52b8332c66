use wgpu::{BindGroup, CommandEncoder, Device, RenderPipeline, TextureFormat, TextureView};

use crate::gpu::GridBuffers;

/// Paints the cell-state buffer as one coloured square per cell.
///
/// The bind group layout is taken from the shader, and the bind group is made
/// once: the buffers keep their size for the whole run.
pub struct TissueRenderer {
    pipeline: RenderPipeline,
    bind_group: BindGroup,
}

impl TissueRenderer {
    pub fn new(device: &Device, format: TextureFormat, buffers: &GridBuffers) -> Self {
        let shader = device.create_shader_module(wgpu::include_wgsl!("../shaders/render.wgsl"));

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tissue"),
            layout: None,
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(format.into())],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tissue-cells"),
            layout: &pipeline.get_bind_group_layout(0),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffers.cells_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: buffers.render_params_buffer.as_entire_binding(),
                },
            ],
        });

        Self {
            pipeline,
            bind_group,
        }
    }

    pub fn draw(&self, encoder: &mut CommandEncoder, view: &TextureView) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tissue"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations::default(),
            })],
            ..Default::default()
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        // One triangle covers the viewport
        pass.draw(0..3, 0..1);
    }
}
