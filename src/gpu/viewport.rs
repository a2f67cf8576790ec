//! Pixel-space viewport shared by both pipelines.

use bytemuck::{ AnyBitPattern, NoUninit };
use wgpu::util::DeviceExt;

use super::framework::Gpu;

/// Uniform block mapping pixel coordinates to clip space. Padded out to the
/// 16 bytes uniform layout asks for.
#[derive(Clone, Copy, NoUninit, AnyBitPattern)]
#[repr(C)]
pub struct Globals {
    pub resolution: [f32; 2],
    pub _pad: [f32; 2],
}

impl Globals {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            resolution: [width as f32, height as f32],
            _pad: [0.0; 2],
        }
    }
}

/// The shared half of both pipelines: the resolution uniform, its bind group
/// and the WGSL module.
pub struct Viewport {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    bind_group_layout: wgpu::BindGroupLayout,
    shader: wgpu::ShaderModule,
}

impl Viewport {
    pub fn new(gpu: &Gpu) -> Self {
        let shader = gpu
            .device
            .create_shader_module(wgpu::include_wgsl!("shader.wgsl"));
        let globals = Globals::new(gpu.surface_config.width, gpu.surface_config.height);
        let buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("globals"),
                contents: bytemuck::bytes_of(&globals),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let bind_group_layout =
            gpu.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("globals"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    }],
                });
        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            bind_group,
            bind_group_layout,
            shader,
        }
    }

    /// Keep the clip-space mapping in step with the surface.
    pub fn resize(&self, gpu: &Gpu) {
        let globals = Globals::new(gpu.surface_config.width, gpu.surface_config.height);
        gpu.queue
            .write_buffer(&self.buffer, 0, bytemuck::bytes_of(&globals));
    }

    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(0, &self.bind_group, &[]);
    }

    /// Build one of the two pipelines over the shared layout and shader.
    pub fn pipeline(
        &self,
        gpu: &Gpu,
        label: &str,
        vertex_layout: wgpu::VertexBufferLayout<'_>,
        topology: wgpu::PrimitiveTopology,
    ) -> wgpu::RenderPipeline {
        let layout = gpu
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(label),
                bind_group_layouts: &[&self.bind_group_layout],
                push_constant_ranges: &[],
            });
        gpu.device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &self.shader,
                    entry_point: Some("vs_main"),
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    buffers: &[vertex_layout],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &self.shader,
                    entry_point: Some("fs_main"),
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    targets: &[Some(gpu.surface_config.format.into())],
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    ..wgpu::PrimitiveState::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_uniform_block_is_sixteen_bytes() {
        assert_eq!(std::mem::size_of::<Globals>(), 16);
        assert_eq!(bytemuck::bytes_of(&Globals::new(640, 480)).len(), 16);
    }
}
