//! A million loose points pushed through one big vertex buffer.

use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::config::Settings;
use crate::sim::particle::Particle;
use crate::sim::swarm::Swarm;

use super::framework::{ self, Demo, FrameInput, Gpu };
use super::viewport::Viewport;

/// Population when the config does not say otherwise.
pub const DEFAULT_COUNT: u32 = 1_000_000;

const CLEAR: wgpu::Color = wgpu::Color {
    r: 0.05,
    g: 0.05,
    b: 0.05,
    a: 1.0,
};

/// Particles go to the GPU as-is; the position and color prefix is the
/// vertex, the trailing velocity is dead weight the attributes skip.
fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x3];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Particle>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

pub struct PointsDemo {
    swarm: Swarm,
    viewport: Viewport,
    pipeline: wgpu::RenderPipeline,
    vertices: wgpu::Buffer,
}

impl Demo for PointsDemo {
    fn new(gpu: &Gpu, size: PhysicalSize<u32>, settings: &Settings) -> anyhow::Result<Self> {
        let count = settings.count.unwrap_or(DEFAULT_COUNT) as usize;
        let swarm = Swarm::new(count, framework::window_bounds(size), settings.params);
        log::info!("simulating {count} points");

        let viewport = Viewport::new(gpu);
        let pipeline = viewport.pipeline(
            gpu,
            "points",
            vertex_layout(),
            wgpu::PrimitiveTopology::PointList,
        );
        let vertices = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("points"),
                contents: bytemuck::cast_slice(swarm.particles()),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });

        Ok(Self {
            swarm,
            viewport,
            pipeline,
            vertices,
        })
    }

    fn resize(&mut self, gpu: &Gpu, size: PhysicalSize<u32>) {
        self.swarm.set_bounds(framework::window_bounds(size));
        self.viewport.resize(gpu);
    }

    fn scatter(&mut self) {
        self.swarm.scatter();
    }

    fn render(&mut self, gpu: &Gpu, view: &wgpu::TextureView, input: &FrameInput) {
        if let Some((cursor, direction)) = input.pull() {
            self.swarm.par_pull(cursor, direction);
        }
        self.swarm.par_step();
        gpu.queue
            .write_buffer(&self.vertices, 0, bytemuck::cast_slice(self.swarm.particles()));

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("points") });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("points"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.pipeline);
            self.viewport.bind(&mut pass);
            pass.set_vertex_buffer(0, self.vertices.slice(..));
            pass.draw(0..self.swarm.len() as u32, 0..1);
        }
        gpu.queue.submit(Some(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_vertex_layout_walks_whole_particles() {
        let layout = vertex_layout();
        assert_eq!(
            layout.array_stride,
            std::mem::size_of::<Particle>() as wgpu::BufferAddress
        );
        assert_eq!(layout.attributes[0].offset, 0);
        assert_eq!(layout.attributes[1].offset, 8);
    }
}
