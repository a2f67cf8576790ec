//! Fewer, fatter particles drawn as little filled circles.

use bytemuck::{ AnyBitPattern, NoUninit };
use ultraviolet::{ Vec2, Vec3 };
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::config::Settings;
use crate::sim::particle::Particle;
use crate::sim::swarm::Swarm;

use super::framework::{ self, Demo, FrameInput, Gpu };
use super::viewport::Viewport;

/// Population when the config does not say otherwise.
pub const DEFAULT_COUNT: u32 = 20_000;

/// Rim points per circle. Seven is visibly polygonal up close and plenty at
/// five pixels.
const RESOLUTION: usize = 7;
const RADIUS: f32 = 5.0;

const CLEAR: wgpu::Color = wgpu::Color::BLACK;

#[derive(Clone, Copy, NoUninit, AnyBitPattern)]
#[repr(C)]
pub struct BallVertex {
    pub pos: Vec2,
    pub color: Vec3,
}

/// One lap around the circle, starting on the left.
fn rim_offsets() -> [Vec2; RESOLUTION] {
    let mut offsets = [Vec2::zero(); RESOLUTION];
    for (i, offset) in offsets.iter_mut().enumerate() {
        let angle = i as f32 / RESOLUTION as f32 * std::f32::consts::TAU - std::f32::consts::PI;
        *offset = Vec2::new(angle.cos(), angle.sin()) * RADIUS;
    }
    offsets
}

/// Rebuild every circle as an unrolled triangle fan: center, rim point,
/// next rim point, seven times over.
fn build_mesh(particles: &[Particle], offsets: &[Vec2; RESOLUTION], mesh: &mut Vec<BallVertex>) {
    mesh.clear();
    for particle in particles {
        let color = particle.color;
        for i in 0..RESOLUTION {
            let a = particle.pos + offsets[i];
            let b = particle.pos + offsets[(i + 1) % RESOLUTION];
            mesh.extend_from_slice(&[
                BallVertex { pos: particle.pos, color },
                BallVertex { pos: a, color },
                BallVertex { pos: b, color },
            ]);
        }
    }
}

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x3];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<BallVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

pub struct BallsDemo {
    swarm: Swarm,
    viewport: Viewport,
    pipeline: wgpu::RenderPipeline,
    vertices: wgpu::Buffer,
    mesh: Vec<BallVertex>,
    offsets: [Vec2; RESOLUTION],
}

impl Demo for BallsDemo {
    fn new(gpu: &Gpu, size: PhysicalSize<u32>, settings: &Settings) -> anyhow::Result<Self> {
        let count = settings.count.unwrap_or(DEFAULT_COUNT) as usize;
        let swarm = Swarm::new(count, framework::window_bounds(size), settings.params);
        log::info!("simulating {count} balls");

        let viewport = Viewport::new(gpu);
        let pipeline = viewport.pipeline(
            gpu,
            "balls",
            vertex_layout(),
            wgpu::PrimitiveTopology::TriangleList,
        );

        let offsets = rim_offsets();
        let mut mesh = Vec::with_capacity(count * RESOLUTION * 3);
        build_mesh(swarm.particles(), &offsets, &mut mesh);
        let vertices = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("balls"),
                contents: bytemuck::cast_slice(&mesh),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });

        Ok(Self {
            swarm,
            viewport,
            pipeline,
            vertices,
            mesh,
            offsets,
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
            self.swarm.pull(cursor, direction);
        }
        self.swarm.step();
        build_mesh(self.swarm.particles(), &self.offsets, &mut self.mesh);
        gpu.queue
            .write_buffer(&self.vertices, 0, bytemuck::cast_slice(&self.mesh));

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("balls") });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("balls"),
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
            pass.draw(0..self.mesh.len() as u32, 0..1);
        }
        gpu.queue.submit(Some(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_ball_mesh() -> Vec<BallVertex> {
        let particle = Particle::at_rest(Vec2::new(40.0, 60.0));
        let mut mesh = Vec::new();
        build_mesh(std::slice::from_ref(&particle), &rim_offsets(), &mut mesh);
        mesh
    }

    #[test]
    fn seven_wedges_per_ball() {
        let mesh = one_ball_mesh();
        assert_eq!(mesh.len(), RESOLUTION * 3);
        for wedge in mesh.chunks(3) {
            assert_eq!(wedge[0].pos, Vec2::new(40.0, 60.0));
        }
    }

    #[test]
    fn the_rim_sits_on_the_radius() {
        let offsets = rim_offsets();
        for offset in offsets {
            assert!((offset.mag() - RADIUS).abs() < 1e-4);
        }
        // the lap starts pointing left
        assert!((offsets[0].x + RADIUS).abs() < 1e-4);
        assert!(offsets[0].y.abs() < 1e-3);
    }

    #[test]
    fn the_fan_closes_on_itself() {
        let mesh = one_ball_mesh();
        for i in 0..RESOLUTION {
            let next = (i + 1) % RESOLUTION;
            assert_eq!(mesh[i * 3 + 2].pos, mesh[next * 3 + 1].pos);
        }
    }

    #[test]
    fn every_vertex_carries_the_ball_color() {
        for vertex in one_ball_mesh() {
            assert_eq!(vertex.color, Vec3::new(0.0, 0.0, 0.5));
        }
    }
}
