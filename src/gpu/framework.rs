//! Window, surface and event plumbing shared by the two demos.

use std::sync::Arc;
use std::time::{ Duration, Instant };

use anyhow::Context;
use ultraviolet::Vec2;
use winit::{
    dpi::PhysicalSize,
    event::{ ElementState, Event, KeyEvent, MouseButton, StartCause, WindowEvent },
    event_loop::{ ControlFlow, EventLoop },
    keyboard::{ Key, NamedKey },
    window::{ Fullscreen, WindowBuilder },
};

use crate::config::Settings;
use crate::sim::particle::Pull;

/// Fixed redraw cadence.
const FRAME: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// The device half of the window: everything the demos draw with.
pub struct Gpu {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
}

/// Cursor state gathered from the event stream, sampled once per frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub cursor: Option<Vec2>,
    pub attract: bool,
    pub repel: bool,
}

impl FrameInput {
    /// The force the cursor exerts this frame, if any. Attraction wins when
    /// both buttons are down.
    pub fn pull(&self) -> Option<(Vec2, Pull)> {
        let cursor = self.cursor?;
        if self.attract {
            Some((cursor, Pull::Attract))
        } else if self.repel {
            Some((cursor, Pull::Repel))
        } else {
            None
        }
    }
}

/// One rendering flavor of the swarm. The framework owns the window and the
/// surface; a demo owns its swarm, pipeline and buffers.
pub trait Demo: 'static + Sized {
    fn new(gpu: &Gpu, size: PhysicalSize<u32>, settings: &Settings) -> anyhow::Result<Self>;

    /// The window grew or shrank.
    fn resize(&mut self, gpu: &Gpu, size: PhysicalSize<u32>);

    /// Re-seed the swarm (the space bar).
    fn scatter(&mut self);

    /// Advance one frame and draw it into `view`.
    fn render(&mut self, gpu: &Gpu, view: &wgpu::TextureView, input: &FrameInput);
}

/// Window size as simulation bounds.
pub fn window_bounds(size: PhysicalSize<u32>) -> Vec2 {
    Vec2::new(size.width as f32, size.height as f32)
}

/// Open a window, bring up wgpu and hand the event loop over to `D`.
pub fn run<D: Demo>(title: &str, settings: Settings) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    let mut builder = WindowBuilder::new().with_title(title);
    builder = if settings.windowed {
        builder.with_inner_size(PhysicalSize::new(1280, 720))
    } else {
        builder.with_fullscreen(Some(Fullscreen::Borderless(None)))
    };
    let window = Arc::new(builder.build(&event_loop)?);

    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(window.clone())?;
    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::default(),
        force_fallback_adapter: false,
        compatible_surface: Some(&surface),
    }))
    .context("no compatible adapter")?;
    log::info!("running on {}", adapter.get_info().name);

    let (device, queue) = pollster::block_on(adapter.request_device(
        &wgpu::DeviceDescriptor {
            label: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: wgpu::MemoryHints::default(),
        },
        None,
    ))?;

    let size = window.inner_size();
    let surface_config = surface
        .get_default_config(&adapter, size.width.max(1), size.height.max(1))
        .context("surface is not supported by the adapter")?;
    surface.configure(&device, &surface_config);

    let mut gpu = Gpu {
        device,
        queue,
        surface,
        surface_config,
    };

    // The demo is built at the first redraw, once the window has settled on
    // its real size.
    let mut demo: Option<D> = None;
    let mut input = FrameInput::default();
    let mut next_frame = Instant::now();
    // The loop can only exit, not return an error; failures land here.
    let mut failure: Option<anyhow::Error> = None;
    let fatal = &mut failure;

    event_loop.run(move |event, target| match event {
        Event::Resumed => window.request_redraw(),
        Event::NewEvents(StartCause::ResumeTimeReached { .. }) => window.request_redraw(),
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => target.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match logical_key {
                Key::Named(NamedKey::Escape) => target.exit(),
                Key::Named(NamedKey::Space) => {
                    if let Some(demo) = demo.as_mut() {
                        demo.scatter();
                    }
                }
                _ => {}
            },
            WindowEvent::CursorMoved { position, .. } => {
                input.cursor = Some(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => {
                input = FrameInput::default();
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let held = state == ElementState::Pressed;
                match button {
                    MouseButton::Left => input.attract = held,
                    MouseButton::Right => input.repel = held,
                    _ => {}
                }
            }
            WindowEvent::Resized(size) => {
                gpu.surface_config.width = size.width.max(1);
                gpu.surface_config.height = size.height.max(1);
                gpu.surface.configure(&gpu.device, &gpu.surface_config);
                if let Some(demo) = demo.as_mut() {
                    demo.resize(&gpu, size);
                }
            }
            WindowEvent::RedrawRequested => {
                if demo.is_none() {
                    match D::new(&gpu, window.inner_size(), &settings) {
                        Ok(ready) => demo = Some(ready),
                        Err(err) => {
                            *fatal = Some(err.context("failed to start the demo"));
                            target.exit();
                            return;
                        }
                    }
                }
                let Some(demo) = demo.as_mut() else { return };

                let frame = match gpu.surface.get_current_texture() {
                    Ok(frame) => frame,
                    Err(wgpu::SurfaceError::Timeout) => {
                        window.request_redraw();
                        return;
                    }
                    Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                        gpu.surface.configure(&gpu.device, &gpu.surface_config);
                        window.request_redraw();
                        return;
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        *fatal = Some(anyhow::anyhow!("out of memory for the surface"));
                        target.exit();
                        return;
                    }
                };
                let view = frame
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                demo.render(&gpu, &view, &input);
                frame.present();

                next_frame += FRAME;
                let now = Instant::now();
                if next_frame < now {
                    next_frame = now + FRAME;
                }
                target.set_control_flow(ControlFlow::WaitUntil(next_frame));
            }
            _ => {}
        },
        _ => {}
    })?;

    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
