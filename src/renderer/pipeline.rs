//! WebGPU render pipeline setup

use glam::Vec2;

use super::vertex::{Vertex, linearize};
use crate::palette::{Rgba, colors};

/// Vertices the buffer holds before its first growth
const INITIAL_VERTEX_CAPACITY: usize = 4096;

/// Map canvas pixel coordinates (+y down) to normalized device coordinates
#[inline]
pub fn canvas_to_ndc(p: Vec2, canvas: Vec2) -> Vec2 {
    Vec2::new(p.x / canvas.x * 2.0 - 1.0, 1.0 - p.y / canvas.y * 2.0)
}

/// Capacity to allocate for `needed` vertices: powers of two, never below
/// the initial size
fn grown_capacity(current: usize, needed: usize) -> usize {
    if needed <= current {
        current
    } else {
        needed.next_power_of_two().max(INITIAL_VERTEX_CAPACITY)
    }
}

fn vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("vertex_buffer"),
        size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Flat-color triangle pipeline for `format`
fn flat_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("flat_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("flat_layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("flat_pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        // Shapes are wound both ways, so no culling
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    /// Clip-space copy of the last frame, reused between frames
    staging: Vec<Vertex>,
    /// Viewport size in pixels
    pub size: (u32, u32),
    /// Logical canvas size the game draws in
    pub canvas: Vec2,
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        canvas: Vec2,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("pear-snake-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let caps = surface.get_capabilities(adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .unwrap_or(wgpu::TextureFormat::Rgba8UnormSrgb);
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        log::info!("Surface format: {:?}", format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipeline = flat_pipeline(&device, format);
        let vertex_capacity = INITIAL_VERTEX_CAPACITY;
        let vertex_buffer = vertex_buffer(&device, vertex_capacity);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_capacity,
            staging: Vec::with_capacity(vertex_capacity),
            size: (width, height),
            canvas,
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Colors are authored in sRGB; an sRGB target expects linear input
    fn output_color(&self, color: Rgba) -> Rgba {
        if self.config.format.is_srgb() {
            linearize(color)
        } else {
            color
        }
    }

    /// Convert to clip space and copy into the vertex buffer, growing it
    /// when the frame does not fit
    fn upload(&mut self, vertices: &[Vertex]) {
        self.staging.clear();
        for v in vertices {
            let p = canvas_to_ndc(Vec2::from(v.position), self.canvas);
            let color = self.output_color(v.color);
            self.staging.push(Vertex::new(p.x, p.y, color));
        }

        let capacity = grown_capacity(self.vertex_capacity, self.staging.len());
        if capacity != self.vertex_capacity {
            log::debug!("Vertex buffer grown to {} vertices", capacity);
            self.vertex_buffer = vertex_buffer(&self.device, capacity);
            self.vertex_capacity = capacity;
        }
        if !self.staging.is_empty() {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.staging));
        }
    }

    /// Upload vertices (canvas coordinates) and render
    pub fn render(&mut self, vertices: &[Vertex]) -> Result<(), wgpu::SurfaceError> {
        self.upload(vertices);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let [r, g, b, a] = self.output_color(colors::BACKGROUND).map(f64::from);
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frame_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            let count = self.staging.len() as u32;
            if count > 0 {
                let bytes = (self.staging.len() * std::mem::size_of::<Vertex>()) as u64;
                pass.set_pipeline(&self.pipeline);
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..bytes));
                pass.draw(0..count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_corners_map_to_clip_corners() {
        let canvas = Vec2::new(800.0, 600.0);
        assert_eq!(canvas_to_ndc(Vec2::ZERO, canvas), Vec2::new(-1.0, 1.0));
        assert_eq!(canvas_to_ndc(canvas, canvas), Vec2::new(1.0, -1.0));
        assert_eq!(canvas_to_ndc(canvas / 2.0, canvas), Vec2::ZERO);
    }

    #[test]
    fn test_vertex_capacity_grows_in_powers_of_two() {
        assert_eq!(grown_capacity(4096, 100), 4096);
        assert_eq!(grown_capacity(4096, 4096), 4096);
        assert_eq!(grown_capacity(4096, 4097), 8192);
        assert_eq!(grown_capacity(8192, 20_000), 32_768);
    }
}
