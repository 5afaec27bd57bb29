use std::sync::Arc;

use anyhow::Context as _;
use cgmath::SquareMatrix;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    camera::{Camera, CameraResources, CameraUniform, Projection},
    config::DemoConfig,
    data_structures::texture,
    pipelines::{Pipelines, terrain::mk_terrain_pipeline},
};

/// Everything a scene needs to create GPU resources while it is being
/// constructed. Device and queue are reference counted, so this is cheap to
/// hand out.
#[derive(Clone, Debug)]
pub struct InitContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub format: wgpu::TextureFormat,
}

impl From<&Context> for InitContext {
    fn from(ctx: &Context) -> Self {
        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            format: ctx.config.format,
        }
    }
}

#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub projection: Projection,
    pub pipelines: Pipelines,
    /// Human readable name of the GPU in use, shown in the overlay.
    pub adapter_name: String,
    pub clear_colour: wgpu::Color,
    pub zoom_speed: f32,
}

impl Context {
    pub async fn new(window: Arc<Window>, demo: &DemoConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();

        // The instance is a handle to our GPU
        // BackendBit::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Cannot create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No graphics adapter is compatible with this window")?;
        let adapter_name = adapter.get_info().name;
        log::info!("using adapter {}", adapter_name);

        let line_mode = adapter.features().contains(wgpu::Features::POLYGON_MODE_LINE);
        let wireframe = demo.wireframe && line_mode;
        if demo.wireframe && !wireframe {
            log::warn!("adapter {} can't draw wireframes, filling triangles instead", adapter_name);
        }

        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: if wireframe {
                    wgpu::Features::POLYGON_MODE_LINE
                } else {
                    wgpu::Features::empty()
                },
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            })
            .await
            .context("Cannot open the graphics device")?;

        log::info!("Surface");
        let surface_caps = surface.get_capabilities(&adapter);
        // The terrain shader decodes its vertex colours for an sRGB target.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("The surface reports no supported formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let camera = Camera::new(demo.eye, demo.target);
        let projection = Projection::new(
            config.width,
            config.height,
            cgmath::Deg(demo.fovy),
            demo.znear,
            demo.zfar,
        );
        let world = cgmath::Matrix4::identity();

        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj(&camera, &projection, world);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
                label: Some("camera_bind_group_layout"),
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let pipelines = Pipelines {
            terrain: mk_terrain_pipeline(
                &device,
                &config,
                &camera_bind_group_layout,
                if wireframe {
                    wgpu::PolygonMode::Line
                } else {
                    wgpu::PolygonMode::Fill
                },
                demo.cull_mode,
            ),
        };

        let camera = CameraResources {
            camera,
            world,
            uniform: camera_uniform,
            buffer: camera_buffer,
            bind_group: camera_bind_group,
            bind_group_layout: camera_bind_group_layout,
        };

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            camera,
            projection,
            pipelines,
            adapter_name,
            clear_colour: demo.clear_colour,
            zoom_speed: demo.zoom_speed,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Recompute the camera uniform and upload it.
    pub fn write_camera(&mut self) {
        self.camera.uniform.update_view_proj(
            &self.camera.camera,
            &self.projection,
            self.camera.world,
        );
        self.queue.write_buffer(
            &self.camera.buffer,
            0,
            bytemuck::cast_slice(&[self.camera.uniform]),
        );
    }
}
