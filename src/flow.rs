//! Flow control and application event loop.
//!
//! A "flow" is a scene that reacts to input, updates itself and says what
//! should be drawn each frame. The driver in this module owns the window, the
//! GPU [`Context`] and the flows, and calls into them in a fixed order.
//!
//! # User-facing types
//!
//! - [`GraphicsFlow<S>`] is the capability set a scene implements
//! - [`Out`] lets a hook reconfigure the context or ask the loop to stop
//! - [`run`] builds everything and blocks until the window closes
//!
//! # Lifecycle Flow
//!
//! 1. The window and context are created, then every flow constructor runs
//! 2. `on_init` is called once per flow
//! 3. Each window event goes to `on_window_events` on every flow
//! 4. On redraw: frame timer and overlay are updated, `on_update` runs, the
//!    camera uniform is uploaded and every flow's `on_render` is drawn
//! 5. `on_shutdown` is called once when the loop exits
//!
//! Everything happens on the thread that called [`run`].

use std::{fmt::Debug, iter, pin::Pin, sync::Arc};

use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    config::DemoConfig,
    context::{Context, InitContext},
    data_structures::texture::Texture,
    overlay::DiagnosticOverlay,
    render::Flat,
    timer::FrameTimer,
};

/// Pixels of touchpad scrolling that count as one mouse-wheel line.
const PIXELS_PER_LINE: f32 = 20.0;

/// Output of every lifecycle hook.
///
/// `Out::Configure` can be used to modify the Context during runtime, for
/// instance to move the camera or change the clear colour.
///
/// `Out::Exit` closes the window and ends the event loop after the current
/// event.
///
/// `Empty` is the default output used when nothing needs to happen.
#[derive(Default)]
pub enum Out {
    Configure(Box<dyn FnOnce(&mut Context)>),
    Exit,
    #[default]
    Empty,
}

/// Trait for implementing a renderable scene.
///
/// # Lifecycle
///
/// 1. `on_init()` is called once after the flow is created; configure the
///    context (camera, clear colour, world transform) here
/// 2. `on_window_events()` is called for each winit window event
/// 3. `on_update()` is called every frame
/// 4. `on_render()` is called every frame and says how to draw `self`
/// 5. `on_shutdown()` is called once before the event loop exits
pub trait GraphicsFlow<S> {
    /// Initialize the flow and configure the context.
    fn on_init(&mut self, ctx: &mut Context, state: &mut S) -> Out;

    /// Update state every frame with the elapsed time `dt`.
    fn on_update(&mut self, ctx: &Context, state: &mut S, dt: Duration) -> Out;

    /// Handle window events (keyboard, mouse, resizing, etc.).
    fn on_window_events(&mut self, ctx: &Context, state: &mut S, event: &WindowEvent) -> Out;

    /// Return what to draw this frame.
    fn on_render(&self) -> crate::render::Render<'_>;

    /// Release whatever the flow holds before the context goes away.
    fn on_shutdown(&mut self, ctx: &Context, state: &mut S);
}

impl<S> Debug for dyn GraphicsFlow<S> + 'static {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GraphicsFlow")
    }
}

/// Type alias for a flow constructor (factory function).
///
/// A flow constructor takes an [`InitContext`] and returns a boxed
/// [`GraphicsFlow`]. Constructors run after the GPU context exists, so they can
/// create their buffers straight away.
pub type FlowConstructor<S> = Box<
    dyn FnOnce(InitContext) -> Pin<Box<dyn Future<Output = anyhow::Result<Box<dyn GraphicsFlow<S>>>>>>,
>;

/// Application state bundle: GPU context, app state, diagnostics and surface
/// status.
pub struct AppState<State: 'static> {
    pub(crate) ctx: Context,
    state: State,
    timer: FrameTimer,
    overlay: DiagnosticOverlay,
    is_surface_configured: bool,
}

impl<State: 'static + Default> AppState<State> {
    async fn new(window: Arc<Window>, demo: &DemoConfig) -> anyhow::Result<Self> {
        let ctx = Context::new(window, demo).await?;
        let overlay = DiagnosticOverlay::new(&ctx, &demo.title);
        Ok(Self {
            ctx,
            state: State::default(),
            timer: FrameTimer::new(),
            overlay,
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.projection.resize(width, height);
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
            self.overlay.resize(width, height);
        }
    }

    fn render(&mut self, graphics_flows: &[Box<dyn GraphicsFlow<State>>]) -> Result<(), wgpu::SurfaceError> {
        // invoke main render loop
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        if let Err(e) = self.overlay.prepare(&self.ctx) {
            log::error!("Unable to lay out the overlay: {}", e);
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            let mut terrain: Vec<Flat> = Vec::new();
            graphics_flows
                .iter()
                .for_each(|flow| flow.on_render().collect(&mut terrain));

            render_pass.set_pipeline(&self.ctx.pipelines.terrain);
            render_pass.set_bind_group(0, &self.ctx.camera.bind_group, &[]);
            for flat in terrain {
                if flat.amount == 0 {
                    log::warn!("you attempted to render a terrain without triangles");
                    continue;
                }
                render_pass.set_vertex_buffer(0, flat.vertex.slice(..));
                render_pass.set_index_buffer(flat.index.slice(..), wgpu::IndexFormat::Uint16);
                render_pass.draw_indexed(0..flat.amount as u32, 0, 0..1);
            }

            if let Err(e) = self.overlay.draw(&mut render_pass) {
                log::error!("Unable to draw the overlay: {}", e);
            }
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub struct App<State: 'static> {
    async_runtime: tokio::runtime::Runtime,
    demo: DemoConfig,
    state: Option<AppState<State>>,
    // This will hold the fully initialized flows once they are ready.
    graphics_flows: Vec<Box<dyn GraphicsFlow<State>>>,
    // We use Option to `take()` the constructors after use.
    constructors: Option<Vec<FlowConstructor<State>>>,
    last_time: Instant,
    // First fatal error; handed back to the caller of `run`.
    error: Option<anyhow::Error>,
}

impl<State: 'static> App<State> {
    fn new(demo: DemoConfig, constructors: Vec<FlowConstructor<State>>) -> anyhow::Result<Self> {
        // Only used to wait on wgpu's adapter/device futures; never spawns.
        let async_runtime = tokio::runtime::Builder::new_current_thread().build()?;
        Ok(Self {
            async_runtime,
            demo,
            state: None,
            graphics_flows: Vec::new(),
            constructors: Some(constructors),
            last_time: Instant::now(),
            error: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.error.get_or_insert(error);
        event_loop.exit();
    }
}

impl<State: 'static + Default> ApplicationHandler for App<State> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let Some(constructors) = self.constructors.take() else {
            return;
        };

        let window_attributes = Window::default_attributes()
            .with_title(self.demo.title.clone())
            .with_inner_size(PhysicalSize::new(self.demo.width, self.demo.height));
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, anyhow::Error::new(e).context("Cannot create the window"));
                return;
            }
        };

        let demo = self.demo.clone();
        let init_future = async move {
            let app_state = AppState::<State>::new(window, &demo).await?;
            let flow_futures: Vec<_> = constructors
                .into_iter()
                // Device and Queue are reference counted, so this only clones handles
                .map(|constructor| constructor((&app_state.ctx).into()))
                .collect();
            let flows = futures::future::try_join_all(flow_futures).await?;
            anyhow::Ok((app_state, flows))
        };

        match self.async_runtime.block_on(init_future) {
            Ok((mut app_state, flows)) => {
                let size = app_state.ctx.window.inner_size();
                app_state.resize(size.width, size.height);
                self.graphics_flows = flows;
                self.graphics_flows.iter_mut().for_each(|flow| {
                    let out = flow.on_init(&mut app_state.ctx, &mut app_state.state);
                    handle_flow_output(event_loop, &mut app_state.ctx, out);
                });
                app_state.ctx.write_camera();
                app_state.ctx.window.request_redraw();
                self.state = Some(app_state);
                self.last_time = Instant::now();
            }
            Err(e) => self.fail(event_loop, e.context("App initialization failed")),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        self.graphics_flows.iter_mut().for_each(|f| {
            let out = f.on_window_events(&state.ctx, &mut state.state, &event);
            handle_flow_output(event_loop, &mut state.ctx, out);
        });

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
                };
                let amount = lines * state.ctx.zoom_speed;
                state.ctx.camera.camera.zoom(amount);
            }
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                if state.timer.tick(dt) {
                    let frame_rate = state.timer.frame_rate_text();
                    state.overlay.set_frame_rate(&state.ctx, frame_rate);
                }

                self.graphics_flows.iter_mut().for_each(|f| {
                    let out = f.on_update(&state.ctx, &mut state.state, dt);
                    handle_flow_output(event_loop, &mut state.ctx, out);
                });
                state.ctx.write_camera();

                match state.render(&self.graphics_flows) {
                    Ok(_) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            log::info!("shutting down {} flow(s)", self.graphics_flows.len());
            self.graphics_flows
                .iter_mut()
                .for_each(|f| f.on_shutdown(&state.ctx, &mut state.state));
        }
    }
}

fn handle_flow_output(event_loop: &ActiveEventLoop, ctx: &mut Context, out: Out) {
    match out {
        Out::Configure(f) => f(ctx),
        Out::Exit => event_loop.exit(),
        Out::Empty => (),
    }
}

/// Open the window, build the flows and run until the window closes.
///
/// Initialization failures (no adapter, no device, a failing constructor)
/// are logged, close the event loop and come back as the `Err` of this call.
pub fn run<State: 'static + Default>(
    demo: DemoConfig,
    constructors: Vec<FlowConstructor<State>>,
) -> anyhow::Result<()> {
    let logger = env_logger::Env::default().default_filter_or("info");
    if let Err(e) = env_logger::Builder::from_env(logger).try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let event_loop = EventLoop::new()?;
    let mut app: App<State> = App::new(demo, constructors)?;

    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
