//! simple-terrain
//!
//! A minimal heightmap terrain renderer. A raw file of `u8` elevation samples
//! is loaded into a grid, the grid is triangulated into an indexed mesh with
//! grayscale vertex colours, and a small wgpu/winit shell draws it every
//! frame together with the adapter name and frame rate.
//!
//! High-level modules
//! - `terrain`: GPU-independent grid, loader and mesh builder
//! - `camera`: look-at camera, projection and uniforms
//! - `config`: window and presentation settings
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: GPU-side data owned by the engine (depth textures)
//! - `flow`: the event loop and the `GraphicsFlow` scene trait
//! - `overlay`: adapter name and frame rate on screen
//! - `pipelines`: render pipeline definitions
//! - `render`: what scenes hand to the renderer each frame
//! - `resources`: asset paths and GPU buffer upload
//! - `scene`: the terrain demo scene
//! - `timer`: frame rate measurement

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod overlay;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;
pub mod terrain;
pub mod timer;

// Re-exports commonly used types for convenience in downstream code.
pub use winit::event::WindowEvent;
