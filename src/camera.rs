//! A fixed look-at camera with a perspective projection.
//!
//! The camera always looks at its `target`. Zooming slides the eye along the
//! line of sight; it never moves past `MIN_DISTANCE` from the target.

use cgmath::{InnerSpace, Matrix4, Point3, Rad, SquareMatrix, Vector3, perspective};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const MIN_DISTANCE: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new<E: Into<Point3<f32>>, T: Into<Point3<f32>>>(eye: E, target: T) -> Self {
        Self {
            eye: eye.into(),
            target: target.into(),
            up: Vector3::unit_y(),
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn distance(&self) -> f32 {
        (self.target - self.eye).magnitude()
    }

    /// Move the eye `amount` units towards the target (negative moves away).
    pub fn zoom(&mut self, amount: f32) {
        let offset = self.eye - self.target;
        let distance = offset.magnitude();
        if distance <= f32::EPSILON {
            return;
        }
        let new_distance = (distance - amount).max(MIN_DISTANCE);
        self.eye = self.target + offset.normalize() * new_distance;
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Matrix4::identity().into(),
        }
    }

    /// `world` places the terrain in the scene before the view/projection.
    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection, world: Matrix4<f32>) {
        self.view_proj = (projection.calc_matrix() * camera.view_matrix() * world).into();
    }
}

/// The camera, its uniform and the GPU objects that carry it to the shaders.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub world: Matrix4<f32>,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}
