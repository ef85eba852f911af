//! # Math
//!
//! Homogeneous vectors and row-vector 4x4 matrices used by the camera, the mesher and
//! the geometry pipeline. Integer chunk and block coordinates use `cgmath::Point3<i32>`
//! instead; these types are for the floating point transform chain only.

mod mat4;
mod vec3;

pub use mat4::Mat4;
pub use vec3::Vec3;
