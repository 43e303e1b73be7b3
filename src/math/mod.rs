//! Small vector and matrix types used by the projection pipeline.

pub mod mat4;
pub mod vec2;
pub mod vec3;
pub mod vec4;
