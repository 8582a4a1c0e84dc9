//! GPU resource management: context, buffers, shader programs, depth
//! target.

pub mod buffer;
pub mod depth;
pub mod program;
pub mod render_context;
pub mod shaders;
