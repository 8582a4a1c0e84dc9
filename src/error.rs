//! Crate-level error types.

use std::fmt;

use crate::gpu::program::ShaderError;
use crate::gpu::render_context::ContextCreationError;

/// Errors produced by the verge crate.
///
/// Every variant is fatal to the operation that produced it: a failed
/// construction returns no renderer (and leaks no resources — everything
/// built so far is dropped), and a failed frame leaves the surface
/// untouched for the host to retry or tear down.
#[derive(Debug)]
pub enum RenderError {
    /// GPU context acquisition failure during renderer construction.
    Context(ContextCreationError),
    /// Shader compile/link failure during renderer construction.
    Shader(ShaderError),
    /// Swapchain frame acquisition failure during rendering (the surface
    /// is lost, outdated, or timed out).
    Surface(wgpu::SurfaceError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Context(e) => write!(f, "context creation failed: {e}"),
            Self::Shader(e) => write!(f, "shader error: {e}"),
            Self::Surface(e) => write!(f, "surface error: {e}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Context(e) => Some(e),
            Self::Shader(e) => Some(e),
            Self::Surface(e) => Some(e),
        }
    }
}

impl From<ContextCreationError> for RenderError {
    fn from(e: ContextCreationError) -> Self {
        Self::Context(e)
    }
}

impl From<ShaderError> for RenderError {
    fn from(e: ShaderError) -> Self {
        Self::Shader(e)
    }
}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(e: wgpu::SurfaceError) -> Self {
        Self::Surface(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::program::ShaderStage;

    #[test]
    fn display_names_the_failing_stage_and_source() {
        let err = RenderError::from(ShaderError::Compile {
            stage: ShaderStage::Vertex,
            source_id: "point.vertex".into(),
            message: "unexpected token".into(),
        });
        let text = err.to_string();
        assert!(text.contains("point.vertex"));
        assert!(text.contains("vertex"));
    }

    #[test]
    fn context_error_display() {
        let err = RenderError::from(ContextCreationError::UnsupportedSurface);
        assert!(err.to_string().contains("not supported"));
    }
}
