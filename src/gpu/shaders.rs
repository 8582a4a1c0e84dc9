//! Shader source lookup by logical ID.
//!
//! Shader retrieval is an external collaborator to the renderer: programs
//! are built from logical IDs (`"point.vertex"`, `"edge.fragment"`, …) and
//! a catalog resolves each ID to WGSL text. [`EmbeddedShaders`] is the
//! built-in catalog; hosts can substitute their own to restyle layers.

/// Resolves a logical shader ID to WGSL source text.
pub trait ShaderCatalog {
    /// The source for `id`, or `None` if the catalog does not carry it.
    fn source(&self, id: &str) -> Option<&str>;
}

/// The default catalog, serving the crate's built-in layer shaders
/// compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedShaders;

impl ShaderCatalog for EmbeddedShaders {
    fn source(&self, id: &str) -> Option<&str> {
        match id {
            "point.vertex" => {
                Some(include_str!("../../assets/shaders/point.vertex.wgsl"))
            }
            "point.fragment" => {
                Some(include_str!("../../assets/shaders/point.fragment.wgsl"))
            }
            "edge.vertex" => {
                Some(include_str!("../../assets/shaders/edge.vertex.wgsl"))
            }
            "edge.fragment" => {
                Some(include_str!("../../assets/shaders/edge.fragment.wgsl"))
            }
            "midpoint.vertex" => Some(include_str!(
                "../../assets/shaders/midpoint.vertex.wgsl"
            )),
            "midpoint.fragment" => Some(include_str!(
                "../../assets/shaders/midpoint.fragment.wgsl"
            )),
            "midedge.vertex" => Some(include_str!(
                "../../assets/shaders/midedge.vertex.wgsl"
            )),
            "midedge.fragment" => Some(include_str!(
                "../../assets/shaders/midedge.fragment.wgsl"
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::Layer;

    #[test]
    fn every_layer_id_resolves() {
        let catalog = EmbeddedShaders;
        for layer in Layer::ALL {
            let (vs, fs) = layer.shader_ids();
            assert!(catalog.source(vs).is_some(), "missing {vs}");
            assert!(catalog.source(fs).is_some(), "missing {fs}");
        }
    }

    #[test]
    fn unknown_id_is_none() {
        assert!(EmbeddedShaders.source("point.geometry").is_none());
    }
}
