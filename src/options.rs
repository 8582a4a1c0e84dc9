//! Construction-time renderer configuration.

use serde::{Deserialize, Serialize};

use crate::layer::VisibilityOverrides;

/// Options supplied to [`crate::renderer::Renderer::create`].
///
/// Every field has a default, so hosts (and config files) only spell out
/// what they change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererOptions {
    /// Scene-unit margin added on every side of the initial camera bounds
    /// so boundary elements are not clipped. Approximates half a rendered
    /// point's on-screen radius.
    pub camera_margin: f32,
    /// Components per vertex in every position buffer (2 for 2D
    /// coordinates). Fixed for the renderer's lifetime.
    pub elements_per_point: u32,
    /// Initial visibility overrides, merged over the defaults
    /// (points and edges on, midpoints and midedges off).
    pub visible: VisibilityOverrides,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            camera_margin: 0.01,
            elements_per_point: 2,
            visible: VisibilityOverrides::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = RendererOptions::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: RendererOptions = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
camera_margin = 0.5

[visible]
midpoints = true
";
        let opts: RendererOptions = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.camera_margin, 0.5);
        assert_eq!(opts.visible.midpoints, Some(true));
        assert_eq!(opts.visible.points, None);
        // Everything else should be default.
        assert_eq!(opts.elements_per_point, 2);
    }
}
