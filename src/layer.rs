//! The four renderable layers and their visibility state.
//!
//! Layer names, buffer keys, and shader IDs are the host-facing contract:
//! the host writes position data into the buffers named here and toggles
//! visibility by layer name.

use serde::{Deserialize, Serialize};

/// Name of the position attribute every layer's vertex shader consumes.
pub const POSITION_ATTRIBUTE: &str = "curPos";

/// Buffer key for current point positions.
pub const CUR_POINTS: &str = "curPoints";
/// Buffer key for current midpoint positions.
pub const CUR_MID_POINTS: &str = "curMidPoints";
/// Buffer key for edge endpoint positions (two vertices per edge).
pub const SPRINGS: &str = "springs";
/// Buffer key for midedge endpoint positions (two vertices per midedge).
pub const MID_SPRINGS: &str = "midSprings";

/// One of the four renderable element kinds.
///
/// Each layer owns its own shader program and reads from its own named
/// buffer. Using an enum (and a struct-per-layer program set downstream)
/// rather than string keys makes a misspelled layer name unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Graph vertices, drawn as point primitives.
    Points,
    /// Graph edges, drawn as line segments.
    Edges,
    /// Edge midpoints, drawn as point primitives.
    Midpoints,
    /// Midpoint-to-midpoint segments, drawn as line segments.
    Midedges,
}

impl Layer {
    /// All four layers.
    pub const ALL: [Self; 4] =
        [Self::Points, Self::Edges, Self::Midpoints, Self::Midedges];

    /// The host-facing layer name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Points => "points",
            Self::Edges => "edges",
            Self::Midpoints => "midpoints",
            Self::Midedges => "midedges",
        }
    }

    /// Parse a host-facing layer name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "points" => Some(Self::Points),
            "edges" => Some(Self::Edges),
            "midpoints" => Some(Self::Midpoints),
            "midedges" => Some(Self::Midedges),
            _ => None,
        }
    }

    /// Key of the buffer this layer draws from.
    #[must_use]
    pub const fn buffer_name(self) -> &'static str {
        match self {
            Self::Points => CUR_POINTS,
            Self::Edges => SPRINGS,
            Self::Midpoints => CUR_MID_POINTS,
            Self::Midedges => MID_SPRINGS,
        }
    }

    /// Logical IDs of this layer's (vertex, fragment) shader sources.
    #[must_use]
    pub const fn shader_ids(self) -> (&'static str, &'static str) {
        match self {
            Self::Points => ("point.vertex", "point.fragment"),
            Self::Edges => ("edge.vertex", "edge.fragment"),
            Self::Midpoints => ("midpoint.vertex", "midpoint.fragment"),
            Self::Midedges => ("midedge.vertex", "midedge.fragment"),
        }
    }

    /// Whether this layer draws line segments (two vertices per element)
    /// rather than points.
    #[must_use]
    pub const fn is_line_layer(self) -> bool {
        matches!(self, Self::Edges | Self::Midedges)
    }
}

/// Per-layer visibility flags.
///
/// Visibility is independent of whether a layer's buffer holds data: a
/// visible layer with a zero element count draws nothing because the draw
/// call's vertex count is zero, not because visibility is derived from
/// buffer occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Visibility {
    /// Draw the points layer.
    pub points: bool,
    /// Draw the edges layer.
    pub edges: bool,
    /// Draw the midpoints layer.
    pub midpoints: bool,
    /// Draw the midedges layer.
    pub midedges: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            points: true,
            edges: true,
            midpoints: false,
            midedges: false,
        }
    }
}

/// A partial visibility update: `None` keys leave the current flag
/// unchanged.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(default)]
pub struct VisibilityOverrides {
    /// Override for the points layer.
    pub points: Option<bool>,
    /// Override for the edges layer.
    pub edges: Option<bool>,
    /// Override for the midpoints layer.
    pub midpoints: Option<bool>,
    /// Override for the midedges layer.
    pub midedges: Option<bool>,
}

impl Visibility {
    /// The current flag for the given layer.
    #[must_use]
    pub const fn layer(self, layer: Layer) -> bool {
        match layer {
            Layer::Points => self.points,
            Layer::Edges => self.edges,
            Layer::Midpoints => self.midpoints,
            Layer::Midedges => self.midedges,
        }
    }

    /// Merge a partial update into this visibility map, returning the
    /// result. Specified keys win; unspecified keys keep their value.
    #[must_use]
    pub fn merged(self, overrides: VisibilityOverrides) -> Self {
        Self {
            points: overrides.points.unwrap_or(self.points),
            edges: overrides.edges.unwrap_or(self.edges),
            midpoints: overrides.midpoints.unwrap_or(self.midpoints),
            midedges: overrides.midedges.unwrap_or(self.midedges),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for layer in Layer::ALL {
            assert_eq!(Layer::from_name(layer.name()), Some(layer));
        }
        assert_eq!(Layer::from_name("nonexistent"), None);
    }

    #[test]
    fn buffer_names_are_canonical() {
        assert_eq!(Layer::Points.buffer_name(), "curPoints");
        assert_eq!(Layer::Edges.buffer_name(), "springs");
        assert_eq!(Layer::Midpoints.buffer_name(), "curMidPoints");
        assert_eq!(Layer::Midedges.buffer_name(), "midSprings");
    }

    #[test]
    fn default_visibility() {
        let v = Visibility::default();
        assert!(v.points);
        assert!(v.edges);
        assert!(!v.midpoints);
        assert!(!v.midedges);
    }

    #[test]
    fn merge_changes_only_specified_keys() {
        let v = Visibility::default().merged(VisibilityOverrides {
            edges: Some(false),
            ..Default::default()
        });
        assert!(!v.edges);
        assert!(v.points);
        assert!(!v.midpoints);
        assert!(!v.midedges);
    }

    #[test]
    fn merge_is_pure() {
        let before = Visibility::default();
        let _after = before.merged(VisibilityOverrides {
            midpoints: Some(true),
            ..Default::default()
        });
        assert_eq!(before, Visibility::default());
    }
}
