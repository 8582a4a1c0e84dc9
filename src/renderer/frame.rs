//! Per-frame draw planning.
//!
//! The plan for a frame is computed as pure data before any GPU command is
//! recorded, so the draw sequence (ordering, vertex counts, depth tests)
//! is testable without a graphics device.

use crate::layer::{Layer, Visibility, POSITION_ATTRIBUTE};

/// Element counts the host maintains alongside the buffers it writes.
///
/// The renderer trusts these counts; it does not validate them against the
/// actual buffer sizes. A mismatch is a host-side invariant violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ElementCounts {
    /// Number of points in `curPoints`.
    pub points: u32,
    /// Number of edges in `springs` (two vertices each).
    pub edges: u32,
    /// Number of midpoints in `curMidPoints`.
    pub midpoints: u32,
    /// Number of midedges in `midSprings` (two vertices each).
    pub midedges: u32,
}

/// Depth comparison a draw call runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthTest {
    /// Less-or-equal: later draws at the same depth win. Used for points
    /// and midpoints so later draws at equal depth are not occluded.
    LessOrEqual,
    /// Strict less: draws at the same depth as existing fragments lose.
    /// Used for edges and midedges so they render behind points.
    Less,
}

impl DepthTest {
    /// The depth test the given layer draws under.
    #[must_use]
    pub const fn for_layer(layer: Layer) -> Self {
        if layer.is_line_layer() {
            Self::Less
        } else {
            Self::LessOrEqual
        }
    }

    /// The wgpu comparison function.
    #[must_use]
    pub const fn compare(self) -> wgpu::CompareFunction {
        match self {
            Self::LessOrEqual => wgpu::CompareFunction::LessEqual,
            Self::Less => wgpu::CompareFunction::Less,
        }
    }
}

/// One planned draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    /// The layer being drawn.
    pub layer: Layer,
    /// The named buffer the positions come from.
    pub buffer: &'static str,
    /// The vertex attribute the buffer binds to.
    pub attribute: &'static str,
    /// Number of vertices to draw (elements × 2 for line layers).
    pub vertex_count: u32,
    /// Depth comparison for this call.
    pub depth: DepthTest,
}

/// Plan the draw calls for one frame.
///
/// An empty graph (`counts.points < 1`) yields an empty plan — the frame
/// is a clear and nothing else. Otherwise the order is fixed: points,
/// midpoints (less-or-equal depth), then — only when the graph has edges —
/// edges and midedges (strict less, so lines land behind points). Each
/// layer is skipped when not visible; a visible layer with a zero count
/// still produces its call, which draws nothing.
#[must_use]
pub fn plan_frame(
    counts: ElementCounts,
    visible: Visibility,
) -> Vec<DrawCall> {
    let mut plan = Vec::with_capacity(4);

    if counts.points < 1 {
        return plan;
    }

    let call = |layer: Layer, vertex_count: u32| DrawCall {
        layer,
        buffer: layer.buffer_name(),
        attribute: POSITION_ATTRIBUTE,
        vertex_count,
        depth: DepthTest::for_layer(layer),
    };

    if visible.points {
        plan.push(call(Layer::Points, counts.points));
    }
    if visible.midpoints {
        plan.push(call(Layer::Midpoints, counts.midpoints));
    }
    if counts.edges > 0 {
        if visible.edges {
            plan.push(call(Layer::Edges, counts.edges * 2));
        }
        if visible.midedges {
            plan.push(call(Layer::Midedges, counts.midedges * 2));
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph_plans_no_draws() {
        let plan = plan_frame(
            ElementCounts {
                points: 0,
                edges: 5,
                midpoints: 3,
                midedges: 3,
            },
            Visibility::default(),
        );
        assert!(plan.is_empty());
    }

    #[test]
    fn points_and_edges_in_order_with_depth_switch() {
        let plan = plan_frame(
            ElementCounts {
                points: 3,
                edges: 2,
                ..Default::default()
            },
            Visibility::default(),
        );
        assert_eq!(plan.len(), 2);

        assert_eq!(plan[0].layer, Layer::Points);
        assert_eq!(plan[0].buffer, "curPoints");
        assert_eq!(plan[0].vertex_count, 3);
        assert_eq!(plan[0].depth, DepthTest::LessOrEqual);

        assert_eq!(plan[1].layer, Layer::Edges);
        assert_eq!(plan[1].buffer, "springs");
        assert_eq!(plan[1].vertex_count, 4);
        assert_eq!(plan[1].depth, DepthTest::Less);
    }

    #[test]
    fn all_four_layers_by_name() {
        let plan = plan_frame(
            ElementCounts {
                points: 10,
                edges: 9,
                midpoints: 9,
                midedges: 18,
            },
            Visibility {
                points: true,
                edges: true,
                midpoints: true,
                midedges: true,
            },
        );
        let layers: Vec<&str> =
            plan.iter().map(|c| c.layer.name()).collect();
        assert_eq!(
            layers,
            vec!["points", "midpoints", "edges", "midedges"]
        );
        let buffers: Vec<&str> = plan.iter().map(|c| c.buffer).collect();
        assert_eq!(
            buffers,
            vec!["curPoints", "curMidPoints", "springs", "midSprings"]
        );
        assert_eq!(plan[3].vertex_count, 36);
        assert!(plan.iter().all(|c| c.attribute == "curPos"));
    }

    #[test]
    fn hidden_layers_are_skipped() {
        let plan = plan_frame(
            ElementCounts {
                points: 4,
                edges: 4,
                ..Default::default()
            },
            Visibility {
                points: true,
                edges: false,
                midpoints: false,
                midedges: false,
            },
        );
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].layer, Layer::Points);
    }

    #[test]
    fn midedges_are_gated_on_edges_present() {
        let plan = plan_frame(
            ElementCounts {
                points: 4,
                edges: 0,
                midpoints: 0,
                midedges: 7,
            },
            Visibility {
                midedges: true,
                ..Visibility::default()
            },
        );
        assert!(plan.iter().all(|c| c.layer != Layer::Midedges));
    }

    #[test]
    fn visible_layer_with_zero_count_still_draws_nothing() {
        // Visibility is independent of buffer occupancy: the call is
        // planned, its vertex count is just zero.
        let plan = plan_frame(
            ElementCounts {
                points: 2,
                midpoints: 0,
                ..Default::default()
            },
            Visibility {
                midpoints: true,
                ..Visibility::default()
            },
        );
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[1].layer, Layer::Midpoints);
        assert_eq!(plan[1].vertex_count, 0);
    }
}
