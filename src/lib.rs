// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! GPU-accelerated 2D point/edge graph renderer built on wgpu.
//!
//! Verge draws a graph as four layers — points, edges, midpoints, and
//! midedges — each with its own shader program and vertex buffer, under a
//! 2D orthographic camera. The host owns the window, the topology, and the
//! positions; verge owns the GPU resource lifecycle.
//!
//! # Key entry points
//!
//! - [`renderer::Renderer`] - the renderer: async creation, camera, buffers,
//!   visibility, and the per-frame draw routine
//! - [`layer::Layer`] - the four renderable layers and their buffer names
//! - [`options::RendererOptions`] - construction-time configuration
//! - [`gpu::shaders::ShaderCatalog`] - pluggable shader source lookup
//!
//! # Protocol
//!
//! Creation is a strictly ordered sequence: surface configuration → context
//! acquisition → shader compilation/linking for all four layers → initial
//! camera configuration. Only a fully initialized [`renderer::Renderer`] is
//! ever returned; any failure aborts the whole construction. After that the
//! host writes position data into the named buffers, updates the element
//! counts, toggles visibility, and calls [`renderer::Renderer::render`]
//! once per frame.

pub mod camera;
pub mod error;
pub mod gpu;
pub mod layer;
pub mod options;
pub mod renderer;

pub use error::RenderError;
pub use layer::{Layer, Visibility, VisibilityOverrides};
pub use options::RendererOptions;
pub use renderer::Renderer;
