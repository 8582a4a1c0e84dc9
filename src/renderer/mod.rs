//! The renderer: construction, camera, buffers, visibility, and the
//! per-frame draw routine.

pub mod frame;

use rustc_hash::FxHashMap;

use crate::camera::{Camera2d, CameraUniform};
use crate::error::RenderError;
use crate::gpu::buffer::GraphBuffer;
use crate::gpu::depth::DepthTarget;
use crate::gpu::program::LayerProgram;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shaders::{EmbeddedShaders, ShaderCatalog};
use crate::layer::{Layer, Visibility, VisibilityOverrides};
use crate::options::RendererOptions;
use crate::renderer::frame::{plan_frame, ElementCounts};

/// The four layer programs, one field per layer.
///
/// A struct rather than a string-keyed map: every access is spelled as a
/// field, so a misspelled layer name is a compile error, not a silent
/// `undefined`.
struct LayerPrograms {
    points: LayerProgram,
    edges: LayerProgram,
    midpoints: LayerProgram,
    midedges: LayerProgram,
}

impl LayerPrograms {
    fn get(&self, layer: Layer) -> &LayerProgram {
        match layer {
            Layer::Points => &self.points,
            Layer::Edges => &self.edges,
            Layer::Midpoints => &self.midpoints,
            Layer::Midedges => &self.midedges,
        }
    }

    fn iter(&self) -> impl Iterator<Item = &LayerProgram> {
        Layer::ALL.iter().map(|&layer| self.get(layer))
    }
}

/// Real-time 2D point/edge graph renderer. One instance per surface.
///
/// Construction ([`Renderer::create`]) walks a strictly ordered sequence —
/// surface configuration, context acquisition, program compilation and
/// linking for all four layers, initial camera configuration — and returns
/// only a fully initialized renderer; any failure aborts the whole attempt
/// with nothing leaked. Afterwards the host drives it serially: write
/// buffers, update counts, toggle visibility, call [`Renderer::render`]
/// once per frame.
pub struct Renderer {
    context: RenderContext,
    programs: LayerPrograms,
    buffers: FxHashMap<String, GraphBuffer>,
    visible: Visibility,
    camera: Camera2d,
    depth: DepthTarget,
    elements_per_point: u32,
    counts: ElementCounts,
}

impl Renderer {
    /// Create a renderer on the given window with the built-in shader set.
    ///
    /// `dimensions` is the surface size in logical pixels (the host keeps
    /// it consistent with the displayed size); it also seeds the initial
    /// camera bounds, extended by `options.camera_margin` on every side so
    /// boundary elements are not clipped.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Context`] if the graphics context cannot be
    /// acquired and [`RenderError::Shader`] if any of the four layer
    /// programs fails to compile or link. Either way no renderer (and no
    /// dangling GPU resource) is left behind.
    pub async fn create(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        dimensions: (u32, u32),
        options: RendererOptions,
    ) -> Result<Self, RenderError> {
        Self::create_with_catalog(window, dimensions, options, &EmbeddedShaders)
            .await
    }

    /// [`Renderer::create`] with a caller-supplied shader catalog.
    ///
    /// # Errors
    ///
    /// Same contract as [`Renderer::create`].
    pub async fn create_with_catalog(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        dimensions: (u32, u32),
        options: RendererOptions,
        catalog: &dyn ShaderCatalog,
    ) -> Result<Self, RenderError> {
        // Context acquisition is the only await point; everything after it
        // is synchronous and ordered.
        let context = RenderContext::new(window, dimensions).await?;
        let depth =
            DepthTarget::new(&context.device, dimensions.0, dimensions.1);

        let visible = Visibility::default().merged(options.visible);

        // All four programs must link; the first failure drops everything
        // built so far and aborts the construction.
        let build = |layer| {
            LayerProgram::new(
                &context,
                catalog,
                layer,
                options.elements_per_point,
            )
        };
        let programs = LayerPrograms {
            points: build(Layer::Points)?,
            edges: build(Layer::Edges)?,
            midpoints: build(Layer::Midpoints)?,
            midedges: build(Layer::Midedges)?,
        };
        log::info!("all four layer programs linked");

        let renderer = Self {
            context,
            programs,
            buffers: FxHashMap::default(),
            visible,
            camera: Camera2d::with_margin(
                dimensions.0 as f32,
                dimensions.1 as f32,
                options.camera_margin,
            ),
            depth,
            elements_per_point: options.elements_per_point,
            counts: ElementCounts::default(),
        };
        renderer.write_camera_uniforms();

        Ok(renderer)
    }

    /// Configure the camera over the given scene-space rectangle.
    ///
    /// Bounds must be finite with `left != right` and `bottom != top`.
    /// The transform maps the rectangle to NDC with the vertical flip for
    /// top-left-origin scenes and is written into all four programs.
    /// Fully replaces any prior configuration.
    pub fn set_camera(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
    ) {
        debug_assert!(left != right && bottom != top);
        self.camera = Camera2d {
            left,
            right,
            bottom,
            top,
        };
        self.write_camera_uniforms();
    }

    fn write_camera_uniforms(&self) {
        let uniform = CameraUniform::from_matrix(&self.camera.matrix());
        for program in self.programs.iter() {
            program.write_camera(&self.context.queue, &uniform);
        }
    }

    /// The currently configured camera bounds.
    #[must_use]
    pub const fn camera(&self) -> Camera2d {
        self.camera
    }

    /// Reconfigure the surface for a new window size (ignores zero sizes)
    /// and rebuild the depth target to match.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
        self.depth = DepthTarget::new(
            &self.context.device,
            self.context.config.width,
            self.context.config.height,
        );
    }

    /// Allocate one vertex buffer, immediately populated when
    /// `initial_data` is supplied.
    #[must_use]
    pub fn create_buffer(
        &self,
        label: &str,
        initial_data: Option<&[f32]>,
    ) -> GraphBuffer {
        initial_data.map_or_else(
            || GraphBuffer::new(&self.context.device, label),
            |data| {
                GraphBuffer::new_with_data(&self.context.device, label, data)
            },
        )
    }

    /// Register a buffer under a layer buffer name (one of
    /// [`crate::layer::CUR_POINTS`], [`crate::layer::CUR_MID_POINTS`],
    /// [`crate::layer::SPRINGS`], [`crate::layer::MID_SPRINGS`]).
    /// Returns the previously registered buffer, if any, so the host can
    /// delete it.
    pub fn insert_buffer(
        &mut self,
        name: &str,
        buffer: GraphBuffer,
    ) -> Option<GraphBuffer> {
        self.buffers.insert(name.to_owned(), buffer)
    }

    /// Remove and return a registered buffer (e.g. to delete it).
    pub fn take_buffer(&mut self, name: &str) -> Option<GraphBuffer> {
        self.buffers.remove(name)
    }

    /// Replace the full contents of a registered buffer.
    ///
    /// Returns `false` when no buffer is registered under `name`.
    pub fn write_buffer(&mut self, name: &str, data: &[f32]) -> bool {
        let Some(buffer) = self.buffers.get_mut(name) else {
            log::warn!("write to unregistered buffer '{name}'");
            return false;
        };
        let _ = buffer.write(&self.context.device, &self.context.queue, data);
        true
    }

    /// Merge visibility overrides into the current map. Pure state change;
    /// takes effect on the next render.
    pub fn set_visible(&mut self, overrides: VisibilityOverrides) {
        self.visible = self.visible.merged(overrides);
    }

    /// The stored visibility flag for a layer name; `false` for unknown
    /// names.
    #[must_use]
    pub fn is_visible(&self, name: &str) -> bool {
        Layer::from_name(name)
            .is_some_and(|layer| self.visible.layer(layer))
    }

    /// Set the element counts the next frame draws with. The counts are
    /// trusted; keeping them consistent with the buffers is the host's
    /// invariant.
    pub fn set_counts(&mut self, counts: ElementCounts) {
        self.counts = counts;
    }

    /// The element counts the next frame draws with.
    #[must_use]
    pub const fn counts(&self) -> ElementCounts {
        self.counts
    }

    /// Components per vertex in every position buffer.
    #[must_use]
    pub const fn elements_per_point(&self) -> u32 {
        self.elements_per_point
    }

    /// Draw one frame: clear, then execute the planned layer draws, then
    /// block until the GPU has fully rasterized the frame before
    /// presenting it.
    ///
    /// An empty graph (zero points) renders as a clear screen. A planned
    /// layer whose buffer the host never registered is logged and skipped
    /// — that count/buffer mismatch is a host-side invariant violation,
    /// not something the renderer can repair mid-frame.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Surface`] when the swapchain frame cannot be
    /// acquired (surface lost, outdated, or timed out).
    pub fn render(&mut self) -> Result<(), RenderError> {
        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.context.create_encoder();

        let plan = plan_frame(self.counts, self.visible);

        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Layer Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(
                                    wgpu::Color::TRANSPARENT,
                                ),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &self.depth.view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    ..Default::default()
                });

            for call in &plan {
                let Some(buffer) = self.buffers.get(call.buffer) else {
                    log::warn!(
                        "layer '{}' is planned but buffer '{}' was never \
                         registered",
                        call.layer.name(),
                        call.buffer
                    );
                    continue;
                };
                let program = self.programs.get(call.layer);
                program.activate(&mut pass);
                if program.bind_vertex_attrib(
                    &mut pass,
                    buffer,
                    call.attribute,
                ) {
                    pass.draw(0..call.vertex_count, 0..1);
                }
            }
        }

        self.context.submit(encoder);
        self.context.wait_idle();
        frame.present();

        Ok(())
    }
}
