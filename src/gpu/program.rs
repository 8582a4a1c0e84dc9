//! Per-layer shader programs.
//!
//! A [`LayerProgram`] is the linked vertex+fragment pair for one layer,
//! compiled into a render pipeline with the layer's topology and depth test
//! baked in, plus the camera uniform buffer and an attribute-name →
//! location map reflected from the vertex entry point.

use std::borrow::Cow;
use std::fmt;

use bytemuck::Zeroable;
use rustc_hash::FxHashMap;
use wgpu::util::DeviceExt;

use crate::camera::CameraUniform;
use crate::gpu::buffer::GraphBuffer;
use crate::gpu::depth::DEPTH_FORMAT;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shaders::ShaderCatalog;
use crate::layer::{Layer, POSITION_ATTRIBUTE};
use crate::renderer::frame::DepthTest;

/// The two shader stages of a layer program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex stage.
    Vertex,
    /// Fragment stage.
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => write!(f, "vertex"),
            Self::Fragment => write!(f, "fragment"),
        }
    }
}

/// Errors producing a layer program. Any of them fails the whole renderer
/// construction: the program set is all-or-nothing.
#[derive(Debug)]
pub enum ShaderError {
    /// The shader catalog does not carry the requested logical ID.
    MissingSource {
        /// The logical shader ID that failed to resolve.
        id: String,
    },
    /// One stage failed to parse or validate on its own.
    Compile {
        /// The stage that failed.
        stage: ShaderStage,
        /// The logical ID of the failing source.
        source_id: String,
        /// The compiler diagnostic.
        message: String,
    },
    /// Both stages compiled but the combined module did not validate.
    Link {
        /// The validator diagnostic.
        message: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSource { id } => {
                write!(f, "no shader source for id '{id}'")
            }
            Self::Compile {
                stage,
                source_id,
                message,
            } => write!(
                f,
                "{stage} shader '{source_id}' failed to compile: {message}"
            ),
            Self::Link { message } => {
                write!(f, "program failed to link: {message}")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// Blend state shared by every layer pipeline: `(srcAlpha, 1-srcAlpha)`
/// for color, `(1, 1)` for alpha, both combined additively. The WebGL
/// original set this once as global state; wgpu bakes it per pipeline.
const LAYER_BLEND: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

/// Parse and validate one stage's WGSL on the CPU.
///
/// Validating the lone module after a successful parse mirrors the
/// original's second check that a compiled shader object is still valid.
fn compile_stage(
    stage: ShaderStage,
    source_id: &str,
    source: &str,
) -> Result<naga::Module, ShaderError> {
    let compile_err = |message: String| ShaderError::Compile {
        stage,
        source_id: source_id.to_owned(),
        message,
    };

    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| compile_err(e.emit_to_string(source)))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    let _ = validator
        .validate(&module)
        .map_err(|e| compile_err(e.emit_to_string(source)))?;

    Ok(module)
}

/// Validate the concatenated vertex+fragment sources as one module.
///
/// This is the link-status check the original WebGL code skipped after
/// `linkProgram`; it is checked explicitly here.
fn link_stages(
    vertex_source: &str,
    fragment_source: &str,
) -> Result<String, ShaderError> {
    let combined = format!("{vertex_source}\n{fragment_source}");
    let link_err = |message: String| ShaderError::Link { message };

    let module = naga::front::wgsl::parse_str(&combined)
        .map_err(|e| link_err(e.emit_to_string(&combined)))?;
    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    let _ = validator
        .validate(&module)
        .map_err(|e| link_err(e.emit_to_string(&combined)))?;

    Ok(combined)
}

/// Attribute name → location map from the module's vertex entry point.
fn vertex_attributes(module: &naga::Module) -> FxHashMap<String, u32> {
    let mut attributes = FxHashMap::default();
    for entry_point in &module.entry_points {
        if entry_point.stage != naga::ShaderStage::Vertex {
            continue;
        }
        for arg in &entry_point.function.arguments {
            if let (
                Some(name),
                Some(naga::Binding::Location { location, .. }),
            ) = (arg.name.as_ref(), arg.binding.as_ref())
            {
                let _ = attributes.insert(name.clone(), *location);
            }
        }
    }
    attributes
}

/// Vertex format for a tightly-packed float attribute with the given
/// component count.
fn position_format(elements_per_point: u32) -> wgpu::VertexFormat {
    match elements_per_point {
        1 => wgpu::VertexFormat::Float32,
        3 => wgpu::VertexFormat::Float32x3,
        4 => wgpu::VertexFormat::Float32x4,
        n => {
            if n != 2 {
                log::warn!(
                    "unsupported elements_per_point {n}, treating as 2"
                );
            }
            wgpu::VertexFormat::Float32x2
        }
    }
}

/// One linked vertex+fragment program and its layer pipeline.
///
/// Exclusively owned by the renderer that created it; never shared. A
/// `LayerProgram` only exists after both stages compiled and the combined
/// module linked — construction returns `Err` otherwise.
pub struct LayerProgram {
    layer: Layer,
    pipeline: wgpu::RenderPipeline,
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    attributes: FxHashMap<String, u32>,
}

impl LayerProgram {
    /// Retrieve, compile, link, and reflect this layer's shader pair, then
    /// build its render pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError`] if either logical ID is missing from the
    /// catalog, either stage fails to compile, or the pair fails to link.
    pub fn new(
        context: &RenderContext,
        catalog: &dyn ShaderCatalog,
        layer: Layer,
        elements_per_point: u32,
    ) -> Result<Self, ShaderError> {
        let (vertex_id, fragment_id) = layer.shader_ids();
        let vertex_source = catalog
            .source(vertex_id)
            .ok_or_else(|| ShaderError::MissingSource {
                id: vertex_id.to_owned(),
            })?
            .to_owned();
        let fragment_source = catalog
            .source(fragment_id)
            .ok_or_else(|| ShaderError::MissingSource {
                id: fragment_id.to_owned(),
            })?
            .to_owned();

        let vertex_module =
            compile_stage(ShaderStage::Vertex, vertex_id, &vertex_source)?;
        let _ = compile_stage(
            ShaderStage::Fragment,
            fragment_id,
            &fragment_source,
        )?;
        let attributes = vertex_attributes(&vertex_module);

        let combined = link_stages(&vertex_source, &fragment_source)?;
        let shader = context.device.create_shader_module(
            wgpu::ShaderModuleDescriptor {
                label: Some(layer.name()),
                source: wgpu::ShaderSource::Wgsl(Cow::Owned(combined)),
            },
        );

        let uniform = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Camera Uniform", layer.name())),
                contents: bytemuck::bytes_of(&CameraUniform::zeroed()),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );

        let bind_group_layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some(&format!("{} Bind Group Layout", layer.name())),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            },
        );
        let bind_group =
            context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("{} Bind Group", layer.name())),
                    layout: &bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform.as_entire_binding(),
                    }],
                });

        let pipeline = Self::create_pipeline(
            context,
            layer,
            &shader,
            &bind_group_layout,
            &attributes,
            elements_per_point,
        );

        Ok(Self {
            layer,
            pipeline,
            uniform,
            bind_group,
            attributes,
        })
    }

    fn create_pipeline(
        context: &RenderContext,
        layer: Layer,
        shader: &wgpu::ShaderModule,
        bind_group_layout: &wgpu::BindGroupLayout,
        attributes: &FxHashMap<String, u32>,
        elements_per_point: u32,
    ) -> wgpu::RenderPipeline {
        let pipeline_layout = context.device.create_pipeline_layout(
            &wgpu::PipelineLayoutDescriptor {
                label: Some(&format!("{} Pipeline Layout", layer.name())),
                bind_group_layouts: &[bind_group_layout],
                push_constant_ranges: &[],
            },
        );

        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: u64::from(elements_per_point) * 4,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                format: position_format(elements_per_point),
                offset: 0,
                shader_location: attributes
                    .get(POSITION_ATTRIBUTE)
                    .copied()
                    .unwrap_or(0),
            }],
        };

        let topology = if layer.is_line_layer() {
            // Line width is fixed at 1 device unit under wgpu.
            wgpu::PrimitiveTopology::LineList
        } else {
            wgpu::PrimitiveTopology::PointList
        };

        context.device.create_render_pipeline(
            &wgpu::RenderPipelineDescriptor {
                label: Some(&format!("{} Pipeline", layer.name())),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    buffers: &[vertex_layout],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: context.format(),
                        blend: Some(LAYER_BLEND),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: DepthTest::for_layer(layer).compare(),
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            },
        )
    }

    /// The layer this program draws.
    #[must_use]
    pub const fn layer(&self) -> Layer {
        self.layer
    }

    /// Make this program the active one for subsequent draw calls.
    pub fn activate(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
    }

    /// Bind `buffer` as the data source for the named vertex attribute.
    ///
    /// Returns `false` — without raising an error — when the attribute
    /// name does not exist in the program, matching the silent −1-location
    /// behavior of the underlying API family this design inherits.
    pub fn bind_vertex_attrib(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        buffer: &GraphBuffer,
        attribute: &str,
    ) -> bool {
        if self.attributes.contains_key(attribute) {
            pass.set_vertex_buffer(0, buffer.buffer().slice(..));
            true
        } else {
            log::debug!(
                "attribute '{attribute}' not found in {} program",
                self.layer.name()
            );
            false
        }
    }

    /// Write the camera transform into this program's uniform buffer.
    pub fn write_camera(
        &self,
        queue: &wgpu::Queue,
        uniform: &CameraUniform,
    ) {
        queue.write_buffer(&self.uniform, 0, bytemuck::bytes_of(uniform));
    }

    /// The reflected location of a vertex attribute, if it exists.
    #[must_use]
    pub fn attribute_location(&self, name: &str) -> Option<u32> {
        self.attributes.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::shaders::EmbeddedShaders;

    fn source(id: &str) -> String {
        EmbeddedShaders
            .source(id)
            .unwrap_or_else(|| panic!("missing embedded source {id}"))
            .to_owned()
    }

    #[test]
    fn every_layer_pair_compiles_and_links() {
        for layer in Layer::ALL {
            let (vs_id, fs_id) = layer.shader_ids();
            let vs = source(vs_id);
            let fs = source(fs_id);
            let _ = compile_stage(ShaderStage::Vertex, vs_id, &vs).unwrap();
            let _ =
                compile_stage(ShaderStage::Fragment, fs_id, &fs).unwrap();
            let _ = link_stages(&vs, &fs).unwrap();
        }
    }

    #[test]
    fn every_vertex_stage_exposes_cur_pos_at_location_zero() {
        for layer in Layer::ALL {
            let (vs_id, _) = layer.shader_ids();
            let module =
                compile_stage(ShaderStage::Vertex, vs_id, &source(vs_id))
                    .unwrap();
            let attributes = vertex_attributes(&module);
            assert_eq!(
                attributes.get(POSITION_ATTRIBUTE).copied(),
                Some(0),
                "{vs_id} should expose {POSITION_ATTRIBUTE} at location 0"
            );
            assert!(attributes.get("bogus").is_none());
        }
    }

    #[test]
    fn compile_error_names_stage_and_source() {
        let err = compile_stage(
            ShaderStage::Vertex,
            "point.vertex",
            "this is not wgsl",
        )
        .unwrap_err();
        match err {
            ShaderError::Compile {
                stage, source_id, ..
            } => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert_eq!(source_id, "point.vertex");
            }
            other => panic!("expected compile error, got {other:?}"),
        }
    }

    #[test]
    fn conflicting_declarations_fail_to_link() {
        // Two vertex sources declare the same Camera struct and entry
        // point; each compiles alone but the pair cannot link.
        let vs = source("point.vertex");
        let err = link_stages(&vs, &vs).unwrap_err();
        assert!(matches!(err, ShaderError::Link { .. }));
    }

    #[test]
    fn position_format_tracks_component_count() {
        assert_eq!(position_format(2), wgpu::VertexFormat::Float32x2);
        assert_eq!(position_format(3), wgpu::VertexFormat::Float32x3);
    }
}
