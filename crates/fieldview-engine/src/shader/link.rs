use std::fmt;
use std::path::{Path, PathBuf};

use naga::{
    AddressSpace, Binding, GlobalVariable, ImageClass, ImageDimension, ScalarKind, TypeInner,
};

use super::error::{ShaderError, StageKind};
use super::stage::CompiledStage;

/// Bind groups available to a program.
pub const MAX_BIND_GROUPS: u32 = 4;

/// Attribute location the fullscreen quad feeds.
pub const QUAD_LOCATION: u32 = 0;

/// Scalar or vector type crossing a stage boundary.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct IoType {
    pub kind: ScalarKind,
    pub width: u8,
    pub components: u8,
}

impl IoType {
    fn from_inner(inner: &TypeInner) -> Option<Self> {
        match *inner {
            TypeInner::Scalar(s) => Some(Self {
                kind: s.kind,
                width: s.width,
                components: 1,
            }),
            TypeInner::Vector { size, scalar } => Some(Self {
                kind: scalar.kind,
                width: scalar.width,
                components: size as u8,
            }),
            _ => None,
        }
    }

    pub const VEC4_F32: Self = Self {
        kind: ScalarKind::Float,
        width: 4,
        components: 4,
    };
}

impl fmt::Display for IoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            ScalarKind::Float | ScalarKind::AbstractFloat => "f",
            ScalarKind::Sint | ScalarKind::AbstractInt => "i",
            ScalarKind::Uint => "u",
            ScalarKind::Bool => return write_components(f, self.components, "bool"),
        };
        let scalar = format!("{prefix}{}", u32::from(self.width) * 8);
        write_components(f, self.components, &scalar)
    }
}

fn write_components(f: &mut fmt::Formatter<'_>, n: u8, scalar: &str) -> fmt::Result {
    if n == 1 {
        f.write_str(scalar)
    } else {
        write!(f, "vec{n}<{scalar}>")
    }
}

/// Member of a uniform block, as laid out by the shader.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BlockMember {
    pub name: String,
    pub offset: u32,
    pub size: u32,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ResourceKind {
    UniformBlock { size: u64, members: Vec<BlockMember> },
    Texture,
    Sampler,
}

/// One `@group/@binding` resource, merged across both stages.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub name: String,
    pub group: u32,
    pub binding: u32,
    pub kind: ResourceKind,
    pub visibility: wgpu::ShaderStages,
}

impl Resource {
    pub fn block_size(&self) -> Option<u64> {
        match self.kind {
            ResourceKind::UniformBlock { size, .. } => Some(size),
            _ => None,
        }
    }

    pub fn members(&self) -> &[BlockMember] {
        match &self.kind {
            ResourceKind::UniformBlock { members, .. } => members,
            _ => &[],
        }
    }
}

/// What a pipeline needs to know about one stage.
#[derive(Debug, Clone)]
pub struct LinkedStage {
    pub kind: StageKind,
    pub path: PathBuf,
    pub source: String,
    pub entry_point: String,
}

impl LinkedStage {
    fn from_compiled(stage: &CompiledStage) -> Self {
        Self {
            kind: stage.kind(),
            path: stage.path().to_path_buf(),
            source: stage.source().to_string(),
            entry_point: stage.entry_name().to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A vertex/fragment pair whose interfaces agree, with its reflected resources.
#[derive(Debug, Clone)]
pub struct LinkedProgram {
    vertex: LinkedStage,
    fragment: LinkedStage,
    resources: Vec<Resource>,
}

impl LinkedProgram {
    pub fn vertex(&self) -> &LinkedStage {
        &self.vertex
    }

    pub fn fragment(&self) -> &LinkedStage {
        &self.fragment
    }

    /// Sorted by `(group, binding)`.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Byte size of the uniform block `name`, or `None` if there is no such block.
    pub fn uniform_block_size(&self, name: &str) -> Option<u64> {
        self.resource(name).and_then(Resource::block_size)
    }

    /// Highest bind group index in use, plus one.
    pub fn group_count(&self) -> u32 {
        self.resources.iter().map(|r| r.group + 1).max().unwrap_or(0)
    }

    /// Checks the reflected resources against what `limits` allows, so a
    /// program the device would refuse never replaces a working one.
    pub fn check_limits(&self, limits: &wgpu::Limits) -> Result<(), ShaderError> {
        let mut log = Vec::new();

        if self.group_count() > limits.max_bind_groups {
            log.push(format!(
                "{} bind groups used, the device allows {}",
                self.group_count(),
                limits.max_bind_groups
            ));
        }

        for r in &self.resources {
            if r.binding >= limits.max_bindings_per_bind_group {
                log.push(format!(
                    "resource `{}` uses @binding({}), the device allows bindings below {}",
                    r.name, r.binding, limits.max_bindings_per_bind_group
                ));
            }
            if let Some(size) = r.block_size() {
                if size > u64::from(limits.max_uniform_buffer_binding_size) {
                    log.push(format!(
                        "uniform block `{}` is {size} bytes, the device allows {}",
                        r.name, limits.max_uniform_buffer_binding_size
                    ));
                }
            }
        }

        for stage in [StageKind::Vertex, StageKind::Fragment] {
            let count = |pred: fn(&ResourceKind) -> bool| {
                self.resources
                    .iter()
                    .filter(|r| r.visibility.contains(stage.wgpu_stage()) && pred(&r.kind))
                    .count() as u32
            };
            let per_stage = [
                (
                    "uniform blocks",
                    count(|k| matches!(k, ResourceKind::UniformBlock { .. })),
                    limits.max_uniform_buffers_per_shader_stage,
                ),
                (
                    "textures",
                    count(|k| *k == ResourceKind::Texture),
                    limits.max_sampled_textures_per_shader_stage,
                ),
                (
                    "samplers",
                    count(|k| *k == ResourceKind::Sampler),
                    limits.max_samplers_per_shader_stage,
                ),
            ];
            for (what, used, max) in per_stage {
                if used > max {
                    log.push(format!("{stage} stage uses {used} {what}, the device allows {max}"));
                }
            }
        }

        if log.is_empty() {
            Ok(())
        } else {
            Err(ShaderError::Link {
                log: log.join("\n"),
            })
        }
    }
}

/// Checks that `vertex` feeds `fragment` and merges their resources.
///
/// Every problem found is reported in one `Link` log, one line each.
pub fn link(vertex: &CompiledStage, fragment: &CompiledStage) -> Result<LinkedProgram, ShaderError> {
    let mut log = Vec::new();

    check_vertex_inputs(vertex, &mut log);
    check_varyings(vertex, fragment, &mut log);
    check_fragment_outputs(fragment, &mut log);

    let mut resources = Vec::new();
    collect_resources(vertex, &mut resources, &mut log);
    collect_resources(fragment, &mut resources, &mut log);

    if !log.is_empty() {
        return Err(ShaderError::Link {
            log: log.join("\n"),
        });
    }

    resources.sort_by_key(|r| (r.group, r.binding));

    Ok(LinkedProgram {
        vertex: LinkedStage::from_compiled(vertex),
        fragment: LinkedStage::from_compiled(fragment),
        resources,
    })
}

// ── stage interface ──────────────────────────────────────────────────────

type Locations = Vec<(u32, Option<IoType>)>;

fn push_locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&Binding>,
    out: &mut Locations,
) {
    let inner = &module.types[ty].inner;

    match binding {
        Some(Binding::Location { location, .. }) => {
            out.push((*location, IoType::from_inner(inner)));
        }
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = inner {
                for m in members {
                    push_locations(module, m.ty, m.binding.as_ref(), out);
                }
            }
        }
    }
}

fn stage_inputs(stage: &CompiledStage) -> Locations {
    let mut out = Vec::new();
    for arg in &stage.entry_point().function.arguments {
        push_locations(stage.module(), arg.ty, arg.binding.as_ref(), &mut out);
    }
    out
}

fn stage_outputs(stage: &CompiledStage) -> Locations {
    let mut out = Vec::new();
    if let Some(result) = &stage.entry_point().function.result {
        push_locations(stage.module(), result.ty, result.binding.as_ref(), &mut out);
    }
    out
}

fn describe(ty: Option<IoType>) -> String {
    ty.map_or_else(|| "an unsupported type".to_string(), |t| t.to_string())
}

fn check_vertex_inputs(vertex: &CompiledStage, log: &mut Vec<String>) {
    for (location, ty) in stage_inputs(vertex) {
        if location != QUAD_LOCATION {
            log.push(format!(
                "vertex input @location({location}) is not provided; only @location({QUAD_LOCATION}) is bound"
            ));
        } else if ty != Some(IoType::VEC4_F32) {
            log.push(format!(
                "vertex input @location({location}) is {}, expected {}",
                describe(ty),
                IoType::VEC4_F32
            ));
        }
    }
}

fn check_varyings(vertex: &CompiledStage, fragment: &CompiledStage, log: &mut Vec<String>) {
    let written = stage_outputs(vertex);

    for (location, ty) in stage_inputs(fragment) {
        match written.iter().find(|(l, _)| *l == location) {
            None => log.push(format!(
                "fragment input @location({location}) is not written by the vertex stage"
            )),
            Some((_, out_ty)) if *out_ty != ty || ty.is_none() => log.push(format!(
                "@location({location}) is {} in the vertex stage but {} in the fragment stage",
                describe(*out_ty),
                describe(ty)
            )),
            Some(_) => {}
        }
    }
}

fn check_fragment_outputs(fragment: &CompiledStage, log: &mut Vec<String>) {
    let outputs = stage_outputs(fragment);

    match outputs.iter().find(|(l, _)| *l == 0) {
        None => log.push("fragment stage does not write @location(0)".to_string()),
        Some((_, Some(ty))) if ty.kind == ScalarKind::Float => {}
        Some((_, ty)) => log.push(format!(
            "fragment output @location(0) is {}, expected a float type",
            describe(*ty)
        )),
    }
}

// ── resources ────────────────────────────────────────────────────────────

fn resource_kind(module: &naga::Module, var: &GlobalVariable) -> Result<ResourceKind, String> {
    let inner = &module.types[var.ty].inner;

    match var.space {
        AddressSpace::Uniform => {
            let ctx = module.to_ctx();
            let members = match inner {
                TypeInner::Struct { members, .. } => members
                    .iter()
                    .map(|m| BlockMember {
                        name: m.name.clone().unwrap_or_default(),
                        offset: m.offset,
                        size: module.types[m.ty].inner.size(ctx),
                    })
                    .collect(),
                _ => Vec::new(),
            };

            Ok(ResourceKind::UniformBlock {
                size: u64::from(inner.size(ctx)),
                members,
            })
        }

        AddressSpace::Handle => match *inner {
            TypeInner::Image {
                dim: ImageDimension::D2,
                arrayed: false,
                class:
                    ImageClass::Sampled {
                        kind: ScalarKind::Float,
                        multi: false,
                    },
            } => Ok(ResourceKind::Texture),
            TypeInner::Sampler { comparison: false } => Ok(ResourceKind::Sampler),
            _ => Err("only texture_2d<f32> and sampler handles are supported".to_string()),
        },

        other => Err(format!("address space {other:?} is not supported")),
    }
}

fn collect_resources(stage: &CompiledStage, merged: &mut Vec<Resource>, log: &mut Vec<String>) {
    let module = stage.module();
    let kind = stage.kind();

    for (_, var) in module.global_variables.iter() {
        let Some(rb) = &var.binding else {
            continue;
        };

        let name = var
            .name
            .clone()
            .unwrap_or_else(|| format!("group{}_binding{}", rb.group, rb.binding));

        if rb.group >= MAX_BIND_GROUPS {
            log.push(format!(
                "{kind} resource `{name}` uses @group({}), at most {} groups are available",
                rb.group, MAX_BIND_GROUPS
            ));
            continue;
        }

        let res_kind = match resource_kind(module, var) {
            Ok(k) => k,
            Err(msg) => {
                log.push(format!("{kind} resource `{name}`: {msg}"));
                continue;
            }
        };

        let name_taken = merged.iter().any(|r| r.name == name);
        let slot = merged
            .iter_mut()
            .find(|r| r.group == rb.group && r.binding == rb.binding);

        match slot {
            Some(existing) if existing.name == name && existing.kind == res_kind => {
                existing.visibility |= kind.wgpu_stage();
            }
            Some(existing) => log.push(format!(
                "@group({}) @binding({}) is `{}` in one stage and `{name}` with a different type in the {kind} stage",
                rb.group, rb.binding, existing.name
            )),
            None if name_taken => log.push(format!(
                "resource `{name}` is bound at more than one @group/@binding"
            )),
            None => merged.push(Resource {
                name,
                group: rb.group,
                binding: rb.binding,
                kind: res_kind,
                visibility: kind.wgpu_stage(),
            }),
        }
    }
}
