use bevy::{
    core_pipeline::{
        core_3d::graph::{Core3d, Node3d},
        fullscreen_vertex_shader::fullscreen_shader_vertex_state,
    },
    ecs::query::QueryItem,
    prelude::*,
    render::{
        RenderApp,
        extract_component::{
            ComponentUniforms, DynamicUniformIndex, ExtractComponent, ExtractComponentPlugin,
            UniformComponentPlugin,
        },
        extract_resource::{ExtractResource, ExtractResourcePlugin},
        render_asset::RenderAssets,
        render_graph::{
            NodeRunError, RenderGraphApp, RenderGraphContext, RenderLabel, ViewNode, ViewNodeRunner,
        },
        render_resource::{
            binding_types::{sampler, texture_2d, uniform_buffer},
            *,
        },
        renderer::{RenderContext, RenderDevice},
        texture::GpuImage,
        view::ViewTarget,
    },
};
use constants::path::{GLOW_COMBINE_SHADER_PATH, OUTLINE_SHADER_PATH};

/// Adds the glow combine and outline passes after tonemapping on every view
/// carrying [`PostProcessSettings`].
pub struct ShowroomPostProcessPlugin;

impl Plugin for ShowroomPostProcessPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            ExtractComponentPlugin::<PostProcessSettings>::default(),
            UniformComponentPlugin::<PostProcessSettings>::default(),
            ExtractResourcePlugin::<LayerTargets>::default(),
        ));

        let Some(render_app) = app.get_sub_app_mut(RenderApp) else {
            return;
        };

        render_app
            .add_render_graph_node::<ViewNodeRunner<GlowCombineNode>>(Core3d, GlowCombineLabel)
            .add_render_graph_node::<ViewNodeRunner<OutlineNode>>(Core3d, OutlineLabel)
            .add_render_graph_edges(
                Core3d,
                (
                    Node3d::Tonemapping,
                    GlowCombineLabel,
                    OutlineLabel,
                    Node3d::EndMainPassPostProcessing,
                ),
            );
    }

    fn finish(&self, app: &mut App) {
        let Some(render_app) = app.get_sub_app_mut(RenderApp) else {
            return;
        };

        render_app.init_resource::<CompositePipelines>();
    }
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, RenderLabel)]
struct GlowCombineLabel;

#[derive(Debug, Hash, PartialEq, Eq, Clone, RenderLabel)]
struct OutlineLabel;

/// Per-frame parameters of the combine and outline passes. An outline colour
/// with zero alpha disables the outline.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, ExtractComponent, ShaderType)]
pub struct PostProcessSettings {
    pub bloom_threshold: f32,
    pub bloom_strength: f32,
    /// Box blur radius in glow-target texels.
    pub blur_radius: f32,
    /// Ring width in mask texels.
    pub outline_thickness: f32,
    pub outline_color: Vec4,
}

/// Offscreen images the glow and mask cameras render into.
#[derive(Resource, Clone, ExtractResource)]
pub struct LayerTargets {
    pub glow: Handle<Image>,
    pub mask: Handle<Image>,
}

#[derive(Default)]
struct GlowCombineNode;

#[derive(Default)]
struct OutlineNode;

impl ViewNode for GlowCombineNode {
    type ViewQuery = (
        &'static ViewTarget,
        &'static PostProcessSettings,
        &'static DynamicUniformIndex<PostProcessSettings>,
    );

    fn run(
        &self,
        _graph: &mut RenderGraphContext,
        render_context: &mut RenderContext,
        (view_target, _settings, settings_index): QueryItem<Self::ViewQuery>,
        world: &World,
    ) -> Result<(), NodeRunError> {
        let Some(targets) = world.get_resource::<LayerTargets>() else {
            return Ok(());
        };
        let pipelines = world.resource::<CompositePipelines>();
        pipelines.run(
            render_context,
            world,
            view_target,
            settings_index,
            pipelines.glow_combine,
            &targets.glow,
            "glow_combine_pass",
        );
        Ok(())
    }
}

impl ViewNode for OutlineNode {
    type ViewQuery = (
        &'static ViewTarget,
        &'static PostProcessSettings,
        &'static DynamicUniformIndex<PostProcessSettings>,
    );

    fn run(
        &self,
        _graph: &mut RenderGraphContext,
        render_context: &mut RenderContext,
        (view_target, settings, settings_index): QueryItem<Self::ViewQuery>,
        world: &World,
    ) -> Result<(), NodeRunError> {
        if settings.outline_color.w <= 0.0 {
            return Ok(());
        }
        let Some(targets) = world.get_resource::<LayerTargets>() else {
            return Ok(());
        };
        let pipelines = world.resource::<CompositePipelines>();
        pipelines.run(
            render_context,
            world,
            view_target,
            settings_index,
            pipelines.outline,
            &targets.mask,
            "outline_pass",
        );
        Ok(())
    }
}

/// Both passes sample the screen and one offscreen layer with a shared
/// layout, so they share one bind group layout and sampler.
#[derive(Resource)]
struct CompositePipelines {
    layout: BindGroupLayout,
    sampler: Sampler,
    glow_combine: CachedRenderPipelineId,
    outline: CachedRenderPipelineId,
}

impl CompositePipelines {
    #[allow(clippy::too_many_arguments)]
    fn run(
        &self,
        render_context: &mut RenderContext,
        world: &World,
        view_target: &ViewTarget,
        settings_index: &DynamicUniformIndex<PostProcessSettings>,
        pipeline_id: CachedRenderPipelineId,
        layer: &Handle<Image>,
        label: &'static str,
    ) {
        let pipeline_cache = world.resource::<PipelineCache>();
        let Some(pipeline) = pipeline_cache.get_render_pipeline(pipeline_id) else {
            return;
        };

        let settings_uniforms = world.resource::<ComponentUniforms<PostProcessSettings>>();
        let Some(settings_binding) = settings_uniforms.uniforms().binding() else {
            return;
        };

        // Layer images appear a frame after creation or resize.
        let Some(layer) = world.resource::<RenderAssets<GpuImage>>().get(layer) else {
            return;
        };

        let post_process = view_target.post_process_write();

        let bind_group = render_context.render_device().create_bind_group(
            label,
            &self.layout,
            &BindGroupEntries::sequential((
                post_process.source,
                &self.sampler,
                &layer.texture_view,
                settings_binding.clone(),
            )),
        );

        let mut render_pass = render_context.begin_tracked_render_pass(RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: post_process.destination,
                resolve_target: None,
                ops: Operations::default(),
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_render_pipeline(pipeline);
        render_pass.set_bind_group(0, &bind_group, &[settings_index.index()]);
        render_pass.draw(0..3, 0..1);
    }
}

fn queue_composite_pipeline(
    world: &mut World,
    layout: &BindGroupLayout,
    label: &'static str,
    shader_path: &'static str,
) -> CachedRenderPipelineId {
    let shader = world.load_asset(shader_path);

    world
        .resource_mut::<PipelineCache>()
        .queue_render_pipeline(RenderPipelineDescriptor {
            label: Some(label.into()),
            layout: vec![layout.clone()],
            vertex: fullscreen_shader_vertex_state(),
            fragment: Some(FragmentState {
                shader,
                shader_defs: vec![],
                entry_point: "fragment".into(),
                targets: vec![Some(ColorTargetState {
                    format: TextureFormat::bevy_default(),
                    blend: None,
                    write_mask: ColorWrites::ALL,
                })],
            }),
            primitive: PrimitiveState::default(),
            depth_stencil: None,
            multisample: MultisampleState::default(),
            push_constant_ranges: vec![],
            zero_initialize_workgroup_memory: false,
        })
}

impl FromWorld for CompositePipelines {
    fn from_world(world: &mut World) -> Self {
        let render_device = world.resource::<RenderDevice>();

        let layout = render_device.create_bind_group_layout(
            "showroom_composite_bind_group_layout",
            &BindGroupLayoutEntries::sequential(
                ShaderStages::FRAGMENT,
                (
                    texture_2d(TextureSampleType::Float { filterable: true }),
                    sampler(SamplerBindingType::Filtering),
                    texture_2d(TextureSampleType::Float { filterable: true }),
                    uniform_buffer::<PostProcessSettings>(true),
                ),
            ),
        );

        // Linear filtering upsamples the reduced-resolution glow layer.
        let sampler = render_device.create_sampler(&SamplerDescriptor {
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
            ..default()
        });

        let glow_combine = queue_composite_pipeline(
            world,
            &layout,
            "glow_combine_pipeline",
            GLOW_COMBINE_SHADER_PATH,
        );
        let outline =
            queue_composite_pipeline(world, &layout, "outline_pipeline", OUTLINE_SHADER_PATH);

        Self {
            layout,
            sampler,
            glow_combine,
            outline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_pack_into_two_vec4_rows() {
        // WebGL2 uniform buffers need 16-byte multiples.
        assert_eq!(PostProcessSettings::min_size().get(), 32);
    }
}
