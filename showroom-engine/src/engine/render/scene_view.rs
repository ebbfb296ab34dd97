use std::collections::HashMap;

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::prelude::*;
use bevy::render::camera::RenderTarget;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat, TextureUsages};
use bevy::render::view::RenderLayers;
use constants::render_settings::{
    AMBIENT_BRIGHTNESS, CLEAR_COLOR, GLOW_LAYER, LIGHT_DIRECTION, LIGHT_ILLUMINANCE, MASK_LAYER,
};

use super::compositor::{Compositor, LayerDraw, LayerSink, Pass};
use super::materials::{MaterialHandles, MaterialLibrary};
use super::post_process::{LayerTargets, PostProcessSettings};
use crate::engine::camera::CameraRig;
use crate::engine::scene::{NodeId, SceneGraph};
use crate::interaction::highlight::HoverHighlight;

/// Main showroom camera. Rays and panel projection go through it.
#[derive(Component)]
pub struct ShowroomView;

/// Base mesh entity standing for a scene node.
#[derive(Component, Debug, Clone, Copy)]
pub struct SceneNodeEntity(pub NodeId);

/// One mesh node's entity in each render layer. The glow and mask proxies
/// are children of the base entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeEntities {
    pub base: Entity,
    pub glow: Entity,
    pub mask: Entity,
}

#[derive(Resource, Debug, Default)]
pub struct LayerEntities(HashMap<NodeId, NodeEntities>);

impl LayerEntities {
    pub fn get(&self, node: NodeId) -> Option<NodeEntities> {
        self.0.get(&node).copied()
    }
}

fn extent(size: UVec2) -> Extent3d {
    Extent3d {
        width: size.x,
        height: size.y,
        depth_or_array_layers: 1,
    }
}

fn layer_image(size: UVec2) -> Image {
    let mut image = Image::new_fill(
        extent(size),
        TextureDimension::D2,
        &[0, 0, 0, 255],
        TextureFormat::Bgra8UnormSrgb,
        RenderAssetUsages::default(),
    );
    image.texture_descriptor.usage = TextureUsages::TEXTURE_BINDING
        | TextureUsages::COPY_DST
        | TextureUsages::RENDER_ATTACHMENT;
    image
}

fn node_transform(scene: &SceneGraph, id: NodeId) -> Transform {
    Transform::from_matrix(Mat4::from(scene.world_affine(id)))
}

fn visibility(visible: bool) -> Visibility {
    if visible {
        Visibility::Visible
    } else {
        Visibility::Hidden
    }
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: LIGHT_ILLUMINANCE,
            shadows_enabled: true,
            ..default()
        },
        Transform::default().looking_to(LIGHT_DIRECTION, Vec3::Y),
    ));
    commands.insert_resource(AmbientLight {
        brightness: AMBIENT_BRIGHTNESS,
        ..default()
    });
    commands.insert_resource(ClearColor(Color::linear_rgb(
        CLEAR_COLOR.x,
        CLEAR_COLOR.y,
        CLEAR_COLOR.z,
    )));
}

/// Offscreen camera following the main view, drawing one layer on black.
fn layer_camera(rig: &CameraRig, target: Handle<Image>, order: isize, layer: usize) -> impl Bundle {
    (
        Camera3d::default(),
        Camera {
            order,
            target: RenderTarget::Image(target.into()),
            clear_color: ClearColorConfig::Custom(Color::BLACK),
            ..default()
        },
        Tonemapping::None,
        Transform::IDENTITY,
        rig.camera.projection(),
        RenderLayers::layer(layer),
    )
}

fn spawn_cameras(
    commands: &mut Commands,
    rig: &CameraRig,
    targets: &LayerTargets,
    settings: PostProcessSettings,
) {
    commands
        .spawn((
            Camera3d::default(),
            rig.camera.transform(),
            rig.camera.projection(),
            settings,
            RenderLayers::layer(0),
            IsDefaultUiCamera,
            ShowroomView,
        ))
        .with_children(|view| {
            view.spawn(layer_camera(rig, targets.glow.clone(), -2, GLOW_LAYER));
            view.spawn(layer_camera(rig, targets.mask.clone(), -1, MASK_LAYER));
        });
}

pub fn setup_scene_view(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    compositor: Res<Compositor>,
    rig: Res<CameraRig>,
) {
    let targets = LayerTargets {
        glow: images.add(layer_image(compositor.glow_size())),
        mask: images.add(layer_image(compositor.mask_size())),
    };

    spawn_lighting(&mut commands);
    spawn_cameras(&mut commands, &rig, &targets, compositor.settings());
    commands.insert_resource(targets);
}

/// Give every mesh node a base entity with glow and mask proxies.
pub fn spawn_scene_entities(
    mut commands: Commands,
    scene: Res<SceneGraph>,
    library: Res<MaterialLibrary>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let handles = MaterialHandles::build(&library, &mut materials);
    let Some(mask_material) = handles.flat(library.mask()).cloned() else {
        error!("Material library lost its mask slot");
        return;
    };
    let mut entities = LayerEntities::default();

    scene.traverse(|id, node| {
        let (Some(half_extents), Some(material)) = (node.half_extents, node.material) else {
            return;
        };
        let (Some(lit), Some(flat)) = (handles.lit(material), handles.flat(material)) else {
            warn!("Scene node '{}' references an unknown material", node.name);
            return;
        };

        let mesh = meshes.add(Cuboid::from_size(half_extents * 2.0));
        let shown = visibility(scene.is_effectively_visible(id));
        let (mut glow, mut mask) = (Entity::PLACEHOLDER, Entity::PLACEHOLDER);

        let base = commands
            .spawn((
                Mesh3d(mesh.clone()),
                MeshMaterial3d(lit.clone()),
                node_transform(&scene, id),
                shown,
                RenderLayers::layer(0),
                SceneNodeEntity(id),
            ))
            .with_children(|proxies| {
                glow = proxies
                    .spawn((
                        Mesh3d(mesh.clone()),
                        MeshMaterial3d(flat.clone()),
                        Transform::IDENTITY,
                        shown,
                        RenderLayers::layer(GLOW_LAYER),
                    ))
                    .id();
                mask = proxies
                    .spawn((
                        Mesh3d(mesh),
                        MeshMaterial3d(mask_material.clone()),
                        Transform::IDENTITY,
                        Visibility::Hidden,
                        RenderLayers::layer(MASK_LAYER),
                    ))
                    .id();
            })
            .id();

        entities.0.insert(id, NodeEntities { base, glow, mask });
    });

    info!("✓ Spawned {} scene meshes", entities.0.len());
    commands.insert_resource(handles);
    commands.insert_resource(entities);
}

type LayerState = (&'static mut MeshMaterial3d<StandardMaterial>, &'static mut Visibility);

/// Writes layer draw lists onto the matching entities, touching only what
/// changed.
struct EntitySink<'a, 'w, 's> {
    entities: &'a LayerEntities,
    handles: &'a MaterialHandles,
    layers: &'a mut Query<'w, 's, LayerState>,
}

impl LayerSink for EntitySink<'_, '_, '_> {
    fn submit(&mut self, pass: Pass, draws: &[LayerDraw]) {
        for draw in draws {
            let Some(entities) = self.entities.get(draw.node) else {
                continue;
            };
            let (entity, handle) = match pass {
                Pass::Glow => (entities.glow, self.handles.flat(draw.material)),
                Pass::Base => (entities.base, self.handles.lit(draw.material)),
                Pass::Outline => (entities.mask, self.handles.flat(draw.material)),
                Pass::Combine => continue,
            };
            let Some(handle) = handle else {
                warn_once!("No material asset for {:?}", draw.material);
                continue;
            };
            let Ok((mut material, mut shown)) = self.layers.get_mut(entity) else {
                continue;
            };

            if material.0 != *handle {
                material.0 = handle.clone();
            }
            shown.set_if_neq(visibility(draw.visible));
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn composite_frame(
    mut compositor: ResMut<Compositor>,
    mut scene: ResMut<SceneGraph>,
    library: Res<MaterialLibrary>,
    handles: Res<MaterialHandles>,
    entities: Res<LayerEntities>,
    highlight: Res<HoverHighlight>,
    time: Res<Time>,
    mut layers: Query<LayerState>,
    mut views: Query<&mut PostProcessSettings, With<ShowroomView>>,
) {
    let mut sink = EntitySink {
        entities: &entities,
        handles: &handles,
        layers: &mut layers,
    };
    // The glow swap is restored before this returns, so the scene is unchanged.
    let report = compositor.render_frame(
        &mut sink,
        scene.bypass_change_detection(),
        &library,
        highlight.selection(),
        time.elapsed_secs(),
    );
    trace!(
        "Frame composited: {} swapped, {} outlined",
        report.swapped_materials,
        report.outlined_nodes
    );

    let settings = compositor.settings();
    for mut view in &mut views {
        view.set_if_neq(settings);
    }
}

/// Follow spinner and other transform edits made to the scene graph.
pub fn sync_scene_transforms(
    scene: Res<SceneGraph>,
    mut nodes: Query<(&SceneNodeEntity, &mut Transform)>,
) {
    for (node, mut transform) in &mut nodes {
        transform.set_if_neq(node_transform(&scene, node.0));
    }
}

pub fn sync_camera_rig(rig: Res<CameraRig>, mut views: Query<&mut Transform, With<ShowroomView>>) {
    for mut transform in &mut views {
        transform.set_if_neq(rig.camera.transform());
    }
}

pub fn resize_layer_targets(
    compositor: Res<Compositor>,
    targets: Res<LayerTargets>,
    mut images: ResMut<Assets<Image>>,
) {
    for (handle, size) in [
        (&targets.glow, compositor.glow_size()),
        (&targets.mask, compositor.mask_size()),
    ] {
        if images.get(handle).is_some_and(|image| image.size() != size) {
            if let Some(image) = images.get_mut(handle) {
                image.resize(extent(size));
                debug!("Layer target resized to {size}");
            }
        }
    }
}
