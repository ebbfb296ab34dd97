//! Small two-zone showroom shared by unit tests.

use bevy::prelude::*;

use crate::engine::camera::{CameraRig, ShowroomCamera};
use crate::engine::render::materials::{Material, MaterialLibrary};
use crate::engine::scene::{
    PanelPose, SceneGraph, SceneNode, Waypoint, ZoneDefinition, ZoneRegistry,
};

pub struct ShowroomFixture {
    pub scene: SceneGraph,
    pub zones: ZoneRegistry,
    pub materials: MaterialLibrary,
    pub camera: ShowroomCamera,
}

impl ShowroomFixture {
    pub fn rig(&self) -> CameraRig {
        CameraRig {
            camera: self.camera.clone(),
            ..default()
        }
    }

    /// Ray from the camera through the origin of the node called `name`.
    pub fn ray_to(&self, name: &str) -> Ray3d {
        let id = self.scene.lookup_by_name(name).unwrap();
        let point = Vec3::from(self.scene.world_affine(id).translation);
        Ray3d::new(self.camera.position, Dir3::new(point - self.camera.position).unwrap())
    }
}

/// Straight up from the camera, above every node.
pub fn sky_ray(fixture: &ShowroomFixture) -> Ray3d {
    Ray3d::new(fixture.camera.position, Dir3::Y)
}

pub fn waypoint() -> Waypoint {
    Waypoint {
        position: Vec3::new(0.0, 10.0, -20.0),
        target: Vec3::ZERO,
    }
}

pub fn signup_panel() -> PanelPose {
    PanelPose {
        translation: Vec3::new(12.291, 7.409, -2.149),
        rotation_y: 189.29_f32.to_radians(),
        scale: 0.01676,
    }
}

/// Floor plus two billboard zones, "drop" and "signup", each with a teaser
/// board, a detail group and a close cross facing the home camera. Only
/// "signup" carries an overlay panel.
pub fn showroom_fixture() -> ShowroomFixture {
    let mut materials = MaterialLibrary::new();
    let floor_material = materials.add("floor", Material::opaque(Vec3::splat(0.3)));
    let neon = materials.add(
        "neon",
        Material::emissive(Vec3::new(1.0, 0.2, 0.8), Vec3::new(1.0, 0.2, 0.8)),
    );
    let panel = materials.add("panel", Material::opaque(Vec3::splat(0.9)));

    let mut scene = SceneGraph::new();
    let root = scene.add_node(SceneNode::new("showroom"), None).unwrap();
    scene
        .add_node(
            SceneNode::new("floor").with_geometry(Vec3::new(20.0, 0.1, 20.0), floor_material),
            Some(root),
        )
        .unwrap();

    for (name, translation) in [
        ("drop", Vec3::new(-6.0, 6.0, -15.0)),
        ("signup", Vec3::new(8.0, 6.0, -15.0)),
    ] {
        let group = scene
            .add_node(
                SceneNode::new(name).with_transform(Transform::from_translation(translation)),
                Some(root),
            )
            .unwrap();
        let teaser = scene
            .add_node(
                SceneNode::new(format!("{name}_teaser"))
                    .with_geometry(Vec3::new(2.0, 1.0, 0.1), neon),
                Some(group),
            )
            .unwrap();
        scene.set_glow(teaser, true);
        let detail = scene
            .add_node(SceneNode::new(format!("{name}_detail")), Some(group))
            .unwrap();
        scene
            .add_node(
                SceneNode::new(format!("{name}_detail_text"))
                    .with_geometry(Vec3::new(2.0, 1.5, 0.1), panel),
                Some(detail),
            )
            .unwrap();
        scene
            .add_node(
                SceneNode::new(format!("{name}_cross"))
                    .with_transform(Transform::from_xyz(2.5, 1.5, -0.2))
                    .with_geometry(Vec3::new(0.3, 0.3, 0.1), panel),
                Some(group),
            )
            .unwrap();
    }

    let members = |name: &str| {
        let mut definition = ZoneDefinition::new(name, waypoint());
        definition.teaser = vec![format!("{name}_teaser")];
        definition.detail = vec![format!("{name}_detail")];
        definition.dismiss = vec![format!("{name}_cross")];
        definition
    };

    let mut drop = members("drop");
    drop.waypoint = Waypoint {
        position: Vec3::new(-5.5, 8.8, -18.5),
        target: Vec3::new(1.0, 2.0, 3.0),
    };
    let mut signup = members("signup");
    signup.waypoint = Waypoint {
        position: Vec3::new(14.011, 8.785, -12.503),
        target: Vec3::new(12.291, 7.409, -2.149),
    };
    signup.panel = Some(signup_panel());
    signup.menu_label = Some("Sign up".into());

    let zones = ZoneRegistry::build(&[drop, signup], &scene).unwrap();
    zones.reset_all(&mut scene);

    let mut camera = ShowroomCamera::default();
    camera.resize(160, 90);

    ShowroomFixture {
        scene,
        zones,
        materials,
        camera,
    }
}
