use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use constants::navigation::CLICK_SLOP_PX;

use super::highlight::HoverHighlight;
use super::hit_test::pick;
use super::navigation::{NavigationController, Stage, StageParams, resize_viewport};
use crate::engine::camera::CameraRig;
use crate::engine::render::compositor::Compositor;
use crate::engine::render::scene_view::ShowroomView;

/// Cursor position and where the left button went down, if it went down
/// over the scene rather than over UI.
#[derive(Resource, Debug, Default)]
pub struct PointerState {
    cursor: Option<Vec2>,
    press: Option<Vec2>,
}

/// World ray under a viewport position of the showroom camera.
fn cursor_ray(
    view: &Query<(&Camera, &GlobalTransform), With<ShowroomView>>,
    cursor: Vec2,
) -> Option<Ray3d> {
    let (camera, camera_transform) = view.single().ok()?;
    camera.viewport_to_world(camera_transform, cursor).ok()
}

/// Hover on every move, click on a left release that stayed within the
/// click slop of its press.
pub fn handle_pointer_input(
    mut cursor_moved: EventReader<CursorMoved>,
    view: Query<(&Camera, &GlobalTransform), With<ShowroomView>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    ui: Query<&Interaction>,
    mut pointer: ResMut<PointerState>,
    mut highlight: ResMut<HoverHighlight>,
    mut navigation: ResMut<NavigationController>,
    mut stage: StageParams,
) {
    for moved in cursor_moved.read() {
        pointer.cursor = Some(moved.position);
        let hit = cursor_ray(&view, moved.position).and_then(|ray| pick(&stage.scene, ray));
        highlight.update(hit, &stage.scene, &stage.zones);
    }

    let over_ui = ui.iter().any(|interaction| *interaction != Interaction::None);
    if mouse_button.just_pressed(MouseButton::Left) {
        pointer.press = if over_ui { None } else { pointer.cursor };
    }

    if mouse_button.just_released(MouseButton::Left) {
        let press = pointer.press.take();
        if let (Some(press), Some(cursor)) = (press, pointer.cursor) {
            if press.distance(cursor) <= CLICK_SLOP_PX {
                let ray = cursor_ray(&view, cursor);
                dispatch_click(ray, &mut highlight, &mut navigation, &mut stage.stage());
            }
        }
    }
}

/// Activate the zone hit by `ray`, then dismiss if the hit was a zone's
/// dismiss affordance. A missing ray counts as a click on empty space.
pub fn dispatch_click(
    ray: Option<Ray3d>,
    highlight: &mut HoverHighlight,
    navigation: &mut NavigationController,
    stage: &mut Stage,
) {
    let hit = ray.and_then(|ray| pick(stage.scene, ray));
    if let Some(zone) = highlight.update(hit, stage.scene, stage.zones) {
        navigation.activate_zone(zone, stage);
    }
    if let Some(target) = hit.and_then(|hit| stage.zones.dismiss_target(stage.scene, hit.node)) {
        navigation.dismiss_zone(target, stage);
    }
}

pub fn handle_escape_key(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut navigation: ResMut<NavigationController>,
    mut stage: StageParams,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        navigation.escape(&mut stage.stage());
    }
}

pub fn handle_window_resize(
    mut resized: EventReader<WindowResized>,
    mut rig: ResMut<CameraRig>,
    mut compositor: ResMut<Compositor>,
) {
    if let Some(last) = resized.read().last() {
        resize_viewport(
            &mut rig,
            &mut compositor,
            last.width.round() as u32,
            last.height.round() as u32,
        );
    }
}

pub fn fit_viewport_to_window(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut rig: ResMut<CameraRig>,
    mut compositor: ResMut<Compositor>,
) {
    if let Ok(window) = windows.single() {
        resize_viewport(
            &mut rig,
            &mut compositor,
            window.width().round() as u32,
            window.height().round() as u32,
        );
    }
}

// Left drag orbits, wheel zooms; the controller ignores both while disabled
pub fn orbit_input(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    pointer: Res<PointerState>,
    mut rig: ResMut<CameraRig>,
) {
    if !rig.orbit.is_enabled() {
        mouse_motion.clear();
        scroll_events.clear();
        return;
    }

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    if mouse_button.pressed(MouseButton::Left) && pointer.press.is_some() && mouse_delta != Vec2::ZERO {
        let height = rig.camera.viewport.y as f32;
        rig.orbit.rotate(mouse_delta, height);
    }

    // Mouse wheel scroll accumulation (pixel and line scroll)
    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y * 1.0,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }
    if scroll_accum != 0.0 {
        rig.orbit.zoom(scroll_accum);
    }
}

pub fn advance_navigation(
    time: Res<Time>,
    mut navigation: ResMut<NavigationController>,
    mut stage: StageParams,
) {
    if !navigation.is_animating() {
        return;
    }
    navigation.tick(time.delta_secs(), &mut stage.stage());
}

pub fn integrate_orbit(time: Res<Time>, mut rig: ResMut<CameraRig>) {
    if !rig.orbit.has_momentum() {
        return;
    }
    let CameraRig { camera, orbit } = &mut *rig;
    orbit.update(camera, time.delta_secs());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::navigation::NavigationState;
    use crate::interaction::ui::SideMenu;
    use crate::test_support::{showroom_fixture, sky_ray};

    #[test]
    fn click_on_teaser_activates_its_zone() {
        let mut fixture = showroom_fixture();
        let mut rig = fixture.rig();
        let mut menu = SideMenu::default();
        let mut highlight = HoverHighlight::default();
        let mut navigation = NavigationController::default();
        let ray = fixture.ray_to("signup_teaser");

        let mut stage = Stage {
            scene: &mut fixture.scene,
            zones: &fixture.zones,
            rig: &mut rig,
            menu: &mut menu,
        };
        dispatch_click(Some(ray), &mut highlight, &mut navigation, &mut stage);

        assert_eq!(navigation.state(), NavigationState::Transitioning);
        assert_eq!(navigation.active_zone(), fixture.zones.lookup("signup"));
    }

    #[test]
    fn click_on_cross_dismisses_locked_zone() {
        let mut fixture = showroom_fixture();
        let drop = fixture.zones.lookup("drop").unwrap();
        let mut rig = fixture.rig();
        let mut menu = SideMenu::default();
        let mut highlight = HoverHighlight::default();
        let mut navigation = NavigationController::default();
        let ray = fixture.ray_to("drop_cross");

        let mut stage = Stage {
            scene: &mut fixture.scene,
            zones: &fixture.zones,
            rig: &mut rig,
            menu: &mut menu,
        };
        navigation.activate_zone(drop, &mut stage);
        navigation.tick(5.0, &mut stage);
        assert_eq!(navigation.state(), NavigationState::Locked);

        dispatch_click(Some(ray), &mut highlight, &mut navigation, &mut stage);

        assert_eq!(navigation.state(), NavigationState::Transitioning);
        assert_eq!(navigation.active_zone(), None);
    }

    #[test]
    fn click_on_empty_space_clears_highlight_only() {
        let mut fixture = showroom_fixture();
        let mut rig = fixture.rig();
        let mut menu = SideMenu::default();
        let mut highlight = HoverHighlight::default();
        let mut navigation = NavigationController::default();
        let ray = sky_ray(&fixture);

        let mut stage = Stage {
            scene: &mut fixture.scene,
            zones: &fixture.zones,
            rig: &mut rig,
            menu: &mut menu,
        };
        dispatch_click(Some(ray), &mut highlight, &mut navigation, &mut stage);
        assert_eq!(highlight.selection(), None);
        assert_eq!(navigation.state(), NavigationState::Free);

        dispatch_click(None, &mut highlight, &mut navigation, &mut stage);
        assert_eq!(navigation.state(), NavigationState::Free);
    }
}
