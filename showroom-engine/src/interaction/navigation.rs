use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use constants::navigation::{
    ARRIVAL_SECONDS, HOME_POSITION, HOME_TARGET, PANEL_FADE_SECONDS, RETURN_SECONDS,
};

use super::overlay_panel::OverlayPanel;
use super::ui::{Collaborator, SideMenu};
use crate::engine::animation::{Ease, TransitionHandle, TweenField, TweenValue, Tweener};
use crate::engine::camera::CameraRig;
use crate::engine::render::compositor::Compositor;
use crate::engine::scene::{SceneGraph, Waypoint, ZoneId, ZoneRegistry};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NavigationState {
    /// Orbit enabled, no zone locked.
    #[default]
    Free,
    /// Camera tween in flight, orbit disabled.
    Transitioning,
    /// Zone detail shown, orbit disabled.
    Locked,
}

/// Completions carried by navigation tweens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEvent {
    ArrivedAtZone(ZoneId),
    ReturnedHome,
    PanelFadedOut,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionTimings {
    pub arrival: f32,
    pub return_home: f32,
    pub panel_fade: f32,
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            arrival: ARRIVAL_SECONDS,
            return_home: RETURN_SECONDS,
            panel_fade: PANEL_FADE_SECONDS,
        }
    }
}

/// Everything a navigation request may touch besides the controller itself.
pub struct Stage<'a> {
    pub scene: &'a mut SceneGraph,
    pub zones: &'a ZoneRegistry,
    pub rig: &'a mut CameraRig,
    pub menu: &'a mut SideMenu,
}

#[derive(SystemParam)]
pub struct StageParams<'w> {
    pub scene: ResMut<'w, SceneGraph>,
    pub zones: Res<'w, ZoneRegistry>,
    pub rig: ResMut<'w, CameraRig>,
    pub menu: ResMut<'w, SideMenu>,
}

impl StageParams<'_> {
    pub fn stage(&mut self) -> Stage<'_> {
        Stage {
            scene: &mut self.scene,
            zones: &self.zones,
            rig: &mut self.rig,
            menu: &mut self.menu,
        }
    }
}

/// Tweens moving the camera pose, polled every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Flight {
    position: TransitionHandle,
    target: TransitionHandle,
}

/// Arbitrates zone activation, dismissal and escape, and owns the tweens
/// and overlay panel those transitions drive.
#[derive(Resource, Debug)]
pub struct NavigationController {
    state: NavigationState,
    active_zone: Option<ZoneId>,
    orbit_enabled: bool,
    home: Waypoint,
    timings: TransitionTimings,
    tweens: Tweener<NavigationEvent>,
    flight: Option<Flight>,
    fade: Option<TransitionHandle>,
    panel: OverlayPanel,
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new(
            Waypoint {
                position: HOME_POSITION,
                target: HOME_TARGET,
            },
            TransitionTimings::default(),
        )
    }
}

impl NavigationController {
    pub fn new(home: Waypoint, timings: TransitionTimings) -> Self {
        Self {
            state: NavigationState::Free,
            active_zone: None,
            orbit_enabled: true,
            home,
            timings,
            tweens: Tweener::default(),
            flight: None,
            fade: None,
            panel: OverlayPanel::default(),
        }
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    pub fn active_zone(&self) -> Option<ZoneId> {
        self.active_zone
    }

    pub fn orbit_enabled(&self) -> bool {
        self.orbit_enabled
    }

    pub fn panel(&self) -> &OverlayPanel {
        &self.panel
    }

    /// Whether a camera flight or panel fade is still running.
    pub fn is_animating(&self) -> bool {
        self.flight.is_some() || self.fade.is_some()
    }

    /// Cancel the current flight, if any, and fly the camera to `waypoint`.
    fn fly_to(
        &mut self,
        waypoint: Waypoint,
        duration: f32,
        arrival: NavigationEvent,
        rig: &CameraRig,
    ) {
        if let Some(flight) = self.flight.take() {
            self.tweens.cancel(flight.position);
            self.tweens.cancel(flight.target);
        }

        let camera = &rig.camera;
        let position = self.tweens.start(
            TweenField::CameraPosition,
            TweenValue::Vector(camera.position),
            TweenValue::Vector(waypoint.position),
            duration,
            Ease::Power1Out,
            Some(arrival),
        );
        let target = self.tweens.start(
            TweenField::OrbitTarget,
            TweenValue::Vector(camera.target),
            TweenValue::Vector(waypoint.target),
            duration,
            Ease::Power1Out,
            None,
        );
        self.flight = Some(Flight { position, target });
    }

    fn fade_panel(&mut self, from: f32, to: f32, completion: Option<NavigationEvent>) {
        if let Some(fade) = self.fade.take() {
            self.tweens.cancel(fade);
        }
        self.fade = Some(self.tweens.start(
            TweenField::PanelOpacity,
            TweenValue::Scalar(from),
            TweenValue::Scalar(to),
            self.timings.panel_fade,
            Ease::Power1Out,
            completion,
        ));
    }

    fn set_orbit(&mut self, enabled: bool, rig: &mut CameraRig) {
        self.orbit_enabled = enabled;
        rig.orbit.set_enabled(enabled);
    }

    /// Fly to `zone`. Only honoured while free; anything else is dropped.
    pub fn activate_zone(&mut self, zone: ZoneId, stage: &mut Stage) -> bool {
        if self.state != NavigationState::Free {
            debug!("Zone activation ignored while {:?}", self.state);
            return false;
        }
        let Some(target) = stage.zones.get(zone) else {
            warn!("Activation requested for unknown zone {zone:?}");
            return false;
        };

        self.state = NavigationState::Transitioning;
        self.active_zone = Some(zone);
        self.set_orbit(false, stage.rig);
        stage.menu.hide();
        stage.zones.reset_all(stage.scene);

        self.fly_to(
            target.waypoint,
            self.timings.arrival,
            NavigationEvent::ArrivedAtZone(zone),
            stage.rig,
        );

        info!("→ Navigating to zone '{}'", target.name);
        true
    }

    /// Leave the locked `zone` and fly home.
    pub fn dismiss_zone(&mut self, zone: ZoneId, stage: &mut Stage) -> bool {
        if self.state != NavigationState::Locked || self.active_zone != Some(zone) {
            debug!(
                "Dismiss of {zone:?} ignored while {:?} on {:?}",
                self.state, self.active_zone
            );
            return false;
        }

        stage.zones.show_rest(stage.scene, zone);
        self.return_home(stage);
        true
    }

    /// Abandon whatever is going on and fly home with every zone at rest.
    pub fn escape(&mut self, stage: &mut Stage) -> bool {
        if self.state == NavigationState::Free {
            return false;
        }

        stage.zones.reset_all(stage.scene);
        self.return_home(stage);
        true
    }

    fn return_home(&mut self, stage: &mut Stage) {
        self.state = NavigationState::Transitioning;
        self.active_zone = None;
        self.close_panel();

        self.fly_to(
            self.home,
            self.timings.return_home,
            NavigationEvent::ReturnedHome,
            stage.rig,
        );

        info!("→ Returning home");
    }

    fn open_panel(&mut self, zone: ZoneId, stage: &Stage) {
        let Some(pose) = stage.zones.get(zone).and_then(|zone| zone.panel) else {
            return;
        };
        self.panel.place(zone, pose);
        self.panel.set_opacity(0.0);
        self.fade_panel(0.0, 1.0, None);
    }

    fn close_panel(&mut self) {
        if self.panel.is_parked() {
            return;
        }
        self.fade_panel(self.panel.opacity(), 0.0, Some(NavigationEvent::PanelFadedOut));
    }

    /// Advance transitions by `delta_seconds` and apply their completions.
    pub fn tick(&mut self, delta_seconds: f32, stage: &mut Stage) -> Vec<NavigationEvent> {
        let camera = &mut stage.rig.camera;
        let panel = &mut self.panel;
        let completions = self.tweens.tick(delta_seconds, |field, value| match (field, value) {
            (TweenField::CameraPosition, TweenValue::Vector(position)) => {
                camera.position = position;
            }
            (TweenField::OrbitTarget, TweenValue::Vector(target)) => camera.target = target,
            (TweenField::PanelOpacity, TweenValue::Scalar(opacity)) => panel.set_opacity(opacity),
            (field, value) => warn_once!("Tween value {value:?} does not fit {field:?}"),
        });

        let tweens = &self.tweens;
        if self.flight.is_some_and(|flight| {
            tweens.is_complete(flight.position) && tweens.is_complete(flight.target)
        }) {
            self.flight = None;
        }
        if self.fade.is_some_and(|fade| tweens.is_complete(fade)) {
            self.fade = None;
        }

        for event in &completions {
            match *event {
                NavigationEvent::ArrivedAtZone(zone) => {
                    if self.state != NavigationState::Transitioning
                        || self.active_zone != Some(zone)
                    {
                        debug!("Stale arrival at {zone:?} ignored");
                        continue;
                    }
                    self.state = NavigationState::Locked;
                    stage.zones.show_detail(stage.scene, zone);
                    self.open_panel(zone, stage);
                    info!("✓ Locked on zone {zone:?}");
                }
                NavigationEvent::ReturnedHome => {
                    self.state = NavigationState::Free;
                    self.set_orbit(true, stage.rig);
                    info!("✓ Back home, orbit enabled");
                }
                NavigationEvent::PanelFadedOut => self.panel.park(),
            }
        }

        completions
    }
}

/// Viewport change. Leaves navigation alone.
pub fn resize_viewport(rig: &mut CameraRig, compositor: &mut Compositor, width: u32, height: u32) {
    let (width, height) = (width.max(1), height.max(1));
    rig.camera.resize(width, height);
    compositor.resize(width, height);
}
