//! Pointer, keyboard and UI interaction with the showroom.
//!
//! ## Frame flow
//!
//! ```text
//! CursorMoved ──> hit_test::pick ──> HoverHighlight ──> outline pass
//!      click ──> dispatch_click ──> NavigationController::activate_zone
//!                                └─> NavigationController::dismiss_zone
//! Escape     ──> NavigationController::escape
//! each frame ──> NavigationController::tick ──> camera rig, overlay panel
//! ```
//!
//! The navigation controller is the only writer of zone visibility after
//! load. Requests that do not fit the current state are dropped.

/// Highlight selection tracking the zone under the pointer.
pub mod highlight;


/// Bevy input systems feeding the hit-tester, orbit and navigation.
pub mod input;

/// Free / transitioning / locked camera navigation state machine.
pub mod navigation;

/// World-space overlay panel, its projection and UI placement.
pub mod overlay_panel;

/// Side menu, loading overlay, panel buttons and FPS readout.
pub mod ui;

use bevy::prelude::*;

use crate::engine::core::app_state::{AppState, FrameSet};

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<navigation::NavigationController>()
            .init_resource::<highlight::HoverHighlight>()
            .init_resource::<input::PointerState>()
            .init_resource::<ui::SideMenu>()
            .init_resource::<ui::LoadingOverlay>();

        app.add_systems(
            Startup,
            (ui::spawn_loading_overlay, ui::spawn_overlay_panel),
        )
        .add_systems(
            OnEnter(AppState::Running),
            (input::fit_viewport_to_window, ui::spawn_side_menu),
        )
        .add_systems(Update, ui::reflect_loading_overlay)
        .add_systems(
            Update,
            (
                input::handle_window_resize,
                input::handle_pointer_input,
                input::orbit_input,
                input::handle_escape_key,
                ui::menu_toggle_interaction,
                ui::menu_entry_interaction,
                ui::panel_close_interaction,
                ui::reflect_side_menu,
            )
                .chain()
                .in_set(FrameSet::Input),
        )
        .add_systems(Update, input::advance_navigation.in_set(FrameSet::Animate))
        .add_systems(Update, input::integrate_orbit.in_set(FrameSet::Orbit))
        .add_systems(
            Update,
            overlay_panel::place_overlay_panel.in_set(FrameSet::Present),
        );

        // FPS readout for native builds only
        #[cfg(not(target_arch = "wasm32"))]
        {
            app.add_systems(Startup, ui::spawn_fps_text)
                .add_systems(Update, ui::fps_text_update_system);
        }
    }
}
