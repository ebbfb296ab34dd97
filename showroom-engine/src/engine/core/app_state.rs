use bevy::prelude::*;

use crate::engine::loading::progress::LoadingProgress;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
}

/// Per-frame ordering while running. Sets execute in declaration order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSet {
    /// Pointer, keyboard, resize and UI button handling.
    Input,
    /// Navigation tweens and their completions.
    Animate,
    /// Orbit controller integration.
    Orbit,
    /// Compositor passes.
    Render,
    /// Decorative spinners.
    Cosmetic,
    /// Camera, transform and layer target sync, overlay placement.
    Present,
}

pub fn transition_to_running(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.scene_installed {
        info!("→ Showroom ready, transitioning to Running state");
        next_state.set(AppState::Running);
    }
}
