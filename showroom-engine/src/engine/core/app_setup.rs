use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::engine::assets::scene_manifest::SceneManifest;
use crate::engine::camera::CameraRig;
use crate::engine::core::app_state::{AppState, FrameSet, transition_to_running};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::manifest_loader::{
    ManifestLoader, install_scene_when_loaded, start_loading,
};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::render::CompositorPlugin;
use crate::engine::scene::decor::spin_decor;
use crate::interaction::InteractionPlugin;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers SceneManifest as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<SceneManifest>::new(&["json"]))
        .add_plugins(CompositorPlugin)
        .add_plugins(InteractionPlugin);

    app.init_resource::<LoadingProgress>()
        .init_resource::<ManifestLoader>()
        .init_resource::<CameraRig>();

    // Every running frame: input, tweens, orbit, passes, spinners, presentation
    app.configure_sets(
        Update,
        (
            FrameSet::Input,
            FrameSet::Animate,
            FrameSet::Orbit,
            FrameSet::Render,
            FrameSet::Cosmetic,
            FrameSet::Present,
        )
            .chain()
            .run_if(in_state(AppState::Running)),
    );

    app.add_systems(Startup, start_loading)
        .add_systems(
            Update,
            (install_scene_when_loaded, transition_to_running)
                .chain()
                .run_if(in_state(AppState::Loading)),
        )
        .add_systems(Update, spin_decor.in_set(FrameSet::Cosmetic));

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
