use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::path::SCENE_MANIFEST_PATH;

use crate::engine::assets::scene_manifest::SceneManifest;
use crate::engine::loading::progress::LoadingProgress;

#[derive(Resource, Default)]
pub struct ManifestLoader {
    handle: Option<Handle<SceneManifest>>,
}

pub fn start_loading(mut manifest_loader: ResMut<ManifestLoader>, asset_server: Res<AssetServer>) {
    info!("Loading scene manifest from {SCENE_MANIFEST_PATH}");
    manifest_loader.handle = Some(asset_server.load(SCENE_MANIFEST_PATH));
}

/// Build the showroom from the manifest once bevy has parsed it and insert
/// its resources. A broken manifest is logged and loading stops.
pub fn install_scene_when_loaded(
    mut commands: Commands,
    mut loading_progress: ResMut<LoadingProgress>,
    manifest_loader: Res<ManifestLoader>,
    manifests: Res<Assets<SceneManifest>>,
    asset_server: Res<AssetServer>,
) {
    if loading_progress.scene_installed || loading_progress.failed {
        return;
    }
    let Some(handle) = manifest_loader.handle.as_ref() else {
        return;
    };

    if let LoadState::Failed(err) = asset_server.load_state(handle.id()) {
        error!("Scene manifest failed to load: {err}");
        loading_progress.failed = true;
        return;
    }

    let Some(manifest) = manifests.get(handle) else {
        return;
    };

    match manifest.build_showroom() {
        Ok(showroom) => {
            commands.insert_resource(showroom.scene);
            commands.insert_resource(showroom.zones);
            commands.insert_resource(showroom.materials);
            commands.insert_resource(showroom.spinners);
            loading_progress.scene_installed = true;
            info!("✓ Scene manifest installed");
        }
        Err(err) => {
            error!("Scene manifest is invalid: {err}");
            loading_progress.failed = true;
        }
    }
}
