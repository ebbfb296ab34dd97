use bevy::prelude::*;

#[derive(Resource, Default, Debug)]
pub struct LoadingProgress {
    pub scene_installed: bool,
    /// Set when the manifest failed to build. Loading stops here.
    pub failed: bool,
}
