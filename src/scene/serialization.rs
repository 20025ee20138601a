use crate::scene::SceneState;
use crate::targeting::ObjectId;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0:?} is used by more than one object")]
    DuplicateId(ObjectId),
}

pub type Result<T> = std::result::Result<T, SerializationError>;

pub fn load_scene_from_file(path: &Path) -> Result<SceneState> {
    let json = std::fs::read_to_string(path)?;
    let scene: SceneState = serde_json::from_str(&json)?;
    check_unique_ids(&scene)?;
    log::info!("loaded {} objects from {}", scene.objects().len(), path.display());
    Ok(scene)
}

/// Raycast hits and material writes both resolve objects by id.
fn check_unique_ids(scene: &SceneState) -> Result<()> {
    let mut seen = HashSet::new();
    for object in scene.objects() {
        if !seen.insert(object.id) {
            return Err(SerializationError::DuplicateId(object.id));
        }
    }
    Ok(())
}
