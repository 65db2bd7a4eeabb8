//! Saved crop projects and their storage.
//!
//! A project is the image reference plus the committed frames. Stores are
//! keyed by a numeric id assigned on creation.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::frame::CropFrame;

/// Errors from project validation and storage.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Invalid project JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid project: {0}")]
    Invalid(String),

    #[error("Project {0} not found")]
    NotFound(u64),
}

/// Project contents before an id is assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,
    pub original_image_url: String,
    pub image_width: u32,
    pub image_height: u32,
    pub crop_frames: Vec<CropFrame>,
}

impl NewProject {
    /// Parse and validate a project body.
    pub fn from_json(json: &str) -> Result<Self, ProjectError> {
        let project: NewProject = serde_json::from_str(json)?;
        project.validate()?;
        Ok(project)
    }

    /// Check required fields and frame ids.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::Invalid` for an empty name or image URL, a
    /// zero-sized image, or duplicate frame ids.
    pub fn validate(&self) -> Result<(), ProjectError> {
        check_fields(
            &self.name,
            &self.original_image_url,
            self.image_width,
            self.image_height,
            &self.crop_frames,
        )
    }
}

fn check_fields(
    name: &str,
    image_url: &str,
    image_width: u32,
    image_height: u32,
    frames: &[CropFrame],
) -> Result<(), ProjectError> {
    if name.trim().is_empty() {
        return Err(ProjectError::Invalid("name is empty".to_string()));
    }
    if image_url.is_empty() {
        return Err(ProjectError::Invalid("originalImageUrl is empty".to_string()));
    }
    if image_width == 0 || image_height == 0 {
        return Err(ProjectError::Invalid(format!(
            "image size {}x{} is empty",
            image_width, image_height
        )));
    }

    let mut seen = HashSet::new();
    if let Some(dup) = frames.iter().find(|f| !seen.insert(f.id.as_str())) {
        return Err(ProjectError::Invalid(format!("duplicate frame id '{}'", dup.id)));
    }
    Ok(())
}

/// A stored project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropProject {
    pub id: u64,
    pub name: String,
    pub original_image_url: String,
    pub image_width: u32,
    pub image_height: u32,
    pub crop_frames: Vec<CropFrame>,
}

impl CropProject {
    pub fn from_new(id: u64, project: NewProject) -> Self {
        Self {
            id,
            name: project.name,
            original_image_url: project.original_image_url,
            image_width: project.image_width,
            image_height: project.image_height,
            crop_frames: project.crop_frames,
        }
    }

    /// Merge the fields present in `patch`.
    pub fn apply(&mut self, patch: ProjectPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(url) = patch.original_image_url {
            self.original_image_url = url;
        }
        if let Some(width) = patch.image_width {
            self.image_width = width;
        }
        if let Some(height) = patch.image_height {
            self.image_height = height;
        }
        if let Some(frames) = patch.crop_frames {
            self.crop_frames = frames;
        }
    }

    pub fn validate(&self) -> Result<(), ProjectError> {
        check_fields(
            &self.name,
            &self.original_image_url,
            self.image_width,
            self.image_height,
            &self.crop_frames,
        )
    }

    pub fn to_json(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ProjectError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Partial project update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub original_image_url: Option<String>,
    pub image_width: Option<u32>,
    pub image_height: Option<u32>,
    pub crop_frames: Option<Vec<CropFrame>>,
}

/// Persistence for crop projects.
pub trait ProjectStore {
    /// Validate and store a project, assigning its id.
    fn create(&mut self, project: NewProject) -> Result<CropProject, ProjectError>;

    fn get(&self, id: u64) -> Option<CropProject>;

    /// Merge `patch` into an existing project.
    fn update(&mut self, id: u64, patch: ProjectPatch) -> Result<CropProject, ProjectError>;

    /// Remove a project. Returns whether it existed.
    fn delete(&mut self, id: u64) -> bool;
}

/// In-memory store with ids counting up from 1.
#[derive(Debug, Clone)]
pub struct MemoryProjectStore {
    projects: HashMap<u64, CropProject>,
    next_id: u64,
}

impl Default for MemoryProjectStore {
    fn default() -> Self {
        Self {
            projects: HashMap::new(),
            next_id: 1,
        }
    }
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

impl ProjectStore for MemoryProjectStore {
    fn create(&mut self, project: NewProject) -> Result<CropProject, ProjectError> {
        project.validate()?;

        let id = self.next_id;
        self.next_id += 1;

        let stored = CropProject::from_new(id, project);
        self.projects.insert(id, stored.clone());
        log::info!("saved project {} '{}' ({} frames)", id, stored.name, stored.crop_frames.len());
        Ok(stored)
    }

    fn get(&self, id: u64) -> Option<CropProject> {
        self.projects.get(&id).cloned()
    }

    fn update(&mut self, id: u64, patch: ProjectPatch) -> Result<CropProject, ProjectError> {
        let existing = self.projects.get(&id).ok_or(ProjectError::NotFound(id))?;

        let mut updated = existing.clone();
        updated.apply(patch);
        updated.validate()?;

        self.projects.insert(id, updated.clone());
        Ok(updated)
    }

    fn delete(&mut self, id: u64) -> bool {
        self.projects.remove(&id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::create_default_frames;
    use crate::config::EditorConfig;

    fn sample() -> NewProject {
        let config = EditorConfig::default();
        NewProject {
            name: "Desk setup".to_string(),
            original_image_url: "/uploads/wall.png".to_string(),
            image_width: 1920,
            image_height: 1080,
            crop_frames: create_default_frames(
                &config.default_monitors,
                &config.default_aspect_ratio,
                &config.layout,
            ),
        }
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let mut store = MemoryProjectStore::new();
        let first = store.create(sample()).unwrap();
        let second = store.create(sample()).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1), Some(first));
    }

    #[test]
    fn test_get_missing() {
        let store = MemoryProjectStore::new();
        assert!(store.get(42).is_none());
    }

    #[test]
    fn test_update_merges_fields() {
        let mut store = MemoryProjectStore::new();
        let created = store.create(sample()).unwrap();

        let updated = store
            .update(
                created.id,
                ProjectPatch {
                    name: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.crop_frames, created.crop_frames);
        assert_eq!(store.get(created.id).unwrap().name, "Renamed");
    }

    #[test]
    fn test_update_missing_project() {
        let mut store = MemoryProjectStore::new();
        assert!(matches!(
            store.update(7, ProjectPatch::default()),
            Err(ProjectError::NotFound(7))
        ));
    }

    #[test]
    fn test_update_rejects_invalid_result() {
        let mut store = MemoryProjectStore::new();
        let created = store.create(sample()).unwrap();
        let result = store.update(
            created.id,
            ProjectPatch {
                name: Some("  ".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(ProjectError::Invalid(_))));
        assert_eq!(store.get(created.id).unwrap().name, "Desk setup");
    }

    #[test]
    fn test_delete() {
        let mut store = MemoryProjectStore::new();
        let created = store.create(sample()).unwrap();
        assert!(store.delete(created.id));
        assert!(!store.delete(created.id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_validation() {
        let mut project = sample();
        project.original_image_url.clear();
        assert!(matches!(project.validate(), Err(ProjectError::Invalid(_))));

        let mut project = sample();
        project.image_height = 0;
        assert!(project.validate().is_err());

        let mut project = sample();
        let dup = project.crop_frames[0].clone();
        project.crop_frames.push(dup);
        assert!(project.validate().is_err());
    }

    #[test]
    fn test_json_contract() {
        let json = r##"{
            "name": "Wall",
            "originalImageUrl": "/uploads/a.jpg",
            "imageWidth": 3840,
            "imageHeight": 2160,
            "cropFrames": [{
                "id": "frame-1", "name": "Monitor 1",
                "x": 50, "y": 50, "width": 300, "height": 169,
                "aspectRatio": {"width": 16, "height": 9, "label": "16:9"},
                "monitorInches": 27, "color": "#2563EB"
            }]
        }"##;

        let project = NewProject::from_json(json).unwrap();
        assert_eq!(project.image_width, 3840);
        assert!(!project.crop_frames[0].is_base_frame);
        assert!(project.crop_frames[0].monitor_id.is_none());

        let stored = CropProject::from_new(3, project);
        let text = stored.to_json().unwrap();
        assert!(text.contains("\"originalImageUrl\":\"/uploads/a.jpg\""));
        assert_eq!(CropProject::from_json(&text).unwrap(), stored);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            NewProject::from_json("{\"name\": 1}"),
            Err(ProjectError::Json(_))
        ));
    }
}
