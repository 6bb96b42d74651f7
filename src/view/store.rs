//! Saved camera views with JSON import/export.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::camera::CameraState;
use crate::core::error::Error;
use crate::core::types::Result;

/// A named, timestamped camera pose.
///
/// Field names follow the JSON exchange format (`rotX`, `panY`, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraView {
    pub rot_x: f32,
    pub rot_y: f32,
    pub zoom: f32,
    #[serde(default)]
    pub pan_x: f32,
    #[serde(default)]
    pub pan_y: f32,
    #[serde(default)]
    pub name: String,
    /// Unix milliseconds
    #[serde(default)]
    pub timestamp: u64,
}

impl CameraView {
    pub fn from_camera(camera: &CameraState, name: impl Into<String>) -> Self {
        Self {
            rot_x: camera.rot_x,
            rot_y: camera.rot_y,
            zoom: camera.zoom,
            pan_x: camera.pan_x,
            pan_y: camera.pan_y,
            name: name.into(),
            timestamp: now_millis(),
        }
    }

    /// Copy the pose onto `camera`
    pub fn apply(&self, camera: &mut CameraState) {
        camera.rot_x = self.rot_x;
        camera.rot_y = self.rot_y;
        camera.zoom = self.zoom;
        camera.pan_x = self.pan_x;
        camera.pan_y = self.pan_y;
    }

    /// Parse and validate exchanged view JSON.
    ///
    /// `rotX`, `rotY` and `zoom` must be numbers. A missing pan is 0 and a
    /// zero zoom falls back to 1.
    pub fn parse(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        let Some(object) = value.as_object() else {
            return Err(Error::InvalidView("expected a JSON object".to_string()));
        };

        let number = |key: &str| object.get(key).and_then(Value::as_f64);
        let (Some(rot_x), Some(rot_y), Some(zoom)) =
            (number("rotX"), number("rotY"), number("zoom"))
        else {
            return Err(Error::InvalidView("rotX, rotY and zoom must be numbers".to_string()));
        };

        Ok(Self {
            rot_x: rot_x as f32,
            rot_y: rot_y as f32,
            zoom: if zoom == 0.0 { 1.0 } else { zoom as f32 },
            pan_x: number("panX").unwrap_or(0.0) as f32,
            pan_y: number("panY").unwrap_or(0.0) as f32,
            name: object.get("name").and_then(Value::as_str).unwrap_or_default().to_string(),
            timestamp: object.get("timestamp").and_then(Value::as_u64).unwrap_or_default(),
        })
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Named views, optionally backed by a JSON file.
#[derive(Clone, Debug, Default)]
pub struct ViewStore {
    views: BTreeMap<String, CameraView>,
    path: Option<PathBuf>,
}

impl ViewStore {
    /// In-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Load views from `path`. A missing file yields an empty store that
    /// will be written there on [`ViewStore::save`].
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let views = if path.exists() {
            let json = fs::read_to_string(&path)?;
            serde_json::from_str(&json)?
        } else {
            BTreeMap::new()
        };
        log::debug!("Opened view store {} ({} views)", path.display(), views.len());
        Ok(Self {
            views,
            path: Some(path),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Persist to the backing file. In-memory stores do nothing.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.views)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// All views in name order
    pub fn views(&self) -> impl Iterator<Item = &CameraView> {
        self.views.values()
    }

    pub fn get(&self, name: &str) -> Option<&CameraView> {
        self.views.get(name)
    }

    /// Store the camera pose. Without a name it becomes `View-{n+1}`.
    /// An existing view of the same name is replaced.
    pub fn save_view(&mut self, camera: &CameraState, name: Option<&str>) -> CameraView {
        let name = match name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("View-{}", self.views.len() + 1),
        };
        let view = CameraView::from_camera(camera, name);
        self.views.insert(view.name.clone(), view.clone());
        log::info!("Saved view '{}'", view.name);
        view
    }

    /// Apply a stored view to `camera`. Unknown names leave it untouched.
    pub fn load_view(&self, name: &str, camera: &mut CameraState) -> bool {
        match self.views.get(name) {
            Some(view) => {
                view.apply(camera);
                true
            }
            None => {
                log::warn!("View '{}' not found", name);
                false
            }
        }
    }

    pub fn delete_view(&mut self, name: &str) -> bool {
        self.views.remove(name).is_some()
    }

    /// Apply exchanged view JSON to `camera`. Invalid data leaves it untouched.
    pub fn apply_json(&self, json: &str, camera: &mut CameraState) -> bool {
        match CameraView::parse(json) {
            Ok(view) => {
                view.apply(camera);
                true
            }
            Err(e) => {
                log::warn!("Rejected view data: {}", e);
                false
            }
        }
    }

    /// Apply exchanged view JSON and store the resulting pose under its own
    /// name, or `Imported-{timestamp}` when it has none.
    pub fn import_json(&mut self, json: &str, camera: &mut CameraState) -> Result<CameraView> {
        let view = CameraView::parse(json)?;
        view.apply(camera);

        let name = if view.name.is_empty() {
            format!("Imported-{}", now_millis())
        } else {
            view.name
        };
        Ok(self.save_view(camera, Some(&name)))
    }

    /// Pretty JSON for one view
    pub fn export_json(view: &CameraView) -> Result<String> {
        Ok(serde_json::to_string_pretty(view)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn posed_camera() -> CameraState {
        CameraState {
            rot_x: 0.3,
            rot_y: -1.2,
            zoom: 2.0,
            pan_x: 15.0,
            pan_y: -4.0,
        }
    }

    #[test]
    fn test_default_names() {
        let mut store = ViewStore::new();
        let camera = CameraState::new();
        assert_eq!(store.save_view(&camera, None).name, "View-1");
        assert_eq!(store.save_view(&camera, Some("front")).name, "front");
        assert_eq!(store.save_view(&camera, None).name, "View-3");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_save_and_load_view() {
        let mut store = ViewStore::new();
        store.save_view(&posed_camera(), Some("side"));

        let mut camera = CameraState::new();
        assert!(store.load_view("side", &mut camera));
        assert_eq!(camera, posed_camera());

        assert!(!store.load_view("missing", &mut camera));
        assert!(store.delete_view("side"));
        assert!(!store.delete_view("side"));
    }

    #[test]
    fn test_apply_json_validation() {
        let store = ViewStore::new();
        let mut camera = CameraState::new();

        assert!(!store.apply_json(r#"{"rotX": 1.0, "zoom": 2.0}"#, &mut camera));
        assert!(!store.apply_json(r#"{"rotX": "1", "rotY": 0, "zoom": 1}"#, &mut camera));
        assert!(!store.apply_json("not json", &mut camera));
        assert_eq!(camera, CameraState::new());

        assert!(store.apply_json(r#"{"rotX": 0.5, "rotY": 0.25, "zoom": 0}"#, &mut camera));
        assert_eq!(camera.rot_x, 0.5);
        assert_eq!(camera.zoom, 1.0);
        assert_eq!(camera.pan_x, 0.0);
    }

    #[test]
    fn test_import_names() {
        let mut store = ViewStore::new();
        let mut camera = CameraState::new();

        let named = store
            .import_json(r#"{"rotX": 0, "rotY": 1, "zoom": 3, "name": "top"}"#, &mut camera)
            .unwrap();
        assert_eq!(named.name, "top");
        assert_eq!(camera.zoom, 3.0);

        let unnamed = store
            .import_json(r#"{"rotX": 0, "rotY": 0, "zoom": 1}"#, &mut camera)
            .unwrap();
        assert!(unnamed.name.starts_with("Imported-"));

        assert!(matches!(
            store.import_json(r#"{"rotY": 0}"#, &mut camera),
            Err(Error::InvalidView(_))
        ));
    }

    #[test]
    fn test_export_json_format() {
        let view = CameraView::from_camera(&posed_camera(), "iso");
        let json = ViewStore::export_json(&view).unwrap();

        assert!(json.contains("\"rotX\""));
        assert!(json.contains("\"panY\""));
        assert_eq!(CameraView::parse(&json).unwrap(), view);
    }

    #[test]
    fn test_persistence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("views.json");

        let mut store = ViewStore::open(&path).unwrap();
        assert!(store.is_empty());
        store.save_view(&posed_camera(), Some("a"));
        store.save_view(&CameraState::new(), Some("b"));
        store.save().unwrap();

        let reopened = ViewStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.get("a").unwrap().zoom, 2.0);
        let names: Vec<_> = reopened.views().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
