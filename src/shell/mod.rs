//! UI shell — the headless session behind the whiteboard screen.
//!
//! DESIGN
//! ======
//! `ShellSession` owns one mounted document: the canvas store, its sync
//! bridge, and the surrounding chrome state (sidebar, avatar roster,
//! pointer badge, selection, alert). Shell commands translate UI intents
//! into user-sourced canvas mutations or bridge commands; the bridge's
//! debounced save loop takes it from there. Errors surface as a
//! non-blocking alert plus the bridge status channel, never as panics.

pub mod viewer;

pub use viewer::ViewerSession;

use std::sync::Arc;

use tracing::warn;

use crate::bridge::{BridgeOptions, DocStatus, SyncBridge};
use crate::canvas::{CanvasStore, Source};
use crate::record::{Record, RecordId, ShapeRecord};
use crate::store::DocumentStore;
use crate::transform::{TransformError, TransformImage};

/// Alert shown when a shape command is issued with nothing selected.
pub const NO_SELECTION_ALERT: &str = "Select a shape to modify it.";

/// Alert shown when the drawing transform fails.
pub const TRANSFORM_FAILED_ALERT: &str = "Failed to transform drawing";

// =============================================================================
// CHROME STATE
// =============================================================================

/// A simulated user identity shown in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarInfo {
    pub name: String,
    pub initials: String,
    pub color: String,
}

/// The demo's fixed avatar roster.
#[must_use]
pub fn default_avatars() -> Vec<AvatarInfo> {
    vec![
        AvatarInfo { name: "Alice".into(), initials: "AL".into(), color: "#e11d48".into() },
        AvatarInfo { name: "Bob".into(), initials: "BO".into(), color: "#3b82f6".into() },
        AvatarInfo { name: "Cara".into(), initials: "CA".into(), color: "#10b981".into() },
    ]
}

fn default_sidebar_items() -> Vec<String> {
    vec!["History".into(), "Starred".into(), "Settings".into()]
}

/// A programmatic shape edit. Unset fields leave the attribute alone.
#[derive(Debug, Clone, Default)]
pub struct ShapeEdit {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub fill: Option<String>,
    pub color: Option<String>,
}

impl ShapeEdit {
    /// The "Modify Shape" button's canned edit.
    #[must_use]
    pub fn modify_default() -> Self {
        Self {
            width: Some(200.0),
            height: Some(200.0),
            fill: Some("none".into()),
            color: Some("yellow".into()),
        }
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// One user's whiteboard session over a mounted document.
pub struct ShellSession {
    canvas: CanvasStore,
    bridge: SyncBridge,
    transform: Option<Arc<dyn TransformImage>>,
    avatars: Vec<AvatarInfo>,
    current_avatar: usize,
    sidebar_items: Vec<String>,
    active_item: Option<usize>,
    pointer: (f64, f64),
    selection: Vec<RecordId>,
    alert: Option<String>,
}

impl ShellSession {
    /// Mount a document: fresh canvas, bridge hydration, default chrome.
    pub async fn mount(
        store: Arc<dyn DocumentStore>,
        document_id: impl Into<String>,
        transform: Option<Arc<dyn TransformImage>>,
    ) -> Self {
        let canvas = CanvasStore::new();
        let bridge = SyncBridge::mount(store, canvas.clone(), document_id, BridgeOptions::default()).await;

        Self {
            canvas,
            bridge,
            transform,
            avatars: default_avatars(),
            current_avatar: 0,
            sidebar_items: default_sidebar_items(),
            active_item: None,
            pointer: (0.0, 0.0),
            selection: Vec::new(),
            alert: None,
        }
    }

    #[must_use]
    pub fn canvas(&self) -> &CanvasStore {
        &self.canvas
    }

    #[must_use]
    pub fn bridge(&self) -> &SyncBridge {
        &self.bridge
    }

    /// Current bridge status for the header indicator.
    #[must_use]
    pub fn status(&self) -> DocStatus {
        self.bridge.status()
    }

    /// Tear the session down; pending debounced saves are cancelled.
    pub async fn unmount(self) {
        self.bridge.unmount().await;
    }

    // =========================================================================
    // CHROME
    // =========================================================================

    #[must_use]
    pub fn avatars(&self) -> &[AvatarInfo] {
        &self.avatars
    }

    #[must_use]
    pub fn current_avatar(&self) -> &AvatarInfo {
        &self.avatars[self.current_avatar]
    }

    /// Switch the simulated user. Unknown names are ignored.
    pub fn select_avatar(&mut self, name: &str) -> bool {
        match self.avatars.iter().position(|a| a.name == name) {
            Some(index) => {
                self.current_avatar = index;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn sidebar_items(&self) -> &[String] {
        &self.sidebar_items
    }

    /// Activate a sidebar playground item by index.
    pub fn open_sidebar_item(&mut self, index: usize) -> bool {
        if index < self.sidebar_items.len() {
            self.active_item = Some(index);
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn active_sidebar_item(&self) -> Option<&str> {
        self.active_item.map(|i| self.sidebar_items[i].as_str())
    }

    /// Track the pointer badge position.
    pub fn set_pointer(&mut self, x: f64, y: f64) {
        self.pointer = (x, y);
    }

    #[must_use]
    pub fn pointer(&self) -> (f64, f64) {
        self.pointer
    }

    /// Take the pending alert, clearing it.
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    // =========================================================================
    // SELECTION + COMMANDS
    // =========================================================================

    pub fn select(&mut self, ids: Vec<RecordId>) {
        self.selection = ids;
    }

    #[must_use]
    pub fn selection(&self) -> &[RecordId] {
        &self.selection
    }

    /// Draw a new shape as the current user.
    pub async fn create_shape(&mut self, shape: impl Into<String>, x: f64, y: f64) -> RecordId {
        let record = ShapeRecord::new(shape, x, y);
        let id = record.id.clone();
        self.canvas.apply_records(vec![Record::Shape(record)], Source::User).await;
        id
    }

    /// Flush a save immediately (the manual-save command).
    pub async fn request_manual_save(&self) {
        self.bridge.save_now().await;
    }

    /// Apply a programmatic edit to the first selected shape. With nothing
    /// selected, raises the alert and leaves the canvas alone.
    pub async fn request_shape_edit(&mut self, edit: ShapeEdit) -> Option<RecordId> {
        let Some(mut shape) = self.first_selected_shape().await else {
            self.alert = Some(NO_SELECTION_ALERT.to_string());
            return None;
        };

        if let Some(width) = edit.width {
            shape.width = Some(width);
        }
        if let Some(height) = edit.height {
            shape.height = Some(height);
        }
        if let Some(fill) = &edit.fill {
            set_prop(&mut shape, "fill", fill);
        }
        if let Some(color) = &edit.color {
            set_prop(&mut shape, "color", color);
        }

        let id = shape.id.clone();
        self.canvas.apply_records(vec![Record::Shape(shape)], Source::User).await;
        Some(id)
    }

    /// Send the selected shape to the transform service and replace it with
    /// the generated image record.
    ///
    /// # Errors
    ///
    /// Returns a [`TransformError`] (also surfaced via the alert) if no
    /// service is configured, nothing transformable is selected, or the
    /// service call fails. The canvas is untouched on failure.
    pub async fn request_external_transform(&mut self) -> Result<RecordId, TransformError> {
        let Some(client) = self.transform.clone() else {
            self.alert = Some(TRANSFORM_FAILED_ALERT.to_string());
            return Err(TransformError::NotConfigured);
        };
        let Some(shape) = self.first_selected_shape().await else {
            self.alert = Some(NO_SELECTION_ALERT.to_string());
            return Err(TransformError::InvalidSelection("no shape selected".into()));
        };

        let drawing = serde_json::to_value(Record::Shape(shape.clone()))
            .map_err(|e| TransformError::InvalidSelection(e.to_string()))?;

        let image_url = match client.transform(&drawing).await {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, shape = %shape.id, "drawing transform failed");
                self.alert = Some(TRANSFORM_FAILED_ALERT.to_string());
                return Err(e);
            }
        };

        // The generated image takes the source shape's place on the canvas.
        let mut image = ShapeRecord::new("image", shape.x, shape.y);
        image.page = shape.page.clone();
        image.width = shape.width;
        image.height = shape.height;
        image.props = serde_json::json!({ "url": image_url });
        let image_id = image.id.clone();

        self.canvas.delete_records(&[shape.id.clone()], Source::User).await;
        self.canvas.apply_records(vec![Record::Shape(image)], Source::User).await;
        self.selection = vec![image_id.clone()];
        Ok(image_id)
    }

    async fn first_selected_shape(&self) -> Option<ShapeRecord> {
        for id in &self.selection {
            if let Some(Record::Shape(shape)) = self.canvas.record(id).await {
                return Some(shape);
            }
        }
        None
    }
}

fn set_prop(shape: &mut ShapeRecord, key: &str, value: &str) {
    if !shape.props.is_object() {
        shape.props = serde_json::json!({});
    }
    if let Some(props) = shape.props.as_object_mut() {
        props.insert(key.to_string(), serde_json::Value::String(value.to_string()));
    }
}

#[cfg(test)]
#[path = "shell_test.rs"]
mod tests;
