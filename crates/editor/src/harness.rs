//! Headless editor for tests and the command interface.
//!
//! Wraps an [`EditorSession`] with a fixed top-down viewport over the
//! default ground, so pointer input can be given in world coordinates.

use glam::{Vec2, Vec3};
use shared::{CatalogEntry, ObjectId};

use crate::catalog::AssetCatalog;
use crate::fixtures;
use crate::input::{PointerFrame, TouchPhase};
use crate::state::manipulation::ManipulationMode;
use crate::state::scene::SceneObject;
use crate::state::{EditorSession, EditorSettings};
use crate::viewport::{Environment, TopDownCamera, Viewport};

/// Viewport size of the headless camera, in pixels
pub const VIEWPORT_SIZE: f32 = 1000.0;
/// Pixels per world unit of the headless camera
pub const PIXELS_PER_UNIT: f32 = 10.0;

/// Session plus a viewport and a loaded catalog
pub struct HeadlessEditor {
    pub session: EditorSession,
    pub world: Viewport<TopDownCamera>,
    pub catalog: AssetCatalog,
}

impl Default for HeadlessEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessEditor {
    /// Editor over the fixture catalog
    pub fn new() -> Self {
        Self::with_catalog(AssetCatalog::with_entries(fixtures::catalog_entries()))
    }

    pub fn with_catalog(catalog: AssetCatalog) -> Self {
        Self {
            session: EditorSession::new(EditorSettings::default()),
            world: Viewport::new(
                TopDownCamera::new(Vec2::splat(VIEWPORT_SIZE), PIXELS_PER_UNIT),
                Environment::default(),
            ),
            catalog,
        }
    }

    // ── Pointer input ─────────────────────────────────────────

    /// Screen position above a ground point
    pub fn screen_of(&self, x: f32, z: f32) -> Vec2 {
        self.world.camera.world_to_screen(Vec3::new(x, 0.0, z))
    }

    /// Feed one raw pointer frame
    pub fn frame(&mut self, frame: PointerFrame) {
        self.session.tick(&frame, &self.world);
    }

    pub fn pointer(&mut self, pos: Vec2, phase: TouchPhase, over_ui: bool) {
        let mut frame = PointerFrame::single(pos, phase);
        frame.over_ui = over_ui;
        self.frame(frame);
    }

    /// Press and release above a ground point
    pub fn tap(&mut self, x: f32, z: f32) {
        let pos = self.screen_of(x, z);
        self.pointer(pos, TouchPhase::Begin, false);
        self.pointer(pos, TouchPhase::End, false);
        self.frame(PointerFrame::idle());
    }

    /// Run a whole gesture: enter `mode` with the pointer at `from`, drag to
    /// `to`, release. Points are ground coordinates (x, z).
    pub fn drag(&mut self, mode: ManipulationMode, from: [f32; 2], to: [f32; 2]) {
        let start = self.screen_of(from[0], from[1]);
        let end = self.screen_of(to[0], to[1]);

        self.session.set_manipulation_mode_at(mode, start);
        self.pointer(start, TouchPhase::Moving, false);
        self.pointer(end, TouchPhase::Moving, false);
        self.pointer(end, TouchPhase::End, false);
        self.frame(PointerFrame::idle());
    }

    // ── Editing ───────────────────────────────────────────────

    /// Arm placement of a catalog entry. Returns false for unknown ids.
    pub fn pick_entry(&mut self, id: &str) -> bool {
        match self.catalog.lookup(id) {
            Some(entry) => {
                self.session.pick_catalog_entry(entry);
                true
            }
            None => {
                tracing::warn!("Unknown catalog entry {id:?}");
                false
            }
        }
    }

    /// Place an entry at a ground point. Returns the new object, which is
    /// left selected.
    pub fn place(&mut self, id: &str, x: f32, z: f32) -> Option<ObjectId> {
        if !self.pick_entry(id) {
            return None;
        }
        self.tap(x, z);
        self.selected().cloned()
    }

    /// Place an explicit entry, bypassing the catalog
    pub fn place_entry(&mut self, entry: CatalogEntry, x: f32, z: f32) -> Option<ObjectId> {
        self.session.pick_catalog_entry(entry);
        self.tap(x, z);
        self.selected().cloned()
    }

    pub fn set_mode(&mut self, mode: ManipulationMode) {
        self.session.set_manipulation_mode(mode);
    }

    pub fn delete_selected(&mut self) -> bool {
        self.session.delete_selected()
    }

    pub fn deselect(&mut self) {
        self.session.deselect();
    }

    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn selected(&self) -> Option<&ObjectId> {
        self.session.selection().selected_object()
    }

    pub fn object(&self, id: &str) -> Option<&SceneObject> {
        self.session.scene.get_object(id)
    }

    pub fn position(&self, id: &str) -> Option<Vec3> {
        self.object(id).map(|o| o.position)
    }

    /// Number of objects in the active set
    pub fn object_count(&self) -> usize {
        self.session.scene.active_count()
    }

    pub fn history_len(&self) -> usize {
        self.session.scene.history().len()
    }

    /// The current active set as snapshot JSON
    pub fn export_snapshot_json(&self) -> String {
        serde_json::to_string_pretty(&self.session.snapshot()).unwrap_or_default()
    }
}
