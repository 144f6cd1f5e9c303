pub mod action;
pub mod events;
pub mod manipulation;
pub mod scene;
pub mod selection;
pub mod settings;

use glam::Vec2;
use shared::{AssetId, CatalogEntry, SceneSnapshot};
use tokio::sync::broadcast;

pub use action::{Action, ActionKind};
pub use events::{EditorEvent, EventCategory, EventFilter, SubscriptionId};
pub use manipulation::ManipulationMode;
pub use scene::{object_display_name, short_id, RestoreReport, SceneState};
pub use selection::{SelectionMachine, SelectionState};
pub use settings::{EditorSettings, ManipulationSettings, NavigationSettings, StorageSettings};

use crate::catalog::AssetCatalog;
use crate::error::PersistenceError;
use crate::input::PointerFrame;
use crate::storage::SnapshotStore;
use crate::viewport::{ArcBallCamera, NavigationGesture, WorldQuery};
use events::EventBus;

/// One editing session: the scene, its history, the selection machines
/// and the observers listening to them.
pub struct EditorSession {
    pub scene: SceneState,
    selection: SelectionMachine,
    pub settings: EditorSettings,
    events: EventBus,
    /// Catalog entries pinned for quick placement, in pin order
    shortcuts: Vec<AssetId>,
    /// Last pointer position seen, where mode switches start their gesture
    last_pointer: Vec2,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl EditorSession {
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            scene: SceneState::default(),
            selection: SelectionMachine::default(),
            settings,
            events: EventBus::new(),
            shortcuts: Vec::new(),
            last_pointer: Vec2::ZERO,
        }
    }

    pub fn selection(&self) -> &SelectionMachine {
        &self.selection
    }

    pub fn manipulation_mode(&self) -> ManipulationMode {
        self.selection.manipulation_mode()
    }

    // ── Events ──────────────────────────────────────────────────

    pub fn subscribe<F>(&mut self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: FnMut(&EditorEvent) + 'static,
    {
        self.events.subscribe(filter, handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Broadcast receiver for async consumers
    pub fn event_receiver(&self) -> broadcast::Receiver<EditorEvent> {
        self.events.receiver()
    }

    /// Publish queued events and route the ones the selection reacts to.
    /// Routing may queue more events; those go out in the same call.
    fn dispatch_events(&mut self) {
        loop {
            let pending = self.scene.drain_events();
            if pending.is_empty() {
                break;
            }
            for event in pending {
                self.events.publish(&event);
                if let EditorEvent::ObjectCreated { object, .. } = event {
                    self.selection.on_object_created(object, &mut self.scene);
                }
            }
        }
    }

    // ── Input ───────────────────────────────────────────────────

    /// One frame of pointer input
    pub fn tick(&mut self, frame: &PointerFrame, world: &dyn WorldQuery) {
        if let Some(touch) = frame.primary() {
            self.last_pointer = touch.position;
        }
        self.selection
            .update(frame, world, &mut self.scene, &self.settings.manipulation);
        self.dispatch_events();
    }

    /// Arm placement of a catalog entry
    pub fn pick_catalog_entry(&mut self, entry: CatalogEntry) {
        tracing::info!("Placing {}", entry.display_name);
        self.selection.select_entry(entry, &mut self.scene);
        self.dispatch_events();
    }

    /// Drop a pending placement. Returns false if none was pending.
    pub fn cancel_placement(&mut self) -> bool {
        if self.selection.selected_entry().is_none() {
            return false;
        }
        self.selection.deselect(&mut self.scene);
        self.dispatch_events();
        true
    }

    pub fn deselect(&mut self) {
        self.selection.deselect(&mut self.scene);
        self.dispatch_events();
    }

    /// Soft-delete the selected object
    pub fn delete_selected(&mut self) -> bool {
        let deleted = self.selection.delete_selected(&mut self.scene);
        self.dispatch_events();
        deleted
    }

    /// Switch manipulation mode; the gesture starts at the last pointer position
    pub fn set_manipulation_mode(&mut self, mode: ManipulationMode) {
        let pointer = self.last_pointer;
        self.set_manipulation_mode_at(mode, pointer);
    }

    /// Switch manipulation mode with the gesture starting at `pointer`
    pub fn set_manipulation_mode_at(&mut self, mode: ManipulationMode, pointer: Vec2) {
        self.last_pointer = pointer;
        self.selection
            .set_manipulation_mode(mode, pointer, &mut self.scene);
        self.dispatch_events();
    }

    /// Deselect, then revert the most recent action
    pub fn undo(&mut self) -> bool {
        self.selection.deselect(&mut self.scene);
        let undone = self.scene.undo_last();
        self.dispatch_events();
        undone
    }

    /// Move the camera for a two-finger gesture. Ignored unless nothing is
    /// selected; returns whether the camera moved.
    pub fn navigate(&self, camera: &mut ArcBallCamera, gesture: NavigationGesture) -> bool {
        if *self.selection.state() != SelectionState::NoSelection {
            tracing::debug!("Navigation ignored in {}", self.selection.state().name());
            return false;
        }
        camera.navigate(gesture, &self.settings.navigation);
        true
    }

    // ── Catalog shortcuts ───────────────────────────────────────

    /// Pin or unpin an entry. Returns true if it is pinned afterwards.
    pub fn toggle_shortcut(&mut self, id: &str) -> bool {
        if let Some(pos) = self.shortcuts.iter().position(|s| s == id) {
            self.shortcuts.remove(pos);
            false
        } else {
            self.shortcuts.push(id.to_string());
            true
        }
    }

    pub fn is_shortcut(&self, id: &str) -> bool {
        self.shortcuts.iter().any(|s| s == id)
    }

    pub fn shortcuts(&self) -> &[AssetId] {
        &self.shortcuts
    }

    /// Whether `id` is the entry waiting for placement
    pub fn is_entry_selected(&self, id: &str) -> bool {
        self.selection
            .selected_entry()
            .is_some_and(|entry| entry.id == id)
    }

    // ── Scene lifetime ──────────────────────────────────────────

    /// Current active set as an unnamed snapshot
    pub fn snapshot(&self) -> SceneSnapshot {
        self.scene.snapshot()
    }

    /// Destroy every object, forget the history and reset the selection
    pub fn new_scene(&mut self) {
        self.selection.deselect(&mut self.scene);
        self.scene.remove_all();
        self.scene.clear_history();
        self.dispatch_events();
        tracing::info!("Started a new scene");
    }

    /// Write the current scene. A blank name is saved as "empty".
    /// Returns the storage key.
    ///
    /// The selection and any gesture in flight are left alone; the file
    /// holds the live transforms.
    pub async fn save_scene(&self, store: &SnapshotStore, name: &str) -> Result<String, PersistenceError> {
        let mut snapshot = self.scene.snapshot();
        snapshot.name = match name.trim() {
            "" => "empty".to_string(),
            trimmed => trimmed.to_string(),
        };
        store.write_snapshot(&snapshot).await
    }

    /// Replace the current scene with a stored one.
    ///
    /// Waits for the catalog to finish loading. Items whose asset cannot be
    /// resolved are skipped and listed in the report.
    pub async fn load_scene(
        &mut self,
        store: &SnapshotStore,
        catalog: &AssetCatalog,
        storage_key: &str,
    ) -> Result<RestoreReport, PersistenceError> {
        let snapshot = store.read_snapshot(storage_key).await?;
        catalog.wait_until_loaded().await?;

        tracing::info!(
            "Loading scene {:?}: {} item(s), {} distinct asset(s)",
            snapshot.name,
            snapshot.items.len(),
            snapshot.distinct_assets()
        );

        self.new_scene();
        let report = self.scene.restore(&snapshot, |id| catalog.lookup(id));
        if report.is_partial() {
            tracing::warn!(
                "Scene {:?} loaded partially: {} unresolved item(s)",
                snapshot.name,
                report.skipped.len()
            );
        }
        self.scene.emit(EditorEvent::SceneRestored {
            restored: report.restored.len(),
            skipped: report.skipped.len(),
        });
        self.dispatch_events();
        Ok(report)
    }
}
