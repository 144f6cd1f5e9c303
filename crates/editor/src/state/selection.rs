//! Top-level selection state
//!
//! Decides per tick whether the pointer picks an existing object, places the
//! catalog entry waiting for placement, or drives the manipulation of the
//! selected object.

use glam::Vec2;
use shared::{CatalogEntry, ObjectId};

use crate::input::PointerFrame;
use crate::state::action::Action;
use crate::state::events::EditorEvent;
use crate::state::manipulation::{ManipulationMachine, ManipulationMode};
use crate::state::scene::{short_id, RenderLayer, SceneState};
use crate::state::settings::ManipulationSettings;
use crate::viewport::{Layer, WorldQuery};

/// What the pointer currently acts on
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    NoSelection,
    /// A catalog entry is waiting to be placed
    DataSelected(CatalogEntry),
    /// An existing object is being edited
    ItemSelected(ObjectId),
}

impl SelectionState {
    pub fn name(&self) -> &'static str {
        match self {
            SelectionState::NoSelection => "NoSelection",
            SelectionState::DataSelected(_) => "DataSelected",
            SelectionState::ItemSelected(_) => "ItemSelected",
        }
    }
}

/// Selection state plus the manipulation machine it owns
#[derive(Debug, Default)]
pub struct SelectionMachine {
    state: SelectionState,
    manipulation: ManipulationMachine,
}

impl SelectionMachine {
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Object being edited, if any
    pub fn selected_object(&self) -> Option<&ObjectId> {
        match &self.state {
            SelectionState::ItemSelected(id) => Some(id),
            _ => None,
        }
    }

    /// Entry waiting for placement, if any
    pub fn selected_entry(&self) -> Option<&CatalogEntry> {
        match &self.state {
            SelectionState::DataSelected(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn manipulation_mode(&self) -> ManipulationMode {
        self.manipulation.mode()
    }

    /// Arm placement of `entry`
    pub fn select_entry(&mut self, entry: CatalogEntry, scene: &mut SceneState) {
        self.set_state(SelectionState::DataSelected(entry), scene);
    }

    /// Start editing an existing object
    pub fn select_object(&mut self, id: ObjectId, scene: &mut SceneState) {
        self.set_state(SelectionState::ItemSelected(id), scene);
    }

    /// Return to browsing. An active gesture is committed first.
    pub fn deselect(&mut self, scene: &mut SceneState) {
        self.set_state(SelectionState::NoSelection, scene);
    }

    /// Switch the manipulation mode of the selected object.
    /// Ignored unless an object is selected.
    pub fn set_manipulation_mode(&mut self, mode: ManipulationMode, pointer: Vec2, scene: &mut SceneState) {
        if self.selected_object().is_none() {
            tracing::debug!("Ignoring {:?}: no object selected", mode);
            return;
        }
        self.manipulation.set_mode(mode, pointer, scene);
    }

    /// Soft-delete the selected object and return to browsing.
    /// Returns false when nothing was selected.
    pub fn delete_selected(&mut self, scene: &mut SceneState) -> bool {
        let Some(id) = self.selected_object().cloned() else {
            return false;
        };
        self.set_state(SelectionState::NoSelection, scene);
        Action::delete(id).apply(scene)
    }

    /// A create action produced `id`: edit it right away
    pub fn on_object_created(&mut self, id: ObjectId, scene: &mut SceneState) {
        self.set_state(SelectionState::ItemSelected(id), scene);
    }

    /// One tick of pointer handling
    pub fn update(
        &mut self,
        frame: &PointerFrame,
        world: &dyn WorldQuery,
        scene: &mut SceneState,
        settings: &ManipulationSettings,
    ) {
        match self.state.clone() {
            SelectionState::NoSelection => self.update_no_selection(frame, world, scene),
            SelectionState::DataSelected(entry) => self.update_data_selected(entry, frame, world, scene),
            SelectionState::ItemSelected(id) => self.update_item_selected(&id, frame, world, scene, settings),
        }
    }

    fn update_no_selection(&mut self, frame: &PointerFrame, world: &dyn WorldQuery, scene: &mut SceneState) {
        let Some(pos) = frame.single_begin() else {
            return;
        };
        if let Some(id) = world.raycast(pos, Layer::Item, scene).and_then(|hit| hit.object) {
            self.set_state(SelectionState::ItemSelected(id), scene);
        }
    }

    fn update_data_selected(
        &mut self,
        entry: CatalogEntry,
        frame: &PointerFrame,
        world: &dyn WorldQuery,
        scene: &mut SceneState,
    ) {
        let Some(pos) = frame.primary_end() else {
            return;
        };
        let Some(hit) = world.raycast(pos, Layer::Environment, scene) else {
            return;
        };

        self.set_state(SelectionState::NoSelection, scene);
        // ObjectCreated is routed back through on_object_created by the session
        Action::create(entry, hit.point).apply(scene);
    }

    fn update_item_selected(
        &mut self,
        id: &ObjectId,
        frame: &PointerFrame,
        world: &dyn WorldQuery,
        scene: &mut SceneState,
        settings: &ManipulationSettings,
    ) {
        if !scene.is_registered(id) {
            tracing::debug!("Selected object {} left the scene", short_id(id));
            self.set_state(SelectionState::NoSelection, scene);
            return;
        }

        if self.manipulation.mode() == ManipulationMode::None {
            let begin = frame
                .primary()
                .filter(|t| t.phase == crate::input::TouchPhase::Begin && !frame.over_ui);
            if let Some(touch) = begin {
                if world.raycast(touch.position, Layer::Item, scene).is_none() {
                    self.set_state(SelectionState::NoSelection, scene);
                    return;
                }
            }
        }

        self.manipulation.update(frame, world, scene, settings);
    }

    fn set_state(&mut self, next: SelectionState, scene: &mut SceneState) {
        let leaving = self.selected_object().cloned();
        if let Some(id) = &leaving {
            self.manipulation.detach(scene);
            scene.set_layer(id, RenderLayer::Item);
        } else if self.manipulation.is_attached() {
            self.manipulation.detach(scene);
        }

        match &next {
            SelectionState::NoSelection => {
                if leaving.is_some() {
                    scene.emit(EditorEvent::StopEditing);
                }
            }
            SelectionState::DataSelected(_) => {}
            SelectionState::ItemSelected(id) => {
                scene.set_layer(id, RenderLayer::Highlighted);
                self.manipulation.attach(id.clone());
                scene.emit(EditorEvent::StartEditing { object: id.clone() });
            }
        }

        tracing::debug!("Selection {} -> {}", self.state.name(), next.name());
        self.state = next;
    }
}
