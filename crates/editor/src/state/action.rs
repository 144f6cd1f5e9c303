//! Reversible edits
//!
//! Every variant carries what it needs to revert itself. Building an action
//! changes nothing; [`Action::apply`] performs the edit and then moves the
//! action onto the scene's undo stack, so an applied action always lives
//! in the history until it is undone.

use glam::{Quat, Vec3};
use serde::Serialize;
use shared::{CatalogEntry, ObjectId};

use crate::error::EditorError;
use crate::state::events::EditorEvent;
use crate::state::scene::{short_id, SceneState};

/// Variant tag, used for logging and notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Create,
    Delete,
    Translate,
    Rotate,
    Scale,
}

impl ActionKind {
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::Create => "CreateAction",
            ActionKind::Delete => "DeleteAction",
            ActionKind::Translate => "TranslateAction",
            ActionKind::Rotate => "RotateAction",
            ActionKind::Scale => "ScaleAction",
        }
    }
}

/// Spawn data for a create, plus the object it produced once applied
#[derive(Debug, Clone, PartialEq)]
pub struct CreateAction {
    pub(crate) entry: Option<CatalogEntry>,
    pub(crate) spawn_position: Vec3,
    pub(crate) object: Option<ObjectId>,
}

impl CreateAction {
    pub fn spawn_position(&self) -> Vec3 {
        self.spawn_position
    }

    /// The instantiated object, once applied
    pub fn object(&self) -> Option<&ObjectId> {
        self.object.as_ref()
    }
}

/// A reversible scene edit
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Create(CreateAction),
    Delete { object: ObjectId },
    Translate { object: ObjectId, start: Vec3, end: Vec3 },
    Rotate { object: ObjectId, start: Quat, end: Quat },
    Scale { object: ObjectId, start: Vec3, end: Vec3 },
}

impl Action {
    pub fn create(entry: CatalogEntry, spawn_position: Vec3) -> Self {
        Action::Create(CreateAction {
            entry: Some(entry),
            spawn_position,
            object: None,
        })
    }

    pub fn delete(object: ObjectId) -> Self {
        Action::Delete { object }
    }

    pub fn translate(object: ObjectId, start: Vec3, end: Vec3) -> Self {
        Action::Translate { object, start, end }
    }

    pub fn rotate(object: ObjectId, start: Quat, end: Quat) -> Self {
        Action::Rotate { object, start, end }
    }

    pub fn scale(object: ObjectId, start: Vec3, end: Vec3) -> Self {
        Action::Scale { object, start, end }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Create(_) => ActionKind::Create,
            Action::Delete { .. } => ActionKind::Delete,
            Action::Translate { .. } => ActionKind::Translate,
            Action::Rotate { .. } => ActionKind::Rotate,
            Action::Scale { .. } => ActionKind::Scale,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Object the action edits. `None` for a create not yet applied.
    pub fn target(&self) -> Option<&ObjectId> {
        match self {
            Action::Create(create) => create.object.as_ref(),
            Action::Delete { object }
            | Action::Translate { object, .. }
            | Action::Rotate { object, .. }
            | Action::Scale { object, .. } => Some(object),
        }
    }

    /// Perform the edit and push the action onto the history.
    ///
    /// Returns false when the edit could not be performed; the problem is
    /// logged and the action is dropped without reaching the history.
    pub fn apply(mut self, scene: &mut SceneState) -> bool {
        let name = self.name();

        let applied = match &mut self {
            Action::Create(create) => apply_create(create, scene),
            Action::Delete { object } => {
                if scene.set_enabled(object, false) {
                    scene.unregister(object);
                    Ok(())
                } else {
                    Err(missing(name, object))
                }
            }
            Action::Translate { object, end, .. } => {
                scene.apply_position(object, *end).then_some(()).ok_or_else(|| missing(name, object))
            }
            Action::Rotate { object, end, .. } => {
                scene.apply_rotation(object, *end).then_some(()).ok_or_else(|| missing(name, object))
            }
            Action::Scale { object, end, .. } => {
                scene.apply_scale(object, *end).then_some(()).ok_or_else(|| missing(name, object))
            }
        };

        if let Err(err) = applied {
            tracing::error!("{name} failed: {err}");
            return false;
        }

        if let Some(target) = self.target() {
            tracing::debug!("{name} applied to {}", short_id(target));
        }
        let kind = self.kind();
        scene.history.push(self);
        scene.emit(EditorEvent::ActionApplied { kind });
        true
    }

    /// Revert the edit. Called by the history after popping the action.
    pub(crate) fn undo(self, scene: &mut SceneState) {
        let name = self.name();

        let reverted = match &self {
            Action::Create(create) => match &create.object {
                Some(object) if scene.destroy(object).is_some() => true,
                Some(_) | None => false,
            },
            Action::Delete { object } => {
                let found = scene.set_enabled(object, true);
                found && scene.register(object)
            }
            Action::Translate { object, start, .. } => scene.apply_position(object, *start),
            Action::Rotate { object, start, .. } => scene.apply_rotation(object, *start),
            Action::Scale { object, start, .. } => scene.apply_scale(object, *start),
        };

        if !reverted {
            let err = EditorError::UndoOnAlreadyReleasedObject {
                action: name,
                object: self.target().cloned().unwrap_or_default(),
            };
            tracing::warn!("{err}");
        }
    }
}

fn missing(action: &'static str, object: &ObjectId) -> EditorError {
    EditorError::MissingTarget {
        action,
        object: object.clone(),
    }
}

fn apply_create(create: &mut CreateAction, scene: &mut SceneState) -> Result<(), EditorError> {
    let entry = match &create.entry {
        Some(entry) if entry.template.is_some() => entry,
        Some(entry) => {
            return Err(EditorError::MissingCatalogEntry {
                id: entry.id.clone(),
            })
        }
        None => {
            return Err(EditorError::MissingCatalogEntry { id: String::new() });
        }
    };

    if let Some(stale) = create.object.take() {
        tracing::warn!("{}", EditorError::StaleActionReapplication { object: stale.clone() });
        scene.destroy(&stale);
    }

    let id = scene.instantiate(entry, create.spawn_position);
    scene.emit(EditorEvent::ObjectCreated {
        object: id.clone(),
        asset_id: entry.id.clone(),
    });
    create.object = Some(id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn created_id(scene: &SceneState) -> ObjectId {
        scene.history().last().and_then(|a| a.target()).cloned().unwrap()
    }

    #[test]
    fn test_construction_does_not_touch_history() {
        let scene = SceneState::default();
        let _ = Action::create(fixtures::crate_entry(), Vec3::ZERO);
        assert!(scene.history().is_empty());
    }

    #[test]
    fn test_create_apply_and_undo() {
        let mut scene = SceneState::default();
        assert!(Action::create(fixtures::crate_entry(), Vec3::new(1.0, 0.0, 2.0)).apply(&mut scene));
        let id = created_id(&scene);

        assert!(scene.is_registered(&id));
        assert_eq!(scene.get_object(&id).unwrap().position, Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(scene.history().len(), 1);

        assert!(scene.undo_last());
        assert!(!scene.contains(&id));
        assert_eq!(scene.active_count(), 0);
        assert!(scene.history().is_empty());
    }

    #[test]
    fn test_create_emits_object_created() {
        let mut scene = SceneState::default();
        Action::create(fixtures::crate_entry(), Vec3::ZERO).apply(&mut scene);
        let id = created_id(&scene);
        let events = scene.drain_events();
        assert_eq!(
            events[0],
            EditorEvent::ObjectCreated {
                object: id,
                asset_id: "crate".into()
            }
        );
        assert_eq!(
            events[1],
            EditorEvent::ActionApplied {
                kind: ActionKind::Create
            }
        );
    }

    #[test]
    fn test_create_without_template_is_noop() {
        let mut scene = SceneState::default();
        assert!(!Action::create(fixtures::broken_entry(), Vec3::ZERO).apply(&mut scene));
        assert_eq!(scene.active_count(), 0);
        assert!(scene.history().is_empty());
    }

    #[test]
    fn test_create_without_entry_is_noop() {
        let mut scene = SceneState::default();
        let action = Action::Create(CreateAction {
            entry: None,
            spawn_position: Vec3::ZERO,
            object: None,
        });
        assert!(!action.apply(&mut scene));
        assert!(scene.history().is_empty());
    }

    #[test]
    fn test_create_reapply_destroys_stale_object() {
        let mut scene = SceneState::default();
        let stale = scene.instantiate(&fixtures::crate_entry(), Vec3::ONE);

        let action = Action::Create(CreateAction {
            entry: Some(fixtures::crate_entry()),
            spawn_position: Vec3::ZERO,
            object: Some(stale.clone()),
        });
        assert!(action.apply(&mut scene));

        assert!(!scene.contains(&stale));
        assert_eq!(scene.active_count(), 1);
        assert_ne!(created_id(&scene), stale);
    }

    #[test]
    fn test_create_undo_after_external_destroy_warns_only() {
        let mut scene = SceneState::default();
        Action::create(fixtures::crate_entry(), Vec3::ZERO).apply(&mut scene);
        let id = created_id(&scene);
        scene.destroy(&id);

        assert!(scene.undo_last());
        assert!(scene.history().is_empty());
        assert_eq!(scene.active_count(), 0);
    }

    #[test]
    fn test_delete_is_soft() {
        let mut scene = SceneState::default();
        let id = scene.instantiate(&fixtures::crate_entry(), Vec3::new(2.0, 0.0, 2.0));

        assert!(Action::delete(id.clone()).apply(&mut scene));
        assert!(!scene.is_registered(&id));
        let obj = scene.get_object(&id).unwrap();
        assert!(!obj.enabled);

        assert!(scene.undo_last());
        assert!(scene.is_registered(&id));
        let obj = scene.get_object(&id).unwrap();
        assert!(obj.enabled);
        assert_eq!(obj.position, Vec3::new(2.0, 0.0, 2.0));
    }

    #[test]
    fn test_delete_missing_object_is_not_recorded() {
        let mut scene = SceneState::default();
        assert!(!Action::delete("gone".into()).apply(&mut scene));
        assert!(scene.history().is_empty());
    }

    #[test]
    fn test_transform_actions_round_trip() {
        let mut scene = SceneState::default();
        let id = scene.instantiate(&fixtures::crate_entry(), Vec3::ZERO);
        let start_rot = Quat::IDENTITY;
        let end_rot = Quat::from_rotation_y(1.0);

        Action::translate(id.clone(), Vec3::ZERO, Vec3::new(3.0, 0.0, 5.0)).apply(&mut scene);
        Action::rotate(id.clone(), start_rot, end_rot).apply(&mut scene);
        Action::scale(id.clone(), Vec3::ONE, Vec3::splat(2.0)).apply(&mut scene);

        let obj = scene.get_object(&id).unwrap();
        assert_eq!(obj.position, Vec3::new(3.0, 0.0, 5.0));
        assert_eq!(obj.rotation, end_rot);
        assert_eq!(obj.scale, Vec3::splat(2.0));

        scene.undo_last();
        assert_eq!(scene.get_object(&id).unwrap().scale, Vec3::ONE);
        scene.undo_last();
        assert_eq!(scene.get_object(&id).unwrap().rotation, start_rot);
        scene.undo_last();
        assert_eq!(scene.get_object(&id).unwrap().position, Vec3::ZERO);
    }

    #[test]
    fn test_translate_missing_object_is_not_recorded() {
        let mut scene = SceneState::default();
        let action = Action::translate("gone".into(), Vec3::ZERO, Vec3::ONE);
        assert!(!action.apply(&mut scene));
        assert!(scene.history().is_empty());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ActionKind::Translate.name(), "TranslateAction");
        let action = Action::delete("x".into());
        assert_eq!(action.kind(), ActionKind::Delete);
        assert_eq!(action.target().map(String::as_str), Some("x"));
    }
}
