//! JSON command protocol for driving the editor without a window.
//!
//! Ground positions are `(x, z)` world coordinates; `pointer` takes raw
//! screen pixels.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::harness::HeadlessEditor;
use crate::input::TouchPhase;
use crate::state::manipulation::ManipulationMode;
use crate::state::scene::{object_display_name, quat_to_euler_degrees};

/// A command the editor can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Arm placement of a catalog entry
    PickEntry { id: String },
    /// Drop a pending placement
    CancelPlacement,
    /// Press and release above a ground point
    Tap { x: f32, z: f32 },
    /// One raw pointer frame in screen pixels
    Pointer {
        x: f32,
        y: f32,
        phase: TouchPhase,
        #[serde(default)]
        over_ui: bool,
    },
    /// A whole manipulation gesture between two ground points
    Drag {
        mode: ManipulationMode,
        from: [f32; 2],
        to: [f32; 2],
    },
    /// Switch manipulation mode at the last pointer position
    SetMode { mode: ManipulationMode },
    /// Delete the selected object
    Delete,
    /// Clear selection.
    Deselect,
    /// Undo the last operation.
    Undo,
    /// Inspect the scene: list all active objects.
    Inspect,
    /// Export the active set as snapshot JSON.
    ExportSnapshot,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

/// Execute a single command on the editor.
pub fn execute_command(editor: &mut HeadlessEditor, cmd: AgentCommand) -> CommandResponse {
    match cmd {
        AgentCommand::PickEntry { id } => {
            if editor.pick_entry(&id) {
                CommandResponse::ok()
            } else {
                CommandResponse::err(format!("Unknown catalog entry: {id}"))
            }
        }

        AgentCommand::CancelPlacement => {
            let cancelled = editor.session.cancel_placement();
            CommandResponse::ok_with_data(serde_json::json!({ "cancelled": cancelled }))
        }

        AgentCommand::Tap { x, z } => {
            editor.tap(x, z);
            CommandResponse::ok_with_data(selection_json(editor))
        }

        AgentCommand::Pointer { x, y, phase, over_ui } => {
            editor.pointer(Vec2::new(x, y), phase, over_ui);
            CommandResponse::ok_with_data(selection_json(editor))
        }

        AgentCommand::Drag { mode, from, to } => {
            if editor.selected().is_none() {
                return CommandResponse::err("No object selected");
            }
            editor.drag(mode, from, to);
            CommandResponse::ok_with_data(selection_json(editor))
        }

        AgentCommand::SetMode { mode } => {
            if editor.selected().is_none() {
                return CommandResponse::err("No object selected");
            }
            editor.set_mode(mode);
            CommandResponse::ok_with_data(serde_json::json!({ "mode": mode }))
        }

        AgentCommand::Delete => {
            let deleted = editor.delete_selected();
            CommandResponse::ok_with_data(serde_json::json!({ "deleted": deleted }))
        }

        AgentCommand::Deselect => {
            editor.deselect();
            CommandResponse::ok()
        }

        AgentCommand::Undo => {
            let success = editor.undo();
            CommandResponse::ok_with_data(serde_json::json!({ "undone": success }))
        }

        AgentCommand::Inspect => {
            let objects: Vec<serde_json::Value> = editor
                .session
                .scene
                .active_objects()
                .map(|obj| {
                    serde_json::json!({
                        "id": obj.id,
                        "name": object_display_name(obj),
                        "asset_id": obj.catalog_entry_id,
                        "position": obj.position.to_array(),
                        "rotation_euler": quat_to_euler_degrees(obj.rotation),
                        "scale": obj.scale.to_array(),
                    })
                })
                .collect();
            CommandResponse::ok_with_data(serde_json::json!({
                "object_count": objects.len(),
                "objects": objects,
                "history_len": editor.history_len(),
                "selection": editor.session.selection().state().name(),
            }))
        }

        AgentCommand::ExportSnapshot => {
            let json = editor.export_snapshot_json();
            CommandResponse::ok_with_data(serde_json::json!({ "snapshot_json": json }))
        }
    }
}

fn selection_json(editor: &HeadlessEditor) -> serde_json::Value {
    serde_json::json!({
        "selection": editor.session.selection().state().name(),
        "selected": editor.selected(),
        "mode": editor.session.manipulation_mode(),
    })
}

/// Parse and execute a single JSON command string.
pub fn execute_json(editor: &mut HeadlessEditor, json: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(editor, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    editor: &mut HeadlessEditor,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(editor, cmd))
        .collect())
}
