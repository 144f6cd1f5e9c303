//! Snapshot and restore of the active set

use glam::{EulerRot, Quat, Vec3};
use shared::{AssetId, CatalogEntry, ObjectId, SceneSnapshot, SnapshotItem, Vec3Record};

use super::SceneState;
use crate::error::EditorError;

/// Outcome of restoring a snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestoreReport {
    /// Objects created, in snapshot order
    pub restored: Vec<ObjectId>,
    /// Asset ids that did not resolve, in snapshot order
    pub skipped: Vec<AssetId>,
}

impl RestoreReport {
    /// True when some items could not be resolved
    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// Convert a quaternion to Euler degrees (Y, then X, then Z), each in [0, 360)
pub fn quat_to_euler_degrees(rotation: Quat) -> Vec3Record {
    let (y, x, z) = rotation.to_euler(EulerRot::YXZ);
    let wrap = |r: f32| r.to_degrees().rem_euclid(360.0);
    Vec3Record::new(wrap(x), wrap(y), wrap(z))
}

/// Inverse of [`quat_to_euler_degrees`]
pub fn euler_degrees_to_quat(euler: Vec3Record) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        euler.y.to_radians(),
        euler.x.to_radians(),
        euler.z.to_radians(),
    )
}

impl SceneState {
    /// Project the active set into a snapshot, in registration order.
    /// Tombstones are not part of the active set and are left out.
    pub fn snapshot(&self) -> SceneSnapshot {
        let items = self
            .active_objects()
            .map(|obj| SnapshotItem {
                asset_id: obj.catalog_entry_id.clone(),
                position: Vec3Record::from(obj.position.to_array()),
                rotation_euler: quat_to_euler_degrees(obj.rotation),
                scale: Vec3Record::from(obj.scale.to_array()),
            })
            .collect();

        SceneSnapshot {
            name: String::new(),
            storage_key: String::new(),
            items,
        }
    }

    /// Instantiate every resolvable item of a snapshot with its saved transform.
    ///
    /// Items whose asset id is unknown, or known without a template, are
    /// skipped with a warning. Nothing is pushed to the history.
    pub fn restore<F>(&mut self, snapshot: &SceneSnapshot, lookup: F) -> RestoreReport
    where
        F: Fn(&str) -> Option<CatalogEntry>,
    {
        let mut report = RestoreReport::default();

        for item in &snapshot.items {
            let entry = match lookup(&item.asset_id) {
                Some(entry) if entry.template.is_some() => entry,
                _ => {
                    let err = EditorError::MissingCatalogEntry {
                        id: item.asset_id.clone(),
                    };
                    tracing::warn!("Skipping snapshot item: {err}");
                    report.skipped.push(item.asset_id.clone());
                    continue;
                }
            };

            let id = self.instantiate_with_transform(
                &entry,
                Vec3::from(item.position.to_array()),
                euler_degrees_to_quat(item.rotation_euler),
                Vec3::from(item.scale.to_array()),
            );
            report.restored.push(id);
        }

        tracing::info!(
            "Restored {} item(s) from snapshot {:?}, skipped {}",
            report.restored.len(),
            snapshot.name,
            report.skipped.len()
        );
        report
    }
}
