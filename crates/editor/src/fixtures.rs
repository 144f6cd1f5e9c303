//! Factory functions for creating test data.
//!
//! Provides catalog entries, lookups and snapshots used by tests and by the
//! headless command interface.

use shared::*;

// ── Catalog factories ───────────────────────────────────────────

/// Create an entry with a template of the given size, resting on the ground.
pub fn entry(id: &str, name: &str, size: [f32; 3]) -> CatalogEntry {
    CatalogEntry {
        id: id.to_string(),
        display_name: name.to_string(),
        template: Some(InstantiationTemplate {
            bounds_center: Some([0.0, size[1] * 0.5, 0.0]),
            bounds_size: size,
        }),
    }
}

/// Unit crate (1x1x1).
pub fn crate_entry() -> CatalogEntry {
    entry("crate", "Crate", [1.0, 1.0, 1.0])
}

/// Tall, thin lamp post.
pub fn lamp_entry() -> CatalogEntry {
    entry("lamp", "Lamp", [0.4, 3.0, 0.4])
}

/// Entry with a template that no catalog returned by [`lookup`] knows about.
pub fn ghost_entry() -> CatalogEntry {
    entry("ghost", "Ghost", [1.0, 1.0, 1.0])
}

/// Entry listed in the catalog but without geometry.
pub fn broken_entry() -> CatalogEntry {
    CatalogEntry {
        id: "broken".to_string(),
        display_name: "Broken".to_string(),
        template: None,
    }
}

/// Entries known to the default test catalog.
pub fn catalog_entries() -> Vec<CatalogEntry> {
    vec![crate_entry(), lamp_entry(), broken_entry()]
}

/// Lookup over [`catalog_entries`].
pub fn lookup(id: &str) -> Option<CatalogEntry> {
    catalog_entries().into_iter().find(|e| e.id == id)
}

// ── Snapshot factories ──────────────────────────────────────────

/// Snapshot item with no rotation and unit scale.
pub fn item_at(asset_id: &str, pos: [f32; 3]) -> SnapshotItem {
    SnapshotItem {
        asset_id: asset_id.to_string(),
        position: Vec3Record::from(pos),
        rotation_euler: Vec3Record::default(),
        scale: Vec3Record::new(1.0, 1.0, 1.0),
    }
}

/// Named snapshot holding the given items.
pub fn snapshot(name: &str, items: Vec<SnapshotItem>) -> SceneSnapshot {
    SceneSnapshot {
        name: name.to_string(),
        storage_key: String::new(),
        items,
    }
}

/// Snapshot with one crate and one lamp.
pub fn two_item_snapshot() -> SceneSnapshot {
    snapshot(
        "Two items",
        vec![item_at("crate", [1.0, 0.0, 1.0]), item_at("lamp", [-2.0, 0.0, 3.0])],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert!(lookup("crate").is_some());
        assert!(lookup("broken").unwrap().template.is_none());
        assert!(lookup("ghost").is_none());
    }

    #[test]
    fn test_entry_rests_on_ground() {
        let lamp = lamp_entry();
        let template = lamp.template.unwrap();
        assert_eq!(template.center(), [0.0, 1.5, 0.0]);
    }

    #[test]
    fn test_two_item_snapshot() {
        let snap = two_item_snapshot();
        assert_eq!(snap.items.len(), 2);
        assert_eq!(snap.distinct_assets(), 2);
    }
}
