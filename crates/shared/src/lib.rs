use serde::{Deserialize, Serialize};

/// Unique identifier of a placed object in the scene
pub type ObjectId = String;

/// Identifier of a catalog entry (the persisted `assetId`)
pub type AssetId = String;

/// Plain `{x, y, z}` record used by the persisted schema
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vec3Record {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3Record {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Vec3Record {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// What an entry instantiates: the local bounding extent of its geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstantiationTemplate {
    /// Center of the bounding box in object space. Unset means the box
    /// rests on the object's origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds_center: Option<[f32; 3]>,
    /// Full size of the bounding box in object space
    pub bounds_size: [f32; 3],
}

impl Default for InstantiationTemplate {
    fn default() -> Self {
        Self {
            bounds_center: None,
            bounds_size: [1.0, 1.0, 1.0],
        }
    }
}

impl InstantiationTemplate {
    /// Bounding box center, resolving an unset center to half the height
    pub fn center(&self) -> [f32; 3] {
        self.bounds_center
            .unwrap_or([0.0, self.bounds_size[1] * 0.5, 0.0])
    }
}

/// Read-only description of something that can be placed in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: AssetId,
    pub display_name: String,
    /// `None` when the entry is listed but its geometry is unavailable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<InstantiationTemplate>,
}

/// Catalog manifest file: a flat list of entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CatalogManifest {
    pub entries: Vec<CatalogEntry>,
}

// ============================================================================
// Scene snapshot (persisted schema)
// ============================================================================

/// One placed object as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotItem {
    pub asset_id: AssetId,
    pub position: Vec3Record,
    /// Euler angles in degrees, Y-X-Z application order
    pub rotation_euler: Vec3Record,
    pub scale: Vec3Record,
}

/// Flat projection of the live registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SceneSnapshot {
    pub name: String,
    /// File name inside the scenes folder, filled in by the store
    #[serde(default)]
    pub storage_key: String,
    #[serde(default)]
    pub items: Vec<SnapshotItem>,
}

impl SceneSnapshot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            storage_key: String::new(),
            items: Vec::new(),
        }
    }

    /// Number of distinct asset ids referenced by this snapshot
    pub fn distinct_assets(&self) -> usize {
        let mut ids: Vec<&str> = self.items.iter().map(|i| i.asset_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_field_names() {
        let mut snap = SceneSnapshot::new("Level");
        snap.storage_key = "Level.json".into();
        snap.items.push(SnapshotItem {
            asset_id: "crate".into(),
            position: Vec3Record::new(1.0, 0.0, 2.0),
            rotation_euler: Vec3Record::new(0.0, 90.0, 0.0),
            scale: Vec3Record::new(1.0, 1.0, 1.0),
        });

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["name"], "Level");
        assert_eq!(json["storageKey"], "Level.json");
        assert_eq!(json["items"][0]["assetId"], "crate");
        assert_eq!(json["items"][0]["rotationEuler"]["y"], 90.0);
        assert_eq!(json["items"][0]["position"]["z"], 2.0);
    }

    #[test]
    fn test_snapshot_parse_minimal() {
        let json = r#"{"name": "Bare"}"#;
        let snap: SceneSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.name, "Bare");
        assert!(snap.storage_key.is_empty());
        assert!(snap.items.is_empty());
    }

    #[test]
    fn test_catalog_entry_without_template() {
        let json = r#"{"id": "tree", "displayName": "Tree"}"#;
        let entry: CatalogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.display_name, "Tree");
        assert!(entry.template.is_none());
    }

    #[test]
    fn test_template_default_center() {
        let json = r#"{"id": "box", "displayName": "Box", "template": {"boundsSize": [2, 2, 2]}}"#;
        let entry: CatalogEntry = serde_json::from_str(json).unwrap();
        let template = entry.template.unwrap();
        assert_eq!(template.bounds_center, None);
        assert_eq!(template.center(), [0.0, 1.0, 0.0]);
        assert_eq!(template.bounds_size, [2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_default_center_matches_parsed() {
        let parsed: InstantiationTemplate =
            serde_json::from_str(r#"{"boundsSize": [1, 1, 1]}"#).unwrap();
        assert_eq!(parsed, InstantiationTemplate::default());
        assert_eq!(parsed.center(), [0.0, 0.5, 0.0]);

        let explicit: InstantiationTemplate =
            serde_json::from_str(r#"{"boundsCenter": [0, 0, 0], "boundsSize": [1, 1, 1]}"#)
                .unwrap();
        assert_eq!(explicit.center(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_distinct_assets() {
        let item = |id: &str| SnapshotItem {
            asset_id: id.into(),
            position: Vec3Record::default(),
            rotation_euler: Vec3Record::default(),
            scale: Vec3Record::new(1.0, 1.0, 1.0),
        };
        let mut snap = SceneSnapshot::new("s");
        snap.items = vec![item("a"), item("b"), item("a")];
        assert_eq!(snap.distinct_assets(), 2);
    }
}
