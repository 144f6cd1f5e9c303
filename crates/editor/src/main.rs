use std::path::PathBuf;

use scene_placer_lib::catalog::{AssetCatalog, JsonCatalogSource};
use scene_placer_lib::command::execute_json_batch;
use scene_placer_lib::harness::HeadlessEditor;
use scene_placer_lib::state::EditorSettings;
use scene_placer_lib::storage::SnapshotStore;

#[derive(Debug, Default)]
struct Args {
    catalog: Option<PathBuf>,
    folder: Option<PathBuf>,
    scene: Option<String>,
    commands: Option<PathBuf>,
    save: Option<String>,
}

const USAGE: &str = "usage: scene-placer --catalog <manifest.json> [--folder <dir>] \
[--scene <storage key>] [--commands <file.json>] [--save <name>]";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scene_placer=info,scene_placer_lib=info".into()),
        )
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(args).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), String> {
    let settings = EditorSettings::load();

    let Some(catalog_path) = args.catalog else {
        return Err(format!("--catalog is required\n{USAGE}"));
    };
    let catalog = AssetCatalog::new();
    catalog
        .load_from(&JsonCatalogSource::new(catalog_path))
        .await
        .map_err(|e| e.to_string())?;

    let store = match args.folder {
        Some(folder) => SnapshotStore::new(folder),
        None => SnapshotStore::default_location(&settings.storage)
            .ok_or("No data directory on this platform; pass --folder")?,
    };
    tracing::info!("Scenes folder: {}", store.folder().display());

    let mut editor = HeadlessEditor::with_catalog(catalog);
    editor.session.settings = settings;

    if let Some(key) = &args.scene {
        let report = editor
            .session
            .load_scene(&store, &editor.catalog, key)
            .await
            .map_err(|e| e.to_string())?;
        if report.is_partial() {
            tracing::warn!("Unresolved assets: {}", report.skipped.join(", "));
        }
    }

    if let Some(path) = &args.commands {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        let responses = execute_json_batch(&mut editor, &json)?;
        let out = serde_json::to_string_pretty(&responses).map_err(|e| e.to_string())?;
        println!("{out}");
    }

    if let Some(name) = &args.save {
        let key = editor
            .session
            .save_scene(&store, name)
            .await
            .map_err(|e| e.to_string())?;
        println!("{}", serde_json::json!({ "saved": key }));
    }

    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    while let Some(flag) = args.next() {
        let mut value = || args.next().ok_or(format!("{flag} needs a value"));
        match flag.as_str() {
            "--catalog" => parsed.catalog = Some(PathBuf::from(value()?)),
            "--folder" => parsed.folder = Some(PathBuf::from(value()?)),
            "--scene" => parsed.scene = Some(value()?),
            "--commands" => parsed.commands = Some(PathBuf::from(value()?)),
            "--save" => parsed.save = Some(value()?),
            other => return Err(format!("Unknown argument: {other}")),
        }
    }
    Ok(parsed)
}
