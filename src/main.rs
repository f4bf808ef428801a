use clap::Parser;
use log::{info, warn};
use propmap::export::ExportSession;
use propmap::import::ImportSession;
use propmap::scene::decoder::ObjMeshDecoder;
use propmap::scene::graph::InMemoryScene;
use propmap::settings::{CliArgs, ExportSettings, ImportOptions, OperationMode};
use std::path::Path;

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let args = CliArgs::parse();
    log::trace!("Starting with args: {:?}", args);

    match &args.operation_mode {
        OperationMode::Import { map_file, options } => {
            let mut scene = InMemoryScene::new();
            import_into(&mut scene, map_file, &args.libs_dir, options)?;
        }
        OperationMode::Roundtrip {
            map_file,
            out_file,
            options,
            export_scale_factor,
            export_collection,
        } => {
            let mut scene = InMemoryScene::new();
            import_into(&mut scene, map_file, &args.libs_dir, options)?;

            let export_settings = ExportSettings {
                scale_factor: *export_scale_factor,
                axis_up: options.axis_up,
                angle_mode: options.angle_mode,
                selected_only: false,
                collection: export_collection.clone(),
            };
            let outcome = ExportSession::new(export_settings, &scene).run_to_file(out_file)?;

            if outcome.skipped > 0 {
                warn!(
                    "Exported {} objects to {} (skipped {} objects with invalid names: {})",
                    outcome.exported,
                    out_file.display(),
                    outcome.skipped,
                    outcome.skipped_preview()
                );
            } else {
                info!(
                    "Successfully exported {} objects to {} in {:.2} seconds",
                    outcome.exported,
                    out_file.display(),
                    outcome.elapsed.as_secs_f64()
                );
            }
        }
    }

    Ok(())
}

fn import_into(
    scene: &mut InMemoryScene,
    map_file: &Path,
    libs_dir: &Path,
    options: &ImportOptions,
) -> Result<(), anyhow::Error> {
    let decoder = ObjMeshDecoder;
    let mut session = ImportSession::new(options.to_settings(), &decoder, scene);
    let stats = session.run(map_file, libs_dir)?;

    info!(
        "Map imported in {:.2} seconds: {} instances created, {} placements skipped, {} libraries indexed",
        stats.elapsed.as_secs_f64(),
        stats.instances_created,
        stats.placements_skipped,
        stats.libraries_loaded
    );
    Ok(())
}
