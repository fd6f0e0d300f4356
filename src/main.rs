use std::{env, path::PathBuf, process::ExitCode};

use dicom_display_sets::{
    BuildContext, DisplaySetConfig, InstanceLoader, dynamic_volume::TemporalPositionDetector,
    get_display_sets_from_series,
};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args_os().skip(1);
    let directory = args.next().map(PathBuf::from).unwrap_or_else(|| "dicom".into());
    let config = match args.next() {
        Some(path) => match DisplaySetConfig::from_file(&path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("{}: {err}", PathBuf::from(path).display());
                return ExitCode::FAILURE;
            }
        },
        None => DisplaySetConfig::default(),
    };

    let context = match BuildContext::new(config) {
        Ok(context) => context.with_dynamic_volume_detector(TemporalPositionDetector),
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let instances = match InstanceLoader::load_from_directory(&directory) {
        Ok(instances) => instances,
        Err(err) => {
            log::error!("{}: {err}", directory.display());
            return ExitCode::FAILURE;
        }
    };
    log::info!("Loaded {} instances from {}", instances.len(), directory.display());

    let display_sets = match get_display_sets_from_series(&instances, &context) {
        Ok(display_sets) => display_sets,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    for display_set in &display_sets {
        let issues: Vec<_> = display_set
            .reconstruction_issues
            .iter()
            .map(|issue| issue.as_str())
            .collect();
        println!(
            "{} [{}] #{} {:?} {}: {} frames, reconstructable: {} {:?}, loader: {}",
            display_set.display_set_instance_uid,
            display_set.modality.as_deref().unwrap_or("??"),
            display_set.series_number,
            display_set.series_description,
            display_set.split_key,
            display_set.num_image_frames,
            display_set.is_reconstructable,
            issues,
            display_set.volume_loader_scheme,
        );
    }

    ExitCode::SUCCESS
}
