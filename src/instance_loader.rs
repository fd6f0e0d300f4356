use crate::instance::Instance;

use dicom::object::{FileDicomObject, InMemDicomObject, open_file};
use log::warn;
use rayon::prelude::*;
use std::{fs, path::Path, sync::Arc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstanceLoaderError {
    #[error("No valid DICOM instances found")]
    NoValidInstances,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DICOM error: {0}")]
    Dicom(#[from] dicom::object::ReadError),
}

/// Reads instance metadata from local DICOM objects and files.
pub struct InstanceLoader;

impl InstanceLoader {
    /// Load instance metadata from DICOM objects
    ///
    /// Image ids take the form `dicom:<SOPInstanceUID>`, falling back to the
    /// position in `dicom_objects` for objects without a SOP Instance UID.
    ///
    /// # Errors
    ///
    /// Returns error if `dicom_objects` is empty
    pub fn load_from_dicom_objects(
        dicom_objects: &[FileDicomObject<InMemDicomObject>],
    ) -> Result<Vec<Arc<Instance>>, InstanceLoaderError> {
        if dicom_objects.is_empty() {
            return Err(InstanceLoaderError::NoValidInstances);
        }

        Ok(dicom_objects
            .iter()
            .enumerate()
            .map(|(index, dicom_object)| {
                let mut instance = Instance::from_dicom_object(dicom_object, "");
                instance.image_id = match &instance.sop_instance_uid {
                    Some(uid) => format!("dicom:{uid}"),
                    None => format!("dicom:#{index}"),
                };
                Arc::new(instance)
            })
            .collect())
    }

    /// Load instance metadata from file paths
    ///
    /// Files are parsed in parallel. Image ids take the form
    /// `dicomfile:<path>` and follow the order of `paths`.
    ///
    /// # Errors
    ///
    /// Returns the first error hit while opening a file
    pub fn load_from_file_paths(
        paths: &[impl AsRef<Path> + Sync],
    ) -> Result<Vec<Arc<Instance>>, InstanceLoaderError> {
        if paths.is_empty() {
            return Err(InstanceLoaderError::NoValidInstances);
        }

        paths
            .par_iter()
            .map(|path| Self::load_file(path.as_ref()))
            .collect()
    }

    /// Load instance metadata from a directory containing .dcm files
    ///
    /// Files that cannot be read as DICOM are skipped with a warning. The
    /// result is ordered by file path.
    pub fn load_from_directory(
        path: impl AsRef<Path>,
    ) -> Result<Vec<Arc<Instance>>, InstanceLoaderError> {
        let mut paths: Vec<_> = fs::read_dir(path.as_ref())?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("dcm"))
            })
            .collect();
        paths.sort();

        let instances: Vec<_> = paths
            .par_iter()
            .filter_map(|path| match Self::load_file(path) {
                Ok(instance) => Some(instance),
                Err(err) => {
                    warn!("Skipping {}: {err}", path.display());
                    None
                }
            })
            .collect();

        if instances.is_empty() {
            return Err(InstanceLoaderError::NoValidInstances);
        }

        Ok(instances)
    }

    fn load_file(path: &Path) -> Result<Arc<Instance>, InstanceLoaderError> {
        let dicom_object = open_file(path)?;
        let image_id = format!("dicomfile:{}", path.display());
        Ok(Arc::new(Instance::from_dicom_object(&dicom_object, image_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inputs_are_rejected() {
        assert!(matches!(
            InstanceLoader::load_from_dicom_objects(&[]),
            Err(InstanceLoaderError::NoValidInstances)
        ));
        let no_paths: [&Path; 0] = [];
        assert!(matches!(
            InstanceLoader::load_from_file_paths(&no_paths),
            Err(InstanceLoaderError::NoValidInstances)
        ));
    }

    #[test]
    fn directory_without_dicom_files_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("notes.txt"), "not dicom").unwrap();
        fs::write(temp.path().join("broken.dcm"), "not dicom either").unwrap();
        assert!(matches!(
            InstanceLoader::load_from_directory(temp.path()),
            Err(InstanceLoaderError::NoValidInstances)
        ));
    }
}
