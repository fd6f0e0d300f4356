//! # DICOM display sets
//!
//! This crate turns flat lists of DICOM instance metadata into display sets:
//! groups of instances that a viewer presents together as one navigable
//! stack or volume.
//!
//! Instance metadata can be built by hand, read from in-memory DICOM objects
//! or loaded from a folder where each ".dcm" file is read from (in parallel
//! using rayon). Building display sets then runs in a single synchronous
//! pass:
//!  - Split: instances are partitioned by configurable split rules, the first
//!    matching rule deciding the group key
//!  - Order: each group is ordered by InstanceNumber or by the slice position
//!    along the scan axis
//!  - Analyze: single-frame stacks are checked for consistent dimensions,
//!    components, orientation and spacing, so consumers know whether they
//!    can be reconstructed into a volume
//!
//!  Geometry problems are reported as issues and messages, never as errors.
//!  The only error of the pipeline itself is an empty instance list.
//!
//! # Examples
//!
//! ## Building display sets from a directory
//!
//! ```no_run
//! # use dicom_display_sets::{BuildContext, InstanceLoader, get_display_sets_from_series};
//! let instances = InstanceLoader::load_from_directory("dicom")
//!     .expect("should have loaded files from directory");
//! let display_sets = get_display_sets_from_series(&instances, &BuildContext::default())
//!     .expect("should have built display sets");
//! for display_set in &display_sets {
//!     println!(
//!         "{} {}: reconstructable = {}",
//!         display_set.series_number,
//!         display_set.series_description,
//!         display_set.is_reconstructable
//!     );
//! }
//! ```
//!
//! ## Custom split rules
//!
//! ```
//! # use std::sync::Arc;
//! # use dicom_display_sets::{BuildContext, Instance, get_display_sets_from_series};
//! # use dicom_display_sets::metadata::Attribute;
//! # use dicom_display_sets::split_rules::SplitRule;
//! let context = BuildContext::default().with_split_rules(vec![
//!     SplitRule::by_attributes("echo", &[Attribute::SeriesInstanceUid, Attribute::SeriesNumber]),
//! ]);
//! let instances: Vec<_> = (1..=2)
//!     .map(|echo| {
//!         Arc::new(Instance {
//!             series_instance_uid: Some("1.2.3".into()),
//!             series_number: Some(echo),
//!             ..Instance::new(format!("echo-{echo}"))
//!         })
//!     })
//!     .collect();
//! let display_sets = get_display_sets_from_series(&instances, &context).unwrap();
//! assert_eq!(display_sets.len(), 2);
//! ```

pub mod builder;
pub mod config;
pub mod display_set;
pub mod dynamic_volume;
pub mod enums;
mod geometry;
pub mod instance;
pub mod instance_loader;
pub mod messages;
pub mod metadata;
pub mod reconstructability;
pub mod sop_class;
pub mod sorting;
pub mod split_rules;

pub use builder::{BuildContext, ThumbnailUrlResolver, get_display_sets_from_series};
pub use config::DisplaySetConfig;
pub use display_set::{DisplaySet, DisplaySetError, SeriesInfo};
pub use instance::Instance;
pub use instance_loader::{InstanceLoader, InstanceLoaderError};
