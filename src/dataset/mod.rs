pub mod bsds500;
pub mod config;
pub mod dataset;
pub mod error;
pub mod ground_truth;
pub mod info;
pub mod sample;

pub use bsds500::{Bsds500, Entry};
pub use config::{DatasetConfig, LabelType, SelectionMode, Split};
pub use dataset::{Dataset, DatasetIter};
pub use error::{DatasetError, ErrorKind, GroundTruthError};
pub use sample::{Label, LabelMap, Sample};
