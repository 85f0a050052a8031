use std::path::PathBuf;

use thiserror::Error;

use crate::mat::MatError;

use super::config::LabelType;

/// Coarse classification of a [`DatasetError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad construction parameters or a dataset tree that is not where it should be
    Configuration,
    /// Index outside `[0, len)`
    OutOfBounds,
    /// A single sample could not be read; other indices are unaffected
    Decode,
}

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Invalid split '{0}', expected one of: train, test, val")]
    InvalidSplit(String),

    #[error("Invalid label type '{0}', expected one of: segmentation, boundary")]
    InvalidLabelType(String),

    #[error("Invalid mode '{0}', expected one of: fine, coarse, all")]
    InvalidMode(String),

    #[error(
        "Dataset layout not found under {}: neither {} nor {} is a directory",
        .root.display(),
        .primary.display(),
        .fallback.display()
    )]
    LayoutNotFound {
        root: PathBuf,
        primary: PathBuf,
        fallback: PathBuf,
    },

    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Index {index} out of bounds for dataset of size {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Failed to decode image {}: {source}", .path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Unexpected image buffer for {}: {source}", .path.display())]
    ImageShape {
        path: PathBuf,
        #[source]
        source: ndarray::ShapeError,
    },

    #[error("Failed to read ground truth {}: {source}", .path.display())]
    MatDecode {
        path: PathBuf,
        #[source]
        source: MatError,
    },

    #[error("Malformed ground truth {}: {source}", .path.display())]
    GroundTruth {
        path: PathBuf,
        #[source]
        source: GroundTruthError,
    },
}

/// A readable MAT-file whose contents are not a BSDS500 annotation bundle.
#[derive(Error, Debug)]
pub enum GroundTruthError {
    #[error("no '{0}' variable")]
    MissingVariable(&'static str),

    #[error("'{name}' is a {found}, not a cell array")]
    NotACell { name: &'static str, found: &'static str },

    #[error("annotation {index}: expected a struct, found {found}")]
    NotAStruct { index: usize, found: &'static str },

    #[error("annotation {index}: missing {label_type} field")]
    MissingField { index: usize, label_type: LabelType },

    #[error("annotation {index}: {label_type} field is {found}, not numeric")]
    NotNumeric {
        index: usize,
        label_type: LabelType,
        found: &'static str,
    },

    #[error("annotation {index}: {source}")]
    Shape {
        index: usize,
        #[source]
        source: MatError,
    },

    #[error("annotation {index}: {label_type} map holds non-label value {value}")]
    InvalidLabel {
        index: usize,
        label_type: LabelType,
        value: f64,
    },

    #[error("no annotations to select from")]
    NoAnnotations,
}

impl DatasetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DatasetError::InvalidSplit(_)
            | DatasetError::InvalidLabelType(_)
            | DatasetError::InvalidMode(_)
            | DatasetError::LayoutNotFound { .. }
            | DatasetError::DirectoryNotFound(_)
            | DatasetError::IoError(_) => ErrorKind::Configuration,
            DatasetError::IndexOutOfBounds { .. } => ErrorKind::OutOfBounds,
            DatasetError::ImageDecode { .. }
            | DatasetError::ImageShape { .. }
            | DatasetError::MatDecode { .. }
            | DatasetError::GroundTruth { .. } => ErrorKind::Decode,
        }
    }
}
