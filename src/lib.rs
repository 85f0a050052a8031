//! Read-only access to the BSDS500 segmentation benchmark.
//!
//! ```no_run
//! use bsds500::{Bsds500, Dataset, DatasetConfig, SelectionMode, Split};
//!
//! let config = DatasetConfig::new("/data/BSR_bsds500")
//!     .split(Split::Train)
//!     .mode(SelectionMode::Fine);
//! let ds = Bsds500::new(config)?;
//! let sample = ds.get(0)?;
//! println!("{} {:?}", sample.image_name, sample.image.dim());
//! # Ok::<(), bsds500::DatasetError>(())
//! ```

pub mod dataset;
pub mod mat;

pub use dataset::{
    Bsds500, Dataset, DatasetConfig, DatasetError, Entry, ErrorKind, GroundTruthError, Label,
    LabelMap, LabelType, Sample, SelectionMode, Split,
};
