use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::error::DatasetError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    #[default]
    Test,
    Val,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Test, Split::Val];

    /// Name of the split's sub-directory under `images/` and `groundTruth/`.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
            Split::Val => "val",
        }
    }
}

impl FromStr for Split {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "train" => Ok(Split::Train),
            "test" => Ok(Split::Test),
            "val" => Ok(Split::Val),
            _ => Err(DatasetError::InvalidSplit(s.to_string())),
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Which of the two maps in each annotation is read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LabelType {
    #[default]
    Segmentation,
    Boundary,
}

impl LabelType {
    /// Position of the map inside each per-annotator ground truth record.
    pub fn field_index(&self) -> usize {
        match self {
            LabelType::Segmentation => 0,
            LabelType::Boundary => 1,
        }
    }
}

impl FromStr for LabelType {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "segmentation" | "seg" | "seg_label_type" => Ok(LabelType::Segmentation),
            "boundary" | "boundaries" | "boundary_label_type" => Ok(LabelType::Boundary),
            _ => Err(DatasetError::InvalidLabelType(s.to_string())),
        }
    }
}

impl fmt::Display for LabelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelType::Segmentation => f.write_str("segmentation"),
            LabelType::Boundary => f.write_str("boundary"),
        }
    }
}

/// How a sample's label is picked from the annotations of its image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SelectionMode {
    /// The annotation with the most distinct labels
    Fine,
    /// The annotation with the fewest distinct labels
    #[default]
    Coarse,
    /// Every annotation, in file order
    All,
}

impl FromStr for SelectionMode {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fine" | "fine_mode" => Ok(SelectionMode::Fine),
            "coarse" | "coarse_mode" => Ok(SelectionMode::Coarse),
            "all" | "all_mode" => Ok(SelectionMode::All),
            _ => Err(DatasetError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMode::Fine => f.write_str("fine"),
            SelectionMode::Coarse => f.write_str("coarse"),
            SelectionMode::All => f.write_str("all"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetConfig {
    pub root: PathBuf,
    pub split: Split,
    pub label_type: LabelType,
    pub mode: SelectionMode,
}

impl DatasetConfig {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            split: Split::default(),
            label_type: LabelType::default(),
            mode: SelectionMode::default(),
        }
    }

    pub fn from_strs<P: AsRef<Path>>(
        root: P,
        split: &str,
        label_type: &str,
        mode: &str,
    ) -> Result<Self, DatasetError> {
        Ok(Self {
            root: root.as_ref().to_path_buf(),
            split: split.parse()?,
            label_type: label_type.parse()?,
            mode: mode.parse()?,
        })
    }

    pub fn split(mut self, split: Split) -> Self {
        self.split = split;
        self
    }

    pub fn label_type(mut self, label_type: LabelType) -> Self {
        self.label_type = label_type;
        self
    }

    pub fn mode(mut self, mode: SelectionMode) -> Self {
        self.mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::error::ErrorKind;

    #[test]
    fn parses_every_split() {
        for split in Split::ALL {
            assert_eq!(split.dir_name().parse::<Split>().unwrap(), split);
        }
        assert_eq!("TEST".parse::<Split>().unwrap(), Split::Test);
    }

    #[test]
    fn accepts_long_spellings() {
        assert_eq!("FINE_MODE".parse::<SelectionMode>().unwrap(), SelectionMode::Fine);
        assert_eq!("all_mode".parse::<SelectionMode>().unwrap(), SelectionMode::All);
        assert_eq!(
            "BOUNDARY_LABEL_TYPE".parse::<LabelType>().unwrap(),
            LabelType::Boundary
        );
        assert_eq!("seg".parse::<LabelType>().unwrap(), LabelType::Segmentation);
    }

    #[test]
    fn invalid_values_are_configuration_errors() {
        let err = DatasetConfig::from_strs("/data", "validation", "segmentation", "fine").unwrap_err();
        assert!(matches!(err, DatasetError::InvalidSplit(ref s) if s == "validation"));
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let err = DatasetConfig::from_strs("/data", "val", "edges", "fine").unwrap_err();
        assert!(matches!(err, DatasetError::InvalidLabelType(_)));

        let err = DatasetConfig::from_strs("/data", "val", "boundary", "medium").unwrap_err();
        assert!(matches!(err, DatasetError::InvalidMode(_)));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn defaults_match_test_split_coarse_segmentation() {
        let config = DatasetConfig::new("/data");
        assert_eq!(config.split, Split::Test);
        assert_eq!(config.label_type, LabelType::Segmentation);
        assert_eq!(config.mode, SelectionMode::Coarse);

        let config = config.split(Split::Train).mode(SelectionMode::All);
        assert_eq!(config.split, Split::Train);
        assert_eq!(config.mode, SelectionMode::All);
    }

    #[test]
    fn field_index_follows_record_layout() {
        assert_eq!(LabelType::Segmentation.field_index(), 0);
        assert_eq!(LabelType::Boundary.field_index(), 1);
    }
}
