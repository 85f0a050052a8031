use std::collections::HashSet;
use std::path::PathBuf;

use ndarray::{Array2, Array3};

use super::config::SelectionMode;

/// Per-pixel segment or boundary identifiers, shape (height, width).
pub type LabelMap = Array2<u32>;

#[derive(Clone, Debug, PartialEq)]
pub enum Label {
    Single(LabelMap),
    All(Vec<LabelMap>),
}

impl Label {
    pub fn single(&self) -> Option<&LabelMap> {
        match self {
            Label::Single(map) => Some(map),
            Label::All(_) => None,
        }
    }

    pub fn maps(&self) -> &[LabelMap] {
        match self {
            Label::Single(map) => std::slice::from_ref(map),
            Label::All(maps) => maps,
        }
    }

    pub fn len(&self) -> usize {
        self.maps().len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps().is_empty()
    }
}

/// One image with its selected ground truth. Built fresh on every access.
#[derive(Clone, Debug)]
pub struct Sample {
    pub image_path: PathBuf,
    pub ground_truth_path: PathBuf,
    pub image_name: String,
    /// RGB pixels, shape (height, width, 3)
    pub image: Array3<u8>,
    pub label: Label,
}

pub fn distinct_labels(map: &LabelMap) -> usize {
    map.iter().collect::<HashSet<_>>().len()
}

/// Picks the label for `mode`. Fine and coarse keep the first map on ties and
/// return `None` when there is nothing to pick from.
pub fn select_label(maps: Vec<LabelMap>, mode: SelectionMode) -> Option<Label> {
    let prefer: fn(usize, usize) -> bool = match mode {
        SelectionMode::All => return Some(Label::All(maps)),
        SelectionMode::Fine => |candidate, best| candidate > best,
        SelectionMode::Coarse => |candidate, best| candidate < best,
    };

    let mut best: Option<(usize, usize)> = None;
    for (index, map) in maps.iter().enumerate() {
        let count = distinct_labels(map);
        match best {
            Some((_, best_count)) if !prefer(count, best_count) => {}
            _ => best = Some((index, count)),
        }
    }

    let (index, _) = best?;
    maps.into_iter().nth(index).map(Label::Single)
}
