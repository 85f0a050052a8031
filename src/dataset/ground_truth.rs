use std::path::Path;

use crate::mat::{MatFile, MatValue};

use super::config::LabelType;
use super::error::{DatasetError, GroundTruthError};
use super::sample::LabelMap;

/// Name of the variable holding the per-annotator records.
pub const GROUND_TRUTH_VARIABLE: &str = "groundTruth";

/// Reads one map per annotator from a ground truth MAT-file, in file order.
pub fn read_label_maps(path: &Path, label_type: LabelType) -> Result<Vec<LabelMap>, DatasetError> {
    let mat = MatFile::open(path).map_err(|source| DatasetError::MatDecode {
        path: path.to_path_buf(),
        source,
    })?;

    label_maps(&mat, label_type).map_err(|source| DatasetError::GroundTruth {
        path: path.to_path_buf(),
        source,
    })
}

pub fn label_maps(mat: &MatFile, label_type: LabelType) -> Result<Vec<LabelMap>, GroundTruthError> {
    let bundle = mat
        .get(GROUND_TRUTH_VARIABLE)
        .ok_or(GroundTruthError::MissingVariable(GROUND_TRUTH_VARIABLE))?;
    let annotations = bundle.as_cell().ok_or(GroundTruthError::NotACell {
        name: GROUND_TRUTH_VARIABLE,
        found: bundle.kind_name(),
    })?;

    annotations
        .iter()
        .enumerate()
        .map(|(index, annotation)| annotation_map(index, annotation, label_type))
        .collect()
}

fn annotation_map(
    index: usize,
    annotation: &MatValue,
    label_type: LabelType,
) -> Result<LabelMap, GroundTruthError> {
    let record = annotation.as_struct().ok_or(GroundTruthError::NotAStruct {
        index,
        found: annotation.kind_name(),
    })?;

    let field = record
        .field_at(0, label_type.field_index())
        .ok_or(GroundTruthError::MissingField { index, label_type })?;

    let array = field
        .as_numeric()
        .ok_or(GroundTruthError::NotNumeric {
            index,
            label_type,
            found: field.kind_name(),
        })?
        .to_array2()
        .map_err(|source| GroundTruthError::Shape { index, source })?;

    let mut invalid = None;
    let map = array.mapv(|value| {
        if value.fract() != 0.0 || value < 0.0 || value > u32::MAX as f64 {
            invalid.get_or_insert(value);
            0
        } else {
            value as u32
        }
    });

    match invalid {
        Some(value) => Err(GroundTruthError::InvalidLabel {
            index,
            label_type,
            value,
        }),
        None => Ok(map),
    }
}
