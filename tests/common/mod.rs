//! Synthetic BSDS500 trees: tiny images plus Level 5 MAT-files written by hand.

#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use ndarray::Array2;

const MI_INT8: u32 = 1;
const MI_UINT8: u32 = 2;
const MI_UINT16: u32 = 4;
const MI_INT32: u32 = 5;
const MI_UINT32: u32 = 6;
const MI_DOUBLE: u32 = 9;
const MI_MATRIX: u32 = 14;
const MI_COMPRESSED: u32 = 15;

const CLASS_CELL: u32 = 1;
const CLASS_STRUCT: u32 = 2;
const CLASS_DOUBLE: u32 = 6;
const CLASS_UINT8: u32 = 9;
const CLASS_UINT16: u32 = 11;
const FLAG_LOGICAL: u32 = 0x0200;

/// One human annotation: a segmentation map and a boundary map of the same shape.
pub struct Annotation {
    pub segmentation: Array2<u16>,
    pub boundaries: Array2<u8>,
}

impl Annotation {
    pub fn new(segmentation: Array2<u16>, boundaries: Array2<u8>) -> Self {
        Annotation { segmentation, boundaries }
    }
}

fn element(data_type: u32, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&data_type.to_le_bytes());
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
    while out.len() % 8 != 0 {
        out.push(0);
    }
    out
}

fn small_element(data_type: u32, data: &[u8]) -> Vec<u8> {
    assert!(data.len() <= 4);
    let mut out = Vec::new();
    out.extend_from_slice(&(((data.len() as u32) << 16) | data_type).to_le_bytes());
    out.extend_from_slice(data);
    out.resize(8, 0);
    out
}

fn matrix(class: u32, flags: u32, dims: &[i32], name: &str, body: &[u8]) -> Vec<u8> {
    let mut payload = Vec::new();

    let mut flag_bytes = (class | flags).to_le_bytes().to_vec();
    flag_bytes.extend_from_slice(&0u32.to_le_bytes());
    payload.extend(element(MI_UINT32, &flag_bytes));

    let dim_bytes: Vec<u8> = dims.iter().flat_map(|d| d.to_le_bytes()).collect();
    payload.extend(element(MI_INT32, &dim_bytes));

    if name.len() <= 4 {
        payload.extend(small_element(MI_INT8, name.as_bytes()));
    } else {
        payload.extend(element(MI_INT8, name.as_bytes()));
    }

    payload.extend_from_slice(body);
    element(MI_MATRIX, &payload)
}

fn column_major<T: Copy>(array: &Array2<T>) -> Vec<T> {
    array.t().iter().copied().collect()
}

fn dims_of<T>(array: &Array2<T>) -> [i32; 2] {
    [array.nrows() as i32, array.ncols() as i32]
}

pub fn uint16_matrix(name: &str, array: &Array2<u16>) -> Vec<u8> {
    let data: Vec<u8> = column_major(array).iter().flat_map(|v| v.to_le_bytes()).collect();
    matrix(CLASS_UINT16, 0, &dims_of(array), name, &element(MI_UINT16, &data))
}

pub fn logical_matrix(name: &str, array: &Array2<u8>) -> Vec<u8> {
    let data = column_major(array);
    matrix(CLASS_UINT8, FLAG_LOGICAL, &dims_of(array), name, &element(MI_UINT8, &data))
}

/// A double class matrix whose values are stored as uint8, as MATLAB does for small integers.
pub fn narrowed_double_matrix(name: &str, array: &Array2<u8>) -> Vec<u8> {
    let data = column_major(array);
    matrix(CLASS_DOUBLE, 0, &dims_of(array), name, &element(MI_UINT8, &data))
}

pub fn double_matrix(name: &str, array: &Array2<f64>) -> Vec<u8> {
    let data: Vec<u8> = column_major(array).iter().flat_map(|v| v.to_le_bytes()).collect();
    matrix(CLASS_DOUBLE, 0, &dims_of(array), name, &element(MI_DOUBLE, &data))
}

pub fn struct_matrix(name: &str, field_names: &[&str], fields: &[Vec<u8>]) -> Vec<u8> {
    const NAME_LEN: usize = 32;

    let mut body = small_element(MI_INT32, &(NAME_LEN as i32).to_le_bytes());
    let mut names = Vec::new();
    for field in field_names {
        let mut padded = field.as_bytes().to_vec();
        padded.resize(NAME_LEN, 0);
        names.extend(padded);
    }
    body.extend(element(MI_INT8, &names));
    for field in fields {
        body.extend_from_slice(field);
    }

    matrix(CLASS_STRUCT, 0, &[1, 1], name, &body)
}

pub fn cell_matrix(name: &str, cells: &[Vec<u8>]) -> Vec<u8> {
    cell_matrix_with_dims(name, &[1, cells.len() as i32], cells)
}

/// A cell matrix whose header claims `dims`, whatever `cells` actually holds.
pub fn cell_matrix_with_dims(name: &str, dims: &[i32], cells: &[Vec<u8>]) -> Vec<u8> {
    let body: Vec<u8> = cells.concat();
    matrix(CLASS_CELL, 0, dims, name, &body)
}

pub fn annotation_struct(annotation: &Annotation) -> Vec<u8> {
    struct_matrix(
        "",
        &["Segmentation", "Boundaries"],
        &[
            uint16_matrix("", &annotation.segmentation),
            logical_matrix("", &annotation.boundaries),
        ],
    )
}

pub fn header() -> Vec<u8> {
    let mut bytes = vec![b' '; 128];
    let text = b"MATLAB 5.0 MAT-file, Platform: GLNXA64, Created on: test fixture";
    bytes[..text.len()].copy_from_slice(text);
    bytes[116..124].fill(0);
    bytes[124..126].copy_from_slice(&0x0100u16.to_le_bytes());
    bytes[126..128].copy_from_slice(b"IM");
    bytes
}

pub fn compress(element_bytes: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(element_bytes).unwrap();
    let compressed = encoder.finish().unwrap();

    let mut out = Vec::new();
    out.extend_from_slice(&MI_COMPRESSED.to_le_bytes());
    out.extend_from_slice(&(compressed.len() as u32).to_le_bytes());
    out.extend(compressed);
    out
}

pub fn mat_file(variables: &[Vec<u8>], compressed: bool) -> Vec<u8> {
    let mut bytes = header();
    for variable in variables {
        if compressed {
            bytes.extend(compress(variable));
        } else {
            bytes.extend_from_slice(variable);
        }
    }
    bytes
}

pub fn ground_truth_bytes(annotations: &[Annotation], compressed: bool) -> Vec<u8> {
    let cells: Vec<Vec<u8>> = annotations.iter().map(annotation_struct).collect();
    mat_file(&[cell_matrix("groundTruth", &cells)], compressed)
}

pub fn write_ground_truth(path: &Path, annotations: &[Annotation]) {
    fs::write(path, ground_truth_bytes(annotations, true)).unwrap();
}

/// A map of `width` x `height` with `segments` distinct values, striped by column.
pub fn striped(height: usize, width: usize, segments: usize) -> Array2<u16> {
    Array2::from_shape_fn((height, width), |(_, col)| (col % segments) as u16 + 1)
}

/// Ones where a new stripe of `striped` starts, zeros elsewhere.
pub fn stripe_edges(height: usize, width: usize, segments: usize) -> Array2<u8> {
    Array2::from_shape_fn((height, width), |(_, col)| {
        (segments > 1 && col > 0 && col % segments == 0) as u8
    })
}

pub fn write_image(path: &Path, width: u32, height: u32) {
    RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 200]))
        .save(path)
        .unwrap();
}

pub fn write_rgba_image(path: &Path, width: u32, height: u32) {
    RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 50, 128]))
        .save(path)
        .unwrap();
}

pub const WIDTH: u32 = 6;
pub const HEIGHT: u32 = 4;

/// Creates `<base>/data/{images,groundTruth}/<split>` and returns both directories.
pub fn make_split_dirs(base: &Path, split: &str) -> (PathBuf, PathBuf) {
    let images = base.join("data").join("images").join(split);
    let ground_truth = base.join("data").join("groundTruth").join(split);
    fs::create_dir_all(&images).unwrap();
    fs::create_dir_all(&ground_truth).unwrap();
    (images, ground_truth)
}

/// Default annotations: three annotators with 3, 5 and 2 segments.
pub fn default_annotations() -> Vec<Annotation> {
    [3, 5, 2]
        .iter()
        .map(|&segments| {
            Annotation::new(
                striped(HEIGHT as usize, WIDTH as usize, segments),
                stripe_edges(HEIGHT as usize, WIDTH as usize, segments),
            )
        })
        .collect()
}

/// Populates a split with the named images and ground truth files.
pub fn populate_split(base: &Path, split: &str, images: &[&str], ground_truths: &[&str]) {
    let (image_dir, gt_dir) = make_split_dirs(base, split);
    for name in images {
        write_image(&image_dir.join(name), WIDTH, HEIGHT);
    }
    for name in ground_truths {
        write_ground_truth(&gt_dir.join(name), &default_annotations());
    }
}
