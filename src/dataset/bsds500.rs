use std::collections::HashSet;
use std::path::{Path, PathBuf};

use ndarray::Array3;
use tracing::{debug, info, warn};

use super::config::{DatasetConfig, LabelType, SelectionMode, Split};
use super::dataset::Dataset;
use super::error::{DatasetError, GroundTruthError};
use super::ground_truth::read_label_maps;
use super::sample::{select_label, Label, Sample};

// Where the archive unpacks the dataset, relative to the directory it was unzipped in
const FALLBACK_SUBDIR: [&str; 2] = ["BSR", "BSDS500"];
const GROUND_TRUTH_EXTENSION: &str = "mat";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub image_path: PathBuf,
    pub ground_truth_path: PathBuf,
}

/// The BSDS500 benchmark for one split. Images without ground truth are left out.
#[derive(Debug)]
pub struct Bsds500 {
    root: PathBuf,
    images_dir: PathBuf,
    ground_truth_dir: PathBuf,
    split: Split,
    label_type: LabelType,
    mode: SelectionMode,
    entries: Vec<Entry>,
}

impl Bsds500 {
    pub fn new(config: DatasetConfig) -> Result<Self, DatasetError> {
        let (root, images_dir) = resolve_root(&config.root, config.split)?;

        let ground_truth_dir = root
            .join("data")
            .join("groundTruth")
            .join(config.split.dir_name());
        if !ground_truth_dir.is_dir() {
            return Err(DatasetError::DirectoryNotFound(ground_truth_dir));
        }

        let images = list_files(&images_dir)?;
        let ground_truths: HashSet<PathBuf> = list_files(&ground_truth_dir)?.into_iter().collect();

        let image_count = images.len();
        let entries = match_entries(images, &ground_truths, &ground_truth_dir);

        info!(
            "BSDS500 {} split: {} labelled images under {}",
            config.split,
            entries.len(),
            root.display()
        );
        debug!(
            "{} images skipped without ground truth",
            image_count - entries.len()
        );
        if entries.is_empty() {
            warn!(
                "No images in {} have a matching .{} file in {}",
                images_dir.display(),
                GROUND_TRUTH_EXTENSION,
                ground_truth_dir.display()
            );
        }

        Ok(Bsds500 {
            root,
            images_dir,
            ground_truth_dir,
            split: config.split,
            label_type: config.label_type,
            mode: config.mode,
            entries,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    pub fn ground_truth_dir(&self) -> &Path {
        &self.ground_truth_dir
    }

    pub fn split(&self) -> Split {
        self.split
    }

    pub fn label_type(&self) -> LabelType {
        self.label_type
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    fn load_label(&self, ground_truth_path: &Path) -> Result<Label, DatasetError> {
        let maps = read_label_maps(ground_truth_path, self.label_type)?;
        select_label(maps, self.mode).ok_or_else(|| DatasetError::GroundTruth {
            path: ground_truth_path.to_path_buf(),
            source: GroundTruthError::NoAnnotations,
        })
    }
}

impl Dataset for Bsds500 {
    type Item = Sample;

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn get(&self, index: usize) -> Result<Sample, DatasetError> {
        let entry = self.entries.get(index).ok_or(DatasetError::IndexOutOfBounds {
            index,
            len: self.entries.len(),
        })?;

        let image = load_rgb_image(&entry.image_path)?;
        let label = self.load_label(&entry.ground_truth_path)?;

        let image_name = entry
            .image_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Sample {
            image_path: entry.image_path.clone(),
            ground_truth_path: entry.ground_truth_path.clone(),
            image_name,
            image,
            label,
        })
    }
}

/// Finds `data/images/<split>` under `root`, or under `root/BSR/BSDS500` when
/// `root` is the directory the archive was unpacked in.
fn resolve_root(root: &Path, split: Split) -> Result<(PathBuf, PathBuf), DatasetError> {
    let primary = images_dir(root, split);
    if primary.is_dir() {
        return Ok((root.to_path_buf(), primary));
    }

    let fallback_root = FALLBACK_SUBDIR.iter().fold(root.to_path_buf(), |path, dir| path.join(dir));
    let fallback = images_dir(&fallback_root, split);
    if !fallback.is_dir() {
        return Err(DatasetError::LayoutNotFound {
            root: root.to_path_buf(),
            primary,
            fallback,
        });
    }

    debug!(
        "{} is not a directory, using {}",
        primary.display(),
        fallback_root.display()
    );
    Ok((fallback_root, fallback))
}

fn images_dir(root: &Path, split: Split) -> PathBuf {
    root.join("data").join("images").join(split.dir_name())
}

/// Regular files in `dir`, symlinks resolved to what they point at.
fn list_files(dir: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    let files = std::fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    Ok(files)
}

/// The image name up to its first dot, so `100.v2.jpg` is annotated by `100.mat`.
fn image_id(image_path: &Path) -> Option<String> {
    let name = image_path.file_name()?.to_string_lossy();
    name.split('.').next().map(str::to_owned)
}

/// Pairs every image with `<id>.mat` from `ground_truths`, ordered by image path.
fn match_entries(
    mut images: Vec<PathBuf>,
    ground_truths: &HashSet<PathBuf>,
    ground_truth_dir: &Path,
) -> Vec<Entry> {
    // read_dir order depends on the filesystem
    images.sort_unstable();

    images
        .into_iter()
        .filter_map(|image_path| {
            let id = image_id(&image_path)?;
            let ground_truth_path = ground_truth_dir.join(format!("{}.{}", id, GROUND_TRUTH_EXTENSION));
            ground_truths.contains(&ground_truth_path).then_some(Entry {
                image_path,
                ground_truth_path,
            })
        })
        .collect()
}

fn load_rgb_image(path: &Path) -> Result<Array3<u8>, DatasetError> {
    let img = image::open(path)
        .map_err(|source| DatasetError::ImageDecode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgb8();

    let (width, height) = img.dimensions();
    Array3::from_shape_vec((height as usize, width as usize, 3), img.into_raw()).map_err(|source| {
        DatasetError::ImageShape {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(dir: &str, names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|name| Path::new(dir).join(name)).collect()
    }

    #[test]
    fn matches_by_id_in_sorted_order() {
        let images = paths("/d/images", &["c.jpg", "a.jpg", "b.png", "Thumbs.db"]);
        let ground_truths = paths("/d/gt", &["a.mat", "c.mat", "d.mat"]).into_iter().collect();

        let entries = match_entries(images, &ground_truths, Path::new("/d/gt"));

        assert_eq!(
            entries,
            vec![
                Entry {
                    image_path: PathBuf::from("/d/images/a.jpg"),
                    ground_truth_path: PathBuf::from("/d/gt/a.mat"),
                },
                Entry {
                    image_path: PathBuf::from("/d/images/c.jpg"),
                    ground_truth_path: PathBuf::from("/d/gt/c.mat"),
                },
            ]
        );
    }

    #[test]
    fn ground_truth_name_stops_at_the_first_dot() {
        let images = paths("/d/images", &["100.v2.jpg", "200.jpg"]);
        let ground_truths = paths("/d/gt", &["100.v2.mat", "100.mat", "200.mat"]).into_iter().collect();

        let entries = match_entries(images, &ground_truths, Path::new("/d/gt"));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].ground_truth_path, PathBuf::from("/d/gt/100.mat"));
        assert_eq!(entries[1].ground_truth_path, PathBuf::from("/d/gt/200.mat"));
    }

    #[test]
    fn image_id_of_dotted_and_hidden_names() {
        assert_eq!(image_id(Path::new("/d/100.v2.jpg")).as_deref(), Some("100"));
        assert_eq!(image_id(Path::new("/d/100")).as_deref(), Some("100"));
        assert_eq!(image_id(Path::new("/d/.hidden.jpg")).as_deref(), Some(""));
    }
}
