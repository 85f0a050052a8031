use super::bsds500::Bsds500;
use super::dataset::Dataset;

pub fn print_dataset_info(ds: &Bsds500) {
    println!("Dataset Information:");
    println!("-------------------");
    println!("Root: {}", ds.root().display());
    println!("Images: {}", ds.images_dir().display());
    println!("Ground truth: {}", ds.ground_truth_dir().display());
    println!();
    println!("Split: {}", ds.split());
    println!("Label type: {}", ds.label_type());
    println!("Mode: {}", ds.mode());
    println!("Labelled images: {}", ds.len());

    if let (Some(first), Some(last)) = (ds.entries().first(), ds.entries().last()) {
        println!();
        println!("First: {}", first.image_path.display());
        println!("Last: {}", last.image_path.display());
    }
}
