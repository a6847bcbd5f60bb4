use image::{DynamicImage, GrayImage};

/// Convert image to single-channel grayscale
/// This is the foundation for every other preprocessing step and for the
/// visual integrity analysis
pub fn apply(image: &DynamicImage) -> GrayImage {
    image.to_luma8()
}
