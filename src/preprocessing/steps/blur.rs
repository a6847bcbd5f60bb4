use image::GrayImage;
use imageproc::filter::separable_filter_equal;

/// 5-tap binomial kernel; the Gaussian OpenCV derives for a 5x5 window with sigma 0
///
/// `separable_filter_equal` replicates border pixels (`aa|abcd|dd`) rather
/// than OpenCV's default reflect-101, so only the outer two rows and columns differ.
const GAUSSIAN_5X5: [f32; 5] = [0.0625, 0.25, 0.375, 0.25, 0.0625];

/// Apply a 5x5 Gaussian blur
pub fn apply(gray: &GrayImage) -> GrayImage {
    separable_filter_equal(gray, &GAUSSIAN_5X5)
}
