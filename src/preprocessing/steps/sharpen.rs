use image::{GrayImage, Luma};

/// Weight of the original image in the unsharp mask
const ORIGINAL_WEIGHT: f32 = 1.5;
/// Weight of the blurred image in the unsharp mask
const BLURRED_WEIGHT: f32 = -0.5;

/// Unsharp mask: `1.5 * gray - 0.5 * blurred`, rounded and clipped to 0-255
/// Boosts local contrast so glyph strokes stand out from the paper
pub fn unsharp_mask(gray: &GrayImage, blurred: &GrayImage) -> GrayImage {
    debug_assert_eq!(gray.dimensions(), blurred.dimensions());

    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let original = gray.get_pixel(x, y).0[0] as f32;
        let smooth = blurred.get_pixel(x, y).0[0] as f32;
        let value = ORIGINAL_WEIGHT * original + BLURRED_WEIGHT * smooth;
        Luma([value.round().clamp(0.0, 255.0) as u8])
    })
}
