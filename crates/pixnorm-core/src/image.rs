//! Conversion between decoded `image` RGB buffers and HWC `u8` tensors.

use image::RgbImage;
use ndarray::{Array3, ArrayBase, Data, Ix3};

use crate::error::PreprocessError;

/// View an 8-bit RGB image as a `(height, width, 3)` tensor.
pub fn rgb_image_to_tensor(image: &RgbImage) -> Result<Array3<u8>, PreprocessError> {
    let (width, height) = image.dimensions();
    let tensor = Array3::from_shape_vec(
        (height as usize, width as usize, 3),
        image.as_raw().clone(),
    )?;
    Ok(tensor)
}

/// Pack a `(height, width, 3)` tensor into an RGB image.
///
/// Any memory layout is accepted, including the reversed strides left behind by
/// channel reversal.
pub fn tensor_to_rgb_image<S>(tensor: &ArrayBase<S, Ix3>) -> Result<RgbImage, PreprocessError>
where
    S: Data<Elem = u8>,
{
    let (height, width, channels) = tensor.dim();
    if channels != 3 {
        return Err(PreprocessError::Image("expected 3 channels on the last axis"));
    }
    let width = u32::try_from(width).map_err(|_| PreprocessError::Image("width exceeds u32"))?;
    let height = u32::try_from(height).map_err(|_| PreprocessError::Image("height exceeds u32"))?;

    let raw: Vec<u8> = tensor.iter().copied().collect();
    RgbImage::from_raw(width, height, raw)
        .ok_or(PreprocessError::Image("buffer length does not match dimensions"))
}
