//! Transform families — the pixel normalization conventions networks are trained with.
//!
//! Every family is a pair of pure functions over a channel-last tensor:
//! `forward` turns raw `u8` pixels into `f32` network input, `reverse` maps
//! network-range values back to displayable `u8` pixels. Per-channel constants
//! are broadcast along the last axis.

use std::fmt;

use ndarray::{Array, ArrayBase, Axis, Data, Dimension, ErrorKind, ShapeError, Zip, aview1};
use serde::{Deserialize, Serialize};

/// Channel order a family expects on the last axis of its network input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelOrder {
    /// Same order as the raw pixels.
    Rgb,
    /// Last axis reversed relative to the raw pixels.
    Bgr,
}

/// Identifies one of the five arithmetic normalization conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformFamily {
    /// TF-slim scaling to `[-1, 1]`.
    UnitRange,
    /// Legacy Caffe (BAIR) BGR mean subtraction with integral means.
    BairMean,
    /// Keras ResNet/VGG BGR mean subtraction.
    KerasMean,
    /// ImageNet mean/std standardization used by the Torch ResNe(X)t and DenseNet ports.
    FbImageNet,
    /// Mean/std standardization used by the wide residual networks.
    WrnImageNet,
}

const BAIR_MEAN: [f32; 3] = [104.0, 117.0, 123.0];
const KERAS_MEAN: [f32; 3] = [103.939, 116.779, 123.68];

const FB_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const FB_STD: [f32; 3] = [0.229, 0.224, 0.225];

const WRN_MEAN: [f32; 3] = [0.491, 0.482, 0.447];
const WRN_STD: [f32; 3] = [0.247, 0.244, 0.262];

impl TransformFamily {
    /// Short name used in logs and error reports.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::UnitRange => "unit-range",
            Self::BairMean => "bair-mean",
            Self::KerasMean => "keras-mean",
            Self::FbImageNet => "fb-imagenet",
            Self::WrnImageNet => "wrn-imagenet",
        }
    }

    pub fn all() -> &'static [Self] {
        const ALL: [TransformFamily; 5] = [
            TransformFamily::UnitRange,
            TransformFamily::BairMean,
            TransformFamily::KerasMean,
            TransformFamily::FbImageNet,
            TransformFamily::WrnImageNet,
        ];
        &ALL
    }

    /// Channel order of the tensor produced by [`forward`](Self::forward).
    pub const fn channel_order(self) -> ChannelOrder {
        match self {
            Self::BairMean | Self::KerasMean => ChannelOrder::Bgr,
            Self::UnitRange | Self::FbImageNet | Self::WrnImageNet => ChannelOrder::Rgb,
        }
    }

    /// Per-channel `(min, max)` reached by [`forward`](Self::forward) for inputs
    /// in `[0, 255]`, listed in network channel order.
    pub fn output_range(self) -> [(f32, f32); 3] {
        match self {
            Self::UnitRange => [(-1.0, 1.0); 3],
            Self::BairMean => offset_range(&BAIR_MEAN),
            Self::KerasMean => offset_range(&KERAS_MEAN),
            Self::FbImageNet => standardized_range(&FB_MEAN, &FB_STD),
            Self::WrnImageNet => standardized_range(&WRN_MEAN, &WRN_STD),
        }
    }

    /// Raw pixels to network input.
    ///
    /// ```text
    /// unit-range:  x / 127.5 − 1
    /// bair/keras:  reverse(x) − mean
    /// fb/wrn:      (x / 255 − mean) / std
    /// ```
    ///
    /// Fails only when a per-channel constant cannot broadcast against the
    /// last axis, or the tensor has no axes at all.
    pub fn forward<S, D>(self, image: &ArrayBase<S, D>) -> Result<Array<f32, D>, ShapeError>
    where
        S: Data<Elem = u8>,
        D: Dimension,
    {
        let mut x = image.mapv(f32::from);
        match self {
            Self::UnitRange => x.mapv_inplace(|v| v / 127.5 - 1.0),
            Self::BairMean => subtract_bgr_mean(&mut x, &BAIR_MEAN)?,
            Self::KerasMean => subtract_bgr_mean(&mut x, &KERAS_MEAN)?,
            Self::FbImageNet => standardize(&mut x, &FB_MEAN, &FB_STD)?,
            Self::WrnImageNet => standardize(&mut x, &WRN_MEAN, &WRN_STD)?,
        }
        Ok(x)
    }

    /// Network-range values back to pixels.
    ///
    /// ```text
    /// unit-range:  (x + 1) / 2 × 255
    /// bair/keras:  reverse(x + mean)
    /// fb/wrn:      (x × std + mean) × 255
    /// ```
    ///
    /// The result is clipped to `[0, 255]` and rounded to the nearest integer.
    pub fn reverse<S, D>(self, image: &ArrayBase<S, D>) -> Result<Array<u8, D>, ShapeError>
    where
        S: Data<Elem = f32>,
        D: Dimension,
    {
        let mut x = image.to_owned();
        match self {
            Self::UnitRange => x.mapv_inplace(|v| (v + 1.0) / 2.0 * 255.0),
            Self::BairMean => add_bgr_mean(&mut x, &BAIR_MEAN)?,
            Self::KerasMean => add_bgr_mean(&mut x, &KERAS_MEAN)?,
            Self::FbImageNet => destandardize(&mut x, &FB_MEAN, &FB_STD)?,
            Self::WrnImageNet => destandardize(&mut x, &WRN_MEAN, &WRN_STD)?,
        }
        Ok(x.mapv(to_pixel))
    }
}

impl fmt::Display for TransformFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Channel arithmetic
// ---------------------------------------------------------------------------

fn incompatible() -> ShapeError {
    ShapeError::from_kind(ErrorKind::IncompatibleShape)
}

fn reverse_channels<D: Dimension>(x: &mut Array<f32, D>) -> Result<(), ShapeError> {
    let ndim = x.ndim();
    if ndim == 0 {
        return Err(incompatible());
    }
    x.invert_axis(Axis(ndim - 1));
    Ok(())
}

/// Apply `op` to every sample paired with its channel's constant.
fn zip_channels<D, F>(x: &mut Array<f32, D>, values: &[f32; 3], mut op: F) -> Result<(), ShapeError>
where
    D: Dimension,
    F: FnMut(&mut f32, f32),
{
    let row = aview1(values);
    let per_sample = row.broadcast(x.raw_dim()).ok_or_else(incompatible)?;
    Zip::from(x)
        .and(&per_sample)
        .for_each(|sample, &value| op(sample, value));
    Ok(())
}

fn subtract_bgr_mean<D: Dimension>(x: &mut Array<f32, D>, mean: &[f32; 3]) -> Result<(), ShapeError> {
    reverse_channels(x)?;
    zip_channels(x, mean, |v, m| *v -= m)
}

fn add_bgr_mean<D: Dimension>(x: &mut Array<f32, D>, mean: &[f32; 3]) -> Result<(), ShapeError> {
    zip_channels(x, mean, |v, m| *v += m)?;
    reverse_channels(x)
}

fn standardize<D: Dimension>(
    x: &mut Array<f32, D>,
    mean: &[f32; 3],
    std: &[f32; 3],
) -> Result<(), ShapeError> {
    x.mapv_inplace(|v| v / 255.0);
    zip_channels(x, mean, |v, m| *v -= m)?;
    zip_channels(x, std, |v, s| *v /= s)
}

fn destandardize<D: Dimension>(
    x: &mut Array<f32, D>,
    mean: &[f32; 3],
    std: &[f32; 3],
) -> Result<(), ShapeError> {
    zip_channels(x, std, |v, s| *v *= s)?;
    zip_channels(x, mean, |v, m| *v += m)?;
    x.mapv_inplace(|v| v * 255.0);
    Ok(())
}

fn to_pixel(v: f32) -> u8 {
    v.clamp(0.0, 255.0).round() as u8
}

fn offset_range(mean: &[f32; 3]) -> [(f32, f32); 3] {
    mean.map(|m| (0.0 - m, 255.0 - m))
}

fn standardized_range(mean: &[f32; 3], std: &[f32; 3]) -> [(f32, f32); 3] {
    std::array::from_fn(|c| ((0.0 - mean[c]) / std[c], (1.0 - mean[c]) / std[c]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2, Array4, array, arr0};

    const EPSILON: f32 = 1e-4;

    fn assert_close(actual: &[f32], expected: &[f32]) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!(
                (a - e).abs() < EPSILON,
                "sample {i} mismatch: got {a}, expected {e}"
            );
        }
    }

    /// Every byte value appears in every channel, at a different row per channel.
    fn all_pixel_values() -> Array2<u8> {
        Array2::from_shape_fn((256, 3), |(i, c)| ((i + c * 85) % 256) as u8)
    }

    #[test]
    fn test_unit_range_maps_extremes_to_unit_interval() {
        let x = array![[0u8, 255, 127]];
        let y = TransformFamily::UnitRange.forward(&x).unwrap();
        assert_close(y.as_slice().unwrap(), &[-1.0, 1.0, 127.0 / 127.5 - 1.0]);
    }

    #[test]
    fn test_bair_mean_reverses_channels_before_subtracting() {
        let x = array![[10u8, 20, 30]];
        let y = TransformFamily::BairMean.forward(&x).unwrap();
        let y: Vec<f32> = y.iter().copied().collect();
        assert_close(&y, &[30.0 - 104.0, 20.0 - 117.0, 10.0 - 123.0]);
    }

    #[test]
    fn test_keras_mean_zero_image_yields_negative_mean() {
        let x = Array4::<u8>::zeros((1, 2, 2, 3));
        let y = TransformFamily::KerasMean.forward(&x).unwrap();
        assert_eq!(y.shape(), &[1, 2, 2, 3]);
        for pixel in y.lanes(Axis(3)) {
            let pixel: Vec<f32> = pixel.iter().copied().collect();
            assert_close(&pixel, &[-103.939, -116.779, -123.68]);
        }
        let back = TransformFamily::KerasMean.reverse(&y).unwrap();
        assert!(back.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_fb_standardizes_per_channel() {
        let x = array![[255u8, 0, 255]];
        let y = TransformFamily::FbImageNet.forward(&x).unwrap();
        let expected = [
            (1.0 - 0.485) / 0.229,
            (0.0 - 0.456) / 0.224,
            (1.0 - 0.406) / 0.225,
        ];
        assert_close(y.as_slice().unwrap(), &expected);
    }

    #[test]
    fn test_wrn_uses_its_own_statistics() {
        let x = array![[0u8, 0, 0]];
        let fb = TransformFamily::FbImageNet.forward(&x).unwrap();
        let wrn = TransformFamily::WrnImageNet.forward(&x).unwrap();
        assert_close(
            wrn.as_slice().unwrap(),
            &[-0.491 / 0.247, -0.482 / 0.244, -0.447 / 0.262],
        );
        assert_ne!(fb, wrn);
    }

    #[test]
    fn test_every_family_roundtrips_all_pixel_values() {
        let x = all_pixel_values();
        for &family in TransformFamily::all() {
            let y = family.forward(&x).unwrap();
            let back = family.reverse(&y).unwrap();
            assert_eq!(back, x, "{family} failed to roundtrip");
        }
    }

    #[test]
    fn test_forward_stays_within_declared_range() {
        let x = all_pixel_values();
        for &family in TransformFamily::all() {
            let y = family.forward(&x).unwrap();
            let range = family.output_range();
            for lane in y.lanes(Axis(1)) {
                for (c, &v) in lane.iter().enumerate() {
                    let (lo, hi) = range[c];
                    assert!(
                        v >= lo - EPSILON && v <= hi + EPSILON,
                        "{family} channel {c}: {v} outside [{lo}, {hi}]"
                    );
                }
            }
        }
    }

    #[test]
    fn test_reverse_clips_out_of_range_values() {
        let y = array![[-1.0e6f32, 1.0e6, 0.0], [f32::MAX, f32::MIN, -3.5]];
        for &family in TransformFamily::all() {
            let back = family.reverse(&y).unwrap();
            assert_eq!(back.shape(), y.shape());
            let high = back.iter().filter(|&&v| v == 255).count();
            let low = back.iter().filter(|&&v| v == 0).count();
            assert!(high >= 2 && low >= 2, "{family} did not saturate: {back:?}");
        }
    }

    #[test]
    fn test_reverse_rounds_to_nearest() {
        let y = Array1::<f32>::from(vec![
            127.4 / 127.5 - 1.0,
            127.6 / 127.5 - 1.0,
            0.2 / 127.5 - 1.0,
        ]);
        let back = TransformFamily::UnitRange.reverse(&y).unwrap();
        assert_eq!(back.to_vec(), vec![127, 128, 0]);
    }

    #[test]
    fn test_channel_order_matches_reversal() {
        assert_eq!(TransformFamily::BairMean.channel_order(), ChannelOrder::Bgr);
        assert_eq!(TransformFamily::KerasMean.channel_order(), ChannelOrder::Bgr);
        assert_eq!(TransformFamily::UnitRange.channel_order(), ChannelOrder::Rgb);
        assert_eq!(TransformFamily::FbImageNet.channel_order(), ChannelOrder::Rgb);
        assert_eq!(TransformFamily::WrnImageNet.channel_order(), ChannelOrder::Rgb);
    }

    #[test]
    fn test_mismatched_channel_count_is_a_shape_error() {
        let x = Array2::<u8>::zeros((2, 4));
        for family in [
            TransformFamily::BairMean,
            TransformFamily::KerasMean,
            TransformFamily::FbImageNet,
            TransformFamily::WrnImageNet,
        ] {
            let err = family.forward(&x).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::IncompatibleShape);
        }
    }

    #[test]
    fn test_unit_range_ignores_channel_count() {
        let x = Array2::<u8>::from_elem((2, 4), 255);
        let y = TransformFamily::UnitRange.forward(&x).unwrap();
        assert!(y.iter().all(|&v| (v - 1.0).abs() < EPSILON));
    }

    #[test]
    fn test_scalar_tensor_has_no_channel_axis() {
        let x = arr0(7u8);
        let err = TransformFamily::KerasMean.forward(&x).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncompatibleShape);
    }

    #[test]
    fn test_family_serde_names_are_snake_case() {
        let json = serde_json::to_string(&TransformFamily::FbImageNet).unwrap();
        assert_eq!(json, "\"fb_image_net\"");
        let order: ChannelOrder = serde_json::from_str("\"bgr\"").unwrap();
        assert_eq!(order, ChannelOrder::Bgr);
    }
}
