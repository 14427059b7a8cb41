//! Pixnorm Core — pixel normalization for image-classification networks.
//!
//! Converts raw 8-bit channel-last tensors into the input convention of a
//! network family and back again. The convention is chosen by a model
//! identifier such as `"mobilenet"`, `"resnet50"` or `"densenet121"`.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod family;
pub mod image;
pub mod registry;

// Re-exports for convenience.
pub use config::PreprocessConfig;
pub use dispatch::{Preprocessor, preprocess, reverse_preprocess};
pub use error::PreprocessError;
pub use family::{ChannelOrder, TransformFamily};
pub use self::image::{rgb_image_to_tensor, tensor_to_rgb_image};
pub use registry::{DEFAULT_MODEL, is_supported, lookup, models_for, supported_models};
