//! Identifier-keyed entry points for forward and reverse preprocessing.

use ndarray::{Array, ArrayBase, Data, Dimension};

use crate::config::PreprocessConfig;
use crate::error::PreprocessError;
use crate::family::TransformFamily;
use crate::registry::{self, DEFAULT_MODEL};

/// Normalize raw `u8` pixels for the network family named by `model`.
///
/// The channel axis is the last axis. Returns a tensor of the same shape.
pub fn preprocess<S, D>(image: &ArrayBase<S, D>, model: &str) -> Result<Array<f32, D>, PreprocessError>
where
    S: Data<Elem = u8>,
    D: Dimension,
{
    Preprocessor::new(model)?.preprocess(image)
}

/// Map network-range values for `model` back to `u8` pixels.
///
/// Values are clipped to `[0, 255]` before rounding, so any finite input
/// yields a valid image.
pub fn reverse_preprocess<S, D>(
    image: &ArrayBase<S, D>,
    model: &str,
) -> Result<Array<u8, D>, PreprocessError>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    Preprocessor::new(model)?.reverse_preprocess(image)
}

/// A model identifier resolved against the registry.
///
/// Resolving once up front lets a pipeline reject an unknown identifier
/// before any tensor arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preprocessor {
    model: &'static str,
    family: TransformFamily,
}

impl Preprocessor {
    pub fn new(model: &str) -> Result<Self, PreprocessError> {
        let (model, family) = registry::resolve(model)?;
        tracing::debug!("resolved model {model} to {family} preprocessing");
        Ok(Self { model, family })
    }

    pub fn from_config(config: &PreprocessConfig) -> Result<Self, PreprocessError> {
        Self::new(&config.model)
    }

    pub fn model(&self) -> &'static str {
        self.model
    }

    pub fn family(&self) -> TransformFamily {
        self.family
    }

    pub fn preprocess<S, D>(&self, image: &ArrayBase<S, D>) -> Result<Array<f32, D>, PreprocessError>
    where
        S: Data<Elem = u8>,
        D: Dimension,
    {
        tracing::trace!(model = self.model, shape = ?image.shape(), "forward preprocess");
        Ok(self.family.forward(image)?)
    }

    pub fn reverse_preprocess<S, D>(
        &self,
        image: &ArrayBase<S, D>,
    ) -> Result<Array<u8, D>, PreprocessError>
    where
        S: Data<Elem = f32>,
        D: Dimension,
    {
        tracing::trace!(model = self.model, shape = ?image.shape(), "reverse preprocess");
        Ok(self.family.reverse(image)?)
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL,
            family: TransformFamily::UnitRange,
        }
    }
}
