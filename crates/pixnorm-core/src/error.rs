use ndarray::ShapeError;

#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    #[error("unknown model family identifier: {model}")]
    UnknownModel { model: String },
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error("invalid image buffer: {0}")]
    Image(&'static str),
}

impl PreprocessError {
    pub(crate) fn unknown_model(model: &str) -> Self {
        Self::UnknownModel {
            model: model.to_owned(),
        }
    }
}
