//! Model registry — maps model-family identifiers onto transform families.
//!
//! The table is fixed at compile time. Identifiers are case-sensitive and
//! several network variants share one family.

use crate::error::PreprocessError;
use crate::family::TransformFamily;

use TransformFamily::{BairMean, FbImageNet, KerasMean, UnitRange, WrnImageNet};

/// Identifier used when a caller does not name a model.
pub const DEFAULT_MODEL: &str = "mobilenet";

static REGISTRY: [(&str, TransformFamily); 43] = [
    ("inception", UnitRange),
    ("inception1", BairMean),
    ("inception2", UnitRange),
    ("inception3", UnitRange),
    ("inception4", UnitRange),
    ("inceptionresnet2_tfslim", UnitRange),
    ("resnet", KerasMean),
    ("resnet50", KerasMean),
    ("resnet101", KerasMean),
    ("resnet152", KerasMean),
    ("resnetv2", UnitRange),
    ("resnet50v2", UnitRange),
    ("resnet101v2", UnitRange),
    ("resnet152v2", UnitRange),
    ("resnet200v2", FbImageNet),
    ("resnext", FbImageNet),
    ("resnext50", FbImageNet),
    ("resnext101", FbImageNet),
    ("resnext50c32", FbImageNet),
    ("resnext101c32", FbImageNet),
    ("resnext101c64", FbImageNet),
    ("wideresnet50", WrnImageNet),
    ("nasnetAlarge", UnitRange),
    ("nasnetAmobile", UnitRange),
    ("pnasnetlarge", UnitRange),
    ("vgg16", KerasMean),
    ("vgg19", KerasMean),
    ("densenet", FbImageNet),
    ("densenet121", FbImageNet),
    ("densenet169", FbImageNet),
    ("densenet201", FbImageNet),
    ("mobilenet", UnitRange),
    ("mobilenet25", UnitRange),
    ("mobilenet50", UnitRange),
    ("mobilenet75", UnitRange),
    ("mobilenet100", UnitRange),
    ("mobilenetv2", UnitRange),
    ("mobilenet35v2", UnitRange),
    ("mobilenet50v2", UnitRange),
    ("mobilenet75v2", UnitRange),
    ("mobilenet100v2", UnitRange),
    ("mobilenet130v2", UnitRange),
    ("mobilenet140v2", UnitRange),
];

/// Find the registry entry for `model`, returning the interned identifier
/// alongside its family.
pub(crate) fn resolve(model: &str) -> Result<(&'static str, TransformFamily), PreprocessError> {
    REGISTRY
        .iter()
        .find(|(name, _)| *name == model)
        .copied()
        .ok_or_else(|| PreprocessError::unknown_model(model))
}

/// Transform family registered for `model`.
pub fn lookup(model: &str) -> Result<TransformFamily, PreprocessError> {
    resolve(model).map(|(_, family)| family)
}

pub fn is_supported(model: &str) -> bool {
    resolve(model).is_ok()
}

/// All registered identifiers, in table order.
pub fn supported_models() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|&(name, _)| name)
}

/// Identifiers that share `family`.
pub fn models_for(family: TransformFamily) -> impl Iterator<Item = &'static str> {
    REGISTRY
        .iter()
        .filter(move |&&(_, f)| f == family)
        .map(|&(name, _)| name)
}
