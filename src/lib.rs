//! Structural normalization of assistant answers written in markdown.

pub mod normalize;

pub use normalize::{
    DEFAULT_SEARCH_BASE_URL, NormalizeOutcome, Normalizer, NormalizerOptions, normalize,
};
