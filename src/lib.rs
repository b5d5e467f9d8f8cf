//! Form Predictor Library
//!
//! Serves a single-page numeric form, runs the submitted values through a
//! pre-trained binary classifier and renders the verdict with a percentage
//! meter. Two forms ship: diabetes risk and campus placement.

pub mod config;
pub mod error;
pub mod feature_extractor;
pub mod forms;
pub mod metrics;
pub mod models;
pub mod render;
pub mod server;
pub mod types;

pub use config::AppConfig;
pub use error::FormError;
pub use feature_extractor::{FeatureExtractor, FeatureVector};
pub use forms::FormKind;
pub use models::classifier::Classifier;
pub use models::inference::InferenceEngine;
pub use server::{router, AppState};
pub use types::{Label, Prediction, Verdict};
