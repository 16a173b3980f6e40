// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod estimator;
pub mod predictor;

pub use estimator::LifestyleInput;
pub use predictor::PredictionClient;
