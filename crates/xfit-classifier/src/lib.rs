//! Client for the remote movement classifier.
//!
//! The classifier is an already-trained MoViNet model deployed as an AWS
//! Lambda function. This crate provides:
//! - An invocation channel trait with an AWS Lambda implementation
//! - Timeout and retry handling around a single invocation
//! - Response normalization into a [`Prediction`](xfit_models::Prediction)
//! - A tagged error taxonomy, with an opt-in legacy error placeholder

pub mod channel;
pub mod client;
pub mod error;
pub mod lambda;
pub mod response;

pub use channel::{InvocationChannel, InvocationOutput};
pub use client::{ClassifierClient, ClassifierConfig, DEFAULT_FUNCTION_NAME, DEFAULT_REGION};
pub use error::{ClassifierError, ClassifierResult};
pub use lambda::AwsLambdaChannel;
