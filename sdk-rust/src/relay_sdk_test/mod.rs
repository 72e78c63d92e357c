//! Test doubles for code built on top of [`ModelProvider`](crate::ModelProvider).
mod provider;

pub use provider::{MockModelProvider, MockResult};
