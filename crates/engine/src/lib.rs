//! A/B test outcome simulation: conversion-rate modeling, binomial sampling,
//! two-proportion significance and templated recommendations.

pub mod engine;
pub mod model;
pub mod recommendation;
pub mod revenue;
pub mod rng;
pub mod sampling;
pub mod significance;

pub use engine::SimulationEngine;
pub use rng::{RandomSource, ThreadRandom, Xorshift32};

use abtest_core::types::{SimulationInput, SimulationOutput};

/// Simulate with the default model parameters.
pub fn simulate(input: &SimulationInput) -> SimulationOutput {
    SimulationEngine::default().simulate(input)
}
