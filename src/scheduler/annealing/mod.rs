//! Simulated annealing over rosters.
//!
//! Refines the greedy roster by random evict-and-replace swaps, accepting
//! worsening swaps with a probability that shrinks as the temperature
//! cools. Randomness comes from an injected, seedable RNG.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast Computing Machines"

mod config;
mod runner;

pub use config::AnnealingConfig;
pub use runner::{AnnealingResult, AnnealingRunner, AnnealingStats};
