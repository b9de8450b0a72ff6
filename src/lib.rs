//! Leakage-free temporal features for football match outcomes.
//!
//! Turns a historical match log (one row per played match) into a per-match
//! feature table describing each side's recent form, scoring strength and
//! defensive strength, where every statistic reflects only information
//! available before kickoff.

pub mod aliases;
pub mod baselines;
pub mod error;
pub mod export;
pub mod features;
pub mod match_log;
pub mod model_matrix;
pub mod normalize;
pub mod strength;
pub mod synthetic;
pub mod team_form;
