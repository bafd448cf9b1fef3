//! Pass/fail evaluation of computed metrics against tolerances
//!
//! The evaluator never fails. A metric that was not computed (an unset gain
//! slot, an empty aggregate sub-range, a patch outside the grayscale range)
//! simply produces no verdict.

pub mod evaluator;

pub use evaluator::QualityEvaluator;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::gain::GainSlot;

/// Outcome of one threshold comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn from_pass(pass: bool) -> Self {
        if pass {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    pub fn is_pass(&self) -> bool {
        *self == Verdict::Pass
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("PASS"),
            Verdict::Fail => f.write_str("FAIL"),
        }
    }
}

/// All verdicts of one run.
///
/// Per-patch vectors are indexed by patch ordinal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// ΔE verdict (LAB) or max channel deviation verdict (RGB) per patch
    pub patches: Vec<Verdict>,

    /// ΔL verdict per patch, grayscale patches of LAB runs only
    pub delta_l: Vec<Option<Verdict>>,

    /// ΔC verdict per patch, grayscale patches of LAB runs only
    pub delta_c: Vec<Option<Verdict>>,

    /// Mean ΔE over the color patches
    pub mean_delta_e: Option<Verdict>,

    /// Verdict per set gain-modulation slot that has bounds
    pub gain_modulation: BTreeMap<GainSlot, Verdict>,
}

impl Evaluation {
    /// Iterate over every verdict that was issued
    pub fn verdicts(&self) -> impl Iterator<Item = Verdict> + '_ {
        self.patches
            .iter()
            .copied()
            .chain(self.delta_l.iter().flatten().copied())
            .chain(self.delta_c.iter().flatten().copied())
            .chain(self.mean_delta_e)
            .chain(self.gain_modulation.values().copied())
    }

    /// Whether every issued verdict passed
    pub fn passed(&self) -> bool {
        self.verdicts().all(|verdict| verdict.is_pass())
    }

    /// Ordinals of patches that failed any per-patch check
    pub fn failed_patches(&self) -> Vec<usize> {
        (0..self.patches.len())
            .filter(|&patch| {
                self.patches[patch] == Verdict::Fail
                    || fails(&self.delta_l, patch)
                    || fails(&self.delta_c, patch)
            })
            .collect()
    }
}

fn fails(verdicts: &[Option<Verdict>], patch: usize) -> bool {
    verdicts.get(patch).copied().flatten() == Some(Verdict::Fail)
}
