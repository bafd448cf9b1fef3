//! Tonal-ramp anchor patches used for gain modulation

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One named step of the descending lightness ramp.
///
/// Declared in ramp order, brightest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RampStep {
    L95,
    L90,
    L85,
    L80,
    L25,
    L20,
    L10,
    L5,
}

impl RampStep {
    /// All steps in ramp order
    pub const ALL: [RampStep; 8] = [
        RampStep::L95,
        RampStep::L90,
        RampStep::L85,
        RampStep::L80,
        RampStep::L25,
        RampStep::L20,
        RampStep::L10,
        RampStep::L5,
    ];

    /// Nominal L* of the step
    pub fn percent(&self) -> u8 {
        match self {
            RampStep::L95 => 95,
            RampStep::L90 => 90,
            RampStep::L85 => 85,
            RampStep::L80 => 80,
            RampStep::L25 => 25,
            RampStep::L20 => 20,
            RampStep::L10 => 10,
            RampStep::L5 => 5,
        }
    }
}

impl fmt::Display for RampStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L*{}", self.percent())
    }
}

/// Mapping from ramp step to the patch ordinal that prints it.
///
/// Stored 0-based. On disk the anchors are 1-based patch numbers where `0`
/// (or a missing key) marks an absent step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<RampStep, usize>", into = "BTreeMap<RampStep, usize>")]
pub struct RampAnchors {
    anchors: BTreeMap<RampStep, usize>,
}

impl RampAnchors {
    /// Build from 1-based patch numbers in ramp order, `0` meaning absent
    pub fn from_one_based(numbers: [usize; 8]) -> Self {
        RampStep::ALL
            .iter()
            .zip(numbers)
            .map(|(step, number)| (*step, number))
            .collect::<BTreeMap<_, _>>()
            .into()
    }

    /// Patch ordinal for `step`, if the target prints it
    pub fn get(&self, step: RampStep) -> Option<usize> {
        self.anchors.get(&step).copied()
    }

    /// Set `step` to a 0-based patch ordinal
    pub fn insert(&mut self, step: RampStep, ordinal: usize) {
        self.anchors.insert(step, ordinal);
    }

    /// Present anchors in ramp order
    pub fn iter(&self) -> impl Iterator<Item = (RampStep, usize)> + '_ {
        self.anchors.iter().map(|(step, ordinal)| (*step, *ordinal))
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

impl From<BTreeMap<RampStep, usize>> for RampAnchors {
    fn from(one_based: BTreeMap<RampStep, usize>) -> Self {
        let anchors = one_based
            .into_iter()
            .filter(|(_, number)| *number != 0)
            .map(|(step, number)| (step, number - 1))
            .collect();
        Self { anchors }
    }
}

impl From<RampAnchors> for BTreeMap<RampStep, usize> {
    fn from(ramp: RampAnchors) -> Self {
        ramp.anchors
            .into_iter()
            .map(|(step, ordinal)| (step, ordinal + 1))
            .collect()
    }
}
