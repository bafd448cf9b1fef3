//! Gain modulation from tonal-ramp patches
//!
//! Gain modulation is the ratio of measured to reference lightness change
//! between two ramp anchors. Each output slot tries its anchor pairs in
//! priority order and uses the first pair the target prints:
//!
//! | slot             | pairs (first match wins)                        |
//! |------------------|-------------------------------------------------|
//! | `HighlightsHigh` | L95-L90                                          |
//! | `HighlightsLow`  | L90-L85                                          |
//! | fallback         | L95-L85, L95-L80, L90-L80 (into `HighlightsHigh`, only when neither highlight slot was set) |
//! | `Midtone`        | L85-L25, L85-L20, L80-L25, L80-L20               |
//! | `Shadow`         | L85-L10, L85-L5, L80-L10, L80-L5                 |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{info, warn};

use crate::color::rounding::round2;
use crate::reference::RampStep::{L10, L20, L25, L5, L80, L85, L90, L95};
use crate::reference::{RampAnchors, RampStep};

const HIGHLIGHTS_HIGH_PAIRS: [(RampStep, RampStep); 1] = [(L95, L90)];
const HIGHLIGHTS_LOW_PAIRS: [(RampStep, RampStep); 1] = [(L90, L85)];
const HIGHLIGHT_FALLBACK_PAIRS: [(RampStep, RampStep); 3] = [(L95, L85), (L95, L80), (L90, L80)];
const MIDTONE_PAIRS: [(RampStep, RampStep); 4] = [(L85, L25), (L85, L20), (L80, L25), (L80, L20)];
const SHADOW_PAIRS: [(RampStep, RampStep); 4] = [(L85, L10), (L85, L5), (L80, L10), (L80, L5)];

/// Named gain-modulation output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GainSlot {
    HighlightsHigh,
    HighlightsLow,
    Midtone,
    Shadow,
}

impl GainSlot {
    pub const ALL: [GainSlot; 4] = [
        GainSlot::HighlightsHigh,
        GainSlot::HighlightsLow,
        GainSlot::Midtone,
        GainSlot::Shadow,
    ];
}

impl fmt::Display for GainSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GainSlot::HighlightsHigh => "highlights-high",
            GainSlot::HighlightsLow => "highlights-low",
            GainSlot::Midtone => "midtone",
            GainSlot::Shadow => "shadow",
        };
        f.write_str(name)
    }
}

/// How the lightness change between two anchors is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlopeMode {
    /// `(Lm1 - Lm2) / (Lr1 - Lr2)`
    #[default]
    Signed,
    /// `|Lm1 - Lm2| / |Lr1 - Lr2|`
    Absolute,
}

/// One computed gain-modulation value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainReading {
    /// Brighter anchor of the pair used
    pub from: RampStep,
    /// Darker anchor of the pair used
    pub to: RampStep,
    /// Slope, two decimals
    pub value: f64,
}

impl GainReading {
    /// Pair label in `L*95-L*90` form
    pub fn label(&self) -> String {
        format!("{}-{}", self.from, self.to)
    }
}

/// Gain-modulation readings keyed by slot. Slots with no eligible pair are
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GainModulation {
    readings: BTreeMap<GainSlot, GainReading>,
}

impl GainModulation {
    pub fn get(&self, slot: GainSlot) -> Option<&GainReading> {
        self.readings.get(&slot)
    }

    /// Set readings in slot order
    pub fn iter(&self) -> impl Iterator<Item = (GainSlot, &GainReading)> + '_ {
        self.readings.iter().map(|(slot, reading)| (*slot, reading))
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

/// Gain modulation selector for one run
#[derive(Debug, Clone, Copy, Default)]
pub struct GainModulationSelector {
    mode: SlopeMode,
}

impl GainModulationSelector {
    pub fn new(mode: SlopeMode) -> Self {
        Self { mode }
    }

    /// Compute every slot that has an eligible anchor pair.
    ///
    /// # Arguments
    ///
    /// * `anchors` - Ramp anchors as 0-based patch ordinals
    /// * `reference_l` - Reference L* per patch
    /// * `measured_l` - Measured L* per patch
    pub fn compute(
        &self,
        anchors: &RampAnchors,
        reference_l: &[f64],
        measured_l: &[f64],
    ) -> GainModulation {
        let mut readings = BTreeMap::new();

        let mut place = |slot: GainSlot, pairs: &[(RampStep, RampStep)]| -> bool {
            let Some((from, to, a, b)) = first_present(anchors, pairs) else {
                return false;
            };
            match self.slope(a, b, reference_l, measured_l) {
                Some(value) => {
                    readings.insert(slot, GainReading { from, to, value });
                }
                None => {
                    let pair = format!("{}-{}", from, to);
                    warn!(%slot, %pair, "Reference lightness span is zero, slot left unset");
                }
            }
            true
        };

        let high = place(GainSlot::HighlightsHigh, &HIGHLIGHTS_HIGH_PAIRS[..]);
        let low = place(GainSlot::HighlightsLow, &HIGHLIGHTS_LOW_PAIRS[..]);
        if !high && !low {
            place(GainSlot::HighlightsHigh, &HIGHLIGHT_FALLBACK_PAIRS[..]);
        }
        place(GainSlot::Midtone, &MIDTONE_PAIRS[..]);
        place(GainSlot::Shadow, &SHADOW_PAIRS[..]);

        info!(slots = readings.len(), "Gain modulation computed");
        GainModulation { readings }
    }

    fn slope(&self, a: usize, b: usize, reference_l: &[f64], measured_l: &[f64]) -> Option<f64> {
        let measured = measured_l.get(a)? - measured_l.get(b)?;
        let reference = reference_l.get(a)? - reference_l.get(b)?;
        if reference == 0.0 {
            return None;
        }
        let ratio = match self.mode {
            SlopeMode::Signed => measured / reference,
            SlopeMode::Absolute => measured.abs() / reference.abs(),
        };
        Some(round2(ratio))
    }
}

/// First pair in `pairs` whose two anchors are both printed
fn first_present(
    anchors: &RampAnchors,
    pairs: &[(RampStep, RampStep)],
) -> Option<(RampStep, RampStep, usize, usize)> {
    pairs.iter().find_map(|(from, to)| {
        Some((*from, *to, anchors.get(*from)?, anchors.get(*to)?))
    })
}
