//! Feature encoding: world snapshot to policy input.
//!
//! Two encodings are produced side by side so either policy variant can consume
//! the same [`Observation`]:
//!
//! - a normalized feature vector for the network policy
//! - a discrete state index in `[0, 8)` for the tabular policy

use bitflags::bitflags;

use crate::config::AgentConfig;
use crate::env::WorldSnapshot;

/// Normalized features, each in `[0, 1]`:
/// hunger fraction, predator distance, food distance, predator-near flag,
/// food-near flag.
pub type FeatureVector = [f64; AgentConfig::FEATURE_COUNT];

bitflags! {
    /// Binary situation flags; their bit pattern is the tabular state index.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct StateFlags: u8 {
        const PREDATOR_NEAR = 1 << 0;
        const HUNGRY = 1 << 1;
        const FOOD_NEAR = 1 << 2;
    }
}

impl StateFlags {
    #[inline]
    pub fn index(self) -> usize {
        usize::from(self.bits())
    }
}

/// Encoded state handed to the policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observation {
    pub features: FeatureVector,
    pub flags: StateFlags,
}

impl Observation {
    #[inline]
    pub fn state_index(&self) -> usize {
        self.flags.index()
    }
}

/// Pure mapping from [`WorldSnapshot`] to [`Observation`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FeatureEncoder;

impl FeatureEncoder {
    pub fn encode(snapshot: &WorldSnapshot<'_>) -> Observation {
        Observation {
            features: Self::features(snapshot),
            flags: Self::flags(snapshot),
        }
    }

    pub fn features(snapshot: &WorldSnapshot<'_>) -> FeatureVector {
        let predator = snapshot.nearest_predator();
        let food = snapshot.nearest_food();
        let sentinel = AgentConfig::DISTANCE_SENTINEL;

        let predator_distance = predator.map_or(sentinel, |nearest| nearest.distance);
        let food_distance = food.map_or(sentinel, |nearest| nearest.distance);

        [
            (snapshot.hunger / AgentConfig::MAX_HUNGER).clamp(0.0, 1.0),
            normalize_distance(predator_distance),
            normalize_distance(food_distance),
            flag(snapshot.predator_near()),
            flag(snapshot.food_near()),
        ]
    }

    pub fn flags(snapshot: &WorldSnapshot<'_>) -> StateFlags {
        let mut flags = StateFlags::empty();
        flags.set(StateFlags::PREDATOR_NEAR, snapshot.predator_near());
        flags.set(StateFlags::HUNGRY, snapshot.is_hungry());
        flags.set(StateFlags::FOOD_NEAR, snapshot.food_near());
        flags
    }
}

fn normalize_distance(distance: u32) -> f64 {
    (f64::from(distance) / f64::from(AgentConfig::DISTANCE_SENTINEL)).clamp(0.0, 1.0)
}

fn flag(set: bool) -> f64 {
    if set { 1.0 } else { 0.0 }
}
