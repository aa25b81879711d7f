//! Labeled utterances the intent classifier is trained on at start-up.

use super::classifier::Intent;

/// `(intent, samples)` in label order.
pub const TRAINING_CORPUS: [(Intent, &[&str]); 9] = [
    (
        Intent::AvoidPredator,
        &[
            "avoid predators",
            "stay away from predators",
            "run from predators",
            "flee danger",
            "keep distance from predators",
            "hide from predators",
            "keep safe from predators",
            "stay safe",
            "avoid danger",
            "run away",
            "escape predators",
            "stop predators",
            "stop the predators",
        ],
    ),
    (
        Intent::SeekFood,
        &[
            "find food",
            "get food",
            "eat now",
            "look for food",
            "search for fruit",
            "forage for food",
            "find something to eat",
            "eat something",
            "grab food",
            "get some fruit",
            "look for berries",
            "feed yourself",
        ],
    ),
    (
        Intent::SeekTrees,
        &[
            "stay near trees",
            "go to trees",
            "hide in trees",
            "stick with trees",
            "go to the forest",
            "stay in the forest",
            "stick to the trees",
        ],
    ),
    (
        Intent::AvoidRocks,
        &[
            "avoid rocks",
            "stay away from rocks",
            "do not hit rocks",
            "rocks are dangerous",
            "avoid stones",
            "keep away from boulders",
            "do not touch rocks",
        ],
    ),
    (
        Intent::Stay,
        &[
            "stay",
            "wait",
            "hold position",
            "do not move",
            "pause here",
            "stay still",
            "hold still",
            "freeze",
        ],
    ),
    (
        Intent::North,
        &["go north", "head north", "move up", "north", "northward", "go up"],
    ),
    (
        Intent::South,
        &["go south", "head south", "move down", "south", "southward", "go down"],
    ),
    (
        Intent::West,
        &["go west", "head west", "move left", "west", "go left"],
    ),
    (
        Intent::East,
        &["go east", "head east", "move right", "east", "go right"],
    ),
];

/// Flattened `(text, label)` pairs in corpus order.
pub fn samples() -> impl Iterator<Item = (&'static str, Intent)> {
    TRAINING_CORPUS
        .iter()
        .flat_map(|(intent, texts)| texts.iter().map(move |text| (*text, *intent)))
}
