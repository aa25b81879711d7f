//! Structured advice rules.

use std::fmt;

use crate::action::Action;
use crate::env::WorldSnapshot;

/// Monotonic rule identifier; never reused within a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(pub u64);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Compass heading named in advice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Direction {
    North,
    South,
    West,
    East,
}

impl Direction {
    pub const fn action(self) -> Action {
        match self {
            Direction::North => Action::Up,
            Direction::South => Action::Down,
            Direction::West => Action::Left,
            Direction::East => Action::Right,
        }
    }
}

/// Behavior a rule pushes the agent towards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdviceAction {
    AvoidPredator,
    AvoidRocks,
    SeekFood,
    SeekTrees,
    Stay,
    Direction(Direction),
}

impl AdviceAction {
    pub fn describe(self) -> &'static str {
        match self {
            AdviceAction::AvoidPredator => "avoid predators",
            AdviceAction::AvoidRocks => "avoid rocks",
            AdviceAction::SeekFood => "seek food",
            AdviceAction::SeekTrees => "stay near trees",
            AdviceAction::Stay => "stay put",
            AdviceAction::Direction(Direction::North) => "go north",
            AdviceAction::Direction(Direction::South) => "go south",
            AdviceAction::Direction(Direction::West) => "go west",
            AdviceAction::Direction(Direction::East) => "go east",
        }
    }
}

/// Comparator of a hunger condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HungerOp {
    Below,
    Above,
}

impl HungerOp {
    pub fn symbol(self) -> &'static str {
        match self {
            HungerOp::Below => "<",
            HungerOp::Above => ">",
        }
    }
}

/// When a rule applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AdviceCondition {
    #[default]
    Always,
    /// Strict comparison against hunger; `value` is in `[0, 100]`.
    Hunger { op: HungerOp, value: u32 },
    PredatorNear,
    FoodNear,
}

impl AdviceCondition {
    pub fn holds(&self, snapshot: &WorldSnapshot<'_>) -> bool {
        match *self {
            AdviceCondition::Always => true,
            AdviceCondition::Hunger {
                op: HungerOp::Below,
                value,
            } => snapshot.hunger < f64::from(value),
            AdviceCondition::Hunger {
                op: HungerOp::Above,
                value,
            } => snapshot.hunger > f64::from(value),
            AdviceCondition::PredatorNear => snapshot.predator_near(),
            AdviceCondition::FoodNear => snapshot.food_near(),
        }
    }

    /// `None` for [`AdviceCondition::Always`].
    pub fn describe(&self) -> Option<String> {
        match self {
            AdviceCondition::Always => None,
            AdviceCondition::Hunger { op, value } => Some(format!("hunger {} {value}%", op.symbol())),
            AdviceCondition::PredatorNear => Some("predators nearby".to_string()),
            AdviceCondition::FoodNear => Some("food nearby".to_string()),
        }
    }
}

/// Immutable condition/action pair supplied by the operator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdviceRule {
    pub id: RuleId,
    pub action: AdviceAction,
    pub condition: AdviceCondition,
    /// Human-readable rendering, e.g. `seek food when hunger < 50%`.
    pub text: String,
}

impl AdviceRule {
    pub fn new(id: RuleId, action: AdviceAction, condition: AdviceCondition) -> Self {
        let text = match condition.describe() {
            Some(when) => format!("{} when {when}", action.describe()),
            None => action.describe().to_string(),
        };

        Self {
            id,
            action,
            condition,
            text,
        }
    }
}
