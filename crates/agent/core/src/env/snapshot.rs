//! Read-only view of the world used for one decision step.

use std::collections::BTreeSet;

use crate::action::{Action, ActionSet};
use crate::config::AgentConfig;
use crate::env::TerrainOracle;
use crate::state::Position;

/// Entity placement owned by the world subsystem.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntityLayout {
    pub predators: Vec<Position>,
    pub food: Vec<Position>,
    pub trees: BTreeSet<Position>,
    pub rocks: BTreeSet<Position>,
}

impl EntityLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trees and rocks block movement; predators and food do not.
    pub fn is_obstacle(&self, position: Position) -> bool {
        self.trees.contains(&position) || self.rocks.contains(&position)
    }
}

/// Closest entity of some kind and its Manhattan distance from the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nearest {
    pub target: Position,
    pub distance: u32,
}

/// Returns the closest position to `from`; ties keep the earliest candidate.
pub fn nearest_of<'a>(
    from: Position,
    candidates: impl IntoIterator<Item = &'a Position>,
) -> Option<Nearest> {
    candidates
        .into_iter()
        .fold(None, |best: Option<Nearest>, &target| {
            let distance = from.distance(target);
            match best {
                Some(current) if current.distance <= distance => Some(current),
                _ => Some(Nearest { target, distance }),
            }
        })
}

/// Snapshot of everything the decision engine may read during one step.
#[derive(Clone, Copy, Debug)]
pub struct WorldSnapshot<'a> {
    pub agent: Position,
    pub hunger: f64,
    pub entities: &'a EntityLayout,
    /// Moves whose destination is in-bounds, on land and free of obstacles.
    pub validity: ActionSet,
}

impl<'a> WorldSnapshot<'a> {
    /// Captures the agent's surroundings, deriving the validity mask from
    /// terrain and obstacles.
    pub fn capture(
        agent: Position,
        hunger: f64,
        terrain: &dyn TerrainOracle,
        entities: &'a EntityLayout,
    ) -> Self {
        let validity = ActionSet::from_passable(|action| {
            let destination = agent.step(action);
            terrain.is_land(destination) && !entities.is_obstacle(destination)
        });

        Self {
            agent,
            hunger,
            entities,
            validity,
        }
    }

    pub fn nearest_predator(&self) -> Option<Nearest> {
        nearest_of(self.agent, &self.entities.predators)
    }

    pub fn nearest_food(&self) -> Option<Nearest> {
        nearest_of(self.agent, &self.entities.food)
    }

    pub fn nearest_tree(&self) -> Option<Nearest> {
        nearest_of(self.agent, &self.entities.trees)
    }

    pub fn nearest_rock(&self) -> Option<Nearest> {
        nearest_of(self.agent, &self.entities.rocks)
    }

    pub fn predator_near(&self) -> bool {
        self.nearest_predator()
            .is_some_and(|nearest| nearest.distance <= AgentConfig::PREDATOR_NEAR)
    }

    pub fn food_near(&self) -> bool {
        self.nearest_food()
            .is_some_and(|nearest| nearest.distance <= AgentConfig::FOOD_NEAR)
    }

    pub fn is_hungry(&self) -> bool {
        self.hunger <= AgentConfig::HUNGRY_AT
    }

    pub fn is_valid(&self, action: Action) -> bool {
        self.validity.allows(action)
    }

    /// HUD label summarising the abstract state ("calm" when no flag is set).
    pub fn state_label(&self) -> String {
        let tags: Vec<&str> = [
            (self.predator_near(), "predator near"),
            (self.is_hungry(), "hungry"),
            (self.food_near(), "food near"),
        ]
        .into_iter()
        .filter_map(|(set, tag)| set.then_some(tag))
        .collect();

        if tags.is_empty() {
            "calm".to_string()
        } else {
            tags.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{MapDimensions, TerrainGrid, TerrainKind};

    fn open_grid() -> TerrainGrid {
        TerrainGrid::filled(MapDimensions::new(10, 10), TerrainKind::Land)
    }

    #[test]
    fn nearest_prefers_first_on_ties() {
        let from = Position::new(5, 5);
        let list = [Position::new(5, 7), Position::new(7, 5), Position::new(5, 6)];
        let nearest = nearest_of(from, &list).unwrap();
        assert_eq!(nearest.target, Position::new(5, 6));
        assert_eq!(nearest.distance, 1);

        let tied = [Position::new(5, 7), Position::new(7, 5)];
        assert_eq!(nearest_of(from, &tied).unwrap().target, Position::new(5, 7));
        assert_eq!(nearest_of(from, Vec::<Position>::new().iter()), None);
    }

    #[test]
    fn capture_masks_obstacles_water_and_bounds() {
        let mut grid = open_grid();
        grid.set(Position::new(1, 0), TerrainKind::Water);
        let mut entities = EntityLayout::new();
        entities.trees.insert(Position::new(0, 1));

        let snapshot = WorldSnapshot::capture(Position::new(0, 0), 80.0, &grid, &entities);
        assert_eq!(snapshot.validity, ActionSet::STAY_ONLY);

        entities.trees.clear();
        entities.rocks.insert(Position::new(6, 5));
        let snapshot = WorldSnapshot::capture(Position::new(5, 5), 80.0, &grid, &entities);
        assert!(snapshot.is_valid(Action::Up));
        assert!(snapshot.is_valid(Action::Down));
        assert!(snapshot.is_valid(Action::Left));
        assert!(!snapshot.is_valid(Action::Right));
    }

    #[test]
    fn state_label_lists_active_flags() {
        let grid = open_grid();
        let mut entities = EntityLayout::new();
        let calm = WorldSnapshot::capture(Position::new(5, 5), 90.0, &grid, &entities);
        assert_eq!(calm.state_label(), "calm");

        entities.predators.push(Position::new(5, 8));
        entities.food.push(Position::new(1, 5));
        let busy = WorldSnapshot::capture(Position::new(5, 5), 40.0, &grid, &entities);
        assert_eq!(busy.state_label(), "predator near, hungry, food near");
    }
}
