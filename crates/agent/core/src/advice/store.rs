use crate::env::WorldSnapshot;

use super::rule::AdviceRule;

/// Ordered list of operator rules.
///
/// Insertion order is preserved; there is no deduplication and no upper bound.
#[derive(Clone, Debug, Default)]
pub struct AdviceRuleStore {
    rules: Vec<AdviceRule>,
}

impl AdviceRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, rule: AdviceRule) {
        tracing::info!(id = %rule.id, text = %rule.text, "advice rule added");
        self.rules.push(rule);
    }

    /// Removes every rule and returns how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.rules.len();
        self.rules.clear();
        count
    }

    /// Removes the most recently added rule.
    pub fn remove_last(&mut self) -> Option<AdviceRule> {
        self.rules.pop()
    }

    pub fn rules(&self) -> &[AdviceRule] {
        &self.rules
    }

    pub fn texts(&self) -> Vec<String> {
        self.rules.iter().map(|rule| rule.text.clone()).collect()
    }

    /// Rules whose condition holds for `snapshot`, in insertion order.
    pub fn active<'s>(&'s self, snapshot: &WorldSnapshot<'_>) -> impl Iterator<Item = &'s AdviceRule> {
        let snapshot = *snapshot;
        self.rules
            .iter()
            .filter(move |rule| rule.condition.holds(&snapshot))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::rule::{AdviceAction, AdviceCondition, RuleId};
    use crate::env::{EntityLayout, MapDimensions, TerrainGrid, TerrainKind};
    use crate::state::Position;

    fn rule(id: u64, action: AdviceAction, condition: AdviceCondition) -> AdviceRule {
        AdviceRule::new(RuleId(id), action, condition)
    }

    #[test]
    fn lifecycle_preserves_order() {
        let mut store = AdviceRuleStore::new();
        store.add(rule(1, AdviceAction::SeekFood, AdviceCondition::Always));
        store.add(rule(2, AdviceAction::Stay, AdviceCondition::FoodNear));
        store.add(rule(3, AdviceAction::SeekFood, AdviceCondition::Always));
        assert_eq!(store.texts(), vec!["seek food", "stay put when food nearby", "seek food"]);

        assert_eq!(store.remove_last().map(|rule| rule.id), Some(RuleId(3)));
        assert_eq!(store.len(), 2);
        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
        assert_eq!(store.remove_last(), None);
    }

    #[test]
    fn active_filters_by_condition() {
        let grid = TerrainGrid::filled(MapDimensions::new(8, 8), TerrainKind::Land);
        let entities = EntityLayout::new();
        let snapshot = WorldSnapshot::capture(Position::new(3, 3), 80.0, &grid, &entities);

        let mut store = AdviceRuleStore::new();
        store.add(rule(1, AdviceAction::SeekFood, AdviceCondition::FoodNear));
        store.add(rule(2, AdviceAction::Stay, AdviceCondition::Always));

        let active: Vec<RuleId> = store.active(&snapshot).map(|rule| rule.id).collect();
        assert_eq!(active, vec![RuleId(2)]);
    }
}
