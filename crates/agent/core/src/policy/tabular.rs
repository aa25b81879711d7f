use crate::action::ActionValues;
use crate::config::AgentConfig;
use crate::error::ShapeError;

/// Q-table over the eight flag states and five actions, row-major by state.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QTable {
    values: Vec<f64>,
}

impl QTable {
    const LEN: usize = AgentConfig::STATE_COUNT * AgentConfig::ACTION_COUNT;

    /// All-zero table.
    pub fn new() -> Self {
        Self {
            values: vec![0.0; Self::LEN],
        }
    }

    pub fn validate(&self) -> Result<(), ShapeError> {
        if self.values.len() != Self::LEN {
            return Err(ShapeError::Table {
                expected: Self::LEN,
                actual: self.values.len(),
            });
        }
        if self.values.iter().any(|value| !value.is_finite()) {
            return Err(ShapeError::NonFinite);
        }
        Ok(())
    }

    /// Action values of `state`; states outside the table read as zero.
    pub fn row(&self, state: usize) -> ActionValues {
        let mut row = [0.0; AgentConfig::ACTION_COUNT];
        let start = state * AgentConfig::ACTION_COUNT;
        if let Some(values) = self.values.get(start..start + AgentConfig::ACTION_COUNT) {
            row.copy_from_slice(values);
        }
        row
    }

    /// `Q[s,a] += alpha * (target - Q[s,a])`; returns the TD error.
    pub fn update(&mut self, state: usize, action: usize, target: f64, alpha: f64) -> f64 {
        let Some(value) = self
            .values
            .get_mut(state * AgentConfig::ACTION_COUNT + action)
            .filter(|_| action < AgentConfig::ACTION_COUNT)
        else {
            return 0.0;
        };
        let error = target - *value;
        *value += alpha * error;
        error
    }
}

impl Default for QTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_follows_q_learning_rule() {
        let mut table = QTable::new();
        let error = table.update(3, 1, 2.0, 0.1);
        assert_eq!(error, 2.0);
        assert!((table.row(3)[1] - 0.2).abs() < 1e-12);
        assert_eq!(table.row(2), [0.0; 5]);
    }

    #[test]
    fn out_of_range_reads_zero_and_ignores_updates() {
        let mut table = QTable::new();
        assert_eq!(table.row(99), [0.0; 5]);
        assert_eq!(table.update(99, 0, 1.0, 0.1), 0.0);
        assert_eq!(table.update(0, 7, 1.0, 0.1), 0.0);
        assert_eq!(table, QTable::new());
    }
}
