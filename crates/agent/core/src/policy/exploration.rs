use crate::config::AgentConfig;

/// Epsilon schedule: multiplicative decay per step with a hard floor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Exploration {
    epsilon: f64,
    decay: f64,
    floor: f64,
}

impl Exploration {
    /// Starts at `epsilon`, clamped into `[floor, 1]`.
    pub fn new(epsilon: f64, config: &AgentConfig) -> Self {
        let floor = config.epsilon_floor.clamp(0.0, 1.0);
        let epsilon = if epsilon.is_finite() {
            epsilon.clamp(floor, 1.0)
        } else {
            config.initial_epsilon.clamp(floor, 1.0)
        };

        Self {
            epsilon,
            decay: config.epsilon_decay,
            floor,
        }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(config.initial_epsilon, config)
    }

    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn decay(&mut self) {
        self.epsilon = (self.epsilon * self.decay).max(self.floor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_drops_below_floor() {
        let config = AgentConfig::default();
        for start in [0.05, 0.06, 0.3, 1.0] {
            let mut exploration = Exploration::new(start, &config);
            for _ in 0..20_000 {
                exploration.decay();
                assert!(exploration.epsilon() >= 0.05);
            }
            assert_eq!(exploration.epsilon(), 0.05);
        }
    }

    #[test]
    fn decays_multiplicatively() {
        let config = AgentConfig::default();
        let mut exploration = Exploration::from_config(&config);
        exploration.decay();
        assert!((exploration.epsilon() - 0.3 * 0.999).abs() < 1e-15);
    }

    #[test]
    fn restored_values_are_clamped() {
        let config = AgentConfig::default();
        assert_eq!(Exploration::new(0.01, &config).epsilon(), 0.05);
        assert_eq!(Exploration::new(3.0, &config).epsilon(), 1.0);
        assert_eq!(Exploration::new(f64::NAN, &config).epsilon(), 0.3);
    }
}
