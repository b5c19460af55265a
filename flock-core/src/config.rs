use crate::error::{FlockError, FlockResult};
use crate::rules::{Alignment, Cohesion, Separation, SteeringRule};

/// Rule parameters for a whole run. Built once and never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockConfig {
    pub cohesion: Cohesion,
    pub separation: Separation,
    pub alignment: Alignment,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            cohesion: Cohesion::new(10.0, 1.0),
            separation: Separation::new(5.0, 1.0, 10.0),
            alignment: Alignment::new(8.0, 1.0),
        }
    }
}

impl FlockConfig {
    pub fn new(
        cohesion: Cohesion,
        separation: Separation,
        alignment: Alignment,
    ) -> FlockResult<Self> {
        let config = Self {
            cohesion,
            separation,
            alignment,
        };
        config.validate()?;
        Ok(config)
    }

    /// Radii and the separation cap must be finite and non-negative, gains
    /// finite.
    pub fn validate(&self) -> FlockResult<()> {
        non_negative("cohesion radius", self.cohesion.radius)?;
        non_negative("separation radius", self.separation.radius)?;
        non_negative("separation max force", self.separation.max_force)?;
        non_negative("alignment radius", self.alignment.radius)?;
        finite("cohesion gain", self.cohesion.gain)?;
        finite("separation gain", self.separation.gain)?;
        finite("alignment gain", self.alignment.gain)?;
        Ok(())
    }

    /// The rules in the order their forces are summed.
    pub fn rules(&self) -> [&dyn SteeringRule; 3] {
        [&self.cohesion, &self.separation, &self.alignment]
    }
}

fn finite(name: &'static str, value: f64) -> FlockResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(FlockError::InvalidParameter { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> FlockResult<()> {
    finite(name, value)?;
    if value < 0.0 {
        return Err(FlockError::InvalidParameter { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(FlockConfig::default().validate().is_ok());
    }

    #[test]
    fn test_negative_radius_rejected() {
        let err = FlockConfig::new(
            Cohesion::new(-1.0, 1.0),
            Separation::new(1.0, 1.0, 1.0),
            Alignment::new(1.0, 1.0),
        )
        .unwrap_err();
        assert_eq!(
            err,
            FlockError::InvalidParameter {
                name: "cohesion radius",
                value: -1.0
            }
        );
    }

    #[test]
    fn test_non_finite_gain_rejected() {
        let result = FlockConfig::new(
            Cohesion::new(1.0, 1.0),
            Separation::new(1.0, f64::INFINITY, 1.0),
            Alignment::new(1.0, 1.0),
        );
        assert!(matches!(
            result,
            Err(FlockError::InvalidParameter {
                name: "separation gain",
                ..
            })
        ));
    }

    #[test]
    fn test_nan_max_force_rejected() {
        let result = FlockConfig::new(
            Cohesion::new(1.0, 1.0),
            Separation::new(1.0, 1.0, f64::NAN),
            Alignment::new(1.0, 1.0),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_gain_allowed() {
        let result = FlockConfig::new(
            Cohesion::new(1.0, -2.0),
            Separation::new(0.0, 0.0, 0.0),
            Alignment::new(1.0, -0.5),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_rules_order() {
        let config = FlockConfig::default();
        let names: Vec<_> = config.rules().iter().map(|r| r.name()).collect();
        assert_eq!(names, ["cohesion", "separation", "alignment"]);
    }
}
