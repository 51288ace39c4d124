use crate::models::{CareerStage, Profile};

/// Age assumed when a profile does not state one
const DEFAULT_AGE: u8 = 30;

/// Derive the career stage from age and years of experience.
///
/// Missing values fall back to age 30 and zero years of experience, so every
/// profile lands in some stage. Rules are evaluated in order; first match wins.
pub fn career_stage(profile: &Profile) -> CareerStage {
    let age = profile.age.unwrap_or(DEFAULT_AGE);
    let experience = profile.years_experience.unwrap_or(0);

    if age <= 30 || experience <= 3 {
        CareerStage::Early
    } else if age <= 40 || experience <= 10 {
        CareerStage::Mid
    } else if age <= 55 || experience <= 20 {
        CareerStage::Senior
    } else {
        CareerStage::Expert
    }
}

impl CareerStage {
    /// Number of steps between two stages on the ordered scale
    pub fn distance(self, other: CareerStage) -> u8 {
        (self as u8).abs_diff(other as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(age: Option<u8>, experience: Option<u8>) -> Profile {
        Profile {
            id: "p".to_string(),
            age,
            years_experience: experience,
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_data_defaults_to_early() {
        assert_eq!(career_stage(&profile(None, None)), CareerStage::Early);
    }

    #[test]
    fn test_low_experience_keeps_older_doctors_early() {
        // Experience defaults to zero, which satisfies the first rule
        assert_eq!(career_stage(&profile(Some(50), None)), CareerStage::Early);
        assert_eq!(career_stage(&profile(Some(50), Some(2))), CareerStage::Early);
    }

    #[test]
    fn test_stage_thresholds() {
        assert_eq!(career_stage(&profile(Some(35), Some(8))), CareerStage::Mid);
        assert_eq!(career_stage(&profile(Some(45), Some(8))), CareerStage::Mid);
        assert_eq!(career_stage(&profile(Some(45), Some(15))), CareerStage::Senior);
        assert_eq!(career_stage(&profile(Some(60), Some(18))), CareerStage::Senior);
        assert_eq!(career_stage(&profile(Some(60), Some(25))), CareerStage::Expert);
    }

    #[test]
    fn test_stage_distance() {
        assert_eq!(CareerStage::Early.distance(CareerStage::Early), 0);
        assert_eq!(CareerStage::Mid.distance(CareerStage::Early), 1);
        assert_eq!(CareerStage::Early.distance(CareerStage::Expert), 3);
    }
}
