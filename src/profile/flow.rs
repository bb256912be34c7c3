//! Dog-profile capture flow — the three wizard steps and their validation.

use chrono::{NaiveDate, Utc};
use serde_json::Value;

use crate::wizard::WizardFlow;

use super::model::Sex;

/// Keys the capture steps store their output under.
pub mod step_keys {
    pub const IDENTITY: &str = "identity";
    pub const AGE: &str = "age";
    pub const BREED: &str = "breed";
}

/// The profile capture wizard: name and sex, then birth date, then breed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DogProfileFlow;

impl DogProfileFlow {
    pub fn new() -> Self {
        Self
    }
}

impl WizardFlow for DogProfileFlow {
    fn total_steps(&self) -> u32 {
        3
    }

    fn step_key(&self, step: u32) -> &'static str {
        match step {
            1 => step_keys::IDENTITY,
            2 => step_keys::AGE,
            _ => step_keys::BREED,
        }
    }

    fn validate(&self, step: u32, output: &Value) -> Result<(), String> {
        match step {
            1 => validate_identity(output),
            2 => validate_age(output),
            _ => validate_breed(output),
        }
    }
}

fn validate_identity(output: &Value) -> Result<(), String> {
    let name = output.get("name").and_then(Value::as_str).unwrap_or("");
    if name.trim().is_empty() {
        return Err("Please give your dog's name".to_string());
    }
    let sex = output.get("sex").and_then(Value::as_str).unwrap_or("");
    if Sex::parse(sex).is_none() {
        return Err("Please pick your dog's sex".to_string());
    }
    Ok(())
}

fn validate_age(output: &Value) -> Result<(), String> {
    let raw = output
        .get("birth_date")
        .and_then(Value::as_str)
        .ok_or_else(|| "Please pick your dog's birth date".to_string())?;
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| "Birth date must be a YYYY-MM-DD date".to_string())?;
    if date > Utc::now().date_naive() {
        return Err("Birth date cannot be in the future".to_string());
    }
    Ok(())
}

fn validate_breed(output: &Value) -> Result<(), String> {
    let breed = output.get("breed").and_then(Value::as_str).unwrap_or("");
    if breed.trim().is_empty() {
        return Err("Please pick a breed".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::wizard::{Advance, WizardEngine};

    #[test]
    fn identity_requires_name_and_known_sex() {
        let flow = DogProfileFlow::new();
        assert!(flow.validate(1, &json!({"name": "Rex", "sex": "male"})).is_ok());
        assert!(flow.validate(1, &json!({"name": "", "sex": "male"})).is_err());
        assert!(flow.validate(1, &json!({"name": "  ", "sex": "male"})).is_err());
        assert!(flow.validate(1, &json!({"name": "Rex", "sex": "unknown"})).is_err());
        assert!(flow.validate(1, &Value::Null).is_err());
    }

    #[test]
    fn age_requires_a_past_or_present_date() {
        let flow = DogProfileFlow::new();
        assert!(flow.validate(2, &json!({"birth_date": "2020-01-31"})).is_ok());
        assert!(flow.validate(2, &json!({"birth_date": "not-a-date"})).is_err());
        assert!(flow.validate(2, &json!({"birth_date": "9999-01-01"})).is_err());
        assert!(flow.validate(2, &Value::Null).is_err());
    }

    #[test]
    fn breed_requires_a_selection() {
        let flow = DogProfileFlow::new();
        assert!(flow.validate(3, &json!({"breed": "Labrador"})).is_ok());
        assert!(flow.validate(3, &json!({"breed": ""})).is_err());
        assert!(flow.validate(3, &Value::Null).is_err());
    }

    #[test]
    fn flow_drives_a_complete_capture() {
        let mut engine = WizardEngine::new(DogProfileFlow::new()).unwrap();
        engine
            .advance(json!({"name": "Rex", "sex": "male"}))
            .unwrap();
        engine
            .advance(json!({"birth_date": "2021-06-15"}))
            .unwrap();
        let result = engine.advance(json!({"breed": "Labrador"})).unwrap();
        assert_eq!(result, Advance::Submitted);

        let profile =
            crate::profile::DogProfile::from_collected(engine.state().collected()).unwrap();
        assert_eq!(profile.name, "Rex");
        assert_eq!(profile.breed, "Labrador");
    }
}
