//! Dog profile data model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ProfileError;
use crate::profile::flow::step_keys;

/// Biological sex of the dog. The capture form offers exactly these two
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Parse the form value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => None,
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
        }
    }
}

/// A completed dog profile, assembled from the wizard's collected fields
/// and handed to the save boundary as one aggregate payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DogProfile {
    pub name: String,
    pub sex: Sex,
    pub breed: String,
    pub birth_date: NaiveDate,
}

impl DogProfile {
    /// Assemble a profile from the wizard's collected mapping.
    ///
    /// The wizard validated each step on the way in, so failures here mean
    /// the mapping is incomplete or was built by something other than the
    /// capture flow.
    pub fn from_collected(collected: &Map<String, Value>) -> Result<Self, ProfileError> {
        let identity = collected
            .get(step_keys::IDENTITY)
            .ok_or(ProfileError::MissingField(step_keys::IDENTITY))?;
        let name = identity
            .get("name")
            .and_then(Value::as_str)
            .filter(|n| !n.trim().is_empty())
            .ok_or(ProfileError::InvalidField {
                field: "name",
                message: "must be a non-empty string".to_string(),
            })?
            .trim()
            .to_string();
        let sex = identity
            .get("sex")
            .and_then(Value::as_str)
            .and_then(Sex::parse)
            .ok_or(ProfileError::InvalidField {
                field: "sex",
                message: "must be male or female".to_string(),
            })?;

        let age = collected
            .get(step_keys::AGE)
            .ok_or(ProfileError::MissingField(step_keys::AGE))?;
        let birth_date = age
            .get("birth_date")
            .and_then(Value::as_str)
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .ok_or(ProfileError::InvalidField {
                field: "birth_date",
                message: "must be a YYYY-MM-DD date".to_string(),
            })?;

        let breed = collected
            .get(step_keys::BREED)
            .ok_or(ProfileError::MissingField(step_keys::BREED))?
            .get("breed")
            .and_then(Value::as_str)
            .filter(|b| !b.trim().is_empty())
            .ok_or(ProfileError::InvalidField {
                field: "breed",
                message: "must be a non-empty string".to_string(),
            })?
            .trim()
            .to_string();

        Ok(Self {
            name,
            sex,
            breed,
            birth_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collected() -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(
            step_keys::IDENTITY.to_string(),
            json!({"name": "Rex", "sex": "male"}),
        );
        map.insert(
            step_keys::AGE.to_string(),
            json!({"birth_date": "2021-06-15"}),
        );
        map.insert(step_keys::BREED.to_string(), json!({"breed": "Labrador"}));
        map
    }

    #[test]
    fn assembles_from_full_mapping() {
        let profile = DogProfile::from_collected(&collected()).unwrap();
        assert_eq!(profile.name, "Rex");
        assert_eq!(profile.sex, Sex::Male);
        assert_eq!(profile.breed, "Labrador");
        assert_eq!(
            profile.birth_date,
            NaiveDate::from_ymd_opt(2021, 6, 15).unwrap()
        );
    }

    #[test]
    fn missing_step_is_reported_by_key() {
        let mut map = collected();
        map.remove(step_keys::AGE);
        let err = DogProfile::from_collected(&map).unwrap_err();
        assert!(matches!(err, ProfileError::MissingField("age")));
    }

    #[test]
    fn bad_sex_value_rejected() {
        let mut map = collected();
        map.insert(
            step_keys::IDENTITY.to_string(),
            json!({"name": "Rex", "sex": "other"}),
        );
        let err = DogProfile::from_collected(&map).unwrap_err();
        assert!(matches!(err, ProfileError::InvalidField { field: "sex", .. }));
    }

    #[test]
    fn name_is_trimmed() {
        let mut map = collected();
        map.insert(
            step_keys::IDENTITY.to_string(),
            json!({"name": "  Rex ", "sex": "female"}),
        );
        let profile = DogProfile::from_collected(&map).unwrap();
        assert_eq!(profile.name, "Rex");
        assert_eq!(profile.sex, Sex::Female);
    }

    #[test]
    fn profile_serde_roundtrip() {
        let profile = DogProfile::from_collected(&collected()).unwrap();
        let json = serde_json::to_string(&profile).unwrap();
        let parsed: DogProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, profile);
        assert!(json.contains("\"male\""));
    }
}
