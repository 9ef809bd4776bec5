use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::enums::CivilitePatient;
use super::user::User;
use super::Id;

/// Patient profile, linked 1:1 to a `User`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: Id,
    pub user: User,
    pub civilite: CivilitePatient,
    #[serde(default)]
    pub telephone: String,
    #[serde(default)]
    pub adresse: String,
    pub date_naissance: NaiveDate,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default, with = "super::datetime::option")]
    pub date_creation: Option<DateTime<Utc>>,
    #[serde(default)]
    pub nom_complet: Option<String>,
}

impl Patient {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.civilite, self.user.full_name())
    }

    /// Age in whole years on `today`; prefers the backend's value.
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        if let Some(age) = self.age {
            return age;
        }
        let born = self.date_naissance;
        let mut years = today.year() - born.year();
        if (today.month(), today.day()) < (born.month(), born.day()) {
            years -= 1;
        }
        years.max(0) as u32
    }
}
