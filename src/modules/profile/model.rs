use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::modules::auth::model::AccountId;

pub type BiodataId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    Widowed,
}

impl MaritalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Married => "Married",
            Self::Divorced => "Divorced",
            Self::Widowed => "Widowed",
        }
    }
}

impl FromStr for MaritalStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Single" => Ok(Self::Single),
            "Married" => Ok(Self::Married),
            "Divorced" => Ok(Self::Divorced),
            "Widowed" => Ok(Self::Widowed),
            _ => Err(()),
        }
    }
}

impl fmt::Display for MaritalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            "Other" => Ok(Self::Other),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The validated, typed content of a biodata submission. Every upsert
/// overwrites all of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiodataFields {
    pub surname: String,
    pub middle_name: Option<String>,
    pub second_name: String,
    pub age: u32,
    pub marital_status: MaritalStatus,
    pub gender: Gender,
    pub telephone: String,
    pub address: String,
    pub next_of_kin: String,
    pub email: String,
    pub profile_image: Option<String>,
}

/// A stored profile record. At most one per account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Biodata {
    pub id: BiodataId,
    pub account_id: AccountId,
    pub surname: String,
    pub middle_name: Option<String>,
    pub second_name: String,
    pub age: u32,
    pub marital_status: MaritalStatus,
    pub gender: Gender,
    pub telephone: String,
    pub address: String,
    pub next_of_kin: String,
    pub email: String,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Biodata {
    pub fn from_fields(
        id: BiodataId,
        account_id: AccountId,
        fields: BiodataFields,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            account_id,
            surname: fields.surname,
            middle_name: fields.middle_name,
            second_name: fields.second_name,
            age: fields.age,
            marital_status: fields.marital_status,
            gender: fields.gender,
            telephone: fields.telephone,
            address: fields.address,
            next_of_kin: fields.next_of_kin,
            email: fields.email,
            profile_image: fields.profile_image,
            created_at,
            updated_at,
        }
    }

    /// Names of required fields that are blank in this record. Stored rows
    /// normally pass, legacy rows written by other tools might not.
    pub fn blank_required_fields(&self) -> Vec<&'static str> {
        let text_fields = [
            ("surname", &self.surname),
            ("second_name", &self.second_name),
            ("telephone", &self.telephone),
            ("address", &self.address),
            ("next_of_kin", &self.next_of_kin),
            ("email", &self.email),
        ];

        let mut blank: Vec<&'static str> = text_fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if self.age == 0 {
            blank.push("age");
        }
        blank
    }
}

// =============================================================================
// DATABASE ROW
// =============================================================================

/// Row shape as read from MySQL; enum columns arrive as text.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BiodataRow {
    pub id: i64,
    pub account_id: i64,
    pub surname: String,
    pub middle_name: Option<String>,
    pub second_name: String,
    pub age: i32,
    pub marital_status: String,
    pub gender: String,
    pub telephone: String,
    pub address: String,
    pub next_of_kin: String,
    pub email: String,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<BiodataRow> for Biodata {
    type Error = String;

    fn try_from(row: BiodataRow) -> Result<Self, Self::Error> {
        let marital_status = row
            .marital_status
            .parse()
            .map_err(|_| format!("unknown marital_status {:?}", row.marital_status))?;
        let gender = row
            .gender
            .parse()
            .map_err(|_| format!("unknown gender {:?}", row.gender))?;
        let age = u32::try_from(row.age).map_err(|_| format!("negative age {}", row.age))?;

        Ok(Self {
            id: row.id,
            account_id: row.account_id,
            surname: row.surname,
            middle_name: row.middle_name,
            second_name: row.second_name,
            age,
            marital_status,
            gender,
            telephone: row.telephone,
            address: row.address,
            next_of_kin: row.next_of_kin,
            email: row.email,
            profile_image: row.profile_image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
