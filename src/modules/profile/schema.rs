use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{ValidateEmail, ValidateLength};

use super::model::{Biodata, BiodataFields, BiodataId, Gender, MaritalStatus};
use crate::errors::AppError;
use crate::modules::auth::model::AccountId;

/// Required fields, in the order they are reported back.
pub const REQUIRED_FIELDS: [&str; 9] = [
    "surname",
    "second_name",
    "age",
    "marital_status",
    "gender",
    "telephone",
    "address",
    "next_of_kin",
    "email",
];

// =============================================================================
// SAVE BIODATA
// =============================================================================

/// Raw biodata submission. Fields stay loosely typed so that every missing
/// or malformed field can be reported in one response instead of failing at
/// the first deserialization error.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BiodataRequest {
    pub surname: Option<Value>,
    pub middle_name: Option<Value>,
    pub second_name: Option<Value>,
    pub age: Option<Value>,
    pub marital_status: Option<Value>,
    pub gender: Option<Value>,
    pub telephone: Option<Value>,
    pub address: Option<Value>,
    pub next_of_kin: Option<Value>,
    pub email: Option<Value>,
    pub profile_image: Option<Value>,
}

/// Upper bound for `age`.
pub const MAX_AGE: u32 = 150;

// Column widths in characters, see migrations/*_create_biodata.sql.
const NAME_MAX_CHARS: u64 = 50;
const TELEPHONE_MAX_CHARS: u64 = 20;
const NEXT_OF_KIN_MAX_CHARS: u64 = 100;
const EMAIL_MAX_CHARS: u64 = 255;
const PROFILE_IMAGE_MAX_CHARS: u64 = 255;
// TEXT holds 65,535 bytes, utf8mb4 needs up to 4 per character.
const ADDRESS_MAX_CHARS: u64 = 65_535 / 4;

enum Field {
    Missing,
    Invalid,
    Present(String),
}

/// Numbers are stringified. Blank after trimming means missing, anything
/// else is kept exactly as submitted.
fn read_text(value: &Option<Value>) -> Field {
    match value {
        None | Some(Value::Null) => Field::Missing,
        Some(Value::String(s)) if s.trim().is_empty() => Field::Missing,
        Some(Value::String(s)) => Field::Present(s.clone()),
        Some(Value::Number(n)) => Field::Present(n.to_string()),
        Some(_) => Field::Invalid,
    }
}

fn read_age(value: &Option<Value>) -> Result<u32, bool> {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        _ => match read_text(value) {
            Field::Missing => return Err(true),
            Field::Invalid => None,
            Field::Present(text) => text.trim().parse::<u32>().ok(),
        },
    };
    match parsed {
        Some(age) if (1..=MAX_AGE).contains(&age) => Ok(age),
        _ => Err(false),
    }
}

#[derive(Default)]
struct Problems {
    missing: Vec<String>,
    invalid: Vec<String>,
}

impl Problems {
    fn required(&mut self, name: &str, value: &Option<Value>, max_chars: u64) -> Option<String> {
        match read_text(value) {
            Field::Present(text) => self.within(name, text, max_chars),
            Field::Missing => {
                self.missing.push(name.to_string());
                None
            }
            Field::Invalid => {
                self.invalid.push(name.to_string());
                None
            }
        }
    }

    fn optional(&mut self, name: &str, value: &Option<Value>, max_chars: u64) -> Option<String> {
        match read_text(value) {
            Field::Present(text) => self.within(name, text, max_chars),
            Field::Missing => None,
            Field::Invalid => {
                self.invalid.push(name.to_string());
                None
            }
        }
    }

    fn within(&mut self, name: &str, text: String, max_chars: u64) -> Option<String> {
        if text.validate_length(None, Some(max_chars), None) {
            Some(text)
        } else {
            self.invalid.push(name.to_string());
            None
        }
    }

    fn parsed<T: std::str::FromStr>(&mut self, name: &str, text: Option<String>) -> Option<T> {
        let text = text?;
        let parsed = text.parse::<T>().ok();
        if parsed.is_none() {
            self.invalid.push(name.to_string());
        }
        parsed
    }
}

impl BiodataRequest {
    /// Checks the submission against the required-field schema. Reports every
    /// missing field (in `REQUIRED_FIELDS` order) and every malformed or
    /// oversized one.
    pub fn validate(&self) -> Result<BiodataFields, AppError> {
        let mut problems = Problems::default();

        let surname = problems.required("surname", &self.surname, NAME_MAX_CHARS);
        let second_name = problems.required("second_name", &self.second_name, NAME_MAX_CHARS);
        let age = match read_age(&self.age) {
            Ok(age) => Some(age),
            Err(missing) => {
                if missing {
                    problems.missing.push("age".to_string());
                } else {
                    problems.invalid.push("age".to_string());
                }
                None
            }
        };
        let marital_status = problems.required("marital_status", &self.marital_status, u64::MAX);
        let marital_status = problems.parsed::<MaritalStatus>("marital_status", marital_status);
        let gender = problems.required("gender", &self.gender, u64::MAX);
        let gender = problems.parsed::<Gender>("gender", gender);
        let telephone = problems.required("telephone", &self.telephone, TELEPHONE_MAX_CHARS);
        let address = problems.required("address", &self.address, ADDRESS_MAX_CHARS);
        let next_of_kin = problems.required("next_of_kin", &self.next_of_kin, NEXT_OF_KIN_MAX_CHARS);
        let email = problems.required("email", &self.email, EMAIL_MAX_CHARS);
        let email = email.filter(|email| {
            let valid = email.validate_email();
            if !valid {
                problems.invalid.push("email".to_string());
            }
            valid
        });
        let middle_name = problems.optional("middle_name", &self.middle_name, NAME_MAX_CHARS);
        let profile_image =
            problems.optional("profile_image", &self.profile_image, PROFILE_IMAGE_MAX_CHARS);

        match (
            surname,
            second_name,
            age,
            marital_status,
            gender,
            telephone,
            address,
            next_of_kin,
            email,
        ) {
            (
                Some(surname),
                Some(second_name),
                Some(age),
                Some(marital_status),
                Some(gender),
                Some(telephone),
                Some(address),
                Some(next_of_kin),
                Some(email),
            ) if problems.invalid.is_empty() => Ok(BiodataFields {
                surname,
                middle_name,
                second_name,
                age,
                marital_status,
                gender,
                telephone,
                address,
                next_of_kin,
                email,
                profile_image,
            }),
            _ => Err(AppError::Validation {
                missing_fields: problems.missing,
                invalid_fields: problems.invalid,
            }),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBiodataResponse {
    pub success: bool,
    pub message: &'static str,
    pub user_id: AccountId,
    pub biodata_id: BiodataId,
}

// =============================================================================
// READ BIODATA
// =============================================================================

#[derive(Debug, Serialize)]
pub struct BiodataResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub data: Option<Biodata>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckBiodataResponse {
    pub success: bool,
    pub requires_biodata: bool,
    pub has_biodata: bool,
    pub biodata: Option<Biodata>,
}
