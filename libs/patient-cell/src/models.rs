use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use shared_models::record::RawRecord;

/// Canonical patient record. Serializes with the canonical (legacy) field
/// names; `Id` is the store-assigned integer key, `id` the cosmetic
/// display code shown in lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "id")]
    pub code: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub emergency_contact: EmergencyContact,
    pub allergies: Vec<String>,
    pub blood_type: Option<BloodType>,
    /// Set by the store at creation; never written on update.
    pub registration_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub relationship: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
            Gender::Other => write!(f, "other"),
        }
    }
}

/// The eight ABO/Rh combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "A+" => Some(BloodType::APositive),
            "A-" => Some(BloodType::ANegative),
            "B+" => Some(BloodType::BPositive),
            "B-" => Some(BloodType::BNegative),
            "AB+" => Some(BloodType::AbPositive),
            "AB-" => Some(BloodType::AbNegative),
            "O+" => Some(BloodType::OPositive),
            "O-" => Some(BloodType::ONegative),
            _ => None,
        }
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
        };
        write!(f, "{}", label)
    }
}

/// Source-field priority lists, external `_c` convention first.
mod fields {
    pub const CODE: &[&str] = &["id_c", "id"];
    pub const FIRST_NAME: &[&str] = &["first_name_c", "firstName"];
    pub const LAST_NAME: &[&str] = &["last_name_c", "lastName"];
    pub const DATE_OF_BIRTH: &[&str] = &["date_of_birth_c", "dateOfBirth"];
    pub const GENDER: &[&str] = &["gender_c", "gender"];
    pub const PHONE: &[&str] = &["phone_c", "phone"];
    pub const EMAIL: &[&str] = &["email_c", "email"];
    pub const ADDRESS: &[&str] = &["address_c", "address"];
    pub const EMERGENCY_CONTACT: &[&str] = &["emergency_contact_c", "emergencyContact"];
    pub const ALLERGIES: &[&str] = &["allergies_c", "allergies"];
    pub const BLOOD_TYPE: &[&str] = &["blood_type_c", "bloodType"];
    pub const REGISTRATION_DATE: &[&str] = &["registration_date_c", "registrationDate"];
}

impl Patient {
    pub const COLLECTION: &'static str = "patient_c";

    /// Store projection for list and single-record reads.
    pub const FIELDS: &'static [&'static str] = &[
        "Id",
        "id_c",
        "first_name_c",
        "last_name_c",
        "date_of_birth_c",
        "gender_c",
        "phone_c",
        "email_c",
        "address_c",
        "emergency_contact_c",
        "allergies_c",
        "blood_type_c",
        "registration_date_c",
    ];

    /// Normalizes a raw record in either naming convention. Records
    /// without a store-assigned `Id` are unusable and skipped upstream.
    pub fn from_record(rec: &RawRecord) -> Option<Self> {
        let id = rec.id()?;
        Some(Self {
            id,
            code: rec
                .opt_str_of(fields::CODE)
                .unwrap_or_else(|| format!("PAT{:03}", id)),
            first_name: rec.str_of(fields::FIRST_NAME),
            last_name: rec.str_of(fields::LAST_NAME),
            date_of_birth: rec.date_of(fields::DATE_OF_BIRTH),
            gender: rec
                .opt_str_of(fields::GENDER)
                .and_then(|raw| Gender::parse(&raw)),
            phone: rec.str_of(fields::PHONE),
            email: rec.str_of(fields::EMAIL),
            address: rec.str_of(fields::ADDRESS),
            emergency_contact: rec.sub_object(fields::EMERGENCY_CONTACT, "patient emergency contact"),
            allergies: rec.list_of(fields::ALLERGIES),
            blood_type: rec
                .opt_str_of(fields::BLOOD_TYPE)
                .and_then(|raw| BloodType::parse(&raw)),
            registration_date: rec.date_of(fields::REGISTRATION_DATE),
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Canonical create/update payload. `registrationDate` is deliberately
/// absent: the repository stamps it on create and never writes it back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientInput {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub emergency_contact: EmergencyContact,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub blood_type: Option<BloodType>,
}

impl PatientInput {
    /// Maps canonical fields to the store's external naming. Sequences
    /// and sub-objects are flattened the way the backing collection
    /// stores them: allergies as a comma-and-space-joined string, the
    /// emergency contact as serialized JSON.
    pub fn to_store_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("first_name_c".to_string(), json!(self.first_name));
        fields.insert("last_name_c".to_string(), json!(self.last_name));
        fields.insert(
            "date_of_birth_c".to_string(),
            match self.date_of_birth {
                Some(date) => json!(date.format("%Y-%m-%d").to_string()),
                None => Value::Null,
            },
        );
        fields.insert(
            "gender_c".to_string(),
            match self.gender {
                Some(gender) => json!(gender.to_string()),
                None => Value::Null,
            },
        );
        fields.insert("phone_c".to_string(), json!(self.phone));
        fields.insert("email_c".to_string(), json!(self.email));
        fields.insert("address_c".to_string(), json!(self.address));
        fields.insert(
            "emergency_contact_c".to_string(),
            json!(serde_json::to_string(&self.emergency_contact).unwrap_or_default()),
        );
        fields.insert("allergies_c".to_string(), json!(self.allergies.join(", ")));
        fields.insert(
            "blood_type_c".to_string(),
            match self.blood_type {
                Some(blood_type) => json!(blood_type.to_string()),
                None => Value::Null,
            },
        );
        fields
    }
}
