use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use shared_models::record::RawRecord;

pub const DEFAULT_APPOINTMENT_DURATION: i64 = 30;

/// Canonical doctor record. `schedule` is an opaque mapping carried for
/// display; no booking logic reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    #[serde(rename = "Id")]
    pub id: i64,
    pub name: String,
    pub specialization: String,
    pub license: String,
    pub phone: String,
    pub email: String,
    pub appointment_duration: i64,
    pub schedule: Map<String, Value>,
}

mod fields {
    pub const NAME: &[&str] = &["name_c", "name"];
    pub const SPECIALIZATION: &[&str] = &["specialization_c", "specialization"];
    pub const LICENSE: &[&str] = &["license_c", "license"];
    pub const PHONE: &[&str] = &["phone_c", "phone"];
    pub const EMAIL: &[&str] = &["email_c", "email"];
    pub const APPOINTMENT_DURATION: &[&str] = &["appointment_duration_c", "appointmentDuration"];
    pub const SCHEDULE: &[&str] = &["schedule_c", "schedule"];
}

impl Doctor {
    pub const COLLECTION: &'static str = "doctor_c";

    pub const FIELDS: &'static [&'static str] = &[
        "Id",
        "name_c",
        "specialization_c",
        "license_c",
        "phone_c",
        "email_c",
        "appointment_duration_c",
        "schedule_c",
    ];

    pub fn from_record(rec: &RawRecord) -> Option<Self> {
        let id = rec.id()?;
        let appointment_duration = rec
            .int_of(fields::APPOINTMENT_DURATION)
            .filter(|minutes| *minutes > 0)
            .unwrap_or(DEFAULT_APPOINTMENT_DURATION);

        Some(Self {
            id,
            name: rec.str_of(fields::NAME),
            specialization: rec.str_of(fields::SPECIALIZATION),
            license: rec.str_of(fields::LICENSE),
            phone: rec.str_of(fields::PHONE),
            email: rec.str_of(fields::EMAIL),
            appointment_duration,
            schedule: rec.sub_object(fields::SCHEDULE, "doctor schedule"),
        })
    }

    pub fn display_name(&self) -> String {
        format!("Dr. {}", self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub license: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_duration")]
    pub appointment_duration: i64,
    #[serde(default)]
    pub schedule: Map<String, Value>,
}

fn default_duration() -> i64 {
    DEFAULT_APPOINTMENT_DURATION
}

impl DoctorInput {
    pub fn to_store_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("name_c".to_string(), json!(self.name));
        fields.insert("specialization_c".to_string(), json!(self.specialization));
        fields.insert("license_c".to_string(), json!(self.license));
        fields.insert("phone_c".to_string(), json!(self.phone));
        fields.insert("email_c".to_string(), json!(self.email));
        fields.insert(
            "appointment_duration_c".to_string(),
            json!(self.appointment_duration),
        );
        fields.insert(
            "schedule_c".to_string(),
            json!(serde_json::to_string(&self.schedule).unwrap_or_default()),
        );
        fields
    }
}
