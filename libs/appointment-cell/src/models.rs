use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use shared_models::record::{RawRecord, RecordLink};

pub const DEFAULT_DURATION_MINUTES: i64 = 30;

/// Canonical appointment record. `date` and `timeSlot` together place it
/// on the scheduling grid; there is deliberately NO uniqueness constraint
/// on `(doctorId, date, timeSlot)` — double booking is representable and
/// nothing on the write path prevents it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(rename = "Id")]
    pub id: i64,
    /// Unresolvable references normalize to 0 and render as "Unknown".
    pub patient_id: i64,
    pub doctor_id: i64,
    pub date: Option<NaiveDate>,
    /// Zero-padded `HH:MM`, 30-minute granularity.
    pub time_slot: String,
    pub duration: i64,
    #[serde(rename = "type")]
    pub appointment_type: AppointmentType,
    pub status: AppointmentStatus,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AppointmentType {
    #[default]
    Consultation,
    #[serde(rename = "Follow-up")]
    FollowUp,
    #[serde(rename = "Physical Exam")]
    PhysicalExam,
    Vaccination,
    #[serde(rename = "Laboratory Test")]
    LaboratoryTest,
    #[serde(rename = "X-Ray")]
    XRay,
    Emergency,
    #[serde(rename = "Surgery Consultation")]
    SurgeryConsultation,
}

impl AppointmentType {
    pub const ALL: [AppointmentType; 8] = [
        AppointmentType::Consultation,
        AppointmentType::FollowUp,
        AppointmentType::PhysicalExam,
        AppointmentType::Vaccination,
        AppointmentType::LaboratoryTest,
        AppointmentType::XRay,
        AppointmentType::Emergency,
        AppointmentType::SurgeryConsultation,
    ];

    /// Lenient parse; unknown stored values fall back to the default.
    pub fn parse(raw: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.to_string() == raw)
            .unwrap_or_default()
    }
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AppointmentType::Consultation => "Consultation",
            AppointmentType::FollowUp => "Follow-up",
            AppointmentType::PhysicalExam => "Physical Exam",
            AppointmentType::Vaccination => "Vaccination",
            AppointmentType::LaboratoryTest => "Laboratory Test",
            AppointmentType::XRay => "X-Ray",
            AppointmentType::Emergency => "Emergency",
            AppointmentType::SurgeryConsultation => "Surgery Consultation",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "confirmed" => AppointmentStatus::Confirmed,
            "cancelled" => AppointmentStatus::Cancelled,
            "completed" => AppointmentStatus::Completed,
            _ => AppointmentStatus::Pending,
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Completed => write!(f, "completed"),
        }
    }
}

mod fields {
    pub const PATIENT_ID: &[&str] = &["patient_id_c", "patientId"];
    pub const DOCTOR_ID: &[&str] = &["doctor_id_c", "doctorId"];
    pub const DATE: &[&str] = &["date_c", "date"];
    pub const TIME_SLOT: &[&str] = &["time_slot_c", "timeSlot"];
    pub const DURATION: &[&str] = &["duration_c", "duration"];
    pub const TYPE: &[&str] = &["type_c", "type"];
    pub const STATUS: &[&str] = &["status_c", "status"];
    pub const NOTES: &[&str] = &["notes_c", "notes"];
}

impl Appointment {
    pub const COLLECTION: &'static str = "appointment_c";

    pub const FIELDS: &'static [&'static str] = &[
        "Id",
        "patient_id_c",
        "doctor_id_c",
        "date_c",
        "time_slot_c",
        "duration_c",
        "type_c",
        "status_c",
        "notes_c",
    ];

    pub fn from_record(rec: &RawRecord) -> Option<Self> {
        let id = rec.id()?;
        Some(Self {
            id,
            patient_id: rec.int_of(fields::PATIENT_ID).unwrap_or(0),
            doctor_id: rec.int_of(fields::DOCTOR_ID).unwrap_or(0),
            date: rec.date_of(fields::DATE),
            time_slot: rec.str_of(fields::TIME_SLOT),
            duration: rec
                .int_of(fields::DURATION)
                .filter(|minutes| *minutes > 0)
                .unwrap_or(DEFAULT_DURATION_MINUTES),
            appointment_type: rec
                .opt_str_of(fields::TYPE)
                .map(|raw| AppointmentType::parse(&raw))
                .unwrap_or_default(),
            status: rec
                .opt_str_of(fields::STATUS)
                .map(|raw| AppointmentStatus::parse(&raw))
                .unwrap_or_default(),
            notes: rec.str_of(fields::NOTES),
        })
    }

    /// String form of the patient reference, for display-layer equality.
    pub fn patient_key(&self) -> String {
        self.patient_id.to_string()
    }

    pub fn doctor_key(&self) -> String {
        self.doctor_id.to_string()
    }

    pub fn falls_on(&self, day: NaiveDate) -> bool {
        self.date == Some(day)
    }
}

/// Ascending `(date, timeSlot)` ordering for list views. Equivalent to
/// comparing the ISO date string and the zero-padded slot string
/// lexicographically.
pub fn sort_by_schedule(appointments: &mut [Appointment]) {
    appointments.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.time_slot.cmp(&b.time_slot))
    });
}

/// Canonical booking payload. Relationship and duration fields accept
/// whatever scalar shape the form produced; the repository coerces them
/// to integers before submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentInput {
    #[serde(default)]
    pub patient_id: Value,
    #[serde(default)]
    pub doctor_id: Value,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time_slot: String,
    #[serde(default)]
    pub duration: Value,
    #[serde(default, rename = "type")]
    pub appointment_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub notes: String,
}

impl AppointmentInput {
    pub fn patient_ref(&self) -> Option<i64> {
        RecordLink::resolve(&self.patient_id)
    }

    pub fn doctor_ref(&self) -> Option<i64> {
        RecordLink::resolve(&self.doctor_id)
    }

    pub fn to_store_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert(
            "patient_id_c".to_string(),
            self.patient_ref().map(|id| json!(id)).unwrap_or(Value::Null),
        );
        fields.insert(
            "doctor_id_c".to_string(),
            self.doctor_ref().map(|id| json!(id)).unwrap_or(Value::Null),
        );
        fields.insert(
            "date_c".to_string(),
            match self.date {
                Some(date) => json!(date.format("%Y-%m-%d").to_string()),
                None => Value::Null,
            },
        );
        fields.insert("time_slot_c".to_string(), json!(self.time_slot));
        fields.insert(
            "duration_c".to_string(),
            json!(RecordLink::resolve(&self.duration).unwrap_or(DEFAULT_DURATION_MINUTES)),
        );
        fields.insert(
            "type_c".to_string(),
            json!(AppointmentType::parse(&self.appointment_type).to_string()),
        );
        fields.insert(
            "status_c".to_string(),
            json!(AppointmentStatus::parse(&self.status).to_string()),
        );
        fields.insert("notes_c".to_string(), json!(self.notes));
        fields
    }
}
