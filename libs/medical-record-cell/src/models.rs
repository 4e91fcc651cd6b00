use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};

use shared_models::record::{RawRecord, RecordLink};

/// Canonical medical record. `prescription` and `vitalSigns` live in the
/// store as JSON-serialized sub-objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    #[serde(rename = "Id")]
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub visit_date: Option<NaiveDate>,
    pub diagnosis: String,
    pub prescription: Vec<PrescriptionItem>,
    pub notes: String,
    pub vital_signs: VitalSigns,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionItem {
    #[serde(default)]
    pub medication: String,
    #[serde(default)]
    pub dosage: String,
}

/// Measurements arrive as strings or bare numbers depending on which
/// client wrote them; all normalize to display strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSigns {
    #[serde(default, deserialize_with = "measurement")]
    pub blood_pressure: Option<String>,
    #[serde(default, deserialize_with = "measurement")]
    pub heart_rate: Option<String>,
    #[serde(default, deserialize_with = "measurement")]
    pub temperature: Option<String>,
    #[serde(default, deserialize_with = "measurement")]
    pub weight: Option<String>,
}

impl VitalSigns {
    pub fn is_empty(&self) -> bool {
        self.blood_pressure.is_none()
            && self.heart_rate.is_none()
            && self.temperature.is_none()
            && self.weight.is_none()
    }
}

fn measurement<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

mod fields {
    pub const PATIENT_ID: &[&str] = &["patient_id_c", "patientId"];
    pub const DOCTOR_ID: &[&str] = &["doctor_id_c", "doctorId"];
    pub const VISIT_DATE: &[&str] = &["visit_date_c", "visitDate"];
    pub const DIAGNOSIS: &[&str] = &["diagnosis_c", "diagnosis"];
    pub const PRESCRIPTION: &[&str] = &["prescription_c", "prescription"];
    pub const NOTES: &[&str] = &["notes_c", "notes"];
    pub const VITAL_SIGNS: &[&str] = &["vital_signs_c", "vitalSigns"];
}

impl MedicalRecord {
    pub const COLLECTION: &'static str = "medical_record_c";

    pub const FIELDS: &'static [&'static str] = &[
        "Id",
        "patient_id_c",
        "doctor_id_c",
        "visit_date_c",
        "diagnosis_c",
        "prescription_c",
        "notes_c",
        "vital_signs_c",
    ];

    pub fn from_record(rec: &RawRecord) -> Option<Self> {
        let id = rec.id()?;
        Some(Self {
            id,
            patient_id: rec.int_of(fields::PATIENT_ID).unwrap_or(0),
            doctor_id: rec.int_of(fields::DOCTOR_ID).unwrap_or(0),
            visit_date: rec.date_of(fields::VISIT_DATE),
            diagnosis: rec.str_of(fields::DIAGNOSIS),
            prescription: rec.sub_object(fields::PRESCRIPTION, "medical record prescription"),
            notes: rec.str_of(fields::NOTES),
            vital_signs: rec.sub_object(fields::VITAL_SIGNS, "medical record vital signs"),
        })
    }

    pub fn patient_key(&self) -> String {
        self.patient_id.to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecordInput {
    #[serde(default)]
    pub patient_id: Value,
    #[serde(default)]
    pub doctor_id: Value,
    #[serde(default)]
    pub visit_date: Option<NaiveDate>,
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub prescription: Vec<PrescriptionItem>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub vital_signs: VitalSigns,
}

impl MedicalRecordInput {
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
            "visit_date_c".to_string(),
            match self.visit_date {
                Some(date) => json!(date.format("%Y-%m-%d").to_string()),
                None => Value::Null,
            },
        );
        fields.insert("diagnosis_c".to_string(), json!(self.diagnosis));
        fields.insert(
            "prescription_c".to_string(),
            json!(serde_json::to_string(&self.prescription).unwrap_or_default()),
        );
        fields.insert("notes_c".to_string(), json!(self.notes));
        fields.insert(
            "vital_signs_c".to_string(),
            json!(serde_json::to_string(&self.vital_signs).unwrap_or_default()),
        );
        fields
    }
}
