use std::sync::Mutex;

use serde_json::{json, Map, Value};

use shared_models::notify::Notify;

/// Notifier double that records every notice for assertions.
#[derive(Default)]
pub struct CapturingNotifier {
    notices: Mutex<Vec<Notice>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl CapturingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn successes(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter_map(|notice| match notice {
                Notice::Success(msg) => Some(msg),
                Notice::Error(_) => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter_map(|notice| match notice {
                Notice::Error(msg) => Some(msg),
                Notice::Success(_) => None,
            })
            .collect()
    }
}

impl Notify for CapturingNotifier {
    fn success(&self, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push(Notice::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push(Notice::Error(message.to_string()));
    }
}

/// Sample raw records in both store naming conventions.
pub struct SampleRecords;

impl SampleRecords {
    pub fn external_patient(first_name: &str, last_name: &str) -> Map<String, Value> {
        object(json!({
            "first_name_c": first_name,
            "last_name_c": last_name,
            "date_of_birth_c": "1985-03-14",
            "gender_c": "female",
            "phone_c": "555-0101",
            "email_c": format!("{}.{}@example.com", first_name.to_lowercase(), last_name.to_lowercase()),
            "address_c": "12 Harbour Road",
            "emergency_contact_c": "{\"name\": \"Pat Doyle\", \"relationship\": \"Spouse\", \"phone\": \"555-0102\"}",
            "allergies_c": "Penicillin, Latex",
            "blood_type_c": "A+",
            "registration_date_c": "2024-01-15"
        }))
    }

    pub fn legacy_patient(first_name: &str, last_name: &str) -> Map<String, Value> {
        object(json!({
            "firstName": first_name,
            "lastName": last_name,
            "dateOfBirth": "1985-03-14",
            "gender": "female",
            "phone": "555-0101",
            "email": format!("{}.{}@example.com", first_name.to_lowercase(), last_name.to_lowercase()),
            "address": "12 Harbour Road",
            "emergencyContact": { "name": "Pat Doyle", "relationship": "Spouse", "phone": "555-0102" },
            "allergies": ["Penicillin", "Latex"],
            "bloodType": "A+",
            "registrationDate": "2024-01-15"
        }))
    }

    pub fn external_doctor(name: &str, specialization: &str) -> Map<String, Value> {
        object(json!({
            "name_c": name,
            "specialization_c": specialization,
            "license_c": "MD-4821",
            "phone_c": "555-0200",
            "email_c": "doctor@example.com",
            "appointment_duration_c": 30,
            "schedule_c": "{\"monday\": [\"09:00\", \"17:00\"]}"
        }))
    }

    pub fn external_appointment(
        patient_id: i64,
        doctor_id: i64,
        date: &str,
        time_slot: &str,
    ) -> Map<String, Value> {
        object(json!({
            "patient_id_c": patient_id,
            "doctor_id_c": doctor_id,
            "date_c": date,
            "time_slot_c": time_slot,
            "duration_c": 30,
            "type_c": "Consultation",
            "status_c": "pending",
            "notes_c": ""
        }))
    }

    pub fn external_medical_record(patient_id: i64, doctor_id: i64, visit_date: &str) -> Map<String, Value> {
        object(json!({
            "patient_id_c": patient_id,
            "doctor_id_c": doctor_id,
            "visit_date_c": visit_date,
            "diagnosis_c": "Seasonal allergies",
            "prescription_c": "[{\"medication\": \"Cetirizine\", \"dosage\": \"10mg daily\"}]",
            "notes_c": "Follow up in two weeks",
            "vital_signs_c": "{\"bloodPressure\": \"120/80\", \"heartRate\": \"72\", \"temperature\": \"98.6\", \"weight\": \"150\"}"
        }))
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => unreachable!("sample records are JSON objects"),
    }
}
