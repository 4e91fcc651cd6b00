use chrono::{Duration, NaiveDate};

use appointment_cell::models::{Appointment, AppointmentStatus};
use patient_cell::models::Patient;

use crate::models::StatusCounts;

/// Dashboard aggregates over loaded snapshots. `today` is passed in so
/// these stay pure functions of their inputs.
pub fn todays_appointments<'a>(
    appointments: &'a [Appointment],
    today: NaiveDate,
) -> Vec<&'a Appointment> {
    appointments
        .iter()
        .filter(|apt| apt.falls_on(today))
        .collect()
}

/// Appointments from today through the next seven days, ascending by
/// date.
pub fn upcoming_appointments(appointments: &[Appointment], today: NaiveDate) -> Vec<Appointment> {
    let horizon = today + Duration::days(7);
    let mut upcoming: Vec<Appointment> = appointments
        .iter()
        .filter(|apt| match apt.date {
            Some(date) => date >= today && date <= horizon,
            None => false,
        })
        .cloned()
        .collect();
    upcoming.sort_by_key(|apt| apt.date);
    upcoming
}

pub fn status_counts(appointments: &[Appointment], today: NaiveDate) -> StatusCounts {
    let by_status = |status: AppointmentStatus| {
        appointments.iter().filter(|apt| apt.status == status).count()
    };

    StatusCounts {
        today: todays_appointments(appointments, today).len(),
        confirmed: by_status(AppointmentStatus::Confirmed),
        pending: by_status(AppointmentStatus::Pending),
        completed: by_status(AppointmentStatus::Completed),
    }
}

/// The five most recently registered patients.
pub fn recent_patients(patients: &[Patient]) -> Vec<Patient> {
    let mut recent = patients.to_vec();
    recent.sort_by(|a, b| b.registration_date.cmp(&a.registration_date));
    recent.truncate(5);
    recent
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appointment(id: i64, date: &str, status: AppointmentStatus) -> Appointment {
        Appointment {
            id,
            patient_id: 1,
            doctor_id: 1,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            time_slot: "09:00".to_string(),
            duration: 30,
            appointment_type: Default::default(),
            status,
            notes: String::new(),
        }
    }

    #[test]
    fn upcoming_keeps_the_next_seven_days_sorted() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let appointments = vec![
            appointment(1, "2024-06-20", AppointmentStatus::Pending),
            appointment(2, "2024-06-12", AppointmentStatus::Pending),
            appointment(3, "2024-06-09", AppointmentStatus::Pending),
            appointment(4, "2024-06-10", AppointmentStatus::Pending),
        ];

        let upcoming = upcoming_appointments(&appointments, today);
        let ids: Vec<i64> = upcoming.iter().map(|apt| apt.id).collect();
        assert_eq!(ids, vec![4, 2]);
    }

    #[test]
    fn status_counts_tally_each_bucket() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let appointments = vec![
            appointment(1, "2024-06-10", AppointmentStatus::Confirmed),
            appointment(2, "2024-06-11", AppointmentStatus::Confirmed),
            appointment(3, "2024-06-12", AppointmentStatus::Pending),
            appointment(4, "2024-06-13", AppointmentStatus::Completed),
        ];

        let counts = status_counts(&appointments, today);
        assert_eq!(
            counts,
            StatusCounts {
                today: 1,
                confirmed: 2,
                pending: 1,
                completed: 1
            }
        );
    }
}
