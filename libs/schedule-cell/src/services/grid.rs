use chrono::NaiveDate;

use appointment_cell::models::Appointment;

use crate::models::{SlotCell, SlotConfig, WeekSummary, CELL_DISPLAY_LIMIT};

/// Pure projection of a loaded appointment snapshot onto the week ×
/// time-slot grid. Operates on an immutable slice; every view derives
/// from `bucket` semantics: same calendar day, exact slot-string match.
pub struct SlotGrid<'a> {
    appointments: &'a [Appointment],
}

impl<'a> SlotGrid<'a> {
    pub fn new(appointments: &'a [Appointment]) -> Self {
        Self { appointments }
    }

    /// Appointments on `day` at exactly `slot`, in store order.
    pub fn bucket(&self, day: NaiveDate, slot: &str) -> Vec<&'a Appointment> {
        self.appointments
            .iter()
            .filter(|apt| apt.falls_on(day) && apt.time_slot == slot)
            .collect()
    }

    /// Appointments on `day` irrespective of slot.
    pub fn day_count(&self, day: NaiveDate) -> usize {
        self.appointments.iter().filter(|apt| apt.falls_on(day)).count()
    }

    pub fn doctor_bucket(&self, doctor_id: i64, day: NaiveDate, slot: &str) -> Vec<&'a Appointment> {
        self.appointments
            .iter()
            .filter(|apt| apt.doctor_id == doctor_id && apt.falls_on(day) && apt.time_slot == slot)
            .collect()
    }

    pub fn doctor_day_count(&self, doctor_id: i64, day: NaiveDate) -> usize {
        self.appointments
            .iter()
            .filter(|apt| apt.doctor_id == doctor_id && apt.falls_on(day))
            .count()
    }

    /// The only scheduling predicate in the system, and it is advisory:
    /// nothing consults it before create/update, so an occupied slot can
    /// accumulate further bookings.
    pub fn is_available(&self, doctor_id: i64, day: NaiveDate, slot: &str) -> bool {
        self.doctor_bucket(doctor_id, day, slot).is_empty()
    }

    /// Display cell: the first `CELL_DISPLAY_LIMIT` appointments in store
    /// order, remainder collapsed to a count.
    pub fn cell(&self, day: NaiveDate, slot: &str) -> SlotCell {
        let bucket = self.bucket(day, slot);
        let overflow = bucket.len().saturating_sub(CELL_DISPLAY_LIMIT);
        SlotCell {
            visible: bucket
                .into_iter()
                .take(CELL_DISPLAY_LIMIT)
                .cloned()
                .collect(),
            overflow,
        }
    }

    /// One day's appointments ascending by slot. Plain string comparison
    /// is correct because slot strings are fixed-width `HH:MM`.
    pub fn day_schedule(&self, day: NaiveDate) -> Vec<&'a Appointment> {
        let mut schedule: Vec<&Appointment> = self
            .appointments
            .iter()
            .filter(|apt| apt.falls_on(day))
            .collect();
        schedule.sort_by(|a, b| a.time_slot.cmp(&b.time_slot));
        schedule
    }

    /// Weekly aggregate for one doctor over the configured grid.
    pub fn week_summary(
        &self,
        doctor_id: i64,
        week: &[NaiveDate],
        config: &SlotConfig,
    ) -> WeekSummary {
        let total_appointments: usize = week
            .iter()
            .map(|day| self.doctor_day_count(doctor_id, *day))
            .sum();

        let available_slots: usize = week
            .iter()
            .map(|day| {
                config
                    .slots()
                    .iter()
                    .filter(|slot| self.is_available(doctor_id, *day, slot))
                    .count()
            })
            .sum();

        let grid_size = week.len() * config.slots_per_day();
        let utilization_rate = if grid_size == 0 {
            0
        } else {
            ((total_appointments as f64 / grid_size as f64) * 100.0).round() as u32
        };

        WeekSummary {
            total_appointments,
            available_slots,
            utilization_rate,
        }
    }
}
