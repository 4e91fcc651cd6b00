use serde::Serialize;

use appointment_cell::models::Appointment;

/// How many appointments a grid cell renders inline before collapsing
/// the rest behind a "+N more" affordance.
pub const CELL_DISPLAY_LIMIT: usize = 2;

/// The fixed slot sets the views are built from. Slots are configuration,
/// not derived from doctor schedules.
#[derive(Debug, Clone)]
pub struct SlotConfig {
    slots: Vec<String>,
}

impl SlotConfig {
    /// Full-hour slots from 08:00 for the calendar and doctor-schedule
    /// grids.
    pub fn hourly() -> Self {
        Self {
            slots: (0..10).map(|index| format!("{:02}:00", 8 + index)).collect(),
        }
    }

    /// The denser 30-minute grid from 08:00 offered by the booking form.
    pub fn half_hourly() -> Self {
        Self {
            slots: (0..20)
                .map(|index| format!("{:02}:{:02}", 8 + index / 2, (index % 2) * 30))
                .collect(),
        }
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub fn slots_per_day(&self) -> usize {
        self.slots.len()
    }
}

/// One grid cell, truncated for display. `visible` keeps store order, not
/// time order; `overflow` is the collapsed remainder.
#[derive(Debug, Clone, Serialize)]
pub struct SlotCell {
    pub visible: Vec<Appointment>,
    pub overflow: usize,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
    pub total_appointments: usize,
    pub available_slots: usize,
    /// Booked share of the week's grid, rounded to the nearest percent.
    pub utilization_rate: u32,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub today: usize,
    pub confirmed: usize,
    pub pending: usize,
    pub completed: usize,
}
