use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::{error::InputError, schema::appointment};

#[derive(Debug, Insertable)]
#[table_name = "appointment"]
pub struct NewAppointment {
    pub appnt_id: i32,
    pub adate: NaiveDate,
    pub time_slot: String,
    pub status: String,
}

pub const APPOINT_STATUS_PAST: &str = "PA";
pub const APPOINT_STATUS_ACTIVE: &str = "AC";
pub const APPOINT_STATUS_AVAILABLE: &str = "AV";
pub const APPOINT_STATUS_WAITLISTED: &str = "WL";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppointmentStatus {
    Past,
    Active,
    Available,
    Waitlisted,
}

impl AppointmentStatus {
    pub fn code(self) -> &'static str {
        match self {
            AppointmentStatus::Past => APPOINT_STATUS_PAST,
            AppointmentStatus::Active => APPOINT_STATUS_ACTIVE,
            AppointmentStatus::Available => APPOINT_STATUS_AVAILABLE,
            AppointmentStatus::Waitlisted => APPOINT_STATUS_WAITLISTED,
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = InputError;

    /// Accepts the two-letter code or the full word, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            APPOINT_STATUS_PAST | "PAST" => Ok(AppointmentStatus::Past),
            APPOINT_STATUS_ACTIVE | "ACTIVE" => Ok(AppointmentStatus::Active),
            APPOINT_STATUS_AVAILABLE | "AVAILABLE" => Ok(AppointmentStatus::Available),
            APPOINT_STATUS_WAITLISTED | "WAITLISTED" => Ok(AppointmentStatus::Waitlisted),
            _ => Err(InputError::NotAllowed {
                field: "Appointment status",
                allowed: "'PA' or 'AC' or 'AV' or 'WL'",
            }),
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Start and end of an appointment, stored as `H:MM-H:MM`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeSlot {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeSlot {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, InputError> {
        if end <= start {
            return Err(InputError::OutOfRange(format!(
                "The end time must be after the start time ({}).",
                format_clock(start)
            )));
        }
        Ok(Self { start, end })
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", format_clock(self.start), format_clock(self.end))
    }
}

fn format_clock(time: NaiveTime) -> String {
    format!("{}:{:02}", time.hour(), time.minute())
}
