use std::io::{BufRead, Write};

use chrono::NaiveDate;

use crate::{
    error::InputError,
    models::{
        appointments::{AppointmentStatus, NewAppointment, TimeSlot},
        doctors::NewDoctor,
        patients::{Gender, NewPatient},
    },
    prompt::Prompter,
    utils::{non_empty, optional_text, parse_clock, parse_count, parse_date, parse_int},
};

pub struct AddDoctorRequest {
    pub doctor_id: i32,
    pub name: String,
    pub specialty: String,
    pub department_id: i32,
}

impl AddDoctorRequest {
    pub fn collect<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<Self, InputError> {
        Ok(Self {
            doctor_id: p.ask("Input Doctor ID: ", parse_int)?,
            name: p.ask("Input Doctor Name: ", |s| non_empty("Doctor's name", s))?,
            specialty: p.ask("Please input Doctor's Specialty: ", |s| {
                non_empty("Doctor's specialty", s)
            })?,
            department_id: p.ask("Please input Department ID: ", parse_int)?,
        })
    }
}

impl From<AddDoctorRequest> for NewDoctor {
    fn from(info: AddDoctorRequest) -> Self {
        NewDoctor {
            doctor_id: info.doctor_id,
            name: info.name,
            specialty: info.specialty,
            department_id: info.department_id,
        }
    }
}

pub struct AddPatientRequest {
    pub patient_id: i32,
    pub name: String,
    pub gender: Gender,
    pub age: i32,
    pub address: Option<String>,
    pub number_of_appts: i32,
}

impl AddPatientRequest {
    pub fn collect<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<Self, InputError> {
        Ok(Self {
            patient_id: p.ask("Please enter Patient ID: ", parse_int)?,
            name: p.ask("Please enter Patient name: ", |s| non_empty("Patient's name", s))?,
            gender: p.ask("Please enter Patient's gender (Use 'M' or 'F'): ", |s| s.parse())?,
            age: p.ask("Please enter the Patient's age: ", |s| {
                parse_count("Patient's age", s)
            })?,
            address: optional_text(&p.read_line("Please enter the Patient's address: ")?),
            number_of_appts: p.ask(
                "Please enter the number of appointments the Patient has: ",
                |s| parse_count("number of appointments", s),
            )?,
        })
    }
}

impl From<AddPatientRequest> for NewPatient {
    fn from(info: AddPatientRequest) -> Self {
        NewPatient {
            patient_id: info.patient_id,
            name: info.name,
            gender: info.gender.code().to_string(),
            age: info.age,
            address: info.address,
            number_of_appts: info.number_of_appts,
        }
    }
}

pub struct AddAppointmentRequest {
    pub appnt_id: i32,
    pub date: NaiveDate,
    pub slot: TimeSlot,
    pub status: AppointmentStatus,
}

impl AddAppointmentRequest {
    pub fn collect<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<Self, InputError> {
        let appnt_id = p.ask("Please enter the Appointment ID: ", parse_int)?;
        let date = p.ask(
            "Please enter the date of the Appointment (Use MM/DD/YYYY): ",
            parse_date,
        )?;
        let start = p.ask(
            "Please enter the Appointment Start time slot (Using hours:minutes. i.e. 2:00 or 17:00): ",
            parse_clock,
        )?;
        let slot = p.ask(
            "Please enter the Appointment End time slot (Using hours:minutes. i.e. 2:00 or 17:00): ",
            |s| TimeSlot::new(start, parse_clock(s)?),
        )?;
        let status = p.ask(
            "Please enter the status of the Appointment (PA, AC, AV or WL): ",
            |s| s.parse(),
        )?;

        Ok(Self {
            appnt_id,
            date,
            slot,
            status,
        })
    }
}

impl From<AddAppointmentRequest> for NewAppointment {
    fn from(info: AddAppointmentRequest) -> Self {
        NewAppointment {
            appnt_id: info.appnt_id,
            adate: info.date,
            time_slot: info.slot.to_string(),
            status: info.status.code().to_string(),
        }
    }
}

pub struct DoctorAppointmentsRequest {
    pub doctor_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DoctorAppointmentsRequest {
    pub fn collect<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<Self, InputError> {
        let doctor_id = p.ask("Please enter Doctor ID: ", parse_int)?;
        let start_date = p.ask(
            "Please enter a start date for your search (Use MM/DD/YYYY): ",
            parse_date,
        )?;
        let end_date = p.ask(
            "Please enter an end date for your search (Use MM/DD/YYYY): ",
            |s| {
                let end = parse_date(s)?;
                if end < start_date {
                    return Err(InputError::OutOfRange(format!(
                        "The end date cannot be before {}.",
                        start_date
                    )));
                }
                Ok(end)
            },
        )?;

        Ok(Self {
            doctor_id,
            start_date,
            end_date,
        })
    }
}

pub struct DepartAvailabilityRequest {
    pub depart_name: String,
    pub date: NaiveDate,
}

impl DepartAvailabilityRequest {
    pub fn collect<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<Self, InputError> {
        Ok(Self {
            depart_name: p.ask("Please enter the Department name: ", |s| {
                non_empty("Department name", s)
            })?,
            date: p.ask("Please enter a specified date (Use MM/DD/YYYY): ", parse_date)?,
        })
    }
}

pub struct PatientsWithStatusRequest {
    pub status: AppointmentStatus,
}

impl PatientsWithStatusRequest {
    pub fn collect<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<Self, InputError> {
        Ok(Self {
            status: p.ask(
                "Please enter the appointment status (PA, AC, AV or WL): ",
                |s| s.parse(),
            )?,
        })
    }
}
