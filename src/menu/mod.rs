mod reports;
mod requests;

use std::io::{BufRead, Write};

use anyhow::Context;
use tracing::{error, info};

use crate::{
    database::{assert, Backend},
    error::InputError,
    models::{appointments::NewAppointment, doctors::NewDoctor, patients::NewPatient},
    prompt::Prompter,
    utils::parse_int,
};

use self::requests::*;

/// What the loop does after an action returns.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    AddDoctor = 1,
    AddPatient,
    AddAppointment,
    MakeAppointment,
    DoctorAppointments,
    DepartAvailability,
    StatusCountPerDoctor,
    PatientsPerDoctor,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 9] = [
        MenuChoice::AddDoctor,
        MenuChoice::AddPatient,
        MenuChoice::AddAppointment,
        MenuChoice::MakeAppointment,
        MenuChoice::DoctorAppointments,
        MenuChoice::DepartAvailability,
        MenuChoice::StatusCountPerDoctor,
        MenuChoice::PatientsPerDoctor,
        MenuChoice::Exit,
    ];

    pub fn title(self) -> &'static str {
        match self {
            MenuChoice::AddDoctor => "Add Doctor",
            MenuChoice::AddPatient => "Add Patient",
            MenuChoice::AddAppointment => "Add Appointment",
            MenuChoice::MakeAppointment => "Make an Appointment",
            MenuChoice::DoctorAppointments => "List appointments of a given doctor",
            MenuChoice::DepartAvailability => {
                "List all available appointments of a given department"
            }
            MenuChoice::StatusCountPerDoctor => {
                "List total number of different types of appointments per doctor in descending order"
            }
            MenuChoice::PatientsPerDoctor => {
                "Find total number of patients per doctor with a given status"
            }
            MenuChoice::Exit => "< EXIT",
        }
    }

    pub fn from_number(n: i32) -> Option<Self> {
        MenuChoice::ALL.iter().copied().find(|c| *c as i32 == n)
    }
}

pub fn parse_choice(s: &str) -> Result<MenuChoice, InputError> {
    let n = parse_int(s)?;
    MenuChoice::from_number(n).ok_or_else(|| {
        InputError::OutOfRange(format!("Choose a number from 1 to {}.", MenuChoice::ALL.len()))
    })
}

fn print_menu<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> Result<(), InputError> {
    prompter.say("MAIN MENU")?;
    prompter.say("---------")?;
    for choice in MenuChoice::ALL.iter() {
        prompter.say(&format!("{}. {}", *choice as i32, choice.title()))?;
    }
    Ok(())
}

/// Shows the menu and runs actions until the user picks exit or input ends.
pub fn run<B: Backend, R: BufRead, W: Write>(
    backend: &B,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<()> {
    loop {
        print_menu(prompter)?;
        let choice = match prompter.ask("Please make your choice: ", parse_choice) {
            Ok(choice) => choice,
            Err(InputError::Eof) => break,
            Err(InputError::TooManyAttempts(_)) => continue,
            Err(err) => return Err(err.into()),
        };

        let flow = match choice {
            MenuChoice::AddDoctor => add_doctor(backend, prompter),
            MenuChoice::AddPatient => add_patient(backend, prompter),
            MenuChoice::AddAppointment => add_appointment(backend, prompter),
            MenuChoice::MakeAppointment => make_appointment(backend, prompter),
            MenuChoice::DoctorAppointments => doctor_appointments(backend, prompter),
            MenuChoice::DepartAvailability => depart_availability(backend, prompter),
            MenuChoice::StatusCountPerDoctor => status_count_per_doctor(backend, prompter),
            MenuChoice::PatientsPerDoctor => patients_per_doctor(backend, prompter),
            MenuChoice::Exit => Flow::Exit,
        };
        if flow == Flow::Exit {
            break;
        }
    }
    Ok(())
}

fn abandon(action: &str, err: anyhow::Error) -> Flow {
    match err.downcast_ref::<InputError>() {
        Some(InputError::Eof) => Flow::Exit,
        Some(InputError::Io(_)) => {
            error!(action, "{:#}", err);
            Flow::Exit
        }
        _ => {
            error!(action, "{:#}", err);
            Flow::Continue
        }
    }
}

crate::menu_actions! {
    (add_doctor, "Add Doctor"),
    (add_patient, "Add Patient"),
    (add_appointment, "Add Appointment"),
    (make_appointment, "Make an Appointment"),
    (doctor_appointments, "List appointments of a doctor"),
    (depart_availability, "List available appointments of a department"),
    (status_count_per_doctor, "Count appointments by status per doctor"),
    (patients_per_doctor, "Count patients per doctor with status"),
}

fn add_doctor_impl<B: Backend, R: BufRead, W: Write>(
    backend: &B,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<()> {
    use crate::schema::doctor;

    let info = AddDoctorRequest::collect(prompter)?;
    assert::assert_new_doctor(backend, info.doctor_id)?;
    assert::assert_depart(backend, info.department_id)?;

    let data = NewDoctor::from(info);
    backend
        .execute_update(diesel::insert_into(doctor::table).values(&data))
        .context("Query attempt failed")?;

    info!(doctor_id = data.doctor_id, "doctor added");
    prompter.say(&format!("Doctor {} added.", data.doctor_id))?;
    Ok(())
}

fn add_patient_impl<B: Backend, R: BufRead, W: Write>(
    backend: &B,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<()> {
    use crate::schema::patient;

    let info = AddPatientRequest::collect(prompter)?;
    assert::assert_new_patient(backend, info.patient_id)?;

    let data = NewPatient::from(info);
    backend
        .execute_update(diesel::insert_into(patient::table).values(&data))
        .context("Query attempt failed")?;

    info!(patient_id = data.patient_id, "patient added");
    prompter.say(&format!("Patient {} added.", data.patient_id))?;
    Ok(())
}

fn add_appointment_impl<B: Backend, R: BufRead, W: Write>(
    backend: &B,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<()> {
    use crate::schema::appointment;

    let info = AddAppointmentRequest::collect(prompter)?;
    assert::assert_new_appoint(backend, info.appnt_id)?;

    let data = NewAppointment::from(info);
    backend
        .execute_update(diesel::insert_into(appointment::table).values(&data))
        .context("Query attempt failed")?;

    info!(appnt_id = data.appnt_id, "appointment added");
    prompter.say(&format!("Appointment {} added.", data.appnt_id))?;
    Ok(())
}

// Linking a patient to a doctor's appointment is not specified yet: which
// association rows to write and how the status should change are open.
fn make_appointment_impl<B: Backend, R: BufRead, W: Write>(
    _backend: &B,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<()> {
    prompter.say("Making an appointment is not supported yet.")?;
    Ok(())
}

fn doctor_appointments_impl<B: Backend, R: BufRead, W: Write>(
    backend: &B,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<()> {
    let info = DoctorAppointmentsRequest::collect(prompter)?;
    assert::assert_doctor(backend, info.doctor_id)?;

    let count = backend
        .execute_query_print(reports::doctor_appointments(&info), prompter.output())
        .context("Query failed")?;
    report_count(prompter, count)
}

fn depart_availability_impl<B: Backend, R: BufRead, W: Write>(
    backend: &B,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<()> {
    let info = DepartAvailabilityRequest::collect(prompter)?;

    let count = backend
        .execute_query_print(reports::depart_availability(&info), prompter.output())
        .context("Query failed")?;
    report_count(prompter, count)
}

fn status_count_per_doctor_impl<B: Backend, R: BufRead, W: Write>(
    backend: &B,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<()> {
    let count = backend
        .execute_query_print(reports::status_count_per_doctor(), prompter.output())
        .context("Query failed")?;
    report_count(prompter, count)
}

fn patients_per_doctor_impl<B: Backend, R: BufRead, W: Write>(
    backend: &B,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<()> {
    let info = PatientsWithStatusRequest::collect(prompter)?;

    let count = backend
        .execute_query_print(reports::patients_per_doctor(&info), prompter.output())
        .context("Query failed")?;
    report_count(prompter, count)
}

fn report_count<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    count: usize,
) -> anyhow::Result<()> {
    if count == 0 {
        prompter.say("No rows found.")?;
    } else {
        prompter.say(&format!("Total rows: {}", count))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::recording::RecordingBackend;
    use std::io::Cursor;

    type TestPrompter = Prompter<Cursor<Vec<u8>>, Vec<u8>>;

    fn prompter(input: &str) -> TestPrompter {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn run_script(backend: &RecordingBackend, input: &str) -> String {
        let mut p = prompter(input);
        run(backend, &mut p).unwrap();
        String::from_utf8(p.output().clone()).unwrap()
    }

    #[test]
    fn choices_map_to_menu_numbers() {
        assert_eq!(parse_choice("1").unwrap(), MenuChoice::AddDoctor);
        assert_eq!(parse_choice(" 9 ").unwrap(), MenuChoice::Exit);
        assert!(matches!(parse_choice("0"), Err(InputError::OutOfRange(_))));
        assert!(matches!(parse_choice("10"), Err(InputError::OutOfRange(_))));
        assert!(matches!(parse_choice("exit"), Err(InputError::NotAnInteger(_))));
    }

    #[test]
    fn exit_runs_nothing_else() {
        let backend = RecordingBackend::new();
        let out = run_script(&backend, "9\nthis line is never read\n");

        assert!(backend.statements().is_empty());
        assert_eq!(out.matches("MAIN MENU").count(), 1);
        assert_eq!(out.matches("Please make your choice: ").count(), 1);
        assert!(out.contains("8. Find total number of patients per doctor with a given status"));
        assert!(out.contains("9. < EXIT"));
    }

    #[test]
    fn end_of_input_ends_the_loop() {
        let backend = RecordingBackend::new();
        run_script(&backend, "");
        run_script(&backend, "1\n7\n");
        assert!(backend.statements().is_empty());
    }

    #[test]
    fn invalid_choice_reprompts() {
        let backend = RecordingBackend::new();
        let out = run_script(&backend, "abc\n42\n9\n");
        assert_eq!(out.matches("Please make your choice: ").count(), 3);
        assert_eq!(out.matches("Invalid input!").count(), 2);
    }

    #[test]
    fn add_doctor_inserts_with_bound_values() {
        let backend = RecordingBackend::new().with_exists(&[0, 1]);
        let out = run_script(&backend, "1\nabc\n1\nSmith\nCardiology\n10\n9\n");

        let statements = backend.statements();
        assert_eq!(statements.len(), 3);
        assert!(statements[0].contains("\"doctor\""));
        assert!(statements[1].contains("\"department\""));
        assert!(statements[2].starts_with(
            r#"INSERT INTO "doctor" ("doctor_id", "name", "specialty", "did") VALUES ($1, $2, $3, $4)"#
        ));
        assert!(statements[2].ends_with(r#"-- binds: [1, "Smith", "Cardiology", 10]"#));

        assert_eq!(out.matches("Input Doctor ID: ").count(), 2);
        assert!(out.contains("Doctor 1 added."));
        assert_eq!(out.matches("MAIN MENU").count(), 2);
    }

    #[test]
    fn taken_doctor_id_abandons_the_action() {
        let backend = RecordingBackend::new().with_exists(&[1]);
        let out = run_script(&backend, "1\n1\nSmith\nCardiology\n10\n9\n");

        let statements = backend.statements();
        assert_eq!(statements.len(), 1);
        assert!(!out.contains("added"));
        assert_eq!(out.matches("MAIN MENU").count(), 2);
    }

    #[test]
    fn add_patient_validates_gender_and_leaves_blank_address_out() {
        let backend = RecordingBackend::new();
        let out = run_script(&backend, "2\n7\nJones\nX\nf\n-4\n33\n\n2\n9\n");

        let statements = backend.statements();
        assert_eq!(statements.len(), 2);
        assert!(statements[1].starts_with(r#"INSERT INTO "patient""#));
        assert!(statements[1].contains("DEFAULT"));
        assert!(statements[1].contains(r#""F""#));
        assert!(out.contains("The only valid input for the Patient's gender is 'M' or 'F'."));
        assert!(out.contains("The Patient's age cannot be negative."));
        assert!(out.contains("Patient 7 added."));
    }

    #[test]
    fn add_appointment_formats_the_time_slot() {
        let backend = RecordingBackend::new();
        let out = run_script(&backend, "3\n5\n03/04/2021\n8:00\n7:00\n9:00\nzz\nac\n9\n");

        let statements = backend.statements();
        assert_eq!(statements.len(), 2);
        assert!(statements[1].starts_with(r#"INSERT INTO "appointment""#));
        assert!(statements[1].ends_with(r#"-- binds: [5, 2021-03-04, "8:00-9:00", "AC"]"#));
        assert!(out.contains("The end time must be after the start time (8:00)."));
        assert!(out.contains("Appointment 5 added."));
    }

    #[test]
    fn make_appointment_is_unsupported() {
        let backend = RecordingBackend::new();
        let out = run_script(&backend, "4\n9\n");
        assert!(backend.statements().is_empty());
        assert!(out.contains("not supported"));
    }

    #[test]
    fn listings_use_the_read_path() {
        let backend = RecordingBackend::new().with_exists(&[1]);
        let out = run_script(
            &backend,
            "5\n3\n01/01/2021\n12/31/2020\n01/31/2021\n6\nCardiology\n2021-02-02\n7\n8\nWL\n9\n",
        );

        let statements = backend.statements();
        assert_eq!(statements.len(), 5);
        assert!(statements[1].contains("has_appointment H"));
        assert!(statements[2].contains("request_maintenance M"));
        assert!(statements[3].contains("GROUP BY D.doctor_ID, D.name, D.specialty, A.status"));
        assert!(statements[4].ends_with(r#"-- binds: ["WL"]"#));
        assert!(out.contains("The end date cannot be before 2021-01-01."));
        assert_eq!(out.matches("No rows found.").count(), 4);
    }

    #[test]
    fn unknown_doctor_skips_the_listing() {
        let backend = RecordingBackend::new().with_exists(&[0]);
        run_script(&backend, "5\n3\n01/01/2021\n01/31/2021\n9\n");
        assert_eq!(backend.statements().len(), 1);
    }

    #[test]
    fn failed_statement_returns_to_the_menu() {
        let backend = RecordingBackend::new().with_exists(&[0, 1]).failing_updates();
        let out = run_script(&backend, "1\n1\nSmith\nCardiology\n10\n9\n");
        assert!(!out.contains("added"));
        assert_eq!(out.matches("MAIN MENU").count(), 2);
    }

    #[test]
    fn attempt_limit_abandons_the_action() {
        let backend = RecordingBackend::new();
        let mut p = prompter("1\nx\ny\n9\n").with_max_attempts(Some(2));
        run(&backend, &mut p).unwrap();

        let out = String::from_utf8(p.output().clone()).unwrap();
        assert!(backend.statements().is_empty());
        assert_eq!(out.matches("MAIN MENU").count(), 2);
    }
}
