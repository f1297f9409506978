use crate::{
    database::statement::Statement,
    models::appointments::AppointmentStatus,
};

use super::requests::{DepartAvailabilityRequest, DoctorAppointmentsRequest, PatientsWithStatusRequest};

/// Active and available appointments of one doctor within a date range.
pub fn doctor_appointments(info: &DoctorAppointmentsRequest) -> Statement {
    Statement::new(
        "SELECT A.appnt_ID, A.adate, A.time_slot, A.status \
         FROM Appointment A, has_appointment H \
         WHERE H.doctor_id = ? AND H.appt_id = A.appnt_ID \
         AND A.status IN (?, ?) \
         AND A.adate BETWEEN ? AND ?",
    )
    .order_by("adate, appnt_id")
    .bind(info.doctor_id)
    .bind(AppointmentStatus::Active)
    .bind(AppointmentStatus::Available)
    .bind(info.start_date)
    .bind(info.end_date)
}

/// Available appointments of the doctors in one department on one day.
pub fn depart_availability(info: &DepartAvailabilityRequest) -> Statement {
    Statement::new(
        "SELECT DISTINCT A.appnt_ID, A.adate, A.time_slot, H.doctor_id \
         FROM Appointment A, request_maintenance M, has_appointment H \
         WHERE M.dept_name = ? AND M.did = H.doctor_id AND H.appt_id = A.appnt_ID \
         AND A.status = ? AND A.adate = ?",
    )
    .order_by("appnt_id")
    .bind(info.depart_name.as_str())
    .bind(AppointmentStatus::Available)
    .bind(info.date)
}

pub fn status_count_per_doctor() -> Statement {
    Statement::new(
        "SELECT D.doctor_ID, D.name, D.specialty, A.status, count(A.status) AS C \
         FROM Doctor D, Appointment A, has_appointment H \
         WHERE H.doctor_id = D.doctor_ID AND A.appnt_ID = H.appt_id \
         GROUP BY D.doctor_ID, D.name, D.specialty, A.status",
    )
    .order_by("C DESC")
}

/// Rows of `Searches` per doctor whose appointment has the given status.
pub fn patients_per_doctor(info: &PatientsWithStatusRequest) -> Statement {
    Statement::new(
        "SELECT D.doctor_ID, D.name, D.specialty, count(S.pid) AS C \
         FROM Doctor D, Searches S, has_appointment H, Appointment A \
         WHERE H.doctor_id = D.doctor_ID AND A.status = ? \
         AND A.appnt_ID = S.aid AND H.appt_id = S.aid \
         GROUP BY D.doctor_ID, D.name, D.specialty",
    )
    .bind(info.status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use diesel::{debug_query, pg::Pg};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn doctor_appointments_binds_in_template_order() {
        let stmt = doctor_appointments(&DoctorAppointmentsRequest {
            doctor_id: 4,
            start_date: ymd(2021, 1, 1),
            end_date: ymd(2021, 1, 31),
        });
        let sql = debug_query::<Pg, _>(&stmt).to_string();
        assert!(sql.contains("H.doctor_id = $1"));
        assert!(sql.contains("A.status IN ($2, $3)"));
        assert!(sql.contains("BETWEEN $4 AND $5 ORDER BY adate, appnt_id"));
        assert!(sql.ends_with(r#"-- binds: [4, "AC", "AV", 2021-01-01, 2021-01-31]"#));
    }

    fn sql_and_binds(stmt: &Statement) -> (String, String) {
        let text = debug_query::<Pg, _>(stmt).to_string();
        let mut parts = text.splitn(2, " -- binds: ");
        let sql = parts.next().unwrap_or_default().to_string();
        let binds = parts.next().unwrap_or_default().to_string();
        (sql, binds)
    }

    #[test]
    fn department_name_is_a_parameter() {
        let stmt = depart_availability(&DepartAvailabilityRequest {
            depart_name: "Cardiology'; DROP TABLE Doctor; --".to_string(),
            date: ymd(2021, 2, 2),
        });
        let (sql, binds) = sql_and_binds(&stmt);
        assert!(!sql.contains("DROP TABLE"));
        assert!(sql.contains("M.dept_name = $1"));
        assert!(sql.contains("A.adate = $3"));
        assert!(binds.contains("DROP TABLE"));
    }

    #[test]
    fn status_count_has_no_parameters() {
        let (sql, binds) = sql_and_binds(&status_count_per_doctor());
        assert!(sql.ends_with("ORDER BY C DESC"));
        assert_eq!(binds, "[]");
    }

    #[test]
    fn patients_per_doctor_filters_on_status() {
        let stmt = patients_per_doctor(&PatientsWithStatusRequest {
            status: AppointmentStatus::Waitlisted,
        });
        let sql = debug_query::<Pg, _>(&stmt).to_string();
        assert!(sql.contains("count(S.pid) AS C"));
        assert!(sql.contains("A.status = $1"));
        assert!(!sql.contains("ORDER BY"));
        assert!(sql.ends_with(r#"GROUP BY D.doctor_ID, D.name, D.specialty -- binds: ["WL"]"#));
    }
}
