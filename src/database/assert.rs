use anyhow::{bail, Context};
use diesel::prelude::*;

use super::Backend;

pub fn doctor_exists<B: Backend>(backend: &B, doctor_id: i32) -> anyhow::Result<bool> {
    use crate::schema::doctor;

    let res = backend
        .execute_query_exists(
            doctor::table
                .filter(doctor::doctor_id.eq(doctor_id))
                .select(doctor::doctor_id),
        )
        .context("DB error")?;
    Ok(res > 0)
}

pub fn assert_doctor<B: Backend>(backend: &B, doctor_id: i32) -> anyhow::Result<()> {
    if !doctor_exists(backend, doctor_id)? {
        bail!("No such doctor: {}", doctor_id);
    }
    Ok(())
}

pub fn assert_new_doctor<B: Backend>(backend: &B, doctor_id: i32) -> anyhow::Result<()> {
    if doctor_exists(backend, doctor_id)? {
        bail!("Doctor ID {} is already taken", doctor_id);
    }
    Ok(())
}

pub fn assert_depart<B: Backend>(backend: &B, dept_id: i32) -> anyhow::Result<()> {
    use crate::schema::department;

    let res = backend
        .execute_query_exists(
            department::table
                .filter(department::dept_id.eq(dept_id))
                .select(department::dept_id),
        )
        .context("DB error")?;
    if res == 0 {
        bail!("No such department: {}", dept_id);
    }
    Ok(())
}

pub fn assert_new_patient<B: Backend>(backend: &B, patient_id: i32) -> anyhow::Result<()> {
    use crate::schema::patient;

    let res = backend
        .execute_query_exists(
            patient::table
                .filter(patient::patient_id.eq(patient_id))
                .select(patient::patient_id),
        )
        .context("DB error")?;
    if res > 0 {
        bail!("Patient ID {} is already taken", patient_id);
    }
    Ok(())
}

pub fn assert_new_appoint<B: Backend>(backend: &B, appnt_id: i32) -> anyhow::Result<()> {
    use crate::schema::appointment;

    let res = backend
        .execute_query_exists(
            appointment::table
                .filter(appointment::appnt_id.eq(appnt_id))
                .select(appointment::appnt_id),
        )
        .context("DB error")?;
    if res > 0 {
        bail!("Appointment ID {} is already taken", appnt_id);
    }
    Ok(())
}
