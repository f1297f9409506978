use std::{fmt, str::FromStr};

use crate::{error::InputError, schema::patient};

#[derive(Debug, Insertable)]
#[table_name = "patient"]
pub struct NewPatient {
    pub patient_id: i32,
    pub name: String,
    #[column_name = "gtype"]
    pub gender: String,
    pub age: i32,
    pub address: Option<String>,
    pub number_of_appts: i32,
}

pub const GENDER_MALE: &str = "M";
pub const GENDER_FEMALE: &str = "F";

/// The `_GENDER` domain only admits these two codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn code(self) -> &'static str {
        match self {
            Gender::Male => GENDER_MALE,
            Gender::Female => GENDER_FEMALE,
        }
    }
}

impl FromStr for Gender {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            GENDER_MALE => Ok(Gender::Male),
            GENDER_FEMALE => Ok(Gender::Female),
            _ => Err(InputError::NotAllowed {
                field: "Patient's gender",
                allowed: "'M' or 'F'",
            }),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
