table! {
    appointment (appnt_id) {
        appnt_id -> Integer,
        adate -> Date,
        time_slot -> Nullable<Varchar>,
        status -> Nullable<Varchar>,
    }
}

table! {
    department (dept_id) {
        dept_id -> Integer,
        name -> Varchar,
    }
}

table! {
    doctor (doctor_id) {
        doctor_id -> Integer,
        name -> Nullable<Varchar>,
        specialty -> Nullable<Varchar>,
        did -> Integer,
    }
}

table! {
    patient (patient_id) {
        patient_id -> Integer,
        name -> Varchar,
        gtype -> Varchar,
        age -> Integer,
        address -> Nullable<Varchar>,
        number_of_appts -> Nullable<Integer>,
    }
}
