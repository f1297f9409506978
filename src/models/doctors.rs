use crate::schema::doctor;

#[derive(Debug, Insertable)]
#[table_name = "doctor"]
pub struct NewDoctor {
    pub doctor_id: i32,
    pub name: String,
    pub specialty: String,
    #[column_name = "did"]
    pub department_id: i32,
}
