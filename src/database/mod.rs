pub mod assert;
pub mod record;
pub mod statement;

#[cfg(test)]
pub mod recording;

use std::io::Write;

use diesel::{
    pg::Pg,
    prelude::*,
    query_builder::{QueryFragment, QueryId},
    query_dsl::methods::ExecuteDsl,
    sql_types::{BigInt, Text},
};
use tracing::{debug, warn};

use crate::{
    config::ConnectionSettings,
    error::{ConnectionError, StatementError},
};

use self::{
    record::{print_records, Record},
    statement::{sql_text, RowExists, RowsAsText, Statement},
};

/// What the menu needs from a database session.
pub trait Backend {
    /// Runs a statement that returns no rows, yielding the affected row count.
    fn execute_update<Q>(&self, query: Q) -> Result<usize, StatementError>
    where
        Q: QueryFragment<Pg> + QueryId;

    /// Prints the rows of `query` to `out` and returns how many there were.
    fn execute_query_print<W: Write>(
        &self,
        query: Statement,
        out: &mut W,
    ) -> Result<usize, StatementError>;

    fn execute_query_collect(
        &self,
        query: Statement,
    ) -> Result<Vec<Vec<String>>, StatementError>;

    /// 1 if `query` yields at least one row, otherwise 0.
    fn execute_query_exists<Q>(&self, query: Q) -> Result<usize, StatementError>
    where
        Q: QueryFragment<Pg> + QueryId;
}

#[derive(QueryableByName)]
struct SequenceValue {
    #[sql_type = "BigInt"]
    value: i64,
}

pub struct Session {
    conn: Option<PgConnection>,
}

impl Session {
    pub fn connect(settings: &ConnectionSettings) -> Result<Self, ConnectionError> {
        print!("Connecting to database...");
        println!("Connection URL: {}\n", settings.display_url());

        let conn = PgConnection::establish(&settings.conninfo())?;
        println!("Done");
        debug!(host = %settings.host, port = settings.port, dbname = %settings.dbname, "connected");

        Ok(Self { conn: Some(conn) })
    }

    fn conn(&self) -> Result<&PgConnection, StatementError> {
        self.conn.as_ref().ok_or(StatementError::Closed)
    }

    fn load_records(&self, query: Statement) -> Result<Vec<Record>, StatementError> {
        let rows = RowsAsText(query).load::<(String, String)>(self.conn()?)?;
        rows.iter()
            .map(|(json, text)| Record::from_row(json, text))
            .collect()
    }

    /// Current value of the named sequence, or -1 if it cannot be read.
    pub fn current_sequence_value(&self, name: &str) -> i64 {
        let res = self.conn().and_then(|conn| {
            diesel::sql_query("SELECT currval(CAST($1 AS regclass)) AS value")
                .bind::<Text, _>(name)
                .get_result::<SequenceValue>(conn)
                .optional()
                .map_err(StatementError::from)
        });

        match res {
            Ok(Some(row)) => row.value,
            Ok(None) => -1,
            Err(err) => {
                warn!(sequence = name, "failed to read sequence value: {}", err);
                -1
            }
        }
    }

    /// Releases the connection. Calling it again does nothing.
    pub fn close(&mut self) {
        if self.conn.take().is_some() {
            debug!("connection closed");
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

impl Backend for Session {
    fn execute_update<Q>(&self, query: Q) -> Result<usize, StatementError>
    where
        Q: QueryFragment<Pg> + QueryId,
    {
        debug!(sql = %sql_text(&query), "execute update");
        Ok(ExecuteDsl::execute(query, self.conn()?)?)
    }

    fn execute_query_print<W: Write>(
        &self,
        query: Statement,
        out: &mut W,
    ) -> Result<usize, StatementError> {
        debug!(sql = %sql_text(&query), "execute query");
        let records = self.load_records(query)?;
        Ok(print_records(&records, out)?)
    }

    fn execute_query_collect(
        &self,
        query: Statement,
    ) -> Result<Vec<Vec<String>>, StatementError> {
        debug!(sql = %sql_text(&query), "execute query");
        let records = self.load_records(query)?;
        Ok(records.into_iter().map(Record::into_values).collect())
    }

    fn execute_query_exists<Q>(&self, query: Q) -> Result<usize, StatementError>
    where
        Q: QueryFragment<Pg> + QueryId,
    {
        debug!(sql = %sql_text(&query), "execute existence check");
        let exists = RowExists(query).get_result::<bool>(self.conn()?)?;
        Ok(exists as usize)
    }
}

/// These run against a live server. Point `HOSPITAL_TEST_DATABASE_URL` at
/// a scratch database holding the hospital schema and run with `--ignored`.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::doctors::NewDoctor, schema::doctor};

    fn test_session() -> Session {
        let url = std::env::var("HOSPITAL_TEST_DATABASE_URL")
            .expect("HOSPITAL_TEST_DATABASE_URL not set");
        let conn = PgConnection::establish(&url).expect("cannot reach test database");
        conn.begin_test_transaction().expect("cannot open test transaction");
        Session { conn: Some(conn) }
    }

    #[test]
    #[ignore]
    fn close_is_idempotent() {
        let mut session = test_session();
        session.close();
        session.close();
        assert!(matches!(
            session.execute_query_exists(Statement::new("SELECT 1")),
            Err(StatementError::Closed)
        ));
    }

    #[test]
    #[ignore]
    fn collect_returns_every_field_as_text() {
        let session = test_session();
        let rows = session
            .execute_query_collect(
                Statement::new(
                    "SELECT n, n * 2 AS twice, 'x, ' || n AS label, NULL::int AS missing, \
                     12.50::numeric AS fee, timestamp '2021-03-04 10:00:00' AS at \
                     FROM generate_series(1, 3) AS n",
                )
                .order_by("n DESC"),
            )
            .unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.len() == 6));
        assert_eq!(
            rows[0],
            vec!["3", "6", "x, 3", "null", "12.50", "2021-03-04 10:00:00"]
        );
    }

    #[test]
    #[ignore]
    fn print_of_empty_result_prints_nothing() {
        let session = test_session();
        let mut out = Vec::new();
        let count = session
            .execute_query_print(Statement::new("SELECT 1 AS one WHERE false"), &mut out)
            .unwrap();
        assert_eq!(count, 0);
        assert!(out.is_empty());
    }

    #[test]
    #[ignore]
    fn sequence_value_is_read_back() {
        let session = test_session();
        session
            .execute_update(Statement::new(
                "CREATE TEMPORARY SEQUENCE admin_test_seq START WITH 5",
            ))
            .unwrap();
        session
            .execute_query_collect(Statement::new("SELECT nextval('admin_test_seq')"))
            .unwrap();
        assert_eq!(session.current_sequence_value("admin_test_seq"), 5);
        assert_eq!(session.current_sequence_value("no_such_seq"), -1);
    }

    #[test]
    #[ignore]
    fn inserted_doctor_is_found() {
        let session = test_session();
        let dept_id = session
            .execute_query_collect(Statement::new("SELECT dept_id FROM department LIMIT 1"))
            .unwrap()
            .first()
            .and_then(|row| row[0].parse::<i32>().ok())
            .expect("test database has no department");

        let new_doctor = NewDoctor {
            doctor_id: 1,
            name: "Smith".to_string(),
            specialty: "Cardiology".to_string(),
            department_id: dept_id,
        };
        session
            .execute_update(diesel::delete(doctor::table.filter(doctor::doctor_id.eq(1))))
            .unwrap();
        session
            .execute_update(diesel::insert_into(doctor::table).values(&new_doctor))
            .unwrap();

        let found = session
            .execute_query_exists(doctor::table.filter(doctor::doctor_id.eq(1)).select(doctor::doctor_id))
            .unwrap();
        assert_eq!(found, 1);
    }
}
