use std::{
    cell::RefCell,
    collections::VecDeque,
    io::Write,
};

use diesel::{
    pg::Pg,
    query_builder::{QueryFragment, QueryId},
};

use super::{
    statement::{sql_text, Statement},
    Backend,
};
use crate::error::StatementError;

/// Backend that never touches a server: remembers every statement it is
/// handed and answers existence checks from a script (0 once exhausted).
#[derive(Default)]
pub struct RecordingBackend {
    statements: RefCell<Vec<String>>,
    exists: RefCell<VecDeque<usize>>,
    fail_updates: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exists(self, answers: &[usize]) -> Self {
        self.exists.borrow_mut().extend(answers);
        self
    }

    pub fn failing_updates(mut self) -> Self {
        self.fail_updates = true;
        self
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.borrow().clone()
    }

    fn record<Q: QueryFragment<Pg>>(&self, query: &Q) {
        self.statements.borrow_mut().push(sql_text(query));
    }
}

impl Backend for RecordingBackend {
    fn execute_update<Q>(&self, query: Q) -> Result<usize, StatementError>
    where
        Q: QueryFragment<Pg> + QueryId,
    {
        self.record(&query);
        if self.fail_updates {
            return Err(StatementError::Database(diesel::result::Error::NotFound));
        }
        Ok(1)
    }

    fn execute_query_print<W: Write>(
        &self,
        query: Statement,
        _out: &mut W,
    ) -> Result<usize, StatementError> {
        self.record(&query);
        Ok(0)
    }

    fn execute_query_collect(
        &self,
        query: Statement,
    ) -> Result<Vec<Vec<String>>, StatementError> {
        self.record(&query);
        Ok(Vec::new())
    }

    fn execute_query_exists<Q>(&self, query: Q) -> Result<usize, StatementError>
    where
        Q: QueryFragment<Pg> + QueryId,
    {
        self.record(&query);
        Ok(self.exists.borrow_mut().pop_front().unwrap_or(0))
    }
}
