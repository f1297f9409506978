//! Query nodes the session runs on top of diesel's query builder.
//!
//! [`Statement`] carries a SQL template whose `?` placeholders are filled
//! from typed parameters at execution time, so user input never becomes
//! part of the query text. [`RowsAsText`] and [`RowExists`] wrap a query
//! so that rows of unknown shape can be read back.

use std::fmt::Write;

use chrono::NaiveDate;
use diesel::{
    debug_query,
    pg::Pg,
    query_builder::{AstPass, Query, QueryFragment, QueryId},
    result::{Error as DieselError, QueryResult},
    sql_types::{Bool, Date, Integer, Text},
    PgConnection, RunQueryDsl,
};

use crate::models::appointments::AppointmentStatus;

const PLACEHOLDER: char = '?';

#[derive(Clone, Debug, PartialEq)]
pub enum Param {
    Int(i32),
    Text(String),
    Date(NaiveDate),
}

impl From<i32> for Param {
    fn from(value: i32) -> Self {
        Param::Int(value)
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::Text(value)
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Text(value.to_string())
    }
}

impl From<NaiveDate> for Param {
    fn from(value: NaiveDate) -> Self {
        Param::Date(value)
    }
}

impl From<AppointmentStatus> for Param {
    fn from(value: AppointmentStatus) -> Self {
        Param::Text(value.code().to_string())
    }
}

/// A SQL template plus its parameters.
///
/// A `?` inside a quoted literal or quoted identifier is text, not a
/// placeholder. The jsonb `?` operators have to be written in function form
/// (`jsonb_exists(..)`).
#[derive(Clone, Debug)]
pub struct Statement {
    sql: String,
    params: Vec<Param>,
    order_by: Option<String>,
}

impl Statement {
    pub fn new<S: Into<String>>(sql: S) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
            order_by: None,
        }
    }

    pub fn bind<P: Into<Param>>(mut self, param: P) -> Self {
        self.params.push(param.into());
        self
    }

    /// Ordering over the output columns. It is applied to the outermost
    /// select, so it also holds when the statement is wrapped.
    pub fn order_by<S: Into<String>>(mut self, columns: S) -> Self {
        self.order_by = Some(columns.into());
        self
    }

    fn walk_template(&self, out: &mut AstPass<Pg>) -> QueryResult<()> {
        let pieces = split_placeholders(&self.sql);
        if pieces.len() - 1 != self.params.len() {
            return Err(DieselError::QueryBuilderError(
                format!(
                    "statement has {} placeholders but {} parameters",
                    pieces.len() - 1,
                    self.params.len()
                )
                .into(),
            ));
        }

        out.push_sql(pieces[0]);
        for (piece, param) in pieces[1..].iter().zip(&self.params) {
            match param {
                Param::Int(v) => out.push_bind_param::<Integer, _>(v)?,
                Param::Text(v) => out.push_bind_param::<Text, _>(v)?,
                Param::Date(v) => out.push_bind_param::<Date, _>(v)?,
            }
            out.push_sql(piece);
        }
        Ok(())
    }

    fn walk_order(&self, out: &mut AstPass<Pg>) {
        if let Some(columns) = &self.order_by {
            out.push_sql(" ORDER BY ");
            out.push_sql(columns);
        }
    }
}

/// Splits `sql` at every placeholder outside `'...'` and `"..."`. Always
/// yields at least one piece.
fn split_placeholders(sql: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut quote = None;
    let mut start = 0;
    for (i, c) in sql.char_indices() {
        match (quote, c) {
            // a doubled quote closes and reopens, which leaves it open
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'') | (None, '"') => quote = Some(c),
            (None, PLACEHOLDER) => {
                pieces.push(&sql[start..i]);
                start = i + c.len_utf8();
            }
            (None, _) => {}
        }
    }
    pieces.push(&sql[start..]);
    pieces
}

impl QueryFragment<Pg> for Statement {
    fn walk_ast(&self, mut out: AstPass<Pg>) -> QueryResult<()> {
        self.walk_template(&mut out)?;
        self.walk_order(&mut out);
        Ok(())
    }
}

impl QueryId for Statement {
    type QueryId = ();

    const HAS_STATIC_QUERY_ID: bool = false;
}

impl RunQueryDsl<PgConnection> for Statement {}

/// Reads a statement's rows back without knowing their shape: each row
/// comes as its `row_to_json` object (for the column names) and as the
/// server's text form of the row (for the values).
#[derive(Debug)]
pub struct RowsAsText(pub Statement);

impl QueryFragment<Pg> for RowsAsText {
    fn walk_ast(&self, mut out: AstPass<Pg>) -> QueryResult<()> {
        out.push_sql("SELECT row_to_json(q)::text, q::text FROM (");
        self.0.walk_template(&mut out)?;
        out.push_sql(") AS q");
        self.0.walk_order(&mut out);
        Ok(())
    }
}

impl Query for RowsAsText {
    type SqlType = (Text, Text);
}

impl QueryId for RowsAsText {
    type QueryId = ();

    const HAS_STATIC_QUERY_ID: bool = false;
}

impl RunQueryDsl<PgConnection> for RowsAsText {}

/// `SELECT EXISTS (inner)`.
#[derive(Debug)]
pub struct RowExists<Q>(pub Q);

impl<Q: QueryFragment<Pg>> QueryFragment<Pg> for RowExists<Q> {
    fn walk_ast(&self, mut out: AstPass<Pg>) -> QueryResult<()> {
        out.push_sql("SELECT EXISTS (");
        self.0.walk_ast(out.reborrow())?;
        out.push_sql(")");
        Ok(())
    }
}

impl<Q> Query for RowExists<Q> {
    type SqlType = Bool;
}

impl<Q> QueryId for RowExists<Q> {
    type QueryId = ();

    const HAS_STATIC_QUERY_ID: bool = false;
}

impl<Q> RunQueryDsl<PgConnection> for RowExists<Q> {}

/// The `debug_query` text of `query`, or a marker when it cannot be built.
pub fn sql_text<Q: QueryFragment<Pg>>(query: &Q) -> String {
    let mut text = String::new();
    match write!(text, "{}", debug_query::<Pg, _>(query)) {
        Ok(()) => text,
        Err(_) => "<statement cannot be built>".to_string(),
    }
}
