use std::{fmt, io::Write};

use serde::de::{Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};

use crate::error::StatementError;

/// One result row: column names and text values, in select-list order.
///
/// Names come from the row's `row_to_json` object, values from the
/// server's text form of the row, so every value reads exactly as the
/// server prints it. Duplicate column names are kept.
#[derive(Debug, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn from_row(json: &str, text: &str) -> Result<Self, StatementError> {
        let ColumnNames(names) = serde_json::from_str(json)?;
        let values = if names.is_empty() {
            Vec::new()
        } else {
            split_row_text(text)
                .ok_or_else(|| StatementError::RowText(text.to_string()))?
        };
        if values.len() != names.len() {
            return Err(StatementError::RowText(format!(
                "{} columns but {} values in {}",
                names.len(),
                values.len(),
                text
            )));
        }

        let fields = names
            .into_iter()
            .zip(values)
            .map(|(name, value)| (name, value.unwrap_or_else(|| "null".to_string())))
            .collect();
        Ok(Record { fields })
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, value)| value.as_str())
    }

    pub fn into_values(self) -> Vec<String> {
        self.fields.into_iter().map(|(_, value)| value).collect()
    }
}

/// Keys of one JSON object in document order. A JSON map type would
/// collapse duplicates.
struct ColumnNames(Vec<String>);

struct ColumnNamesVisitor;

impl<'de> Visitor<'de> for ColumnNamesVisitor {
    type Value = ColumnNames;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object holding one row")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ColumnNames, A::Error> {
        let mut names = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((name, IgnoredAny)) = map.next_entry::<String, IgnoredAny>()? {
            names.push(name);
        }
        Ok(ColumnNames(names))
    }
}

impl<'de> Deserialize<'de> for ColumnNames {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ColumnNamesVisitor)
    }
}

/// Splits a row literal such as `(1,"Smith, J",,"a ""b""")` into its
/// fields. An empty unquoted field is NULL. Inside quotes `""` and `\x`
/// stand for `"` and `x`.
fn split_row_text(text: &str) -> Option<Vec<Option<String>>> {
    let body = text.strip_prefix('(')?.strip_suffix(')')?;
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut in_quotes = false;

    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            '\\' if in_quotes => field.push(chars.next()?),
            ',' if !in_quotes => {
                fields.push(finish_field(&mut field, quoted));
                quoted = false;
            }
            _ => field.push(c),
        }
    }
    if in_quotes {
        return None;
    }
    fields.push(finish_field(&mut field, quoted));
    Some(fields)
}

fn finish_field(field: &mut String, quoted: bool) -> Option<String> {
    let value = std::mem::take(field);
    if value.is_empty() && !quoted {
        None
    } else {
        Some(value)
    }
}

/// Writes the header once, then one tab-separated line per record.
/// Nothing is written for an empty result.
pub fn print_records<W: Write>(records: &[Record], out: &mut W) -> std::io::Result<usize> {
    if let Some(first) = records.first() {
        writeln!(out, "{}", first.columns().collect::<Vec<_>>().join("\t"))?;
    }
    for record in records {
        writeln!(out, "{}", record.values().collect::<Vec<_>>().join("\t"))?;
    }
    Ok(records.len())
}
