use chrono::{NaiveDate, NaiveTime};

use crate::error::InputError;

/// Defines one menu entry point per `(name, title)` pair.
///
/// Each entry point runs `<name>_impl` and turns its failure into a log
/// line; running out of input ends the menu loop.
#[macro_export]
macro_rules! menu_actions {
    ( $( ( $func_name:ident, $title:expr ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                fn $func_name<B: Backend, R: BufRead, W: Write>(
                    backend: &B,
                    prompter: &mut Prompter<R, W>,
                ) -> Flow {
                    match [<$func_name _impl>](backend, prompter) {
                        Ok(()) => Flow::Continue,
                        Err(err) => abandon($title, err),
                    }
                }
            }
        )+
    };
}

pub fn parse_int(s: &str) -> Result<i32, InputError> {
    let s = s.trim();
    s.parse::<i32>()
        .map_err(|_| InputError::NotAnInteger(s.to_string()))
}

pub fn parse_count(field: &'static str, s: &str) -> Result<i32, InputError> {
    let n = parse_int(s)?;
    if n < 0 {
        return Err(InputError::Negative(field));
    }
    Ok(n)
}

pub fn non_empty(field: &'static str, s: &str) -> Result<String, InputError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(InputError::Empty(field));
    }
    Ok(s.to_string())
}

/// Blank input means "no value".
pub fn optional_text(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Accepts `MM/DD/YYYY`, `MM/DD/YY` and `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Result<NaiveDate, InputError> {
    const DATE_FMT_ISO: &str = "%Y-%m-%d";
    const DATE_FMT_US: &str = "%m/%d/%Y";
    const DATE_FMT_US_SHORT: &str = "%m/%d/%y";

    let s = s.trim();
    let res = if s.contains('/') {
        let short_year = s.rsplit('/').next().map_or(false, |year| year.len() == 2);
        let fmt = if short_year {
            DATE_FMT_US_SHORT
        } else {
            DATE_FMT_US
        };
        NaiveDate::parse_from_str(s, fmt)
    } else {
        NaiveDate::parse_from_str(s, DATE_FMT_ISO)
    };
    res.map_err(|_| InputError::NotADate(s.to_string()))
}

/// 24-hour `H:MM` or `HH:MM`.
pub fn parse_clock(s: &str) -> Result<NaiveTime, InputError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| InputError::NotATime(s.to_string()))
}
