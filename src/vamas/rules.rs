//! Conditional read rules.
//!
//! A schema is an ordered list of [`Rule`]s. Each rule names the field(s) it
//! fills, how the lines are read, and a [`Condition`] over fields already
//! decoded. Conditions see the record being built first and then the file
//! header, so block rules can depend on the experiment mode.

use crate::cursor::LineCursor;
use crate::error::{Result, XpsError};
use crate::models::{Header, Record, Value};

/// Predicate over previously decoded fields
#[derive(Debug, Clone, Copy)]
pub enum Condition {
    Always,
    /// Field value is one of `values`, compared case-insensitively
    ValueIn {
        field: &'static str,
        values: &'static [&'static str],
    },
    Any(&'static [Condition]),
    All(&'static [Condition]),
}

impl Condition {
    pub fn holds(&self, scope: &Scope<'_>) -> bool {
        match self {
            Condition::Always => true,
            Condition::ValueIn { field, values } => scope
                .lookup(field)
                .and_then(Value::as_text)
                .is_some_and(|value| {
                    let value = value.trim();
                    values.iter().any(|v| v.eq_ignore_ascii_case(value))
                }),
            Condition::Any(conditions) => conditions.iter().any(|c| c.holds(scope)),
            Condition::All(conditions) => conditions.iter().all(|c| c.holds(scope)),
        }
    }
}

/// How the lines of a rule are consumed
#[derive(Debug, Clone, Copy)]
pub enum ReadAs {
    Text,
    Int,
    /// Text validated as a number, kept as written
    Real,
    /// Text restricted to a closed set of values
    Choice(&'static [&'static str]),
    /// `count` lines joined with newlines
    JoinedLines {
        count: &'static str,
        omit_empty: bool,
    },
    /// `count` lines kept as a list of text values
    TextList {
        count: &'static str,
        omit_empty: bool,
    },
    /// `count` lines parsed as integers
    IntList { count: &'static str },
    /// `count` entries of one line per rule field, in field order
    Interleaved {
        count: &'static str,
        omit_empty: bool,
    },
    /// Ordinate matrix, read time-step major and channel minor
    Ordinate {
        samples: &'static str,
        channels: &'static str,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub fields: &'static [&'static str],
    pub read: ReadAs,
    pub when: Condition,
}

impl Rule {
    pub const fn text(field: &'static [&'static str]) -> Self {
        Self {
            fields: field,
            read: ReadAs::Text,
            when: Condition::Always,
        }
    }

    pub const fn read(fields: &'static [&'static str], read: ReadAs) -> Self {
        Self {
            fields,
            read,
            when: Condition::Always,
        }
    }

    pub const fn when(self, when: Condition) -> Self {
        Self {
            fields: self.fields,
            read: self.read,
            when,
        }
    }
}

/// Every field name a rule table can produce, in schema order
pub fn field_names(rules: &[Rule]) -> Vec<&'static str> {
    rules.iter().flat_map(|rule| rule.fields.iter().copied()).collect()
}

/// Fields visible to conditions and counts
pub struct Scope<'a> {
    record: &'a Record,
    header: Option<&'a Header>,
}

impl<'a> Scope<'a> {
    pub fn new(record: &'a Record, header: Option<&'a Header>) -> Self {
        Self { record, header }
    }

    pub fn lookup(&self, field: &str) -> Option<&'a Value> {
        self.record
            .get(field)
            .or_else(|| self.header.and_then(|header| header.get(field)))
    }
}

/// Output of running a rule table
#[derive(Debug, Default)]
pub struct RuleOutput {
    pub record: Record,
    pub ordinate_values: Vec<Vec<Option<f64>>>,
}

/// Run `rules` in order against the cursor
pub fn apply_rules(
    rules: &[Rule],
    cursor: &mut LineCursor,
    header: Option<&Header>,
) -> Result<RuleOutput> {
    let mut output = RuleOutput::default();

    for rule in rules {
        if !rule.when.holds(&Scope::new(&output.record, header)) {
            continue;
        }

        match rule.read {
            ReadAs::Text => {
                for field in rule.fields {
                    let line = cursor.next_line(field)?;
                    output.record.insert(*field, Value::Text(line));
                }
            }
            ReadAs::Int => {
                for field in rule.fields {
                    let value = cursor.next_int(field)?;
                    output.record.insert(*field, Value::Int(value));
                }
            }
            ReadAs::Real => {
                for field in rule.fields {
                    let value = cursor.next_real(field)?;
                    output.record.insert(*field, Value::Text(value));
                }
            }
            ReadAs::Choice(choices) => {
                for field in rule.fields {
                    let line = cursor.next_line(field)?;
                    let known = choices.iter().any(|c| c.eq_ignore_ascii_case(line.trim()));
                    if !known {
                        return Err(XpsError::unsupported_value(cursor.file(), *field, line));
                    }
                    output.record.insert(*field, Value::Text(line));
                }
            }
            ReadAs::JoinedLines { count, omit_empty } => {
                let n = entry_count(&output.record, header, count, cursor)?;
                for field in rule.fields {
                    let lines = read_lines(cursor, field, n)?;
                    if lines.is_empty() && omit_empty {
                        continue;
                    }
                    output.record.insert(*field, Value::Text(lines.join("\n")));
                }
            }
            ReadAs::TextList { count, omit_empty } => {
                let n = entry_count(&output.record, header, count, cursor)?;
                for field in rule.fields {
                    let lines = read_lines(cursor, field, n)?;
                    if lines.is_empty() && omit_empty {
                        continue;
                    }
                    output.record.insert(*field, Value::text_list(lines));
                }
            }
            ReadAs::IntList { count } => {
                let n = entry_count(&output.record, header, count, cursor)?;
                for field in rule.fields {
                    let values = (0..n)
                        .map(|_| cursor.next_int(field).map(Value::Int))
                        .collect::<Result<Vec<_>>>()?;
                    output.record.insert(*field, Value::List(values));
                }
            }
            ReadAs::Interleaved { count, omit_empty } => {
                let n = entry_count(&output.record, header, count, cursor)?;
                let capacity = n.min(cursor.remaining());
                let mut columns: Vec<Vec<Value>> =
                    vec![Vec::with_capacity(capacity); rule.fields.len()];
                for _ in 0..n {
                    for (field, column) in rule.fields.iter().zip(columns.iter_mut()) {
                        column.push(Value::Text(cursor.next_line(field)?));
                    }
                }
                if n == 0 && omit_empty {
                    continue;
                }
                for (field, column) in rule.fields.iter().zip(columns) {
                    output.record.insert(*field, Value::List(column));
                }
            }
            ReadAs::Ordinate { samples, channels } => {
                output.ordinate_values =
                    read_ordinate(cursor, &output.record, header, samples, channels)?;
            }
        }
    }

    Ok(output)
}

/// Declared entry count; non-positive counts read nothing
fn entry_count(
    record: &Record,
    header: Option<&Header>,
    count_field: &str,
    cursor: &LineCursor,
) -> Result<usize> {
    let count = declared_int(record, header, count_field, cursor)?;
    Ok(usize::try_from(count).unwrap_or(0))
}

fn declared_int(
    record: &Record,
    header: Option<&Header>,
    field: &str,
    cursor: &LineCursor,
) -> Result<i64> {
    Scope::new(record, header)
        .lookup(field)
        .and_then(Value::as_int)
        .ok_or_else(|| XpsError::missing_field(cursor.file(), field))
}

fn read_lines(cursor: &mut LineCursor, field: &str, count: usize) -> Result<Vec<String>> {
    (0..count).map(|_| cursor.next_line(field)).collect()
}

fn read_ordinate(
    cursor: &mut LineCursor,
    record: &Record,
    header: Option<&Header>,
    samples_field: &str,
    channels_field: &str,
) -> Result<Vec<Vec<Option<f64>>>> {
    let samples = declared_int(record, header, samples_field, cursor)?;
    let channels = declared_int(record, header, channels_field, cursor)?;

    if channels <= 0 {
        return Err(XpsError::unsupported_value(
            cursor.file(),
            channels_field,
            channels.to_string(),
        ));
    }
    if samples < 0 || samples % channels != 0 {
        return Err(XpsError::unsupported_value(
            cursor.file(),
            samples_field,
            format!("{} values over {} channels", samples, channels),
        ));
    }

    // samples are stored channel-interleaved
    let samples = samples as usize;
    let channels = channels as usize;
    let mut flat = Vec::with_capacity(samples.min(cursor.remaining()));
    for _ in 0..samples {
        flat.push(cursor.next_sample("ordinate_values")?);
    }

    let rows = (0..channels)
        .map(|channel| flat.iter().skip(channel).step_by(channels).copied().collect())
        .collect();
    Ok(rows)
}
