//! # Table Module
//!
//! A minimal column store for the text that `sdds2stream` prints.
//! Each row is one beamline element, in the order the elements appear
//! along the machine. Row order is never changed: it is the independent
//! axis for interpolation and for left-to-right structure plots.

use serde::Serialize;

use crate::error::{Error, Result};

/// The values held by a single named column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnData {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

/// An ordered set of equally long named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    /// Parses whitespace-delimited text into a table with the given column names.
    ///
    /// Blank lines are skipped. Tokens may be wrapped in double quotes to
    /// carry embedded whitespace (element names sometimes do). Every
    /// remaining line must have exactly `names.len()` fields.
    ///
    /// A column becomes numeric when all of its tokens parse as `f64`,
    /// otherwise it is kept as text.
    pub fn parse<S: AsRef<str>>(text: &str, names: &[S]) -> Result<Self> {
        let mut raw: Vec<Vec<String>> = vec![Vec::new(); names.len()];
        let mut rows = 0;

        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields = split_fields(line).map_err(|reason| Error::Parse {
                line: index + 1,
                reason,
            })?;
            if fields.len() != names.len() {
                return Err(Error::Parse {
                    line: index + 1,
                    reason: format!("expected {} fields, found {}", names.len(), fields.len()),
                });
            }
            for (column, field) in raw.iter_mut().zip(fields) {
                column.push(field);
            }
            rows += 1;
        }

        if rows == 0 {
            return Err(Error::EmptyInput);
        }

        let columns = names
            .iter()
            .zip(raw)
            .map(|(name, tokens)| Column {
                name: name.as_ref().to_string(),
                data: infer_column(tokens),
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Number of rows (beamline elements).
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns a numeric column by name.
    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        match self.column(name) {
            Some(Column {
                data: ColumnData::Numeric(values),
                ..
            }) => Ok(values),
            Some(_) => Err(Error::NotNumeric(name.to_string())),
            None => Err(Error::MissingColumn(name.to_string())),
        }
    }

    /// Returns a column rendered as text. Numeric columns are formatted.
    pub fn text(&self, name: &str) -> Result<Vec<String>> {
        match self.column(name) {
            Some(Column {
                data: ColumnData::Text(values),
                ..
            }) => Ok(values.clone()),
            Some(Column {
                data: ColumnData::Numeric(values),
                ..
            }) => Ok(values.iter().map(|v| v.to_string()).collect()),
            None => Err(Error::MissingColumn(name.to_string())),
        }
    }

    /// Appends a numeric column, replacing any existing column of that name.
    pub fn set_numeric(&mut self, name: &str, values: Vec<f64>) -> Result<()> {
        if values.len() != self.rows {
            return Err(Error::LengthMismatch {
                name: name.to_string(),
                expected: self.rows,
                got: values.len(),
            });
        }
        let data = ColumnData::Numeric(values);
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.data = data,
            None => self.columns.push(Column {
                name: name.to_string(),
                data,
            }),
        }
        Ok(())
    }
}

fn infer_column(tokens: Vec<String>) -> ColumnData {
    let parsed: std::result::Result<Vec<f64>, _> =
        tokens.iter().map(|t| t.parse::<f64>()).collect();
    match parsed {
        Ok(values) => ColumnData::Numeric(values),
        Err(_) => ColumnData::Text(tokens),
    }
}

/// Splits one line on whitespace, honouring double-quoted tokens.
fn split_fields(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        let mut field = String::new();
        if c == '"' {
            chars.next();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '"' {
                    closed = true;
                    break;
                }
                field.push(c);
            }
            if !closed {
                return Err("unterminated quote".to_string());
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                field.push(c);
                chars.next();
            }
        }
        fields.push(field);
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAG: &str = "\
_BEG_ 0.000000e+00 0.0
Q1 0.000000e+00 1.0
Q1 2.000000e-01 1.0
D1 2.000000e-01 0.0

B1 1.200000e+00 0.5
";

    #[test]
    fn parses_numeric_and_text_columns() {
        let table = Table::parse(MAG, &["ElementName", "s", "Profile"]).unwrap();
        assert_eq!(table.len(), 5);
        assert_eq!(table.numeric("s").unwrap()[4], 1.2);
        assert_eq!(table.numeric("Profile").unwrap(), &[0.0, 1.0, 1.0, 0.0, 0.5]);
        assert_eq!(table.text("ElementName").unwrap()[1], "Q1");
        assert!(matches!(
            table.numeric("ElementName"),
            Err(Error::NotNumeric(_))
        ));
    }

    #[test]
    fn keeps_quoted_tokens_together() {
        let table = Table::parse("\"BPM 1\" 3.5\nQF 4", &["ElementName", "s"]).unwrap();
        assert_eq!(table.text("ElementName").unwrap(), vec!["BPM 1", "QF"]);
        assert_eq!(table.numeric("s").unwrap(), &[3.5, 4.0]);
    }

    #[test]
    fn rejects_wrong_field_count() {
        let err = Table::parse("Q1 1.0\nQ2\n", &["ElementName", "s"]).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn rejects_empty_output() {
        assert!(matches!(
            Table::parse("\n  \n", &["s"]),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let table = Table::parse("1 2", &["s", "betax"]).unwrap();
        match table.numeric("betay") {
            Err(Error::MissingColumn(name)) => assert_eq!(name, "betay"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn set_numeric_checks_length_and_replaces() {
        let mut table = Table::parse("1\n2", &["s"]).unwrap();
        assert!(table.set_numeric("X", vec![1.0]).is_err());
        table.set_numeric("X", vec![1.0, 2.0]).unwrap();
        table.set_numeric("X", vec![3.0, 4.0]).unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["s", "X"]);
        assert_eq!(table.numeric("X").unwrap(), &[3.0, 4.0]);
    }
}
