//! Exam table loading.
//!
//! The exam table is a comma-separated export (Excel dialect) with a header
//! row. One column holds the exam completion timestamp, the others hold
//! turnaround measurements in minutes.

use std::{fs, path::Path};

use anyhow::{Context, bail};
use chrono::{NaiveDate, NaiveDateTime, Timelike as _};

/// Exam completion instant, truncated to the minute.
pub type Timestamp = NaiveDateTime;

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parses an exam timestamp such as `2017-10-01T00:00`.
///
/// ISO-8601 (`T` or space separated, with or without seconds), US-style
/// `MM/DD/YYYY HH:MM` and date-only forms (midnight) are accepted. Seconds are
/// dropped.
pub fn parse_timestamp(s: &str) -> anyhow::Result<Timestamp> {
    let s = s.trim();
    let parsed = TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .with_context(|| format!("Invalid timestamp '{s}' (expected e.g. 2017-10-01T00:00)"))?;
    parsed
        .with_second(0)
        .and_then(|ts| ts.with_nanosecond(0))
        .with_context(|| format!("Failed to truncate timestamp '{s}' to the minute"))
}

/// One measurement column, index-aligned with its exam timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementSeries {
    /// Header of the measurement column
    pub name: String,
    pub timestamps: Vec<Timestamp>,
    pub values: Vec<f64>,
    /// Rows dropped because the measurement cell was blank
    pub blank_rows: usize,
}

/// Measurement series loaded from an exam table.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamTable {
    pub series: Vec<MeasurementSeries>,
    /// Rows dropped because the timestamp cell was blank
    pub undated_rows: usize,
}

impl ExamTable {
    /// Reads the named columns of a CSV file.
    pub fn read_csv<P>(path: P, date_column: &str, columns: &[String]) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read exam table: {}", path.display()))?;
        Self::from_csv_str(&text, date_column, columns)
            .with_context(|| format!("Failed to load exam table: {}", path.display()))
    }

    /// Parses the named columns out of CSV text.
    pub fn from_csv_str(text: &str, date_column: &str, columns: &[String]) -> anyhow::Result<Self> {
        let mut records = parse_records(text)?.into_iter();
        let Some(header) = records.next().map(|record| record.fields) else {
            bail!("Exam table is empty");
        };
        let find_column = |name: &str| {
            header
                .iter()
                .position(|h| h.trim() == name)
                .with_context(|| {
                    format!(
                        "Column '{name}' not found (available: {})",
                        header.join(", ")
                    )
                })
        };
        let date_idx = find_column(date_column)?;
        let value_idxs = columns
            .iter()
            .map(|name| find_column(name))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let mut series = columns
            .iter()
            .map(|name| MeasurementSeries {
                name: name.clone(),
                timestamps: vec![],
                values: vec![],
                blank_rows: 0,
            })
            .collect::<Vec<_>>();
        let mut undated_rows = 0;

        for Record { line, fields } in records {
            if fields.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            let cell = |idx: usize| fields.get(idx).map_or("", |c| c.trim());

            let date_cell = cell(date_idx);
            if date_cell.is_empty() {
                undated_rows += 1;
                continue;
            }
            let timestamp = parse_timestamp(date_cell)
                .with_context(|| format!("Line {line}, column '{date_column}'"))?;

            for (column, &idx) in series.iter_mut().zip(&value_idxs) {
                let value_cell = cell(idx);
                if value_cell.is_empty() {
                    column.blank_rows += 1;
                    continue;
                }
                let value = parse_measurement(value_cell).with_context(|| {
                    format!("Line {line}, column '{}'", column.name)
                })?;
                column.timestamps.push(timestamp);
                column.values.push(value);
            }
        }

        Ok(Self {
            series,
            undated_rows,
        })
    }
}

/// Parses a measurement cell; only finite numbers are turnaround times.
fn parse_measurement(cell: &str) -> anyhow::Result<f64> {
    let value = cell
        .parse::<f64>()
        .with_context(|| format!("Invalid number '{cell}'"))?;
    if !value.is_finite() {
        bail!("Measurement '{cell}' is not a finite number");
    }
    Ok(value)
}

/// One CSV record and the 1-based line it starts on.
#[derive(Debug, Clone, PartialEq)]
struct Record {
    line: usize,
    fields: Vec<String>,
}

/// Splits CSV text into records of unquoted fields.
///
/// Fields may be wrapped in double quotes; inside quotes, `""` is a literal
/// quote and commas and line breaks are kept. A leading byte order mark is
/// ignored.
fn parse_records(text: &str) -> anyhow::Result<Vec<Record>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = vec![];
    let mut fields = vec![];
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let ends_line = c == '\n' || (c == '\r' && chars.peek() != Some(&'\n'));
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut field)),
                '\r' if chars.peek() == Some(&'\n') => {}
                '\n' | '\r' => {
                    fields.push(std::mem::take(&mut field));
                    records.push(Record {
                        line: record_line,
                        fields: std::mem::take(&mut fields),
                    });
                    record_line = line + 1;
                }
                _ => field.push(c),
            }
        }
        if ends_line {
            line += 1;
        }
    }
    if in_quotes {
        bail!("Unterminated quoted field starting on line {record_line}");
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push(Record {
            line: record_line,
            fields,
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATE: &str = "Exam Completed Date";
    const PRELIM: &str = "Exam Completed to Preliminary Report (minutes)";
    const FINAL: &str = "Exam Completed to Report Finalized (minutes)";

    fn ts(s: &str) -> Timestamp {
        parse_timestamp(s).unwrap()
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2017, 10, 1)
            .unwrap()
            .and_hms_opt(13, 45, 0)
            .unwrap();
        for s in [
            "2017-10-01T13:45",
            "2017-10-01T13:45:59",
            "2017-10-01 13:45",
            " 2017-10-01 13:45:07 ",
            "10/01/2017 13:45",
        ] {
            assert_eq!(ts(s), expected, "{s}");
        }
        assert_eq!(ts("2017-10-01"), ts("2017-10-01T00:00"));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
        assert!(parse_timestamp("2017-13-01T00:00").is_err());
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn test_parse_records_quoting() {
        let text = "\u{feff}\"a, b\",c\r\n\"say \"\"hi\"\"\",\"multi\nline\"\n1,2";
        let records = parse_records(text).unwrap();
        let fields = records.iter().map(|r| r.fields.clone()).collect::<Vec<_>>();
        assert_eq!(
            fields,
            vec![
                vec!["a, b".to_owned(), "c".to_owned()],
                vec!["say \"hi\"".to_owned(), "multi\nline".to_owned()],
                vec!["1".to_owned(), "2".to_owned()],
            ]
        );
        let lines = records.iter().map(|r| r.line).collect::<Vec<_>>();
        assert_eq!(lines, vec![1, 2, 4]);
    }

    #[test]
    fn test_parse_records_trailing_empty_field() {
        let records = parse_records("a,\n").unwrap();
        assert_eq!(
            records,
            vec![Record {
                line: 1,
                fields: vec!["a".to_owned(), String::new()],
            }]
        );
    }

    #[test]
    fn test_parse_records_unterminated_quote() {
        assert!(parse_records("\"abc").is_err());
    }

    #[test]
    fn test_from_csv_str() {
        let text = format!(
            "Accession,\"{DATE}\",\"{PRELIM}\",\"{FINAL}\"\n\
             A1,2017-09-01T08:00,12,40\n\
             A2,2017-11-01T09:30,,55\n\
             A3,,5,6\n\
             \n\
             A4,2018-05-01T10:15,7,31\n"
        );
        let table =
            ExamTable::from_csv_str(&text, DATE, &[PRELIM.to_owned(), FINAL.to_owned()]).unwrap();

        assert_eq!(table.undated_rows, 1);
        let [prelim, finalized] = table.series.as_slice() else {
            panic!("expected two series");
        };
        assert_eq!(prelim.name, PRELIM);
        assert_eq!(prelim.values, vec![12.0, 7.0]);
        assert_eq!(
            prelim.timestamps,
            vec![ts("2017-09-01T08:00"), ts("2018-05-01T10:15")]
        );
        assert_eq!(prelim.blank_rows, 1);
        assert_eq!(finalized.values, vec![40.0, 55.0, 31.0]);
        assert_eq!(finalized.timestamps.len(), finalized.values.len());
        assert_eq!(finalized.blank_rows, 0);
    }

    #[test]
    fn test_missing_column() {
        let text = format!("{DATE},{FINAL}\n2017-09-01T08:00,40\n");
        let err = ExamTable::from_csv_str(&text, DATE, &[PRELIM.to_owned()]).unwrap_err();
        assert!(err.to_string().contains(PRELIM));
    }

    #[test]
    fn test_invalid_number_names_row() {
        let text = format!("{DATE},{FINAL}\n2017-09-01T08:00,40\n2017-09-02T08:00,abc\n");
        let err = ExamTable::from_csv_str(&text, DATE, &[FINAL.to_owned()]).unwrap_err();
        assert!(format!("{err:#}").contains("Line 3"));
    }

    #[test]
    fn test_error_line_counts_quoted_line_breaks() {
        let text = format!(
            "{DATE},Note,{FINAL}\n\
             2017-09-01T08:00,\"called\r\nback\",40\n\
             2017-09-02T08:00,,abc\n"
        );
        let err = ExamTable::from_csv_str(&text, DATE, &[FINAL.to_owned()]).unwrap_err();
        assert!(format!("{err:#}").contains("Line 4"), "{err:#}");
    }

    #[test]
    fn test_non_finite_measurement_is_rejected() {
        for cell in ["NaN", "inf", "-inf", "infinity"] {
            let text = format!("{DATE},{FINAL}\n2017-09-01T08:00,40\n2017-09-02T08:00,{cell}\n");
            let err = ExamTable::from_csv_str(&text, DATE, &[FINAL.to_owned()]).unwrap_err();
            let message = format!("{err:#}");
            assert!(message.contains("Line 3"), "{message}");
            assert!(message.contains(FINAL), "{message}");
            assert!(message.contains("not a finite number"), "{message}");
        }
    }

    #[test]
    fn test_empty_table() {
        assert!(ExamTable::from_csv_str("", DATE, &[]).is_err());
    }
}
