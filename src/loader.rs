//! Tab-delimited input readers.
//!
//! # Catalog file
//!
//! Header row, then one section per row:
//!
//! | Column | Field |
//! |--------|-------|
//! | 0 | identifier |
//! | 1 | year level |
//! | 2 | name |
//! | 3 | section number |
//! | 4 | mandatory flag (`true`/`false`) |
//! | 5 | credit |
//! | 6 | theory credit |
//! | 7 | teacher |
//! | 8 | fixed-time specifier (optional) |
//!
//! # Demand file
//!
//! No header. Columns 0 and 1 are ignored; demanded identifiers sit at
//! columns 2, 4, 6, … with an ignored column after each.
//!
//! Malformed rows are logged and skipped. Only I/O failures abort a read.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

use crate::error::{Result, TimetableError};
use crate::models::{Course, FixedTime, StudentDemand};

const CATALOG_COLUMNS: usize = 8;
const DEMAND_FIRST_COLUMN: usize = 2;

fn builder(has_headers: bool) -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder
        .delimiter(b'\t')
        .has_headers(has_headers)
        .flexible(true)
        .quoting(false);
    builder
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map_or(0, |p| p.line())
}

/// Reads catalog rows from tab-delimited text.
pub fn read_catalog<R: Read>(reader: R) -> Result<Vec<Course>> {
    let mut csv = builder(true).from_reader(reader);
    let mut courses = Vec::new();

    for record in csv.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                warn!(error = %err, "catalog row skipped");
                continue;
            }
        };
        match parse_course(&record) {
            Ok(course) => courses.push(course),
            Err(err) => warn!(error = %err, "catalog row skipped"),
        }
    }

    debug!(count = courses.len(), "catalog loaded");
    Ok(courses)
}

/// Reads a catalog file.
pub fn read_catalog_file(path: impl AsRef<Path>) -> Result<Vec<Course>> {
    read_catalog(File::open(path)?)
}

/// Reads student demand rows from tab-delimited text.
pub fn read_demands<R: Read>(reader: R) -> Result<Vec<StudentDemand>> {
    let mut csv = builder(false).from_reader(reader);
    let mut demands = Vec::new();

    for record in csv.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                warn!(error = %err, "demand row skipped");
                continue;
            }
        };
        let demand = StudentDemand::new(
            record
                .iter()
                .skip(DEMAND_FIRST_COLUMN)
                .step_by(2)
                .map(str::trim)
                .filter(|id| !id.is_empty()),
        );
        if demand.is_empty() {
            debug!(line = line_of(&record), "demand row without identifiers");
            continue;
        }
        demands.push(demand);
    }

    debug!(count = demands.len(), "demands loaded");
    Ok(demands)
}

/// Reads a demand file.
pub fn read_demands_file(path: impl AsRef<Path>) -> Result<Vec<StudentDemand>> {
    read_demands(File::open(path)?)
}

fn parse_course(record: &StringRecord) -> Result<Course> {
    let line = line_of(record);
    let malformed = |reason: String| TimetableError::MalformedRow { line, reason };

    if record.len() < CATALOG_COLUMNS {
        return Err(malformed(format!(
            "expected at least {CATALOG_COLUMNS} columns, found {}",
            record.len()
        )));
    }

    let field = |i: usize| record.get(i).unwrap_or("").trim();
    let int = |i: usize, name: &str| {
        field(i)
            .parse::<i32>()
            .map_err(|_| malformed(format!("{name} '{}' is not an integer", field(i))))
    };

    let id = field(0);
    if id.is_empty() {
        return Err(malformed("empty identifier".into()));
    }
    let mandatory = match field(4).to_ascii_lowercase().as_str() {
        "true" => true,
        "false" => false,
        other => return Err(malformed(format!("mandatory flag '{other}' is not true/false"))),
    };

    let course = Course::new(id)
        .with_year(int(1, "year")?)
        .with_name(field(2))
        .with_section(int(3, "section")?)
        .with_mandatory(mandatory)
        .with_credits(int(5, "credit")?, int(6, "theory credit")?)
        .with_teacher(field(7))
        .with_fixed_time(field(8));

    if let Some(spec) = &course.fixed_time {
        if FixedTime::parse(spec).is_none() {
            return Err(malformed(format!("invalid fixed time '{spec}'")));
        }
    }
    Ok(course)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = "\
id\tyear\tname\tsection\tmandatory\tcredit\ttheory\tteacher\tfixed
CSE101\t1\tProgramming\t1\tTRUE\t3\t3\tKim\t
CSE101\t1\tProgramming\t2\ttrue\t3\t3\tKim
CSE210\t2\tDatabases\t1\tFalse\t3\t2\tLee\tBD 1530-1730
CSE999\tx\tBroken\t1\ttrue\t3\t3\tPark\t
CSE300\t3\tNetworks\t1\tmaybe\t3\t3\tPark\t
CSE301\t3\tShort
CSE302\t3\tBad time\t1\tfalse\t3\t3\tPark\tZ 0900-1000
";

    #[test]
    fn test_read_catalog() {
        let courses = read_catalog(CATALOG.as_bytes()).unwrap();
        assert_eq!(courses.len(), 3);

        assert_eq!(courses[0].id, "CSE101");
        assert!(courses[0].mandatory);
        assert!(!courses[0].is_fixed());
        assert_eq!(courses[1].section, 2);

        let db = &courses[2];
        assert_eq!(db.year, 2);
        assert_eq!(db.name, "Databases");
        assert!(!db.mandatory);
        assert_eq!(db.credit, 3);
        assert_eq!(db.theory_credit, 2);
        assert_eq!(db.teacher, "Lee");
        assert_eq!(db.fixed_time.as_deref(), Some("BD 1530-1730"));
    }

    #[test]
    fn test_parse_course_errors() {
        let record = StringRecord::from(vec!["A", "1", "N", "1", "yes", "3", "3", "T"]);
        let err = parse_course(&record).unwrap_err();
        assert!(matches!(err, TimetableError::MalformedRow { .. }));
        assert!(err.to_string().contains("mandatory flag 'yes'"));

        let short = StringRecord::from(vec!["A", "1"]);
        assert!(parse_course(&short).is_err());
    }

    #[test]
    fn test_read_demands() {
        let text = "\
2024001\tKim\tCSE101\tx\tCSE210\tx
2024002\tLee\t\t\tCSE101
2024003\tPark
";
        let demands = read_demands(text.as_bytes()).unwrap();
        assert_eq!(demands.len(), 2);
        assert_eq!(demands[0].course_ids, vec!["CSE101", "CSE210"]);
        assert_eq!(demands[1].course_ids, vec!["CSE101"]);
    }

    #[test]
    fn test_missing_file() {
        let err = read_catalog_file("/nonexistent/catalog.tsv").unwrap_err();
        assert!(matches!(err, TimetableError::Io(_)));
    }
}
