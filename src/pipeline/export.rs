use serde::Serialize;
use thiserror::Error;

use crate::models::RankedEntry;

/// Column order of the exported merit list.
pub const CSV_HEADER: [&str; 8] = [
    "rank",
    "id",
    "name",
    "rollNo",
    "course",
    "year",
    "totalPoints",
    "documentsCount",
];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV flush failed: {0}")]
    Flush(String),

    #[error("CSV output is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

#[derive(Serialize)]
struct CsvRow<'a> {
    rank: usize,
    id: &'a str,
    name: &'a str,
    roll_no: &'a str,
    course: &'a str,
    year: &'a str,
    total_points: u64,
    documents_count: usize,
}

/// Render a ranked list as CSV. The header row is always written, even for
/// an empty list.
pub fn merit_list_csv(entries: &[RankedEntry]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for entry in entries {
        let student = &entry.student;
        writer.serialize(CsvRow {
            rank: entry.rank,
            id: &student.id,
            name: &student.name,
            roll_no: &student.roll_no,
            course: &student.course,
            year: &student.year,
            total_points: student.total_points,
            documents_count: student.documents_count,
        })?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Download name for an export, e.g. `merit-list-2026-10-14.csv`.
pub fn export_file_name(date: chrono::NaiveDate) -> String {
    format!("merit-list-{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StudentAggregate;

    fn entry(rank: usize, id: &str, name: &str, points: u64) -> RankedEntry {
        RankedEntry {
            student: StudentAggregate {
                id: id.into(),
                name: name.into(),
                roll_no: "2021001".into(),
                course: "B.Sc. Physics".into(),
                year: "3".into(),
                total_points: points,
                documents_count: 2,
            },
            rank,
        }
    }

    #[test]
    fn empty_list_has_header_only() {
        let csv = merit_list_csv(&[]).unwrap();
        assert_eq!(csv, "rank,id,name,rollNo,course,year,totalPoints,documentsCount\n");
    }

    #[test]
    fn rows_follow_header_order() {
        let csv = merit_list_csv(&[entry(1, "aman@college.com", "Aman Kumar", 25)]).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "1,aman@college.com,Aman Kumar,2021001,B.Sc. Physics,3,25,2");
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let csv = merit_list_csv(&[entry(1, "x", "Kumar, Aman", 3)]).unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), CSV_HEADER.to_vec());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[2], "Kumar, Aman");
    }

    #[test]
    fn file_name_uses_iso_date() {
        let date = chrono::NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        assert_eq!(export_file_name(date), "merit-list-2026-10-14.csv");
    }
}
