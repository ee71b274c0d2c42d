//! Student aggregation and merit ranking.
//!
//! Both are pure functions over a document snapshot. Aggregates are
//! recomputed on every read so deletions are reflected immediately.

use std::collections::HashMap;

use chrono::Utc;

use crate::models::{Document, MeritFilter, MeritList, RankedEntry, StudentAggregate};

/// Group documents by owner, keeping first-appearance order.
///
/// Display fields (name, roll number, course, year) come from the first
/// document seen for each owner.
pub fn aggregate_students(documents: &[Document]) -> Vec<StudentAggregate> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut students: Vec<StudentAggregate> = Vec::new();

    for document in documents {
        let owner = document.owner();
        let position = index.get(owner).copied();
        match position {
            Some(i) => {
                let student = &mut students[i];
                student.total_points += u64::from(document.points);
                student.documents_count += 1;
            }
            None => {
                index.insert(owner, students.len());
                students.push(StudentAggregate {
                    id: owner.to_string(),
                    name: document.student_name.clone(),
                    roll_no: document.roll_no.clone(),
                    course: document.course.clone(),
                    year: document.year.clone(),
                    total_points: u64::from(document.points),
                    documents_count: 1,
                });
            }
        }
    }

    students
}

/// Order aggregates by total points, highest first, and number them.
///
/// The sort is stable: students with equal totals keep their relative
/// order and still receive distinct ranks.
pub fn rank_students(mut students: Vec<StudentAggregate>) -> Vec<RankedEntry> {
    students.sort_by(|a, b| b.total_points.cmp(&a.total_points));
    students
        .into_iter()
        .enumerate()
        .map(|(position, student)| RankedEntry {
            student,
            rank: position + 1,
        })
        .collect()
}

/// Aggregate, filter, then rank.
pub fn ranked_students(documents: &[Document], filter: &MeritFilter) -> Vec<RankedEntry> {
    let students = aggregate_students(documents)
        .into_iter()
        .filter(|s| filter.matches(s))
        .collect();
    rank_students(students)
}

/// Merit list stamped with the generation time.
pub fn generate_merit_list(documents: &[Document], filter: &MeritFilter) -> MeritList {
    let merit_list = ranked_students(documents, filter);
    tracing::info!(
        entries = merit_list.len(),
        course = filter.course.as_deref().unwrap_or("*"),
        year = filter.year.as_deref().unwrap_or("*"),
        "Merit list generated"
    );
    MeritList {
        merit_list,
        generated_at: Utc::now(),
    }
}
