use crate::students::dto::Student;

/// Case-insensitive substring match over names, parent name, grade and board.
/// Keeps the input order; an empty query matches everyone.
pub fn filter_students<'a>(students: &'a [Student], query: &str) -> Vec<&'a Student> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return students.iter().collect();
    }
    students.iter().filter(|s| matches(s, &needle)).collect()
}

fn matches(student: &Student, needle: &str) -> bool {
    [
        &student.first_name,
        &student.last_name,
        &student.parent_name,
        &student.board,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
        || student.grade.contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: i64, first: &str, last: &str, parent: &str, grade: &str, board: &str) -> Student {
        Student {
            id,
            first_name: first.into(),
            last_name: last.into(),
            full_name: None,
            grade: grade.into(),
            board: board.into(),
            parent_name: parent.into(),
            parent_contact_primary: "9000000000".into(),
            parent_contact_secondary: None,
            admission_date: None,
            total_paid: 0.0,
            fee_structure: None,
        }
    }

    fn roster() -> Vec<Student> {
        vec![
            student(1, "Ravi", "Kumar", "Suresh Kumar", "6", "CBSE"),
            student(2, "Asha", "Rao", "Mohan Rao", "10", "SSC"),
            student(3, "Kiran", "Das", "Latha Das", "1", "CBSE"),
        ]
    }

    fn ids(found: Vec<&Student>) -> Vec<i64> {
        found.into_iter().map(|s| s.id).collect()
    }

    #[test]
    fn no_match_is_empty() {
        assert!(filter_students(&roster(), "zzz").is_empty());
    }

    #[test]
    fn names_match_case_insensitively() {
        let all = roster();
        assert_eq!(ids(filter_students(&all, "ravi")), vec![1]);
        assert_eq!(ids(filter_students(&all, "RAO")), vec![2]);
        assert_eq!(ids(filter_students(&all, "latha")), vec![3]);
    }

    #[test]
    fn board_and_grade_match() {
        let all = roster();
        assert_eq!(ids(filter_students(&all, "cbse")), vec![1, 3]);
        assert_eq!(ids(filter_students(&all, "ssc")), vec![2]);
        // "1" is a substring of "10"
        assert_eq!(ids(filter_students(&all, "1")), vec![2, 3]);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let all = roster();
        assert_eq!(ids(filter_students(&all, "ravi ")), vec![1]);
        assert_eq!(ids(filter_students(&all, "  ssc\t")), vec![2]);
    }

    #[test]
    fn blank_query_keeps_everyone_in_order() {
        assert_eq!(ids(filter_students(&roster(), "   ")), vec![1, 2, 3]);
    }
}
