use crate::models::{Donor, DonorFeatures, Student, StudentFeatures};

/// Check whether a donor's course preference accepts a student's course
///
/// The preference "any" (any casing, or empty) accepts every course;
/// otherwise the preference matches by substring containment, so a donor
/// preference of "eng" accepts the course "Engineering".
#[inline]
pub fn course_matches(preferred_course: &str, student_course: &str) -> bool {
    let preferred = preferred_course.trim().to_lowercase();
    if preferred.is_empty() || preferred == "any" {
        return true;
    }
    student_course.to_lowercase().contains(&preferred)
}

/// Check the GPA eligibility gate
///
/// A student below the donor's minimum simply earns no GPA contribution;
/// this is a gate, not a penalty.
#[inline]
pub fn meets_gpa_requirement(student: &StudentFeatures, donor: &DonorFeatures) -> bool {
    student.gpa >= donor.min_gpa
}

/// Split a donor's comma-separated course preference into normalized entries
///
/// Used by the shortlist path, where a donor may list several courses
/// ("Engineering, ICT, Commerce"). Entries are trimmed and lower-cased;
/// blanks are dropped.
pub fn preferred_course_list(preferred_course: &str) -> Vec<String> {
    preferred_course
        .split(',')
        .map(|entry| entry.trim().to_lowercase())
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Build a donor's student shortlist
///
/// Keeps students at or above the donor's minimum GPA whose course appears
/// in the donor's preference list (a list containing "any", or an empty
/// preference, accepts every course), ordered by need score descending.
pub fn shortlist_students(donor: &Donor, students: Vec<Student>, limit: usize) -> Vec<Student> {
    let courses = donor
        .preferred_course
        .as_deref()
        .map(preferred_course_list)
        .unwrap_or_default();
    let accepts_any = courses.is_empty() || courses.iter().any(|c| c == "any");

    let mut eligible: Vec<Student> = students
        .into_iter()
        .filter(|student| student.gpa >= donor.min_gpa)
        .filter(|student| {
            if accepts_any {
                return true;
            }
            let course = student
                .course
                .as_deref()
                .unwrap_or("")
                .trim()
                .to_lowercase();
            courses.contains(&course)
        })
        .collect();

    eligible.sort_by(|a, b| {
        b.need_score
            .partial_cmp(&a.need_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });

    eligible.truncate(limit);
    eligible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DonorType;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn create_student(id: i64, gpa: f64, course: Option<&str>, need_score: f64) -> Student {
        Student {
            id,
            student_number: format!("ST{:04}", id),
            first_name: "Test".to_string(),
            last_name: format!("Student {}", id),
            gpa,
            course: course.map(str::to_string),
            need_score,
            province: None,
            created_at: Utc::now(),
        }
    }

    fn create_donor(min_gpa: f64, preferred_course: Option<&str>) -> Donor {
        Donor {
            id: 1,
            name: "Test Donor".to_string(),
            donor_type: DonorType::Alumni,
            preferred_course: preferred_course.map(str::to_string),
            min_gpa,
            max_amount: Decimal::new(500000, 2),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_course_matches_any() {
        assert!(course_matches("Any", "Engineering"));
        assert!(course_matches("ANY", "Commerce"));
        assert!(course_matches("", "ICT"));
        assert!(course_matches("any", ""));
    }

    #[test]
    fn test_course_matches_substring() {
        assert!(course_matches("eng", "Engineering"));
        assert!(course_matches("Commerce", "commerce"));
        assert!(!course_matches("Health", "ICT"));
    }

    #[test]
    fn test_preferred_course_list() {
        let courses = preferred_course_list("Engineering, ICT ,, Commerce");
        assert_eq!(courses, vec!["engineering", "ict", "commerce"]);
    }

    #[test]
    fn test_shortlist_orders_by_need() {
        let donor = create_donor(3.0, Some("Engineering"));
        let students = vec![
            create_student(1, 3.5, Some("Engineering"), 40.0),
            create_student(2, 3.2, Some("Engineering"), 90.0),
            create_student(3, 2.0, Some("Engineering"), 99.0), // below min GPA
            create_student(4, 3.8, Some("Commerce"), 80.0),    // wrong course
        ];

        let shortlist = shortlist_students(&donor, students, 5);

        assert_eq!(shortlist.len(), 2);
        assert_eq!(shortlist[0].id, 2);
        assert_eq!(shortlist[1].id, 1);
    }

    #[test]
    fn test_shortlist_comma_list_and_limit() {
        let donor = create_donor(0.0, Some("Engineering, ICT"));
        let students = vec![
            create_student(1, 3.0, Some("ICT"), 10.0),
            create_student(2, 3.0, Some("Engineering"), 20.0),
            create_student(3, 3.0, Some("ict"), 30.0),
            create_student(4, 3.0, Some("Health"), 95.0),
        ];

        let shortlist = shortlist_students(&donor, students, 2);

        assert_eq!(shortlist.len(), 2);
        assert_eq!(shortlist[0].id, 3);
        assert_eq!(shortlist[1].id, 2);
    }
}
