//! Course domain entity
//!
//! Courses are static reference data: an instrument or discipline in one of the two
//! music traditions taught at the school.

use serde::{Deserialize, Serialize};

/// Identifier of a course in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(pub i32);

impl std::fmt::Display for CourseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Music tradition a course belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseCategory {
    Western,
    Carnatic,
}

impl std::fmt::Display for CourseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CourseCategory::Western => write!(f, "Western"),
            CourseCategory::Carnatic => write!(f, "Carnatic"),
        }
    }
}

/// A course students can enroll in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub category: CourseCategory,
}

impl Course {
    pub fn new(id: i32, name: &str, category: CourseCategory) -> Self {
        Self {
            id: CourseId(id),
            name: name.to_string(),
            category,
        }
    }
}

/// The courses offered by the school
pub fn standard_courses() -> Vec<Course> {
    vec![
        Course::new(1, "Piano", CourseCategory::Western),
        Course::new(2, "Violin", CourseCategory::Carnatic),
        Course::new(3, "Vocal", CourseCategory::Carnatic),
        Course::new(4, "Guitar", CourseCategory::Western),
        Course::new(5, "Veena", CourseCategory::Carnatic),
        Course::new(6, "Keyboard (Western)", CourseCategory::Western),
        Course::new(7, "Keyboard (Carnatic)", CourseCategory::Carnatic),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_has_unique_ids() {
        let courses = standard_courses();
        let mut ids: Vec<i32> = courses.iter().map(|c| c.id.0).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), courses.len());
    }

    #[test]
    fn western_courses() {
        let western: Vec<i32> = standard_courses()
            .into_iter()
            .filter(|c| c.category == CourseCategory::Western)
            .map(|c| c.id.0)
            .collect();
        assert_eq!(western, vec![1, 4, 6]);
    }

    #[test]
    fn course_id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&CourseId(4)).unwrap(), "4");
    }
}
