use chrono::NaiveDate;
use scholaris_models::{Gender, NoticeCategory, Priority};

/// Email domain shared by every seeded person, used to find them again on
/// `clear-seed`.
pub const SEED_EMAIL_DOMAIN: &str = "seed.scholaris.dev";

/// Title prefix of seeded notices.
pub const SEED_NOTICE_PREFIX: &str = "Sample: ";

pub const CLASSES: [&str; 13] = [
    "Nursery", "LKG", "UKG", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10",
];

pub const SECTIONS: [&str; 4] = ["A", "B", "C", "D"];

pub const SUBJECTS: [&str; 10] = [
    "Mathematics",
    "English",
    "Hindi",
    "Science",
    "Social Studies",
    "Computer Science",
    "Physics",
    "Chemistry",
    "Biology",
    "Physical Education",
];

pub struct StudentSeed {
    pub admission_number: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub class_name: String,
    pub section: String,
    pub roll_number: String,
    pub father_name: String,
    pub mother_name: String,
    pub guardian_phone: String,
    pub email: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub academic_year: String,
}

pub struct TeacherSeed {
    pub employee_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub qualification: String,
    pub experience_years: i32,
    pub joining_date: NaiveDate,
}

pub struct NoticeSeed {
    pub title: String,
    pub content: String,
    pub category: NoticeCategory,
    pub priority: Priority,
}

#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub students: usize,
    pub teachers: usize,
    pub notices: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            students: 50,
            teachers: 10,
            notices: 5,
        }
    }
}

impl SeedConfig {
    pub fn with_students(mut self, students: usize) -> Self {
        self.students = students;
        self
    }

    pub fn with_teachers(mut self, teachers: usize) -> Self {
        self.teachers = teachers;
        self
    }

    pub fn with_notices(mut self, notices: usize) -> Self {
        self.notices = notices;
        self
    }
}
