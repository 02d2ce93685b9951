//! Domain records as they appear inside a report.
//!
//! Every record mirrors one row of the admin views, already joined with the
//! relations a report needs (instructor names, course titles, ...). Relations
//! that may be missing are `Option`s; renderers default them when printing.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub profile: Option<LearnerProfile>,
    pub enrollment_count: u64,
    pub instructor: Option<InstructorStats>,
    pub department: Option<String>,
}

/// Learning statistics of a student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerProfile {
    pub skill_level: Option<String>,
    /// Minutes.
    pub total_learning_time: u64,
}

/// Teaching statistics of an instructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorStats {
    pub rating: f64,
    pub total_students: u64,
    pub total_courses: u64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    pub id: String,
    pub title: String,
    pub instructor_name: Option<String>,
    pub category: Option<String>,
    pub level: String,
    pub status: String,
    pub price: f64,
    pub enrollment_count: u64,
    pub average_rating: Option<f64>,
    pub review_count: u64,
    pub total_revenue: f64,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: String,
    pub amount: f64,
    pub currency: String,
    pub status: String,
    pub method: Option<String>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub course_title: Option<String>,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRecord {
    pub id: String,
    pub student_name: Option<String>,
    pub student_email: Option<String>,
    pub course_title: Option<String>,
    /// Percentage, 0 to 100.
    pub progress: f64,
    pub status: String,
    pub enrolled_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Activity of a single calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub new_users: u64,
    pub new_enrollments: u64,
    pub completed_payments: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemLogRecord {
    pub id: String,
    pub level: String,
    pub action: String,
    pub actor_name: Option<String>,
    pub message: String,
    pub response_time_ms: Option<f64>,
    pub created_at: DateTime<Utc>,
}
