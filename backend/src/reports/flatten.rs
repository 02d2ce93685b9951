//! Projection of nested report records onto flat rows for tabular exports.
//!
//! Each report type has a fixed column list; missing values become `"N/A"` for
//! text and dates and `0` for numbers, so flattening never fails. Report types
//! without a projection yield a single explanatory row.

use common::model::data::ReportData;
use common::model::row::{FlatRow, FlatValue};

pub const NOT_AVAILABLE: &str = "N/A";
pub const UNSUPPORTED_MESSAGE: &str = "Data format not available for CSV export";

pub const USER_COLUMNS: [&str; 16] = [
    "id",
    "name",
    "email",
    "role",
    "isActive",
    "isVerified",
    "createdAt",
    "lastLogin",
    "skillLevel",
    "totalLearningTime",
    "enrollments",
    "instructorRating",
    "totalStudents",
    "totalCourses",
    "totalRevenue",
    "department",
];

fn text(v: &str) -> FlatValue {
    FlatValue::Text(v.to_string())
}

fn opt_text(v: Option<&str>) -> FlatValue {
    text(v.unwrap_or(NOT_AVAILABLE))
}

fn opt_date(v: Option<chrono::DateTime<chrono::Utc>>) -> FlatValue {
    v.map(FlatValue::Date).unwrap_or_else(|| text(NOT_AVAILABLE))
}

/// Builds one row from `(column, value)` pairs, keeping their order.
fn row<const N: usize>(cells: [(&str, FlatValue); N]) -> FlatRow {
    let mut row = FlatRow::new();
    for (column, value) in cells {
        row.push(column, value);
    }
    row
}

pub fn flatten(data: &ReportData) -> Vec<FlatRow> {
    match data {
        ReportData::Users { users, .. } => users
            .iter()
            .map(|u| {
                let instructor = u.instructor.as_ref();
                row([
                    (USER_COLUMNS[0], text(&u.id)),
                    (USER_COLUMNS[1], text(&u.name)),
                    (USER_COLUMNS[2], text(&u.email)),
                    (USER_COLUMNS[3], text(&u.role)),
                    (USER_COLUMNS[4], FlatValue::Bool(u.is_active)),
                    (USER_COLUMNS[5], FlatValue::Bool(u.is_verified)),
                    (USER_COLUMNS[6], FlatValue::Date(u.created_at)),
                    (USER_COLUMNS[7], opt_date(u.last_login)),
                    (
                        USER_COLUMNS[8],
                        opt_text(u.profile.as_ref().and_then(|p| p.skill_level.as_deref())),
                    ),
                    (
                        USER_COLUMNS[9],
                        FlatValue::Integer(
                            u.profile.as_ref().map_or(0, |p| p.total_learning_time),
                        ),
                    ),
                    (USER_COLUMNS[10], FlatValue::Integer(u.enrollment_count)),
                    (
                        USER_COLUMNS[11],
                        FlatValue::Number(instructor.map_or(0.0, |i| i.rating)),
                    ),
                    (
                        USER_COLUMNS[12],
                        FlatValue::Integer(instructor.map_or(0, |i| i.total_students)),
                    ),
                    (
                        USER_COLUMNS[13],
                        FlatValue::Integer(instructor.map_or(0, |i| i.total_courses)),
                    ),
                    (
                        USER_COLUMNS[14],
                        FlatValue::Number(instructor.map_or(0.0, |i| i.total_revenue)),
                    ),
                    (USER_COLUMNS[15], opt_text(u.department.as_deref())),
                ])
            })
            .collect(),

        ReportData::Courses { courses, .. } => courses
            .iter()
            .map(|c| {
                row([
                    ("id", text(&c.id)),
                    ("title", text(&c.title)),
                    ("instructor", opt_text(c.instructor_name.as_deref())),
                    ("category", opt_text(c.category.as_deref())),
                    ("level", text(&c.level)),
                    ("status", text(&c.status)),
                    ("price", FlatValue::Number(c.price)),
                    ("enrollments", FlatValue::Integer(c.enrollment_count)),
                    ("averageRating", FlatValue::Number(c.average_rating.unwrap_or(0.0))),
                    ("reviews", FlatValue::Integer(c.review_count)),
                    ("totalRevenue", FlatValue::Number(c.total_revenue)),
                    ("createdAt", FlatValue::Date(c.created_at)),
                    ("publishedAt", opt_date(c.published_at)),
                ])
            })
            .collect(),

        ReportData::Payments { payments, .. } => payments
            .iter()
            .map(|p| {
                row([
                    ("id", text(&p.id)),
                    ("amount", FlatValue::Number(p.amount)),
                    ("currency", text(&p.currency)),
                    ("status", text(&p.status)),
                    ("method", opt_text(p.method.as_deref())),
                    ("userName", opt_text(p.user_name.as_deref())),
                    ("userEmail", opt_text(p.user_email.as_deref())),
                    ("course", opt_text(p.course_title.as_deref())),
                    ("transactionId", opt_text(p.transaction_id.as_deref())),
                    ("createdAt", FlatValue::Date(p.created_at)),
                ])
            })
            .collect(),

        ReportData::Enrollments { enrollments, .. } => enrollments
            .iter()
            .map(|e| {
                row([
                    ("id", text(&e.id)),
                    ("studentName", opt_text(e.student_name.as_deref())),
                    ("studentEmail", opt_text(e.student_email.as_deref())),
                    ("course", opt_text(e.course_title.as_deref())),
                    ("progress", FlatValue::Number(e.progress)),
                    ("status", text(&e.status)),
                    ("enrolledAt", FlatValue::Date(e.enrolled_at)),
                    ("completedAt", opt_date(e.completed_at)),
                ])
            })
            .collect(),

        ReportData::Analytics { daily, .. } => daily
            .iter()
            .map(|d| {
                row([
                    ("date", FlatValue::Text(d.date.format("%Y-%m-%d").to_string())),
                    ("newUsers", FlatValue::Integer(d.new_users)),
                    ("newEnrollments", FlatValue::Integer(d.new_enrollments)),
                    ("completedPayments", FlatValue::Integer(d.completed_payments)),
                    ("revenue", FlatValue::Number(d.revenue)),
                ])
            })
            .collect(),

        ReportData::System { logs, .. } => logs
            .iter()
            .map(|l| {
                row([
                    ("id", text(&l.id)),
                    ("level", text(&l.level)),
                    ("action", text(&l.action)),
                    ("actor", opt_text(l.actor_name.as_deref())),
                    ("message", text(&l.message)),
                    ("responseTimeMs", FlatValue::Number(l.response_time_ms.unwrap_or(0.0))),
                    ("createdAt", FlatValue::Date(l.created_at)),
                ])
            })
            .collect(),

        ReportData::Comprehensive { .. } => vec![row([("message", text(UNSUPPORTED_MESSAGE))])],
    }
}
