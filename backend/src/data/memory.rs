//! In-memory provider and record fixtures for tests.

use crate::data::aggregate::{self, Dataset};
use crate::data::ReportDataProvider;
use crate::errors::DataError;
use async_trait::async_trait;
use common::model::data::ReportData;
use common::model::report::{DateRange, ReportType};
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct MemoryDataProvider {
    data: Dataset,
    offline: bool,
    calls: AtomicUsize,
}

impl MemoryDataProvider {
    pub fn new(data: Dataset) -> Self {
        Self {
            data,
            offline: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// A provider whose every fetch fails.
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::new(Dataset::default())
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReportDataProvider for MemoryDataProvider {
    async fn fetch(
        &self,
        report_type: ReportType,
        range: &DateRange,
    ) -> Result<ReportData, DataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline {
            return Err(DataError::Unavailable("database offline".to_string()));
        }
        Ok(aggregate::build(report_type, &self.data, range))
    }
}

pub mod fixtures {
    use chrono::{DateTime, TimeZone, Utc};
    use common::model::records::{
        CourseRecord, EnrollmentRecord, InstructorStats, LearnerProfile, PaymentRecord,
        SystemLogRecord, UserRecord,
    };

    /// 10:00 UTC on the given day of March 2024.
    pub fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, 10, 0, 0).unwrap()
    }

    pub fn user(id: &str, role: &str, d: u32) -> UserRecord {
        let instructor = role == "INSTRUCTOR";
        UserRecord {
            id: id.to_string(),
            name: format!("User {}", id),
            email: format!("{}@educademy.test", id),
            role: role.to_string(),
            is_active: true,
            is_verified: d % 2 == 0,
            created_at: day(d),
            last_login: None,
            profile: (role == "STUDENT").then(|| LearnerProfile {
                skill_level: Some("BEGINNER".to_string()),
                total_learning_time: 90,
            }),
            enrollment_count: 1,
            instructor: instructor.then(|| InstructorStats {
                rating: 4.5,
                total_students: 12,
                total_courses: 2,
                total_revenue: 480.0,
            }),
            department: None,
        }
    }

    pub fn course(id: &str, status: &str, d: u32) -> CourseRecord {
        CourseRecord {
            id: id.to_string(),
            title: format!("Course {}", id),
            instructor_name: Some("Ada Instructor".to_string()),
            category: None,
            level: "BEGINNER".to_string(),
            status: status.to_string(),
            price: 49.0,
            enrollment_count: 3,
            average_rating: None,
            review_count: 0,
            total_revenue: 0.0,
            created_at: day(d),
            published_at: None,
        }
    }

    pub fn payment(id: &str, amount: f64, status: &str, d: u32) -> PaymentRecord {
        PaymentRecord {
            id: id.to_string(),
            amount,
            currency: "USD".to_string(),
            status: status.to_string(),
            method: Some("card".to_string()),
            user_name: Some("Sam Student".to_string()),
            user_email: None,
            course_title: Some("Rust 101".to_string()),
            transaction_id: None,
            created_at: day(d),
        }
    }

    pub fn enrollment(id: &str, status: &str, d: u32) -> EnrollmentRecord {
        EnrollmentRecord {
            id: id.to_string(),
            student_name: Some("Sam Student".to_string()),
            student_email: None,
            course_title: None,
            progress: 40.0,
            status: status.to_string(),
            enrolled_at: day(d),
            completed_at: None,
        }
    }

    pub fn log(id: &str, level: &str, d: u32) -> SystemLogRecord {
        SystemLogRecord {
            id: id.to_string(),
            level: level.to_string(),
            action: "COURSE_APPROVED".to_string(),
            actor_name: None,
            message: format!("{} event", level),
            response_time_ms: Some(120.0),
            created_at: day(d),
        }
    }
}
