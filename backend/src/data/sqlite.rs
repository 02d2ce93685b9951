//! # SQLite Report Provider
//!
//! Reads the Educademy tables with rusqlite. Every sub-query opens its own
//! connection on tokio's blocking pool, so the record sets a report needs are
//! loaded concurrently and joined with `tokio::try_join!` before aggregation.
//! The first failing sub-query aborts the whole fetch.
//!
//! The date window is pushed into each query through `julianday()`, which reads
//! both the `YYYY-MM-DD HH:MM:SS+00:00` text rusqlite writes and RFC 3339 text.
//! `aggregate` applies the exact window again on the parsed timestamps.

use crate::data::aggregate::{self, Dataset};
use crate::data::ReportDataProvider;
use crate::errors::DataError;
use async_trait::async_trait;
use common::model::data::ReportData;
use common::model::records::{
    CourseRecord, EnrollmentRecord, InstructorStats, LearnerProfile, PaymentRecord,
    SystemLogRecord, UserRecord,
};
use common::model::report::{DateRange, ReportType};
use log::debug;
use rusqlite::{params, Connection, OpenFlags, Row};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

pub struct SqliteDataProvider {
    path: Arc<PathBuf>,
}

impl SqliteDataProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
        }
    }

    /// Runs `query` against a fresh read-only connection on the blocking pool.
    async fn run<T, F>(&self, query: F) -> Result<T, DataError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let path = Arc::clone(&self.path);
        tokio::task::spawn_blocking(move || -> Result<T, DataError> {
            if !path.exists() {
                return Err(DataError::Unavailable(format!(
                    "database {} not found",
                    path.display()
                )));
            }
            let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
            let conn = Connection::open_with_flags(path.as_path(), flags)?;
            Ok(query(&conn)?)
        })
        .await?
    }

    async fn load(&self, report_type: ReportType, range: DateRange) -> Result<Dataset, DataError> {
        let mut data = Dataset::default();
        match report_type {
            ReportType::Users => data.users = self.run(move |c| load_users(c, &range)).await?,
            ReportType::Courses => {
                data.courses = self.run(move |c| load_courses(c, &range)).await?
            }
            ReportType::Payments => {
                data.payments = self.run(move |c| load_payments(c, &range)).await?
            }
            ReportType::Enrollments => {
                data.enrollments = self.run(move |c| load_enrollments(c, &range)).await?
            }
            ReportType::System => data.logs = self.run(move |c| load_logs(c, &range)).await?,
            ReportType::Analytics => {
                let (users, enrollments, payments) = tokio::try_join!(
                    self.run(move |c| load_users(c, &range)),
                    self.run(move |c| load_enrollments(c, &range)),
                    self.run(move |c| load_payments(c, &range)),
                )?;
                data.users = users;
                data.enrollments = enrollments;
                data.payments = payments;
            }
            ReportType::Comprehensive => {
                // User growth also needs the window before `range`.
                let users_range = aggregate::previous_window(&range)
                    .map(|prev| DateRange::new(prev.start, range.end))
                    .unwrap_or(range);
                let (users, courses, enrollments, payments, logs) = tokio::try_join!(
                    self.run(move |c| load_users(c, &users_range)),
                    self.run(move |c| load_courses(c, &range)),
                    self.run(move |c| load_enrollments(c, &range)),
                    self.run(move |c| load_payments(c, &range)),
                    self.run(move |c| load_logs(c, &range)),
                )?;
                data = Dataset {
                    users,
                    courses,
                    enrollments,
                    payments,
                    logs,
                };
            }
        }
        Ok(data)
    }
}

#[async_trait]
impl ReportDataProvider for SqliteDataProvider {
    async fn fetch(
        &self,
        report_type: ReportType,
        range: &DateRange,
    ) -> Result<ReportData, DataError> {
        let start = Instant::now();
        let data = self.load(report_type, *range).await?;
        debug!(
            "loaded {} data in {:.2?}",
            report_type,
            start.elapsed()
        );
        Ok(aggregate::build(report_type, &data, range))
    }
}

fn count(row: &Row, idx: usize) -> rusqlite::Result<u64> {
    Ok(row.get::<_, i64>(idx)?.max(0) as u64)
}

/// `WHERE` clause keeping rows whose `column` lies in `?1..=?2`; a NULL bound is open.
fn in_window(column: &str) -> String {
    format!(
        "WHERE (?1 IS NULL OR julianday({c}) >= julianday(?1))
           AND (?2 IS NULL OR julianday({c}) <= julianday(?2))",
        c = column
    )
}

fn load_users(conn: &Connection, range: &DateRange) -> rusqlite::Result<Vec<UserRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT u.id, u.name, u.email, u.role, u.is_active, u.is_verified, u.created_at,
                u.last_login, u.skill_level, u.total_learning_time, u.department,
                u.instructor_rating,
                (SELECT COUNT(*) FROM enrollments e WHERE e.user_id = u.id),
                (SELECT COUNT(*) FROM courses c WHERE c.instructor_id = u.id),
                (SELECT COUNT(DISTINCT e.user_id) FROM enrollments e
                    JOIN courses c ON c.id = e.course_id WHERE c.instructor_id = u.id),
                (SELECT COALESCE(SUM(p.amount), 0) FROM payments p
                    JOIN courses c ON c.id = p.course_id
                    WHERE c.instructor_id = u.id AND p.status = 'COMPLETED')
         FROM users u
         {}",
        in_window("u.created_at")
    ))?;
    let rows = stmt.query_map(params![range.start, range.end], |row| {
        let role: String = row.get(3)?;
        let profile = if role.eq_ignore_ascii_case("STUDENT") {
            Some(LearnerProfile {
                skill_level: row.get(8)?,
                total_learning_time: count(row, 9)?,
            })
        } else {
            None
        };
        let instructor = if role.eq_ignore_ascii_case("INSTRUCTOR") {
            Some(InstructorStats {
                rating: row.get::<_, Option<f64>>(11)?.unwrap_or(0.0),
                total_courses: count(row, 13)?,
                total_students: count(row, 14)?,
                total_revenue: row.get(15)?,
            })
        } else {
            None
        };
        Ok(UserRecord {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            is_active: row.get(4)?,
            is_verified: row.get(5)?,
            created_at: row.get(6)?,
            last_login: row.get(7)?,
            profile,
            enrollment_count: count(row, 12)?,
            instructor,
            department: row.get(10)?,
            role,
        })
    })?;
    rows.collect()
}

fn load_courses(conn: &Connection, range: &DateRange) -> rusqlite::Result<Vec<CourseRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT c.id, c.title, u.name, c.category, c.level, c.status, c.price,
                c.created_at, c.published_at,
                (SELECT COUNT(*) FROM enrollments e WHERE e.course_id = c.id),
                (SELECT AVG(r.rating) FROM reviews r WHERE r.course_id = c.id),
                (SELECT COUNT(*) FROM reviews r WHERE r.course_id = c.id),
                (SELECT COALESCE(SUM(p.amount), 0) FROM payments p
                    WHERE p.course_id = c.id AND p.status = 'COMPLETED')
         FROM courses c
         LEFT JOIN users u ON u.id = c.instructor_id
         {}",
        in_window("c.created_at")
    ))?;
    let rows = stmt.query_map(params![range.start, range.end], |row| {
        Ok(CourseRecord {
            id: row.get(0)?,
            title: row.get(1)?,
            instructor_name: row.get(2)?,
            category: row.get(3)?,
            level: row.get(4)?,
            status: row.get(5)?,
            price: row.get(6)?,
            created_at: row.get(7)?,
            published_at: row.get(8)?,
            enrollment_count: count(row, 9)?,
            average_rating: row.get(10)?,
            review_count: count(row, 11)?,
            total_revenue: row.get(12)?,
        })
    })?;
    rows.collect()
}

fn load_payments(conn: &Connection, range: &DateRange) -> rusqlite::Result<Vec<PaymentRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT p.id, p.amount, p.currency, p.status, p.method, u.name, u.email, c.title,
                p.transaction_id, p.created_at
         FROM payments p
         LEFT JOIN users u ON u.id = p.user_id
         LEFT JOIN courses c ON c.id = p.course_id
         {}",
        in_window("p.created_at")
    ))?;
    let rows = stmt.query_map(params![range.start, range.end], |row| {
        Ok(PaymentRecord {
            id: row.get(0)?,
            amount: row.get(1)?,
            currency: row.get(2)?,
            status: row.get(3)?,
            method: row.get(4)?,
            user_name: row.get(5)?,
            user_email: row.get(6)?,
            course_title: row.get(7)?,
            transaction_id: row.get(8)?,
            created_at: row.get(9)?,
        })
    })?;
    rows.collect()
}

fn load_enrollments(
    conn: &Connection,
    range: &DateRange,
) -> rusqlite::Result<Vec<EnrollmentRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT e.id, u.name, u.email, c.title, e.progress, e.status, e.enrolled_at,
                e.completed_at
         FROM enrollments e
         LEFT JOIN users u ON u.id = e.user_id
         LEFT JOIN courses c ON c.id = e.course_id
         {}",
        in_window("e.enrolled_at")
    ))?;
    let rows = stmt.query_map(params![range.start, range.end], |row| {
        Ok(EnrollmentRecord {
            id: row.get(0)?,
            student_name: row.get(1)?,
            student_email: row.get(2)?,
            course_title: row.get(3)?,
            progress: row.get(4)?,
            status: row.get(5)?,
            enrolled_at: row.get(6)?,
            completed_at: row.get(7)?,
        })
    })?;
    rows.collect()
}

fn load_logs(conn: &Connection, range: &DateRange) -> rusqlite::Result<Vec<SystemLogRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT l.id, l.level, l.action, u.name, l.message, l.response_time_ms, l.created_at
         FROM system_logs l
         LEFT JOIN users u ON u.id = l.actor_id
         {}",
        in_window("l.created_at")
    ))?;
    let rows = stmt.query_map(params![range.start, range.end], |row| {
        Ok(SystemLogRecord {
            id: row.get(0)?,
            level: row.get(1)?,
            action: row.get(2)?,
            actor_name: row.get(3)?,
            message: row.get(4)?,
            response_time_ms: row.get(5)?,
            created_at: row.get(6)?,
        })
    })?;
    rows.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::fixtures::day;
    use crate::data::schema;
    use common::model::data::SummaryValue;
    use tempfile::NamedTempFile;

    fn seeded_db() -> NamedTempFile {
        let db = NamedTempFile::new().unwrap();
        let conn = Connection::open(db.path()).unwrap();
        schema::init(&conn).unwrap();

        let users = [
            ("u1", "Sam Student", "STUDENT", 1),
            ("u2", "Ada Instructor", "INSTRUCTOR", 2),
            ("u3", "Root Admin", "ADMIN", 3),
        ];
        for (id, name, role, d) in users {
            conn.execute(
                "INSERT INTO users (id, name, email, role, is_active, is_verified, created_at,
                                    instructor_rating, skill_level)
                 VALUES (?1, ?2, ?3, ?4, 1, 1, ?5, 4.8, 'INTERMEDIATE')",
                params![id, name, format!("{}@educademy.test", id), role, day(d)],
            )
            .unwrap();
        }
        conn.execute(
            "INSERT INTO courses (id, title, instructor_id, status, price, created_at)
             VALUES ('c1', 'Rust 101', 'u2', 'PUBLISHED', 50.0, ?1)",
            params![day(2)],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO enrollments (id, user_id, course_id, progress, status, enrolled_at)
             VALUES ('e1', 'u1', 'c1', 100.0, 'COMPLETED', ?1)",
            params![day(4)],
        )
        .unwrap();
        for (id, amount, status) in [("p1", 50.0, "COMPLETED"), ("p2", 50.0, "PENDING")] {
            conn.execute(
                "INSERT INTO payments (id, user_id, course_id, amount, status, created_at)
                 VALUES (?1, 'u1', 'c1', ?2, ?3, ?4)",
                params![id, amount, status, day(4)],
            )
            .unwrap();
        }
        conn.execute(
            "INSERT INTO reviews (id, course_id, user_id, rating, created_at)
             VALUES ('r1', 'c1', 'u1', 4.0, ?1)",
            params![day(5)],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO system_logs (id, level, action, actor_id, message, response_time_ms,
                                      created_at)
             VALUES ('l1', 'ERROR', 'PAYMENT_FAILED', 'u3', 'gateway timeout', 300.0, ?1)",
            params![day(5)],
        )
        .unwrap();
        db
    }

    #[actix_web::test]
    async fn users_carry_joined_statistics() {
        let db = seeded_db();
        let provider = SqliteDataProvider::new(db.path());

        let data = provider
            .fetch(ReportType::Users, &DateRange::default())
            .await
            .unwrap();
        let ReportData::Users { users, summary } = data else {
            panic!("expected users report");
        };

        assert_eq!(users.len(), 3);
        assert_eq!(users[0].id, "u3");
        let instructor = users.iter().find(|u| u.id == "u2").unwrap();
        let stats = instructor.instructor.as_ref().unwrap();
        assert_eq!(stats.total_courses, 1);
        assert_eq!(stats.total_students, 1);
        assert_eq!(stats.total_revenue, 50.0);
        let student = users.iter().find(|u| u.id == "u1").unwrap();
        assert_eq!(student.enrollment_count, 1);
        assert!(student.profile.is_some());
        assert_eq!(summary.get("instructors"), Some(&SummaryValue::Count(1)));
    }

    #[actix_web::test]
    async fn courses_join_instructor_and_reviews() {
        let db = seeded_db();
        let provider = SqliteDataProvider::new(db.path());

        let ReportData::Courses { courses, .. } = provider
            .fetch(ReportType::Courses, &DateRange::default())
            .await
            .unwrap()
        else {
            panic!("expected courses report");
        };

        assert_eq!(courses[0].instructor_name.as_deref(), Some("Ada Instructor"));
        assert_eq!(courses[0].average_rating, Some(4.0));
        assert_eq!(courses[0].total_revenue, 50.0);
    }

    #[actix_web::test]
    async fn comprehensive_joins_all_tables() {
        let db = seeded_db();
        let provider = SqliteDataProvider::new(db.path());

        let data = provider
            .fetch(ReportType::Comprehensive, &DateRange::default())
            .await
            .unwrap();
        let summary = data.summary();

        assert_eq!(summary.get("totalUsers"), Some(&SummaryValue::Count(3)));
        assert_eq!(summary.get("totalRevenue"), Some(&SummaryValue::Amount(50.0)));
        assert_eq!(summary.get("pendingPayments"), Some(&SummaryValue::Count(1)));
        assert_eq!(summary.get("errorLogs"), Some(&SummaryValue::Count(1)));
        assert_eq!(summary.get("completionRate"), Some(&SummaryValue::Amount(100.0)));
    }

    #[actix_web::test]
    async fn missing_tables_surface_as_errors() {
        let db = NamedTempFile::new().unwrap();
        let provider = SqliteDataProvider::new(db.path());

        let err = provider
            .fetch(ReportType::Payments, &DateRange::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Sqlite(_)));
    }

    #[actix_web::test]
    async fn missing_database_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");
        let provider = SqliteDataProvider::new(&path);

        let err = provider
            .fetch(ReportType::Users, &DateRange::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Unavailable(ref m) if m.contains("absent.db")));
        assert!(!path.exists());
    }

    #[test]
    fn roles_match_regardless_of_case() {
        let db = seeded_db();
        let conn = Connection::open(db.path()).unwrap();
        for (id, role) in [("u4", "student"), ("u5", "Instructor")] {
            conn.execute(
                "INSERT INTO users (id, name, email, role, is_active, is_verified, created_at)
                 VALUES (?1, ?1, ?1, ?2, 1, 1, ?3)",
                params![id, role, day(6)],
            )
            .unwrap();
        }

        let users = load_users(&conn, &DateRange::default()).unwrap();
        let learner = users.iter().find(|u| u.id == "u4").unwrap();
        assert!(learner.profile.is_some());
        assert!(learner.instructor.is_none());
        let teacher = users.iter().find(|u| u.id == "u5").unwrap();
        assert!(teacher.instructor.is_some());
        assert!(teacher.profile.is_none());
    }

    #[test]
    fn queries_only_return_rows_inside_the_window() {
        let db = seeded_db();
        let conn = Connection::open(db.path()).unwrap();
        let range = DateRange::new(Some(day(2)), Some(day(3)));

        let users = load_users(&conn, &range).unwrap();
        let ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["u2", "u3"]);

        assert!(load_payments(&conn, &range).unwrap().is_empty());
        assert!(load_enrollments(&conn, &range).unwrap().is_empty());
        assert_eq!(load_courses(&conn, &range).unwrap().len(), 1);

        let open_start = DateRange::new(None, Some(day(1)));
        assert_eq!(load_users(&conn, &open_start).unwrap().len(), 1);
        assert_eq!(load_logs(&conn, &DateRange::new(Some(day(5)), None)).unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn ranged_comprehensive_still_sees_previous_users() {
        let db = seeded_db();
        let provider = SqliteDataProvider::new(db.path());
        let range = DateRange::new(Some(day(3)), Some(day(5)));

        let data = provider
            .fetch(ReportType::Comprehensive, &range)
            .await
            .unwrap();
        let summary = data.summary();

        assert_eq!(summary.get("totalUsers"), Some(&SummaryValue::Count(1)));
        assert_eq!(summary.get("userGrowthRate"), Some(&SummaryValue::Amount(-50.0)));
    }
}
