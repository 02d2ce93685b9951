//! # Aggregation
//!
//! Turns loaded domain records into `ReportData`: filters them to the requested
//! window, orders them newest first and computes the headline `Summary` of each
//! report type. Providers only load records; everything derived lives here so
//! that every provider reports identical figures.
//!
//! Ratios whose denominator is zero are reported as `0`.

use chrono::{DateTime, NaiveDate, Utc};
use common::model::data::{ReportData, Summary};
use common::model::records::{
    CourseRecord, DailyActivity, EnrollmentRecord, PaymentRecord, SystemLogRecord, UserRecord,
};
use common::model::report::{DateRange, ReportType};
use std::collections::BTreeMap;

const COMPLETED: &str = "COMPLETED";

/// All record sets of the platform, as loaded by a provider.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub users: Vec<UserRecord>,
    pub courses: Vec<CourseRecord>,
    pub enrollments: Vec<EnrollmentRecord>,
    pub payments: Vec<PaymentRecord>,
    pub logs: Vec<SystemLogRecord>,
}

fn is(status: &str, expected: &str) -> bool {
    status.eq_ignore_ascii_case(expected)
}

/// `num / den`, or 0 when `den` is 0.
pub fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Percentage change from `previous` to `current`; 0 when there is no baseline.
pub fn growth_rate(current: usize, previous: usize) -> f64 {
    round2(ratio(current as f64 - previous as f64, previous as f64) * 100.0)
}

/// The window of equal length immediately before `range`, when both ends are set.
pub fn previous_window(range: &DateRange) -> Option<DateRange> {
    let (start, end) = (range.start?, range.end?);
    let len = end - start;
    Some(DateRange::new(
        Some(start - len),
        Some(start - chrono::Duration::nanoseconds(1)),
    ))
}

fn within<T>(
    records: &[T],
    range: &DateRange,
    at: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<T>
where
    T: Clone,
{
    let mut kept: Vec<T> = records
        .iter()
        .filter(|r| range.contains(at(r)))
        .cloned()
        .collect();
    kept.sort_by_key(|r| std::cmp::Reverse(at(r)));
    kept
}

fn count_by<T>(records: &[T], pred: impl Fn(&T) -> bool) -> usize {
    records.iter().filter(|r| pred(r)).count()
}

pub fn users_summary(users: &[UserRecord]) -> Summary {
    Summary::new()
        .with("totalUsers", users.len())
        .with("activeUsers", count_by(users, |u| u.is_active))
        .with("verifiedUsers", count_by(users, |u| u.is_verified))
        .with("students", count_by(users, |u| is(&u.role, "STUDENT")))
        .with("instructors", count_by(users, |u| is(&u.role, "INSTRUCTOR")))
        .with("admins", count_by(users, |u| is(&u.role, "ADMIN")))
}

pub fn courses_summary(courses: &[CourseRecord]) -> Summary {
    let rated: Vec<f64> = courses.iter().filter_map(|c| c.average_rating).collect();
    let total_price: f64 = courses.iter().map(|c| c.price).sum();
    Summary::new()
        .with("totalCourses", courses.len())
        .with("publishedCourses", count_by(courses, |c| is(&c.status, "PUBLISHED")))
        .with("draftCourses", count_by(courses, |c| is(&c.status, "DRAFT")))
        .with(
            "totalEnrollments",
            courses.iter().map(|c| c.enrollment_count).sum::<u64>(),
        )
        .with("averagePrice", round2(ratio(total_price, courses.len() as f64)))
        .with(
            "averageRating",
            round2(ratio(rated.iter().sum(), rated.len() as f64)),
        )
}

fn completed_revenue(payments: &[PaymentRecord]) -> f64 {
    payments
        .iter()
        .filter(|p| is(&p.status, COMPLETED))
        .map(|p| p.amount)
        .sum()
}

pub fn payments_summary(payments: &[PaymentRecord]) -> Summary {
    let completed = count_by(payments, |p| is(&p.status, COMPLETED));
    let revenue = completed_revenue(payments);
    Summary::new()
        .with("totalPayments", payments.len())
        .with("completedPayments", completed)
        .with("pendingPayments", count_by(payments, |p| is(&p.status, "PENDING")))
        .with("failedPayments", count_by(payments, |p| is(&p.status, "FAILED")))
        .with("refundedPayments", count_by(payments, |p| is(&p.status, "REFUNDED")))
        .with("totalRevenue", round2(revenue))
        .with("averagePayment", round2(ratio(revenue, completed as f64)))
}

pub fn enrollments_summary(enrollments: &[EnrollmentRecord]) -> Summary {
    let completed = count_by(enrollments, |e| is(&e.status, COMPLETED));
    let total_progress: f64 = enrollments.iter().map(|e| e.progress).sum();
    Summary::new()
        .with("totalEnrollments", enrollments.len())
        .with("activeEnrollments", count_by(enrollments, |e| is(&e.status, "ACTIVE")))
        .with("completedEnrollments", completed)
        .with("droppedEnrollments", count_by(enrollments, |e| is(&e.status, "DROPPED")))
        .with(
            "averageProgress",
            round2(ratio(total_progress, enrollments.len() as f64)),
        )
        .with(
            "completionRate",
            round2(ratio(completed as f64, enrollments.len() as f64) * 100.0),
        )
}

/// Buckets new users, enrollments and completed payments per UTC day, oldest first.
/// Days without any activity are omitted.
pub fn daily_activity(
    users: &[UserRecord],
    enrollments: &[EnrollmentRecord],
    payments: &[PaymentRecord],
) -> Vec<DailyActivity> {
    let mut days: BTreeMap<NaiveDate, DailyActivity> = BTreeMap::new();

    for u in users {
        bucket(&mut days, u.created_at.date_naive()).new_users += 1;
    }
    for e in enrollments {
        bucket(&mut days, e.enrolled_at.date_naive()).new_enrollments += 1;
    }
    for p in payments.iter().filter(|p| is(&p.status, COMPLETED)) {
        let entry = bucket(&mut days, p.created_at.date_naive());
        entry.completed_payments += 1;
        entry.revenue = round2(entry.revenue + p.amount);
    }

    days.into_values().collect()
}

fn bucket(days: &mut BTreeMap<NaiveDate, DailyActivity>, date: NaiveDate) -> &mut DailyActivity {
    days.entry(date).or_insert_with(|| DailyActivity {
        date,
        new_users: 0,
        new_enrollments: 0,
        completed_payments: 0,
        revenue: 0.0,
    })
}

pub fn analytics_summary(daily: &[DailyActivity]) -> Summary {
    let revenue: f64 = daily.iter().map(|d| d.revenue).sum();
    Summary::new()
        .with("days", daily.len())
        .with("totalNewUsers", daily.iter().map(|d| d.new_users).sum::<u64>())
        .with(
            "totalNewEnrollments",
            daily.iter().map(|d| d.new_enrollments).sum::<u64>(),
        )
        .with("totalRevenue", round2(revenue))
        .with("averageDailyRevenue", round2(ratio(revenue, daily.len() as f64)))
}

pub fn system_summary(logs: &[SystemLogRecord]) -> Summary {
    let timed: Vec<f64> = logs.iter().filter_map(|l| l.response_time_ms).collect();
    Summary::new()
        .with("totalLogs", logs.len())
        .with("errors", count_by(logs, |l| is(&l.level, "ERROR")))
        .with("warnings", count_by(logs, |l| is(&l.level, "WARN")))
        .with("info", count_by(logs, |l| is(&l.level, "INFO")))
        .with(
            "averageResponseTime",
            round2(ratio(timed.iter().sum(), timed.len() as f64)),
        )
}

pub fn users_report(users: &[UserRecord], range: &DateRange) -> ReportData {
    let users = within(users, range, |u| u.created_at);
    ReportData::Users {
        summary: users_summary(&users),
        users,
    }
}

pub fn courses_report(courses: &[CourseRecord], range: &DateRange) -> ReportData {
    let courses = within(courses, range, |c| c.created_at);
    ReportData::Courses {
        summary: courses_summary(&courses),
        courses,
    }
}

pub fn payments_report(payments: &[PaymentRecord], range: &DateRange) -> ReportData {
    let payments = within(payments, range, |p| p.created_at);
    ReportData::Payments {
        summary: payments_summary(&payments),
        payments,
    }
}

pub fn enrollments_report(enrollments: &[EnrollmentRecord], range: &DateRange) -> ReportData {
    let enrollments = within(enrollments, range, |e| e.enrolled_at);
    ReportData::Enrollments {
        summary: enrollments_summary(&enrollments),
        enrollments,
    }
}

pub fn analytics_report(
    users: &[UserRecord],
    enrollments: &[EnrollmentRecord],
    payments: &[PaymentRecord],
    range: &DateRange,
) -> ReportData {
    let daily = daily_activity(
        &within(users, range, |u| u.created_at),
        &within(enrollments, range, |e| e.enrolled_at),
        &within(payments, range, |p| p.created_at),
    );
    ReportData::Analytics {
        summary: analytics_summary(&daily),
        daily,
    }
}

pub fn system_report(logs: &[SystemLogRecord], range: &DateRange) -> ReportData {
    let logs = within(logs, range, |l| l.created_at);
    ReportData::System {
        summary: system_summary(&logs),
        logs,
    }
}

/// Builds the report of `report_type` from whichever record sets it needs.
pub fn build(report_type: ReportType, data: &Dataset, range: &DateRange) -> ReportData {
    match report_type {
        ReportType::Users => users_report(&data.users, range),
        ReportType::Courses => courses_report(&data.courses, range),
        ReportType::Payments => payments_report(&data.payments, range),
        ReportType::Enrollments => enrollments_report(&data.enrollments, range),
        ReportType::Analytics => {
            analytics_report(&data.users, &data.enrollments, &data.payments, range)
        }
        ReportType::System => system_report(&data.logs, range),
        ReportType::Comprehensive => comprehensive_report(data, range),
    }
}

/// Cross-cutting platform figures for the window, plus user growth against the
/// preceding window of equal length.
pub fn comprehensive_report(data: &Dataset, range: &DateRange) -> ReportData {
    let users = within(&data.users, range, |u| u.created_at);
    let courses = within(&data.courses, range, |c| c.created_at);
    let enrollments = within(&data.enrollments, range, |e| e.enrolled_at);
    let payments = within(&data.payments, range, |p| p.created_at);
    let logs = within(&data.logs, range, |l| l.created_at);

    let completed = count_by(&enrollments, |e| is(&e.status, COMPLETED));
    let previous_users = previous_window(range)
        .map(|prev| count_by(&data.users, |u| prev.contains(u.created_at)))
        .unwrap_or(0);

    let summary = Summary::new()
        .with("totalUsers", users.len())
        .with("totalCourses", courses.len())
        .with("publishedCourses", count_by(&courses, |c| is(&c.status, "PUBLISHED")))
        .with("totalEnrollments", enrollments.len())
        .with("completedEnrollments", completed)
        .with("totalRevenue", round2(completed_revenue(&payments)))
        .with(
            "completionRate",
            round2(ratio(completed as f64, enrollments.len() as f64) * 100.0),
        )
        .with("pendingPayments", count_by(&payments, |p| is(&p.status, "PENDING")))
        .with("errorLogs", count_by(&logs, |l| is(&l.level, "ERROR")))
        .with("userGrowthRate", growth_rate(users.len(), previous_users));

    ReportData::Comprehensive { summary }
}
