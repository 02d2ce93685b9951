//! # Report Data
//!
//! `ReportData` is the aggregate produced fresh for every request: the ordered
//! records of one domain plus a `Summary` of headline figures. It is never
//! persisted and is dropped once the artifact has been rendered.
//!
//! On the wire each variant serializes as a plain object holding its record
//! array and `summary`, e.g. `{"payments": [...], "summary": {"totalRevenue": 150.0}}`.

use crate::model::records::{
    CourseRecord, DailyActivity, EnrollmentRecord, PaymentRecord, SystemLogRecord, UserRecord,
};
use crate::model::report::ReportType;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportData {
    Users {
        users: Vec<UserRecord>,
        summary: Summary,
    },
    Courses {
        courses: Vec<CourseRecord>,
        summary: Summary,
    },
    Payments {
        payments: Vec<PaymentRecord>,
        summary: Summary,
    },
    Enrollments {
        enrollments: Vec<EnrollmentRecord>,
        summary: Summary,
    },
    Analytics {
        daily: Vec<DailyActivity>,
        summary: Summary,
    },
    System {
        logs: Vec<SystemLogRecord>,
        summary: Summary,
    },
    Comprehensive {
        summary: Summary,
    },
}

impl ReportData {
    pub fn report_type(&self) -> ReportType {
        match self {
            ReportData::Users { .. } => ReportType::Users,
            ReportData::Courses { .. } => ReportType::Courses,
            ReportData::Payments { .. } => ReportType::Payments,
            ReportData::Enrollments { .. } => ReportType::Enrollments,
            ReportData::Analytics { .. } => ReportType::Analytics,
            ReportData::System { .. } => ReportType::System,
            ReportData::Comprehensive { .. } => ReportType::Comprehensive,
        }
    }

    pub fn summary(&self) -> &Summary {
        match self {
            ReportData::Users { summary, .. }
            | ReportData::Courses { summary, .. }
            | ReportData::Payments { summary, .. }
            | ReportData::Enrollments { summary, .. }
            | ReportData::Analytics { summary, .. }
            | ReportData::System { summary, .. }
            | ReportData::Comprehensive { summary } => summary,
        }
    }

    /// Number of detail records carried by the report (0 for summaries).
    pub fn record_count(&self) -> usize {
        match self {
            ReportData::Users { users, .. } => users.len(),
            ReportData::Courses { courses, .. } => courses.len(),
            ReportData::Payments { payments, .. } => payments.len(),
            ReportData::Enrollments { enrollments, .. } => enrollments.len(),
            ReportData::Analytics { daily, .. } => daily.len(),
            ReportData::System { logs, .. } => logs.len(),
            ReportData::Comprehensive { .. } => 0,
        }
    }
}

/// A single headline figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SummaryValue {
    Count(u64),
    Amount(f64),
    Text(String),
}

impl fmt::Display for SummaryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryValue::Count(c) => write!(f, "{}", c),
            SummaryValue::Amount(a) => write!(f, "{:.2}", a),
            SummaryValue::Text(t) => f.write_str(t),
        }
    }
}

impl From<u64> for SummaryValue {
    fn from(v: u64) -> Self {
        SummaryValue::Count(v)
    }
}

impl From<usize> for SummaryValue {
    fn from(v: usize) -> Self {
        SummaryValue::Count(v as u64)
    }
}

impl From<f64> for SummaryValue {
    fn from(v: f64) -> Self {
        SummaryValue::Amount(v)
    }
}

impl From<&str> for SummaryValue {
    fn from(v: &str) -> Self {
        SummaryValue::Text(v.to_string())
    }
}

/// Insertion-ordered key/value figures. Serialized as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary(Vec<(String, SummaryValue)>);

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, replacing an existing value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SummaryValue>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<SummaryValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&SummaryValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SummaryValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Summary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Summary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SummaryVisitor;

        impl<'de> Visitor<'de> for SummaryVisitor {
            type Value = Summary;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of summary figures")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Summary, A::Error> {
                let mut summary = Summary::new();
                while let Some((k, v)) = access.next_entry::<String, SummaryValue>()? {
                    summary.insert(k, v);
                }
                Ok(summary)
            }
        }

        deserializer.deserialize_map(SummaryVisitor)
    }
}
