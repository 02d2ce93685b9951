use crate::errors::ReportError;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use common::model::report::{DateRange, ReportFormat, ReportType};
use common::requests::GenerateReportRequest;

/// Validated form of a `GenerateReportRequest`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub report_type: ReportType,
    pub format: ReportFormat,
    pub date_range: DateRange,
    pub filename: Option<String>,
}

impl ReportRequest {
    #[cfg(test)]
    pub fn new(report_type: ReportType, format: ReportFormat) -> Self {
        Self {
            report_type,
            format,
            date_range: DateRange::default(),
            filename: None,
        }
    }

    /// Checks report type, then format, then dates.
    ///
    /// Type and format are matched exactly as sent; only an absent `format`
    /// defaults to JSON. Blank dates and filenames count as absent.
    pub fn parse(payload: &GenerateReportRequest) -> Result<Self, ReportError> {
        let report_type = match payload.report_type.as_deref() {
            Some(raw) => raw
                .parse::<ReportType>()
                .map_err(|e| ReportError::InvalidReportType(e.0))?,
            None => return Err(ReportError::InvalidReportType("(missing)".to_string())),
        };

        let format = match payload.format.as_deref() {
            Some(raw) => raw
                .parse::<ReportFormat>()
                .map_err(|e| ReportError::InvalidFormat(e.0))?,
            None => ReportFormat::Json,
        };

        let start = non_blank(&payload.start_date)
            .map(|raw| parse_date(raw, false))
            .transpose()?;
        let end = non_blank(&payload.end_date)
            .map(|raw| parse_date(raw, true))
            .transpose()?;
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(ReportError::InvalidDateRange(format!(
                    "start {} is after end {}",
                    s.to_rfc3339(),
                    e.to_rfc3339()
                )));
            }
        }

        Ok(Self {
            report_type,
            format,
            date_range: DateRange::new(start, end),
            filename: non_blank(&payload.filename).map(str::to_string),
        })
    }
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// RFC 3339 timestamp or bare `YYYY-MM-DD`. A bare end date covers its whole day.
fn parse_date(raw: &str, end_of_day: bool) -> Result<DateTime<Utc>, ReportError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ReportError::InvalidDateRange(format!("unparsable date '{}'", raw)))?;
    let time = if end_of_day {
        NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
    } else {
        Some(NaiveTime::MIN)
    };
    let time = time.ok_or_else(|| ReportError::InvalidDateRange(raw.to_string()))?;
    Ok(day.and_time(time).and_utc())
}

/// Caller supplied name reduced to its last path component and `[A-Za-z0-9._-]`,
/// with its extension replaced by `extension`. Returns `None` when nothing usable
/// is left.
pub fn custom_filename(requested: &str, extension: &str) -> Option<String> {
    let base = requested.trim().rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let stem = match cleaned.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            stem
        }
        _ => cleaned.as_str(),
    };
    let stem = stem.trim_matches('.');
    if stem.is_empty() || stem.chars().all(|c| c == '_') {
        return None;
    }
    Some(format!("{}.{}", stem, extension))
}
