//! # PDF Report Renderer
//!
//! Produces a paginated document: a title page with the report metadata and
//! summary statistics, followed by one line per detail record.
//!
//! ## Workflow
//!
//! 1.  **Layout**: `layout` turns the report into a flat list of `Block`s. This is
//!     where the per-type detail cap is applied; when records are left out a final
//!     `…and N more` note is appended. Layout needs no fonts, which keeps it testable.
//!
//! 2.  **Fonts**: the TTF family configured for the server is loaded from disk. If it
//!     cannot be found, `LiberationSans` from the same directory is tried.
//!
//! 3.  **Rendering**: `render_blocks` maps every block to a genpdf element and renders
//!     the document into an in-memory buffer.

use crate::errors::RenderError;
use crate::reports::render::{humanize, metadata_fields, table_title, FormatRenderer, RenderedArtifact};
use common::model::data::ReportData;
use common::model::report::{ReportFormat, ReportMetadata, ReportType};
use genpdf::elements::{Break, PageBreak, Paragraph};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::{Style, StyledString};
use genpdf::Document;
use std::path::PathBuf;

const FALLBACK_FONT: &str = "LiberationSans";
const NOT_AVAILABLE: &str = "N/A";

/// Maximum number of detail lines printed for a report type.
pub fn detail_cap(report_type: ReportType) -> usize {
    match report_type {
        ReportType::Users => 50,
        ReportType::Courses => 30,
        ReportType::Payments => 40,
        ReportType::Enrollments => 40,
        ReportType::Analytics => 30,
        ReportType::System => 50,
        ReportType::Comprehensive => 0,
    }
}

/// Layout unit of the document.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(String),
    Heading(String),
    Field(String, String),
    Line(String),
    Note(String),
    Break,
    PageBreak,
}

fn or_na(v: Option<&str>) -> &str {
    v.unwrap_or(NOT_AVAILABLE)
}

fn date(d: chrono::DateTime<chrono::Utc>) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// One descriptive line per detail record, in report order.
fn detail_lines(data: &ReportData) -> Vec<String> {
    match data {
        ReportData::Users { users, .. } => users
            .iter()
            .map(|u| {
                format!(
                    "{} ({}) - {} - {} - joined {}",
                    u.name,
                    u.email,
                    u.role,
                    if u.is_active { "active" } else { "inactive" },
                    date(u.created_at)
                )
            })
            .collect(),
        ReportData::Courses { courses, .. } => courses
            .iter()
            .map(|c| {
                format!(
                    "{} by {} - {} - {:.2} - {} enrollments",
                    c.title,
                    or_na(c.instructor_name.as_deref()),
                    c.status,
                    c.price,
                    c.enrollment_count
                )
            })
            .collect(),
        ReportData::Payments { payments, .. } => payments
            .iter()
            .map(|p| {
                format!(
                    "{} - {:.2} {} - {} - {} - {} - {}",
                    p.id,
                    p.amount,
                    p.currency,
                    p.status,
                    or_na(p.user_name.as_deref()),
                    or_na(p.course_title.as_deref()),
                    date(p.created_at)
                )
            })
            .collect(),
        ReportData::Enrollments { enrollments, .. } => enrollments
            .iter()
            .map(|e| {
                format!(
                    "{} - {} - {:.0}% - {} - enrolled {}",
                    or_na(e.student_name.as_deref()),
                    or_na(e.course_title.as_deref()),
                    e.progress,
                    e.status,
                    date(e.enrolled_at)
                )
            })
            .collect(),
        ReportData::Analytics { daily, .. } => daily
            .iter()
            .map(|d| {
                format!(
                    "{}: {} new users, {} enrollments, {} payments, {:.2} revenue",
                    d.date, d.new_users, d.new_enrollments, d.completed_payments, d.revenue
                )
            })
            .collect(),
        ReportData::System { logs, .. } => logs
            .iter()
            .map(|l| {
                format!(
                    "[{}] {} {} by {}: {}",
                    l.level,
                    l.created_at.format("%Y-%m-%d %H:%M"),
                    l.action,
                    or_na(l.actor_name.as_deref()),
                    l.message
                )
            })
            .collect(),
        ReportData::Comprehensive { .. } => Vec::new(),
    }
}

pub fn layout(data: &ReportData, metadata: &ReportMetadata) -> Vec<Block> {
    let report_type = data.report_type();
    let mut blocks = vec![
        Block::Title(report_type.title().to_string()),
        Block::Line("Educademy administration".to_string()),
        Block::Break,
        Block::Heading("Report Information".to_string()),
    ];
    blocks.extend(
        metadata_fields(metadata)
            .into_iter()
            .map(|(k, v)| Block::Field(k.to_string(), v)),
    );

    blocks.push(Block::Break);
    blocks.push(Block::Heading("Summary Statistics".to_string()));
    if data.summary().is_empty() {
        blocks.push(Block::Note("No summary figures available".to_string()));
    }
    blocks.extend(
        data.summary()
            .iter()
            .map(|(k, v)| Block::Field(humanize(k), v.to_string())),
    );

    let Some(title) = table_title(report_type) else {
        return blocks;
    };
    let lines = detail_lines(data);
    let cap = detail_cap(report_type);

    blocks.push(Block::PageBreak);
    blocks.push(Block::Heading(format!("{} ({})", title, lines.len())));
    if lines.is_empty() {
        blocks.push(Block::Note("No records in the selected period".to_string()));
    }
    let total = lines.len();
    blocks.extend(
        lines
            .into_iter()
            .take(cap)
            .enumerate()
            .map(|(i, line)| Block::Line(format!("{}. {}", i + 1, line))),
    );
    if total > cap {
        blocks.push(Block::Note(format!("…and {} more", total - cap)));
    }
    blocks
}

pub struct PdfRenderer {
    font_dir: PathBuf,
    font_family: String,
}

impl PdfRenderer {
    pub fn new(font_dir: impl Into<PathBuf>, font_family: impl Into<String>) -> Self {
        Self {
            font_dir: font_dir.into(),
            font_family: font_family.into(),
        }
    }

    fn load_font(&self) -> Result<FontFamily<FontData>, RenderError> {
        match genpdf::fonts::from_files(&self.font_dir, &self.font_family, None) {
            Ok(family) => Ok(family),
            Err(_) if self.font_family != FALLBACK_FONT => {
                Ok(genpdf::fonts::from_files(&self.font_dir, FALLBACK_FONT, None)?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn render_blocks(
    blocks: Vec<Block>,
    fonts: FontFamily<FontData>,
    title: &str,
) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::new(fonts);
    doc.set_title(title);
    doc.set_font_size(10);
    doc.set_line_spacing(1.25);

    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    for block in blocks {
        match block {
            Block::Title(text) => doc.push(Paragraph::new(StyledString::new(
                text,
                Style::new().bold().with_font_size(18),
            ))),
            Block::Heading(text) => doc.push(Paragraph::new(StyledString::new(
                text,
                Style::new().bold().with_font_size(13),
            ))),
            Block::Field(label, value) => {
                let mut p = Paragraph::new("");
                p.push(StyledString::new(format!("{}: ", label), Style::new().bold()));
                p.push(value);
                doc.push(p);
            }
            Block::Line(text) => doc.push(Paragraph::new(text)),
            Block::Note(text) => {
                doc.push(Paragraph::new(StyledString::new(text, Style::new().italic())))
            }
            Block::Break => doc.push(Break::new(1)),
            Block::PageBreak => doc.push(PageBreak::new()),
        }
    }

    let mut body = Vec::new();
    doc.render(&mut body)?;
    Ok(body)
}

impl FormatRenderer for PdfRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Pdf
    }

    fn render(
        &self,
        data: &ReportData,
        metadata: &ReportMetadata,
    ) -> Result<RenderedArtifact, RenderError> {
        let fonts = self.load_font()?;
        let body = render_blocks(layout(data, metadata), fonts, data.report_type().title())?;
        Ok(RenderedArtifact::new(ReportFormat::Pdf, metadata, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::fixtures;
    use crate::reports::render::tests::{metadata, pdf_renderer, FONT_DIR, FONT_FAMILY};
    use common::model::data::Summary;

    fn users_report(n: usize) -> ReportData {
        ReportData::Users {
            users: (0..n)
                .map(|i| fixtures::user(&format!("u{}", i), "STUDENT", 1 + (i % 28) as u32))
                .collect(),
            summary: Summary::new().with("totalUsers", n),
        }
    }

    fn notes(blocks: &[Block]) -> Vec<&str> {
        blocks
            .iter()
            .filter_map(|b| match b {
                Block::Note(n) => Some(n.as_str()),
                _ => None,
            })
            .collect()
    }

    fn line_count(blocks: &[Block]) -> usize {
        blocks.iter().filter(|b| matches!(b, Block::Line(l) if l.contains(". User "))).count()
    }

    #[test]
    fn fifty_users_fit_without_footer() {
        let meta = metadata(ReportType::Users, ReportFormat::Pdf);
        let blocks = layout(&users_report(50), &meta);

        assert_eq!(line_count(&blocks), 50);
        assert!(notes(&blocks).iter().all(|n| !n.contains("more")));
    }

    #[test]
    fn fifty_one_users_add_footer() {
        let meta = metadata(ReportType::Users, ReportFormat::Pdf);
        let blocks = layout(&users_report(51), &meta);

        assert_eq!(line_count(&blocks), 50);
        assert_eq!(blocks.last(), Some(&Block::Note("…and 1 more".to_string())));
    }

    #[test]
    fn courses_are_capped_at_thirty() {
        let data = ReportData::Courses {
            courses: (0..45)
                .map(|i| fixtures::course(&format!("c{}", i), "PUBLISHED", 1))
                .collect(),
            summary: Summary::new(),
        };
        let meta = metadata(ReportType::Courses, ReportFormat::Pdf);

        let blocks = layout(&data, &meta);
        assert_eq!(blocks.last(), Some(&Block::Note("…and 15 more".to_string())));
    }

    #[test]
    fn title_page_lists_metadata_and_summary() {
        let meta = metadata(ReportType::Users, ReportFormat::Pdf);
        let blocks = layout(&users_report(1), &meta);

        assert_eq!(blocks[0], Block::Title("Users Report".to_string()));
        assert!(blocks.contains(&Block::Field("Generated By".to_string(), "admin-1".to_string())));
        assert!(blocks.contains(&Block::Field("Total Users".to_string(), "1".to_string())));
        assert!(blocks.contains(&Block::PageBreak));
    }

    #[test]
    fn comprehensive_has_no_detail_page() {
        let data = ReportData::Comprehensive {
            summary: Summary::new().with("totalUsers", 3usize),
        };
        let meta = metadata(ReportType::Comprehensive, ReportFormat::Pdf);
        assert!(!layout(&data, &meta).contains(&Block::PageBreak));
    }

    #[test]
    fn renders_a_pdf_document() {
        let meta = metadata(ReportType::Users, ReportFormat::Pdf);

        let artifact = pdf_renderer().render(&users_report(51), &meta).unwrap();

        assert_eq!(artifact.filename, "users_report_2024-04-01.pdf");
        assert_eq!(artifact.mime_type, "application/pdf");
        assert!(artifact.body.starts_with(b"%PDF-"));
    }

    #[test]
    fn long_unbroken_lines_still_render() {
        let mut log = fixtures::log("l1", "ERROR", 1);
        log.message = "x".repeat(400);
        let data = ReportData::System {
            logs: vec![log],
            summary: Summary::new().with("totalLogs", 1usize),
        };
        let meta = metadata(ReportType::System, ReportFormat::Pdf);

        let artifact = pdf_renderer().render(&data, &meta).unwrap();
        assert!(artifact.body.starts_with(b"%PDF-"));
    }

    #[test]
    fn unknown_family_falls_back_to_liberation_sans() {
        let dir = tempfile::tempdir().unwrap();
        for style in ["Regular", "Bold", "Italic", "BoldItalic"] {
            std::fs::copy(
                format!("{}/{}-{}.ttf", FONT_DIR, FONT_FAMILY, style),
                dir.path().join(format!("{}-{}.ttf", FALLBACK_FONT, style)),
            )
            .unwrap();
        }
        let renderer = PdfRenderer::new(dir.path(), "Missing");
        let data = ReportData::Comprehensive {
            summary: Summary::new().with("totalUsers", 3usize),
        };
        let meta = metadata(ReportType::Comprehensive, ReportFormat::Pdf);

        let artifact = renderer.render(&data, &meta).unwrap();
        assert!(artifact.body.starts_with(b"%PDF-"));
    }

    #[test]
    fn missing_fonts_fail_cleanly() {
        let renderer = PdfRenderer::new("/nonexistent/fonts", "Arial");
        let meta = metadata(ReportType::Users, ReportFormat::Pdf);

        let err = renderer.render(&users_report(1), &meta).unwrap_err();
        assert!(matches!(err, RenderError::Pdf(_)));
    }
}
