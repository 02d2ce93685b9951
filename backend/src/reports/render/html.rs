use crate::errors::RenderError;
use crate::reports::flatten::flatten;
use crate::reports::render::{humanize, metadata_fields, table_title, FormatRenderer, RenderedArtifact};
use common::model::data::ReportData;
use common::model::report::{ReportFormat, ReportMetadata, ReportType};
use common::model::row::FlatValue;
use std::fmt::Write;

const STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; margin: 32px; color: #1f2937; }
header { border-bottom: 3px solid #4f46e5; margin-bottom: 24px; }
header h1 { margin: 0 0 8px 0; color: #4f46e5; }
.meta { display: grid; grid-template-columns: max-content auto; gap: 4px 16px; margin-bottom: 24px; }
.meta dt { font-weight: bold; }
.cards { display: flex; flex-wrap: wrap; gap: 12px; margin-bottom: 24px; }
.card { background: #f3f4f6; border-radius: 8px; padding: 12px 16px; min-width: 140px; }
.card .label { font-size: 12px; color: #6b7280; }
.card .value { font-size: 20px; font-weight: bold; }
table { border-collapse: collapse; width: 100%; font-size: 13px; }
th, td { border: 1px solid #e5e7eb; padding: 6px 8px; text-align: left; }
th { background: #eef2ff; }
.notice { color: #92400e; font-style: italic; }
"#;

/// Rows shown in the detail table of a report type.
pub fn table_cap(report_type: ReportType) -> usize {
    match report_type {
        ReportType::Users => 100,
        ReportType::Courses => 50,
        ReportType::Payments => 100,
        ReportType::Enrollments => 100,
        ReportType::Analytics => 30,
        ReportType::System => 100,
        ReportType::Comprehensive => 0,
    }
}

pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn cell(value: &FlatValue) -> String {
    match value {
        FlatValue::Bool(b) => if *b { "Yes" } else { "No" }.to_string(),
        FlatValue::Number(n) => format!("{:.2}", n),
        FlatValue::Date(d) => d.format("%Y-%m-%d %H:%M").to_string(),
        other => escape(&other.to_string()),
    }
}

fn write_table(out: &mut String, title: &str, data: &ReportData) -> std::fmt::Result {
    let rows = flatten(data);
    let cap = table_cap(data.report_type());

    writeln!(out, "<section><h2>{} ({})</h2>", escape(title), rows.len())?;
    let Some(first) = rows.first() else {
        writeln!(out, "<p>No records in the selected period.</p></section>")?;
        return Ok(());
    };
    if rows.len() > cap {
        writeln!(
            out,
            "<p class=\"notice\">Showing first {} of {} records</p>",
            cap,
            rows.len()
        )?;
    }

    out.push_str("<table><thead><tr>");
    for column in first.columns() {
        write!(out, "<th>{}</th>", escape(&humanize(column)))?;
    }
    out.push_str("</tr></thead><tbody>\n");
    for row in rows.iter().take(cap) {
        out.push_str("<tr>");
        for value in row.values() {
            write!(out, "<td>{}</td>", cell(value))?;
        }
        out.push_str("</tr>\n");
    }
    writeln!(out, "</tbody></table></section>")
}

pub fn to_html(data: &ReportData, metadata: &ReportMetadata) -> Result<String, std::fmt::Error> {
    let title = escape(metadata.report_type.title());
    let mut out = String::new();

    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\"><head><meta charset=\"utf-8\">")?;
    writeln!(out, "<title>{}</title><style>{}</style></head><body>", title, STYLE)?;
    writeln!(
        out,
        "<header><h1>{}</h1><p>Educademy administration</p></header>",
        title
    )?;

    out.push_str("<dl class=\"meta\">\n");
    for (label, value) in metadata_fields(metadata) {
        writeln!(out, "<dt>{}</dt><dd>{}</dd>", label, escape(&value))?;
    }
    out.push_str("</dl>\n<div class=\"cards\">\n");
    for (key, value) in data.summary().iter() {
        writeln!(
            out,
            "<div class=\"card\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>",
            escape(&humanize(key)),
            escape(&value.to_string())
        )?;
    }
    out.push_str("</div>\n");

    if let Some(table) = table_title(data.report_type()) {
        write_table(&mut out, table, data)?;
    }

    writeln!(out, "</body></html>")?;
    Ok(out)
}

/// Standalone styled page: metadata, summary cards and the capped detail table.
pub struct HtmlRenderer;

impl FormatRenderer for HtmlRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Html
    }

    fn render(
        &self,
        data: &ReportData,
        metadata: &ReportMetadata,
    ) -> Result<RenderedArtifact, RenderError> {
        let page = to_html(data, metadata).map_err(|e| {
            RenderError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
        })?;
        Ok(RenderedArtifact::new(
            ReportFormat::Html,
            metadata,
            page.into_bytes(),
        ))
    }
}
