use crate::errors::RenderError;
use crate::reports::render::{FormatRenderer, RenderedArtifact};
use common::model::data::ReportData;
use common::model::report::{ReportFormat, ReportMetadata};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::Value;

/// Items written per record array.
pub const MAX_ITEMS: usize = 100;

const ROOT: &str = "report";
const SUMMARY: &str = "summary";

/// `<report>` document with `<metadata>`, `<summary>` and one `<item>` list per
/// record array of the report.
pub struct XmlRenderer;

type XmlWriter = Writer<Vec<u8>>;

fn xml_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Xml(e.to_string())
}

fn open(w: &mut XmlWriter, start: BytesStart) -> Result<(), RenderError> {
    w.write_event(Event::Start(start)).map_err(xml_err)
}

fn close(w: &mut XmlWriter, name: &str) -> Result<(), RenderError> {
    w.write_event(Event::End(BytesEnd::new(name))).map_err(xml_err)
}

fn leaf(w: &mut XmlWriter, name: &str, text: &str) -> Result<(), RenderError> {
    open(w, BytesStart::new(name))?;
    w.write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_err)?;
    close(w, name)
}

/// Scalars are written as their plain text; objects and arrays as JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        _ => value.to_string(),
    }
}

fn write_metadata(w: &mut XmlWriter, metadata: &ReportMetadata) -> Result<(), RenderError> {
    open(w, BytesStart::new("metadata"))?;
    leaf(w, "generatedAt", &metadata.generated_at.to_rfc3339())?;
    leaf(w, "generatedBy", &metadata.generated_by)?;
    leaf(w, "reportType", metadata.report_type.as_str())?;
    leaf(w, "dateRange", &metadata.date_range.describe())?;
    leaf(w, "format", metadata.format.as_str())?;
    leaf(w, "requestId", &metadata.request_id)?;
    close(w, "metadata")
}

fn write_summary(w: &mut XmlWriter, data: &ReportData) -> Result<(), RenderError> {
    open(w, BytesStart::new(SUMMARY))?;
    for (key, value) in data.summary().iter() {
        leaf(w, key, &value.to_string())?;
    }
    close(w, SUMMARY)
}

fn write_items(w: &mut XmlWriter, field: &str, items: &[Value]) -> Result<(), RenderError> {
    let total = items.len().to_string();
    let mut start = BytesStart::new(field);
    start.push_attribute(("total", total.as_str()));
    open(w, start)?;

    for item in items.iter().take(MAX_ITEMS) {
        open(w, BytesStart::new("item"))?;
        match item {
            Value::Object(fields) => {
                for (key, value) in fields {
                    leaf(w, key, &value_text(value))?;
                }
            }
            other => {
                w.write_event(Event::Text(BytesText::new(&value_text(other))))
                    .map_err(xml_err)?;
            }
        }
        close(w, "item")?;
    }
    close(w, field)
}

pub fn to_xml(data: &ReportData, metadata: &ReportMetadata) -> Result<Vec<u8>, RenderError> {
    let mut w = Writer::new_with_indent(Vec::new(), b' ', 2);
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;
    open(&mut w, BytesStart::new(ROOT))?;

    write_metadata(&mut w, metadata)?;
    write_summary(&mut w, data)?;

    if let Value::Object(fields) = serde_json::to_value(data)? {
        for (field, value) in &fields {
            if let Value::Array(items) = value {
                write_items(&mut w, field, items)?;
            }
        }
    }

    close(&mut w, ROOT)?;
    Ok(w.into_inner())
}

impl FormatRenderer for XmlRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Xml
    }

    fn render(
        &self,
        data: &ReportData,
        metadata: &ReportMetadata,
    ) -> Result<RenderedArtifact, RenderError> {
        Ok(RenderedArtifact::new(
            ReportFormat::Xml,
            metadata,
            to_xml(data, metadata)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::fixtures;
    use crate::reports::render::tests::metadata;
    use common::model::data::Summary;
    use common::model::report::ReportType;

    fn render(data: &ReportData, report_type: ReportType) -> String {
        let meta = metadata(report_type, ReportFormat::Xml);
        let artifact = XmlRenderer.render(data, &meta).unwrap();
        String::from_utf8(artifact.body).unwrap()
    }

    #[test]
    fn writes_metadata_summary_and_items() {
        let data = ReportData::Payments {
            payments: vec![fixtures::payment("p1", 50.0, "COMPLETED", 2)],
            summary: Summary::new().with("totalRevenue", 50.0),
        };

        let xml = render(&data, ReportType::Payments);

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<generatedBy>admin-1</generatedBy>"));
        assert!(xml.contains("<totalRevenue>50.00</totalRevenue>"));
        assert!(xml.contains("<payments total=\"1\">"));
        assert!(xml.contains("<userName>Sam Student</userName>"));
        assert!(xml.trim_end().ends_with("</report>"));
    }

    #[test]
    fn item_fields_keep_record_order() {
        let data = ReportData::Payments {
            payments: vec![fixtures::payment("p1", 50.0, "COMPLETED", 2)],
            summary: Summary::new(),
        };

        let xml = render(&data, ReportType::Payments);
        let at = |tag: &str| xml.find(tag).unwrap();

        assert!(at("<id>") < at("<amount>"));
        assert!(at("<amount>") < at("<currency>"));
        assert!(at("<currency>") < at("<status>"));
        assert!(at("<courseTitle>") < at("<createdAt>"));
    }

    #[test]
    fn caps_each_array_at_one_hundred_items() {
        let data = ReportData::System {
            logs: (0..130)
                .map(|i| fixtures::log(&format!("l{}", i), "INFO", 1))
                .collect(),
            summary: Summary::new(),
        };

        let xml = render(&data, ReportType::System);

        assert!(xml.contains("<logs total=\"130\">"));
        assert_eq!(xml.matches("<item>").count(), MAX_ITEMS);
    }

    #[test]
    fn nested_values_are_embedded_as_json() {
        let data = ReportData::Users {
            users: vec![fixtures::user("u1", "INSTRUCTOR", 1)],
            summary: Summary::new(),
        };

        let xml = render(&data, ReportType::Users);
        assert!(xml.contains("<instructor>{"));
        assert!(xml.contains("totalStudents"));
    }

    #[test]
    fn text_is_escaped() {
        let mut log = fixtures::log("l1", "ERROR", 1);
        log.message = "a < b & c".to_string();
        let data = ReportData::System {
            logs: vec![log],
            summary: Summary::new(),
        };

        let xml = render(&data, ReportType::System);
        assert!(xml.contains("<message>a &lt; b &amp; c</message>"));
    }
}
