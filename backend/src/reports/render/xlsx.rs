use crate::errors::RenderError;
use crate::reports::flatten::flatten;
use crate::reports::render::{humanize, metadata_fields, table_title, FormatRenderer, RenderedArtifact};
use common::model::data::{ReportData, SummaryValue};
use common::model::report::{ReportFormat, ReportMetadata};
use common::model::row::FlatValue;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet};

const COLUMN_WIDTH: f64 = 20.0;
const HEADER_FILL: u32 = 0xD9E1F2;

/// Workbook with a "Summary" sheet and one sheet for the report's detail table.
pub struct XlsxRenderer;

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_border(FormatBorder::Thin)
}

fn write_summary_sheet(
    sheet: &mut Worksheet,
    data: &ReportData,
    metadata: &ReportMetadata,
) -> Result<(), RenderError> {
    let title = Format::new().set_bold().set_font_size(14);
    let header = header_format();

    sheet.set_name("Summary")?;
    sheet.set_column_width(0, COLUMN_WIDTH)?;
    sheet.set_column_width(1, COLUMN_WIDTH)?;
    sheet.write_string_with_format(0, 0, metadata.report_type.title(), &title)?;

    let mut row: u32 = 2;
    for (label, value) in metadata_fields(metadata) {
        sheet.write_string(row, 0, label)?;
        sheet.write_string(row, 1, value)?;
        row += 1;
    }

    row += 1;
    sheet.write_string_with_format(row, 0, "Metric", &header)?;
    sheet.write_string_with_format(row, 1, "Value", &header)?;
    for (key, value) in data.summary().iter() {
        row += 1;
        sheet.write_string(row, 0, humanize(key))?;
        match value {
            SummaryValue::Count(c) => sheet.write_number(row, 1, *c as f64)?,
            SummaryValue::Amount(a) => sheet.write_number(row, 1, *a)?,
            SummaryValue::Text(t) => sheet.write_string(row, 1, t)?,
        };
    }
    Ok(())
}

fn write_table_sheet(sheet: &mut Worksheet, name: &str, data: &ReportData) -> Result<(), RenderError> {
    let header = header_format();
    let rows = flatten(data);

    sheet.set_name(name)?;
    let Some(first) = rows.first() else {
        sheet.write_string(0, 0, "No records in the selected period")?;
        return Ok(());
    };

    for (col, column) in first.columns().enumerate() {
        let col = col as u16;
        sheet.set_column_width(col, COLUMN_WIDTH)?;
        sheet.write_string_with_format(0, col, column, &header)?;
    }

    for (idx, flat) in rows.iter().enumerate() {
        let row = idx as u32 + 1;
        for (col, value) in flat.values().enumerate() {
            let col = col as u16;
            match value {
                FlatValue::Text(t) => sheet.write_string(row, col, t)?,
                FlatValue::Number(n) => sheet.write_number(row, col, *n)?,
                FlatValue::Integer(i) => sheet.write_number(row, col, *i as f64)?,
                FlatValue::Bool(b) => sheet.write_boolean(row, col, *b)?,
                FlatValue::Date(d) => {
                    sheet.write_string(row, col, d.format("%Y-%m-%d %H:%M").to_string())?
                }
            };
        }
    }
    Ok(())
}

impl FormatRenderer for XlsxRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Xlsx
    }

    fn render(
        &self,
        data: &ReportData,
        metadata: &ReportMetadata,
    ) -> Result<RenderedArtifact, RenderError> {
        let mut workbook = Workbook::new();
        write_summary_sheet(workbook.add_worksheet(), data, metadata)?;
        if let Some(name) = table_title(data.report_type()) {
            write_table_sheet(workbook.add_worksheet(), name, data)?;
        }

        let body = workbook.save_to_buffer()?;
        Ok(RenderedArtifact::new(ReportFormat::Xlsx, metadata, body))
    }
}
