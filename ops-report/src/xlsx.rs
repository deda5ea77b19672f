//! Spreadsheet renderer (single worksheet)

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};

use crate::error::ExportResult;
use crate::sheet::{COLUMNS, ReportSheet};

const TITLE_ROW: u32 = 0;
const SUBTITLE_ROW: u32 = 1;
const HEADER_ROW: u32 = 3;
const LAST_COL: u16 = COLUMNS.len() as u16 - 1;
const COLUMN_WIDTHS: [f64; 6] = [6.0, 14.0, 16.0, 10.0, 14.0, 14.0];

/// Row index of the totals row for a sheet with `body_rows` days
fn totals_row(body_rows: usize) -> u32 {
    HEADER_ROW + 1 + body_rows as u32
}

/// Render a shift report to XLSX bytes
pub fn render_xlsx(sheet: &ReportSheet) -> ExportResult<Vec<u8>> {
    sheet.validate()?;
    let totals = sheet.totals();

    let title_format = Format::new().set_bold().set_font_size(14);
    let header_format = Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
        .set_background_color(Color::RGB(0xD9E1F2));
    let text_format = Format::new().set_border(FormatBorder::Thin);
    let number_format = Format::new()
        .set_border(FormatBorder::Thin)
        .set_num_format("#,##0");
    let total_label_format = Format::new().set_bold().set_border(FormatBorder::Thin);
    let total_number_format = Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_num_format("#,##0");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(format!("Shift {}", sheet.shift))?;

    // Title rows
    worksheet.merge_range(TITLE_ROW, 0, TITLE_ROW, LAST_COL, &sheet.title, &title_format)?;
    worksheet.merge_range(
        SUBTITLE_ROW,
        0,
        SUBTITLE_ROW,
        LAST_COL,
        &sheet.subtitle(),
        &Format::new(),
    )?;

    // Header row
    for (col, label) in COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(HEADER_ROW, col as u16, *label, &header_format)?;
    }
    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }

    // One row per day
    for (i, row) in sheet.rows().iter().enumerate() {
        let r = HEADER_ROW + 1 + i as u32;
        worksheet.write_number_with_format(r, 0, (i + 1) as f64, &text_format)?;
        worksheet.write_string_with_format(r, 1, &row.date, &text_format)?;
        worksheet.write_number_with_format(r, 2, row.figures.spd as f64, &number_format)?;
        worksheet.write_number_with_format(r, 3, row.figures.std as f64, &number_format)?;
        worksheet.write_number_with_format(r, 4, row.apc() as f64, &number_format)?;
        worksheet.write_number_with_format(r, 5, row.figures.pulsa as f64, &number_format)?;
    }

    // Totals row
    let t = totals_row(sheet.rows().len());
    worksheet.merge_range(t, 0, t, 1, "TOTAL", &total_label_format)?;
    worksheet.write_number_with_format(t, 2, totals.spd as f64, &total_number_format)?;
    worksheet.write_number_with_format(t, 3, totals.std as f64, &total_number_format)?;
    worksheet.write_number_with_format(t, 4, totals.apc as f64, &total_number_format)?;
    worksheet.write_number_with_format(t, 5, totals.pulsa as f64, &total_number_format)?;

    if let Some(note) = &sheet.note {
        worksheet.write_string(t + 2, 0, format!("Catatan: {note}"))?;
    }

    let bytes = workbook.save_to_buffer()?;
    tracing::debug!(rows = sheet.rows().len(), "Rendered shift report workbook");
    Ok(bytes)
}
