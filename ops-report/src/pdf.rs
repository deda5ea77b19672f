//! PDF renderer (A4 portrait, builtin Helvetica)

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point, Polygon,
};
use shared::util::{format_rupiah, format_thousands};

use crate::error::{ExportError, ExportResult};
use crate::sheet::{COLUMNS, ReportSheet};

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN_X: f32 = 15.0;
const CONTENT_W: f32 = PAGE_W - 2.0 * MARGIN_X;
const ROW_H: f32 = 7.0;
const BOTTOM_LIMIT: f32 = 25.0;

/// Left edge of each column, matching [`COLUMNS`]
const COLUMN_X: [f32; 6] = [MARGIN_X, 27.0, 62.0, 105.0, 130.0, 162.0];

struct Canvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl Canvas {
    fn new(title: &str) -> ExportResult<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_H - 20.0,
        })
    }

    fn text(&self, txt: &str, size: f32, x: f32, y: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(txt, size, Mm(x), Mm(y), font);
    }

    fn rule(&self, y: f32, thickness: f32) {
        self.layer.set_outline_thickness(thickness);
        let line = Line::from_iter(vec![
            (Point::new(Mm(MARGIN_X), Mm(y)), false),
            (Point::new(Mm(MARGIN_X + CONTENT_W), Mm(y)), false),
        ]);
        self.layer.add_line(line);
    }

    fn rect(&self, x: f32, y: f32, w: f32, h: f32) {
        self.layer.set_outline_thickness(0.5);
        let points = vec![
            (Point::new(Mm(x), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y + h)), false),
            (Point::new(Mm(x), Mm(y + h)), false),
        ];
        self.layer.add_polygon(Polygon {
            rings: vec![points],
            mode: PaintMode::Stroke,
            winding_order: WindingOrder::NonZero,
        });
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_H - 20.0;
    }

    fn table_header(&mut self) {
        for (label, x) in COLUMNS.iter().zip(COLUMN_X) {
            self.text(label, 9.0, x, self.y, true);
        }
        self.rule(self.y - 2.0, 0.8);
        self.y -= ROW_H;
    }

    fn row(&mut self, cells: [String; 6], bold: bool) {
        for (cell, x) in cells.iter().zip(COLUMN_X) {
            self.text(cell, 9.0, x, self.y, bold);
        }
        self.y -= ROW_H;
    }

    fn finish(self) -> ExportResult<Vec<u8>> {
        self.doc
            .save_to_bytes()
            .map_err(|e| ExportError::Pdf(e.to_string()))
    }
}

/// Render a shift report to PDF bytes
pub fn render_pdf(sheet: &ReportSheet) -> ExportResult<Vec<u8>> {
    sheet.validate()?;
    let totals = sheet.totals();
    let mut canvas = Canvas::new(&sheet.title)?;

    // Header
    canvas.text(&sheet.title, 16.0, MARGIN_X, canvas.y, true);
    canvas.y -= 8.0;
    canvas.text(&sheet.subtitle(), 10.0, MARGIN_X, canvas.y, false);
    canvas.y -= 6.0;
    canvas.rule(canvas.y, 1.5);
    canvas.y -= 22.0;

    // Summary boxes
    let boxes = [
        ("Total SPD", format_rupiah(totals.spd)),
        ("Total STD", format_thousands(totals.std)),
        ("Rata-rata APC", format_rupiah(totals.apc)),
        ("Total Pulsa", format_rupiah(totals.pulsa)),
    ];
    let gap = 4.0;
    let box_w = (CONTENT_W - gap * (boxes.len() as f32 - 1.0)) / boxes.len() as f32;
    for (i, (label, value)) in boxes.iter().enumerate() {
        let x = MARGIN_X + i as f32 * (box_w + gap);
        canvas.rect(x, canvas.y, box_w, 16.0);
        canvas.text(label, 8.0, x + 3.0, canvas.y + 11.0, false);
        canvas.text(value, 11.0, x + 3.0, canvas.y + 4.0, true);
    }
    canvas.y -= 12.0;

    // Body
    canvas.table_header();
    for (i, row) in sheet.rows().iter().enumerate() {
        if canvas.y < BOTTOM_LIMIT {
            canvas.new_page();
            canvas.table_header();
        }
        canvas.row(
            [
                (i + 1).to_string(),
                row.date.clone(),
                format_thousands(row.figures.spd),
                format_thousands(row.figures.std),
                format_thousands(row.apc()),
                format_thousands(row.figures.pulsa),
            ],
            false,
        );
    }

    // Totals footer
    if canvas.y < BOTTOM_LIMIT + ROW_H {
        canvas.new_page();
    }
    canvas.rule(canvas.y + ROW_H - 2.0, 1.2);
    canvas.row(
        [
            String::new(),
            "TOTAL".to_string(),
            format_thousands(totals.spd),
            format_thousands(totals.std),
            format_thousands(totals.apc),
            format_thousands(totals.pulsa),
        ],
        true,
    );

    if let Some(note) = &sheet.note {
        canvas.y -= 4.0;
        canvas.text(&format!("Catatan: {note}"), 9.0, MARGIN_X, canvas.y, false);
    }

    tracing::debug!(rows = sheet.rows().len(), "Rendered shift report PDF");
    canvas.finish()
}
