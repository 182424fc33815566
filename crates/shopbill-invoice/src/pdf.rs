//! # PDF Rendering
//!
//! Draws an [`InvoiceDocument`] onto a single A4 page. Layout is fixed:
//! shop header, bill metadata, a ruled items table, and a totals block.
//!
//! Amounts use the `Rs.` prefix because the builtin Helvetica font
//! cannot encode the rupee sign.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use thiserror::Error;

use crate::document::{format_inr, InvoiceDocument};

const SHOP_NAME: &str = "ShopBill Retail";
const SHOP_ADDRESS: &str = "12 Market Street, Bengaluru 560001";
const SHOP_PHONE: &str = "Phone: +91 80 4000 1234";
const SHOP_GSTIN: &str = "GSTIN: 29ABCDE1234F1Z5";

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;

// Item table column x positions.
const X_MARGIN: f32 = 15.0;
const X_RULE_END: f32 = 195.0;
const X_ITEM: f32 = 22.0;
const X_QTY: f32 = 115.0;
const X_UNIT: f32 = 138.0;
const X_TOTAL: f32 = 170.0;

/// Errors that can occur while producing the PDF.
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF generation failed: {0}")]
    Generation(String),

    /// The fixed single-page layout ran out of vertical space.
    #[error("too many invoice lines for a single page: {count}")]
    TooManyLines { count: usize },
}

/// Renders an invoice to PDF bytes.
pub fn render_pdf(invoice: &InvoiceDocument) -> Result<Vec<u8>, PdfError> {
    let (doc, page1, layer1) = PdfDocument::new(
        format!("Invoice {}", invoice.bill_number),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let layer = doc.get_page(page1).get_layer(layer1);

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| PdfError::Generation(e.to_string()))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| PdfError::Generation(e.to_string()))?;

    let mut y: f32 = 285.0;

    // Shop header (left), title (right).
    draw_text(&layer, &font_bold, SHOP_NAME, 16.0, X_MARGIN, y);
    y -= 7.0;
    draw_text(&layer, &font, SHOP_ADDRESS, 10.0, X_MARGIN, y);
    y -= 5.0;
    draw_text(&layer, &font, SHOP_PHONE, 10.0, X_MARGIN, y);
    y -= 5.0;
    draw_text(&layer, &font, SHOP_GSTIN, 10.0, X_MARGIN, y);

    draw_text(&layer, &font_bold, "TAX INVOICE", 22.0, 135.0, 285.0);
    draw_text(&layer, &font_bold, &invoice.bill_number, 11.0, 135.0, 277.0);

    y = 263.0;
    draw_rule(&layer, y);

    // Billed-to block (left), bill metadata (right).
    y -= 10.0;
    draw_text(&layer, &font_bold, "Billed To:", 12.0, X_MARGIN, y);
    draw_text(&layer, &font_bold, "Details:", 12.0, 120.0, y);

    y -= 7.0;
    draw_text(&layer, &font, &invoice.billed_to.name, 10.0, X_MARGIN, y);
    draw_text(
        &layer,
        &font,
        &format!("Date: {}", invoice.date),
        10.0,
        120.0,
        y,
    );

    y -= 5.0;
    if let Some(phone) = &invoice.billed_to.phone {
        draw_text(&layer, &font, &format!("Phone: {}", phone), 10.0, X_MARGIN, y);
    }
    draw_text(
        &layer,
        &font,
        &format!("Time: {}", invoice.time),
        10.0,
        120.0,
        y,
    );

    y -= 5.0;
    if let Some(address) = &invoice.billed_to.address {
        draw_text(&layer, &font, address, 10.0, X_MARGIN, y);
    }
    draw_text(
        &layer,
        &font,
        &format!("Payment: {}", invoice.payment_method),
        10.0,
        120.0,
        y,
    );

    y -= 12.0;

    // Items table.
    draw_text(&layer, &font_bold, "#", 10.0, X_MARGIN, y);
    draw_text(&layer, &font_bold, "Item", 10.0, X_ITEM, y);
    draw_text(&layer, &font_bold, "Qty", 10.0, X_QTY, y);
    draw_text(&layer, &font_bold, "Unit Price", 10.0, X_UNIT, y);
    draw_text(&layer, &font_bold, "Amount", 10.0, X_TOTAL, y);

    y -= 3.5;
    draw_rule(&layer, y);
    y -= 7.0;

    for line in &invoice.lines {
        if y < 55.0 {
            return Err(PdfError::TooManyLines {
                count: invoice.lines.len(),
            });
        }

        draw_text(&layer, &font, &line.number.to_string(), 10.0, X_MARGIN, y);
        draw_text(&layer, &font, &line.product, 10.0, X_ITEM, y);
        draw_text(&layer, &font, &line.quantity.to_string(), 10.0, X_QTY, y);
        draw_text(&layer, &font, &format_inr(line.unit_price), 10.0, X_UNIT, y);
        draw_text(&layer, &font, &format_inr(line.line_total), 10.0, X_TOTAL, y);

        y -= 6.0;
    }

    y -= 4.0;
    draw_rule(&layer, y);

    // Totals block.
    y -= 10.0;
    draw_text(&layer, &font, "Subtotal:", 11.0, 138.0, y);
    draw_text(&layer, &font, &format_inr(invoice.subtotal), 11.0, X_TOTAL, y);

    y -= 7.0;
    draw_text(&layer, &font, "GST (18%):", 11.0, 138.0, y);
    draw_text(&layer, &font, &format_inr(invoice.gst), 11.0, X_TOTAL, y);

    y -= 8.0;
    draw_text(&layer, &font_bold, "TOTAL:", 13.0, 138.0, y);
    draw_text(&layer, &font_bold, &format_inr(invoice.total), 13.0, X_TOTAL, y);

    draw_text(
        &layer,
        &font,
        "Thank you for shopping with us!",
        9.0,
        X_MARGIN,
        12.0,
    );

    let mut writer = std::io::BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)
        .map_err(|e| PdfError::Generation(e.to_string()))?;
    writer
        .into_inner()
        .map_err(|e| PdfError::Generation(e.to_string()))
}

fn draw_text(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    font_size: f32,
    x: f32,
    y: f32,
) {
    layer.use_text(text, font_size, Mm(x), Mm(y), font);
}

fn draw_rule(layer: &PdfLayerReference, y: f32) {
    layer.add_line(printpdf::Line {
        points: vec![
            (printpdf::Point::new(Mm(X_MARGIN), Mm(y)), false),
            (printpdf::Point::new(Mm(X_RULE_END), Mm(y)), false),
        ],
        is_closed: false,
    });
}

// =============================================================================
// Unit Tests
// =============================================================================
