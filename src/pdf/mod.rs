//! Renders a committed bill into the single-page printable document
//! handed back to the customer.

use chrono::Local;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::models::{Error, ParkingBill};

const PAGE_WIDTH_MM: f64 = 210.0;
const PAGE_HEIGHT_MM: f64 = 297.0;

const TERMS: [&str; 5] = [
    "1. This bill is valid only for the specified month.",
    "2. Vehicle should not block other slots.",
    "3. Parking charges are non-refundable.",
    "4. Management is not responsible for any damage/theft.",
    "5. Renewal should be done before 5th of every month.",
];

/// Printable bill identifier, e.g. id 1 becomes "PB000001".
pub fn bill_reference(id: i64) -> String {
    format!("PB{:06}", id)
}

/// Download filename for the rendered document; spaces in the customer
/// name become underscores.
pub fn download_filename(bill: &ParkingBill) -> String {
    format!(
        "Parking_Bill_{}_{}_{}_{}.pdf",
        bill.customer_name.replace(' ', "_"),
        bill.month,
        bill.year,
        bill.id
    )
}

fn text_at(layer: &PdfLayerReference, text: &str, size: f64, x: f64, y: f64, font: &IndirectFontRef) {
    layer.use_text(text, size as _, Mm(x as _), Mm(y as _), font);
}

/// Render the bill as a single A4 page and return the PDF bytes.
pub fn render_bill(bill: &ParkingBill) -> Result<Vec<u8>, Error> {
    let (doc, page, layer) = PdfDocument::new(
        "MONTHLY PARKING BILL",
        Mm(PAGE_WIDTH_MM as _),
        Mm(PAGE_HEIGHT_MM as _),
        "bill",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| Error::Pdf(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| Error::Pdf(e.to_string()))?;
    let italic = doc
        .add_builtin_font(BuiltinFont::HelveticaOblique)
        .map_err(|e| Error::Pdf(e.to_string()))?;
    let layer = doc.get_page(page).get_layer(layer);
    let mut y = 280.0;

    // Facility header
    text_at(&layer, "VENGATESAN CAR PARKING", 16.0, 62.0, y, &bold);
    y -= 8.0;
    text_at(&layer, "Tittagudi | Contact: 9791365506", 10.0, 76.0, y, &regular);
    y -= 16.0;

    // Title and bill identifier
    text_at(&layer, "MONTHLY PARKING BILL", 18.0, 58.0, y, &bold);
    y -= 12.0;
    let reference = format!("BILL ID: {}", bill_reference(bill.id));
    text_at(&layer, &reference, 12.0, 78.0, y, &bold);
    y -= 14.0;

    // Details block
    text_at(&layer, "BILL DETAILS", 12.0, 20.0, y, &bold);
    y -= 10.0;
    let bill_date = bill
        .bill_date
        .with_timezone(&Local)
        .format("%d-%m-%Y %H:%M")
        .to_string();
    let period = format!("{} {}", bill.month, bill.year);
    let vehicle_type = bill.vehicle_type.to_uppercase();
    let details: [(&str, &str); 9] = [
        ("Bill Date", &bill_date),
        ("Customer Name", &bill.customer_name),
        ("Vehicle Number", &bill.vehicle_number),
        ("Vehicle Type", &vehicle_type),
        ("Parking Slot", &bill.slot_number),
        ("Parking Period", &period),
        ("Payment Mode", &bill.payment_mode),
        ("Generated By", &bill.generated_by),
        ("Status", "PAID"),
    ];
    for (label, value) in details {
        text_at(&layer, &format!("{label}:"), 11.0, 20.0, y, &regular);
        text_at(&layer, value, 11.0, 80.0, y, &regular);
        y -= 7.0;
    }
    y -= 8.0;

    // Amount block
    text_at(&layer, "AMOUNT DETAILS", 12.0, 20.0, y, &bold);
    y -= 9.0;
    text_at(&layer, "Monthly Parking Charges:", 11.0, 20.0, y, &regular);
    text_at(&layer, "Rs. 1000.00", 11.0, 120.0, y, &regular);
    y -= 10.0;
    text_at(&layer, "TOTAL AMOUNT:", 14.0, 20.0, y, &bold);
    text_at(&layer, "Rs. 1000.00", 14.0, 120.0, y, &bold);
    y -= 16.0;

    // Terms
    text_at(&layer, "TERMS & CONDITIONS:", 10.0, 20.0, y, &bold);
    y -= 6.0;
    for term in TERMS {
        text_at(&layer, term, 8.0, 20.0, y, &regular);
        y -= 5.0;
    }
    y -= 8.0;

    // Footer boilerplate
    let rule = "-".repeat(50);
    text_at(&layer, &rule, 8.0, 70.0, y, &bold);
    y -= 5.0;
    text_at(&layer, "CODE HIVE", 10.0, 93.0, y, &bold);
    y -= 5.0;
    text_at(&layer, "LEARN AND LEAD", 8.0, 92.0, y, &italic);
    y -= 5.0;
    text_at(&layer, &rule, 8.0, 70.0, y, &bold);
    y -= 6.0;
    text_at(&layer, "Development Partner", 8.0, 90.0, y, &bold);
    y -= 5.0;
    text_at(&layer, "Email: codehive143@gmail.com", 7.0, 89.0, y, &regular);
    y -= 4.0;
    text_at(&layer, "Phone: +91 63745 76277", 7.0, 91.0, y, &regular);
    y -= 4.0;
    text_at(&layer, "Web: www.codehive.dev", 7.0, 91.0, y, &regular);
    y -= 6.0;
    text_at(&layer, "Thank you for choosing Vengatesan Car Parking!", 7.0, 80.0, y, &italic);
    y -= 4.0;
    text_at(&layer, "This is a computer-generated bill.", 7.0, 86.0, y, &italic);

    doc.save_to_bytes().map_err(|e| Error::Pdf(e.to_string()))
}
