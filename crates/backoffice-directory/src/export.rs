//! Spreadsheet rendering of order listings.
//!
//! A pure function from a row sequence to xlsx bytes, independent of
//! the query path: one styled header row, one data row per order,
//! and columns sized to their widest cell.

use backoffice_core::error::{BackofficeError, BackofficeResult};
use backoffice_core::models::order::{OrderStatus, OrderWithManager};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};

/// Canonical export column order.
pub const EXPORT_COLUMNS: [&str; 15] = [
    "id",
    "name",
    "surname",
    "email",
    "phone",
    "age",
    "course",
    "course_format",
    "course_type",
    "sum",
    "already_paid",
    "created_at",
    "status",
    "group",
    "manager",
];

const HEADER_BACKGROUND: u32 = 0x696969;
const ROW_HEIGHT: f64 = 25.0;
const COLUMN_PADDING: usize = 10;

/// Render the given orders as an xlsx workbook with a single
/// `Orders` worksheet.
pub fn orders_to_xlsx(orders: &[OrderWithManager]) -> BackofficeResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Orders")
        .map_err(|e| BackofficeError::Internal(e.to_string()))?;

    let header_format = Format::new()
        .set_bold()
        .set_font_size(14)
        .set_font_name("Arial")
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_BACKGROUND))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin);

    let cell_format = Format::new()
        .set_font_size(14)
        .set_font_name("Arial")
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin);

    // Per-column maximum content length, seeded by the headers.
    let mut widths: Vec<usize> = EXPORT_COLUMNS.iter().map(|h| h.len()).collect();

    for (col, header) in EXPORT_COLUMNS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| BackofficeError::Internal(e.to_string()))?;
    }
    worksheet
        .set_row_height(0, ROW_HEIGHT)
        .map_err(|e| BackofficeError::Internal(e.to_string()))?;

    for (i, entry) in orders.iter().enumerate() {
        let row = (i + 1) as u32;
        let cells = row_cells(entry);

        for (col, value) in cells.iter().enumerate() {
            if value.len() > widths[col] {
                widths[col] = value.len();
            }
            worksheet
                .write_string_with_format(row, col as u16, value, &cell_format)
                .map_err(|e| BackofficeError::Internal(e.to_string()))?;
        }
        worksheet
            .set_row_height(row, ROW_HEIGHT)
            .map_err(|e| BackofficeError::Internal(e.to_string()))?;
    }

    for (col, width) in widths.iter().enumerate() {
        worksheet
            .set_column_width(col as u16, (width + COLUMN_PADDING) as f64)
            .map_err(|e| BackofficeError::Internal(e.to_string()))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| BackofficeError::Internal(e.to_string()))
}

/// One export row in canonical column order. Absent values render as
/// empty cells; `New` status renders blank like its stored-NULL
/// representation; the manager cell is the manager's name or blank.
fn row_cells(entry: &OrderWithManager) -> [String; 15] {
    let order = &entry.order;
    [
        order.id.to_string(),
        text(&order.name),
        text(&order.surname),
        text(&order.email),
        text(&order.phone),
        number(&order.age),
        text(&order.course),
        text(&order.course_format),
        text(&order.course_type),
        number(&order.sum),
        number(&order.already_paid),
        order.created_at.format("%d.%m.%Y %H:%M").to_string(),
        match order.status {
            OrderStatus::New => String::new(),
            other => other.to_string(),
        },
        text(&order.group),
        entry
            .manager
            .as_ref()
            .map(|m| m.name.clone())
            .unwrap_or_default(),
    ]
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn number(value: &Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::models::order::{ManagerRef, Order};
    use chrono::TimeZone;
    use uuid::Uuid;

    fn fixture() -> OrderWithManager {
        let manager_id = Uuid::new_v4();
        OrderWithManager {
            order: Order {
                id: Uuid::new_v4(),
                name: Some("Ann".into()),
                surname: Some("Smith".into()),
                email: Some("ann@example.com".into()),
                phone: Some("+380501112233".into()),
                age: Some(25),
                course: Some("QACX".into()),
                course_type: Some("pro".into()),
                course_format: Some("online".into()),
                sum: Some(12000),
                already_paid: Some(4000),
                status: OrderStatus::InWork,
                group: Some("sep-2024".into()),
                manager_id: Some(manager_id),
                utm: None,
                msg: None,
                created_at: chrono::Utc.with_ymd_and_hms(2024, 3, 7, 9, 30, 0).unwrap(),
            },
            manager: Some(ManagerRef {
                id: manager_id,
                name: "Olha".into(),
                surname: "K".into(),
            }),
        }
    }

    #[test]
    fn output_is_xlsx_bytes() {
        let bytes = orders_to_xlsx(&[fixture()]).unwrap();
        // xlsx is a ZIP container.
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn empty_input_still_renders_the_header() {
        let bytes = orders_to_xlsx(&[]).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn cells_follow_the_canonical_column_order() {
        let entry = fixture();
        let cells = row_cells(&entry);
        assert_eq!(cells.len(), EXPORT_COLUMNS.len());
        assert_eq!(cells[1], "Ann");
        assert_eq!(cells[11], "07.03.2024 09:30");
        assert_eq!(cells[12], "InWork");
        assert_eq!(cells[14], "Olha");
    }

    #[test]
    fn new_status_and_missing_manager_render_blank() {
        let mut entry = fixture();
        entry.order.status = OrderStatus::New;
        entry.manager = None;
        let cells = row_cells(&entry);
        assert_eq!(cells[12], "");
        assert_eq!(cells[14], "");
    }

}
