//! Excel workbook export.

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::error::Result;
use crate::inference::infer_column_types;
use crate::input::{Cell, Dataset};

const DATA_SHEET: &str = "Synthetic Data";
const METADATA_SHEET: &str = "Metadata";

/// Two-sheet workbook: the rows, then one metadata line per column.
pub fn to_xlsx(data: &Dataset) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    workbook.push_worksheet(data_sheet(data, &header)?);
    workbook.push_worksheet(metadata_sheet(data, &header)?);

    Ok(workbook.save_to_buffer()?)
}

fn data_sheet(data: &Dataset, header: &Format) -> Result<Worksheet> {
    let mut sheet = Worksheet::new();
    sheet.set_name(DATA_SHEET)?;

    let columns = data.columns();
    for (col, name) in columns.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, header)?;
    }

    for (r, row) in data.rows.iter().enumerate() {
        let r = r as u32 + 1;
        for (col, name) in columns.iter().enumerate() {
            let col = col as u16;
            match row.get(*name) {
                None | Some(Cell::Null) => {}
                Some(Cell::Number(n)) if n.is_finite() => {
                    sheet.write_number(r, col, *n)?;
                }
                Some(Cell::Bool(b)) => {
                    sheet.write_boolean(r, col, *b)?;
                }
                Some(cell) => {
                    sheet.write_string(r, col, &cell.to_string())?;
                }
            }
        }
    }
    Ok(sheet)
}

fn metadata_sheet(data: &Dataset, header: &Format) -> Result<Worksheet> {
    let mut sheet = Worksheet::new();
    sheet.set_name(METADATA_SHEET)?;

    for (col, title) in ["Column", "Data Type", "Sample Values", "Null Count"]
        .iter()
        .enumerate()
    {
        sheet.write_string_with_format(0, col as u16, *title, header)?;
    }

    let types = infer_column_types(data);
    for (r, (name, column_type)) in types.iter().enumerate() {
        let r = r as u32 + 1;
        let sample = Cell::display_of(data.get(0, name));
        let nulls = data
            .column_values(name)
            .filter(|c| Cell::is_missing_opt(*c))
            .count();

        sheet.write_string(r, 0, name.as_str())?;
        sheet.write_string(r, 1, column_type.label())?;
        sheet.write_string(r, 2, &sample)?;
        sheet.write_number(r, 3, nulls as f64)?;
    }
    Ok(sheet)
}
