//! Styled `.xlsx` workbooks carrying the same cells as the CSV tables.
//!
//! # Invariants
//! - Cell text matches [`table::wbs_table`] and [`table::ram_table`].
//! - Fills follow the diagram palette: depth colors for work packages,
//!   level colors for totals rows, code colors for involved cells.

use super::dot::{legend_text, level_color};
use super::table::{self, Table};
use crate::model::responsibility::LegendEntry;
use crate::projection::diagram::{depth_color, Diagram};
use crate::projection::matrix::{MatrixRow, ProjectSummary};
use rust_xlsxwriter::{
    Color, ColNum, Format, FormatAlign, FormatBorder, RowNum, Workbook, Worksheet, XlsxError,
};

const HEADER_RGB: u32 = 0xD3D3D3;
/// First role column in the RAM sheet.
const ROLE_COLUMN: usize = 3;
const WBS_TEXT_COLUMNS: [usize; 4] = [0, 2, 3, 4];
const RAM_TEXT_COLUMNS: [usize; 3] = [0, 1, 2];

/// Single-sheet `WBS` workbook, one row per node.
pub fn wbs_workbook(diagram: &Diagram) -> Result<Vec<u8>, XlsxError> {
    let table = table::wbs_table(diagram);
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("WBS")?;
    write_header(sheet, &table)?;
    for (index, (node, cells)) in diagram.nodes.iter().zip(&table.rows).enumerate() {
        write_row(sheet, index + 1, cells, &WBS_TEXT_COLUMNS, &fill_format(node.color))?;
    }
    sheet.autofit();
    workbook.save_to_buffer()
}

/// Single-sheet `RAM` workbook: matrix rows, project totals, then the key.
pub fn ram_workbook(
    rows: &[MatrixRow],
    summary: &ProjectSummary,
    legend: &[LegendEntry],
) -> Result<Vec<u8>, XlsxError> {
    let table = table::ram_table(rows, summary);
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("RAM")?;
    write_header(sheet, &table)?;

    for (index, (row, cells)) in rows.iter().zip(&table.rows).enumerate() {
        let line = index + 1;
        match row {
            MatrixRow::Task(task) => {
                let format = fill_format(depth_color(task.depth));
                write_row(sheet, line, cells, &RAM_TEXT_COLUMNS, &format)?;
                for (offset, (_, code)) in task.responsibilities.iter().enumerate() {
                    if code.is_involved() {
                        let code_format = fill_format(code.color())
                            .set_bold()
                            .set_font_color(Color::White)
                            .set_align(FormatAlign::Center);
                        let (r, c) = cell_at(line, ROLE_COLUMN + offset)?;
                        sheet.write_string_with_format(r, c, code.code(), &code_format)?;
                    }
                }
            }
            MatrixRow::Totals(totals) => {
                let format = fill_format(level_color(totals.level)).set_bold();
                write_row(sheet, line, cells, &RAM_TEXT_COLUMNS, &format)?;
            }
        }
    }

    // Header row plus one blank separator.
    let mut line = rows.len() + 2;
    let header = header_format();
    let (r, c) = cell_at(line, 0)?;
    sheet.write_string_with_format(r, c, "Project Totals", &header)?;
    for (label, value) in summary.lines() {
        line += 1;
        let cells = [label.to_string(), value];
        write_row(sheet, line, &cells, &[0], &Format::new())?;
        let (r, c) = cell_at(line, 0)?;
        sheet.write_string_with_format(r, c, label, &header)?;
    }

    line += 2;
    let (r, c) = cell_at(line, 0)?;
    sheet.write_string_with_format(r, c, "Key", &header)?;
    for entry in legend {
        line += 1;
        let (r, c) = cell_at(line, 0)?;
        sheet.write_string_with_format(r, c, legend_text(entry), &fill_format(entry.color))?;
    }

    sheet.autofit();
    workbook.save_to_buffer()
}

fn write_header(sheet: &mut Worksheet, table: &Table) -> Result<(), XlsxError> {
    let format = header_format();
    for (col, header) in table.headers.iter().enumerate() {
        let (r, c) = cell_at(0, col)?;
        sheet.write_string_with_format(r, c, header.as_str(), &format)?;
    }
    Ok(())
}

/// Writes one row; cells outside `text_columns` that parse as integers
/// become numbers, empty cells stay blank but keep the row fill.
fn write_row(
    sheet: &mut Worksheet,
    line: usize,
    cells: &[String],
    text_columns: &[usize],
    format: &Format,
) -> Result<(), XlsxError> {
    for (col, value) in cells.iter().enumerate() {
        let (r, c) = cell_at(line, col)?;
        if value.is_empty() {
            sheet.write_blank(r, c, format)?;
            continue;
        }
        match value.parse::<u64>() {
            Ok(number) if !text_columns.contains(&col) => {
                sheet.write_number_with_format(r, c, number as f64, format)?;
            }
            _ => {
                sheet.write_string_with_format(r, c, value.as_str(), format)?;
            }
        }
    }
    Ok(())
}

fn cell_at(line: usize, col: usize) -> Result<(RowNum, ColNum), XlsxError> {
    let row = RowNum::try_from(line).map_err(|_| XlsxError::RowColumnLimitError)?;
    let col = ColNum::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)?;
    Ok((row, col))
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(Color::RGB(HEADER_RGB))
        .set_border(FormatBorder::Thin)
}

fn fill_format(color: &str) -> Format {
    Format::new()
        .set_background_color(fill_color(color))
        .set_border(FormatBorder::Thin)
}

/// Maps `#rrggbb` and the few named colors the palettes use.
fn fill_color(color: &str) -> Color {
    match color {
        "lightgray" => Color::RGB(HEADER_RGB),
        _ => color
            .strip_prefix('#')
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .map_or(Color::White, Color::RGB),
    }
}
