//! Excel export functionality

use crate::domain::model::TripRecord;
use crate::domain::service::MonthlySummary;
use crate::error::{Error, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

/// Export the monthly summary and the raw trip log to an Excel file
pub fn export_to_excel(
    records: &[TripRecord],
    summary: &MonthlySummary,
    output_path: &Path,
) -> Result<()> {
    let mut workbook = Workbook::new();

    let summary_sheet = workbook.add_worksheet();
    write_summary_sheet(summary_sheet, summary)?;

    let details_sheet = workbook.add_worksheet();
    write_details_sheet(details_sheet, records)?;

    workbook
        .save(output_path)
        .map_err(|e| Error::Excel(e.to_string()))?;

    Ok(())
}

fn write_summary_sheet(sheet: &mut Worksheet, summary: &MonthlySummary) -> Result<()> {
    sheet
        .set_name("集計")
        .map_err(|e| Error::Excel(e.to_string()))?;

    let header_format = Format::new().set_bold();

    sheet
        .write_string_with_format(0, 0, "年月", &header_format)
        .map_err(|e| Error::Excel(e.to_string()))?;
    for (col, name) in summary.names.iter().enumerate() {
        sheet
            .write_string_with_format(0, (col + 1) as u16, name, &header_format)
            .map_err(|e| Error::Excel(e.to_string()))?;
    }
    let total_col = (summary.names.len() + 1) as u16;
    sheet
        .write_string_with_format(0, total_col, "合計", &header_format)
        .map_err(|e| Error::Excel(e.to_string()))?;

    for (row_idx, row) in summary.rows.iter().enumerate() {
        let excel_row = (row_idx + 1) as u32;
        sheet
            .write_string(excel_row, 0, &row.month)
            .map_err(|e| Error::Excel(e.to_string()))?;
        for (col, name) in summary.names.iter().enumerate() {
            write_amount_cell(sheet, excel_row, (col + 1) as u16, row.total_for(name))?;
        }
        write_amount_cell(sheet, excel_row, total_col, row.row_total())?;
    }

    sheet
        .set_column_width(0, 12)
        .map_err(|e| Error::Excel(e.to_string()))?;

    Ok(())
}

fn write_details_sheet(sheet: &mut Worksheet, records: &[TripRecord]) -> Result<()> {
    sheet
        .set_name("明細")
        .map_err(|e| Error::Excel(e.to_string()))?;

    let header_format = Format::new().set_bold();

    let headers = [
        "日付",
        "名前",
        "基本",
        "金額",
        "高速道路",
        "高速代",
        "片道",
        "バッチID",
        "備考",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| Error::Excel(e.to_string()))?;
    }

    for (row_idx, record) in records.iter().enumerate() {
        let row = (row_idx + 1) as u32;

        sheet
            .write_string(row, 0, record.date.format("%Y-%m-%d").to_string())
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_string(row, 1, &record.driver_name)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_number(row, 2, record.base_amount as f64)
            .map_err(|e| Error::Excel(e.to_string()))?;
        write_amount_cell(sheet, row, 3, record.amount)?;
        sheet
            .write_string(row, 4, record.toll.label())
            .map_err(|e| Error::Excel(e.to_string()))?;
        write_amount_cell(sheet, row, 5, record.toll_cost)?;
        sheet
            .write_string(row, 6, if record.one_way { "あり" } else { "なし" })
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_string(row, 7, &record.batch_id)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_string(row, 8, &record.notes)
            .map_err(|e| Error::Excel(e.to_string()))?;
    }

    sheet
        .set_column_width(0, 12)
        .map_err(|e| Error::Excel(e.to_string()))?;
    sheet
        .set_column_width(7, 16)
        .map_err(|e| Error::Excel(e.to_string()))?;
    sheet
        .set_column_width(8, 20)
        .map_err(|e| Error::Excel(e.to_string()))?;

    Ok(())
}

/// Known amounts become numbers, Pending stays the 未定 label
fn write_amount_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    amount: crate::domain::model::Amount,
) -> Result<()> {
    match amount.known() {
        Some(v) => sheet
            .write_number(row, col, v as f64)
            .map_err(|e| Error::Excel(e.to_string()))?,
        None => sheet
            .write_string(row, col, crate::domain::model::PENDING_LABEL)
            .map_err(|e| Error::Excel(e.to_string()))?,
    };
    Ok(())
}
