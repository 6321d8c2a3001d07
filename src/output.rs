//! Output formatting module

use crate::app::SubmissionOutcome;
use crate::cli::OutputFormat;
use crate::domain::model::TripRecord;
use crate::domain::service::{FareBreakdown, MonthlySummary, SeatAssignment};
use crate::error::Result;

pub fn output_submission(output_format: OutputFormat, outcome: &SubmissionOutcome) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    println!("\n送信結果 (バッチID: {})", outcome.batch_id);
    println!("==============================");
    for record in &outcome.records {
        println!(
            "{}  {:<8} {:>6}円  高速:{} 片道:{}{}",
            record.date.format("%Y-%m-%d"),
            record.driver_name,
            record.amount.to_string(),
            record.toll.label(),
            if record.one_way { "あり" } else { "なし" },
            if record.notes.is_empty() {
                String::new()
            } else {
                format!("  ({})", record.notes)
            }
        );
    }
    if !outcome.failures.is_empty() {
        println!("\n計算できなかった運転手:");
        for failure in &outcome.failures {
            println!("  {}: {}", failure.driver_name, failure.reason);
        }
    }
    Ok(())
}

pub fn output_breakdown(output_format: OutputFormat, breakdown: &FareBreakdown) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(breakdown)?);
        return Ok(());
    }

    println!("\n車代計算結果");
    println!("============");
    println!("金額:     {}円", breakdown.amount);
    println!(
        "高速道路: {}",
        if breakdown.highway_used { "あり" } else { "なし" }
    );
    println!(
        "片道:     {}",
        if breakdown.one_way { "あり" } else { "なし" }
    );
    if let Some(ref note) = breakdown.note {
        println!("備考:     {}", note);
    }
    Ok(())
}

pub fn output_summary(output_format: OutputFormat, summary: &MonthlySummary) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    if summary.is_empty() {
        println!("データがありません。");
        return Ok(());
    }

    println!("\n月ごとの集計");
    println!("============");
    let mut header = format!("{:<8}", "年月");
    for name in &summary.names {
        header.push_str(&format!(" {:>8}", name));
    }
    header.push_str(&format!(" {:>8}", "合計"));
    println!("{}", header);
    println!("{}", "-".repeat(10 + 9 * (summary.names.len() + 1)));

    for row in &summary.rows {
        let mut line = format!("{:<8}", row.month);
        for name in &summary.names {
            line.push_str(&format!(" {:>8}", row.total_for(name).to_string()));
        }
        line.push_str(&format!(" {:>8}", row.row_total().to_string()));
        println!("{}", line);
    }

    let mut totals = format!("{:<8}", "合計");
    for name in &summary.names {
        totals.push_str(&format!(" {:>8}", summary.grand_total_for(name).to_string()));
    }
    println!("{}", "-".repeat(10 + 9 * (summary.names.len() + 1)));
    println!("{}", totals);
    Ok(())
}

pub fn output_records(output_format: OutputFormat, records: &[TripRecord]) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("該当するレコードはありません。");
        return Ok(());
    }

    println!(
        "{:<12} {:<8} {:>6} {:>6} {:>6} {:<16} {}",
        "日付", "名前", "基本", "金額", "高速代", "バッチID", "備考"
    );
    println!("{}", "-".repeat(70));
    for record in records {
        println!(
            "{:<12} {:<8} {:>6} {:>6} {:>6} {:<16} {}",
            record.date.format("%Y-%m-%d"),
            record.driver_name,
            record.base_amount,
            record.amount.to_string(),
            record.toll_cost.to_string(),
            record.batch_id,
            record.notes
        );
    }
    Ok(())
}

pub fn output_assignment(output_format: OutputFormat, assignment: &SeatAssignment) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(assignment)?);
        return Ok(());
    }

    println!("\n配車結果");
    println!("========");
    if assignment.vehicles.is_empty() {
        println!("割り当てられた車はありません。");
    }
    for vehicle in &assignment.vehicles {
        let names: Vec<&str> = vehicle
            .passengers
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        println!(
            "{} ({}/{}人): {}",
            vehicle.driver.name,
            vehicle.passengers.len(),
            vehicle.driver.capacity,
            names.join("、")
        );
    }
    if !assignment.unassigned.is_empty() {
        let names: Vec<&str> = assignment
            .unassigned
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        println!("\n未割当: {}", names.join("、"));
    }
    Ok(())
}
