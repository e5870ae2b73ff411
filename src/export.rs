use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::matchup::{MatchupSummary, PairwiseMatrix};
use crate::streaks::{StreakKind, StreakRow, total_bases_label};
use crate::tables::StreakTable;

pub struct ExportReport {
    pub streak_rows: usize,
    pub matchup_rows: usize,
    pub heatmap_cells: usize,
}

pub fn export_workbook(
    path: &Path,
    streaks: Option<&StreakTable>,
    matchup: Option<&MatchupSummary>,
    matrix: Option<&PairwiseMatrix>,
) -> Result<ExportReport> {
    if streaks.is_none() && matchup.is_none() && matrix.is_none() {
        return Err(anyhow::anyhow!("nothing to export yet"));
    }

    let mut workbook = Workbook::new();
    let mut report = ExportReport {
        streak_rows: 0,
        matchup_rows: 0,
        heatmap_cells: 0,
    };

    if let Some(table) = streaks {
        let rows = streak_sheet_rows(&table.rows, table.min_total_bases);
        let sheet = workbook.add_worksheet();
        sheet.set_name("Streaks")?;
        write_rows(sheet, &rows)?;
        report.streak_rows = table.rows.len();
    }
    if let Some(summary) = matchup {
        let rows = matchup_sheet_rows(summary);
        let sheet = workbook.add_worksheet();
        sheet.set_name("Matchup")?;
        write_rows(sheet, &rows)?;
        report.matchup_rows = summary.rows.len();
    }
    if let Some(matrix) = matrix {
        let rows = heatmap_sheet_rows(matrix);
        let sheet = workbook.add_worksheet();
        sheet.set_name("Heatmap")?;
        write_rows(sheet, &rows)?;
        report.heatmap_cells = matrix.cells.len();
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    Ok(report)
}

pub fn streak_sheet_rows(rows: &[StreakRow], min_total_bases: u32) -> Vec<Vec<String>> {
    let mut out = vec![vec![
        "Player".to_string(),
        "Team".to_string(),
        StreakKind::Hitting.label(min_total_bases),
        StreakKind::Rbi.label(min_total_bases),
        total_bases_label(min_total_bases),
        StreakKind::Runs.label(min_total_bases),
    ]];
    out.extend(rows.iter().map(|row| {
        vec![
            row.player.clone(),
            row.team.clone(),
            row.get(StreakKind::Hitting).to_string(),
            row.get(StreakKind::Rbi).to_string(),
            row.get(StreakKind::TotalBases).to_string(),
            row.get(StreakKind::Runs).to_string(),
        ]
    }));
    out
}

pub fn matchup_sheet_rows(summary: &MatchupSummary) -> Vec<Vec<String>> {
    let mut out = vec![vec![
        "Date".to_string(),
        "Away".to_string(),
        "Home".to_string(),
        "Away R".to_string(),
        "Home R".to_string(),
        "Total".to_string(),
        "Line".to_string(),
        "Result".to_string(),
    ]];
    for row in &summary.rows {
        out.push(vec![
            row.date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
            row.away.clone(),
            row.home.clone(),
            row.away_runs.to_string(),
            row.home_runs.to_string(),
            format!("{}", row.total),
            format!("{}", row.threshold),
            row.result.label().to_string(),
        ]);
    }
    out.push(Vec::new());
    out.push(vec![
        "Over %".to_string(),
        summary
            .aggregate
            .map(|agg| format!("{:.1}", agg.over_fraction * 100.0))
            .unwrap_or_else(|| "no data".to_string()),
    ]);
    out.push(vec!["Skipped games".to_string(), summary.skipped().to_string()]);
    out
}

/// Dense grid with row team `a` and column team `b`; missing pairs stay blank.
pub fn heatmap_sheet_rows(matrix: &PairwiseMatrix) -> Vec<Vec<String>> {
    let mut header = vec![String::new()];
    header.extend(matrix.participants.iter().map(|p| p.label().to_string()));
    let mut out = vec![header];
    for a in &matrix.participants {
        let mut row = vec![a.label().to_string()];
        for b in &matrix.participants {
            let cell = matrix
                .get(a.id, b.id)
                .map(|cell| format!("{:.1}", cell.over_fraction() * 100.0))
                .unwrap_or_default();
            row.push(cell);
        }
        out.push(row);
    }
    out
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
