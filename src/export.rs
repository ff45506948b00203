//! Export a rendered leaderboard to CSV or XLSX.

use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, FormatAlign, Workbook};
use serde::Serialize;

use crate::pipeline::{Leaderboard, RankedEntry};

/// Output formats supported by [`export_leaderboard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" => Ok(ExportFormat::Xlsx),
            _ => Err(anyhow::anyhow!(
                "Cannot export to '{}': expected a .csv or .xlsx file",
                path.display()
            )),
        }
    }
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Rank")]
    rank: usize,
    #[serde(rename = "Author")]
    author: &'a str,
    #[serde(rename = "Average Score")]
    average_score: String,
    #[serde(rename = "Games Played")]
    games_played: u32,
    #[serde(rename = "Inactive Days")]
    inactive_days: Option<f64>,
    #[serde(rename = "Profile Image")]
    profile_image: Option<&'a str>,
}

impl<'a> From<&RankedEntry<'a>> for ExportRow<'a> {
    fn from(row: &RankedEntry<'a>) -> Self {
        Self {
            rank: row.position + 1,
            author: &row.entry.author,
            average_score: format!("{:.2}", row.entry.average_score),
            games_played: row.entry.number_played,
            inactive_days: row.entry.inactive_days,
            profile_image: row.entry.profile_image_url.as_deref(),
        }
    }
}

const HEADERS: [&str; 6] = [
    "Rank",
    "Author",
    "Average Score",
    "Games Played",
    "Inactive Days",
    "Profile Image",
];

/// Write the leaderboard to `output`, picking the format from its extension.
/// Returns a summary string on success.
pub fn export_leaderboard(board: &Leaderboard<'_>, output: &Path) -> Result<String> {
    match ExportFormat::from_path(output)? {
        ExportFormat::Csv => export_csv(board, output)?,
        ExportFormat::Xlsx => export_xlsx(board, output)?,
    }
    Ok(format!(
        "Exported {} of {} entries to {}",
        board.rows.len(),
        board.total_entries,
        output.display()
    ))
}

pub fn export_csv(board: &Leaderboard<'_>, output: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(output)
        .context("Failed to create output CSV")?;
    // Written explicitly so an empty leaderboard still has a header row
    writer.write_record(HEADERS)?;
    for row in &board.rows {
        writer.serialize(ExportRow::from(row))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn export_xlsx(board: &Leaderboard<'_>, output: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_fmt = Format::new().set_bold();
    let top_fill = "#FFF7CC";

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Leaderboard")?;

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_fmt)?;
    }

    for row in &board.rows {
        let r = (row.position + 1) as u32;
        let entry = row.entry;

        let mut text_fmt = Format::new();
        let mut score_fmt = Format::new()
            .set_num_format("0.00")
            .set_bold()
            .set_font_color(row.tier.color())
            .set_align(FormatAlign::Right);
        if row.top_row {
            text_fmt = text_fmt.set_background_color(top_fill);
            score_fmt = score_fmt.set_background_color(top_fill);
        }

        worksheet.write_number_with_format(r, 0, (row.position + 1) as f64, &text_fmt)?;
        let author = match row.marker {
            Some(marker) => format!("{}{}", marker.symbol(), entry.author),
            None => entry.author.clone(),
        };
        worksheet.write_string_with_format(r, 1, &author, &text_fmt)?;
        worksheet.write_number_with_format(r, 2, entry.average_score, &score_fmt)?;
        worksheet.write_number_with_format(r, 3, f64::from(entry.number_played), &text_fmt)?;
        match entry.inactive_days {
            Some(days) => {
                worksheet.write_number_with_format(r, 4, days, &text_fmt)?;
            }
            None => {
                worksheet.write_blank(r, 4, &text_fmt)?;
            }
        }
        match entry.profile_image_url.as_deref() {
            Some(url) => {
                worksheet.write_string_with_format(r, 5, url, &text_fmt)?;
            }
            None => {
                worksheet.write_blank(r, 5, &text_fmt)?;
            }
        }
    }

    worksheet.set_column_width(0, 6)?;
    worksheet.set_column_width(1, 30)?;
    worksheet.set_column_width(2, 14)?;
    worksheet.set_column_width(3, 13)?;
    worksheet.set_column_width(4, 13)?;
    worksheet.set_column_width(5, 50)?;
    worksheet.set_freeze_panes(1, 0)?;

    workbook
        .save(output)
        .with_context(|| format!("Failed to write workbook: {}", output.display()))?;
    Ok(())
}
