//! Text, table and CSV renderings of a [`RunReport`].

use std::io;

use itertools::Itertools;

use crate::{error::Error, record::RunReport};

const TABLE_HEADERS: [&str; 6] = [
    "video_id",
    "title",
    "author",
    "summary",
    "date_published",
    "duration",
];

/// One markdown block per summarized video, in playlist order.
pub fn render_text(report: &RunReport) -> String {
    report
        .summaries
        .values()
        .map(|record| {
            format!(
                "### {}\n**Author:** {}\n**Summary:**\n{}\n",
                record.title, record.author, record.summary
            )
        })
        .join("\n")
}

/// Videos that produced no summary, with the reason. Empty when every video was summarized.
pub fn render_warnings(report: &RunReport) -> String {
    let skipped = report
        .skipped
        .iter()
        .map(|video| format!("- skipped '{}' ({}): {}", video.title, video.video_id, video.reason));
    let failed = report
        .failed
        .iter()
        .map(|video| format!("- failed '{}' ({}): {}", video.title, video.video_id, video.error));

    skipped.chain(failed).join("\n")
}

/// A markdown table with the export columns. Summaries are flattened onto one line.
pub fn render_table(report: &RunReport) -> String {
    let header = format!("| {} |", TABLE_HEADERS.join(" | "));
    let divider = format!("|{}|", TABLE_HEADERS.iter().map(|_| "---").join("|"));

    let rows = report.summaries.values().map(|record| {
        let cells = [
            record.video_id.clone(),
            record.title.clone(),
            record.author.clone(),
            record.summary.split_whitespace().join(" "),
            record.date_published(),
            record.duration_secs.to_string(),
        ];
        format!(
            "| {} |",
            cells.iter().map(|cell| cell.replace('|', "\\|")).join(" | ")
        )
    });

    std::iter::once(header)
        .chain(std::iter::once(divider))
        .chain(rows)
        .join("\n")
}

/// Writes the summaries as CSV with a header row, in playlist order.
pub fn write_csv<W: io::Write>(report: &RunReport, writer: W) -> Result<(), Error> {
    let mut csv = csv::Writer::from_writer(writer);
    if report.summaries.is_empty() {
        csv.write_record(TABLE_HEADERS)?;
    }
    for record in report.summaries.values() {
        csv.serialize(record)?;
    }
    csv.flush().map_err(|e| Error::Render(e.to_string()))?;
    Ok(())
}
