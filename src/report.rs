//! End-of-session report assembly
//!
//! Builds a paginated textual summary from a mirror snapshot. The layout
//! mirrors a printed page: each body line advances a vertical cursor and a
//! new page starts when the next line would cross the bottom margin, so a
//! page break never splits a line. The claimed-record list keeps mirror
//! iteration order; it is filtered but deliberately not re-sorted.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::types::ChildRecord;

pub const REPORT_TITLE: &str = "Reporte Ministerio Niños";

// Printed-page geometry, in millimeters (A4 portrait).
const PAGE_HEIGHT: f64 = 297.0;
const BOTTOM_MARGIN: f64 = 20.0;
const LINE_HEIGHT: f64 = 7.0;
const FIRST_PAGE_BODY_START: f64 = 65.0;
const CONTINUATION_START: f64 = 20.0;

const NAME_PAD_WIDTH: usize = 30;

/// One page of report lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Page {
    pub lines: Vec<String>,
}

/// A generated report, paginated and ready to render.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub assigned: usize,
    pub total: usize,
    pub pages: Vec<Page>,
}

impl Report {
    /// Deterministic output name derived from the generation timestamp.
    pub fn file_name(&self) -> String {
        let stamp = self
            .generated_at
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .replace([':', '.'], "-");
        format!("reporte_domingo_{stamp}.txt")
    }

    /// Render the full document; pages are separated by a form feed.
    pub fn render(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.lines.join("\n"))
            .collect::<Vec<_>>()
            .join("\n\u{c}\n")
    }

    /// Write the rendered document into `dir` under [`file_name`](Self::file_name).
    pub fn save_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let path = dir.join(self.file_name());
        let mut file = std::fs::File::create(&path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(path)
    }
}

/// Age display for report and card surfaces: infants under one year in
/// whole months, everyone else in years.
pub fn format_age(age: f64) -> String {
    if age < 1.0 {
        let months = (age * 12.0).round() as i64;
        format!("{months} meses")
    } else {
        format!("{age} años")
    }
}

/// Assemble the report from the current mirror.
///
/// Content, in order: title, generation timestamp, assigned/total counts, a
/// numbered line per claimed record (name padded to a fixed width, then the
/// claiming volunteer), or a single placeholder line when nothing is
/// claimed yet.
pub fn build_report(records: &[ChildRecord], generated_at: DateTime<Utc>) -> Report {
    let claimed: Vec<&ChildRecord> = records.iter().filter(|r| !r.is_available()).collect();
    let assigned = claimed.len();

    let mut pages = Vec::new();
    let mut lines = vec![
        REPORT_TITLE.to_string(),
        format!(
            "Fecha de reporte: {}",
            generated_at.format("%Y-%m-%d %H:%M:%S")
        ),
        format!("Total asignados: {} / {}", assigned, records.len()),
        String::new(),
        "Resumen de Asignaciones:".to_string(),
    ];

    if claimed.is_empty() {
        lines.push("Aún no hay niños asignados.".to_string());
    } else {
        let mut y = FIRST_PAGE_BODY_START;

        for (index, child) in claimed.iter().enumerate() {
            if y > PAGE_HEIGHT - BOTTOM_MARGIN {
                pages.push(Page {
                    lines: std::mem::take(&mut lines),
                });
                y = CONTINUATION_START;
            }

            let volunteer = child.selected_by.as_deref().unwrap_or("");
            lines.push(format!(
                "{}. [{:<width$}] -- Apadrinado por: {}",
                index + 1,
                child.name,
                volunteer,
                width = NAME_PAD_WIDTH
            ));
            y += LINE_HEIGHT;
        }
    }

    pages.push(Page { lines });

    Report {
        title: REPORT_TITLE.to_string(),
        generated_at,
        assigned,
        total: records.len(),
        pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(id: u32, name: &str, age: f64, selected_by: Option<&str>) -> ChildRecord {
        ChildRecord {
            id,
            name: name.to_string(),
            age,
            ministry: "Mutual".to_string(),
            selected_by: selected_by.map(str::to_string),
        }
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 2, 11, 30, 0).unwrap()
    }

    #[test]
    fn test_format_age_infants_in_months() {
        assert_eq!(format_age(0.8), "10 meses");
        assert_eq!(format_age(0.7), "8 meses");
        assert_eq!(format_age(0.5), "6 meses");
    }

    #[test]
    fn test_format_age_years() {
        assert_eq!(format_age(5.0), "5 años");
        assert_eq!(format_age(1.0), "1 años");
    }

    #[test]
    fn test_header_and_counts() {
        let records = vec![
            record(1, "Hannah", 0.8, Some("Ana")),
            record(2, "Jana", 5.0, None),
        ];

        let report = build_report(&records, stamp());
        assert_eq!(report.assigned, 1);
        assert_eq!(report.total, 2);

        let lines = &report.pages[0].lines;
        assert_eq!(lines[0], "Reporte Ministerio Niños");
        assert_eq!(lines[1], "Fecha de reporte: 2024-06-02 11:30:00");
        assert_eq!(lines[2], "Total asignados: 1 / 2");
        assert_eq!(lines[4], "Resumen de Asignaciones:");
    }

    #[test]
    fn test_claimed_lines_numbered_and_padded() {
        let records = vec![
            record(1, "Hannah", 0.8, Some("Ana")),
            record(2, "Jana", 5.0, Some("Luis")),
        ];

        let report = build_report(&records, stamp());
        let lines = &report.pages[0].lines;

        assert_eq!(
            lines[5],
            format!("1. [{:<30}] -- Apadrinado por: Ana", "Hannah")
        );
        assert_eq!(
            lines[6],
            format!("2. [{:<30}] -- Apadrinado por: Luis", "Jana")
        );
    }

    #[test]
    fn test_keeps_mirror_order_without_resorting() {
        // Mirror order here is deliberately not ascending by id.
        let records = vec![
            record(9, "Sofía", 6.0, Some("Marta")),
            record(3, "Emma", 4.0, Some("Ana")),
        ];

        let report = build_report(&records, stamp());
        let lines = &report.pages[0].lines;
        assert!(lines[5].contains("Sofía"));
        assert!(lines[6].contains("Emma"));
    }

    #[test]
    fn test_none_claimed_placeholder() {
        let records = vec![record(1, "Hannah", 0.8, None)];

        let report = build_report(&records, stamp());
        assert_eq!(report.assigned, 0);
        assert_eq!(report.pages.len(), 1);
        assert_eq!(
            report.pages[0].lines[5],
            "Aún no hay niños asignados."
        );
    }

    #[test]
    fn test_pagination_never_splits_a_line() {
        // 40 claimed records: the first page body holds 31 entries below
        // the header, the rest flow to a continuation page.
        let records: Vec<ChildRecord> = (1..=40)
            .map(|id| record(id, &format!("Child {id}"), 5.0, Some("Ana")))
            .collect();

        let report = build_report(&records, stamp());
        assert_eq!(report.pages.len(), 2);
        assert_eq!(report.pages[0].lines.len(), 5 + 31);
        assert_eq!(report.pages[1].lines.len(), 9);

        // Numbering continues across the page break.
        assert!(report.pages[1].lines[0].starts_with("32. "));
    }

    #[test]
    fn test_file_name_is_deterministic() {
        let report = build_report(&[], stamp());
        assert_eq!(
            report.file_name(),
            "reporte_domingo_2024-06-02T11-30-00-000Z.txt"
        );
        assert_eq!(report.file_name(), build_report(&[], stamp()).file_name());
    }

    #[test]
    fn test_save_to_writes_rendered_document() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![record(1, "Hannah", 0.8, Some("Ana"))];

        let report = build_report(&records, stamp());
        let path = report.save_to(dir.path()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, report.render());
        assert!(path.ends_with(report.file_name()));
    }
}
