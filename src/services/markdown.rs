/// A parsed `| id | location | description |` table row.
#[derive(Debug, PartialEq)]
pub struct FindingRow {
    pub id: String,
    pub location: String,
    pub description: String,
}

/// Extract finding rows from a markdown document.
///
/// Any pipe table with at least an id column counts; header and separator
/// rows are skipped, surrounding prose is ignored.
pub fn parse_findings_table(text: &str) -> Vec<FindingRow> {
    let mut out = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if !line.starts_with('|') {
            continue;
        }
        let cells: Vec<String> = line
            .trim_matches('|')
            .split('|')
            .map(|c| c.trim().to_string())
            .collect();
        if cells.is_empty() || cells[0].is_empty() {
            continue;
        }
        if is_separator_row(&cells) || is_header_row(&cells) {
            continue;
        }
        out.push(FindingRow {
            id: cells[0].clone(),
            location: cells.get(1).cloned().unwrap_or_default(),
            description: cells.get(2).cloned().unwrap_or_default(),
        });
    }
    out
}

fn is_separator_row(cells: &[String]) -> bool {
    cells
        .iter()
        .all(|c| !c.is_empty() && c.chars().all(|ch| ch == '-' || ch == ':'))
}

fn is_header_row(cells: &[String]) -> bool {
    matches!(
        cells[0].to_ascii_lowercase().as_str(),
        "id" | "finding" | "#"
    )
}
