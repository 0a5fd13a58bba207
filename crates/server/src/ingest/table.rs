//! Tables pulled out of a document and row access by header name.
//!
//! A raw table is a grid of optional cells exactly as the extractor produced
//! it. [`Table::from_raw`] promotes the first row to the header (trimmed and
//! lower-cased); [`Row::get`] then looks cells up by header name, returning
//! `None` for unknown columns, short rows and empty cells.

/// A grid of cells as produced by an extractor, header row first.
pub type RawTable = Vec<Vec<Option<String>>>;

/// A table with a normalized header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Split a raw grid into header and records.
    ///
    /// Returns `None` for an empty grid.
    #[must_use]
    pub fn from_raw(raw: RawTable) -> Option<Self> {
        let mut grid = raw.into_iter();
        let header = grid.next()?;
        Some(Self {
            headers: header
                .iter()
                .map(|cell| normalize_header(cell.as_deref()))
                .collect(),
            rows: grid.collect(),
        })
    }

    /// Normalized header names, in column order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Whether any header equals `name`.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|header| header == name)
    }

    /// The records below the header.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|cells| Row { table: self, cells })
    }
}

/// One record of a [`Table`].
#[derive(Debug, Clone, Copy)]
pub struct Row<'t> {
    table: &'t Table,
    cells: &'t [Option<String>],
}

impl<'t> Row<'t> {
    /// The cell under `column`, or `None` when the column is absent, the row
    /// is short, or the cell is empty.
    ///
    /// With duplicate headers the leftmost column wins.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&'t str> {
        let index = self.table.headers.iter().position(|h| h == column)?;
        self.cells
            .get(index)?
            .as_deref()
            .filter(|value| !value.is_empty())
    }

    /// First non-empty cell among `columns`.
    #[must_use]
    pub fn first_of(&self, columns: &[&str]) -> Option<&'t str> {
        columns.iter().find_map(|column| self.get(column))
    }
}

/// Trim and lower-case a header cell. Missing headers become `""`.
#[must_use]
pub fn normalize_header(cell: Option<&str>) -> String {
    cell.unwrap_or_default().trim().to_lowercase()
}

// =============================================================================
// Detection from plain text
// =============================================================================

enum Line {
    Cells(Vec<Option<String>>),
    Rule,
    Prose,
}

/// Find tables in a page's text.
///
/// A table is a run of at least two consecutive lines that each split into
/// the same number (two or more) of cells. Cells split on `|` when the line
/// has one, otherwise on tabs, otherwise on runs of two or more spaces.
/// Ruler lines such as `|----|----|` are skipped without ending the run.
#[must_use]
pub fn detect_tables(text: &str) -> Vec<RawTable> {
    let mut tables = Vec::new();
    let mut current: RawTable = Vec::new();

    for line in text.lines() {
        match classify_line(line) {
            Line::Rule => {}
            Line::Prose => flush(&mut current, &mut tables),
            Line::Cells(cells) => {
                let width = current.first().map(Vec::len);
                if width.is_some_and(|width| width != cells.len()) {
                    flush(&mut current, &mut tables);
                }
                current.push(cells);
            }
        }
    }
    flush(&mut current, &mut tables);

    tables
}

fn flush(current: &mut RawTable, tables: &mut Vec<RawTable>) {
    if current.len() >= 2 {
        tables.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

fn classify_line(line: &str) -> Line {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Line::Prose;
    }

    let cells: Vec<&str> = if trimmed.contains('|') {
        let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
        let inner = inner.strip_suffix('|').unwrap_or(inner);
        inner.split('|').collect()
    } else if trimmed.contains('\t') {
        trimmed.split('\t').collect()
    } else {
        split_on_wide_gaps(trimmed)
    };

    if cells.len() < 2 {
        return Line::Prose;
    }

    let is_rule = cells.iter().all(|cell| {
        let cell = cell.trim();
        !cell.is_empty() && cell.chars().all(|c| matches!(c, '-' | '=' | ':' | '+'))
    });
    if is_rule {
        return Line::Rule;
    }

    Line::Cells(
        cells
            .into_iter()
            .map(|cell| {
                let cell = cell.trim();
                (!cell.is_empty()).then(|| cell.to_owned())
            })
            .collect(),
    )
}

/// Split on runs of two or more whitespace characters.
fn split_on_wide_gaps(line: &str) -> Vec<&str> {
    let mut cells = Vec::new();
    let mut start = 0;
    let mut gap_start: Option<usize> = None;
    let mut gap_len = 0;

    for (index, c) in line.char_indices() {
        if c.is_whitespace() {
            if gap_start.is_none() {
                gap_start = Some(index);
            }
            gap_len += 1;
            continue;
        }
        if let Some(gap) = gap_start.take() {
            if gap_len >= 2 {
                cells.push(&line[start..gap]);
                start = index;
            }
            gap_len = 0;
        }
    }
    cells.push(&line[start..]);
    cells
}
