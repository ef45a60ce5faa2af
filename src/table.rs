//! Bordered table rendering (psql style)

/// Cell alignment; strings left, numbers right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct Column {
    pub title: String,
    pub align: Align,
}

impl Column {
    pub fn left(title: &str) -> Self {
        Self {
            title: title.to_string(),
            align: Align::Left,
        }
    }

    pub fn right(title: &str) -> Self {
        Self {
            title: title.to_string(),
            align: Align::Right,
        }
    }
}

fn rule(widths: &[usize], junction: char) -> String {
    let mut line = String::new();
    line.push(junction);
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            line.push('+');
        }
        for _ in 0..width + 2 {
            line.push('-');
        }
    }
    line.push(junction);
    line.push('\n');
    line
}

fn formatted_row(columns: &[Column], widths: &[usize], cells: &[String]) -> String {
    let mut line = String::from("|");
    for (i, &width) in widths.iter().enumerate() {
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        match columns[i].align {
            Align::Left => line.push_str(&format!(" {cell:<width$} |")),
            Align::Right => line.push_str(&format!(" {cell:>width$} |")),
        }
    }
    line.push('\n');
    line
}

/// Render rows as a bordered table. Column widths fit the widest cell;
/// headers align with their column.
pub fn render(columns: &[Column], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.title.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.len());
            }
        }
    }

    let headers: Vec<String> = columns.iter().map(|c| c.title.clone()).collect();
    let mut out = String::new();
    out.push_str(&rule(&widths, '+'));
    out.push_str(&formatted_row(columns, &widths, &headers));
    out.push_str(&rule(&widths, '|'));
    for row in rows {
        out.push_str(&formatted_row(columns, &widths, row));
    }
    out.push_str(&rule(&widths, '+'));
    out
}
