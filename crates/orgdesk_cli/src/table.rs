//! Grid-table rendering for entity listings.
//!
//! # Responsibility
//! - Render headers + rows as an ASCII grid with padded columns.
//!
//! # Invariants
//! - Column widths are derived from the widest cell, header included.
//! - Rendering never fails; ragged rows are padded with empty cells.

/// Renders a grid table. Returns an empty string when there are no rows.
pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let columns = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|header| header.len()).collect();
    for row in rows {
        for (index, cell) in row.iter().enumerate().take(columns) {
            if cell.len() > widths[index] {
                widths[index] = cell.len();
            }
        }
    }

    let border = rule(&widths, '-');
    let header_rule = rule(&widths, '=');

    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    out.push_str(&line(headers, &widths));
    out.push('\n');
    out.push_str(&header_rule);
    out.push('\n');
    for row in rows {
        let cells: Vec<&str> = (0..columns)
            .map(|index| row.get(index).map(String::as_str).unwrap_or(""))
            .collect();
        out.push_str(&line(&cells, &widths));
        out.push('\n');
    }
    out.push_str(&border);
    out
}

fn rule(widths: &[usize], fill: char) -> String {
    let mut out = String::from("+");
    for width in widths {
        for _ in 0..width + 2 {
            out.push(fill);
        }
        out.push('+');
    }
    out
}

fn line(cells: &[&str], widths: &[usize]) -> String {
    let mut out = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        out.push(' ');
        out.push_str(cell);
        for _ in cell.len()..*width {
            out.push(' ');
        }
        out.push_str(" |");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::render;

    #[test]
    fn renders_padded_grid() {
        let rows = vec![
            vec!["1".to_string(), "Engineering".to_string()],
            vec!["2".to_string(), "Sales".to_string()],
        ];
        let table = render(&["ID", "Name"], &rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "+----+-------------+");
        assert_eq!(lines[1], "| ID | Name        |");
        assert_eq!(lines[2], "+====+=============+");
        assert_eq!(lines[3], "| 1  | Engineering |");
        assert_eq!(lines[4], "| 2  | Sales       |");
        assert_eq!(lines[5], "+----+-------------+");
    }

    #[test]
    fn empty_rows_render_nothing() {
        assert_eq!(render(&["ID", "Name"], &[]), "");
    }
}
