//! Text rendering of a grid for terminal output
//!
//! Odd columns sit half a row lower, so each grid row spans two text lines:
//! even columns print on the first, odd columns on the second.

use hextactics_core::{Hex, HexGrid};

pub fn render(grid: &HexGrid, glyph: impl Fn(Hex) -> char) -> String {
    let mut out = String::new();

    for row in 0..grid.rows() as i32 {
        for parity in 0..2 {
            let line: String = (0..grid.columns() as i32)
                .map(|col| {
                    if col % 2 == parity {
                        glyph(Hex::new(row, col))
                    } else {
                        ' '
                    }
                })
                .flat_map(|c| [c, ' '])
                .collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_layout() {
        let grid = HexGrid::new(2, 3, 10.0).unwrap();
        let text = render(&grid, |_| '#');
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["#   #", "  #", "#   #", "  #"]);
    }
}
