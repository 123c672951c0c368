//! Output formatting for CLI commands

use crate::tictactoe::{Board, Cell};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Render a board with empty cells shown as their index (1-9).
pub fn render_board(board: &Board) -> String {
    let symbol = |pos: usize| match board.get(pos) {
        Cell::Empty => char::from_digit(pos as u32 + 1, 10).unwrap_or('.'),
        cell => cell.to_char(),
    };

    (0..3)
        .map(|row| {
            let base = row * 3;
            format!(" {} | {} | {}", symbol(base), symbol(base + 1), symbol(base + 2))
        })
        .collect::<Vec<_>>()
        .join("\n---+---+---\n")
}

/// Format a rate as a percentage
pub fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_board() {
        let board: Board = "X...O....".parse().unwrap();
        let rendered = render_board(&board);
        assert_eq!(
            rendered,
            " X | 2 | 3\n---+---+---\n 4 | O | 6\n---+---+---\n 7 | 8 | 9"
        );
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0.256), "25.6%");
    }
}
