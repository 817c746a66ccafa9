use crate::game::{GameState, Position};

/// Plain-text picture of the grid
///
/// The first line holds the prisoner's `x y`; then one row per `y`, starting
/// at row 0. Cells are `.` when empty, otherwise `P`, `G` or `E`, with later
/// markers drawn over earlier ones (escape over guard over prisoner).
pub fn render_text(state: &GameState) -> String {
    let size = state.grid_size;
    let mut grid = vec![vec!['.'; size]; size];

    let mut mark = |pos: Position, marker: char| {
        if state.is_in_bounds(pos) {
            grid[pos.y][pos.x] = marker;
        }
    };
    mark(state.prisoner, 'P');
    mark(state.guard, 'G');
    mark(state.escape, 'E');

    let mut out = format!("{} {}\n", state.prisoner.x, state.prisoner.y);
    for row in grid {
        let line: Vec<String> = row.iter().map(char::to_string).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(Position::new(1, 0), Position::new(6, 6), Position::new(3, 2), 7)
    }

    #[test]
    fn test_layout() {
        let text = render_text(&state());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "1 0");
        assert_eq!(lines[1], ". P . . . . .");
        assert_eq!(lines[3], ". . . E . . .");
        assert_eq!(lines[7], ". . . . . . G");
    }

    #[test]
    fn test_one_of_each_marker() {
        let text = render_text(&state());
        let grid: String = text.lines().skip(1).collect();

        assert_eq!(grid.matches('P').count(), 1);
        assert_eq!(grid.matches('G').count(), 1);
        assert_eq!(grid.matches('E').count(), 1);
    }

    #[test]
    fn test_overlap_precedence() {
        let mut captured = state();
        captured.guard = captured.prisoner;
        let text = render_text(&captured);
        assert_eq!(text.lines().nth(1), Some(". G . . . . ."));

        let mut escaped = state();
        escaped.prisoner = escaped.escape;
        let text = render_text(&escaped);
        assert_eq!(text.lines().nth(3), Some(". . . E . . ."));
        assert!(!text.contains('P'));
    }
}
