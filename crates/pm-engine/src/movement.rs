use pm_core::Direction;
use pm_core::GRID_W;
use pm_core::TUNNEL_ROW;
use pm_maze::Maze;

/// Row-major pellet bitmap index for `(x, y)`, within grid bounds.
pub fn grid_idx(x: i32, y: i32) -> usize {
    y as usize * GRID_W + x as usize
}

/// The tile reached by moving one step from `(x, y)` in `dir`, wrapping at
/// the tunnel row the same way [`Maze::is_wall`] treats it as open.
pub fn step_tile(x: i32, y: i32, dir: Direction) -> (i32, i32) {
    let (dx, dy) = dir.delta();
    let (mut nx, ny) = (x + dx, y + dy);
    if ny == TUNNEL_ROW as i32 {
        if nx < 0 {
            nx = GRID_W as i32 - 1;
        } else if nx >= GRID_W as i32 {
            nx = 0;
        }
    }
    (nx, ny)
}

/// Whether moving from `(x, y)` one step in `dir` lands on an open tile.
pub fn is_open(maze: &Maze, x: i32, y: i32, dir: Direction) -> bool {
    let (nx, ny) = step_tile(x, y, dir);
    !maze.is_wall(nx, ny)
}
