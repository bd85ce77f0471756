use crate::grid::GridBuilder;
use pm_core::GRID_H;
use pm_core::GRID_W;
use pm_core::Xorshift128Plus;
use std::collections::HashSet;

/// Probability an already-walled interior cell is additionally opened after
/// the perfect maze is carved, raising pellet density and loop count.
const DENSITY_OPEN_PROBABILITY: f64 = 0.35;

const LEFT_HALF_WIDTH: i32 = GRID_W as i32 / 2;

/// Builds a fresh procedural maze for `seed`, per the randomized-backtracker
/// contract: carve the left half, mirror it, raise density, reserve the
/// fixed regions, then reconnect anything the density pass isolated.
pub fn build(seed: u64) -> GridBuilder {
    let mut rng = Xorshift128Plus::seed(seed);
    let mut builder = GridBuilder::all_walls();
    carve_left_half(&mut builder, &mut rng);
    mirror_left_to_right(&mut builder);
    raise_density(&mut builder, &mut rng);
    mirror_left_to_right(&mut builder);
    builder.carve_ghost_house();
    builder.carve_pacman_pocket();
    builder.force_outer_walls();
    builder.carve_tunnel();
    builder.reconnect_components();
    builder
}

/// Recursive randomized backtracker over odd-indexed cells of the left
/// half, per the classic perfect-maze construction: treat odd coordinates
/// as rooms and the even coordinate between two rooms as the wall that
/// carving a passage knocks down.
fn carve_left_half(builder: &mut GridBuilder, rng: &mut Xorshift128Plus) {
    let odd_xs: Vec<i32> = (1..LEFT_HALF_WIDTH).step_by(2).collect();
    let odd_ys: Vec<i32> = (1..GRID_H as i32 - 1).step_by(2).collect();
    if odd_xs.is_empty() || odd_ys.is_empty() {
        return;
    }
    let mut visited: HashSet<(i32, i32)> = HashSet::new();
    let mut stack: Vec<(i32, i32)> = Vec::new();

    let start = (odd_xs[0], odd_ys[0]);
    builder.set_open(start.0, start.1);
    visited.insert(start);
    stack.push(start);

    while let Some(&(x, y)) = stack.last() {
        let candidates: Vec<(i32, i32)> = [(x + 2, y), (x - 2, y), (x, y + 2), (x, y - 2)]
            .into_iter()
            .filter(|&(nx, ny)| odd_xs.contains(&nx) && odd_ys.contains(&ny))
            .filter(|cell| !visited.contains(cell))
            .collect();
        if candidates.is_empty() {
            stack.pop();
            continue;
        }
        let &(nx, ny) = rng.pick(&candidates);
        builder.set_open((x + nx) / 2, (y + ny) / 2);
        builder.set_open(nx, ny);
        visited.insert((nx, ny));
        stack.push((nx, ny));
    }
}

fn mirror_left_to_right(builder: &mut GridBuilder) {
    for y in 0..GRID_H as i32 {
        for x in 0..LEFT_HALF_WIDTH {
            let mirrored = GRID_W as i32 - 1 - x;
            let open = !builder.is_wall(x, y);
            if open {
                builder.set_open(mirrored, y);
            } else {
                builder.set_wall(mirrored, y);
            }
        }
    }
}

fn raise_density(builder: &mut GridBuilder, rng: &mut Xorshift128Plus) {
    for y in 1..GRID_H as i32 - 1 {
        for x in 1..LEFT_HALF_WIDTH {
            if builder.is_wall(x, y) && rng.next_f64() < DENSITY_OPEN_PROBABILITY {
                builder.set_open(x, y);
            }
        }
    }
}
