use crate::grid::GridBuilder;
use crate::grid::in_ghost_house;
use pm_core::GRID_H;
use pm_core::GRID_W;
use pm_core::PACMAN_SPAWN;
use pm_core::TUNNEL_ROW;

/// Search radius, in tiles, for the nearest open cell to each grid corner.
const POWER_PELLET_SEARCH_RADIUS: i32 = 3;

const CORNERS: [(i32, i32); 4] = [
    (1, 1),
    (GRID_W as i32 - 2, 1),
    (1, GRID_H as i32 - 2),
    (GRID_W as i32 - 2, GRID_H as i32 - 2),
];

/// Places one power pellet near each corner (nearest open cell within
/// [`POWER_PELLET_SEARCH_RADIUS`]), then a normal pellet on every other
/// open, non-house, non-tunnel-band cell except the Pac-Man spawn.
pub fn place(builder: &GridBuilder) -> (Vec<bool>, Vec<(i32, i32)>) {
    let power_pellets: Vec<(i32, i32)> = CORNERS
        .iter()
        .filter_map(|&corner| nearest_open(builder, corner))
        .collect();

    let mut pellets = vec![false; GRID_W * GRID_H];
    for y in 0..GRID_H as i32 {
        for x in 0..GRID_W as i32 {
            if builder.is_wall(x, y) {
                continue;
            }
            if in_ghost_house(x, y) || is_tunnel_band(x, y) {
                continue;
            }
            if (x, y) == PACMAN_SPAWN {
                continue;
            }
            if power_pellets.contains(&(x, y)) {
                continue;
            }
            pellets[y as usize * GRID_W + x as usize] = true;
        }
    }
    (pellets, power_pellets)
}

fn is_tunnel_band(x: i32, y: i32) -> bool {
    y == TUNNEL_ROW as i32 && !in_ghost_house(x, y)
}

fn nearest_open(builder: &GridBuilder, (cx, cy): (i32, i32)) -> Option<(i32, i32)> {
    let mut best: Option<((i32, i32), i32)> = None;
    for dy in -POWER_PELLET_SEARCH_RADIUS..=POWER_PELLET_SEARCH_RADIUS {
        for dx in -POWER_PELLET_SEARCH_RADIUS..=POWER_PELLET_SEARCH_RADIUS {
            let (x, y) = (cx + dx, cy + dy);
            if builder.is_wall(x, y) {
                continue;
            }
            let dist = dx.abs() + dy.abs();
            let better = match best {
                Some((_, best_dist)) => dist < best_dist,
                None => true,
            };
            if better {
                best = Some(((x, y), dist));
            }
        }
    }
    best.map(|(cell, _)| cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed;
    use crate::variant::MazeVariant;

    #[test]
    fn places_at_most_one_power_pellet_per_corner() {
        let builder = fixed::build(MazeVariant::Classic);
        let (_, power) = place(&builder);
        assert!(power.len() <= 4);
        let unique: std::collections::HashSet<_> = power.iter().collect();
        assert_eq!(unique.len(), power.len());
    }

    #[test]
    fn never_places_a_pellet_on_the_spawn_or_in_the_house() {
        let builder = fixed::build(MazeVariant::Fortress);
        let (pellets, _) = place(&builder);
        let (sx, sy) = PACMAN_SPAWN;
        assert!(!pellets[sy as usize * GRID_W + sx as usize]);
        for y in 12..=15 {
            for x in 10..=17 {
                assert!(!pellets[y as usize * GRID_W + x as usize]);
            }
        }
    }
}
