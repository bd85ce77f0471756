use crate::grid::GridBuilder;
use crate::variant::MazeVariant;
use pm_core::GRID_H;
use pm_core::GRID_W;

/// Punches single-cell wall pillars into the interior at every `(x, y)`
/// with `x % x_mod == x_rem` and `y % y_mod == y_rem`. Choosing moduli of 2
/// or more keeps every pillar orthogonally isolated from its neighbors, so
/// no placement can ever wall off a pocket of the grid — connectivity holds
/// by construction, no BFS reconnect needed.
fn stipple(builder: &mut GridBuilder, x_mod: i32, x_rem: i32, y_mod: i32, y_rem: i32) {
    for y in 2..(GRID_H as i32 - 2) {
        for x in 2..(GRID_W as i32 - 2) {
            if x % x_mod == x_rem && y % y_mod == y_rem {
                builder.set_wall(x, y);
            }
        }
    }
}

/// Builds one of the four fixed layouts. Unlike [`crate::procedural`], these
/// ignore the seed entirely: the name alone determines the result.
pub fn build(variant: MazeVariant) -> GridBuilder {
    let mut builder = GridBuilder::all_open();
    match variant {
        MazeVariant::Classic => stipple(&mut builder, 2, 0, 3, 0),
        MazeVariant::Labyrinth => stipple(&mut builder, 3, 0, 4, 1),
        MazeVariant::Speedway => stipple(&mut builder, 4, 0, 5, 2),
        MazeVariant::Fortress => stipple(&mut builder, 2, 0, 2, 0),
        MazeVariant::Random => unreachable!("fixed::build is never called for Random"),
    }
    builder.force_outer_walls();
    builder.carve_ghost_house();
    builder.carve_pacman_pocket();
    builder.carve_tunnel();
    builder.reconnect_components();
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::in_bounds;

    fn fixed_variants() -> [MazeVariant; 4] {
        [
            MazeVariant::Classic,
            MazeVariant::Labyrinth,
            MazeVariant::Speedway,
            MazeVariant::Fortress,
        ]
    }

    #[test]
    fn border_is_always_wall() {
        for variant in fixed_variants() {
            let builder = build(variant);
            for x in 0..GRID_W as i32 {
                assert!(builder.is_wall(x, 0));
                assert!(builder.is_wall(x, GRID_H as i32 - 1));
            }
            for y in 0..GRID_H as i32 {
                assert!(builder.is_wall(0, y));
                assert!(builder.is_wall(GRID_W as i32 - 1, y));
            }
        }
    }

    #[test]
    fn single_connected_component() {
        for variant in fixed_variants() {
            let builder = build(variant);
            assert!(builder.is_fully_connected(), "{variant} is not fully connected");
        }
    }

    #[test]
    fn deterministic_and_ignores_nothing_external() {
        for variant in fixed_variants() {
            let a = build(variant);
            let b = build(variant);
            assert_eq!(a.walls, b.walls);
        }
    }

    #[test]
    fn out_of_bounds_is_always_wall_shaped() {
        assert!(!in_bounds(-1, 5));
        assert!(!in_bounds(GRID_W as i32, 5));
    }
}
