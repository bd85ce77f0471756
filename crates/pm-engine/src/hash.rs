use crate::ghost::Ghost;
use crate::pacman::Pacman;
use sha3::Digest;
use sha3::Keccak256;

/// Computes the replay fingerprint: `keccak256(utf8(canonicalTickString))`
/// (§4.2 step 11, §6), over tick, round, score, lives, Pac-Man's (x, y,
/// dir), the power flags, and each ghost's (x, y, mode) — never progress,
/// speed, or queued direction, since those don't affect the hashed
/// equivalence class in P2.
pub fn state_hash(
    tick: u64,
    round: u32,
    score: u32,
    lives: u8,
    pacman: &Pacman,
    power_active: bool,
    power_timer: u32,
    ghosts: &[Ghost; 4],
) -> [u8; 32] {
    let mut fields = vec![
        tick.to_string(),
        round.to_string(),
        score.to_string(),
        lives.to_string(),
        pacman.x.to_string(),
        pacman.y.to_string(),
        pacman.dir.to_string(),
        (power_active as u8).to_string(),
        power_timer.to_string(),
    ];
    for ghost in ghosts {
        fields.push(ghost.x.to_string());
        fields.push(ghost.y.to_string());
        fields.push(ghost.mode.to_string());
    }
    let canonical = fields.join(",");
    let mut hasher = Keccak256::new();
    hasher.update(canonical.as_bytes());
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pm_core::Direction;
    use pm_core::GhostId;
    use pm_core::GhostMode;

    fn sample_ghosts() -> [Ghost; 4] {
        [
            Ghost {
                id: GhostId::Blinky,
                x: 13,
                y: 13,
                progress: 0.0,
                dir: Direction::Up,
                speed: 8.0,
                mode: GhostMode::Scatter,
            },
            Ghost {
                id: GhostId::Pinky,
                x: 14,
                y: 13,
                progress: 0.0,
                dir: Direction::Up,
                speed: 8.0,
                mode: GhostMode::Scatter,
            },
            Ghost {
                id: GhostId::Inky,
                x: 13,
                y: 14,
                progress: 0.0,
                dir: Direction::Up,
                speed: 8.0,
                mode: GhostMode::Scatter,
            },
            Ghost {
                id: GhostId::Clyde,
                x: 14,
                y: 14,
                progress: 0.0,
                dir: Direction::Up,
                speed: 8.0,
                mode: GhostMode::Scatter,
            },
        ]
    }

    #[test]
    fn same_hashed_fields_produce_the_same_hash() {
        let pacman = Pacman::at_spawn((14, 23));
        let ghosts = sample_ghosts();
        let a = state_hash(10, 1, 50, 3, &pacman, false, 0, &ghosts);
        let b = state_hash(10, 1, 50, 3, &pacman, false, 0, &ghosts);
        assert_eq!(a, b);
    }

    #[test]
    fn progress_and_speed_do_not_affect_the_hash() {
        let mut pacman = Pacman::at_spawn((14, 23));
        let mut ghosts = sample_ghosts();
        let a = state_hash(10, 1, 50, 3, &pacman, false, 0, &ghosts);
        pacman.progress = 0.42;
        ghosts[0].speed = 99.0;
        let b = state_hash(10, 1, 50, 3, &pacman, false, 0, &ghosts);
        assert_eq!(a, b);
    }

    #[test]
    fn differing_score_changes_the_hash() {
        let pacman = Pacman::at_spawn((14, 23));
        let ghosts = sample_ghosts();
        let a = state_hash(10, 1, 50, 3, &pacman, false, 0, &ghosts);
        let b = state_hash(10, 1, 60, 3, &pacman, false, 0, &ghosts);
        assert_ne!(a, b);
    }
}
