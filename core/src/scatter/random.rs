use super::*;

/// Uniform placement by rejection sampling: draws random playable coordinates
/// and skips any cell that already holds a mine, until the requested count is
/// reached.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomScatterer {
    seed: u64,
}

impl RandomScatterer {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineScatterer for RandomScatterer {
    fn scatter(self, hidden: &mut Board, mines: CellCount) {
        use rand::prelude::*;

        let size = hidden.size();
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut placed = 0;
        while placed < mines {
            let row = rng.random_range(0..size);
            let col = rng.random_range(FIRST_PLAYABLE_COL..size);
            if hidden[(row, col)] != Cell::Mine {
                hidden[(row, col)] = Cell::Mine;
                placed += 1;
            }
        }
        log::debug!("scattered {} mines with seed {}", placed, self.seed);
    }
}
