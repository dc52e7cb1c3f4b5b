use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};

use crate::*;

/// Valid transitions: InProgress -> Won, InProgress -> Lost. Terminal states
/// never change again.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameOutcome {
    InProgress,
    Won,
    Lost,
}

impl GameOutcome {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameOutcome {
    fn default() -> Self {
        Self::InProgress
    }
}

/// Represents a game from start to finish: both boards, the flag budget, and
/// the turn-resolution state machine. Owned by the caller's loop, mutated
/// only through `resolve` and the per-action methods.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    config: GameConfig,
    visible: Board,
    hidden: Board,
    revealed_count: CellCount,
    flags_left: CellCount,
    outcome: GameOutcome,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl Game {
    /// Builds the board pair and scatters mines with the given strategy.
    pub fn new(config: GameConfig, scatterer: impl MineScatterer) -> Game {
        let (visible, mut hidden) = Board::labeled_pair(config.size);
        scatterer.scatter(&mut hidden, config.mines);
        Self::from_boards(config, visible, hidden)
    }

    /// Deterministic constructor with explicit mine positions.
    pub fn from_mine_coords(size: Coord, mine_coords: &[Coord2]) -> Result<Game> {
        let (visible, mut hidden) = Board::labeled_pair(size);
        for &coords in mine_coords {
            let coords = hidden.validate_coords(coords)?;
            hidden[coords] = Cell::Mine;
        }
        let mines = hidden.mine_cells();
        let config = GameConfig::new_unchecked(size, mines);
        Ok(Self::from_boards(config, visible, hidden))
    }

    fn from_boards(config: GameConfig, visible: Board, hidden: Board) -> Game {
        Game {
            config,
            visible,
            hidden,
            revealed_count: 0,
            flags_left: config.mines,
            outcome: GameOutcome::InProgress,
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_finished()
    }

    pub fn visible_board(&self) -> &Board {
        &self.visible
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.visible[coords]
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines
    }

    /// Flags still available to place.
    pub fn flags_left(&self) -> CellCount {
        self.flags_left
    }

    pub fn revealed_cells(&self) -> CellCount {
        self.revealed_count
    }

    /// Seconds since the game was created, frozen once it ends.
    pub fn elapsed_secs(&self) -> u32 {
        (self.ended_at.unwrap_or_else(Utc::now) - self.started_at)
            .num_seconds()
            .max(0) as u32
    }

    /// Resolves one full turn: validates the coordinate, dispatches the
    /// action, applies it, and re-checks the game status.
    pub fn resolve(&mut self, action: Action, coords: Coord2) -> Result<TurnOutcome> {
        match action {
            Action::Discover => self.discover(coords).map(TurnOutcome::Reveal),
            Action::Flag => self.flag(coords).map(TurnOutcome::Mark),
            Action::Unflag => self.unflag(coords).map(TurnOutcome::Mark),
        }
    }

    /// Discover a cell: flagged cells are inert, mines detonate and lose the
    /// game immediately, safe unrevealed cells flood-fill.
    pub fn discover(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        use RevealOutcome::*;

        let coords = self.visible.validate_coords(coords)?;
        self.check_in_progress()?;

        match (self.visible[coords], self.hidden[coords]) {
            (Cell::Flagged, _) => Ok(NoChange),
            (_, Cell::Mine) => {
                self.visible[coords] = Cell::Detonated;
                self.hidden[coords] = Cell::Detonated;
                log::debug!("mine detonated at {:?}", coords);
                self.end_game(GameOutcome::Lost);
                Ok(HitMine)
            }
            (Cell::Unrevealed, _) => {
                self.reveal(coords);
                if self.revealed_count == self.config.safe_cells() {
                    self.end_game(GameOutcome::Won);
                    Ok(Won)
                } else {
                    Ok(Revealed)
                }
            }
            _ => Ok(NoChange),
        }
    }

    /// Place a flag. Fails with `FlagBudgetExhausted` when the budget is
    /// spent; the board is untouched on every error path.
    pub fn flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        use MarkOutcome::*;

        let coords = self.visible.validate_coords(coords)?;
        self.check_in_progress()?;

        match self.visible[coords] {
            Cell::Unrevealed if self.flags_left > 0 => {
                self.visible[coords] = Cell::Flagged;
                self.flags_left -= 1;
                Ok(Changed)
            }
            Cell::Unrevealed => Err(GameError::FlagBudgetExhausted),
            _ => Ok(NoChange),
        }
    }

    /// Remove a flag, restoring the budget.
    pub fn unflag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        use MarkOutcome::*;

        let coords = self.visible.validate_coords(coords)?;
        self.check_in_progress()?;

        match self.visible[coords] {
            Cell::Flagged => {
                self.visible[coords] = Cell::Unrevealed;
                self.flags_left += 1;
                Ok(Changed)
            }
            _ => Ok(NoChange),
        }
    }

    /// Flood fill as an explicit worklist; recursion depth on large boards is
    /// why this is iterative. Each cell leaves `Unrevealed` at most once, so
    /// the traversal terminates within the board area.
    fn reveal(&mut self, coords: Coord2) {
        let mut visited: BTreeSet<Coord2> = BTreeSet::new();
        let mut to_visit = VecDeque::from([coords]);

        while let Some(visit_coords) = to_visit.pop_front() {
            if !visited.insert(visit_coords) {
                continue;
            }

            // guards flagged and already-revealed cells, and halts expansion
            if !matches!(self.visible[visit_coords], Cell::Unrevealed) {
                continue;
            }

            let adjacent_mines = self.hidden.adjacent_mines(visit_coords);
            let revealed = if adjacent_mines > 0 {
                Cell::RevealedCount(adjacent_mines)
            } else {
                Cell::RevealedBlank
            };
            self.visible[visit_coords] = revealed;
            self.hidden[visit_coords] = revealed;
            self.revealed_count += 1;
            log::trace!(
                "revealed {:?}, adjacent mines: {}",
                visit_coords,
                adjacent_mines
            );

            if adjacent_mines == 0 {
                to_visit.extend(
                    self.hidden
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| matches!(self.visible[pos], Cell::Unrevealed))
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }

    fn end_game(&mut self, outcome: GameOutcome) {
        if self.outcome.is_finished() {
            return;
        }
        self.outcome = outcome;
        self.ended_at.replace(Utc::now());
        log::debug!("game ended {:?} after {}s", outcome, self.elapsed_secs());
        self.reconcile_flags();
    }

    /// Annotates the hidden board with flag outcomes: a flag on a mine
    /// becomes `CorrectFlag`, a flag on a safe cell stays `Flagged` to show
    /// it was misplaced. The visible board is left untouched.
    fn reconcile_flags(&mut self) {
        for coords in self.hidden.playable_coords().collect::<Vec<_>>() {
            if self.visible[coords] != Cell::Flagged {
                continue;
            }
            self.hidden[coords] = if self.hidden[coords] == Cell::Mine {
                Cell::CorrectFlag
            } else {
                Cell::Flagged
            };
        }
    }

    /// The reconciled hidden board, available once the game has ended.
    pub fn final_board(&self) -> Option<&Board> {
        self.outcome.is_finished().then_some(&self.hidden)
    }

    fn check_in_progress(&self) -> Result<()> {
        if self.outcome.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(size: Coord, mines: &[Coord2]) -> Game {
        Game::from_mine_coords(size, mines).unwrap()
    }

    /// 18 mines on a size-13 board, including one at (2, 3).
    fn scenario_13x13() -> Game {
        let mut mines = vec![(2, 3)];
        mines.extend((1..=9).map(|col| (12, col)));
        mines.extend((1..=8).map(|col| (11, col)));
        game(13, &mines)
    }

    #[test]
    fn discovering_a_mine_detonates_and_loses() {
        let mut game = scenario_13x13();
        assert_eq!(game.total_mines(), 18);

        let outcome = game.discover((2, 3)).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(game.outcome(), GameOutcome::Lost);
        assert_eq!(game.cell_at((2, 3)), Cell::Detonated);
        assert_eq!(game.final_board().unwrap()[(2, 3)], Cell::Detonated);
    }

    #[test]
    fn loss_is_immediate_even_with_flags_remaining() {
        let mut game = scenario_13x13();
        game.flag((5, 5)).unwrap();
        assert!(game.flags_left() > 0);

        assert_eq!(game.discover((2, 3)).unwrap(), RevealOutcome::HitMine);
        assert_eq!(game.outcome(), GameOutcome::Lost);
    }

    #[test]
    fn no_moves_accepted_after_the_game_ends() {
        let mut game = scenario_13x13();
        game.discover((2, 3)).unwrap();

        assert_eq!(game.discover((5, 5)), Err(GameError::AlreadyEnded));
        assert_eq!(game.flag((5, 5)), Err(GameError::AlreadyEnded));
        assert_eq!(
            game.resolve(Action::Unflag, (5, 5)),
            Err(GameError::AlreadyEnded)
        );
    }

    #[test]
    fn revealing_all_safe_cells_wins() {
        // size 4 including the label column: 12 playable cells, 1 mine
        let mut game = game(4, &[(1, 2)]);
        let safe_cells = game.config().safe_cells();

        let mut outcome = RevealOutcome::NoChange;
        for coords in game.visible_board().playable_coords().collect::<Vec<_>>() {
            if coords == (1, 2) {
                continue;
            }
            outcome = game.discover(coords).unwrap();
            if outcome == RevealOutcome::Won {
                break;
            }
        }

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(game.outcome(), GameOutcome::Won);
        assert_eq!(game.revealed_cells(), safe_cells);
        assert_eq!(safe_cells, 11);
    }

    #[test]
    fn win_condition_matches_the_pure_board_count() {
        let mut game = game(4, &[(0, 1)]);
        game.discover((3, 3)).unwrap();

        assert_eq!(game.revealed_cells(), game.visible_board().revealed_cells());
    }

    #[test]
    fn flood_fill_opens_the_zero_region_and_its_border() {
        // single mine in a corner: everything else is one connected region
        let mut game = game(5, &[(0, 1)]);

        let outcome = game.discover((4, 4)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(game.cell_at((4, 4)), Cell::RevealedBlank);
        assert_eq!(game.cell_at((0, 2)), Cell::RevealedCount(1));
        assert_eq!(game.cell_at((1, 1)), Cell::RevealedCount(1));
        assert_eq!(game.cell_at((1, 2)), Cell::RevealedCount(1));
        assert_eq!(game.cell_at((2, 1)), Cell::RevealedBlank);
        // the mine itself stays unrevealed on the visible board
        assert_eq!(game.cell_at((0, 1)), Cell::Unrevealed);
    }

    #[test]
    fn flood_fill_writes_both_boards_in_lockstep() {
        let mut game = game(5, &[(0, 1), (4, 1)]);
        game.discover((2, 4)).unwrap();

        for coords in game.visible_board().playable_coords().collect::<Vec<_>>() {
            let visible = game.cell_at(coords);
            if visible.is_revealed() {
                assert_eq!(game.hidden[coords], visible);
            }
        }
    }

    #[test]
    fn reveal_is_idempotent() {
        // (2, 2) borders the mine, so a single numbered cell is revealed
        let mut game = game(5, &[(1, 2)]);
        game.discover((2, 2)).unwrap();
        let snapshot = game.visible_board().clone();
        let revealed = game.revealed_cells();

        assert_eq!(game.discover((2, 2)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(game.visible_board(), &snapshot);
        assert_eq!(game.revealed_cells(), revealed);
    }

    #[test]
    fn flood_fill_stops_at_flagged_cells() {
        let mut game = game(5, &[(0, 1)]);
        game.flag((2, 2)).unwrap();
        game.discover((4, 4)).unwrap();

        assert_eq!(game.cell_at((2, 2)), Cell::Flagged);
        // the flag blocked one safe cell, so the game is still in progress
        assert_eq!(game.outcome(), GameOutcome::InProgress);
    }

    #[test]
    fn discovering_a_flagged_cell_is_a_no_op() {
        let mut game = game(4, &[(1, 2)]);
        game.flag((1, 2)).unwrap();

        assert_eq!(game.discover((1, 2)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(game.cell_at((1, 2)), Cell::Flagged);
        assert_eq!(game.outcome(), GameOutcome::InProgress);
    }

    #[test]
    fn flag_budget_invariant_holds_across_sequences() {
        let mut game = scenario_13x13();
        let total = game.total_mines();

        game.flag((0, 1)).unwrap();
        game.flag((0, 2)).unwrap();
        game.unflag((0, 1)).unwrap();
        game.flag((5, 7)).unwrap();

        let flagged = game.visible_board().flagged_cells();
        assert_eq!(game.flags_left() + flagged, total);
    }

    #[test]
    fn flag_then_unflag_restores_the_cell_and_budget() {
        let mut game = scenario_13x13();
        let budget = game.flags_left();

        game.flag((4, 4)).unwrap();
        assert_eq!(game.cell_at((4, 4)), Cell::Flagged);
        assert_eq!(game.flags_left(), budget - 1);

        game.unflag((4, 4)).unwrap();
        assert_eq!(game.cell_at((4, 4)), Cell::Unrevealed);
        assert_eq!(game.flags_left(), budget);
    }

    #[test]
    fn exhausted_flag_budget_is_an_error_and_leaves_the_board_alone() {
        let mut game = game(4, &[(1, 2)]);
        assert_eq!(game.total_mines(), 1);
        game.flag((0, 1)).unwrap();

        let snapshot = game.visible_board().clone();
        assert_eq!(game.flag((2, 2)), Err(GameError::FlagBudgetExhausted));
        assert_eq!(game.visible_board(), &snapshot);
        assert_eq!(game.flags_left(), 0);
    }

    #[test]
    fn flagging_a_flagged_or_revealed_cell_is_a_no_op() {
        let mut game = scenario_13x13();
        game.flag((0, 1)).unwrap();
        assert_eq!(game.flag((0, 1)).unwrap(), MarkOutcome::NoChange);

        game.discover((5, 5)).unwrap();
        assert_eq!(game.flag((5, 5)).unwrap(), MarkOutcome::NoChange);
        assert_eq!(game.unflag((5, 5)).unwrap(), MarkOutcome::NoChange);
    }

    #[test]
    fn unflagging_an_unrevealed_cell_is_a_no_op() {
        let mut game = scenario_13x13();
        let budget = game.flags_left();
        assert_eq!(game.unflag((3, 3)).unwrap(), MarkOutcome::NoChange);
        assert_eq!(game.flags_left(), budget);
    }

    #[test]
    fn out_of_bounds_turns_are_rejected_without_mutation() {
        let mut game = scenario_13x13();
        let snapshot = game.clone();

        assert_eq!(
            game.resolve(Action::Discover, (2, 0)),
            Err(GameError::OutOfBounds)
        );
        assert_eq!(
            game.resolve(Action::Flag, (13, 1)),
            Err(GameError::OutOfBounds)
        );
        assert_eq!(game, snapshot);
    }

    #[test]
    fn reconciler_annotates_each_flag_independently() {
        let mut game = game(5, &[(0, 1), (0, 3)]);
        game.flag((0, 1)).unwrap(); // correct: sits on a mine
        game.flag((2, 2)).unwrap(); // incorrect: safe cell

        game.discover((0, 3)).unwrap();
        assert_eq!(game.outcome(), GameOutcome::Lost);

        let final_board = game.final_board().unwrap();
        assert_eq!(final_board[(0, 1)], Cell::CorrectFlag);
        assert_eq!(final_board[(2, 2)], Cell::Flagged);
        // unflagged mines stay visible as mines on the final board
        assert_eq!(final_board[(0, 3)], Cell::Detonated);
        // the visible board is untouched by reconciliation
        assert_eq!(game.cell_at((0, 1)), Cell::Flagged);
        assert_eq!(game.cell_at((2, 2)), Cell::Flagged);
    }

    #[test]
    fn final_board_is_unavailable_while_in_progress() {
        let game = scenario_13x13();
        assert!(game.final_board().is_none());
    }

    #[test]
    fn resolve_dispatches_every_action() {
        let mut game = scenario_13x13();

        assert_eq!(
            game.resolve(Action::Flag, (0, 1)).unwrap(),
            TurnOutcome::Mark(MarkOutcome::Changed)
        );
        assert_eq!(
            game.resolve(Action::Unflag, (0, 1)).unwrap(),
            TurnOutcome::Mark(MarkOutcome::Changed)
        );
        // (3, 3) borders the mine at (2, 3), so no flood fill cascades
        assert_eq!(
            game.resolve(Action::Discover, (3, 3)).unwrap(),
            TurnOutcome::Reveal(RevealOutcome::Revealed)
        );
    }

    #[test]
    fn game_state_round_trips_through_serde() {
        let mut game = scenario_13x13();
        game.flag((0, 1)).unwrap();
        game.discover((5, 5)).unwrap();

        let encoded = serde_json::to_string(&game).unwrap();
        let decoded: Game = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, game);
    }
}
