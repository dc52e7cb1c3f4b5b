use std::io::{self, Write};

use buscaminas_core::{Board, Cell, Game, GameOutcome};
use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

const BANNER: &str = r"
 ___  _   _  ___   ___    _    __  __  ___  _  _    _    ___
| _ )| | | |/ __| / __|  /_\  |  \/  ||_ _|| \| |  /_\  / __|
| _ \| |_| |\__ \| (__  / _ \ | |\/| | | | | .` | / _ \ \__ \
|___/ \___/ |___/ \___|/_/ \_\|_|  |_||___||_|\_|/_/ \_\|___/
";

/// Clears the terminal and redraws the full in-progress view: banner,
/// header row, visible board, and the remaining-flags line.
pub fn draw(game: &Game) -> io::Result<()> {
    let mut stdout = io::stdout();

    queue!(stdout, cursor::MoveTo(0, 0), Clear(ClearType::All))?;
    queue!(
        stdout,
        SetForegroundColor(Color::Red),
        Print(BANNER),
        Print("\n"),
        ResetColor
    )?;
    queue_header(&mut stdout, game)?;
    queue_board(&mut stdout, game.visible_board())?;
    queue!(
        stdout,
        SetForegroundColor(Color::Yellow),
        Print("flags left:"),
        ResetColor,
        Print(format!(" {}\n", game.flags_left()))
    )?;
    stdout.flush()
}

/// Draws the end-of-game view: the reconciled board with every flag judged,
/// the result banner, and the elapsed time.
pub fn draw_final(game: &Game) -> io::Result<()> {
    let mut stdout = io::stdout();

    queue_header(&mut stdout, game)?;
    if let Some(board) = game.final_board() {
        queue_board(&mut stdout, board)?;
    }

    let (color, verdict) = match game.outcome() {
        GameOutcome::Won => (Color::Green, "YOU WIN"),
        _ => (Color::Red, "YOU LOSE"),
    };
    queue!(
        stdout,
        SetForegroundColor(color),
        Print(format!(
            "+++++++++++++++++++++++ {} +++++++++++++++++++++++\n",
            verdict
        )),
        ResetColor,
        Print(format!("finished in {}s\n", game.elapsed_secs()))
    )?;
    stdout.flush()
}

pub fn error(message: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    queue!(
        stdout,
        SetForegroundColor(Color::Red),
        Print(message),
        Print("\n"),
        ResetColor
    )?;
    stdout.flush()
}

/// Face cell plus the column numbers, aligned to the two-column cell width.
fn queue_header(stdout: &mut impl Write, game: &Game) -> io::Result<()> {
    queue!(stdout, SetForegroundColor(Color::Red), Print(face(game)))?;
    for col in 1..game.config().size {
        queue!(stdout, Print(format!("{col:>2}")))?;
    }
    queue!(stdout, Print("\n"), ResetColor)
}

fn queue_board(stdout: &mut impl Write, board: &Board) -> io::Result<()> {
    for row in board.rows() {
        for &cell in row {
            queue!(stdout, Print(glyph(cell)))?;
        }
        queue!(stdout, Print("\n"))?;
    }
    Ok(())
}

fn face(game: &Game) -> &'static str {
    match game.outcome() {
        GameOutcome::InProgress => "😐",
        GameOutcome::Won => "🤩",
        GameOutcome::Lost => "😵",
    }
}

/// Every glyph is two columns wide so the grid stays square next to the
/// double-width emoji.
fn glyph(cell: Cell) -> String {
    match cell {
        Cell::Label(letter) => format!("{letter} "),
        Cell::Unrevealed => "⬛".to_string(),
        Cell::Flagged => "🚩".to_string(),
        Cell::Mine => "💣".to_string(),
        Cell::Detonated => "💥".to_string(),
        Cell::CorrectFlag => "✅".to_string(),
        Cell::RevealedBlank => "  ".to_string(),
        Cell::RevealedCount(count) => format!(" {count}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyphs_cover_every_cell_state() {
        assert_eq!(glyph(Cell::Label('C')), "C ");
        assert_eq!(glyph(Cell::Unrevealed), "⬛");
        assert_eq!(glyph(Cell::Flagged), "🚩");
        assert_eq!(glyph(Cell::Mine), "💣");
        assert_eq!(glyph(Cell::Detonated), "💥");
        assert_eq!(glyph(Cell::CorrectFlag), "✅");
        assert_eq!(glyph(Cell::RevealedBlank), "  ");
        assert_eq!(glyph(Cell::RevealedCount(3)), " 3");
    }

    #[test]
    fn number_glyphs_keep_the_two_column_width() {
        for count in 1..=8 {
            assert_eq!(glyph(Cell::RevealedCount(count)).chars().count(), 2);
        }
    }
}
