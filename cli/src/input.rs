use std::io::{self, BufRead, Write};

use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};

/// Prints a colored prompt and reads one trimmed line from stdin.
pub fn prompt(label: &str) -> io::Result<String> {
    let mut stdout = io::stdout();
    queue!(
        stdout,
        SetForegroundColor(Color::Green),
        Print(label),
        ResetColor
    )?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
