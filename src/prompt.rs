//! Prompts displayed to the user to gather input.

use anyhow::Result;
use anyhow::bail;
use srs_engine::ReviewOutcome;
use std::io::{Write, stdin, stdout};
use termion::clear;
use termion::event::{Event, Key};
use termion::input::TermRead;
use termion::raw::IntoRawMode;

/// Displays the given prompt and waits for a yes / no answer. Yes maps to true, and no maps to
/// false.
pub fn binary(prompt: impl AsRef<str>) -> Result<bool> {
    choose(
        format!("{} [y/n] ", prompt.as_ref()),
        &[('y', true, "yes"), ('n', false, "no")],
    )
}

/// Asks how the card was recalled: r for remembered, f for forgot, u for unknown.
pub fn outcome(prompt: impl AsRef<str>) -> Result<ReviewOutcome> {
    choose(
        prompt,
        &[
            ('r', ReviewOutcome::Remembered, "remembered"),
            ('f', ReviewOutcome::Forgot, "forgot"),
            ('u', ReviewOutcome::Unknown, "unknown"),
        ],
    )
}

/// Displays the given prompt and waits until a key is pressed.
pub fn any(prompt: impl AsRef<str>) -> Result<()> {
    let mut stdout = stdout().into_raw_mode()?;
    write!(stdout, "{}", prompt.as_ref())?;
    stdout.flush()?;

    let stdin = stdin();

    for event in stdin.events() {
        match event? {
            Event::Key(Key::Ctrl('c')) => {
                write!(stdout, "\r\n")?;
                stdout.flush()?;

                bail!("Exiting instead of continuing...")
            }
            Event::Key(_) => break,
            _ => continue,
        }
    }

    write!(stdout, "\r{}", clear::AfterCursor)?;
    stdout.flush()?;

    Ok(())
}

/// Waits for one of the keys in `choices` and echoes its label. q and ctrl-c abort.
fn choose<T: Copy>(prompt: impl AsRef<str>, choices: &[(char, T, &str)]) -> Result<T> {
    let mut stdout = stdout().into_raw_mode()?;
    write!(stdout, "{}", prompt.as_ref())?;
    stdout.flush()?;

    let stdin = stdin();

    for event in stdin.events() {
        let key = match event? {
            Event::Key(Key::Char('q')) | Event::Key(Key::Ctrl('c')) => {
                write!(stdout, "\r\n")?;
                stdout.flush()?;

                bail!("Exiting instead of answering...")
            }
            Event::Key(Key::Char(key)) => key,
            _ => continue,
        };

        let Some((_, selection, label)) = choices.iter().find(|(c, _, _)| *c == key) else {
            continue;
        };

        write!(stdout, "{label}\r\n")?;
        stdout.flush()?;

        return Ok(*selection);
    }

    bail!("Input closed before an answer was given")
}
