//! Terminal command parsing.

use academy_core::error::GameError;
use academy_core::language::Language;

/// One line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `:start NAME` begins a session.
    Start(String),
    /// `:continue` resumes the saved player.
    Continue,
    /// `:intro` shows the briefing.
    Intro,
    /// `:back` returns to the landing screen.
    Back,
    /// `:levels` opens the mission picker.
    Levels,
    /// `:play N` starts mission `N`.
    Play(u32),
    Retry,
    Next,
    /// `:lang CODE` switches language.
    Language(Language),
    Pause,
    Resume,
    /// `:ok` dismisses the presented dialog.
    Dismiss,
    Quit,
    /// Anything not starting with `:` goes to the mounted level.
    Input(String),
}

/// Parses one line.
///
/// # Errors
///
/// Returns `GameError::Validation` for an unknown command or a bad
/// argument.
pub fn parse(line: &str) -> Result<Command, GameError> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(Command::Input(line.to_owned()));
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "start" => Command::Start(arg.to_owned()),
        "continue" => Command::Continue,
        "intro" => Command::Intro,
        "back" => Command::Back,
        "levels" => Command::Levels,
        "play" => Command::Play(arg.parse().map_err(|_| {
            GameError::Validation(format!(":play needs a mission number, got {arg:?}"))
        })?),
        "retry" => Command::Retry,
        "next" => Command::Next,
        "lang" => Command::Language(arg.parse()?),
        "pause" => Command::Pause,
        "resume" => Command::Resume,
        "ok" => Command::Dismiss,
        "quit" | "q" => Command::Quit,
        other => return Err(GameError::Validation(format!("unknown command :{other}"))),
    };
    Ok(command)
}
