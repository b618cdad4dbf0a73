//! Slash command parsing for the REPL.

use std::str::FromStr;

use treehole_core::post::Mood;

pub const COMMANDS: [&str; 8] = [
    "/home", "/saved", "/post", "/like", "/save", "/comment", "/moods", "/help",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Home,
    Saved,
    Post { mood: Mood, text: String },
    Like(usize),
    Save(usize),
    Comment { index: usize, text: String },
    Moods,
    Help,
    Quit,
}

/// Parses one input line.
///
/// Post indexes are 1-based positions in the currently listed view. Text
/// arguments keep their inner spacing. Returns a usage message on failure.
pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    if line == "quit" || line == "exit" {
        return Ok(Command::Quit);
    }

    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    match name {
        "/home" => Ok(Command::Home),
        "/saved" => Ok(Command::Saved),
        "/moods" => Ok(Command::Moods),
        "/help" => Ok(Command::Help),
        "/like" => parse_index(rest, "/like <n>").map(Command::Like),
        "/save" => parse_index(rest, "/save <n>").map(Command::Save),
        "/comment" => {
            let (index, text) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "Usage: /comment <n> <text>".to_string())?;
            Ok(Command::Comment {
                index: parse_index(index, "/comment <n> <text>")?,
                text: text.trim().to_string(),
            })
        }
        "/post" => {
            let usage = "Usage: /post <mood> <text>  (see /moods)";
            let (mood, text) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| usage.to_string())?;
            let mood = Mood::from_str(mood).map_err(|_| format!("Unknown mood '{mood}'. {usage}"))?;
            Ok(Command::Post {
                mood,
                text: text.trim().to_string(),
            })
        }
        other => Err(format!("Unknown command '{other}'. Type /help for commands.")),
    }
}

fn parse_index(raw: &str, usage: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("Usage: {usage}  (n is the number shown in the list)")),
    }
}
