//! Slash command parsing.

use std::path::PathBuf;
use strum::IntoEnumIterator;
use studybro_core::doubt::{ExplanationMode, Language};

/// Names offered for completion and hints.
pub const COMMAND_NAMES: &[&str] = &[
    "/avatar",
    "/chat",
    "/class",
    "/clear-history",
    "/diagram",
    "/help",
    "/history",
    "/image",
    "/lang",
    "/load",
    "/mode",
    "/name",
    "/profile",
    "/quit",
    "/save-diagram",
    "/solve",
    "/status",
    "/video",
];

pub const HELP_TEXT: &str = "\
Type a question and press Enter to solve it.

  /class <name>          set the class, e.g. /class Class 7
  /lang <language>       bengali, english or banglish
  /mode <mode>           normal, eli10 or exam
  /image <file>          attach a photo of the question
  /image clear           remove the attached photo
  /solve                 send the attached photo and current question
  /diagram               draw a diagram for the current answer
  /save-diagram <file>   write the last diagram to a file
  /video                 make a short video for the current answer
  /history               list past doubts
  /load <n|id>           reopen a past doubt
  /clear-history         delete all past doubts
  /chat <message>        ask a follow-up question
  /profile               show your profile
  /name <name>           change your display name
  /avatar <file|clear>   set or remove your profile picture
  /status                show the current session
  /help                  show this help
  /quit                  exit";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    Solve,
    Class(String),
    Lang(Language),
    Mode(ExplanationMode),
    AttachImage(PathBuf),
    RemoveImage,
    Diagram,
    SaveDiagram(PathBuf),
    Video,
    History,
    Load(String),
    ClearHistory,
    Chat(String),
    Profile,
    Name(String),
    SetAvatar(PathBuf),
    RemoveAvatar,
    Status,
    Help,
    Quit,
}

impl Command {
    /// Parses a trimmed, non-empty line. Anything without a leading `/` is a
    /// question.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        if !line.starts_with('/') {
            return Ok(Command::Ask(line.to_string()));
        }

        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };

        let command = match name {
            "/class" => Command::Class(required(name, arg, "a class name")?),
            "/lang" => Command::Lang(
                required(name, arg, "a language")?
                    .parse()
                    .map_err(|_| format!("unknown language '{arg}', try {}", language_choices()))?,
            ),
            "/mode" => Command::Mode(
                required(name, arg, "a mode")?
                    .parse()
                    .map_err(|_| format!("unknown mode '{arg}', try normal, eli10 or exam"))?,
            ),
            "/image" if arg == "clear" => Command::RemoveImage,
            "/image" => Command::AttachImage(required(name, arg, "an image file")?.into()),
            "/solve" => Command::Solve,
            "/diagram" => Command::Diagram,
            "/save-diagram" => Command::SaveDiagram(required(name, arg, "a file name")?.into()),
            "/video" => Command::Video,
            "/history" => Command::History,
            "/load" => Command::Load(required(name, arg, "a number or id")?),
            "/clear-history" => Command::ClearHistory,
            "/chat" => Command::Chat(required(name, arg, "a message")?),
            "/profile" => Command::Profile,
            "/name" => Command::Name(required(name, arg, "a name")?),
            "/avatar" if arg == "clear" => Command::RemoveAvatar,
            "/avatar" => Command::SetAvatar(required(name, arg, "an image file")?.into()),
            "/status" => Command::Status,
            "/help" => Command::Help,
            "/quit" | "/exit" => Command::Quit,
            _ => return Err(format!("unknown command '{name}', try /help")),
        };
        Ok(command)
    }
}

fn language_choices() -> String {
    Language::iter()
        .map(|language| language.to_string().to_lowercase())
        .collect::<Vec<_>>()
        .join(", ")
}

fn required(name: &str, arg: &str, what: &str) -> Result<String, String> {
    if arg.is_empty() {
        Err(format!("{name} needs {what}"))
    } else {
        Ok(arg.to_string())
    }
}
