//! Interactive command parsing.
//!
//! Lines starting with `/` are commands; anything else is a study request
//! passed to [`Session::submit`](crate::session::Session::submit).

use crate::catalog::Doctrine;

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Text to submit as a turn.
    Ask(String),
    /// Blank line.
    Empty,
    NewChat,
    /// Switch model; `None` shows the current one.
    Model(Option<String>),
    ListModels,
    /// Set the completion budget; `None` shows the choices.
    Tokens(Option<u32>),
    /// Set the doctrine; `None` shows the current one.
    Doctrine(Option<Doctrine>),
    /// Set the Bible version; `None` shows the current one.
    Bible(Option<String>),
    History,
    Usage,
    Help,
    Quit,
    /// A command that could not be understood, with the reason.
    Invalid(String),
}

/// Parse one input line.
pub fn parse(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Ask(line.to_string());
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (rest, None),
    };

    match name.to_lowercase().as_str() {
        "new" | "clear" => Command::NewChat,
        "model" => Command::Model(arg.map(str::to_string)),
        "models" => Command::ListModels,
        "tokens" | "max-tokens" => match arg.map(str::parse::<u32>) {
            None => Command::Tokens(None),
            Some(Ok(n)) => Command::Tokens(Some(n)),
            Some(Err(_)) => Command::Invalid(format!("not a number: {}", arg.unwrap_or(""))),
        },
        "doctrine" => match arg.map(str::parse::<Doctrine>) {
            None => Command::Doctrine(None),
            Some(Ok(d)) => Command::Doctrine(Some(d)),
            Some(Err(e)) => Command::Invalid(e.to_string()),
        },
        "bible" => Command::Bible(arg.map(str::to_string)),
        "history" => Command::History,
        "usage" => Command::Usage,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => Command::Invalid(format!("unknown command: /{other} (try /help)")),
    }
}

/// Help text listing every command.
pub fn help_text() -> &'static str {
    "\
Type a Bible reference (John 3:16), a name (Melchizedek), or a keyword.

Commands:
  /new               start a new chat
  /model [id]        show or switch the model (switching starts a new chat)
  /models            list available models
  /tokens [n]        show or set max completion tokens
  /doctrine [name]   show or set the doctrine (sunday, sda)
  /bible [version]   show or set the Bible version
  /history           show the conversation so far
  /usage             show token usage for this chat
  /help              show this help
  /quit              exit"
}
