use nbpdash_core::types::ServiceId;

/// A line typed on the dashboard's terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `select <id>` or just `<id>`
    Select(ServiceId),
    /// Show the detail currently on screen again
    Detail,
    List,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        Some(match head.to_lowercase().as_str() {
            "select" | "s" if !rest.is_empty() => Command::Select(ServiceId::from(rest)),
            "detail" | "d" => Command::Detail,
            "list" | "ls" => Command::List,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => Command::Select(ServiceId::from(line)),
        })
    }
}

pub const HELP: &str = "\
commands: select <id> | <id> | detail | list | help | quit
ids that read as a command (list, ls, detail, d, help, ?, quit, exit, q) need `select <id>`";
