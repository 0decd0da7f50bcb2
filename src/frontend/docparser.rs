//! Parser for `##` documentation blocks
//!
//! A block is free text followed by declarations:
//!
//! ```text
//! Move the robot. The call blocks until the target is reached.
//!
//! Speed is clamped to the hardware limits.
//! \param target where to go
//! \param speed  in m/s
//! \return the distance travelled
//! \throw MotionError if the path is blocked
//! ```
//!
//! Paragraphs are separated by blank lines; line breaks inside a paragraph become spaces. The brief is the first
//! paragraph up to its first `.`. `\\` produces a literal backslash, so `\\param` is plain text. Any other
//! backslash command is an error.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Param,
    Return,
    Throw,
}

impl Command {
    const ALL: [(&'static str, Command); 3] = [
        ("\\param", Command::Param),
        ("\\return", Command::Return),
        ("\\throw", Command::Throw),
    ];

    fn as_str(self) -> &'static str {
        match self {
            Command::Param => "\\param",
            Command::Return => "\\return",
            Command::Throw => "\\throw",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocError {
    #[error("expected a name after '{0}'")]
    MissingName(&'static str),
    #[error("expected a description after '{0}'")]
    MissingDescription(&'static str),
    #[error("unknown documentation command '{0}'")]
    UnknownCommand(String),
}

/// Structured documentation of one declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Doc {
    pub brief: Option<String>,
    /// Every description paragraph, separated by blank lines.
    pub description: Option<String>,
    /// `(name, description)` in declaration order.
    pub params: Vec<(String, String)>,
    pub ret: Option<String>,
    /// `(exception, description)` in declaration order.
    pub throws: Vec<(String, String)>,
    /// Non-fatal problems (duplicates), already logged.
    pub warnings: Vec<String>,
}

impl Doc {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, d)| d.as_str())
    }

    fn warn(&mut self, message: String) {
        tracing::warn!("{}", message);
        self.warnings.push(message);
    }
}

/// Parse a documentation block.
///
/// # Errors
///
/// A `\param` or `\throw` without a name, any declaration without a description, or a backslash command other than
/// `\param`, `\return` and `\throw`.
pub fn parse_doc(text: &str) -> Result<Doc, DocError> {
    let mut sections = split_commands(text)?.into_iter();
    let mut doc = Doc::default();

    if let Some((_, description)) = sections.next() {
        let paragraphs = paragraphs(&description);
        if let Some(first) = paragraphs.first() {
            let brief = match first.find('.') {
                Some(dot) => &first[..dot],
                None => first.as_str(),
            };
            doc.brief = Some(brief.to_string());
            doc.description = Some(paragraphs.join("\n\n"));
        }
    }

    for (command, body) in sections {
        let Some(command) = command else {
            continue;
        };
        match command {
            Command::Return => {
                let description = described(command, &body)?;
                if doc.ret.is_some() {
                    doc.warn("multiple \\return declaration".to_string());
                } else {
                    doc.ret = Some(description);
                }
            }
            Command::Param | Command::Throw => {
                let body = body.trim_start();
                let (name, rest) = body.split_once(char::is_whitespace).unwrap_or((body, ""));
                if name.is_empty() {
                    return Err(DocError::MissingName(command.as_str()));
                }
                let description = described(command, rest)?;
                let entries = if command == Command::Param {
                    &mut doc.params
                } else {
                    &mut doc.throws
                };
                if entries.iter().any(|(n, _)| n == name) {
                    doc.warn(format!("{} documented multiple times", name));
                } else {
                    entries.push((name.to_string(), description));
                }
            }
        }
    }
    Ok(doc)
}

/// Split `text` at declaration commands; the first section (no command) is the free description.
fn split_commands(text: &str) -> Result<Vec<(Option<Command>, String)>, DocError> {
    let mut sections = vec![(None, String::new())];
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        if let Some(after) = rest.strip_prefix("\\\\") {
            push_char(&mut sections, '\\');
            rest = after;
            continue;
        }
        if let Some((command, after)) = command_at(rest) {
            sections.push((Some(command), String::new()));
            rest = after;
            continue;
        }
        if let Some(unknown) = unknown_command(rest) {
            return Err(DocError::UnknownCommand(unknown));
        }
        push_char(&mut sections, c);
        rest = &rest[c.len_utf8()..];
    }
    Ok(sections)
}

fn push_char(sections: &mut [(Option<Command>, String)], c: char) {
    if let Some((_, text)) = sections.last_mut() {
        text.push(c);
    }
}

fn command_at(text: &str) -> Option<(Command, &str)> {
    Command::ALL.iter().find_map(|(spelling, command)| {
        let after = text.strip_prefix(spelling)?;
        match after.chars().next() {
            None => Some((*command, after)),
            Some(c) if c.is_whitespace() => Some((*command, after)),
            Some(_) => None,
        }
    })
}

/// `\word` at the start of `text` that is not a declaration command.
fn unknown_command(text: &str) -> Option<String> {
    let after = text.strip_prefix('\\')?;
    let word: String = after.chars().take_while(|c| c.is_alphanumeric() || *c == '_').collect();
    if word.is_empty() { None } else { Some(format!("\\{}", word)) }
}

/// Paragraphs of `text`, each with its lines joined by single spaces.
fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                out.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        out.push(current.join(" "));
    }
    out
}

fn described(command: Command, text: &str) -> Result<String, DocError> {
    let paragraphs = paragraphs(text);
    if paragraphs.is_empty() {
        return Err(DocError::MissingDescription(command.as_str()));
    }
    Ok(paragraphs.join("\n\n"))
}
