//! Protocol commands
//!
//! A command is a verb plus ordered arguments, rendered to one ASCII line
//! terminated by `\n`. Arguments are not escaped; callers pass well-formed
//! UPS and command names.

use crate::error::{NutError, NutResult};
use std::fmt;

/// Replaces credential arguments in every rendering meant for humans
pub const REDACTED: &str = "<redacted>";

/// Command verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Username,
    Password,
    Get,
    List,
    InstCmd,
}

impl Verb {
    /// Wire spelling of the verb
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Username => "USERNAME",
            Verb::Password => "PASSWORD",
            Verb::Get => "GET",
            Verb::List => "LIST",
            Verb::InstCmd => "INSTCMD",
        }
    }

    /// Whether the arguments of this verb are secrets
    pub fn is_credential(&self) -> bool {
        matches!(self, Verb::Username | Verb::Password)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single protocol command
///
/// `Display` renders the redacted form, so a `Command` can be logged or put
/// into an error message without leaking credentials. Use [`Command::line`]
/// for the text that goes on the wire.
#[derive(Clone, PartialEq, Eq)]
pub struct Command {
    verb: Verb,
    args: Vec<String>,
}

impl Command {
    /// Create a command from a verb and its arguments
    pub fn new<I, S>(verb: Verb, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            verb,
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `USERNAME <username>`
    pub fn username(username: &str) -> Self {
        Self::new(Verb::Username, [username])
    }

    /// `PASSWORD <password>`
    pub fn password(password: &str) -> Self {
        Self::new(Verb::Password, [password])
    }

    /// `GET UPSDESC <ups>`
    pub fn get_description(ups: &str) -> Self {
        Self::new(Verb::Get, ["UPSDESC", ups])
    }

    /// `LIST UPS`
    pub fn list_ups() -> Self {
        Self::new(Verb::List, ["UPS"])
    }

    /// `LIST VAR <ups>`
    pub fn list_vars(ups: &str) -> Self {
        Self::new(Verb::List, ["VAR", ups])
    }

    /// `LIST CMD <ups>`
    pub fn list_commands(ups: &str) -> Self {
        Self::new(Verb::List, ["CMD", ups])
    }

    /// `INSTCMD <ups> <command> [<param>]`
    pub fn instant_command(ups: &str, command: &str, param: Option<&str>) -> Self {
        let mut args = vec![ups.to_string(), command.to_string()];
        if let Some(param) = param {
            args.push(param.to_string());
        }
        Self::new(Verb::InstCmd, args)
    }

    /// Get the verb
    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Get the arguments
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Full command text without the line terminator
    ///
    /// Contains credentials in cleartext for `USERNAME`/`PASSWORD`.
    pub fn line(&self) -> String {
        let mut line = self.verb.as_str().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Command text safe for logs and error messages
    pub fn redacted(&self) -> String {
        if self.verb.is_credential() {
            format!("{} {}", self.verb, REDACTED)
        } else {
            self.line()
        }
    }

    /// Encode the command to its wire form, `<VERB> <arg>...\n`
    ///
    /// # Errors
    /// Returns `InvalidData` if an argument is not ASCII or contains a control
    /// character (a line break would end the command early), or if a
    /// non-credential argument is empty. An empty password is legal.
    pub fn encode(&self) -> NutResult<Vec<u8>> {
        for (index, arg) in self.args.iter().enumerate() {
            if arg.is_empty() && !self.verb.is_credential() {
                return Err(NutError::InvalidData(format!(
                    "{}: argument {} is empty",
                    self.redacted(),
                    index + 1
                )));
            }
            if !arg.is_ascii() {
                return Err(NutError::InvalidData(format!(
                    "{}: argument {} is not ASCII",
                    self.redacted(),
                    index + 1
                )));
            }
            if arg.bytes().any(|b| b.is_ascii_control()) {
                return Err(NutError::InvalidData(format!(
                    "{}: argument {} contains control characters",
                    self.redacted(),
                    index + 1
                )));
            }
        }

        let mut encoded = self.line().into_bytes();
        encoded.push(b'\n');
        Ok(encoded)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Command").field(&self.redacted()).finish()
    }
}
