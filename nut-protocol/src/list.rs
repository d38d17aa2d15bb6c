//! List reply framing and body parsing
//!
//! ```text
//! BEGIN LIST VAR <ups>
//! VAR <ups> <name> "<value>"
//! ...
//! END LIST VAR <ups>
//! ```
//!
//! Data lines whose tag does not match the list kind are skipped, so servers
//! may add new line types without breaking older clients.

use crate::reply::unquote;
use std::collections::{HashMap, HashSet};

const UPS_TAG: &str = "UPS ";
const VAR_TAG: &str = "VAR ";
const CMD_TAG: &str = "CMD ";

/// The kind of list being requested
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListKind {
    /// `LIST UPS`
    Ups,
    /// `LIST VAR <ups>`
    Var(String),
    /// `LIST CMD <ups>`
    Cmd(String),
}

impl ListKind {
    /// `<kind> [<args>]` part shared by the header and the sentinel
    fn subject(&self) -> String {
        match self {
            ListKind::Ups => "UPS".to_string(),
            ListKind::Var(ups) => format!("VAR {}", ups),
            ListKind::Cmd(ups) => format!("CMD {}", ups),
        }
    }

    /// Header line that opens the reply, without terminator
    pub fn begin_line(&self) -> String {
        format!("BEGIN LIST {}", self.subject())
    }

    /// Exact trailing byte sequence that closes the reply
    pub fn end_sentinel(&self) -> String {
        format!("END LIST {}\n", self.subject())
    }

    /// Tag that starts each data line, including the separating space
    pub fn data_tag(&self) -> &'static str {
        match self {
            ListKind::Ups => UPS_TAG,
            ListKind::Var(_) => VAR_TAG,
            ListKind::Cmd(_) => CMD_TAG,
        }
    }
}

/// Split the data lines of a list body into `fields` whitespace-separated parts
///
/// The last part keeps any remaining text, spaces included.
fn data_lines<'a>(body: &'a str, tag: &'a str, fields: usize) -> impl Iterator<Item = Vec<&'a str>> + 'a {
    body.lines()
        .filter(move |line| line.starts_with(tag))
        .map(move |line| line.splitn(fields, ' ').collect::<Vec<_>>())
        .filter(move |parts| parts.len() == fields)
}

/// Parse a `LIST UPS` body into UPS name -> description
pub fn parse_ups(body: &str) -> HashMap<String, String> {
    data_lines(body, UPS_TAG, 3)
        .map(|parts| (parts[1].to_string(), unquote(parts[2]).to_string()))
        .collect()
}

/// Parse a `LIST VAR` body into variable name -> value
pub fn parse_vars(body: &str) -> HashMap<String, String> {
    data_lines(body, VAR_TAG, 4)
        .map(|parts| (parts[2].to_string(), unquote(parts[3]).to_string()))
        .collect()
}

/// Parse a `LIST CMD` body into the set of command names
///
/// Accepts both `CMD <ups> "<name>"` and `CMD <ups> <name>`; anything after
/// the name is dropped.
pub fn parse_commands(body: &str) -> HashSet<String> {
    body.lines()
        .filter(|line| line.starts_with(CMD_TAG))
        .filter_map(|line| {
            let rest = line.splitn(3, ' ').nth(2)?;
            let name = if let Some(quoted) = rest.strip_prefix('"') {
                quoted.split('"').next()?
            } else {
                rest.split(' ').next()?
            };
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framing_lines() {
        assert_eq!(ListKind::Ups.begin_line(), "BEGIN LIST UPS");
        assert_eq!(ListKind::Ups.end_sentinel(), "END LIST UPS\n");
        let kind = ListKind::Var("test".into());
        assert_eq!(kind.begin_line(), "BEGIN LIST VAR test");
        assert_eq!(kind.end_sentinel(), "END LIST VAR test\n");
        assert_eq!(ListKind::Cmd("test".into()).data_tag(), "CMD ");
    }

    #[test]
    fn test_parse_ups() {
        let body = "BEGIN LIST UPS\nUPS test \"bob\"\nUPS rack \"APC Smart-UPS 1500\"\nEND LIST UPS\n";
        let upses = parse_ups(body);
        assert_eq!(upses.len(), 2);
        assert_eq!(upses["test"], "bob");
        assert_eq!(upses["rack"], "APC Smart-UPS 1500");
    }

    #[test]
    fn test_parse_vars() {
        let body = "BEGIN LIST VAR test\nVAR test x.y \"z\"\nVAR test ups.status \"OL CHRG\"\nEND LIST VAR test\n";
        let vars = parse_vars(body);
        assert_eq!(vars["x.y"], "z");
        assert_eq!(vars["ups.status"], "OL CHRG");
    }

    #[test]
    fn test_parse_commands() {
        let body = "BEGIN LIST CMD test\nCMD test \"valid\"\nCMD test beeper.off\nCMD test \"valid\"\nEND LIST CMD test\n";
        let commands = parse_commands(body);
        assert_eq!(commands.len(), 2);
        assert!(commands.contains("valid"));
        assert!(commands.contains("beeper.off"));
    }

    #[test]
    fn test_unknown_lines_are_ignored() {
        let body = "BEGIN LIST VAR test\nRW test x.y \"z\"\nVAR test\nVAR test a \"b\"\nEND LIST VAR test\n";
        let vars = parse_vars(body);
        assert_eq!(vars.len(), 1);
        assert_eq!(vars["a"], "b");
    }

    #[test]
    fn test_empty_list() {
        assert!(parse_ups("BEGIN LIST UPS\nEND LIST UPS\n").is_empty());
        assert!(parse_commands("BEGIN LIST CMD test\nEND LIST CMD test\n").is_empty());
    }
}
