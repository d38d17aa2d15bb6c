//! Request/reply sequences for each client operation

use crate::codec::{request_list, request_simple};
use crate::list::{parse_commands, parse_ups, parse_vars, ListKind};
use crate::reply::parse_description;
use nut_core::{Command, NutError, NutResult};
use nut_transport::StreamAccessor;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Limits applied while reading list replies
#[derive(Debug, Clone, Copy)]
pub struct ListLimits {
    /// Bound on receiving the whole list
    pub timeout: Option<Duration>,
    /// Bound on the accumulated reply size
    pub max_bytes: usize,
}

/// One login step: `USERNAME` or `PASSWORD`
///
/// Any reply other than `OK` is a login failure.
pub async fn login<S>(stream: &mut S, command: &Command) -> NutResult<()>
where
    S: StreamAccessor + ?Sized,
{
    match request_simple(stream, command, Some("OK")).await {
        Ok(_) => Ok(()),
        Err(NutError::Command(message)) | Err(NutError::Protocol(message)) => {
            Err(NutError::Login(message))
        }
        Err(e) => Err(e),
    }
}

/// `GET UPSDESC <ups>` -> description text
pub async fn description<S>(stream: &mut S, ups: &str) -> NutResult<String>
where
    S: StreamAccessor + ?Sized,
{
    let command = Command::get_description(ups);
    let line = request_simple(stream, &command, Some("UPSDESC")).await?;
    parse_description(&command, &line)
}

/// `LIST UPS` -> UPS name -> description
pub async fn list_ups<S>(stream: &mut S, limits: ListLimits) -> NutResult<HashMap<String, String>>
where
    S: StreamAccessor + ?Sized,
{
    let body = request_list(
        stream,
        &Command::list_ups(),
        &ListKind::Ups,
        limits.timeout,
        limits.max_bytes,
    )
    .await?;
    Ok(parse_ups(&body))
}

/// `LIST VAR <ups>` -> variable name -> value
pub async fn list_vars<S>(
    stream: &mut S,
    ups: &str,
    limits: ListLimits,
) -> NutResult<HashMap<String, String>>
where
    S: StreamAccessor + ?Sized,
{
    let body = request_list(
        stream,
        &Command::list_vars(ups),
        &ListKind::Var(ups.to_string()),
        limits.timeout,
        limits.max_bytes,
    )
    .await?;
    Ok(parse_vars(&body))
}

/// `LIST CMD <ups>` -> set of command names
pub async fn list_commands<S>(stream: &mut S, ups: &str, limits: ListLimits) -> NutResult<HashSet<String>>
where
    S: StreamAccessor + ?Sized,
{
    let body = request_list(
        stream,
        &Command::list_commands(ups),
        &ListKind::Cmd(ups.to_string()),
        limits.timeout,
        limits.max_bytes,
    )
    .await?;
    Ok(parse_commands(&body))
}

/// `INSTCMD <ups> <command> [<param>]` -> trimmed reply text
pub async fn instant_command<S>(
    stream: &mut S,
    ups: &str,
    command: &str,
    param: Option<&str>,
) -> NutResult<String>
where
    S: StreamAccessor + ?Sized,
{
    let command = Command::instant_command(ups, command, param);
    let reply = request_simple(stream, &command, None).await?;
    Ok(reply.trim().to_string())
}
