//! The client operations, one type per protocol exchange

use crate::connection::Connection;
use async_trait::async_trait;
use nut_core::{Command, NutResult};
use nut_protocol::{requests, ListLimits};
use std::collections::{HashMap, HashSet};

/// A request/reply exchange run by the executor on a live connection
#[async_trait]
pub(crate) trait Operation: Send + Sync {
    type Output: Send;

    /// Name used in events
    fn name(&self) -> &'static str;

    /// The command this operation sends
    fn command(&self) -> Command;

    /// Run the exchange once
    async fn run(&self, connection: &mut Connection, limits: ListLimits) -> NutResult<Self::Output>;
}

pub(crate) struct Describe<'a> {
    pub(crate) ups: &'a str,
}

#[async_trait]
impl<'a> Operation for Describe<'a> {
    type Output = String;

    fn name(&self) -> &'static str {
        "description"
    }

    fn command(&self) -> Command {
        Command::get_description(self.ups)
    }

    async fn run(&self, connection: &mut Connection, _limits: ListLimits) -> NutResult<String> {
        requests::description(connection.stream(), self.ups).await
    }
}

pub(crate) struct ListUps;

#[async_trait]
impl Operation for ListUps {
    type Output = HashMap<String, String>;

    fn name(&self) -> &'static str {
        "list_ups"
    }

    fn command(&self) -> Command {
        Command::list_ups()
    }

    async fn run(&self, connection: &mut Connection, limits: ListLimits) -> NutResult<Self::Output> {
        requests::list_ups(connection.stream(), limits).await
    }
}

pub(crate) struct ListVars<'a> {
    pub(crate) ups: &'a str,
}

#[async_trait]
impl<'a> Operation for ListVars<'a> {
    type Output = HashMap<String, String>;

    fn name(&self) -> &'static str {
        "list_vars"
    }

    fn command(&self) -> Command {
        Command::list_vars(self.ups)
    }

    async fn run(&self, connection: &mut Connection, limits: ListLimits) -> NutResult<Self::Output> {
        requests::list_vars(connection.stream(), self.ups, limits).await
    }
}

pub(crate) struct ListCommands<'a> {
    pub(crate) ups: &'a str,
}

#[async_trait]
impl<'a> Operation for ListCommands<'a> {
    type Output = HashSet<String>;

    fn name(&self) -> &'static str {
        "list_commands"
    }

    fn command(&self) -> Command {
        Command::list_commands(self.ups)
    }

    async fn run(&self, connection: &mut Connection, limits: ListLimits) -> NutResult<Self::Output> {
        requests::list_commands(connection.stream(), self.ups, limits).await
    }
}

pub(crate) struct RunCommand<'a> {
    pub(crate) ups: &'a str,
    pub(crate) command: &'a str,
    pub(crate) param: Option<&'a str>,
}

#[async_trait]
impl<'a> Operation for RunCommand<'a> {
    type Output = String;

    fn name(&self) -> &'static str {
        "run_command"
    }

    fn command(&self) -> Command {
        Command::instant_command(self.ups, self.command, self.param)
    }

    async fn run(&self, connection: &mut Connection, _limits: ListLimits) -> NutResult<String> {
        requests::instant_command(connection.stream(), self.ups, self.command, self.param).await
    }
}
