use crate::table::Table;
use anyhow::Error as Anyhow;
use clap::Parser;
use lib::{game::Game, remote::Pipe, settings::Settings};
use tokio::io::{stdin, stdout};
use tracing::instrument;

/// Plays a game between two players sharing this terminal.
#[derive(Debug, Default, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Local {}

impl Local {
    #[instrument(level = "trace", skip(self), err)]
    pub async fn execute(self, settings: Settings) -> Result<(), Anyhow> {
        let terminal = Pipe::new(stdout(), stdin());
        Table::local(Game::new(settings), terminal).run().await
    }
}
