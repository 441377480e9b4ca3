use crate::table::Table;
use anyhow::{Context, Error as Anyhow};
use clap::Parser;
use lib::chess::Color;
use lib::remote::{Pipe, Tcp};
use lib::{game::Game, settings::Settings};
use tokio::io::{stdin, stdout};
use tracing::instrument;

/// Joins an online game, playing with the black pieces.
#[derive(Debug, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Join {
    /// The address of the host.
    host: String,

    /// The port the host listens on.
    #[clap(short, long, default_value_t = Tcp::PORT)]
    port: u16,
}

impl Join {
    #[instrument(level = "trace", skip(self), err)]
    pub async fn execute(self, settings: Settings) -> Result<(), Anyhow> {
        let terminal = Pipe::new(stdout(), stdin());

        let peer = Tcp::join((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("failed to join {}:{}", self.host, self.port))?;

        Table::online(Game::new(settings), terminal, Color::Black, Box::new(peer))
            .run()
            .await
    }
}
