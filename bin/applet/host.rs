use crate::table::Table;
use anyhow::{Context, Error as Anyhow};
use clap::Parser;
use lib::chess::Color;
use lib::remote::{Pipe, Remote, Tcp};
use lib::{game::Game, settings::Settings};
use tokio::io::{stdin, stdout};
use tracing::instrument;

/// Hosts an online game, playing with the white pieces.
#[derive(Debug, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Host {
    /// The port to listen on.
    #[clap(short, long, default_value_t = Tcp::PORT)]
    port: u16,
}

impl Host {
    #[instrument(level = "trace", skip(self), err)]
    pub async fn execute(self, settings: Settings) -> Result<(), Anyhow> {
        let mut terminal = Pipe::new(stdout(), stdin());

        let listener = Tcp::listen(self.port)
            .await
            .with_context(|| format!("failed to host on port {}", self.port))?;

        let address = Tcp::advertised(&listener).await?;
        terminal
            .send(&format!("waiting for a peer to join at {}", address))
            .await?;
        terminal.flush().await?;

        let peer = Tcp::accept(&listener)
            .await
            .context("failed to accept a peer")?;

        Table::online(Game::new(settings), terminal, Color::White, Box::new(peer))
            .run()
            .await
    }
}
