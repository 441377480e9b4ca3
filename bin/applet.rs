use anyhow::Error as Anyhow;
use clap::Subcommand;
use derive_more::From;
use lib::settings::Settings;

mod host;
mod join;
mod local;

#[derive(Debug, From, Subcommand)]
pub enum Applet {
    Local(local::Local),
    Host(host::Host),
    Join(join::Join),
}

impl Default for Applet {
    fn default() -> Self {
        local::Local::default().into()
    }
}

impl Applet {
    pub async fn execute(self, settings: Settings) -> Result<(), Anyhow> {
        match self {
            Applet::Local(a) => Ok(a.execute(settings).await?),
            Applet::Host(a) => Ok(a.execute(settings).await?),
            Applet::Join(a) => Ok(a.execute(settings).await?),
        }
    }
}
