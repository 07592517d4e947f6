mod config;

pub use config::BotConfig;

pub type Error = anyhow::Error;

#[derive(Clone, Debug)]
pub struct Data {
    pub config: BotConfig,
}

pub type Context<'a> = poise::Context<'a, Data, Error>;
