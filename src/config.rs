use std::net::{IpAddr, Ipv4Addr};

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
}

impl Config {
    pub fn read_config() -> Result<Self> {
        Ok(Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file("librarium.toml"))
            .merge(Env::prefixed("LIBRARIUM_"))
            .extract()?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "data/library.db".to_string(),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
        }
    }
}
