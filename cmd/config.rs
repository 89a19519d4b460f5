use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use coin_scraper::error::Error;
use coin_scraper::error::Result;
use coin_scraper::scraper::CoinMarketCapCfg;

////////////////////////////////////////////////////////////
// Parameters
////////////////////////////////////////////////////////////
#[derive(Debug, Clone, Deserialize)]
pub struct CfgParam {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CfgParamList(Vec<CfgParam>);

impl CfgParamList {
    pub fn iter(&self) -> impl Iterator<Item = &CfgParam> {
        self.0.iter()
    }

    pub fn get_value_ref(&self, key: &str) -> Option<&str> {
        self.iter()
            .find(|p| p.name == key)
            .map(|p| p.value.as_str())
    }
}

////////////////////////////////////////////////////////////
// Scraper
////////////////////////////////////////////////////////////
#[derive(Debug, Clone, Deserialize)]
pub struct CfgScraper {
    pub r#type: String,

    #[serde(default)]
    pub params: CfgParamList,
}

impl TryFrom<CfgScraper> for CoinMarketCapCfg {
    type Error = Error;

    fn try_from(cfg: CfgScraper) -> Result<Self> {
        if cfg.r#type != "coinmarketcap" {
            return Err(Error::ConfigError(format!(
                "{}: unsupported scraper type",
                cfg.r#type
            )));
        }

        let api_key = cfg.params.get_value_ref("api_key").ok_or(Error::ConfigError(
            "coinmarketcap scraper requires an api_key param".to_string(),
        ))?;
        let mut ret = CoinMarketCapCfg::new(api_key.to_string());

        if let Some(base_url) = cfg.params.get_value_ref("base_url") {
            ret = ret.set_base_url(base_url.to_string());
        }

        if let Some(convert) = cfg.params.get_value_ref("convert") {
            ret = ret.set_convert(convert.to_string());
        }

        if let Some(timeout) = cfg.params.get_value_ref("timeout_secs") {
            let secs: u64 = timeout.parse().map_err(|_| {
                Error::ConfigError(format!("{}: timeout_secs is not a number", timeout))
            })?;
            ret = ret.set_timeout(Duration::from_secs(secs));
        }

        Ok(ret)
    }
}

////////////////////////////////////////////////////////////
// Jobs
////////////////////////////////////////////////////////////
#[derive(Debug, Clone, Deserialize)]
pub struct CfgJob {
    pub task: String,

    #[serde(default)]
    pub args: serde_yaml::Value,
}

impl CfgJob {
    pub fn json_args(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(&self.args)?)
    }
}

////////////////////////////////////////////////////////////
// Yaml parser
////////////////////////////////////////////////////////////
#[derive(Debug, Clone, Deserialize)]
pub struct Cfg {
    pub scraper: CfgScraper,

    #[serde(default)]
    pub jobs: Vec<CfgJob>,
}

pub struct Parser;

impl Parser {
    pub fn parse_yaml<P: AsRef<Path>>(path: P) -> Result<Cfg> {
        let reader = Self::file_reader(path)?;
        let config: Cfg = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    fn file_reader<P: AsRef<Path>>(path: P) -> Result<BufReader<File>> {
        let f = std::fs::File::open(path)?;
        Ok(BufReader::new(f))
    }
}

////////////////////////////////////////////////////////////
// Unit test
////////////////////////////////////////////////////////////
#[cfg(test)]
#[path = "config_test.rs"]
mod test;
