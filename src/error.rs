use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    HttpError(String),
    ParseError(String),
    IoError(std::io::Error),
    FetchError { coin: String, reason: String },
    ScraperError(String),
    TaskError(String),
    ConfigError(String),
}

impl Error {
    pub fn fetch<C: Into<String>, R: Into<String>>(coin: C, reason: R) -> Self {
        Error::FetchError {
            coin: coin.into(),
            reason: reason.into(),
        }
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::HttpError(e) => write!(f, "HTTP error: {}", e),
            Error::ParseError(e) => write!(f, "Parse error: {}", e),
            Error::IoError(e) => write!(f, "IO error: {}", e),
            Error::FetchError { coin, reason } => {
                write!(f, "Fetch error for {}: {}", coin, reason)
            }
            Error::ScraperError(e) => write!(f, "Scraper error: {}", e),
            Error::TaskError(e) => write!(f, "Task error: {}", e),
            Error::ConfigError(e) => write!(f, "Config error: {}", e),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Error {
        Error::HttpError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::ParseError(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Error {
        Error::ParseError(err.to_string())
    }
}
