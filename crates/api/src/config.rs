use anyhow::Context;
use autofill::AutoFillConfig;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "plain" => Ok(LogFormat::Pretty),
            other => anyhow::bail!("unknown log format {other:?}"),
        }
    }
}

/// Service settings, read from `TIMETABLE__*` variables.
#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub log_format: LogFormat,
    pub catalog: Option<PathBuf>,
    pub autofill: AutoFillConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        fn parse<T>(get: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<Option<T>>
        where
            T: FromStr,
            T::Err: std::fmt::Display,
        {
            get(key)
                .map(|v| v.trim().parse::<T>().map_err(|e| anyhow::anyhow!("{e}")))
                .transpose()
                .with_context(|| format!("invalid {key}"))
        }

        let defaults = AutoFillConfig::default();
        Ok(Self {
            port: parse(&get, "TIMETABLE__SERVER__PORT")?.unwrap_or(8080),
            log_format: parse(&get, "TIMETABLE__LOG__FORMAT")?.unwrap_or(LogFormat::Json),
            catalog: get("TIMETABLE__DATA__CATALOG").map(PathBuf::from),
            autofill: AutoFillConfig {
                attempts_per_day: parse(&get, "TIMETABLE__AUTOFILL__ATTEMPTS_PER_DAY")?
                    .unwrap_or(defaults.attempts_per_day),
                seed: parse(&get, "TIMETABLE__AUTOFILL__SEED")?,
            },
        })
    }
}
