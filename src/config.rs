use crate::layout::{EngineConfig, LayoutEngine};
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Minute du jour depuis `HH:MM` (`24:00` accepté pour la fermeture).
pub fn parse_minute_of_day(raw: &str) -> Result<u32> {
    let (h, m) = raw
        .trim()
        .split_once(':')
        .with_context(|| format!("expected HH:MM, got {raw:?}"))?;
    let h: u32 = h.parse().with_context(|| format!("invalid hour in {raw:?}"))?;
    let m: u32 = m.parse().with_context(|| format!("invalid minute in {raw:?}"))?;
    if m >= 60 || h > 24 || (h == 24 && m != 0) {
        bail!("time of day out of range: {raw:?}");
    }
    Ok(h * 60 + m)
}

pub fn format_minute_of_day(minute: u32) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

/// (Dé)sérialisation `"HH:MM"` des minutes du jour.
pub(crate) mod hhmm {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(minute: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_minute_of_day(*minute))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_minute_of_day(&raw).map_err(|err| D::Error::custom(format!("{err:#}")))
    }
}

/// Charge et valide une configuration JSON.
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> Result<EngineConfig> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
    let config: EngineConfig = serde_json::from_slice(&data)
        .with_context(|| format!("parsing config {}", path.display()))?;
    LayoutEngine::new(config.clone())
        .with_context(|| format!("validating config {}", path.display()))?;
    Ok(config)
}

pub fn export_config_json<P: AsRef<Path>>(path: P, config: &EngineConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}
