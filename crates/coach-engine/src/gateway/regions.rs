//! Platform and regional routing.
//!
//! Per-shard endpoints (platforms) serve summoner-scoped data; match
//! data lives on one of four regional hosts each platform maps onto.

use crate::error::ProviderError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A provider shard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Na1,
    Br1,
    La1,
    La2,
    Euw1,
    Eun1,
    Tr1,
    Ru,
    Kr,
    Jp1,
    Oc1,
    Ph2,
    Sg2,
    Th2,
    Tw2,
    Vn2,
}

/// Regional routing host serving match data for a set of platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Americas,
    Europe,
    Asia,
    Sea,
}

impl Platform {
    pub const ALL: [Platform; 16] = [
        Platform::Na1,
        Platform::Br1,
        Platform::La1,
        Platform::La2,
        Platform::Euw1,
        Platform::Eun1,
        Platform::Tr1,
        Platform::Ru,
        Platform::Kr,
        Platform::Jp1,
        Platform::Oc1,
        Platform::Ph2,
        Platform::Sg2,
        Platform::Th2,
        Platform::Tw2,
        Platform::Vn2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Na1 => "na1",
            Platform::Br1 => "br1",
            Platform::La1 => "la1",
            Platform::La2 => "la2",
            Platform::Euw1 => "euw1",
            Platform::Eun1 => "eun1",
            Platform::Tr1 => "tr1",
            Platform::Ru => "ru",
            Platform::Kr => "kr",
            Platform::Jp1 => "jp1",
            Platform::Oc1 => "oc1",
            Platform::Ph2 => "ph2",
            Platform::Sg2 => "sg2",
            Platform::Th2 => "th2",
            Platform::Tw2 => "tw2",
            Platform::Vn2 => "vn2",
        }
    }

    /// The regional host this platform's match data is served from.
    pub fn region(&self) -> Region {
        match self {
            Platform::Na1 | Platform::Br1 | Platform::La1 | Platform::La2 => Region::Americas,
            Platform::Euw1 | Platform::Eun1 | Platform::Tr1 | Platform::Ru => Region::Europe,
            Platform::Kr | Platform::Jp1 => Region::Asia,
            Platform::Oc1
            | Platform::Ph2
            | Platform::Sg2
            | Platform::Th2
            | Platform::Tw2
            | Platform::Vn2 => Region::Sea,
        }
    }

    /// Base URL of the per-shard host.
    pub fn platform_host(&self) -> String {
        format!("https://{}.api.riotgames.com", self.as_str())
    }

    /// Base URL of the regional host.
    pub fn regional_host(&self) -> String {
        format!("https://{}.api.riotgames.com", self.region().as_str())
    }
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Americas => "americas",
            Region::Europe => "europe",
            Region::Asia => "asia",
            Region::Sea => "sea",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| ProviderError::Validation(format!("unknown platform: {s}")))
    }
}
