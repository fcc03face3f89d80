//! Analysis configuration
//!
//! Every section of the JSON configuration file is optional; an absent
//! section keeps the built-in default.
//!
//! ```json
//! {
//!   "lotteries": [{ "id": "lotto", "name": "Lotto 6aus49", "date_format": "%Y-%m-%d",
//!                   "primary_count": 6, "primary_range": { "min": 1, "max": 49 },
//!                   "secondary_count": 1, "secondary_range": { "min": 0, "max": 9 } }],
//!   "pairs": ["earth-moon", "sun-mars"],
//!   "bucket": { "width": 5, "domain_max": 50 },
//!   "hour_utc": 20,
//!   "relations": { "first number vs moon": ["n1", "dist_earth_moon"] }
//! }
//! ```

use std::path::Path;

use anyhow::Context;
use drawstat_analysis::{
    bucket::BucketSpec,
    enrich::EnrichmentConfig,
    relation::RelationCatalogue,
    schema::{LotterySchema, SchemaRegistry},
};
use drawstat_ephemeris::BodyPair;
use serde::Deserialize;

use crate::util;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    lotteries: Option<Vec<LotterySchema>>,
    pairs: Option<Vec<BodyPair>>,
    bucket: Option<BucketSpec>,
    hour_utc: Option<u32>,
    relations: Option<RelationCatalogue>,
}

/// Settings shared by every command, resolved once at startup.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub registry: SchemaRegistry,
    pub enrichment: EnrichmentConfig,
    pub relations: RelationCatalogue,
}

impl Settings {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => util::read_config_file(path)?,
            None => ConfigFile::default(),
        };
        let settings = Self::from_file(file)?;
        tracing::debug!(
            lotteries = settings.registry.ids().count(),
            pairs = settings.enrichment.pairs.len(),
            relations = settings.relations.len(),
            "settings resolved"
        );
        Ok(settings)
    }

    fn from_file(file: ConfigFile) -> anyhow::Result<Self> {
        let registry = SchemaRegistry::builtin()
            .with_overrides(file.lotteries.unwrap_or_default())
            .context("Invalid lottery definitions in config")?;

        let defaults = EnrichmentConfig::default();
        let hour_utc = file.hour_utc.unwrap_or(defaults.hour_utc);
        anyhow::ensure!(hour_utc < 24, "hour_utc must be in 0..24, got {hour_utc}");
        let enrichment = EnrichmentConfig {
            pairs: file.pairs.unwrap_or(defaults.pairs),
            bucket: file.bucket.unwrap_or(defaults.bucket),
            hour_utc,
        };

        let relations = file
            .relations
            .unwrap_or_else(|| RelationCatalogue::default_catalogue(&registry, &enrichment.pairs));

        Ok(Self {
            registry,
            enrichment,
            relations,
        })
    }
}
