//! Shared configuration loading for subcommands

use std::path::Path;

use anyhow::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use hextactics_core::GameConfig;

/// Load a config file (or defaults) and apply the global seed override
pub fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => {
            tracing::info!("Loading config from {}", path.display());
            GameConfig::load(path)?
        }
        None => GameConfig::default(),
    };

    if seed.is_some() {
        config.seed = seed;
    }
    Ok(config)
}

/// Seeded RNG when a seed is configured, entropy otherwise
pub fn make_rng(config: &GameConfig) -> ChaCha8Rng {
    match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}
