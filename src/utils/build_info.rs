/// Compile-time build metadata produced by `build.rs`.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub built_on: &'static str,
    pub profile: &'static str,
}

/// Returns the statically-embedded build metadata.
pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("TRAINER_LEDGER_BUILD_HASH").unwrap_or("unknown"),
        built_on: option_env!("TRAINER_LEDGER_BUILD_DATE").unwrap_or("unknown"),
        profile: option_env!("TRAINER_LEDGER_BUILD_PROFILE").unwrap_or("unknown"),
    }
}
