//! Logging initialization

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable.
///
/// # Example
/// ```
/// terrapaint::core::logging::init();
/// log::info!("Editor started");
/// ```
pub fn init() {
    // A host application may already own the logger.
    let _ = builder().try_init();
}

/// Logger builder with the default `info` filter, for callers that tweak
/// the format before installing it.
pub fn builder() -> env_logger::Builder {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init();
        init();
        log::info!("logger installed");
        assert!(builder().try_init().is_err());
    }
}
