// Error types.
//
// Document manipulation is best-effort and never errors; the only fallible
// surface is settings persistence.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Settings file could not be read or written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings blob could not be serialized or parsed.
    #[error("settings error: {0}")]
    Settings(#[from] serde_json::Error),

    /// A host-provided settings store failed.
    #[error("settings store error: {0}")]
    Store(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Settings, SettingsStore};

    // A store the way a host shim would write one: opaque failures wrapped
    // into the crate error through anyhow.
    struct BrokenStore;

    impl SettingsStore for BrokenStore {
        fn load(&self) -> Result<Settings> {
            Err(anyhow::anyhow!("backing storage offline").into())
        }

        fn save(&self, _settings: &Settings) -> Result<()> {
            Err(anyhow::anyhow!("backing storage offline").into())
        }
    }

    #[test]
    fn store_failures_surface_through_the_crate_error() {
        let err = BrokenStore.load().unwrap_err();
        assert!(matches!(err, Error::Store(_)));
        assert_eq!(
            err.to_string(),
            "settings store error: backing storage offline"
        );
    }
}
