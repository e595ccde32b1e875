use std::fmt;

use configs::StorageConfig;

/// Which backend a [`super::UserStore`] is bound to.
///
/// Decided once from an explicit [`StorageConfig`]; priority is
/// relational, then object storage, then the local file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    Relational,
    Object,
    File,
}

impl BackendKind {
    pub fn select(cfg: &StorageConfig) -> Self {
        if cfg.relational_configured() {
            BackendKind::Relational
        } else if cfg.object_configured() || cfg.deployed {
            BackendKind::Object
        } else {
            BackendKind::File
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Relational => "relational",
            BackendKind::Object => "object",
            BackendKind::File => "file",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
