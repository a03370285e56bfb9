//! Protocol constants and configuration defaults

/// Wire-level values of the exchange protocol
pub mod protocol {
    /// Query parameter carrying the exchange type tag
    pub const TYPE_PARAM: &str = "type";

    /// Query parameter carrying the exchange mode
    pub const MODE_PARAM: &str = "mode";

    /// Query parameter naming the file for `file` and `import` modes
    pub const FILENAME_PARAM: &str = "filename";

    pub const MODE_CHECKAUTH: &str = "checkauth";
    pub const MODE_INIT: &str = "init";
    pub const MODE_FILE: &str = "file";
    pub const MODE_IMPORT: &str = "import";

    /// Status tokens on the first response line
    pub const STATUS_SUCCESS: &str = "success";
    pub const STATUS_PROGRESS: &str = "progress";

    /// Archive flag value that enables zip packaging
    pub const ARCHIVE_ENABLED: &str = "yes";
}

/// Transfer defaults
pub mod transfer {
    /// Chunk size used when the server does not negotiate a usable one
    pub const DEFAULT_CHUNK_SIZE: usize = 512_000;

    /// Prefix of generated archive names
    pub const ARCHIVE_NAME_PREFIX: &str = "import_";

    /// Suffix of generated archive names
    pub const ARCHIVE_SUFFIX: &str = ".zip";
}

/// Default configuration values
pub mod defaults {
    /// User-agent the exchange servers expect from an accounting client
    pub const USER_AGENT: &str = "1C+Enterprise/8.21";
}

/// Operator-facing text printed by the binary
pub mod messages {
    /// Word centred in the completion banner
    pub const COMPLETION: &str = "Конец";

    /// Prefix of the error line written to stderr
    pub const ERROR_PREFIX: &str = "Ошибка";

    /// Width of the completion banner
    pub const BANNER_WIDTH: usize = 26;
}
