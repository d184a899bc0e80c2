//! Path and filename constants for the surgery store.

/// Directory under the data dir that holds the surgery collection.
pub const SURGERIES_DIR_NAME: &str = "surgeries";

/// Default data directory when none is configured.
pub const DEFAULT_SURGERY_DATA_DIR: &str = "surgery_data";

/// Filename of a stored surgery document.
pub const SURGERY_JSON_FILENAME: &str = "surgery.json";

/// Suffix of the temporary file a document is written to before being renamed into place.
pub const TEMP_FILE_SUFFIX: &str = ".tmp";

/// Attempts made to allocate an unused id directory before giving up.
pub const MAX_ID_ALLOCATION_ATTEMPTS: usize = 5;
