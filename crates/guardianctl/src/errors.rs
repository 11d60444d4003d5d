//! Exit codes for guardianctl

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors, including a rejected acknowledgment
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when the backend health check fails
pub const EXIT_BACKEND_UNAVAILABLE: i32 = 70;

/// Exit code for unusable configuration
pub const EXIT_CONFIG_ERROR: i32 = 78;
