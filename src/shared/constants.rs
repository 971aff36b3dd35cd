// =============================================================================
// FLASH MESSAGES
// =============================================================================

pub const MSG_INVALID_CREDENTIALS: &str = "Invalid credentials";

pub const MSG_EMAIL_EXISTS: &str = "Email already exists";

pub const MSG_REGISTERED: &str = "Registration successful! Please log in.";

pub const MSG_RECORD_UPLOADED: &str = "Record uploaded!";

pub const MSG_NO_FILE: &str = "No file selected";

pub const MSG_APPOINTMENT_REQUESTED: &str = "Appointment requested!";

// =============================================================================
// UPLOADS
// =============================================================================

/// Extra body allowance on the upload route for multipart framing
pub const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Hex digits of the content hash used to prefix stored upload names
pub const STORAGE_KEY_HASH_LEN: usize = 16;
