use uuid::Uuid;

/// Generates opaque document identifiers.
///
/// Identifiers are 32 lowercase hex characters (a UUID v4 without
/// separators). They are unique for the lifetime of the process and
/// practically unique across processes, and contain no characters that need
/// escaping in JSON or URLs.
///
/// Identifiers carry no ordering relationship to creation time. Callers that
/// need recency must sort on a `created_at` field instead of the id.
pub struct RandomIdGenerator;

impl RandomIdGenerator {
    pub fn new() -> Self {
        RandomIdGenerator
    }

    /// Returns the next identifier.
    pub fn next_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

impl Default for RandomIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
