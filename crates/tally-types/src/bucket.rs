//! Bucket naming rule used by storage allocation operations

/// Longest permitted bucket name
pub const MAX_BUCKET_NAME_LEN: usize = 100;

/// Bucket names are 1 to 100 ASCII letters, digits or hyphens
pub fn is_valid_bucket_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_BUCKET_NAME_LEN
        && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}
