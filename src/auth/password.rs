use tracing::error;

const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

/// bcrypt ignores everything past this many bytes.
const BCRYPT_MAX_INPUT: usize = 72;

pub fn hash_password(plain: &str, cost: u32) -> anyhow::Result<String> {
    anyhow::ensure!(
        plain.len() <= BCRYPT_MAX_INPUT,
        "password exceeds {} bytes",
        BCRYPT_MAX_INPUT
    );
    bcrypt::hash(plain, cost).map_err(|e| {
        error!(error = %e, "bcrypt hash error");
        anyhow::anyhow!(e.to_string())
    })
}

/// Returns true only for a well-formed bcrypt digest of `plain`.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    let hash = hash.trim();
    if hash.is_empty() || plain.is_empty() || plain.len() > BCRYPT_MAX_INPUT {
        return false;
    }
    if !BCRYPT_PREFIXES.iter().any(|p| hash.starts_with(p)) {
        return false;
    }
    bcrypt::verify(plain, hash).unwrap_or(false)
}
