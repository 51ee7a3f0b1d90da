use anyhow::Context;

use crate::errors::AppError;

/// Hashes on the blocking pool; bcrypt is deliberately slow.
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_string();
    let hashed = tokio::task::spawn_blocking(move || hash_with_cost(&password, bcrypt::DEFAULT_COST))
        .await
        .context("password hashing task failed")??;
    Ok(hashed)
}

/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let password = password.to_string();
    let hash = hash.to_string();
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .context("password verification task failed")?;
    Ok(matches)
}

fn hash_with_cost(password: &str, cost: u32) -> Result<String, AppError> {
    bcrypt::hash(password, cost)
        .context("failed to hash password")
        .map_err(AppError::Internal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_round_trip() {
        let hash = hash_with_cost("s3cret-pass", 4).unwrap();
        assert_ne!(hash, "s3cret-pass");
        assert!(bcrypt::verify("s3cret-pass", &hash).unwrap());
        assert!(!bcrypt::verify("wrong", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash").await.unwrap());
    }
}
