use totp_rs::{Algorithm, Secret, TOTP};

fn totp(secret: &str) -> TOTP {
    let bytes = Secret::Encoded(secret.to_string())
        .to_bytes()
        .expect("valid base32 secret");
    TOTP::new(Algorithm::SHA1, 6, 1, 30, bytes).expect("valid TOTP parameters")
}

/// Code for the current time step
pub fn current_code(secret: &str) -> String {
    totp(secret).generate_current().expect("clock after epoch")
}

/// A well-formed code that matches none of the accepted steps
pub fn wrong_code(secret: &str) -> String {
    let totp = totp(secret);
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock after epoch")
        .as_secs();
    let window: Vec<String> = [now.saturating_sub(60), now.saturating_sub(30), now, now + 30, now + 60]
        .iter()
        .map(|t| totp.generate(*t))
        .collect();

    ["000000", "111111", "222222", "333333", "444444", "555555"]
        .iter()
        .map(|c| c.to_string())
        .find(|c| !window.contains(c))
        .expect("some code outside the window")
}
