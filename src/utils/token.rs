use rand::{distributions::Alphanumeric, thread_rng, Rng};

pub const OTP_LENGTH: usize = 6;

/// Numeric one-time code for password resets.
pub fn generate_otp() -> String {
    let mut rng = thread_rng();
    (0..OTP_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Random suffix for stored upload names.
pub fn generate_suffix(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
