//! cuid generation.
//!
//! Layout of a generated cuid (25 chars, all lowercase base36):
//!
//! ```text
//! c kodhg53j 0000 01la br7zezao
//! | |        |    |    |
//! | |        |    |    random (8)
//! | |        |    fingerprint (4): pid (2) + host (2)
//! | |        counter (4)
//! | timestamp in ms (8)
//! prefix
//! ```

use std::cell::Cell;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

const BASE: u64 = 36;
const BLOCK_SIZE: usize = 4;
const DISCRETE_VALUES: u32 = 36 * 36 * 36 * 36;
const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

thread_local! {
    static COUNTER: Cell<u32> = Cell::new(rand::rng().random_range(0..DISCRETE_VALUES));
}

/// Generates a fresh full-length cuid.
pub fn generate_cuid() -> String {
    let mut out = String::with_capacity(25);
    out.push('c');
    out.push_str(&pad(&to_base36(timestamp_ms()), 8));
    out.push_str(&pad(&to_base36(u64::from(next_count())), BLOCK_SIZE));
    out.push_str(fingerprint());
    out.push_str(&random_block());
    out.push_str(&random_block());
    out
}

/// Generates a fresh cuid and prepends `prefix`.
pub fn generate_cuid_string(prefix: &str) -> String {
    format!("{prefix}{}", generate_cuid())
}

fn timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

fn next_count() -> u32 {
    COUNTER.with(|counter| {
        let value = counter.get();
        counter.set((value + 1) % DISCRETE_VALUES);
        value
    })
}

fn random_block() -> String {
    let value = rand::rng().random_range(0..DISCRETE_VALUES);
    pad(&to_base36(u64::from(value)), BLOCK_SIZE)
}

/// Per-process fingerprint: two chars from the pid, two from the host name.
fn fingerprint() -> &'static str {
    static FINGERPRINT: OnceLock<String> = OnceLock::new();
    FINGERPRINT.get_or_init(|| {
        let pid = u64::from(std::process::id());
        let host = std::env::var("HOSTNAME")
            .or_else(|_| std::env::var("COMPUTERNAME"))
            .unwrap_or_else(|_| "localhost".to_string());
        let host_sum = host.chars().map(u64::from).sum::<u64>() + host.len() as u64 + BASE;

        let mut fp = pad(&to_base36(pid), 2);
        fp.push_str(&pad(&to_base36(host_sum), 2));
        fp
    })
}

/// Keeps the last `width` characters of `s`, left-padding with zeros.
fn pad(s: &str, width: usize) -> String {
    if s.len() >= width {
        s[s.len() - width..].to_string()
    } else {
        format!("{}{s}", "0".repeat(width - s.len()))
    }
}

fn to_base36(mut number: u64) -> String {
    if number == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while number > 0 {
        digits.push(ALPHABET[(number % BASE) as usize]);
        number /= BASE;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}
