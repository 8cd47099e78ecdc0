#![allow(dead_code)]

use std::io::Write;
use tempfile::NamedTempFile;

/// Writes a config whose `SANDBOX` module points at `base_url`, using the Toss
/// response contract and a `Bearer` auth prefix.
pub fn sandbox_config(base_url: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create config file");
    writeln!(
        file,
        r#"
timeout_secs = 5

[[modules]]
key = "SANDBOX"
name = "Sandbox gateway"
session_url = "{base_url}/v1/payments"
approval_url = "{base_url}/v1/payments/confirm"
auth = {{ scheme = "prefixed", prefix = "Bearer" }}
contract = {{ status_field = "status", success_values = ["DONE"], payment_id_field = "paymentKey" }}
"#
    )
    .expect("Failed to write config file");
    file
}
