/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Current wall-clock time as an RFC3339 string with local offset.
///
/// Record timestamps are stored as strings so that filtering can treat
/// unparseable values as "does not match" instead of failing.
pub fn now_rfc3339() -> String {
    chrono::Local::now().to_rfc3339()
}

/// Generate a short random invoice code: `INV-` + 6 uppercase alphanumerics.
///
/// Uniqueness is the store's concern — it re-rolls against the existing
/// active and archived sets at generation time.
pub fn invoice_code() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::thread_rng();
    let code: String = (0..6)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();
    format!("INV-{code}")
}
