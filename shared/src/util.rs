/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 6;

/// Generate a record ID: `<unix millis>-<6 char base36 suffix>`.
///
/// The millisecond prefix keeps IDs roughly time ordered when the sheet is
/// sorted by ID; the suffix separates records created in the same millisecond
/// (36^6 values, plenty for a single kitchen tablet).
pub fn record_id() -> String {
    record_id_at(now_millis())
}

/// Same as [`record_id`] with an explicit timestamp (used by tests and imports)
pub fn record_id_at(millis: i64) -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!("{millis}-{suffix}")
}
