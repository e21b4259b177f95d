/// Shown when the invitation link carries no guest name.
pub const DEFAULT_GUEST_NAME: &str = "Guest";

/// Turn the guest segment of an invitation URL into a display name.
///
/// `john+doe` and `john%20doe` both become "John Doe".
pub fn guest_display_name(segment: &str) -> String {
    let decoded = percent_decode(&segment.replace('+', " "));
    let words: Vec<String> = decoded.split_whitespace().map(capitalize).collect();
    if words.is_empty() {
        return DEFAULT_GUEST_NAME.to_string();
    }
    words.join(" ")
}

/// Avatar initials: first letter of up to two words, uppercased.
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split(' ')
        .filter_map(|word| word.chars().next())
        .take(2)
        .collect();
    if letters.is_empty() {
        return "A".to_string();
    }
    letters.to_uppercase()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// Malformed escapes are kept verbatim.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(byte) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
