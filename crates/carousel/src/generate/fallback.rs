//! Offline stand-ins for every AI call. Deterministic given the same input.

use super::SlideDraft;

/// Background palette assigned round-robin by slide index.
pub const GRADIENTS: [&str; 5] = [
    "linear-gradient(135deg, #135bec 0%, #2ecc71 100%)",
    "linear-gradient(135deg, #9b59b6 0%, #8e44ad 100%)",
    "linear-gradient(135deg, #34495e 0%, #2c3e50 100%)",
    "linear-gradient(135deg, #f1c40f 0%, #e67e22 100%)",
    "linear-gradient(135deg, #e74c3c 0%, #c0392b 100%)",
];

pub const DEFAULT_ICONS: [&str; 3] = ["rocket", "star", "lightbulb"];

pub fn gradient_for(index: usize) -> &'static str {
    GRADIENTS[index % GRADIENTS.len()]
}

pub fn drafts(count: usize) -> Vec<SlideDraft> {
    (0..count)
        .map(|i| SlideDraft {
            title: if i == 0 {
                "Unlock Your Potential".to_string()
            } else {
                format!("Strategy #{i}")
            },
            content: "Slide content here.".to_string(),
            visual_description: "Abstract blue waves".to_string(),
        })
        .collect()
}

pub fn icons() -> Vec<String> {
    DEFAULT_ICONS.iter().map(|s| s.to_string()).collect()
}

/// Seeded placeholder photo for `prompt`.
pub fn placeholder_image(prompt: &str) -> String {
    format!(
        "url('https://picsum.photos/seed/{}/800/1000')",
        encode_uri_component(prompt)
    )
}

/// Percent-encode everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
pub fn encode_uri_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(b as char),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drafts_placeholder_copy() {
        let d = drafts(3);
        assert_eq!(d.len(), 3);
        assert_eq!(d[0].title, "Unlock Your Potential");
        assert_eq!(d[2].title, "Strategy #2");
    }

    #[test]
    fn test_gradient_round_robin() {
        assert_eq!(gradient_for(0), gradient_for(5));
        assert_ne!(gradient_for(0), gradient_for(1));
    }

    #[test]
    fn test_placeholder_is_seeded_by_prompt() {
        assert_eq!(
            placeholder_image("blue waves & sun"),
            "url('https://picsum.photos/seed/blue%20waves%20%26%20sun/800/1000')"
        );
        assert_eq!(encode_uri_component("é"), "%C3%A9");
    }
}
