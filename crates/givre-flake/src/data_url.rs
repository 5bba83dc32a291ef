use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::svg::to_svg;

/// Minimal empty image used when a caller needs a guaranteed-tiny fallback.
const PLACEHOLDER_SVG: &str =
    r#"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64"></svg>"#;

/// Render `text` (seeded by `signature` when present) into a percent-encoded
/// `data:image/svg+xml` URL. Blank text falls back the same way
/// [`to_svg`] does, so this never fails on empty input.
pub fn to_data_url(text: &str, size: u32, signature: &str) -> String {
    let svg = to_svg(text, size, signature);
    format!("data:image/svg+xml;charset=UTF-8,{}", encode_uri_component(&svg))
}

/// Base64 variant of [`to_data_url`] for hosts that mangle percent-encoding.
pub fn to_data_url_base64(text: &str, size: u32, signature: &str) -> String {
    let svg = to_svg(text, size, signature);
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg.as_bytes()))
}

/// The fixed minimal placeholder image.
///
/// Both URL builders encode valid UTF-8 and cannot fail, so no rendering
/// path degrades to this image on its own. It stays on the public surface
/// so embedders that need a guaranteed-tiny stand-in for a snowflake emit
/// a stable, known URL.
pub fn placeholder_data_url() -> String {
    format!(
        "data:image/svg+xml;charset=UTF-8,{}",
        encode_uri_component(PLACEHOLDER_SVG)
    )
}

/// Percent-encode with the ECMAScript `encodeURIComponent` escape set:
/// alphanumerics and `- _ . ! ~ * ' ( )` pass through, everything else is
/// emitted as uppercase-hex UTF-8 byte escapes. Issued data URLs use exactly
/// this set, so it is pinned here rather than borrowed from a URL library.
fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 3);
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' => out.push(byte as char),
            b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')' => {
                out.push(byte as char)
            }
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}
