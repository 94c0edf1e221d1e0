use std::collections::HashMap;

use md5::{Digest, Md5};

/// Reserved parameter name the signature is transmitted under. Never part
/// of the signed set itself.
pub const SIGNATURE_PARAM: &str = "api_sig";

/// Computes the Last.fm request signature for a parameter mapping.
///
/// Parameter names are sorted by their raw byte ordering, each name is
/// concatenated immediately followed by its value, the shared secret is
/// appended, and the MD5 digest of the UTF-8 bytes is returned as lowercase
/// hex. The remote service recomputes the same digest and rejects
/// mismatches, so both the ordering and the concatenation are exact.
pub fn sign(params: &HashMap<String, String>, secret: &str) -> String {
    let mut names: Vec<&String> = params.keys().collect();
    names.sort();

    let mut payload = String::new();
    for name in names {
        payload.push_str(name);
        payload.push_str(&params[name]);
    }
    payload.push_str(secret);

    format!("{:x}", Md5::digest(payload.as_bytes()))
}
