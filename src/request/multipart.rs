//! `multipart/form-data` body encoding for file uploads.
//!
//! The part layout is fixed by the server: extra string fields first, each
//! as its own `form-data` part, then the single binary file part with
//! `Content-Type: application/octet-stream`, then the closing boundary
//! marker. The raw file bytes are embedded untouched.

use std::collections::BTreeMap;

use bytes::{BufMut, Bytes, BytesMut};
use rand::Rng as _;

const HEX: [u8; 16] = *b"0123456789abcdef";

/// An encoded multipart body together with the boundary token it used.
#[derive(Debug, Clone)]
pub struct MultipartBody {
    /// The boundary token, without the leading `--`.
    pub boundary: String,
    /// The complete encoded body.
    pub body: Bytes,
}

/// Generates a fresh boundary token from 128 random bits.
///
/// Tokens must be unique across concurrent calls.
#[must_use]
pub(crate) fn boundary_token() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill(&mut bytes[..]);

    let mut token = String::with_capacity(8 + 32);
    token.push_str("skingen-");
    for &b in &bytes {
        token.push(char::from(HEX[(b >> 4) as usize]));
        token.push(char::from(HEX[(b & 0x0F) as usize]));
    }
    token
}

/// Encodes one file upload plus extra string fields into a multipart body.
///
/// `extra_fields` is a [`BTreeMap`] so the part order is deterministic.
#[must_use]
pub fn encode_file_upload(
    field_name: &str,
    filename: &str,
    file: &[u8],
    extra_fields: &BTreeMap<String, String>,
) -> MultipartBody {
    let boundary = boundary_token();
    let mut body = BytesMut::with_capacity(file.len() + 512);

    for (key, value) in extra_fields {
        body.put_slice(format!("--{boundary}\r\n").as_bytes());
        body.put_slice(
            format!("Content-Disposition: form-data; name=\"{key}\"\r\n\r\n{value}\r\n").as_bytes(),
        );
    }

    body.put_slice(format!("--{boundary}\r\n").as_bytes());
    body.put_slice(
        format!("Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.put_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.put_slice(file);
    body.put_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    MultipartBody {
        boundary,
        body: body.freeze(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack
            .windows(needle.len())
            .position(|window| window == needle)
    }

    #[test]
    fn file_part_layout_is_exact() {
        let encoded = encode_file_upload("file", "skin.png", &[0x01, 0x02], &BTreeMap::new());
        let body = encoded.body.as_ref();
        let boundary = &encoded.boundary;

        let expected_prefix = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"skin.png\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        );
        let expected_suffix = format!("\r\n--{boundary}--\r\n");

        assert!(body.starts_with(expected_prefix.as_bytes()));
        assert!(body.ends_with(expected_suffix.as_bytes()));
        assert_eq!(
            &body[expected_prefix.len()..body.len() - expected_suffix.len()],
            &[0x01, 0x02],
        );
    }

    #[test]
    fn binary_payload_is_not_reencoded() {
        let payload: Vec<u8> = (0..=255).collect();
        let encoded = encode_file_upload("file", "skin.png", &payload, &BTreeMap::new());
        assert!(find(encoded.body.as_ref(), &payload).is_some());
    }

    #[test]
    fn extra_fields_precede_the_file_part() {
        let mut fields = BTreeMap::new();
        fields.insert("name".to_owned(), "My Skin".to_owned());
        fields.insert("variant".to_owned(), "slim".to_owned());

        let encoded = encode_file_upload("file", "skin.png", &[0xFF], &fields);
        let body = encoded.body.as_ref();

        let name_part = find(
            body,
            b"Content-Disposition: form-data; name=\"name\"\r\n\r\nMy Skin\r\n",
        )
        .expect("name part present");
        let variant_part = find(
            body,
            b"Content-Disposition: form-data; name=\"variant\"\r\n\r\nslim\r\n",
        )
        .expect("variant part present");
        let file_part = find(body, b"filename=\"skin.png\"").expect("file part present");

        assert!(name_part < variant_part);
        assert!(variant_part < file_part);
    }

    #[test]
    fn boundary_tokens_are_unique_per_call() {
        let first = encode_file_upload("file", "a.png", &[0x00], &BTreeMap::new());
        let second = encode_file_upload("file", "a.png", &[0x00], &BTreeMap::new());
        assert_ne!(first.boundary, second.boundary);
    }
}
