//! Base64 flavours used by JWK members and compact tokens

use std::borrow::Cow;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{DecodeError, Engine};

const fn url_engine(padded: bool, strict: bool) -> GeneralPurpose {
    let padding = if padded {
        DecodePaddingMode::RequireCanonical
    } else {
        DecodePaddingMode::RequireNone
    };
    GeneralPurpose::new(
        &alphabet::URL_SAFE,
        GeneralPurposeConfig::new()
            .with_encode_padding(padded)
            .with_decode_padding_mode(padding)
            .with_decode_allow_trailing_bits(!strict),
    )
}

static RAW_URL: GeneralPurpose = url_engine(false, false);
static RAW_URL_STRICT: GeneralPurpose = url_engine(false, true);
static URL: GeneralPurpose = url_engine(true, false);
static URL_STRICT: GeneralPurpose = url_engine(true, true);

/// Engine for token segments under the given options
pub(crate) fn token_engine(allow_padding: bool, strict: bool) -> &'static GeneralPurpose {
    match (allow_padding, strict) {
        (false, false) => &RAW_URL,
        (false, true) => &RAW_URL_STRICT,
        (true, false) => &URL,
        (true, true) => &URL_STRICT,
    }
}

/// Drop line breaks some producers wrap long base64 values with
fn strip_line_breaks(value: &str) -> Cow<'_, str> {
    if value.contains(['\r', '\n']) {
        Cow::Owned(value.chars().filter(|c| !matches!(c, '\r' | '\n')).collect())
    } else {
        Cow::Borrowed(value)
    }
}

/// Decode a token segment.
///
/// With padding allowed, the segment is right-padded with `=` to a multiple of
/// four first, so both padded and unpadded producers are accepted. Outside
/// strict mode embedded `\r` and `\n` are skipped.
pub(crate) fn decode_segment(
    segment: &str,
    allow_padding: bool,
    strict: bool,
) -> Result<Vec<u8>, DecodeError> {
    let segment = if strict { Cow::Borrowed(segment) } else { strip_line_breaks(segment) };
    let segment: Cow<'_, str> = match segment.len() % 4 {
        rem if allow_padding && rem > 0 => {
            Cow::Owned(format!("{segment}{}", "=".repeat(4 - rem)))
        }
        _ => segment,
    };
    token_engine(allow_padding, strict).decode(segment.as_bytes())
}

/// Encode a token segment
pub(crate) fn encode_segment(bytes: &[u8], allow_padding: bool, strict: bool) -> String {
    token_engine(allow_padding, strict).encode(bytes)
}

/// Decode a JWK member.
///
/// Members are unpadded base64url, but some producers pad them anyway; trailing
/// `=` is stripped before decoding. Embedded `\r` and `\n` are skipped.
pub fn decode_b64(value: &str) -> Result<Vec<u8>, DecodeError> {
    RAW_URL.decode(strip_line_breaks(value).trim_end_matches('='))
}

/// Encode a JWK member as unpadded base64url
#[must_use]
pub fn encode_b64(bytes: &[u8]) -> String {
    RAW_URL.encode(bytes)
}
