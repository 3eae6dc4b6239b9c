use std::{
  borrow::Cow,
  str::Utf8Error,
};

use percent_encoding::percent_decode_str;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
  #[error("malformed percent escape at byte {offset} in '{input}'")]
  MalformedEscape { input: String, offset: usize },

  #[error("percent escapes in '{input}' do not decode to UTF-8: {source}")]
  InvalidUtf8 {
    input:  String,
    #[source]
    source: Utf8Error,
  },
}

/// Decodes a percent-encoded URI component.
///
/// Every `%` must start a complete `%XY` escape and the decoded bytes must
/// form valid UTF-8. `+` has no special meaning. Input without any `%` is
/// returned as is.
pub fn decode_component(input: &str) -> Result<Cow<'_, str>, DecodeError> {
  if !input.contains('%') {
    return Ok(Cow::Borrowed(input));
  }

  let bytes = input.as_bytes();
  for (offset, _) in input.match_indices('%') {
    let well_formed = bytes
      .get(offset + 1..offset + 3)
      .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
    if !well_formed {
      return Err(DecodeError::MalformedEscape {
        input: input.to_string(),
        offset,
      });
    }
  }

  percent_decode_str(input)
    .decode_utf8()
    .map_err(|source| DecodeError::InvalidUtf8 {
      input: input.to_string(),
      source,
    })
}
