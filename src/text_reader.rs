use encoding_rs::Encoding;

use crate::model::SourceLine;

/// Decodes text bytes, honouring a UTF-8/UTF-16 byte order mark and falling
/// back to lossy UTF-8.
#[must_use]
pub fn decode_text(bytes: &[u8]) -> String {
    match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => {
            let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
            text.into_owned()
        }
        None => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Each non-empty trimmed line, numbered by its 1-based line number.
#[must_use]
pub fn text_lines(text: &str) -> Vec<SourceLine> {
    text.lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            let number = u32::try_from(index + 1).unwrap_or(u32::MAX);
            Some(SourceLine::new(number, line))
        })
        .collect()
}

#[must_use]
pub fn read_text_lines(bytes: &[u8]) -> Vec<SourceLine> {
    text_lines(&decode_text(bytes))
}
