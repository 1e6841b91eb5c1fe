//! Font decoding: glyph codes to Unicode text and advance widths.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object};
use tracing::trace;

use super::object::{number, resolve};

/// Width used when a font carries no metrics at all (thousandths of an em).
const FALLBACK_WIDTH: f64 = 500.0;
const MONOSPACE_WIDTH: f64 = 600.0;
/// Code ranges in `/W` and `bfrange` spanning more codes than this are ignored.
const MAX_RANGE_SPAN: u32 = 0xFFFF;

/// One decoded glyph.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Glyph {
    pub text: String,
    /// Advance in thousandths of an em.
    pub width: f64,
    /// Single-byte code 32, which receives word spacing.
    pub is_space: bool,
}

#[derive(Debug, Clone)]
enum Widths {
    Simple { first_char: u32, widths: Vec<f64> },
    Cid(HashMap<u32, f64>),
}

/// Decoding information for one font resource.
#[derive(Debug, Clone)]
pub(crate) struct FontInfo {
    two_byte: bool,
    to_unicode: Option<CMap>,
    widths: Widths,
    default_width: f64,
}

impl Default for FontInfo {
    fn default() -> Self {
        Self {
            two_byte: false,
            to_unicode: None,
            widths: Widths::Simple {
                first_char: 0,
                widths: Vec::new(),
            },
            default_width: FALLBACK_WIDTH,
        }
    }
}

impl FontInfo {
    /// Build decoding information from a font dictionary.
    pub fn load(doc: &Document, font: &Dictionary) -> Self {
        let subtype = font
            .get(b"Subtype")
            .ok()
            .and_then(|o| resolve(doc, o).as_name().ok())
            .unwrap_or(b"Type1".as_slice());
        let base_font = font
            .get(b"BaseFont")
            .ok()
            .and_then(|o| resolve(doc, o).as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_default();

        let to_unicode = font
            .get(b"ToUnicode")
            .ok()
            .and_then(|o| match resolve(doc, o) {
                Object::Stream(stream) => Some(
                    stream
                        .decompressed_content()
                        .unwrap_or_else(|_| stream.content.clone()),
                ),
                _ => None,
            })
            .map(|data| CMap::parse(&data));
        if let Some(cmap) = &to_unicode {
            trace!("Font {} has a ToUnicode map with {} entries", base_font, cmap.len());
        }

        if subtype == b"Type0" {
            let descendant = font
                .get(b"DescendantFonts")
                .ok()
                .and_then(|o| resolve(doc, o).as_array().ok())
                .and_then(|arr| arr.first())
                .and_then(|o| resolve(doc, o).as_dict().ok());

            let default_width = descendant
                .and_then(|d| d.get(b"DW").ok())
                .and_then(|o| number(resolve(doc, o)))
                .unwrap_or(1000.0);
            let widths = descendant
                .and_then(|d| d.get(b"W").ok())
                .and_then(|o| resolve(doc, o).as_array().ok())
                .map(|arr| parse_cid_widths(doc, arr))
                .unwrap_or_default();

            trace!("Loaded CID font {} ({} widths)", base_font, widths.len());
            return Self {
                two_byte: true,
                to_unicode,
                widths: Widths::Cid(widths),
                default_width,
            };
        }

        let first_char = font
            .get(b"FirstChar")
            .ok()
            .and_then(|o| number(resolve(doc, o)))
            .unwrap_or(0.0) as u32;
        let widths: Vec<f64> = font
            .get(b"Widths")
            .ok()
            .and_then(|o| resolve(doc, o).as_array().ok())
            .map(|arr| {
                arr.iter()
                    .map(|w| number(resolve(doc, w)).unwrap_or(0.0))
                    .collect()
            })
            .unwrap_or_default();

        let missing_width = font
            .get(b"FontDescriptor")
            .ok()
            .and_then(|o| resolve(doc, o).as_dict().ok())
            .and_then(|d| d.get(b"MissingWidth").ok())
            .and_then(|o| number(resolve(doc, o)));

        let default_width = missing_width.filter(|w| *w > 0.0).unwrap_or_else(|| {
            if base_font.contains("Courier") {
                MONOSPACE_WIDTH
            } else {
                FALLBACK_WIDTH
            }
        });

        trace!(
            "Loaded simple font {} (first_char={}, {} widths)",
            base_font,
            first_char,
            widths.len()
        );

        Self {
            two_byte: false,
            to_unicode,
            widths: Widths::Simple { first_char, widths },
            default_width,
        }
    }

    /// Split a shown string into glyphs.
    pub fn decode(&self, bytes: &[u8]) -> Vec<Glyph> {
        let code_len = if self.two_byte { 2 } else { 1 };

        bytes
            .chunks(code_len)
            .map(|chunk| {
                let code = chunk.iter().fold(0u32, |acc, b| (acc << 8) | u32::from(*b));
                let text = match self.to_unicode.as_ref().and_then(|m| m.get(code)) {
                    Some(text) => text.to_string(),
                    None if !self.two_byte => win_ansi_char(chunk[0]).to_string(),
                    None => String::new(),
                };
                Glyph {
                    text,
                    width: self.width(code),
                    is_space: !self.two_byte && code == 32,
                }
            })
            .collect()
    }

    fn width(&self, code: u32) -> f64 {
        let width = match &self.widths {
            Widths::Simple { first_char, widths } => code
                .checked_sub(*first_char)
                .and_then(|i| widths.get(i as usize))
                .copied(),
            Widths::Cid(map) => map.get(&code).copied(),
        };
        match width {
            Some(w) if w > 0.0 => w,
            _ => self.default_width,
        }
    }
}

/// Parse a CID font `/W` array: `c [w1 w2 ...]` or `c_first c_last w`.
fn parse_cid_widths(doc: &Document, arr: &[Object]) -> HashMap<u32, f64> {
    let mut widths = HashMap::new();
    let mut i = 0;

    while i < arr.len() {
        let Some(start) = number(resolve(doc, &arr[i])) else {
            break;
        };
        let start = start as u32;

        match arr.get(i + 1).map(|o| resolve(doc, o)) {
            Some(Object::Array(list)) => {
                for (offset, w) in list.iter().enumerate() {
                    let code = u32::try_from(offset)
                        .ok()
                        .and_then(|offset| start.checked_add(offset));
                    if let (Some(code), Some(w)) = (code, number(resolve(doc, w))) {
                        widths.insert(code, w);
                    }
                }
                i += 2;
            }
            Some(end) => {
                let end = number(end).unwrap_or(start as f64) as u32;
                let w = arr.get(i + 2).and_then(|o| number(resolve(doc, o)));
                match (w, end.checked_sub(start)) {
                    (Some(w), Some(span)) if span <= MAX_RANGE_SPAN => {
                        for code in start..=end {
                            widths.insert(code, w);
                        }
                    }
                    _ => trace!("Ignoring /W range {}..={}", start, end),
                }
                i += 3;
            }
            None => break,
        }
    }

    widths
}

/// Single-byte decoding for fonts without a ToUnicode map.
fn win_ansi_char(byte: u8) -> char {
    match byte {
        0x80 => '€',
        0x82 => '‚',
        0x83 => 'ƒ',
        0x84 => '„',
        0x85 => '…',
        0x86 => '†',
        0x87 => '‡',
        0x88 => 'ˆ',
        0x89 => '‰',
        0x8A => 'Š',
        0x8B => '‹',
        0x8C => 'Œ',
        0x8E => 'Ž',
        0x91 => '‘',
        0x92 => '’',
        0x93 => '“',
        0x94 => '”',
        0x95 => '•',
        0x96 => '–',
        0x97 => '—',
        0x98 => '˜',
        0x99 => '™',
        0x9A => 'š',
        0x9B => '›',
        0x9C => 'œ',
        0x9E => 'ž',
        0x9F => 'Ÿ',
        b => char::from(b),
    }
}

/// `ToUnicode` mapping from glyph codes to text.
#[derive(Debug, Clone, Default)]
pub(crate) struct CMap {
    map: HashMap<u32, String>,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Hex(Vec<u8>),
    ArrayStart,
    ArrayEnd,
    Word(String),
}

impl CMap {
    pub fn get(&self, code: u32) -> Option<&str> {
        self.map.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Parse the `bfchar` and `bfrange` sections of a CMap stream.
    pub fn parse(data: &[u8]) -> Self {
        let tokens = tokenize(data);
        let mut map = HashMap::new();
        let mut i = 0;

        while i < tokens.len() {
            match &tokens[i] {
                Token::Word(w) if w == "beginbfchar" => {
                    i += 1;
                    while i + 1 < tokens.len() {
                        match (&tokens[i], &tokens[i + 1]) {
                            (Token::Hex(src), Token::Hex(dst)) => {
                                map.insert(code_of(src), utf16_text(dst));
                                i += 2;
                            }
                            _ => break,
                        }
                    }
                }
                Token::Word(w) if w == "beginbfrange" => {
                    i += 1;
                    while i + 2 < tokens.len() {
                        let (Token::Hex(lo), Token::Hex(hi)) = (&tokens[i], &tokens[i + 1]) else {
                            break;
                        };
                        let (lo, hi) = (code_of(lo), code_of(hi));
                        let bounded = hi.checked_sub(lo).is_some_and(|span| span <= MAX_RANGE_SPAN);
                        if !bounded {
                            trace!("Ignoring bfrange {:#x}..={:#x}", lo, hi);
                        }
                        match &tokens[i + 2] {
                            Token::Hex(dst) => {
                                if bounded {
                                    for code in lo..=hi {
                                        map.insert(code, utf16_text(&increment(dst, code - lo)));
                                    }
                                }
                                i += 3;
                            }
                            Token::ArrayStart => {
                                let mut j = i + 3;
                                let mut code = Some(lo);
                                while let Some(Token::Hex(dst)) = tokens.get(j) {
                                    if let Some(c) = code.filter(|c| bounded && *c <= hi) {
                                        map.insert(c, utf16_text(dst));
                                    }
                                    code = code.and_then(|c| c.checked_add(1));
                                    j += 1;
                                }
                                // Skip the closing bracket.
                                i = j + 1;
                            }
                            _ => break,
                        }
                    }
                }
                _ => i += 1,
            }
        }

        Self { map }
    }
}

fn tokenize(data: &[u8]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < data.len() {
        let b = data[i];
        match b {
            b'<' if data.get(i + 1) == Some(&b'<') => i += 2,
            b'>' if data.get(i + 1) == Some(&b'>') => i += 2,
            b'>' => i += 1,
            b'<' => {
                let end = data[i + 1..]
                    .iter()
                    .position(|c| *c == b'>')
                    .map(|p| i + 1 + p)
                    .unwrap_or(data.len());
                let hex: Vec<u8> = data[i + 1..end]
                    .iter()
                    .copied()
                    .filter(|c| c.is_ascii_hexdigit())
                    .collect();
                tokens.push(Token::Hex(hex_bytes(&hex)));
                i = end + 1;
            }
            b'[' => {
                tokens.push(Token::ArrayStart);
                i += 1;
            }
            b']' => {
                tokens.push(Token::ArrayEnd);
                i += 1;
            }
            b'%' => {
                while i < data.len() && data[i] != b'\n' && data[i] != b'\r' {
                    i += 1;
                }
            }
            c if c.is_ascii_whitespace() => i += 1,
            _ => {
                let start = i;
                while i < data.len()
                    && !data[i].is_ascii_whitespace()
                    && !matches!(data[i], b'<' | b'>' | b'[' | b']' | b'%')
                {
                    i += 1;
                }
                tokens.push(Token::Word(String::from_utf8_lossy(&data[start..i]).to_string()));
            }
        }
    }

    tokens
}

fn hex_bytes(hex: &[u8]) -> Vec<u8> {
    hex.chunks(2)
        .map(|pair| {
            let digit = |c: u8| (c as char).to_digit(16).unwrap_or(0) as u8;
            let hi = digit(pair[0]);
            let lo = pair.get(1).map(|c| digit(*c)).unwrap_or(0);
            (hi << 4) | lo
        })
        .collect()
}

fn code_of(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |acc, b| (acc << 8) | u32::from(*b))
}

/// Add `offset` to the last byte pair of a destination string.
fn increment(dst: &[u8], offset: u32) -> Vec<u8> {
    let mut out = dst.to_vec();
    if out.len() >= 2 {
        let n = out.len();
        let last = u32::from(u16::from_be_bytes([out[n - 2], out[n - 1]])).wrapping_add(offset);
        let [hi, lo] = (last as u16).to_be_bytes();
        out[n - 2] = hi;
        out[n - 1] = lo;
    } else if let Some(last) = out.last_mut() {
        *last = last.wrapping_add(offset as u8);
    }
    out
}

fn utf16_text(bytes: &[u8]) -> String {
    if bytes.len() == 1 {
        return char::from(bytes[0]).to_string();
    }
    let units: Vec<u16> = bytes
        .chunks(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair.get(1).copied().unwrap_or(0)]))
        .collect();
    String::from_utf16_lossy(&units)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CMAP: &str = r#"
/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
2 beginbfchar
<0003> <0020>
<0024> <0041>
endbfchar
2 beginbfrange
<0010> <0012> <0030>
<0020> <0021> [<0058> <0059>]
endbfrange
endcmap
"#;

    #[test]
    fn test_cmap_bfchar_and_bfrange() {
        let cmap = CMap::parse(CMAP.as_bytes());
        assert_eq!(cmap.get(0x0003), Some(" "));
        assert_eq!(cmap.get(0x0024), Some("A"));
        assert_eq!(cmap.get(0x0010), Some("0"));
        assert_eq!(cmap.get(0x0012), Some("2"));
        assert_eq!(cmap.get(0x0020), Some("X"));
        assert_eq!(cmap.get(0x0021), Some("Y"));
        assert_eq!(cmap.len(), 7);
    }

    #[test]
    fn test_simple_font_decode_without_metrics() {
        let font = FontInfo::default();
        let glyphs = font.decode(b"A $");

        assert_eq!(glyphs.len(), 3);
        assert_eq!(glyphs[0].text, "A");
        assert!(glyphs[1].is_space);
        assert_eq!(glyphs[2].width, FALLBACK_WIDTH);
    }

    #[test]
    fn test_win_ansi_specials() {
        assert_eq!(win_ansi_char(0x92), '’');
        assert_eq!(win_ansi_char(0xE9), 'é');
    }

    #[test]
    fn test_parse_cid_widths() {
        let doc = Document::with_version("1.5");
        let arr = vec![
            Object::Integer(1),
            Object::Array(vec![Object::Integer(500), Object::Integer(600)]),
            Object::Integer(10),
            Object::Integer(12),
            Object::Integer(250),
        ];
        let widths = parse_cid_widths(&doc, &arr);

        assert_eq!(widths.get(&1), Some(&500.0));
        assert_eq!(widths.get(&2), Some(&600.0));
        assert_eq!(widths.get(&11), Some(&250.0));
        assert_eq!(widths.len(), 5);
    }

    #[test]
    fn test_parse_cid_widths_out_of_range_codes() {
        let doc = Document::with_version("1.5");
        let arr = vec![
            Object::Integer(u32::MAX as i64),
            Object::Array(vec![Object::Integer(500), Object::Integer(600)]),
            Object::Integer(0),
            Object::Integer(u32::MAX as i64),
            Object::Integer(250),
            Object::Integer(20),
            Object::Integer(10),
            Object::Integer(250),
            Object::Integer(3),
            Object::Integer(4),
            Object::Integer(700),
        ];
        let widths = parse_cid_widths(&doc, &arr);

        assert_eq!(widths.get(&u32::MAX), Some(&500.0));
        assert_eq!(widths.get(&3), Some(&700.0));
        assert_eq!(widths.get(&4), Some(&700.0));
        assert_eq!(widths.len(), 3);
    }

    #[test]
    fn test_cmap_ignores_oversized_ranges() {
        let cmap = CMap::parse(
            b"beginbfrange\n\
              <000000> <3FFFFF> <0041>\n\
              <FFFFFFFF> <FFFFFFFF> [<0042> <0043>]\n\
              <0050> <0040> <0041>\n\
              <0001> <0002> <0061>\n\
              endbfrange",
        );

        assert_eq!(cmap.get(0xFFFF_FFFF), Some("B"));
        assert_eq!(cmap.get(0x0001), Some("a"));
        assert_eq!(cmap.get(0x0002), Some("b"));
        assert_eq!(cmap.get(0x0045), None);
        assert_eq!(cmap.len(), 3);
    }
}
