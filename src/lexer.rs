//! RTF lexer and line decoder.
//!
//! Turns an RTF source into [`RawLine`]s that still carry their formatting
//! control words. Downstream heuristics key on those words (`\fs`, `\cb`,
//! `\cf`, `\chftn`, `\par`), so the decoder only removes what is never a
//! structural cue:
//!
//! - group braces and ignorable destinations (`{\*...}`, font/color/style tables)
//! - raw CR/LF, which RTF treats as insignificant
//! - `\'hh` and `\uN` escapes, replaced by the characters they encode
//! - symbol words such as `\tab` or `\emdash`, replaced by their characters
//!
//! Every `\par` closes a line and is kept at the end of that line's text.

use crate::error::{Error, Result};
use encoding_rs::Encoding;
use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_while1, take_while_m_n},
    character::complete::{anychar, char, digit1, one_of},
    combinator::{map, map_res, opt, recognize, value},
    sequence::{pair, preceded},
};

/// Token types recognized by the RTF lexer.
#[derive(Debug, PartialEq, Clone)]
pub enum Token<'a> {
    /// `{`
    GroupStart,

    /// `}`
    GroupEnd,

    /// Control word such as `\fs48` (`raw` excludes the delimiter space)
    ControlWord {
        /// Word text including the backslash and parameter, e.g. `\fs48`
        raw: &'a str,
        /// Letters only, e.g. `fs`
        name: &'a str,
        /// Numeric parameter, if any
        param: Option<i32>,
        /// Whether a delimiter space followed the word
        spaced: bool,
    },

    /// Control symbol such as `\~` or `\*`
    Symbol(char),

    /// `\'hh` escaped byte in the document code page
    Hex(u8),

    /// Raw CR or LF (insignificant in RTF)
    Newline,

    /// Plain text run
    Text(&'a str),
}

/// One decoded line of markup, formatting codes intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// 1-based line number within the document
    pub number: usize,
    /// Line text, ending in `\par` for every line but possibly the last
    pub text: String,
}

impl RawLine {
    /// Create a line.
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// Destinations whose content is never document text.
const SKIPPED_DESTINATIONS: &[&str] = &[
    "fonttbl",
    "colortbl",
    "stylesheet",
    "info",
    "pict",
    "listtable",
    "listoverridetable",
    "rsidtbl",
    "generator",
    "themedata",
    "colorschememapping",
    "datastore",
    "latentstyles",
    "xmlnstbl",
];

fn group_start(input: &str) -> IResult<&str, Token<'_>> {
    value(Token::GroupStart, char('{'))(input)
}

fn group_end(input: &str) -> IResult<&str, Token<'_>> {
    value(Token::GroupEnd, char('}'))(input)
}

fn hex_escape(input: &str) -> IResult<&str, Token<'_>> {
    map_res(
        preceded(tag("\\'"), take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit())),
        |hex: &str| u8::from_str_radix(hex, 16).map(Token::Hex),
    )(input)
}

fn control_word(input: &str) -> IResult<&str, Token<'_>> {
    let (rest, raw) = recognize(pair(
        preceded(char('\\'), take_while_m_n(1, 32, |c: char| c.is_ascii_alphabetic())),
        opt(pair(opt(char('-')), digit1)),
    ))(input)?;
    let (rest, space) = opt(char(' '))(rest)?;

    let body = &raw[1..];
    let split = body
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(body.len());
    let (name, digits) = body.split_at(split);
    let param = if digits.is_empty() {
        None
    } else {
        digits.parse::<i32>().ok()
    };

    Ok((
        rest,
        Token::ControlWord {
            raw,
            name,
            param,
            spaced: space.is_some(),
        },
    ))
}

fn control_symbol(input: &str) -> IResult<&str, Token<'_>> {
    map(preceded(char('\\'), anychar), Token::Symbol)(input)
}

fn newline(input: &str) -> IResult<&str, Token<'_>> {
    value(Token::Newline, one_of("\r\n"))(input)
}

fn text(input: &str) -> IResult<&str, Token<'_>> {
    map(
        take_while1(|c: char| !matches!(c, '\\' | '{' | '}' | '\r' | '\n')),
        Token::Text,
    )(input)
}

/// Parse a single token.
pub fn token(input: &str) -> IResult<&str, Token<'_>> {
    alt((group_start, group_end, hex_escape, control_word, control_symbol, newline, text))(input)
}

/// Tokenize a whole RTF source.
///
/// Fails only on a dangling backslash at the end of input.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let mut input = source;
    while !input.is_empty() {
        match token(input) {
            Ok((rest, tok)) => {
                tokens.push(tok);
                input = rest;
            },
            Err(_) => {
                return Err(Error::decode(format!(
                    "unexpected input at byte {}",
                    source.len() - input.len()
                )));
            },
        }
    }
    Ok(tokens)
}

/// Map an `\ansicpgN` code page to an encoding.
pub fn encoding_for_codepage(codepage: i32) -> &'static Encoding {
    match codepage {
        65001 => encoding_rs::UTF_8,
        932 => encoding_rs::SHIFT_JIS,
        936 => encoding_rs::GBK,
        949 => encoding_rs::EUC_KR,
        950 => encoding_rs::BIG5,
        10000 => encoding_rs::MACINTOSH,
        20866 => encoding_rs::KOI8_R,
        n => Encoding::for_label(format!("windows-{}", n).as_bytes())
            .unwrap_or(encoding_rs::WINDOWS_1252),
    }
}

#[derive(Debug, Clone, Copy)]
struct GroupState {
    skip: bool,
    uc: usize,
}

impl Default for GroupState {
    fn default() -> Self {
        Self { skip: false, uc: 1 }
    }
}

struct LineDecoder {
    lines: Vec<RawLine>,
    current: String,
    stack: Vec<GroupState>,
    state: GroupState,
    at_group_start: bool,
    encoding: &'static Encoding,
    pending_bytes: Vec<u8>,
    skip_fallback: usize,
    high_surrogate: Option<u32>,
}

impl LineDecoder {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            current: String::new(),
            stack: Vec::new(),
            state: GroupState::default(),
            at_group_start: false,
            encoding: encoding_rs::WINDOWS_1252,
            pending_bytes: Vec::new(),
            skip_fallback: 0,
            high_surrogate: None,
        }
    }

    fn flush_bytes(&mut self) {
        if self.pending_bytes.is_empty() {
            return;
        }
        let (decoded, _) = self
            .encoding
            .decode_without_bom_handling(&self.pending_bytes);
        self.current.push_str(&decoded);
        self.pending_bytes.clear();
    }

    fn end_line(&mut self) {
        self.flush_bytes();
        self.current.push_str("\\par");
        let number = self.lines.len() + 1;
        self.lines.push(RawLine::new(number, std::mem::take(&mut self.current)));
    }

    fn push_unicode(&mut self, param: i32) {
        let code = if param < 0 {
            (param + 65536) as u32
        } else {
            param as u32
        };
        match code {
            0xD800..=0xDBFF => {
                self.high_surrogate = Some(code);
            },
            0xDC00..=0xDFFF => {
                let combined = self
                    .high_surrogate
                    .take()
                    .map(|high| 0x10000 + ((high - 0xD800) << 10) + (code - 0xDC00));
                self.current
                    .push(combined.and_then(char::from_u32).unwrap_or('\u{FFFD}'));
            },
            _ => {
                self.high_surrogate = None;
                self.current
                    .push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            },
        }
        self.skip_fallback = self.state.uc;
    }

    fn feed(&mut self, tok: Token<'_>) -> Result<()> {
        let group_opening = std::mem::replace(&mut self.at_group_start, false);

        match tok {
            Token::GroupStart => {
                self.flush_bytes();
                self.skip_fallback = 0;
                self.stack.push(self.state);
                self.at_group_start = true;
                return Ok(());
            },
            Token::GroupEnd => {
                self.flush_bytes();
                self.skip_fallback = 0;
                self.state = self
                    .stack
                    .pop()
                    .ok_or_else(|| Error::decode("unbalanced closing brace"))?;
                return Ok(());
            },
            Token::Newline => {
                self.at_group_start = group_opening;
                return Ok(());
            },
            _ => {},
        }

        if group_opening {
            let ignorable = match &tok {
                Token::Symbol('*') => true,
                Token::ControlWord { name, .. } => SKIPPED_DESTINATIONS.contains(name),
                _ => false,
            };
            if ignorable {
                self.state.skip = true;
            }
        }
        if self.state.skip {
            return Ok(());
        }

        match tok {
            Token::Hex(byte) => {
                if self.skip_fallback > 0 {
                    self.skip_fallback -= 1;
                } else {
                    self.pending_bytes.push(byte);
                }
            },
            Token::Text(run) => {
                self.flush_bytes();
                let mut chars = run.chars();
                while self.skip_fallback > 0 && chars.next().is_some() {
                    self.skip_fallback -= 1;
                }
                self.current.push_str(chars.as_str());
            },
            Token::ControlWord {
                raw,
                name,
                param,
                spaced,
            } => {
                self.flush_bytes();
                self.skip_fallback = 0;
                match name {
                    "par" => self.end_line(),
                    "u" => self.push_unicode(param.unwrap_or(0)),
                    "uc" => self.state.uc = param.unwrap_or(1).clamp(0, 16) as usize,
                    "ansicpg" => {
                        if let Some(cp) = param {
                            self.encoding = encoding_for_codepage(cp);
                        }
                        self.current.push_str(raw);
                    },
                    "tab" => self.current.push('\t'),
                    "emdash" => self.current.push('\u{2014}'),
                    "endash" => self.current.push('\u{2013}'),
                    "lquote" => self.current.push('\u{2018}'),
                    "rquote" => self.current.push('\u{2019}'),
                    "ldblquote" => self.current.push('\u{201C}'),
                    "rdblquote" => self.current.push('\u{201D}'),
                    "bullet" => self.current.push('\u{2022}'),
                    "emspace" | "enspace" | "qmspace" => self.current.push(' '),
                    _ => {
                        self.current.push_str(raw);
                        if spaced {
                            self.current.push(' ');
                        }
                    },
                }
            },
            Token::Symbol(symbol) => {
                self.flush_bytes();
                self.skip_fallback = 0;
                match symbol {
                    '\\' | '{' | '}' => {
                        self.current.push('\\');
                        self.current.push(symbol);
                    },
                    '~' => self.current.push('\u{00A0}'),
                    '_' => self.current.push('\u{2011}'),
                    '\n' | '\r' => self.end_line(),
                    _ => {},
                }
            },
            Token::GroupStart | Token::GroupEnd | Token::Newline => {},
        }
        Ok(())
    }

    fn finish(mut self) -> Vec<RawLine> {
        self.flush_bytes();
        if !self.stack.is_empty() {
            log::warn!("RTF source ends with {} unclosed group(s)", self.stack.len());
        }
        if !self.current.trim().is_empty() {
            let number = self.lines.len() + 1;
            self.lines.push(RawLine::new(number, self.current));
        }
        self.lines
    }
}

/// Decode an RTF source into lines that keep their control words.
///
/// # Errors
///
/// Returns [`Error::Decode`] when the source lacks an `{\rtf` header, closes
/// a group it never opened, or ends in a dangling backslash.
///
/// # Examples
///
/// ```
/// use rtf_oxide::lexer::decode;
///
/// let lines = decode(r"{\rtf1\ansi {\fonttbl{\f0 Arial;}}\fs48 Title\par \fs16 Body text\par}").unwrap();
/// assert_eq!(lines.len(), 2);
/// assert!(lines[0].text.ends_with(r"\fs48 Title\par"));
/// assert_eq!(lines[1].text, r"\fs16 Body text\par");
/// ```
pub fn decode(source: &str) -> Result<Vec<RawLine>> {
    let body = source.trim_start_matches('\u{FEFF}').trim_start();
    if !body.starts_with("{\\rtf") {
        return Err(Error::decode("missing \\rtf header"));
    }

    let mut decoder = LineDecoder::new();
    for tok in tokenize(body)? {
        decoder.feed(tok)?;
    }
    let lines = decoder.finish();
    log::debug!("Decoded {} line(s) from {} byte(s) of RTF", lines.len(), source.len());
    Ok(lines)
}

/// Decode raw bytes, replacing invalid UTF-8 sequences.
pub fn decode_bytes(bytes: &[u8]) -> Result<Vec<RawLine>> {
    decode(&String::from_utf8_lossy(bytes))
}
