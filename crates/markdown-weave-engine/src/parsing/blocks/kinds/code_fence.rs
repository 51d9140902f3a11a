use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// An opening fence row: the back-tick run length and the info string's first word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceOpen {
    pub run: usize,
    pub language: Option<String>,
}

pub struct CodeFence;

impl CodeFence {
    pub const TICK: char = '`';
    pub const MIN_RUN: usize = 3;
    /// Info string whose body is base64 and is decoded before display.
    pub const BASE64: &'static str = "base64";
    /// Language given to successfully decoded base64 bodies.
    pub const DECODED: &'static str = "text";

    pub fn open(row: &str) -> Option<FenceOpen> {
        let run = row.chars().take_while(|&c| c == Self::TICK).count();
        if run < Self::MIN_RUN {
            return None;
        }
        let info = row[run..].trim();
        if info.contains(Self::TICK) {
            return None;
        }
        Some(FenceOpen {
            run,
            language: info.split_whitespace().next().map(str::to_string),
        })
    }

    /// A closing fence is a row of back-ticks at least as long as the opener.
    pub fn closes(row: &str, run: usize) -> bool {
        let t = row.trim();
        t.len() >= run && t.chars().all(|c| c == Self::TICK)
    }

    /// Decodes a base64 body, ignoring whitespace. `None` when it is not
    /// valid base64 or does not decode to UTF-8 text.
    pub fn decode_base64(body: &str) -> Option<String> {
        let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = STANDARD.decode(compact).ok()?;
        String::from_utf8(bytes).ok()
    }
}
