//! Message sending helpers for the Telegram adapter.
//!
//! Telegram's message limit is 4096 characters. We use 4090 bytes for safety.

use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode, ReplyParameters};
use tracing::warn;

use crate::error::TelegramError;

/// Maximum bytes per Telegram message (limit is 4096 characters).
const CHUNK_MAX: usize = 4090;

/// Line-aware splitter for plain text.
///
/// Packs whole lines into chunks of at most [`CHUNK_MAX`] bytes. A single
/// line longer than that is split at the last space (or char boundary)
/// that fits.
pub fn split_chunks(text: &str) -> Vec<String> {
    split(text, false)
}

/// Markup-aware splitter for Telegram HTML.
///
/// Same packing as [`split_chunks`], but a cut never lands inside a tag or an
/// entity. Tags still open at a cut are closed at the end of the chunk and
/// re-opened at the start of the next one, so every chunk parses on its own.
pub fn split_html_chunks(text: &str) -> Vec<String> {
    split(text, true)
}

fn split(text: &str, html: bool) -> Vec<String> {
    if text.len() <= CHUNK_MAX {
        return vec![text.to_string()];
    }

    let mut chunker = Chunker::new(html);
    for line in text.split('\n') {
        chunker.push_line(line);
    }
    chunker.finish()
}

struct OpenTag {
    name: String,
    /// Opening tag as written, attributes included.
    markup: String,
}

struct Chunker {
    html: bool,
    chunks: Vec<String>,
    current: String,
    open: Vec<OpenTag>,
    /// `current` holds nothing but re-opened tags.
    fresh: bool,
}

impl Chunker {
    fn new(html: bool) -> Self {
        Self {
            html,
            chunks: Vec::new(),
            current: String::new(),
            open: Vec::new(),
            fresh: true,
        }
    }

    fn push_line(&mut self, line: &str) {
        let atoms = atoms(line, self.html);
        let sep = usize::from(!self.fresh);

        if self.fits(sep + line.len(), &atoms) {
            self.append(sep, &atoms);
            return;
        }
        if !self.fresh && self.fits_fresh(line.len(), &atoms) {
            self.flush();
            self.append(0, &atoms);
            return;
        }

        // Longer than any chunk: fill the current one, then go word by word.
        if !self.fresh {
            self.current.push('\n');
        }
        for segment in atoms.split_inclusive(|a| *a == " ") {
            let len = segment.iter().map(|a| a.len()).sum();
            if !self.fresh && !self.fits(len, segment) {
                self.flush();
            }
            if self.fits(len, segment) {
                self.append(0, segment);
                continue;
            }
            for atom in segment {
                if !self.fresh && !self.fits(atom.len(), &[*atom]) {
                    self.flush();
                }
                self.push_atom(atom);
            }
        }
    }

    /// Whether `len` more bytes made of `atoms` fit, counting the closing
    /// tags the chunk would need afterwards.
    fn fits(&self, len: usize, atoms: &[&str]) -> bool {
        self.current.len() + len + closing_len(&self.open, atoms) <= CHUNK_MAX
    }

    fn fits_fresh(&self, len: usize, atoms: &[&str]) -> bool {
        let reopen: usize = self.open.iter().map(|t| t.markup.len()).sum();
        reopen + len + closing_len(&self.open, atoms) <= CHUNK_MAX
    }

    fn append(&mut self, sep: usize, atoms: &[&str]) {
        if sep > 0 {
            self.current.push('\n');
            self.fresh = false;
        }
        for atom in atoms {
            self.push_atom(atom);
        }
    }

    fn push_atom(&mut self, atom: &str) {
        self.current.push_str(atom);
        self.fresh = false;
        match tag(atom) {
            Some(Tag::Open(name)) => self.open.push(OpenTag {
                name: name.to_string(),
                markup: atom.to_string(),
            }),
            Some(Tag::Close(name)) => {
                if let Some(pos) = self.open.iter().rposition(|t| t.name == name) {
                    self.open.remove(pos);
                }
            }
            None => {}
        }
    }

    fn flush(&mut self) {
        let kept = self.current.trim_end_matches([' ', '\n']).len();
        self.current.truncate(kept);
        for tag in self.open.iter().rev() {
            self.current.push_str("</");
            self.current.push_str(&tag.name);
            self.current.push('>');
        }
        self.chunks.push(std::mem::take(&mut self.current));
        for tag in &self.open {
            self.current.push_str(&tag.markup);
        }
        self.fresh = true;
    }

    fn finish(mut self) -> Vec<String> {
        if !self.fresh {
            self.chunks.push(self.current);
        }
        self.chunks
    }
}

enum Tag<'a> {
    Open(&'a str),
    Close(&'a str),
}

fn tag(atom: &str) -> Option<Tag<'_>> {
    let inner = atom.strip_prefix('<')?.strip_suffix('>')?;
    if let Some(name) = inner.strip_prefix('/') {
        return Some(Tag::Close(name.trim()));
    }
    if inner.ends_with('/') {
        return None;
    }
    let name = inner.split_whitespace().next()?;
    Some(Tag::Open(name))
}

/// Bytes of closing tags needed once `atoms` are appended on top of `open`.
fn closing_len(open: &[OpenTag], atoms: &[&str]) -> usize {
    let mut names: Vec<&str> = open.iter().map(|t| t.name.as_str()).collect();
    for atom in atoms {
        match tag(atom) {
            Some(Tag::Open(name)) => names.push(name),
            Some(Tag::Close(name)) => {
                if let Some(pos) = names.iter().rposition(|n| *n == name) {
                    names.remove(pos);
                }
            }
            None => {}
        }
    }
    names.iter().map(|n| n.len() + 3).sum()
}

/// Cut `text` into the smallest pieces a chunk boundary may fall between:
/// single chars, plus whole tags and entities in HTML mode.
fn atoms(text: &str, html: bool) -> Vec<&str> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        let len = html
            .then(|| markup_len(rest))
            .flatten()
            .unwrap_or(c.len_utf8());
        out.push(&rest[..len]);
        rest = &rest[len..];
    }
    out
}

/// Length of the tag or entity `s` starts with.
fn markup_len(s: &str) -> Option<usize> {
    match s.as_bytes().first()? {
        b'<' => s.find('>').map(|i| i + 1),
        b'&' => {
            let end = s.bytes().take(10).position(|b| b == b';')?;
            let name = &s[1..end];
            let valid = !name.is_empty()
                && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '#');
            valid.then_some(end + 1)
        }
        _ => None,
    }
}

/// Send `text` to `chat_id` in chunks, in order.
///
/// The first chunk replies to `reply_to` when given. A 100ms delay is inserted
/// between consecutive chunks to avoid hitting rate limits. The first failing
/// chunk aborts the send; nothing is retried.
pub async fn send_chunked(
    bot: &Bot,
    chat_id: ChatId,
    reply_to: Option<i32>,
    text: &str,
    parse_mode: Option<ParseMode>,
) -> Result<(), TelegramError> {
    if text.trim().is_empty() {
        return Err(TelegramError::Rejected("empty message".to_string()));
    }

    let chunks = match parse_mode {
        Some(ParseMode::Html) => split_html_chunks(text),
        _ => split_chunks(text),
    };
    for (i, chunk) in chunks.iter().enumerate() {
        let mut req = bot.send_message(chat_id, chunk.as_str());
        if let Some(mode) = parse_mode {
            req = req.parse_mode(mode);
        }
        if i == 0 {
            if let Some(id) = reply_to {
                req = req.reply_parameters(ReplyParameters::new(MessageId(id)));
            }
        }

        if let Err(e) = req.await {
            warn!(error = %e, chunk_index = i, chunks = chunks.len(), "Telegram: send failed");
            return Err(e.into());
        }

        if i + 1 < chunks.len() {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
    Ok(())
}
