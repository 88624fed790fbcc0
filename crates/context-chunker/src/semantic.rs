use crate::config::ChunkerConfig;
use crate::types::{chunk_id, Chunk, ChunkMetadata};
use context_cancel::{is_cancelled, CancellationToken};

/// Semantic chunking (spec §4.1). Splits on sentence boundaries, then
/// accumulates sentences into chunks up to `max_chunk_size`.
///
/// The source describes the split as the regex `(?<=[.?!]|\n)\s+` — a
/// lookbehind asserting the whitespace run is preceded by a sentence
/// terminator or newline. The `regex` crate has no lookbehind support, so
/// [`split_sentences`] reimplements the same split points with a manual
/// scan: a run of whitespace is a boundary only when the character right
/// before it is `.`, `?`, `!`, or `\n`; the terminator stays attached to the
/// sentence that precedes it and the whitespace itself is dropped, matching
/// what the regex split would produce.
pub fn chunk_semantic(
    content: &str,
    language: &str,
    file_path: Option<&str>,
    config: &ChunkerConfig,
    token: Option<&CancellationToken>,
) -> Vec<Chunk> {
    if content.is_empty() {
        return Vec::new();
    }

    let sentences = split_sentences(content);
    let mut chunks = Vec::new();
    let mut index = 0usize;

    let mut current_start: Option<usize> = None;
    let mut current_end = 0usize;
    let mut overlap_tail = String::new();

    let flush = |chunks: &mut Vec<Chunk>,
                 index: &mut usize,
                 current_start: usize,
                 current_end: usize,
                 overlap_tail: &str| {
        let body = &content[current_start..current_end];
        let text = if overlap_tail.is_empty() {
            body.to_string()
        } else {
            format!("{overlap_tail}{body}")
        };
        let start_line = content[..current_start].matches('\n').count();
        let end_line = content[..current_end].matches('\n').count();
        let metadata = ChunkMetadata {
            start_line,
            end_line,
            language: Some(language.to_string()),
            file_path: file_path.map(str::to_string),
            estimated_tokens: ChunkMetadata::estimate_tokens_from_content(&text),
            ..Default::default()
        };
        let id = chunk_id(file_path, *index, &text);
        chunks.push(Chunk::new(id, text, metadata));
        *index += 1;
    };

    for (offset, sentence) in sentences {
        if is_cancelled(token) {
            break;
        }
        if sentence.is_empty() {
            continue;
        }

        let projected_len = match current_start {
            Some(start) => (offset + sentence.len()) - start,
            None => sentence.len(),
        };

        if current_start.is_some() && projected_len > config.max_chunk_size {
            let start = current_start.take().unwrap();
            flush(&mut chunks, &mut index, start, current_end, &overlap_tail);
            overlap_tail = tail_chars(&content[start..current_end], config.overlap);
        }

        if current_start.is_none() {
            current_start = Some(offset);
        }
        current_end = offset + sentence.len();
    }

    if let Some(start) = current_start {
        if !is_cancelled(token) {
            flush(&mut chunks, &mut index, start, current_end, &overlap_tail);
        }
    }

    chunks
}

fn tail_chars(text: &str, n: usize) -> String {
    if n == 0 {
        return String::new();
    }
    let chars: Vec<char> = text.chars().collect();
    let start = chars.len().saturating_sub(n);
    chars[start..].iter().collect()
}

/// Returns `(byte_offset, slice)` pairs for each sentence, in source order.
fn split_sentences(content: &str) -> Vec<(usize, &str)> {
    let indexed: Vec<(usize, char)> = content.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;

    while i < indexed.len() {
        let (byte_idx, ch) = indexed[i];
        let is_terminator = matches!(ch, '.' | '?' | '!' | '\n');
        let followed_by_whitespace = indexed.get(i + 1).map(|(_, c)| c.is_whitespace()).unwrap_or(false);

        if is_terminator && followed_by_whitespace {
            let end_byte = byte_idx + ch.len_utf8();
            let mut j = i + 1;
            while j < indexed.len() && indexed[j].1.is_whitespace() {
                j += 1;
            }
            sentences.push((start, &content[start..end_byte]));
            start = if j < indexed.len() { indexed[j].0 } else { content.len() };
            i = j;
            continue;
        }
        i += 1;
    }

    if start < content.len() {
        sentences.push((start, &content[start..]));
    }
    sentences
}
