use crate::config::ChunkerConfig;
use crate::types::{chunk_id, Chunk, ChunkMetadata};
use context_cancel::{is_cancelled, CancellationToken};

const BOUNDARY_WINDOW: usize = 100;
const DELIMITERS_IN_PREFERENCE_ORDER: [&str; 5] = ["\n\n", "\n", ". ", ", ", " "];

/// Fixed-size chunking (spec §4.1). Emits slices of at most `max_chunk_size`
/// characters; when a cut would fall mid-sentence it searches a window of
/// `BOUNDARY_WINDOW` characters around the candidate boundary and prefers,
/// in order, a paragraph break, a line break, a sentence end, a comma, or a
/// plain space. Falls back to the raw candidate only when no such boundary
/// exists in the window. `overlap` characters of trailing context are
/// prepended to the next chunk when configured.
pub fn chunk_fixed_size(
    content: &str,
    language: &str,
    file_path: Option<&str>,
    config: &ChunkerConfig,
    token: Option<&CancellationToken>,
) -> Vec<Chunk> {
    let chars: Vec<char> = content.chars().collect();
    let len = chars.len();
    if len == 0 {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut start = 0usize;
    let mut index = 0usize;

    while start < len {
        if is_cancelled(token) {
            break;
        }

        let candidate = (start + config.max_chunk_size).min(len);
        let end = if candidate >= len {
            len
        } else {
            resolve_boundary(&chars, start, candidate).unwrap_or(candidate).max(start + 1)
        };

        let overlap_start = if start > 0 { start.saturating_sub(config.overlap) } else { start };
        let slice_start = if index == 0 { start } else { overlap_start.max(0) };
        let slice_start = slice_start.min(start);
        let slice: String = chars[slice_start..end].iter().collect();

        let start_line = content[..byte_offset(&chars, slice_start)].matches('\n').count();
        let end_line = content[..byte_offset(&chars, end.min(len))].matches('\n').count();

        let metadata = ChunkMetadata {
            start_line,
            end_line,
            language: Some(language.to_string()),
            file_path: file_path.map(str::to_string),
            estimated_tokens: ChunkMetadata::estimate_tokens_from_content(&slice),
            ..Default::default()
        };

        let id = chunk_id(file_path, index, &slice);
        chunks.push(Chunk::new(id, slice, metadata));

        start = end;
        index += 1;
    }

    chunks
}

fn byte_offset(chars: &[char], char_index: usize) -> usize {
    chars[..char_index].iter().map(|c| c.len_utf8()).sum()
}

fn resolve_boundary(chars: &[char], start: usize, candidate: usize) -> Option<usize> {
    let window_start = candidate.saturating_sub(BOUNDARY_WINDOW).max(start);
    let window_end = (candidate + BOUNDARY_WINDOW).min(chars.len());

    for delimiter in DELIMITERS_IN_PREFERENCE_ORDER {
        let pattern: Vec<char> = delimiter.chars().collect();
        let mut last_match = None;
        let mut i = window_start;
        while i + pattern.len() <= window_end {
            if chars[i..i + pattern.len()] == pattern[..] {
                last_match = Some(i + pattern.len());
            }
            i += 1;
        }
        if let Some(cut) = last_match {
            if cut > start {
                return Some(cut);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max: usize, overlap: usize) -> ChunkerConfig {
        ChunkerConfig { max_chunk_size: max, overlap, min_chunk_size: overlap + 1, ..Default::default() }
    }

    #[test]
    fn content_shorter_than_max_yields_one_chunk() {
        let chunks = chunk_fixed_size("short text", "plaintext", None, &config(2000, 0), None);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "short text");
    }

    #[test]
    fn long_content_is_split_and_prefers_paragraph_boundary() {
        let para_a = "a".repeat(50);
        let para_b = "b".repeat(50);
        let content = format!("{para_a}\n\n{para_b}");
        let chunks = chunk_fixed_size(&content, "plaintext", None, &config(60, 0), None);

        assert!(chunks.len() >= 2);
        assert!(chunks[0].content.ends_with("\n\n") || chunks[0].content.ends_with('a'));
    }

    #[test]
    fn boundary_at_exact_length_never_produces_empty_trailing_chunk() {
        let content = "x".repeat(100);
        let chunks = chunk_fixed_size(&content, "plaintext", None, &config(100, 0), None);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content.chars().count(), 100);
    }

    #[test]
    fn empty_content_yields_no_chunks() {
        assert!(chunk_fixed_size("", "plaintext", None, &config(100, 0), None).is_empty());
    }

    #[test]
    fn cancellation_before_first_chunk_returns_empty() {
        let source = context_cancel::CancellationTokenSource::new();
        source.cancel();
        let token = source.token();
        let chunks = chunk_fixed_size(&"x".repeat(500), "plaintext", None, &config(50, 0), Some(&token));
        assert!(chunks.is_empty());
    }
}
