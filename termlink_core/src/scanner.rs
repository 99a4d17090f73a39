use crate::Delimiter;

/// A delimiter-bounded span found in a text run.
///
/// A span is *prefixed* when its body starts with `word-chars ':'`
/// (`{libs:Serde}`) and *bare* otherwise (`{Serde}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'t> {
	/// Byte offset of the opening delimiter in the scanned text.
	pub start: usize,
	/// Byte offset just past the closing delimiter.
	pub end: usize,
	/// The full matched text including both delimiters.
	pub literal: &'t str,
	/// Source name for prefixed spans.
	pub prefix: Option<&'t str>,
	/// Term text, untrimmed. For prefixed spans this is everything after the
	/// `:`.
	pub body: &'t str,
}

impl Span<'_> {
	pub fn is_prefixed(&self) -> bool {
		self.prefix.is_some()
	}
}

/// Find every delimiter-bounded span in `text`, leftmost first and
/// non-overlapping. When several delimiter pairs match at the same offset the
/// earliest pair in `delimiters` wins.
pub fn scan<'t>(text: &'t str, delimiters: &[Delimiter]) -> Vec<Span<'t>> {
	let mut spans = Vec::new();
	let mut cursor = 0;

	while cursor < text.len() {
		let found = delimiters
			.iter()
			.find_map(|delimiter| match_at(text, cursor, delimiter));

		if let Some(span) = found {
			cursor = span.end;
			spans.push(span);
		} else {
			cursor += text[cursor..].chars().next().map_or(1, char::len_utf8);
		}
	}

	spans
}

/// Try to match `delimiter` starting exactly at `start`. The body must hold
/// at least one character and may contain neither the opening nor the
/// closing literal, so a span never crosses a closing delimiter.
///
/// The walk stops at the first closing literal or as soon as an opening
/// literal lies wholly inside the would-be body, so each attempt reads no
/// further than the next delimiter.
fn match_at<'t>(text: &'t str, start: usize, delimiter: &Delimiter) -> Option<Span<'t>> {
	let open = delimiter.open();
	let close = delimiter.close();
	let after_open = text[start..].strip_prefix(open)?;
	let first = after_open.chars().next()?.len_utf8();
	let mut nested_open_end = None;
	let mut body_len = None;

	for (idx, _) in after_open.char_indices() {
		if nested_open_end.is_some_and(|end| idx >= end) {
			return None;
		}
		if idx >= first && after_open[idx..].starts_with(close) {
			body_len = Some(idx);
			break;
		}
		if nested_open_end.is_none() && after_open[idx..].starts_with(open) {
			nested_open_end = Some(idx + open.len());
		}
	}

	let body_len = body_len?;
	let body = &after_open[..body_len];

	if body.contains(open) || body.contains(close) {
		return None;
	}

	let end = start + open.len() + body_len + close.len();
	let (prefix, body) = split_prefix(body);

	Some(Span {
		start,
		end,
		literal: &text[start..end],
		prefix,
		body,
	})
}

/// Split a `source:term` header off a span body. The header must start the
/// body, consist of word characters and may be followed by whitespace before
/// the colon. A header with nothing after the colon leaves the body bare.
fn split_prefix(body: &str) -> (Option<&str>, &str) {
	let Some(colon) = body.find(':') else {
		return (None, body);
	};

	let name = body[..colon].trim_end();
	let term = &body[colon + 1..];

	if name.is_empty() || term.is_empty() || !name.chars().all(is_word_char) {
		return (None, body);
	}

	(Some(name), term)
}

fn is_word_char(ch: char) -> bool {
	ch.is_alphanumeric() || ch == '_' || ch == '-'
}
