//! Response content parser
//!
//! Splits a message's raw text into labeled code segments plus leftover
//! prose for rendering. Two ordered passes run over the text: a labeled
//! multi-segment pass (`[Label]` followed by a fenced block) and, only when
//! that finds nothing, a bare-fence fallback pass. Parsing is pure and
//! total: malformed input degrades to zero segments, never an error.

use crate::error::Result;
use regex::Regex;

/// Language placeholder for bare fences without an inline tag
const GENERIC_LANGUAGE: &str = "code";

/// A code segment extracted from a message
///
/// Derived at render time, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSegment {
    /// Label or inline language tag, trimmed; `"code"` when absent
    pub language: String,

    /// Fence body with leading/trailing whitespace trimmed
    pub code: String,

    /// Prose immediately preceding the fence, trimmed; empty if none
    pub explanation: String,
}

/// Extracts code segments from assistant message text
///
/// Construct once and reuse; both extraction patterns are compiled up
/// front.
///
/// # Examples
///
/// ```
/// use parley::response_parser::ResponseParser;
///
/// # fn main() -> parley::error::Result<()> {
/// let parser = ResponseParser::new()?;
/// let segments = parser.parse("Here is code:\n```py\nx=1\n```");
/// assert_eq!(segments[0].language, "py");
/// assert_eq!(segments[0].code, "x=1");
/// # Ok(())
/// # }
/// ```
pub struct ResponseParser {
    labeled: Regex,
    fenced: Regex,
}

impl ResponseParser {
    /// Create a parser with both extraction patterns compiled
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern fails to compile.
    pub fn new() -> Result<Self> {
        // `[Label]` then optional whitespace, a fence with an inline tag
        // line (ignored in this pass), and a lazily-matched body up to the
        // closing fence.
        let labeled = Regex::new(r"(?s)\[([^\[\]\n]*)\]\s*```[^\n]*\n(.*?)```")?;
        // Bare fence: inline tag on the opening line, lazy body, closing
        // fence required. An unterminated fence matches nothing.
        let fenced = Regex::new(r"(?s)```([^\n]*)\n(.*?)```")?;

        Ok(Self { labeled, fenced })
    }

    /// Extract all code segments from a message
    ///
    /// The labeled pass wins outright when it matches anything; the bare
    /// fence pass is only a fallback. Any input yields a (possibly empty)
    /// segment list.
    pub fn parse(&self, content: &str) -> Vec<CodeSegment> {
        let labeled = self.parse_labeled(content);
        if !labeled.is_empty() {
            return labeled;
        }
        self.parse_fenced(content)
    }

    /// The portion of a message to show as ordinary prose
    ///
    /// Everything before the first `[` label marker; the entire message
    /// when no marker exists.
    pub fn plain_text<'a>(&self, content: &'a str) -> &'a str {
        match content.find('[') {
            Some(idx) => &content[..idx],
            None => content,
        }
    }

    /// Multi-segment pass: `[Label]` immediately followed by a fence
    ///
    /// Each segment's explanation is the prose between the end of the
    /// previous fence (or document start) and this label, with dangling
    /// fence markers stripped.
    fn parse_labeled(&self, content: &str) -> Vec<CodeSegment> {
        let mut segments = Vec::new();
        let mut prev_end = 0;

        for captures in self.labeled.captures_iter(content) {
            let whole = captures.get(0).expect("match always has group 0");
            let language = captures
                .get(1)
                .map(|m| m.as_str().trim())
                .unwrap_or_default();
            let code = captures
                .get(2)
                .map(|m| m.as_str().trim())
                .unwrap_or_default();

            let explanation = content[prev_end..whole.start()]
                .replace("```", "")
                .trim()
                .to_string();

            segments.push(CodeSegment {
                language: language.to_string(),
                code: code.to_string(),
                explanation,
            });
            prev_end = whole.end();
        }

        segments
    }

    /// Fallback pass: bare fenced blocks without a bracket label
    ///
    /// Every segment shares the same explanation: the text before the
    /// first fence in the whole message.
    fn parse_fenced(&self, content: &str) -> Vec<CodeSegment> {
        let explanation = match content.find("```") {
            Some(idx) => content[..idx].trim().to_string(),
            None => return Vec::new(),
        };

        self.fenced
            .captures_iter(content)
            .map(|captures| {
                let tag = captures
                    .get(1)
                    .map(|m| m.as_str().trim())
                    .unwrap_or_default();
                let code = captures
                    .get(2)
                    .map(|m| m.as_str().trim())
                    .unwrap_or_default();

                CodeSegment {
                    language: if tag.is_empty() {
                        GENERIC_LANGUAGE.to_string()
                    } else {
                        tag.to_string()
                    },
                    code: code.to_string(),
                    explanation: explanation.clone(),
                }
            })
            .collect()
    }
}
