//! Free-text extraction: splits a labeled completion reply into tool fields.
//!
//! The expected shape is `NAME:`, `DESCRIPTION:`, `USE_CASE:`, `CODE:` in
//! that order, with the code carried in the first fenced block after
//! `CODE:`. Each marker is located strictly after the previous one, so a
//! reply with markers missing or out of order fails the parse as a whole.

/// Fields recovered from a labeled reply.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedTool {
    pub name: String,
    pub description: String,
    pub use_case: String,
    pub code: String,
}

const NAME_MARKER: &str = "NAME:";
const DESCRIPTION_MARKER: &str = "DESCRIPTION:";
const USE_CASE_MARKER: &str = "USE_CASE:";
const CODE_MARKER: &str = "CODE:";
const FENCE: &str = "```";

/// Parses a labeled reply, returning `None` on any structural failure:
/// a missing or out-of-order marker, a missing fence pair, or an empty
/// name/code.
pub(crate) fn parse_labeled_response(text: &str) -> Option<ParsedTool> {
    let name_at = text.find(NAME_MARKER)?;
    let after_name = name_at + NAME_MARKER.len();

    let desc_at = after_name + text[after_name..].find(DESCRIPTION_MARKER)?;
    let after_desc = desc_at + DESCRIPTION_MARKER.len();

    let use_at = after_desc + text[after_desc..].find(USE_CASE_MARKER)?;
    let after_use = use_at + USE_CASE_MARKER.len();

    let code_at = after_use + text[after_use..].find(CODE_MARKER)?;
    let after_code = code_at + CODE_MARKER.len();

    let name = text[after_name..desc_at].trim();
    let description = text[after_desc..use_at].trim();
    let use_case = text[after_use..code_at].trim();

    let fence_open = after_code + text[after_code..].find(FENCE)? + FENCE.len();
    // The opening fence line may carry a language tag; the code body starts
    // on the next line.
    let body_start = fence_open + text[fence_open..].find('\n')? + 1;
    let body_end = body_start + text[body_start..].find(FENCE)?;
    let code = text[body_start..body_end].trim();

    if name.is_empty() || code.is_empty() {
        return None;
    }

    Some(ParsedTool {
        name: name.to_string(),
        description: description.to_string(),
        use_case: use_case.to_string(),
        code: code.to_string(),
    })
}
