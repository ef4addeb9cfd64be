use super::EditorBuffer;

/// Formatting actions offered by the editor toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatAction {
    Bold,
    Italic,
    Heading,
    Link,
    Image,
    InlineCode,
    CodeBlock,
    BulletList,
    NumberedList,
    Blockquote,
    HorizontalRule,
}

impl FormatAction {
    /// Parse a toolbar action name (`"bold"`, `"ul"`, `"codeblock"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        let action = match name {
            "bold" => Self::Bold,
            "italic" => Self::Italic,
            "heading" => Self::Heading,
            "link" => Self::Link,
            "image" => Self::Image,
            "code" => Self::InlineCode,
            "codeblock" => Self::CodeBlock,
            "ul" => Self::BulletList,
            "ol" => Self::NumberedList,
            "blockquote" => Self::Blockquote,
            "hr" => Self::HorizontalRule,
            _ => return None,
        };
        Some(action)
    }

    /// Apply the action to the buffer's current selection.
    pub fn apply(self, buffer: &mut EditorBuffer) {
        match self {
            Self::Bold => wrap_selection(buffer, "**", "**", "bold text"),
            Self::Italic => wrap_selection(buffer, "*", "*", "italic text"),
            Self::Heading => prefix_lines(buffer, |_| "## ".to_string()),
            Self::Link => wrap_selection(buffer, "[", "](url)", "link text"),
            Self::Image => wrap_selection(buffer, "![", "](url)", "alt text"),
            Self::InlineCode => wrap_selection(buffer, "`", "`", "code"),
            Self::CodeBlock => wrap_selection(buffer, "\n```\n", "\n```\n", "code"),
            Self::BulletList => prefix_lines(buffer, |_| "- ".to_string()),
            Self::NumberedList => prefix_lines(buffer, |i| format!("{}. ", i + 1)),
            Self::Blockquote => prefix_lines(buffer, |_| "> ".to_string()),
            Self::HorizontalRule => wrap_selection(buffer, "\n---\n", "", ""),
        }
    }
}

/// Surround the selection (or `placeholder` when nothing is selected) with
/// `before`/`after`, leaving the wrapped text selected.
fn wrap_selection(buffer: &mut EditorBuffer, before: &str, after: &str, placeholder: &str) {
    let selection = buffer.selection();
    let selected = buffer.selected_text();
    let inner = if selected.is_empty() {
        placeholder
    } else {
        selected.as_str()
    };
    let replacement = format!("{before}{inner}{after}");
    buffer.replace_range(selection.clone(), &replacement);
    let inner_start = selection.start + before.len();
    buffer.select(inner_start..inner_start + inner.len());
}

/// Prefix every line touched by the selection, leaving the result selected.
///
/// `prefix` receives the zero-based index of the line within the selection.
fn prefix_lines(buffer: &mut EditorBuffer, prefix: impl Fn(usize) -> String) {
    let selection = buffer.selection();
    let line_start = buffer.line_start(selection.start);
    let block = buffer.slice(line_start..selection.end);
    let result = block
        .split('\n')
        .enumerate()
        .map(|(i, line)| format!("{}{line}", prefix(i)))
        .collect::<Vec<_>>()
        .join("\n");
    buffer.replace_range(line_start..selection.end, &result);
    buffer.select(line_start..line_start + result.len());
}
