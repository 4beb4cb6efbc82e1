//! Text helpers shared by the model and the renderers.

use heck::ToKebabCase;

/// File-system friendly name: `OpenChannelSync` becomes `open-channel-sync`.
pub fn to_kebab_case(name: &str) -> String {
    name.to_kebab_case()
}

/// Drops a leading CLI command line from a method description.
///
/// Descriptions generated from proto comments often start with a line like
/// ``lncli: `closechannel` ``. That line is documented separately, so it is
/// removed; any other description is returned unchanged.
pub fn strip_command_line(description: &str) -> String {
    match description.split_once('\n') {
        Some((first, rest)) if first.contains(": `") => rest.to_string(),
        None if description.contains(": `") => String::new(),
        _ => description.to_string(),
    }
}

/// Normalises free-form help text for inclusion in a page.
///
/// Trailing whitespace is removed from every line, runs of blank lines are
/// collapsed to one, and the text is trimmed.
pub fn clean_description(text: &str) -> String {
    let mut cleaned = Vec::new();
    let mut previous_blank = false;

    for line in text.replace("\r\n", "\n").lines() {
        let line = line.trim_end();
        let blank = line.is_empty();
        if blank && previous_blank {
            continue;
        }
        cleaned.push(line.to_string());
        previous_blank = blank;
    }

    cleaned.join("\n").trim().to_string()
}

/// Escapes characters that MDX would otherwise treat as JSX or expressions.
pub fn escape_mdx(text: &str) -> String {
    text.replace('{', "\\{")
        .replace('}', "\\}")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
