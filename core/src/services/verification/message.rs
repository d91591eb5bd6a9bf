//! Verification message rendering

use std::collections::HashMap;

/// Extra `[key]` replacements supplied by the caller
pub type TokenData = HashMap<String, String>;

/// Substitute `!code` and `!site_name`, then `[key]` placeholders from `token_data`
///
/// Unknown `[key]` placeholders are left untouched. `[key]` placeholders are
/// expanded in one left-to-right pass, so a token value is never expanded
/// again, and `!code` is substituted first so a site name cannot inject it.
pub fn render_message(template: &str, code: &str, site_name: &str, token_data: &TokenData) -> String {
    let message = template
        .replace("!code", code)
        .replace("!site_name", site_name);

    if token_data.is_empty() {
        return message;
    }
    expand_tokens(&message, token_data)
}

fn expand_tokens(message: &str, token_data: &TokenData) -> String {
    let mut rendered = String::with_capacity(message.len());
    let mut rest = message;

    while let Some(open) = rest.find('[') {
        rendered.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find(']') else {
            rendered.push_str(&rest[open..]);
            return rendered;
        };

        match token_data.get(&after[..close]) {
            Some(value) => {
                rendered.push_str(value);
                rest = &after[close + 1..];
            }
            // Keep the bracket and rescan, `[[key]` still expands the inner key
            None => {
                rendered.push('[');
                rest = after;
            }
        }
    }

    rendered.push_str(rest);
    rendered
}
