//! Fixed-template prompt construction for per-file review requests.

const REVIEW_TEMPLATE: &str = "\
You are a senior developer. Please review the following code and provide \
your feedback in Korean.
Use Markdown formatting.
Be concise and to the point.
Use emojis if helpful.
Include code examples if possible.

Here is the code:
";

/// Build the review prompt for one unit of code.
///
/// The code text is interpolated verbatim — it is treated as plain text
/// inside the prompt, not as structured input, so no escaping is performed.
/// There is no truncation either: an overly long prompt is the model API's
/// problem to reject, and the rejection surfaces as a per-file failure.
///
/// # Examples
///
/// ```
/// use vigil_review::prompt::build_review_prompt;
///
/// let prompt = build_review_prompt("+fn main() {}");
/// assert!(prompt.contains("senior developer"));
/// assert!(prompt.contains("+fn main() {}"));
/// ```
pub fn build_review_prompt(code: &str) -> String {
    format!("{REVIEW_TEMPLATE}{code}\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_persona_and_language() {
        let prompt = build_review_prompt("let x = 1;");
        assert!(prompt.contains("senior developer"));
        assert!(prompt.contains("Korean"));
        assert!(prompt.contains("Markdown"));
        assert!(prompt.contains("concise"));
    }

    #[test]
    fn prompt_interpolates_code_verbatim() {
        let code = "@@ -1,3 +1,4 @@\n+use std::fmt;\n";
        let prompt = build_review_prompt(code);
        assert!(prompt.contains(code));
    }

    #[test]
    fn prompt_is_deterministic() {
        assert_eq!(build_review_prompt("x"), build_review_prompt("x"));
    }

    #[test]
    fn prompt_does_not_escape_markup() {
        // Code is plain text inside the prompt; backticks and braces pass through
        let prompt = build_review_prompt("```rust\nfn f() {}\n```");
        assert!(prompt.contains("```rust"));
    }
}
