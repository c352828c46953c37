//! Result formatting for direct display.

/// Wraps the final line sequence in the fixed display markup.
///
/// Purely presentational: lines pass through verbatim, joined by newlines.
pub struct ResultFormatter;

impl ResultFormatter {
    /// Render lines as a `<pre><code>` block.
    pub fn render(lines: &[String]) -> String {
        format!("\n<pre><code>{}</code></pre>", lines.join("\n").trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_wraps_lines() {
        let lines = vec!["WARN disk full".to_string(), "ERROR disk crash".to_string()];
        let output = ResultFormatter::render(&lines);

        assert_eq!(
            output,
            "\n<pre><code>WARN disk full\nERROR disk crash</code></pre>"
        );
    }

    #[test]
    fn test_render_empty_result() {
        let output = ResultFormatter::render(&[]);
        assert_eq!(output, "\n<pre><code></code></pre>");
    }

    #[test]
    fn test_render_does_not_alter_content() {
        let lines = vec!["a <b> & c".to_string()];
        let output = ResultFormatter::render(&lines);

        assert!(output.contains("a <b> & c"));
    }
}
