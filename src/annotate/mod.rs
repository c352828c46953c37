//! Diagnostic line annotation.
//!
//! Decoders are always-present capability objects; a line that matches no
//! decoder, or that a decoder cannot parse, passes through unchanged. The
//! original text is never mutated, only suffixed.

mod decoders;

pub use decoders::{CapabilityBytesDecoder, ProtectionPolicyDecoder};

/// Decodes one diagnostic line format into a human-readable summary.
pub trait LineDecoder: Send + Sync {
    /// Decoder name for logs
    fn name(&self) -> &str;

    /// Decoded summary for the line, or `None` when the line does not match
    /// this decoder's pattern or fails to parse.
    fn decode(&self, line: &str) -> Option<String>;
}

/// Applies the registered decoders to each line, appending the first
/// decoder's summary as a ` // Decoded: …` suffix.
pub struct Annotator {
    decoders: Vec<Box<dyn LineDecoder>>,
}

impl Annotator {
    pub fn new(decoders: Vec<Box<dyn LineDecoder>>) -> Self {
        Self { decoders }
    }

    /// Annotator with the built-in hardware-status decoders.
    pub fn with_default_decoders() -> Self {
        Self::new(vec![
            Box::new(CapabilityBytesDecoder::new()),
            Box::new(ProtectionPolicyDecoder::new()),
        ])
    }

    /// Annotate a single line; unmatched lines are returned unchanged.
    pub fn annotate_line(&self, line: &str) -> String {
        for decoder in &self.decoders {
            if let Some(summary) = decoder.decode(line) {
                return format!("{line} // Decoded: {summary}");
            }
        }
        line.to_string()
    }

    /// Annotate every line, preserving order and count.
    pub fn annotate(&self, lines: &[String]) -> Vec<String> {
        lines.iter().map(|line| self.annotate_line(line)).collect()
    }
}

impl Default for Annotator {
    fn default() -> Self {
        Self::with_default_decoders()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmatched_line_is_unchanged() {
        let annotator = Annotator::with_default_decoders();
        let line = "ERROR disk crash";

        assert_eq!(annotator.annotate_line(line), line);
    }

    #[test]
    fn test_capability_line_gets_suffix_without_altering_prefix() {
        let annotator = Annotator::with_default_decoders();
        let line = "BIOS: Capability Bytes 8f fb";
        let annotated = annotator.annotate_line(line);

        assert!(annotated.starts_with(line));
        assert!(annotated.contains("// Decoded:"));
        assert!(annotated.len() > line.len());
    }

    #[test]
    fn test_annotate_preserves_order_and_count() {
        let annotator = Annotator::with_default_decoders();
        let lines = vec![
            "INFO boot".to_string(),
            "capability bytes 01 00".to_string(),
            "INFO done".to_string(),
        ];
        let annotated = annotator.annotate(&lines);

        assert_eq!(annotated.len(), 3);
        assert_eq!(annotated[0], "INFO boot");
        assert_eq!(annotated[2], "INFO done");
        assert!(annotated[1].starts_with("capability bytes 01 00"));
    }
}
