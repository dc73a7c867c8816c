//! Receipt renderer
//!
//! Renders PrintJob data into ESC/POS format for thermal printers.

use tally_printer::EscPosBuilder;

use super::types::PrintJob;

/// Lines fed before the cut so the printed blocks clear the tear bar
const CUT_FEED_LINES: u8 = 3;

/// Receipt renderer
///
/// Pure function of the job: no I/O, no clock, byte-identical output for
/// identical input. Block order is fixed: brand header, optional custom
/// message, main payload, optional timestamp, cut.
pub struct ReceiptRenderer {
    width: usize,
    brand: String,
}

impl ReceiptRenderer {
    /// Create a renderer with the given paper width (in characters) and
    /// brand header line
    pub fn new(width: usize, brand: impl Into<String>) -> Self {
        Self {
            width,
            brand: brand.into(),
        }
    }

    /// Render a print job to ESC/POS bytes
    pub fn render(&self, job: &PrintJob) -> Vec<u8> {
        let mut b = EscPosBuilder::new(self.width);

        // Everything on a receipt is centered
        b.center();

        self.render_brand(&mut b);

        if let Some(custom) = non_blank(job.custom_text.as_deref()) {
            self.render_custom_text(&mut b, custom);
        }

        self.render_payload(&mut b, &job.text);

        if let Some(ts) = non_blank(job.timestamp.as_deref()) {
            b.line(ts);
        }

        b.cut_feed(CUT_FEED_LINES);
        b.build()
    }

    /// Brand header: bold, double size
    fn render_brand(&self, b: &mut EscPosBuilder) {
        b.bold();
        b.double_size();
        b.line(&self.brand);
        b.reset_size();
        b.bold_off();
    }

    /// Custom message: bold, normal size
    fn render_custom_text(&self, b: &mut EscPosBuilder, text: &str) {
        b.bold();
        b.line(text);
        b.bold_off();
    }

    /// Main payload: bold, double size
    fn render_payload(&self, b: &mut EscPosBuilder, text: &str) {
        b.bold();
        b.double_size();
        b.line(text);
        b.reset_size();
        b.bold_off();
    }
}

impl Default for ReceiptRenderer {
    fn default() -> Self {
        Self::new(48, "TALLY")
    }
}

/// Treat whitespace-only optional fields as absent
fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    #[test]
    fn test_blocks_appear_in_order() {
        let renderer = ReceiptRenderer::default();
        let job = PrintJob {
            text: "Dona".to_string(),
            custom_text: Some("Welcome!".to_string()),
            timestamp: Some("2024-01-01 10:00".to_string()),
        };

        let data = renderer.render(&job);

        let brand = find(&data, b"TALLY\n").expect("brand header missing");
        let custom = find(&data, b"Welcome!\n").expect("custom text missing");
        let payload = find(&data, b"Dona\n").expect("payload missing");
        let timestamp = find(&data, b"2024-01-01 10:00\n").expect("timestamp missing");

        assert!(brand < custom);
        assert!(custom < payload);
        assert!(payload < timestamp);

        // Fixed 4-byte feed-and-cut sequence terminates the buffer
        assert_eq!(&data[data.len() - 4..], &[0x1D, 0x56, 0x42, CUT_FEED_LINES]);
    }

    #[test]
    fn test_blank_custom_text_emits_no_block() {
        let renderer = ReceiptRenderer::default();
        let job = PrintJob {
            text: "Dona".to_string(),
            custom_text: Some("   ".to_string()),
            timestamp: None,
        };

        let data = renderer.render(&job);

        assert!(find(&data, b"Dona\n").is_some());
        assert!(find(&data, b"   \n").is_none());
    }

    #[test]
    fn test_missing_optionals_render_payload_only() {
        let renderer = ReceiptRenderer::new(32, "CORNER CAFE");
        let data = renderer.render(&PrintJob::new("A-17"));

        assert!(find(&data, b"CORNER CAFE\n").is_some());
        assert!(find(&data, b"A-17\n").is_some());
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = ReceiptRenderer::default();
        let job = PrintJob {
            text: "Dona".to_string(),
            custom_text: Some("Welcome!".to_string()),
            timestamp: Some("2024-01-01 10:00".to_string()),
        };

        assert_eq!(renderer.render(&job), renderer.render(&job));
    }
}
