//! Fence-aware line scanner shared by the extractors

/// Fence marker
pub(crate) const FENCE: &str = "```";

/// How a line relates to code fences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineKind<'a> {
    /// Opens a fence; carries the trimmed language tag (may be empty)
    Open(&'a str),
    /// Closes the current fence
    Close,
    /// Inside a fence
    Fenced,
    /// Outside any fence
    Text,
}

/// One classified line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScannedLine<'a> {
    pub raw: &'a str,
    pub kind: LineKind<'a>,
}

/// Iterator classifying each line of a document
///
/// Any line starting with a fence marker toggles the fence state: it opens
/// a fence when outside one and closes the current fence when inside one.
pub(crate) struct FenceScanner<'a> {
    lines: std::str::Lines<'a>,
    in_fence: bool,
}

impl<'a> FenceScanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            in_fence: false,
        }
    }
}

impl<'a> Iterator for FenceScanner<'a> {
    type Item = ScannedLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let raw = self.lines.next()?;
        let kind = match raw.strip_prefix(FENCE) {
            Some(_) if self.in_fence => {
                self.in_fence = false;
                LineKind::Close
            }
            Some(tag) => {
                self.in_fence = true;
                LineKind::Open(tag.trim())
            }
            None if self.in_fence => LineKind::Fenced,
            None => LineKind::Text,
        };
        Some(ScannedLine { raw, kind })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<LineKind<'_>> {
        FenceScanner::new(text).map(|l| l.kind).collect()
    }

    #[test]
    fn test_classifies_fences() {
        let text = "intro\n```ts\nconst a = 1;\n```\noutro";
        assert_eq!(
            kinds(text),
            vec![
                LineKind::Text,
                LineKind::Open("ts"),
                LineKind::Fenced,
                LineKind::Close,
                LineKind::Text,
            ]
        );
    }

    #[test]
    fn test_untagged_and_unclosed() {
        let text = "``` \nbody";
        assert_eq!(kinds(text), vec![LineKind::Open(""), LineKind::Fenced]);
    }

    #[test]
    fn test_crlf_lines() {
        let text = "```bash\r\nnpm i\r\n```\r\n";
        let lines: Vec<_> = FenceScanner::new(text).collect();
        assert_eq!(lines[0].kind, LineKind::Open("bash"));
        assert_eq!(lines[1].raw, "npm i");
        assert_eq!(lines[2].kind, LineKind::Close);
    }
}
