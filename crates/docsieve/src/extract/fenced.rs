//! Fenced block extractors: code examples, APIDOC blocks and shell commands

use super::scan::{FenceScanner, LineKind, FENCE};
use super::ContentBlock;
use crate::types::ContentType;

/// Shell-like language tags accepted by the command extractor
const TERMINAL_LANGS: &[&str] = &["bash", "terminal", "shell", "sh", "zsh", "console"];

/// Fence tag of structured API documentation blocks
const APIDOC_TAG: &str = "APIDOC";

/// Which fenced blocks to keep
struct BlockRule {
    /// Decides from the opening fence's tag whether to capture the block
    accepts: fn(&str) -> bool,
    /// Blocks must be strictly longer than this many characters
    min_len: usize,
}

const CODE_RULE: BlockRule = BlockRule {
    accepts: any_tag,
    min_len: 20,
};

const APIDOC_RULE: BlockRule = BlockRule {
    accepts: is_apidoc_tag,
    min_len: 50,
};

const COMMAND_RULE: BlockRule = BlockRule {
    accepts: is_terminal_tag,
    min_len: 10,
};

fn any_tag(_tag: &str) -> bool {
    true
}

fn is_apidoc_tag(tag: &str) -> bool {
    tag.starts_with(APIDOC_TAG)
}

fn is_terminal_tag(tag: &str) -> bool {
    let tag = tag.to_lowercase();
    TERMINAL_LANGS.contains(&tag.as_str())
}

/// A captured fenced block
#[derive(Debug, PartialEq, Eq)]
struct FencedBlock<'a> {
    tag: &'a str,
    body: String,
}

/// Collect up to `max_items` closed blocks accepted by `rule`
fn fenced_blocks<'a>(text: &'a str, rule: &BlockRule, max_items: usize) -> Vec<FencedBlock<'a>> {
    let mut blocks = Vec::new();
    let mut current: Option<(&str, Vec<&str>)> = None;

    for line in FenceScanner::new(text) {
        if blocks.len() >= max_items {
            break;
        }
        match line.kind {
            LineKind::Open(tag) if (rule.accepts)(tag) => current = Some((tag, Vec::new())),
            LineKind::Open(_) | LineKind::Text => {}
            LineKind::Fenced => {
                if let Some((_, lines)) = current.as_mut() {
                    lines.push(line.raw);
                }
            }
            LineKind::Close => {
                if let Some((tag, lines)) = current.take() {
                    let body = lines.join("\n");
                    if body.chars().count() > rule.min_len {
                        blocks.push(FencedBlock { tag, body });
                    }
                }
            }
        }
    }

    blocks
}

/// Extract fenced code examples, keeping each block's language tag
pub fn extract_code_blocks(text: &str, max_items: usize) -> ContentBlock {
    let mut block = ContentBlock::new(ContentType::Examples, max_items);
    for (i, fenced) in fenced_blocks(text, &CODE_RULE, max_items)
        .into_iter()
        .enumerate()
    {
        block.push_item(format!(
            "### Example {}\n{}{}\n{}\n{}\n",
            i + 1,
            FENCE,
            fenced.tag,
            fenced.body,
            FENCE
        ));
    }
    block
}

/// Extract ```` ```APIDOC ```` blocks
pub fn extract_apidoc(text: &str, max_items: usize) -> ContentBlock {
    let mut block = ContentBlock::new(ContentType::ApiRef, max_items);
    for (i, fenced) in fenced_blocks(text, &APIDOC_RULE, max_items)
        .into_iter()
        .enumerate()
    {
        block.push_item(format!("### API Reference {}\n\n{}\n", i + 1, fenced.body));
    }
    block
}

/// Extract shell/terminal blocks, rendered uniformly as bash
pub fn extract_commands(text: &str, max_items: usize) -> ContentBlock {
    let mut block = ContentBlock::new(ContentType::Setup, max_items);
    for (i, fenced) in fenced_blocks(text, &COMMAND_RULE, max_items)
        .into_iter()
        .enumerate()
    {
        block.push_item(format!(
            "### Command {}\n{}bash\n{}\n{}\n",
            i + 1,
            FENCE,
            fenced.body,
            FENCE
        ));
    }
    block
}
