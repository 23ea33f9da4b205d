//! Content router
//!
//! Maps requested content types to their extractors and assembles the
//! labeled output. Falling back to unfiltered content when nothing matched
//! is the caller's job; the router only reports [`Routed::Empty`].

use crate::extract::{
    extract_apidoc, extract_code_blocks, extract_commands, extract_migration, extract_notes,
    extract_patterns, extract_prose, extract_signatures, extract_troubleshooting, ContentBlock,
};
use crate::types::{ContentType, ExtractionRequest};
use std::borrow::Cow;
use std::fmt;
use tracing::{debug, warn};

/// Tag opening the empty-result sentinel
pub const CONTENT_TYPE_EMPTY: &str = "[CONTENT_TYPE_EMPTY]";

type Extractor = fn(&str, usize) -> ContentBlock;

/// Heading and extractor for every single-extractor content type
fn section_for(content_type: ContentType) -> Option<(&'static str, Extractor)> {
    let section: (&'static str, Extractor) = match content_type {
        ContentType::Examples => ("## Code Examples", extract_code_blocks),
        ContentType::Setup => ("## Setup & Installation", extract_commands),
        ContentType::Concepts => ("## Concepts", extract_prose),
        ContentType::Migration => ("## Migration Guide", extract_migration),
        ContentType::Troubleshooting => ("## Troubleshooting", extract_troubleshooting),
        ContentType::Patterns => ("## Best Practices", extract_patterns),
        ContentType::Notes => ("## Important Notes", extract_notes),
        ContentType::ApiRef | ContentType::All => return None,
    };
    Some(section)
}

/// Outcome of routing a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed<'a> {
    /// Extracted sections, or the untouched input for `all`
    Content(Cow<'a, str>),
    /// No requested content type produced anything
    Empty(EmptyRoute),
}

impl Routed<'_> {
    /// True if nothing was extracted
    pub fn is_empty(&self) -> bool {
        matches!(self, Routed::Empty(_))
    }
}

impl fmt::Display for Routed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Routed::Content(text) => f.write_str(text),
            Routed::Empty(empty) => empty.fmt(f),
        }
    }
}

/// Sentinel carrying the request that came up empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyRoute {
    requested: String,
}

impl EmptyRoute {
    /// The content types as the caller requested them
    pub fn requested(&self) -> &str {
        &self.requested
    }
}

impl fmt::Display for EmptyRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n\nNo content found for requested types: {}\n\nAvailable types: {}",
            CONTENT_TYPE_EMPTY,
            self.requested,
            ContentType::menu()
        )
    }
}

/// Route `text` through the extractors named in `request`
///
/// Sections appear in the order the content types were requested. A
/// request of exactly `all` returns `text` unchanged; `all` inside a list
/// is skipped like any unknown name.
pub fn filter_by_type<'a>(text: &'a str, request: &ExtractionRequest) -> Routed<'a> {
    if request.is_all() {
        return Routed::Content(Cow::Borrowed(text));
    }

    let max_items = request.max_items();
    let mut sections: Vec<String> = Vec::new();
    let mut push_section = |heading: &str, block: ContentBlock| {
        debug!(
            category = %block.category(),
            items = block.items(),
            limit = block.limit(),
            "Extracted content"
        );
        if !block.is_empty() {
            sections.push(format!("{}\n\n{}\n", heading, block));
        }
    };

    for token in request.tokens() {
        let content_type = match token.parse::<ContentType>() {
            Ok(ContentType::All) | Err(_) => {
                warn!("Unknown content type: {}", token);
                continue;
            }
            Ok(content_type) => content_type,
        };

        if content_type == ContentType::ApiRef {
            push_section("## API Documentation", extract_apidoc(text, max_items));
            push_section("## API Signatures", extract_signatures(text, max_items));
        } else if let Some((heading, extractor)) = section_for(content_type) {
            push_section(heading, extractor(text, max_items));
        }
    }

    if sections.is_empty() {
        return Routed::Empty(EmptyRoute {
            requested: request.content_types().to_string(),
        });
    }

    Routed::Content(Cow::Owned(sections.join("\n")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "# useState

`useState` is a React Hook that lets you add a state variable to your component. Call it at the top level of your component to declare one.

```js
const [age, setAge] = useState(28);
```

```APIDOC
useState(initialState)
  initialState: The value you want the state to be initially.
```

export function useState(initialState) {

Warning: calling the set function does not change state in the running code.
";

    #[test]
    fn test_all_returns_input_unchanged() {
        let text = "  weird\r\n```\nunclosed ``` text\n\n";
        let routed = filter_by_type(text, &ExtractionRequest::all(5));
        match routed {
            Routed::Content(Cow::Borrowed(out)) => assert_eq!(out, text),
            other => panic!("expected borrowed content, got {:?}", other),
        }
    }

    #[test]
    fn test_sections_follow_request_order() {
        let req = ExtractionRequest::new("notes,examples", 5);
        let out = filter_by_type(DOC, &req).to_string();
        let notes = out.find("## Important Notes\n\n- Warning:").unwrap();
        let examples = out.find("## Code Examples\n\n### Example 1\n```js").unwrap();
        assert!(notes < examples);
    }

    #[test]
    fn test_api_ref_combines_apidoc_and_signatures() {
        let req = ExtractionRequest::new("api-ref", 5);
        let out = filter_by_type(DOC, &req).to_string();
        assert!(out.starts_with("## API Documentation\n\n### API Reference 1\n\nuseState(initialState)"));
        assert!(out.contains("\n## API Signatures\n\n- `export function useState(initialState) {`\n"));
    }

    #[test]
    fn test_unknown_types_skipped() {
        let req = ExtractionRequest::new("tutorials,examples", 5);
        let out = filter_by_type(DOC, &req).to_string();
        assert!(out.starts_with("## Code Examples"));
    }

    #[test]
    fn test_all_inside_list_is_not_passthrough() {
        let req = ExtractionRequest::new("examples,all", 5);
        match filter_by_type(DOC, &req) {
            Routed::Content(Cow::Owned(out)) => {
                assert!(out.starts_with("## Code Examples\n\n### Example 1"));
                assert!(!out.contains("Warning: calling the set function"));
            }
            other => panic!("expected filtered content, got {:?}", other),
        }

        let req = ExtractionRequest::new("all,setup", 5);
        assert!(filter_by_type(DOC, &req).is_empty());
    }

    #[test]
    fn test_empty_sentinel() {
        let req = ExtractionRequest::new("setup,migration", 5);
        let routed = filter_by_type(DOC, &req);
        assert!(routed.is_empty());
        let out = routed.to_string();
        assert!(out.starts_with("[CONTENT_TYPE_EMPTY]\n\n"));
        assert!(out.contains("No content found for requested types: setup,migration"));
        assert!(out.contains(
            "Available types: examples, api-ref, setup, concepts, migration, troubleshooting, patterns, notes, all"
        ));
    }

    #[test]
    fn test_only_unknown_types_is_empty() {
        let req = ExtractionRequest::new("bogus", 5);
        match filter_by_type(DOC, &req) {
            Routed::Empty(empty) => assert_eq!(empty.requested(), "bogus"),
            other => panic!("expected empty, got {:?}", other),
        }
    }

    #[test]
    fn test_examples_and_concepts_scenario() {
        let code = "const total = items.reduce(add, 0); ok()";
        assert_eq!(code.len(), 40);
        let paragraph = "Memoization lets a component skip recalculating a derived value when the inputs it depends on have not changed since the last render of the component.";
        assert_eq!(paragraph.len(), 150);
        let text = format!("```ts\n{}\n```\n\n{}\n", code, paragraph);

        let req = ExtractionRequest::new("examples,concepts", 5);
        let out = filter_by_type(&text, &req).to_string();

        assert_eq!(out.matches("## Code Examples").count(), 1);
        assert_eq!(out.matches("### Example ").count(), 1);
        assert!(out.contains(&format!("### Example 1\n```ts\n{}\n```", code)));
        assert!(out.contains(&format!("## Concepts\n\n{}\n", paragraph)));
    }
}
