//! Seam to the external context-path feature extractor.
//!
//! The extractor is a black box that turns method source text into
//! path-context feature records. Its output names methods by their
//! lowercase subtokens joined with an internal separator, so matching a
//! record back to a method goes through [`split_to_subtokens`].

/// One feature record produced by the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathContext {
    /// Method name as the extractor renders it: subtokens joined with the
    /// internal separator (`to|csv|string`).
    pub name: String,
    /// Rendered path-context feature string.
    pub features: String,
}

impl PathContext {
    /// Create a feature record.
    pub fn new(name: impl Into<String>, features: impl Into<String>) -> Self {
        PathContext {
            name: name.into(),
            features: features.into(),
        }
    }
}

/// External context-path extractor.
///
/// Implementations must be pure: the same source text and bounds always
/// yield the same records.
pub trait ContextPathExtractor {
    /// Extract path contexts from one method's source text, bounded by the
    /// maximum syntactic path length and width.
    fn extract(&self, source: &str, max_path_length: u32, max_path_width: u32)
        -> Vec<PathContext>;

    /// Separator the extractor places between name subtokens.
    fn internal_separator(&self) -> &str {
        "|"
    }
}

/// Split an identifier into lowercase alphabetic subtokens.
///
/// Boundaries are case humps (`csvFile`, `CSVFile`), underscores, digits,
/// and any other non-alphabetic character; non-alphabetic characters are
/// dropped. `toCsvString` becomes `["to", "csv", "string"]`.
pub fn split_to_subtokens(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.trim().chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();

    for (i, &ch) in chars.iter().enumerate() {
        if !ch.is_alphabetic() {
            flush(&mut current, &mut tokens);
            continue;
        }

        let hump = i > 0 && {
            let prev = chars[i - 1];
            (prev.is_lowercase() && ch.is_uppercase())
                || (prev.is_uppercase()
                    && ch.is_uppercase()
                    && chars.get(i + 1).is_some_and(|next| next.is_lowercase()))
        };
        if hump {
            flush(&mut current, &mut tokens);
        }

        current.extend(ch.to_lowercase());
    }
    flush(&mut current, &mut tokens);

    tokens
}

fn flush(current: &mut String, tokens: &mut Vec<String>) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}
