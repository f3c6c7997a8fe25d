//! Completion ranking and snippet expansion.
//!
//! Raw engine candidates become ordered, range-aware completion items. The
//! sort key is a three-tier bucket -- dunder names last, single-underscore
//! names second-to-last, everything else first -- alphabetical within a
//! bucket. In snippet mode every callable candidate additionally expands
//! into one parameter-snippet item per signature; a mode character between
//! bucket and name groups plain items before expansions within a bucket
//! (or after them, when the client prefers snippets first).

use adder_types::{CompletionItem, CompletionItemKind, InsertTextFormat, Range, TextEdit};

use crate::engine::{Candidate, CandidateKind, ParamKind, SignatureInfo};

/// Rendering mode, chosen once at session initialization from the client's
/// declared snippet capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionMode {
    Plain,
    Snippet,
}

/// Count of contiguous word characters at and after `character`, used to
/// extend the replacement range over a partially-typed word so accepting a
/// completion overwrites it rather than inserting into its middle.
#[must_use]
pub fn word_suffix_len(line: &str, character: u32) -> u32 {
    line.chars()
        .skip(character as usize)
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .count() as u32
}

fn bucket(name: &str) -> &'static str {
    if name.starts_with("__") {
        "zz"
    } else if name.starts_with('_') {
        "za"
    } else {
        "aa"
    }
}

fn sort_key(name: &str, mode_prefix: &str) -> String {
    format!("{}{mode_prefix}{name}", bucket(name))
}

fn item_kind(kind: CandidateKind) -> CompletionItemKind {
    match kind {
        CandidateKind::Module => CompletionItemKind::Module,
        CandidateKind::Class => CompletionItemKind::Class,
        CandidateKind::Instance => CompletionItemKind::Reference,
        CandidateKind::Function => CompletionItemKind::Function,
        CandidateKind::Param | CandidateKind::Statement => CompletionItemKind::Variable,
        CandidateKind::Keyword => CompletionItemKind::Keyword,
        CandidateKind::Property => CompletionItemKind::Property,
        CandidateKind::Other => CompletionItemKind::Text,
    }
}

/// Plain item for one candidate. The replacement range is widened left by
/// the candidate's matched-prefix length, except for string-key candidates
/// whose single-quote prefix is dropped from the label instead.
fn base_item(candidate: &Candidate, range: Range) -> CompletionItem {
    let mut label = candidate.name.clone();
    let mut range = range;
    let like_name = candidate.like_name_length;
    if like_name == 1 && (label.starts_with('"') || label.starts_with('\'')) {
        label.remove(0);
    } else if like_name > 0 {
        range.start.character = range.start.character.saturating_sub(like_name);
    }
    let documentation = (!candidate.docstring.is_empty()).then(|| candidate.docstring.clone());
    CompletionItem {
        label: label.clone(),
        kind: item_kind(candidate.kind),
        documentation,
        sort_text: String::new(),
        text_edit: Some(TextEdit {
            range,
            new_text: label,
        }),
        insert_text: None,
        insert_text_format: None,
    }
}

/// One snippet expansion for one signature: numbered placeholders per
/// parameter, stopping at the first variadic-keyword or defaulted
/// parameter, skipping the positional-only marker (whose slot number is
/// still consumed), `name=` baked into keyword-only placeholders, and a
/// final `$0` sentinel.
fn snippet_item(
    candidate: &Candidate,
    signature: &SignatureInfo,
    base: &CompletionItem,
    mode_prefix: &str,
) -> CompletionItem {
    let mut names = Vec::new();
    let mut slots = Vec::new();
    for (idx, param) in signature.params.iter().enumerate() {
        if param.kind == ParamKind::VarKeyword || param.has_default {
            break;
        }
        if param.name == "/" {
            continue;
        }
        names.push(param.name.as_str());
        let keyword = if param.kind == ParamKind::KeywordOnly {
            format!("{}=", param.name)
        } else {
            String::new()
        };
        slots.push(format!("{keyword}${{{}:{}}}", idx + 1, param.name));
    }
    CompletionItem {
        label: format!("{}({})", candidate.name, names.join(", ")),
        kind: base.kind,
        documentation: base.documentation.clone(),
        sort_text: sort_key(&candidate.name, mode_prefix),
        text_edit: None,
        insert_text: Some(format!("{}({})$0", candidate.name, slots.join(", "))),
        insert_text_format: Some(InsertTextFormat::Snippet),
    }
}

/// Render candidates in the session's mode. `snippet_first` flips the mode
/// character so a bucket's expansions list before its plain items.
#[must_use]
pub fn items(
    candidates: &[Candidate],
    range: Range,
    mode: CompletionMode,
    snippet_first: bool,
) -> Vec<CompletionItem> {
    match mode {
        CompletionMode::Plain => candidates
            .iter()
            .map(|c| {
                let mut item = base_item(c, range);
                item.sort_text = sort_key(&c.name, "");
                item
            })
            .collect(),
        CompletionMode::Snippet => {
            let (plain_prefix, snippet_prefix) = if snippet_first { ("z", "a") } else { ("a", "z") };
            let mut out = Vec::new();
            for candidate in candidates {
                let mut item = base_item(candidate, range);
                item.sort_text = sort_key(&candidate.name, plain_prefix);
                let base = item.clone();
                out.push(item);
                if candidate.kind == CandidateKind::Property {
                    continue;
                }
                for signature in &candidate.signatures {
                    out.push(snippet_item(candidate, signature, &base, snippet_prefix));
                }
            }
            out
        }
    }
}
