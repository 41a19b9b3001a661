//! XML descriptor normalization.
//!
//! Rendered descriptors (Info.plist, WiX sources, manifests) come out of the
//! template engine with uneven whitespace. [`prettify`] reformats them in
//! place with a stable indentation scheme. The reformat is idempotent and
//! purely cosmetic: element structure, attributes and text content are left
//! untouched.

use crate::packager::error::{ErrorExt, Result};
use std::path::Path;

const INDENT: &str = "    ";

#[derive(Debug)]
enum Token {
    /// `<?...?>`, `<!DOCTYPE...>` or `<!--...-->`
    Standalone(String),
    /// `<name ...>`
    Open(String),
    /// `</name>`
    Close(String),
    /// `<name .../>`
    SelfClose(String),
    /// Non-whitespace character data
    Text(String),
}

fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'<' {
            let tag_end = if input[i..].starts_with("<!--") {
                input[i..].find("-->").map(|p| i + p + 3)
            } else {
                // track quotes so '>' inside attribute values doesn't end the tag
                let mut quote: Option<u8> = None;
                let mut end = None;
                for (off, &b) in bytes[i..].iter().enumerate() {
                    match (quote, b) {
                        (Some(q), _) if b == q => quote = None,
                        (None, b'"') | (None, b'\'') => quote = Some(b),
                        (None, b'>') => {
                            end = Some(i + off + 1);
                            break;
                        }
                        _ => {}
                    }
                }
                end
            };

            let Some(end) = tag_end else {
                // unterminated tag, keep the rest verbatim
                tokens.push(Token::Text(input[i..].trim().to_string()));
                break;
            };

            let tag = input[i..end].to_string();
            let token = if tag.starts_with("<?") || tag.starts_with("<!") {
                Token::Standalone(tag)
            } else if tag.starts_with("</") {
                Token::Close(tag)
            } else if tag.ends_with("/>") {
                Token::SelfClose(tag)
            } else {
                Token::Open(tag)
            };
            tokens.push(token);
            i = end;
        } else {
            let next_tag = input[i..].find('<').map_or(bytes.len(), |p| i + p);
            let text = input[i..next_tag].trim();
            if !text.is_empty() {
                tokens.push(Token::Text(text.to_string()));
            }
            i = next_tag;
        }
    }

    tokens
}

fn format(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut depth: usize = 0;
    let mut i = 0;

    let line = |depth: usize, content: &str, out: &mut String| {
        for _ in 0..depth {
            out.push_str(INDENT);
        }
        out.push_str(content);
        out.push('\n');
    };

    while i < tokens.len() {
        match &tokens[i] {
            Token::Standalone(tag) | Token::SelfClose(tag) => {
                line(depth, tag, &mut out);
                i += 1;
            }
            Token::Text(text) => {
                line(depth, text, &mut out);
                i += 1;
            }
            Token::Close(tag) => {
                depth = depth.saturating_sub(1);
                line(depth, tag, &mut out);
                i += 1;
            }
            Token::Open(tag) => {
                // <a>text</a> stays on one line
                if let (Some(Token::Text(text)), Some(Token::Close(close))) =
                    (tokens.get(i + 1), tokens.get(i + 2))
                {
                    line(depth, &format!("{tag}{text}{close}"), &mut out);
                    i += 3;
                } else {
                    line(depth, tag, &mut out);
                    depth += 1;
                    i += 1;
                }
            }
        }
    }

    out
}

/// Reformats an XML file in place.
pub async fn prettify(file: &Path) -> Result<()> {
    let content = tokio::fs::read_to_string(file)
        .await
        .fs_context("reading XML file", file)?;
    let formatted = format(&tokenize(&content));
    tokio::fs::write(file, formatted)
        .await
        .fs_context("writing XML file", file)?;
    Ok(())
}
