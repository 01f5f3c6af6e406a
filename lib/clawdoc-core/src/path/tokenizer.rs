//! Splits field path text into tokens.

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Token {
    /// A name written as-is between dots.
    Bare(String),
    /// A name written between brackets and quotes, e.g. `['a.b']`.
    Quoted(String),
    /// `[]`
    ArrayElement,
}

pub(super) fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut rest = text;

    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix('.') {
            flush(&mut tokens, &mut current);
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("[]") {
            flush(&mut tokens, &mut current);
            tokens.push(Token::ArrayElement);
            rest = tail;
        } else if let Some((name, tail)) = quoted_name(rest) {
            flush(&mut tokens, &mut current);
            tokens.push(Token::Quoted(name.to_string()));
            rest = tail;
        } else if rest.starts_with("['") || rest.starts_with("[\"") {
            // unterminated quote: the remaining text is a literal name
            flush(&mut tokens, &mut current);
            current.push_str(rest);
            break;
        } else {
            let mut chars = rest.chars();
            if let Some(ch) = chars.next() {
                current.push(ch);
            }
            rest = chars.as_str();
        }
    }
    flush(&mut tokens, &mut current);

    tokens
}

fn flush(tokens: &mut Vec<Token>, current: &mut String) {
    if !current.is_empty() {
        tokens.push(Token::Bare(std::mem::take(current)));
    }
}

fn quoted_name(text: &str) -> Option<(&str, &str)> {
    if let Some(body) = text.strip_prefix("['") {
        body.split_once("']")
    } else {
        text.strip_prefix("[\"")?.split_once("\"]")
    }
}
