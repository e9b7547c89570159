//! Display name derivation.
//!
//! Canonical names come from a type printer and may carry stray spacing
//! (`Foo *`) or keyword prefixes (`struct Foo`). [`normalize`] cleans those up.
//! [`substitute`] and [`substitute_template_arguments`] splice the display
//! name of a related type into a name, which is how a rename of `Foo`
//! reaches `*const Foo`, `[Foo; 3]` or `Vec<Foo>`.

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

const KEYWORD_PREFIXES: [&str; 3] = ["class ", "struct ", "enum "];

#[inline]
fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Removes `class `, `struct ` and `enum ` where they start a word.
fn strip_keyword_prefixes(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut rest = name;
    'outer: while !rest.is_empty() {
        let at_word_start = out.chars().next_back().is_none_or(|c| !is_ident_char(c));
        if at_word_start {
            for prefix in KEYWORD_PREFIXES {
                if let Some(tail) = rest.strip_prefix(prefix) {
                    rest = tail.trim_start();
                    continue 'outer;
                }
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }
    out
}

/// Whether the `*`/`&` run or `)` at `chars[at]` closes the preceding token.
fn closes_token(chars: &[char], at: usize) -> bool {
    match chars[at] {
        ')' => true,
        '*' | '&' => {
            let mut next = at;
            while next < chars.len() && matches!(chars[next], '*' | '&') {
                next += 1;
            }
            match chars.get(next) {
                None => true,
                Some(c) => c.is_whitespace() || matches!(c, ',' | '>' | ')' | ']' | ';'),
            }
        }
        _ => false,
    }
}

/// Normalizes a canonical name.
///
/// Whitespace separating a trailing `*`, `&` or `)` from the token before
/// it is removed, keyword prefixes are dropped and the end is trimmed.
pub(crate) fn normalize(name: &str) -> String {
    let chars: Vec<char> = strip_keyword_prefixes(name).chars().collect();
    let mut out = String::with_capacity(chars.len());

    let mut index = 0;
    while index < chars.len() {
        if !chars[index].is_whitespace() {
            out.push(chars[index]);
            index += 1;
            continue;
        }
        let start = index;
        while index < chars.len() && chars[index].is_whitespace() {
            index += 1;
        }
        let after_token = out.chars().next_back().is_some_and(|c| !matches!(c, ',' | '(' | '<'));
        if index < chars.len() && after_token && closes_token(&chars, index) {
            continue;
        }
        out.extend(&chars[start..index]);
    }

    out.truncate(out.trim_end().len());
    out
}

/// Finds `needle` in `haystack` ignoring whitespace on both sides.
///
/// Returns the byte range in `haystack`, from the first to the last
/// matched character.
pub(crate) fn find_ignoring_whitespace(haystack: &str, needle: &str) -> Option<Range<usize>> {
    let hay: Vec<(usize, char)> = haystack
        .char_indices()
        .filter(|(_, c)| !c.is_whitespace())
        .collect();
    let pattern: Vec<char> = needle.chars().filter(|c| !c.is_whitespace()).collect();

    if pattern.is_empty() || pattern.len() > hay.len() {
        return None;
    }

    (0..=hay.len() - pattern.len())
        .find(|&start| {
            hay[start..start + pattern.len()]
                .iter()
                .zip(&pattern)
                .all(|((_, h), p)| h == p)
        })
        .map(|start| {
            let (first, _) = hay[start];
            let (last, c) = hay[start + pattern.len() - 1];
            first..last + c.len_utf8()
        })
}

/// Replaces `raw_name` inside `src_name` with `custom_name`.
///
/// The match ignores whitespace, everything around it is kept as written.
/// Returns `src_name` unchanged when `raw_name` does not occur.
pub(crate) fn substitute(src_name: &str, raw_name: &str, custom_name: &str) -> String {
    match find_ignoring_whitespace(src_name, raw_name) {
        Some(range) => {
            let mut out = String::with_capacity(src_name.len() + custom_name.len());
            out.push_str(&src_name[..range.start]);
            out.push_str(custom_name);
            out.push_str(&src_name[range.end..]);
            out
        }
        None => String::from(src_name),
    }
}

/// Byte ranges of the top level generic arguments of `name`.
///
/// The list is delimited by the first `<` and the last `>`, nested `<>`,
/// `()` and `[]` groups are kept whole and the `>` of `->` is not a bracket.
fn template_argument_ranges(name: &str) -> Option<(usize, usize, Vec<Range<usize>>)> {
    let open = name.find('<')?;
    let close = name.rfind('>')?;
    if close <= open {
        return None;
    }

    let bytes = name.as_bytes();
    let mut ranges = Vec::new();
    let mut depth = 0_usize;
    let mut start = open + 1;
    for index in open + 1..close {
        match bytes[index] {
            b'<' | b'(' | b'[' => depth += 1,
            b'>' if index > 0 && bytes[index - 1] == b'-' => {}
            b'>' | b')' | b']' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                ranges.push(start..index);
                start = index + 1;
            }
            _ => {}
        }
    }
    ranges.push(start..close);
    Some((open, close, ranges))
}

/// Rewrites the generic arguments of `name`.
///
/// `arguments[i]` is `Some(display)` for a type parameter whose display
/// name replaces the i-th argument, `None` keeps the argument as written.
/// Arguments beyond the slice are kept too. Leading spacing of every
/// argument survives the rewrite.
pub(crate) fn substitute_template_arguments(name: &str, arguments: &[Option<&str>]) -> String {
    let Some((open, close, ranges)) = template_argument_ranges(name) else {
        return String::from(name);
    };

    let mut out = String::with_capacity(name.len());
    out.push_str(&name[..=open]);
    for (index, range) in ranges.into_iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        let written = &name[range];
        match arguments.get(index).copied().flatten() {
            Some(display) => {
                let body = written.trim_start();
                out.push_str(&written[..written.len() - body.len()]);
                out.push_str(display);
            }
            None => out.push_str(written),
        }
    }
    out.push_str(&name[close..]);
    out
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::{find_ignoring_whitespace, normalize, substitute, substitute_template_arguments};

    #[test]
    fn normalize_moves_trailing_tokens() {
        assert_eq!(normalize("int *"), "int*");
        assert_eq!(normalize("int * *"), "int**");
        assert_eq!(normalize("const Foo &"), "const Foo&");
        assert_eq!(normalize("void (int )"), "void (int)");
        assert_eq!(normalize("Foo   "), "Foo");
    }

    #[test]
    fn normalize_strips_keywords() {
        assert_eq!(normalize("class Foo *"), "Foo*");
        assert_eq!(normalize("std::vector<struct Bar>"), "std::vector<Bar>");
        assert_eq!(normalize("enum Color"), "Color");
        assert_eq!(normalize("subclass Foo"), "subclass Foo");
    }

    #[test]
    fn normalize_keeps_prefix_operators() {
        assert_eq!(normalize("*const i32"), "*const i32");
        assert_eq!(normalize("(&i32, &u8)"), "(&i32, &u8)");
        assert_eq!(normalize("fn(i32) -> &u8"), "fn(i32) -> &u8");
        assert_eq!(normalize("[*mut u8; 4]"), "[*mut u8; 4]");
    }

    #[test]
    fn whitespace_insensitive_find() {
        assert_eq!(find_ignoring_whitespace("const  Foo *", "const Foo"), Some(0..10));
        assert_eq!(find_ignoring_whitespace("*const a::Foo", "a :: Foo"), Some(7..13));
        assert_eq!(find_ignoring_whitespace("Foo", "Bar"), None);
        assert_eq!(find_ignoring_whitespace("Foo", ""), None);
    }

    #[test]
    fn substitute_keeps_surroundings() {
        assert_eq!(substitute("*const a::Foo", "a::Foo", "Bar"), "*const Bar");
        assert_eq!(substitute("[a::Foo; 3]", "a::Foo", "Bar"), "[Bar; 3]");
        assert_eq!(substitute("*const *const a::Foo", "a::Foo", "Bar"), "*const *const Bar");
        assert_eq!(substitute("u8", "a::Foo", "Bar"), "u8");
    }

    #[test]
    fn template_arguments() {
        assert_eq!(
            substitute_template_arguments("alloc::vec::Vec<a::Foo>", &[Some("Bar")]),
            "alloc::vec::Vec<Bar>"
        );
        assert_eq!(
            substitute_template_arguments("m::Map<a::K, a::V>", &[None, Some("Value")]),
            "m::Map<a::K, Value>"
        );
        assert_eq!(
            substitute_template_arguments("m::Grid<a::Cell, 3>", &[Some("Cell"), None]),
            "m::Grid<Cell, 3>"
        );
        assert_eq!(
            substitute_template_arguments("m::Pair<m::Box<a, b>, c>", &vec![Some("X"), Some("Y")]),
            "m::Pair<X, Y>"
        );
        assert_eq!(
            substitute_template_arguments("m::Call<fn(u8) -> u8, a::B>", &[None, Some("B")]),
            "m::Call<fn(u8) -> u8, B>"
        );
        assert_eq!(substitute_template_arguments("u8", &[Some("X")]), "u8");
    }
}
