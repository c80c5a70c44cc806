//! Jira wiki markup to Markdown conversion.
//!
//! # Invariants
//! - Bodies of `{code}`/`{noformat}` blocks and `{{monospace}}` spans are
//!   emitted verbatim; no inline rule touches them.
//! - Rules run in a fixed order; each rule sees the output of the previous.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const PLACEHOLDER_OPEN: char = '\u{E000}';
const PLACEHOLDER_CLOSE: char = '\u{E001}';

static CODE_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)\{code(?::([a-zA-Z0-9_+\-]+))?(?:[:|](?:title|borderStyle|borderColor|borderWidth|bgColor|titleBGColor)=[^}|]*)*\}\n?(.*?)\n?\{code\}",
    )
    .expect("valid code block regex")
});
static NOFORMAT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\{noformat\}\n?(.*?)\n?\{noformat\}").expect("valid noformat regex")
});
static MONOSPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(.+?)\}\}").expect("valid monospace regex"));
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x{E000}(\d+)\x{E001}").expect("valid placeholder regex"));

static BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(\*+)[ \t]+").expect("valid bullet regex"));
static NUMBERED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(#+)[ \t]+").expect("valid numbered list regex"));
static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^h([1-6])\.[ \t]*(.*)$").expect("valid heading regex"));
static BOLD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^\s*][^*\n]*?)\*").expect("valid bold regex"));
static ITALIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|[^\w])_([^\s_][^_\n]*?)_").expect("valid italic regex"));
static INSERT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+([^\s+][^+\n]*?)\+").expect("valid insert regex"));
static SUPERSCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\^([^\s\^][^\^\n]*?)\^").expect("valid superscript regex"));
static SUBSCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"~([^\s~][^~\n]*?)~").expect("valid subscript regex"));
static STRIKE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)(^|\s)-([^\s\-](?:[^\n]*?[^\s\-])?)-(\s|$)").expect("valid strike regex")
});
static UNNAMED_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\[\]|]+)\]").expect("valid unnamed link regex"));
static IMAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"!([^\s!|][^!|\n]*)(?:\|[^!\n]*)?!").expect("valid image regex")
});
static NAMED_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\[\]|]+)\|([^\[\]]+)\]").expect("valid named link regex"));
static BLOCKQUOTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^bq\.[ \t]+").expect("valid blockquote regex"));
static COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\{color(?::[^}]*)?\}(.*?)\{color\}").expect("valid color regex")
});
static PANEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\{panel(?::title=([^}|]*)[^}]*|:[^}]*)?\}\n?(.*?)\n?\{panel\}")
        .expect("valid panel regex")
});
static TABLE_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*((?:\|\|[^\n]*?)+\|\|)[ \t]*$").expect("valid table header regex")
});
static TABLE_CELL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\|[^|]+").expect("valid table cell regex"));
static TABLE_ROW_INDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]+\|").expect("valid table row regex"));

/// Converts Jira wiki markup to Markdown.
pub fn to_markdown(input: &str) -> String {
    let mut verbatim: Vec<String> = Vec::new();

    let text = CODE_BLOCK_RE.replace_all(input, |caps: &Captures<'_>| {
        let lang = caps.get(1).map_or("", |m| m.as_str());
        protect(&mut verbatim, format!("```{lang}\n{}\n```", &caps[2]))
    });
    let text = NOFORMAT_RE.replace_all(&text, |caps: &Captures<'_>| {
        protect(&mut verbatim, format!("```\n{}\n```", &caps[1]))
    });
    let text = MONOSPACE_RE.replace_all(&text, |caps: &Captures<'_>| {
        protect(&mut verbatim, format!("`{}`", &caps[1]))
    });

    let text = BULLET_RE.replace_all(&text, |caps: &Captures<'_>| {
        format!("{}* ", "  ".repeat(caps[1].len() - 1))
    });
    let text = NUMBERED_RE.replace_all(&text, |caps: &Captures<'_>| {
        format!("{}1. ", "  ".repeat(caps[1].len() - 1))
    });
    let text = HEADING_RE.replace_all(&text, |caps: &Captures<'_>| {
        let level = caps[1].parse::<usize>().unwrap_or(1);
        format!("{} {}", "#".repeat(level), caps[2].trim_end())
    });

    let text = BOLD_RE.replace_all(&text, "**$1**");
    let text = ITALIC_RE.replace_all(&text, "$1*$2*");
    let text = INSERT_RE.replace_all(&text, "<ins>$1</ins>");
    let text = SUPERSCRIPT_RE.replace_all(&text, "<sup>$1</sup>");
    let text = SUBSCRIPT_RE.replace_all(&text, "<sub>$1</sub>");
    let text = strike(&text);

    let text = UNNAMED_LINK_RE.replace_all(&text, "<$1>");
    let text = IMAGE_RE.replace_all(&text, "![]($1)");
    let text = NAMED_LINK_RE.replace_all(&text, "[$1]($2)");
    let text = BLOCKQUOTE_RE.replace_all(&text, "> ");
    let text = COLOR_RE.replace_all(&text, "$1");
    let text = PANEL_RE.replace_all(&text, |caps: &Captures<'_>| match caps.get(1) {
        Some(title) => format!("\n| {} |\n| --- |\n| {} |", title.as_str(), &caps[2]),
        None => caps[2].to_string(),
    });

    let text = TABLE_HEADER_RE.replace_all(&text, |caps: &Captures<'_>| {
        let header = caps[1].replace("||", "|");
        let separator = TABLE_CELL_RE.replace_all(&header, "| --- ");
        let leading = if caps.get(0).map_or(0, |m| m.start()) > 0 {
            "\n"
        } else {
            ""
        };
        format!("{leading}{header}\n{separator}")
    });
    let text = TABLE_ROW_INDENT_RE.replace_all(&text, "|");

    PLACEHOLDER_RE
        .replace_all(&text, |caps: &Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| verbatim.get(index))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

// A match consumes its trailing whitespace, which is also the leading
// boundary of an adjacent span, so spans separated by one space are only
// converted every other time. The second pass converts the rest.
fn strike(text: &str) -> String {
    let once = STRIKE_RE.replace_all(text, "$1~~$2~~$3");
    STRIKE_RE.replace_all(&once, "$1~~$2~~$3").into_owned()
}

fn protect(verbatim: &mut Vec<String>, rendered: String) -> String {
    verbatim.push(rendered);
    format!("{PLACEHOLDER_OPEN}{}{PLACEHOLDER_CLOSE}", verbatim.len() - 1)
}
