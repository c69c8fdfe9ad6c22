//! Terminal output for frame documents and answer panels.

use std::io::{self, Write};

use colored::*;

use crate::classify::{TypeLabel, TypeTone};
use crate::highlight::{highlight_lines, Token, TokenClass};
use crate::render::{BindingRow, FrameDocument, LocalsView, Tier, TracebackReport};
use crate::source::SourceSnippet;

type Rgb = (u8, u8, u8);

const SALMON: Rgb = (250, 128, 114);
const LILAC: Rgb = (200, 162, 200);
const YELLOW: Rgb = (255, 250, 205);
const GRAY: Rgb = (192, 192, 192);
const DIM: Rgb = (128, 128, 128);

// Syntax colors
const SKY: Rgb = (115, 201, 254);
const LEAF: Rgb = (156, 236, 116);
const PALE: Rgb = (234, 234, 234);
const CREAM: Rgb = (255, 242, 178);
const SAGE: Rgb = (181, 206, 168);
const PINK: Rgb = (247, 152, 251);
const TEXT: Rgb = (204, 204, 204);

const RULE_WIDTH: usize = 80;
const TYPE_COLUMN_MAX: usize = 40;

fn tint(text: &str, (r, g, b): Rgb) -> ColoredString {
    text.truecolor(r, g, b)
}

fn tone_color(tone: TypeTone) -> Rgb {
    match tone {
        TypeTone::Function => YELLOW,
        TypeTone::Module => LILAC,
        TypeTone::Class | TypeTone::Instance => SALMON,
    }
}

fn token_color(class: TokenClass) -> Rgb {
    match class {
        TokenClass::Keyword | TokenClass::Constant => SKY,
        TokenClass::Function | TokenClass::Comment => LEAF,
        TokenClass::Name => PALE,
        TokenClass::String => CREAM,
        TokenClass::Number => SAGE,
        TokenClass::Operator => PINK,
        TokenClass::Plain => TEXT,
    }
}

/// One colored piece per token.
pub fn paint(tokens: &[Token]) -> Vec<ColoredString> {
    tokens
        .iter()
        .map(|token| tint(&token.text, token_color(token.class)))
        .collect()
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

/// OSC 8 hyperlink when colors are on, plain text otherwise.
fn link(text: &str, target: &str) -> String {
    if control::SHOULD_COLORIZE.should_colorize() {
        format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", target, text)
    } else {
        text.to_string()
    }
}

/// Writes a type label padded to `width`, module and name tinted by tone.
fn write_label(out: &mut dyn Write, label: &TypeLabel, width: usize) -> io::Result<()> {
    let plain = label.to_string();
    let padding = " ".repeat(width.saturating_sub(plain.chars().count()));
    write!(
        out,
        "{}{}{}{}",
        tint(&label.module, GRAY),
        tint(".", GRAY),
        tint(&label.name, tone_color(label.tone)).bold(),
        padding
    )
}

struct ColumnWidths {
    name: usize,
    value: usize,
    label: usize,
}

impl ColumnWidths {
    fn measure(rows: &[BindingRow]) -> Self {
        ColumnWidths {
            name: widest(rows, |r| r.name.chars().count()).max(4),
            value: widest(rows, |r| r.value.chars().count()).max(5),
            label: widest(rows, |r| r.type_label.to_string().chars().count())
                .clamp(4, TYPE_COLUMN_MAX),
        }
    }
}

fn widest(rows: &[BindingRow], width: impl Fn(&BindingRow) -> usize) -> usize {
    rows.iter().map(width).max().unwrap_or(0)
}

fn write_row(out: &mut dyn Write, row: &BindingRow, widths: &ColumnWidths) -> io::Result<()> {
    let name = pad(&row.name, widths.name);
    let value = pad(&row.value, widths.value);
    match row.tier {
        Tier::Referenced => write!(out, "  {}  {}  ", tint(&name, SALMON).bold(), value.as_str().white())?,
        Tier::Other => write!(out, "  {}  {}  ", tint(&name, DIM), tint(&value, DIM))?,
    }
    write_label(out, &row.type_label, widths.label)?;
    if row.info.is_empty() {
        writeln!(out)
    } else {
        writeln!(out, "  {}", tint(&row.info, GRAY).italic())
    }
}

/// Writes one frame: location header, the error line if known, then the
/// locals table or its placeholder.
pub fn write_frame(out: &mut dyn Write, doc: &FrameDocument) -> io::Result<()> {
    let location = doc.location.to_string();
    writeln!(out, "{}", tint(&"─".repeat(RULE_WIDTH), DIM))?;
    writeln!(
        out,
        "{} {} {} {}",
        tint("file:", DIM).italic(),
        link(&location, &doc.location.file_url()).as_str().bold().underline(),
        tint("in", DIM),
        tint(&doc.location.function, YELLOW)
    )?;

    if let Some(snippet) = &doc.error_line {
        writeln!(out)?;
        writeln!(out, "{}", "Error line:".bold().white())?;
        write_source(out, snippet)?;
    }

    writeln!(out)?;
    match &doc.locals {
        LocalsView::Placeholder(text) => writeln!(out, "  {}", tint(text, DIM).italic())?,
        LocalsView::Table(rows) => {
            let widths = ColumnWidths::measure(rows);
            writeln!(
                out,
                "  {}  {}  {}  {}",
                pad("name", widths.name).as_str().bold(),
                pad("value", widths.value).as_str().bold(),
                pad("type", widths.label).as_str().bold(),
                "info".bold()
            )?;
            for row in rows {
                write_row(out, row, &widths)?;
            }
        }
    }
    writeln!(out)
}

/// Numbered source lines with Python highlighting.
pub fn write_source(out: &mut dyn Write, snippet: &SourceSnippet) -> io::Result<()> {
    let rows = highlight_lines(&snippet.lines);
    for ((line, _), tokens) in snippet.numbered().zip(rows) {
        write!(out, "  {} {} ", tint(&format!("{:>5}", line), DIM), tint("│", DIM))?;
        for piece in paint(&tokens) {
            write!(out, "{}", piece)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// `<kind> <name> from <origin>`, then the highlighted source.
pub fn write_listing(
    out: &mut dyn Write,
    kind: &str,
    name: &str,
    origin: &str,
    snippet: &SourceSnippet,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{} {} {} {}",
        kind.bold(),
        tint(name, YELLOW).bold(),
        tint("from", DIM),
        tint(origin, LILAC)
    )?;
    writeln!(out)?;
    write_source(out, snippet)
}

/// Writes every frame document followed by the standard trace.
pub fn write_report(out: &mut dyn Write, report: &TracebackReport) -> io::Result<()> {
    for doc in &report.frames {
        write_frame(out, doc)?;
    }
    write_standard_trace(out, &report.standard_trace)
}

pub fn write_standard_trace(out: &mut dyn Write, trace: &str) -> io::Result<()> {
    write!(out, "{}", trace)?;
    if !trace.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(())
}

/// A titled box of text lines.
pub fn write_panel(out: &mut dyn Write, title: &str, lines: &[String], warning: bool) -> io::Result<()> {
    let border = if warning { SALMON } else { LILAC };
    let heading = format!("─ {} ", title);
    let rest = RULE_WIDTH.saturating_sub(heading.chars().count() + 1);
    writeln!(out, "{}{}", tint("┌", border), tint(&format!("{}{}", heading, "─".repeat(rest)), border).bold())?;
    for line in lines {
        writeln!(out, "{} {}", tint("│", border), line)?;
    }
    writeln!(out, "{}", tint(&format!("└{}", "─".repeat(RULE_WIDTH - 1)), border))
}
