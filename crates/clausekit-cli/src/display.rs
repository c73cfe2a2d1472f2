//! Text rendering of an analysis as summary tiles and clause cards.
//!
//! Collapsed cards show one header line. Expanded cards add the clause text
//! and, when a playbook applies, the comparison detail.

use std::io::{self, Write};

use clausekit_core::badges::percent;
use clausekit_core::{ClauseCard, ComparisonDetail, ResultsView, ScoreTone, UploadSession};

const LABEL_WIDTH: usize = 20;
const BAR_WIDTH: usize = 20;
const WRAP_AT: usize = 76;

// ── Public API ──

/// Print the summary header, statistics tiles and every clause card.
pub fn print_results(out: &mut impl Write, view: &ResultsView) -> io::Result<()> {
    let result = view.result();
    writeln!(out, "=== {} ===", result.filename)?;
    write!(
        out,
        "Analysis complete at {}",
        view.received().format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    if let Some(len) = result.extracted_text_length {
        write!(out, " ({len} characters extracted)")?;
    }
    writeln!(out)?;
    writeln!(out)?;

    for tile in view.stat_tiles() {
        writeln!(out, "  {:<LABEL_WIDTH$} {}", tile.label, tile.value)?;
    }
    writeln!(out)?;

    writeln!(out, "Extracted Clauses")?;
    if result.clauses.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for card in view.cards() {
        print_card(out, &card)?;
    }
    Ok(())
}

/// One-line status for states without a result: selected file, error, or idle.
pub fn print_status(out: &mut impl Write, session: &UploadSession) -> io::Result<()> {
    if let Some(file) = session.candidate() {
        writeln!(out, "Selected: {} ({})", file.name, file.size_mib())?;
    } else if let Some(file) = session.in_flight() {
        writeln!(out, "Processing {}...", file.name)?;
    } else if session.results().is_none() {
        writeln!(out, "No file selected. PDF, PNG, JPG, JPEG (max 50MB)")?;
    }
    if let Some(err) = session.error() {
        writeln!(out, "Error: {err}")?;
    }
    Ok(())
}

// ── Cards ──

fn print_card(out: &mut impl Write, card: &ClauseCard<'_>) -> io::Result<()> {
    let clause = card.clause;
    let marker = if card.expanded { "[-]" } else { "[+]" };
    writeln!(
        out,
        "  {marker} #{:<4} {:<24} {} ({})  {}",
        clause.id,
        clause.kind,
        card.confidence.label(),
        percent(clause.confidence),
        card.status.label(),
    )?;
    if !card.expanded {
        return Ok(());
    }

    if let Some(section) = clause.section_number {
        writeln!(out, "      Section {section}")?;
    }
    writeln!(out, "      Clause Text:")?;
    for line in wrap(card.text(), WRAP_AT) {
        writeln!(out, "        {line}")?;
    }

    if let Some(detail) = card.comparison() {
        writeln!(out, "      Playbook Comparison:")?;
        print_comparison(out, &detail)?;
    }
    writeln!(out)?;
    Ok(())
}

fn print_comparison(out: &mut impl Write, detail: &ComparisonDetail<'_>) -> io::Result<()> {
    writeln!(
        out,
        "        Compliance Score  {} {}",
        score_bar(detail.score, detail.tone),
        percent(detail.score)
    )?;
    if let Some(flags) = detail.red_flags {
        writeln!(out, "        Red Flags:")?;
        for flag in flags {
            writeln!(out, "          ! {flag}")?;
        }
    }
    if let Some(missing) = detail.missing {
        writeln!(out, "        Missing Elements:")?;
        for item in missing {
            writeln!(out, "          - {item}")?;
        }
    }
    if let Some(preferred) = detail.preferred {
        writeln!(out, "        Preferred Language:")?;
        for line in wrap(preferred, WRAP_AT - 4) {
            writeln!(out, "          {line}")?;
        }
    }
    Ok(())
}

// ── Helpers ──

/// `[########------------]`, filled with `#` when passing and `~` otherwise.
fn score_bar(score: f32, tone: ScoreTone) -> String {
    let filled = ((score.clamp(0.0, 1.0) * BAR_WIDTH as f32).round() as usize).min(BAR_WIDTH);
    let fill = match tone {
        ScoreTone::Success => "#",
        ScoreTone::Warning => "~",
    };
    format!("[{}{}]", fill.repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Greedy word wrap. Existing line breaks are kept.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines
}
