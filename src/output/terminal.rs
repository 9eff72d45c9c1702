//! Terminal output formatting with colors and box drawing.

use colored::Colorize;

use crate::result::{FinalDecision, GateVerdict, RejectReason};

/// Format a [`FinalDecision`] for human-readable terminal output.
///
/// Uses ANSI colors and Unicode box drawing. Rejections get a warning
/// header; diagnoses get a checkmark and the ranked class list.
pub fn format_decision(decision: &FinalDecision) -> String {
    let mut output = String::new();

    let header = if decision.rejected {
        format!(
            "{} {}",
            "\u{26A0}".yellow().bold(),
            "INPUT REJECTED".red().bold()
        )
    } else {
        format!("{} {}", "\u{2713}".green().bold(), "DIAGNOSIS".green().bold())
    };

    output.push_str(&format_box_top());
    output.push_str(&format_box_line(&header));
    output.push_str(&format_box_separator());

    if decision.rejected {
        let policy = decision
            .diagnostics
            .rejection
            .as_ref()
            .map(RejectReason::policy_name)
            .unwrap_or("unspecified");
        output.push_str(&format_box_line(&format!("Policy: {}", policy)));

        if let Some(label) = &decision.diagnostics.gate.label {
            output.push_str(&format_box_line(&format!("Gate Label: {}", label)));
        }
        let conf_pct = decision.confidence * 100.0;
        output.push_str(&format_box_line(&format!("Gate Confidence: {:.1}%", conf_pct)));

        if let Some(RejectReason::UncertainGateStrict {
            top1_confidence,
            entropy,
        }) = &decision.diagnostics.rejection
        {
            output.push_str(&format_box_line(&format!(
                "Disease Top-1: {:.1}%",
                top1_confidence * 100.0
            )));
            output.push_str(&format_box_line(&format!("Entropy: {:.2} nats", entropy)));
        }
    } else {
        let conf_pct = decision.confidence * 100.0;
        let label_str = format!("{}: {:.1}%", decision.label, conf_pct);
        let label_colored = if conf_pct >= 80.0 {
            label_str.green().bold()
        } else if conf_pct >= 50.0 {
            label_str.yellow()
        } else {
            label_str.red()
        };
        output.push_str(&format_box_line(&label_colored.to_string()));

        output.push_str(&format_box_line(&format!(
            "Gate: {}",
            format_verdict(decision.diagnostics.gate_verdict)
        )));
        if let Some(entropy) = decision.diagnostics.disease_entropy {
            output.push_str(&format_box_line(&format!("Entropy: {:.2} nats", entropy)));
        }

        if !decision.top_k.is_empty() {
            output.push_str(&format_box_separator());
            output.push_str(&format_box_line(&"Ranked Classes:".bold().to_string()));
            for score in &decision.top_k {
                output.push_str(&format_box_line(&format!(
                    "  {:<28} {:.1}%",
                    score.label,
                    score.confidence * 100.0
                )));
            }
        }
    }

    output.push_str(&format_box_bottom());

    output.push_str(&format!(
        "\n{}\n",
        "Note: automated screening output, not a medical diagnosis."
            .dimmed()
            .italic()
    ));

    output
}

/// Format a gate verdict for display.
fn format_verdict(verdict: GateVerdict) -> String {
    match verdict {
        GateVerdict::Accept => "accepted".green().to_string(),
        GateVerdict::Reject => "rejected".red().to_string(),
        GateVerdict::Uncertain => "uncertain".yellow().to_string(),
    }
}

// Box drawing helpers

const BOX_WIDTH: usize = 60;

fn format_box_top() -> String {
    format!("\u{250C}{}\u{2510}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn format_box_bottom() -> String {
    format!("\u{2514}{}\u{2518}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn format_box_separator() -> String {
    format!("\u{251C}{}\u{2524}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn format_box_line(content: &str) -> String {
    // Strip ANSI codes for length calculation
    let visible_len = strip_ansi_codes(content).chars().count();
    let padding = if visible_len < BOX_WIDTH - 2 {
        BOX_WIDTH - 2 - visible_len
    } else {
        0
    };
    format!("\u{2502} {}{} \u{2502}\n", content, " ".repeat(padding))
}

/// Strip ANSI escape codes for accurate length calculation.
fn strip_ansi_codes(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip until 'm' (end of ANSI sequence)
            while let Some(&next) = chars.peek() {
                chars.next();
                if next == 'm' {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}
