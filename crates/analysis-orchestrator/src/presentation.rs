//! Terminal styling for the model's answer.
//!
//! Styling is driven by [`HIGHLIGHT_RULES`]: exact, case-sensitive substrings
//! matched in one left-to-right pass. Text that matches no rule is copied
//! through untouched.

use colored::{Color, Colorize};

const RULE_WIDTH: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HighlightStyle {
    /// Cyan bold section title
    Heading,
    /// Green label
    Positive,
    /// Red label
    Negative,
    /// Green bold label
    Target,
    /// Black text on a colored background
    Badge(Color),
}

#[derive(Debug, Clone, Copy)]
pub struct HighlightRule {
    /// Exact text to find
    pub pattern: &'static str,
    /// Unstyled text emitted before the styled part
    pub lead: &'static str,
    /// Text emitted with `style` applied
    pub styled: &'static str,
    pub style: HighlightStyle,
}

const fn highlight(pattern: &'static str, lead: &'static str, styled: &'static str, style: HighlightStyle) -> HighlightRule {
    HighlightRule {
        pattern,
        lead,
        styled,
        style,
    }
}

/// Ordered rule table; at each position the first matching rule wins
pub const HIGHLIGHT_RULES: &[HighlightRule] = &[
    highlight("Short-Term Outlook", "", "Short-Term Outlook", HighlightStyle::Heading),
    highlight("Long-Term Outlook", "\n", "Long-Term Outlook", HighlightStyle::Heading),
    highlight("Key Considerations", "\n", "Key Considerations", HighlightStyle::Heading),
    highlight("Recommendation: Buy", "Recommendation: ", " Buy ", HighlightStyle::Badge(Color::Green)),
    highlight("Recommendation: Sell", "Recommendation: ", " Sell ", HighlightStyle::Badge(Color::Red)),
    highlight("Recommendation: Hold", "Recommendation: ", " Hold ", HighlightStyle::Badge(Color::Yellow)),
    highlight("Support Levels:", "", "Support Levels:", HighlightStyle::Positive),
    highlight("Resistance Levels:", "", "Resistance Levels:", HighlightStyle::Negative),
    highlight("Entry Points:", "", "Entry Points:", HighlightStyle::Positive),
    highlight("Exit Points:", "", "Exit Points:", HighlightStyle::Negative),
    highlight("Risk: High", "Risk: ", " High ", HighlightStyle::Badge(Color::Red)),
    highlight("Risk: Medium", "Risk: ", " Medium ", HighlightStyle::Badge(Color::Yellow)),
    highlight("Risk: Low", "Risk: ", " Low ", HighlightStyle::Badge(Color::Green)),
    highlight("Target Price Range:", "", "Target Price Range:", HighlightStyle::Target),
];

impl HighlightRule {
    pub fn render(&self) -> String {
        let styled = match self.style {
            HighlightStyle::Heading => self.styled.cyan().bold(),
            HighlightStyle::Positive => self.styled.green(),
            HighlightStyle::Negative => self.styled.red(),
            HighlightStyle::Target => self.styled.green().bold(),
            HighlightStyle::Badge(background) => self.styled.black().on_color(background),
        };
        format!("{}{}", self.lead, styled)
    }
}

/// Apply [`HIGHLIGHT_RULES`] to a raw model response
pub fn format_analysis(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + raw.len() / 8);
    let mut rest = raw;

    'scan: while !rest.is_empty() {
        for rule in HIGHLIGHT_RULES {
            if let Some(after) = rest.strip_prefix(rule.pattern) {
                out.push_str(&rule.render());
                rest = after;
                continue 'scan;
            }
        }

        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            out.push(ch);
        }
        rest = chars.as_str();
    }

    out
}

pub fn header(ticker: &str) -> String {
    let line = "=".repeat(RULE_WIDTH);
    format!(
        "{}\n{}{}\n{}\n",
        line.cyan(),
        "STOCK ANALYSIS: ".cyan(),
        ticker.yellow(),
        line.cyan()
    )
}

pub fn progress(message: &str) -> String {
    message.yellow().to_string()
}

pub fn error_line(message: &str) -> String {
    message.red().to_string()
}

/// Results banner wrapped around the formatted analysis
pub fn results_block(formatted: &str) -> String {
    let line = "-".repeat(RULE_WIDTH);
    format!("\n{}\n{}\n{}\n{}", "ANALYSIS RESULTS:".green(), line, formatted, line)
}
