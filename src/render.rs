//! Plain-text rendering of the chat and dashboard views.
//!
//! Everything here is derived from engine and store state on demand.

use crate::config::ChatConfig;
use crate::conversation::state::{ChatMessage, Sender};
use crate::conversation::{FlowStep, InputKind};
use crate::leads::{Dashboard, LeadRow, ScoreBand, UserType};

/// Type-selection buttons: (user type, label, description).
pub const TYPE_CHOICES: [(UserType, &str, &str); 2] = [
    (
        UserType::Parent,
        "👨‍👩‍👧 I'm a Parent",
        "Explore programs for my child",
    ),
    (
        UserType::School,
        "🏫 I'm from a School",
        "Explore partnership programs",
    ),
];

/// Resolve type-selection input: "1"/"parent" or "2"/"school".
pub fn parse_type_choice(input: &str) -> Option<UserType> {
    let input = input.trim();
    if let Ok(n) = input.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| TYPE_CHOICES.get(i))
            .map(|(t, _, _)| *t);
    }
    input.parse().ok()
}

pub fn header() -> String {
    "🤖 Wiz Assistant · Online · Responds instantly\n   (type /help for commands)".to_string()
}

pub fn bot_line(text: &str) -> String {
    format!("🤖 {text}")
}

pub fn user_line(text: &str) -> String {
    format!("{:>4}🙂 {text}", "")
}

/// One transcript entry.
pub fn message(msg: &ChatMessage) -> String {
    match msg.sender {
        Sender::Bot => bot_line(&msg.text),
        Sender::User => user_line(&msg.text),
    }
}

/// The whole transcript, one line per message.
pub fn transcript(messages: &[ChatMessage]) -> String {
    messages.iter().map(message).collect::<Vec<_>>().join("\n")
}

pub fn type_select_controls() -> String {
    let mut lines = Vec::with_capacity(TYPE_CHOICES.len());
    for (i, (_, label, desc)) in TYPE_CHOICES.iter().enumerate() {
        lines.push(format!("  [{}] {label}  ({desc})", i + 1));
    }
    lines.join("\n")
}

/// Input controls for a flow step: numbered options or a typed-input hint.
pub fn step_controls(step: &FlowStep) -> String {
    match step.input {
        InputKind::Choice(options) => options
            .iter()
            .enumerate()
            .map(|(i, o)| format!("  [{}] {o}", i + 1))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => format!(
            "  ✎ {}",
            step.placeholder.unwrap_or("Type your answer...")
        ),
    }
}

pub fn score_badge(score: u32) -> String {
    format!("● {} · Score: {score}", ScoreBand::from_score(score).label())
}

/// Completion card shown once the conversation is done.
pub fn call_to_action(config: &ChatConfig, score: u32) -> String {
    [
        "┌ 🎓 Book a FREE Demo".to_string(),
        format!("│ 📅 Schedule My Demo → {}", config.demo_url),
        format!("│ or call us at {}", config.call_number),
        format!("└ {}", score_badge(score)),
    ]
    .join("\n")
}

fn lead_row(row: &LeadRow) -> String {
    let mut lines = vec![
        format!("  {}  {}", row.name, score_badge(row.score)),
        format!("    {} · {}", row.email, row.phone),
        format!("    {}", row.context),
    ];
    if !row.tags.is_empty() {
        lines.push(format!("    #{}", row.tags.join("  #")));
    }
    lines.join("\n")
}

/// The dashboard view.
pub fn dashboard(dash: &Dashboard) -> String {
    let mut out = vec![
        "📊 Lead Dashboard".to_string(),
        format!(
            "  👥 Total Leads: {}   🔥 Hot Leads: {}   🏫 Schools: {}   👨‍👩‍👧 Parents: {}",
            dash.totals.total, dash.totals.hot, dash.totals.schools, dash.totals.parents
        ),
        String::new(),
    ];
    if dash.is_empty() {
        out.push("  No leads yet. Chat first! 💬".to_string());
    } else {
        out.extend(dash.rows.iter().map(lead_row));
    }
    out.push(String::new());
    out.push("  /chat to go back".to_string());
    out.join("\n")
}

pub fn help() -> String {
    [
        "Commands:",
        "  /dashboard  show collected leads",
        "  /chat       back to the conversation",
        "  /transcript replay the conversation so far",
        "  /export     print collected leads as JSON",
        "  /quit       leave",
    ]
    .join("\n")
}
