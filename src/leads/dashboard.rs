//! Dashboard aggregates, derived from the lead store on every render.

use serde::Serialize;

use super::model::{Lead, LeadDetails, UserType};
use super::scoring::{self, HOT_THRESHOLD, ScoreBand};
use super::store::LeadStore;

/// Totals shown at the top of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardTotals {
    pub total: usize,
    pub hot: usize,
    pub schools: usize,
    pub parents: usize,
}

/// One summary row per lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadRow {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub user_type: UserType,
    /// School name and size bucket, or the child's age.
    pub context: String,
    /// Interest (or program interest) and urgency, empty ones omitted.
    pub tags: Vec<String>,
    pub score: u32,
    pub band: ScoreBand,
}

impl LeadRow {
    pub fn from_lead(lead: &Lead) -> Self {
        let d = &lead.details;
        let score = scoring::score(d);
        Self {
            name: non_empty(d.name.as_deref()).unwrap_or("Unknown").to_string(),
            email: d.email.clone().unwrap_or_default(),
            phone: d.phone.clone().unwrap_or_default(),
            user_type: d.user_type,
            context: context_line(d),
            tags: tags(d),
            score,
            band: ScoreBand::from_score(score),
        }
    }
}

/// Full dashboard snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub totals: DashboardTotals,
    pub rows: Vec<LeadRow>,
}

impl Dashboard {
    /// Derive the dashboard from a list of leads.
    pub fn from_leads(leads: &[Lead]) -> Self {
        let totals = DashboardTotals {
            total: leads.len(),
            hot: leads
                .iter()
                .filter(|l| scoring::score(&l.details) >= HOT_THRESHOLD)
                .count(),
            schools: leads
                .iter()
                .filter(|l| l.user_type() == UserType::School)
                .count(),
            parents: leads
                .iter()
                .filter(|l| l.user_type() == UserType::Parent)
                .count(),
        };
        Self {
            totals,
            rows: leads.iter().map(LeadRow::from_lead).collect(),
        }
    }

    /// Snapshot the store.
    pub async fn build(store: &LeadStore) -> Self {
        Self::from_leads(&store.list().await)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn context_line(d: &LeadDetails) -> String {
    match d.user_type {
        UserType::School => format!(
            "🏫 {} · {} students",
            non_empty(d.school_name.as_deref()).unwrap_or("School"),
            d.student_count.as_deref().unwrap_or("")
        ),
        UserType::Parent => format!(
            "👨‍👩‍👧 Parent · Child age: {}",
            non_empty(d.child_age.as_deref()).unwrap_or("?")
        ),
    }
}

fn tags(d: &LeadDetails) -> Vec<String> {
    let interest = non_empty(d.interest.as_deref()).or(non_empty(d.program_interest.as_deref()));
    [interest, non_empty(d.urgency.as_deref())]
        .into_iter()
        .flatten()
        .map(String::from)
        .collect()
}
