//! Fixed datasets: the dashboard fallback and the home-screen figures.

use crate::narration::{DayStats, Insight, InsightKind};
use crate::types::{Collection, DashboardData, Lead, Opportunity, Quote, RecentItem};

fn s(value: &str) -> Option<String> {
    Some(value.to_string())
}

pub fn leads() -> Vec<Lead> {
    vec![
        Lead {
            id: "1".into(),
            number: "LEAD0001".into(),
            first_name: s("John"),
            last_name: s("Smith"),
            company: s("ABC Insurance"),
            email: s("john.smith@example.com"),
            business_phone: s("555-0101"),
            lead_type: s("New Business"),
            rating: s("Hot"),
            stage: s("Qualified"),
        },
        Lead {
            id: "2".into(),
            number: "LEAD0002".into(),
            first_name: s("Sarah"),
            last_name: s("Johnson"),
            company: s("XYZ Corp"),
            email: s("sarah.j@example.com"),
            business_phone: s("555-0102"),
            lead_type: s("Existing Business"),
            rating: s("Warm"),
            stage: s("Contacted"),
        },
    ]
}

pub fn opportunities() -> Vec<Opportunity> {
    vec![Opportunity {
        id: "1".into(),
        number: "OPP0001".into(),
        consumer: s("Johnson Family"),
        description: s("Life Insurance Policy"),
        amount: s("$50,000"),
        industry: s("Insurance"),
        rating: s("High"),
        stage: s("Propose"),
        sales_cycle_type: s("Standard"),
    }]
}

pub fn quotes() -> Vec<Quote> {
    vec![Quote {
        id: "1".into(),
        number: "QTE0001".into(),
        description: s("Auto Insurance Quote"),
        amount: s("$1,200"),
        status: s("Pending"),
        valid_until: s("2025-01-31"),
    }]
}

pub fn recent_items() -> Vec<RecentItem> {
    Vec::new()
}

pub fn dashboard() -> DashboardData {
    DashboardData {
        leads: leads(),
        opportunities: opportunities(),
        quotes: quotes(),
        recent_items: recent_items(),
    }
}

/// Overwrite one collection of `data` with its mock counterpart.
pub fn fill(data: &mut DashboardData, collection: Collection) {
    match collection {
        Collection::Leads => data.leads = leads(),
        Collection::Opportunities => data.opportunities = opportunities(),
        Collection::Quotes => data.quotes = quotes(),
        Collection::RecentItems => data.recent_items = recent_items(),
    }
}

/// Home-screen workload figures until a task/calendar source exists.
pub fn day_stats() -> DayStats {
    DayStats {
        tasks_today: 12,
        tasks_completed: 8,
        appointments_today: 3,
        leads_active: 24,
        opportunities_open: 15,
        urgent_items: 4,
        pipeline_value: 450_000,
    }
}

pub fn insights() -> Vec<Insight> {
    vec![
        Insight {
            kind: InsightKind::Priority,
            title: "High Priority".into(),
            message: "Follow up with John Smith - Policy renewal expires in 3 days".into(),
            action: "View Customer".into(),
        },
        Insight {
            kind: InsightKind::Opportunity,
            title: "Smart Recommendation".into(),
            message: "Sarah Johnson qualifies for life insurance upgrade based on recent life event"
                .into(),
            action: "Create Opportunity".into(),
        },
        Insight {
            kind: InsightKind::Reminder,
            title: "Special Occasion".into(),
            message: "Client birthday today: Michael Chen - Send wishes".into(),
            action: "Send Message".into(),
        },
    ]
}
