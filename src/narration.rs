//! Spoken messages for the home screen: welcome, daily summary, insights.
//!
//! All builders are pure; the hour of day is passed in so output is
//! reproducible. `local_hour` reads the local clock.

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::speech::random_response;

/// Advisor workload figures narrated on the home screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStats {
    pub tasks_today: u32,
    pub tasks_completed: u32,
    pub appointments_today: u32,
    pub leads_active: u32,
    pub opportunities_open: u32,
    pub urgent_items: u32,
    /// Whole dollars.
    pub pipeline_value: u64,
}

impl DayStats {
    pub fn completion_rate(&self) -> u32 {
        completion_rate(self.tasks_completed, self.tasks_today)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Priority,
    Opportunity,
    Reminder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
    /// Suggested next step, phrased as a command ("View Customer").
    pub action: String,
}

pub const INSIGHT_INTROS: &[&str] = &[
    "Here's something important: ",
    "I wanted to let you know: ",
    "Quick heads up: ",
    "This needs your attention: ",
    "Don't forget: ",
];

/// Percentage of tasks done, rounded; 0 when there are no tasks.
pub fn completion_rate(completed: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(completed) / f64::from(total) * 100.0).round() as u32
}

pub fn greeting(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    }
}

/// Hour of day on the local clock, for the builders above.
pub fn local_hour() -> u32 {
    chrono::Local::now().hour()
}

fn motivation(rate: u32) -> &'static str {
    match rate {
        75.. => "You're crushing it today! ",
        50..=74 => "You're making great progress! ",
        1..=49 => "Keep up the good work! ",
        0 => "",
    }
}

fn performance(rate: u32) -> &'static str {
    match rate {
        80.. => "Wow! You're absolutely crushing it today. ",
        60..=79 => "Great job! You're doing really well. ",
        40..=59 => "You're making solid progress. ",
        _ => "Let's focus on getting these tasks done. ",
    }
}

fn first_name(full_name: &str) -> &str {
    full_name.split_whitespace().next().unwrap_or("there")
}

pub fn welcome_message(advisor_name: &str, stats: &DayStats, hour: u32) -> String {
    let urgent_note = if stats.urgent_items > 0 {
        format!(
            " Just a heads up, you have {} urgent items that need your attention.",
            stats.urgent_items
        )
    } else {
        String::new()
    };
    format!(
        "{} {}! {}You have {} tasks on your plate today, and {} appointments scheduled.{} Let's make it a productive day!",
        greeting(hour),
        first_name(advisor_name),
        motivation(stats.completion_rate()),
        stats.tasks_today,
        stats.appointments_today,
        urgent_note,
    )
}

pub fn daily_summary(stats: &DayStats) -> String {
    let rate = stats.completion_rate();
    format!(
        "Alright, here's your daily overview. {}You've completed {} out of {} tasks, that's {} percent done. \
         Looking at your calendar, you have {} appointments scheduled for today. \
         On the sales side, you're managing {} active leads and {} open opportunities, \
         with a pipeline value of {}. You've got this!",
        performance(rate),
        stats.tasks_completed,
        stats.tasks_today,
        rate,
        stats.appointments_today,
        stats.leads_active,
        stats.opportunities_open,
        spoken_dollars(stats.pipeline_value),
    )
}

/// Insight read aloud with a randomly chosen intro.
pub fn insight_message(insight: &Insight) -> String {
    let intro = random_response(INSIGHT_INTROS).unwrap_or_default();
    insight_message_with(intro, insight)
}

pub fn insight_message_with(intro: &str, insight: &Insight) -> String {
    format!("{intro}{}. {}?", insight.message, insight.action)
}

const ONES: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];
const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

fn words_below_thousand(n: u64) -> String {
    let hundreds = n / 100;
    let rest = n % 100;
    let tail = match rest {
        0 => String::new(),
        1..=19 => ONES[rest as usize].to_string(),
        _ if rest % 10 == 0 => TENS[(rest / 10) as usize].to_string(),
        _ => format!("{}-{}", TENS[(rest / 10) as usize], ONES[(rest % 10) as usize]),
    };
    match (hundreds, tail.is_empty()) {
        (0, _) => tail,
        (h, true) => format!("{} hundred", ONES[h as usize]),
        (h, false) => format!("{} hundred and {}", ONES[h as usize], tail),
    }
}

/// British-style number words: 450_000 -> "four hundred and fifty thousand".
pub fn number_words(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }
    const SCALES: [(u64, &str); 4] = [
        (1_000_000_000_000, "trillion"),
        (1_000_000_000, "billion"),
        (1_000_000, "million"),
        (1_000, "thousand"),
    ];
    let mut parts = Vec::new();
    let mut rest = n;
    for (scale, name) in SCALES {
        if rest >= scale {
            parts.push(format!("{} {name}", number_words(rest / scale)));
            rest %= scale;
        }
    }
    if rest > 0 {
        // "one thousand and five"
        if !parts.is_empty() && rest < 100 {
            parts.push(format!("and {}", words_below_thousand(rest)));
        } else {
            parts.push(words_below_thousand(rest));
        }
    }
    parts.join(" ")
}

pub fn spoken_dollars(amount: u64) -> String {
    match amount {
        1 => "one dollar".to_string(),
        n => format!("{} dollars", number_words(n)),
    }
}
