// src/health_az.rs

use serde::{Deserialize, Serialize};

use crate::view::{el, Element};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub title: &'static str,
    pub href: &'static str,
}

impl Topic {
    pub fn letter(&self) -> char {
        self.title
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('#')
    }
}

const fn topic(title: &'static str, href: &'static str) -> Topic {
    Topic { title, href }
}

pub const TOPICS: &[Topic] = &[
    topic("ADHD in adults", "/nhs-conditions/adhd-adults/"),
    topic("ADHD in children and young people", "/nhs-conditions/adhd-children-young-people/"),
    topic("Abdominal aortic aneurysm", "/nhs-conditions/abdominal-aortic-aneurysm/"),
    topic("Altitude sickness", "/altitude-sickness/"),
    topic("Cholera", "/cholera/"),
    topic("Dengue", "/dengue/"),
    topic("Ear infection", "/ear-infection/"),
    topic("Earwax build-up", "/earwax/"),
    topic("Hepatitis A", "/hepatitis-a/"),
    topic("Hepatitis B", "/hepatitis-b/"),
    topic("Impetigo", "/impetigo/"),
    topic("Infected insect bite", "/insect-bite/"),
    topic("Japanese encephalitis", "/japanese-encephalitis/"),
    topic("Jet lag", "/jetlag/"),
    topic("Malaria", "/malaria/"),
    topic("Shingles", "/shingles/"),
    topic("Sinusitis", "/sinusitis/"),
    topic("Sore throat", "/sorethroat/"),
    topic("Tick-borne encephalitis", "/tick-borne/"),
    topic("Typhoid", "/typhoid/"),
    topic("Urinary tract infection (UTI)", "/uti/"),
    topic("Yellow fever", "/yellow-fever/"),
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HealthQuery {
    pub q: String,
    /// `all` or a single letter.
    pub letter: String,
}

impl HealthQuery {
    fn active_letter(&self) -> Option<char> {
        let letter = self.letter.trim();
        if letter.is_empty() || letter.eq_ignore_ascii_case("all") {
            return None;
        }
        letter.chars().next().map(|c| c.to_ascii_uppercase())
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResults {
    pub topics: Vec<Topic>,
    pub empty: bool,
}

pub fn filter(topics: &[Topic], query: &HealthQuery) -> HealthResults {
    let q = query.q.trim().to_lowercase();
    let letter = query.active_letter();
    let topics: Vec<Topic> = topics
        .iter()
        .filter(|t| q.is_empty() || t.title.to_lowercase().contains(&q))
        .filter(|t| letter.is_none_or(|l| t.letter() == l))
        .copied()
        .collect();
    HealthResults {
        empty: topics.is_empty(),
        topics,
    }
}

pub fn render(query: &HealthQuery, results: &HealthResults) -> Element {
    let active = query.active_letter();
    let letters = std::iter::once(("all".to_string(), "All".to_string(), active.is_none())).chain(
        ('A'..='Z').map(|c| (c.to_string(), c.to_string(), active == Some(c))),
    );
    let az = letters.map(|(key, label, on)| {
        el("button")
            .class("az-btn")
            .class_if(on, "active")
            .attr("data-letter", key)
            .text(label)
    });

    let items = results.topics.iter().map(|t| {
        el("a")
            .class("health-item")
            .attr("href", t.href)
            .attr("data-title", t.title)
            .attr("data-letter", t.letter().to_string())
            .text(t.title)
    });

    el("div")
        .id("healthAz")
        .child(el("input").id("healthSearch").attr("type", "search").attr("value", query.q.clone()))
        .child(el("div").id("azRow").children(az))
        .child(el("div").id("healthGrid").children(items))
        .child(
            el("div")
                .id("healthEmpty")
                .class_if(!results.empty, "hidden")
                .text("No results found."),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(q: &str, letter: &str) -> HealthQuery {
        HealthQuery {
            q: q.into(),
            letter: letter.into(),
        }
    }

    #[test]
    fn no_filters_shows_everything() {
        let r = filter(TOPICS, &HealthQuery::default());
        assert_eq!(r.topics.len(), TOPICS.len());
        assert!(!r.empty);
    }

    #[test]
    fn query_and_letter_combine() {
        let r = filter(TOPICS, &q("  adhd ", "all"));
        assert_eq!(r.topics.len(), 2);

        let r = filter(TOPICS, &q("encephalitis", "t"));
        assert_eq!(r.topics.iter().map(|t| t.title).collect::<Vec<_>>(), vec!["Tick-borne encephalitis"]);

        let r = filter(TOPICS, &q("adhd", "Z"));
        assert!(r.empty);
    }

    #[test]
    fn render_marks_active_letter_and_empty_state() {
        let query = q("", "h");
        let results = filter(TOPICS, &query);
        let root = render(&query, &results);

        let active: Vec<_> = root
            .find_all_by_class("az-btn")
            .into_iter()
            .filter(|b| b.has_class("active"))
            .map(|b| b.text_content())
            .collect();
        assert_eq!(active, vec!["H"]);
        assert_eq!(root.find_all_by_class("health-item").len(), 2);
        assert!(root.find_by_id("healthEmpty").unwrap().has_class("hidden"));
    }
}
