//! Robots.txt rules
//!
//! Admission checks go through the robotstxt crate's matcher. Crawl-delay is
//! not covered by the matcher, so it is read directly from the file's groups.

use robotstxt::DefaultMatcher;
use std::time::Duration;

/// Robots.txt rules for the configured crawler name
#[derive(Debug, Clone)]
pub struct RobotsRules {
    /// Raw robots.txt content (empty string means allow all)
    content: String,
    agent: String,
}

impl RobotsRules {
    /// Creates rules from raw robots.txt content
    pub fn from_content(content: &str, agent: &str) -> Self {
        Self {
            content: content.to_string(),
            agent: agent.to_string(),
        }
    }

    /// Creates permissive rules, used when robots.txt is absent or ignored
    pub fn allow_all(agent: &str) -> Self {
        Self::from_content("", agent)
    }

    /// Checks if an absolute URL may be fetched
    pub fn is_allowed(&self, url: &str) -> bool {
        if self.content.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, &self.agent, url)
    }

    /// Crawl-delay for this agent, falling back to the wildcard group
    ///
    /// A group starts at the first `User-agent` line following any other
    /// directive, so consecutive `User-agent` lines share one group.
    pub fn crawl_delay(&self) -> Option<Duration> {
        let agent = self.agent.to_lowercase();

        let mut group: Vec<String> = Vec::new();
        let mut in_agent_lines = false;
        let mut for_agent: Option<f64> = None;
        let mut for_wildcard: Option<f64> = None;

        for line in self.content.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            if key == "user-agent" {
                if !in_agent_lines {
                    group.clear();
                }
                group.push(value.to_lowercase());
                in_agent_lines = true;
                continue;
            }
            in_agent_lines = false;

            if key != "crawl-delay" {
                continue;
            }
            let Ok(delay) = value.parse::<f64>() else {
                continue;
            };
            if delay < 0.0 || !delay.is_finite() {
                continue;
            }

            if group.iter().any(|ua| ua != "*" && agent.contains(ua.as_str())) {
                for_agent.get_or_insert(delay);
            } else if group.iter().any(|ua| ua == "*") {
                for_wildcard.get_or_insert(delay);
            }
        }

        // Values too large for a Duration are ignored
        for_agent
            .or(for_wildcard)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }
}
