//! robots.txt rules for the statutes host.

use robotstxt::DefaultMatcher;

/// Parsed robots.txt data
///
/// Allow/disallow matching is delegated to the `robotstxt` crate; the
/// `Crawl-delay` extension is read here since that crate ignores it.
#[derive(Debug, Clone, Default)]
pub struct ParsedRobots {
    /// Raw robots.txt content; `None` allows everything
    content: Option<String>,
}

/// One `User-agent` group and the crawl delay declared in it
struct AgentGroup {
    agents: Vec<String>,
    crawl_delay: Option<f64>,
}

impl ParsedRobots {
    /// Wraps raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: Some(content.to_string()),
        }
    }

    /// Rules that allow everything, used when robots.txt is absent or unreachable
    pub fn allow_all() -> Self {
        Self { content: None }
    }

    /// Checks whether `url` may be fetched by `user_agent`
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        match self.content.as_deref() {
            None | Some("") => true,
            Some(content) => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(content, user_agent, url)
            }
        }
    }

    /// The `Crawl-delay` (seconds) that applies to `user_agent`
    ///
    /// A group naming the agent wins over the `*` group.
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        let groups = parse_groups(self.content.as_deref()?);
        let agent = user_agent.to_lowercase();

        let specific = groups.iter().find(|group| {
            group
                .agents
                .iter()
                .any(|name| name != "*" && agent.contains(name.as_str()))
        });
        let wildcard = groups
            .iter()
            .find(|group| group.agents.iter().any(|name| name == "*"));

        specific
            .and_then(|group| group.crawl_delay)
            .or_else(|| wildcard.and_then(|group| group.crawl_delay))
    }
}

fn parse_groups(content: &str) -> Vec<AgentGroup> {
    let mut groups: Vec<AgentGroup> = Vec::new();
    let mut in_agent_lines = false;

    for line in content.lines() {
        let line = line.split('#').next().unwrap_or("").trim();
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = value.trim();

        if key == "user-agent" {
            if !in_agent_lines {
                groups.push(AgentGroup {
                    agents: Vec::new(),
                    crawl_delay: None,
                });
            }
            in_agent_lines = true;
            if let Some(group) = groups.last_mut() {
                group.agents.push(value.to_lowercase());
            }
            continue;
        }

        in_agent_lines = false;
        if key == "crawl-delay" {
            if let (Some(group), Ok(delay)) = (groups.last_mut(), value.parse::<f64>()) {
                group.crawl_delay = Some(delay);
            }
        }
    }

    groups
}
