//! Path exclusion for the request-lifecycle hook
//!
//! Static assets, health checks and documentation endpoints generate no
//! interesting telemetry; the lifecycle hook consults a [`PathFilter`]
//! before opening a session. The host owns the rule list; the default set
//! covers the usual static-asset, health and docs endpoints.

/// Substring/suffix rules deciding which request paths skip telemetry
#[derive(Debug, Clone)]
pub struct PathFilter {
    contains: Vec<String>,
    suffixes: Vec<String>,
}

impl Default for PathFilter {
    /// Exclusion list for static assets, health and docs endpoints
    fn default() -> Self {
        Self::empty()
            .skip_containing("/static/")
            .skip_containing("/css/")
            .skip_containing("/js/")
            .skip_containing("/images/")
            .skip_containing("/favicon.ico")
            .skip_containing("/actuator/")
            .skip_containing("/swagger-ui/")
            .skip_containing("/api-docs")
            .skip_suffix("/query-stats/health")
    }
}

impl PathFilter {
    /// A filter that skips nothing
    pub fn empty() -> Self {
        Self {
            contains: Vec::new(),
            suffixes: Vec::new(),
        }
    }

    /// Skip any path containing `fragment`
    pub fn skip_containing(mut self, fragment: &str) -> Self {
        self.contains.push(fragment.to_string());
        self
    }

    /// Skip any path ending with `suffix`
    pub fn skip_suffix(mut self, suffix: &str) -> Self {
        self.suffixes.push(suffix.to_string());
        self
    }

    /// True when `path` should not get a telemetry session
    pub fn should_skip(&self, path: &str) -> bool {
        self.contains.iter().any(|fragment| path.contains(fragment))
            || self.suffixes.iter().any(|suffix| path.ends_with(suffix))
    }
}
