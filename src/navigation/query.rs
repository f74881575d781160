//! Query parameters carried to error pages.

use url::form_urlencoded;

/// Context handed to an error page: `from`, `path`, `message`, `traceId`.
/// Absent or empty values are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorQuery {
    /// Where the user was (referer).
    pub from: Option<String>,
    /// Path of the request that failed.
    pub path: Option<String>,
    pub message: Option<String>,
    pub trace_id: Option<String>,
}

impl ErrorQuery {
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        let pairs = [
            ("from", &self.from),
            ("path", &self.path),
            ("message", &self.message),
            ("traceId", &self.trace_id),
        ];
        for (key, value) in pairs {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }

    /// `route` with this query appended, e.g. `/exception/403?path=%2Fusers`.
    pub fn href(&self, route: &str) -> String {
        let query = self.to_query_string();
        if query.is_empty() {
            route.to_string()
        } else {
            format!("{}?{}", route, query)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_query() {
        let query = ErrorQuery {
            from: Some("/dashboard".into()),
            path: Some("/sys/users?page=1".into()),
            message: Some("No access".into()),
            trace_id: Some("abc123".into()),
        };
        assert_eq!(
            query.href("/exception/403"),
            "/exception/403?from=%2Fdashboard&path=%2Fsys%2Fusers%3Fpage%3D1&message=No+access&traceId=abc123"
        );
    }

    #[test]
    fn test_missing_values_are_omitted() {
        let query = ErrorQuery {
            from: None,
            path: Some("/x".into()),
            message: Some(String::new()),
            trace_id: None,
        };
        assert_eq!(query.href("/exception/500"), "/exception/500?path=%2Fx");
        assert_eq!(ErrorQuery::default().href("/exception/500"), "/exception/500");
    }
}
