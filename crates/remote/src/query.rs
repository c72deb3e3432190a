use std::fmt;

use serde::Serialize;

/// Query-string form of one read against the table endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    pub inline_count: bool,
}

impl TableQuery {
    /// `$`-prefixed query pairs in the order the service documents them.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(filter) = &self.filter {
            pairs.push(("$filter", filter.clone()));
        }
        if let Some(order_by) = &self.order_by {
            pairs.push(("$orderby", order_by.clone()));
        }
        if let Some(top) = self.top {
            pairs.push(("$top", top.to_string()));
        }
        if let Some(skip) = self.skip {
            pairs.push(("$skip", skip.to_string()));
        }
        if self.inline_count {
            pairs.push(("$inlinecount", "allpages".to_string()));
        }
        pairs
    }
}

impl fmt::Display for TableQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs = self.pairs();
        if pairs.is_empty() {
            return f.write_str("(no parameters)");
        }
        let rendered: Vec<String> = pairs.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        f.write_str(&rendered.join("&"))
    }
}
