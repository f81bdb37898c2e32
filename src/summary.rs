//! Short display tags derived from a context response.

use serde_json::Value;

/// Build summary tags from a v2 context body.
///
/// Tags are appended in a fixed order (organization, country, services, risks)
/// and any field that is missing, empty or of an unexpected shape is skipped.
pub fn summary_tags(body: &Value) -> Vec<String> {
    let mut tags = Vec::new();

    if let Some(org) = scalar(body.pointer("/as/organization")) {
        tags.push(format!("Org: {}", org));
    }

    if let Some(country) = scalar(body.pointer("/location/country")) {
        tags.push(format!("Country: {}", country));
    }

    if let Some(services) = joined_lowercase(body.get("services")) {
        tags.push(services);
    }

    if let Some(risks) = joined_lowercase(body.get("risks")) {
        tags.push(risks);
    }

    tags
}

fn scalar(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn joined_lowercase(value: Option<&Value>) -> Option<String> {
    let items: Vec<String> = value?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_lowercase)
        .collect();

    if items.is_empty() {
        None
    } else {
        Some(items.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_body() {
        let body = json!({
            "as": {"organization": "Acme"},
            "location": {"country": "US"},
            "services": ["PROXY"],
            "risks": ["TOR"]
        });
        assert_eq!(summary_tags(&body), vec!["Org: Acme", "Country: US", "proxy", "tor"]);
    }

    #[test]
    fn test_lists_are_joined() {
        let body = json!({
            "services": ["OPENVPN", "IPSEC"],
            "risks": ["CALLBACK_PROXY", "Tunnel"]
        });
        assert_eq!(
            summary_tags(&body),
            vec!["openvpn, ipsec", "callback_proxy, tunnel"]
        );
    }

    #[test]
    fn test_missing_fields_are_omitted() {
        let body = json!({
            "as": {"number": 64496},
            "location": {"country": "DE", "city": "Berlin"},
            "services": [],
        });
        assert_eq!(summary_tags(&body), vec!["Country: DE"]);
    }

    #[test]
    fn test_unexpected_shapes_are_tolerated() {
        let body = json!({
            "as": "Acme",
            "location": null,
            "services": "PROXY",
            "risks": [1, {"name": "TOR"}]
        });
        assert!(summary_tags(&body).is_empty());
        assert!(summary_tags(&json!([])).is_empty());
        assert!(summary_tags(&json!("text")).is_empty());
    }

    #[test]
    fn test_empty_organization_is_omitted() {
        let body = json!({"as": {"organization": ""}, "location": {"country": "FR"}});
        assert_eq!(summary_tags(&body), vec!["Country: FR"]);
    }
}
