//! REST bindings of methods and the placement of request fields.
//!
//! Applying a mapping annotates the fields of a (shared) request message with
//! where they travel: URL path, query string or body.

use crate::definitions::RestMappingDef;
use crate::registry::{Message, RestPlacement};
use log::debug;
use std::collections::HashSet;

/// HTTP binding of a method: verb, URL template and body selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestMapping {
    /// HTTP verb as declared, e.g. `GET` or `post`
    pub method: String,
    /// URL template, e.g. `/v1/channels/{chan_point.funding_txid_str}`
    pub path: String,
    /// `*` for the whole message, a field name, or empty for no body
    pub body: String,
}

impl RestMapping {
    pub fn new(def: &RestMappingDef) -> Self {
        Self {
            method: def.method.clone(),
            path: def.path.clone(),
            body: def.body.clone(),
        }
    }

    /// A mapping with an empty path is treated as no mapping at all.
    pub fn is_present(mapping: Option<&RestMapping>) -> bool {
        matches!(mapping, Some(m) if !m.path.is_empty())
    }

    /// Names of the top-level request fields bound by path placeholders.
    ///
    /// `{chan_point.funding_txid_str}` binds `chan_point`, and
    /// `{name=projects/*}` binds `name`.
    pub fn path_params(&self) -> HashSet<String> {
        let mut params = HashSet::new();
        let mut rest = self.path.as_str();

        while let Some(start) = rest.find('{') {
            let after = &rest[start + 1..];
            let Some(end) = after.find('}') else {
                break;
            };
            let placeholder = &after[..end];
            let field = placeholder
                .split(['=', '.'])
                .next()
                .unwrap_or(placeholder)
                .trim();
            if !field.is_empty() {
                params.insert(field.to_string());
            }
            rest = &after[end + 1..];
        }

        params
    }

    /// Annotates every field of `message` with its transport placement.
    ///
    /// Placement is recomputed from scratch for every field, so applying the
    /// same mapping twice leaves the message unchanged.
    pub fn apply_to(&self, message: &mut Message) {
        debug!(
            "Applying REST mapping {} {} to {}",
            self.method, self.path, message.full_name
        );
        let path_params = self.path_params();

        for field in &mut message.fields {
            field.rest_placement = self.placement_of(&field.name, &path_params);
        }
    }

    /// Resets every field of `message` to the default placement.
    ///
    /// Used for methods without a mapping, so a message shared with a mapped
    /// method does not keep that method's annotations.
    pub fn clear(message: &mut Message) {
        for field in &mut message.fields {
            field.rest_placement = RestPlacement::default();
        }
    }

    fn placement_of(&self, field_name: &str, path_params: &HashSet<String>) -> RestPlacement {
        if path_params.contains(field_name) {
            return RestPlacement::Path;
        }
        if self.body == "*" || self.body == field_name {
            return RestPlacement::Body;
        }
        // A named body claims only that field; the rest go in the query
        // string, as they do for verbs that carry no body.
        let bodyless_verb =
            self.method.eq_ignore_ascii_case("GET") || self.method.eq_ignore_ascii_case("DELETE");
        if !self.body.is_empty() || bodyless_verb {
            return RestPlacement::Query;
        }
        RestPlacement::Body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Field;
    use pretty_assertions::assert_eq;

    fn mapping(method: &str, path: &str, body: &str) -> RestMapping {
        RestMapping::new(&RestMappingDef {
            method: method.to_string(),
            path: path.to_string(),
            body: body.to_string(),
        })
    }

    fn message(field_names: &[&str]) -> Message {
        Message {
            name: "CloseChannelRequest".to_string(),
            full_name: "lnrpc.CloseChannelRequest".to_string(),
            description: String::new(),
            source: String::new(),
            fields: field_names
                .iter()
                .map(|name| Field {
                    name: name.to_string(),
                    description: String::new(),
                    label: String::new(),
                    type_name: "string".to_string(),
                    full_type: "string".to_string(),
                    rest_placement: RestPlacement::default(),
                })
                .collect(),
        }
    }

    fn placements(message: &Message) -> Vec<(String, RestPlacement)> {
        message
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.rest_placement))
            .collect()
    }

    #[test]
    fn test_path_params() {
        let m = mapping(
            "delete",
            "/v1/channels/{chan_point.funding_txid_str}/{chan_point.output_index}",
            "",
        );
        let params = m.path_params();

        assert_eq!(params.len(), 1);
        assert!(params.contains("chan_point"));
    }

    #[test]
    fn test_verb_kept_as_declared_and_matched_case_insensitively() {
        let m = mapping("delete", "/v1/channels/{chan_point.funding_txid_str}", "");
        assert_eq!(m.method, "delete");

        let mut msg = message(&["chan_point", "force"]);
        m.apply_to(&mut msg);
        assert_eq!(msg.fields[1].rest_placement, RestPlacement::Query);
    }

    #[test]
    fn test_path_params_with_pattern() {
        let m = mapping("GET", "/v1/{name=invoices/*}/{id}", "");
        let params = m.path_params();

        assert!(params.contains("name"));
        assert!(params.contains("id"));
    }

    #[test]
    fn test_delete_places_non_path_fields_in_query() {
        let mut msg = message(&["chan_point", "force", "sat_per_vbyte"]);
        mapping("DELETE", "/v1/channels/{chan_point.funding_txid_str}", "").apply_to(&mut msg);

        assert_eq!(
            placements(&msg),
            vec![
                ("chan_point".to_string(), RestPlacement::Path),
                ("force".to_string(), RestPlacement::Query),
                ("sat_per_vbyte".to_string(), RestPlacement::Query),
            ]
        );
    }

    #[test]
    fn test_post_with_wildcard_body() {
        let mut msg = message(&["node_pubkey", "local_funding_amount"]);
        mapping("POST", "/v1/channels", "*").apply_to(&mut msg);

        assert!(msg
            .fields
            .iter()
            .all(|f| f.rest_placement == RestPlacement::Body));
    }

    #[test]
    fn test_named_body_field() {
        let mut msg = message(&["id", "invoice", "dry_run"]);
        mapping("PUT", "/v1/invoices/{id}", "invoice").apply_to(&mut msg);

        assert_eq!(
            placements(&msg),
            vec![
                ("id".to_string(), RestPlacement::Path),
                ("invoice".to_string(), RestPlacement::Body),
                ("dry_run".to_string(), RestPlacement::Query),
            ]
        );
    }

    #[test]
    fn test_unmatched_fields_default_to_body() {
        let mut msg = message(&["payment_request"]);
        mapping("POST", "/v1/payreq", "").apply_to(&mut msg);

        assert_eq!(msg.fields[0].rest_placement, RestPlacement::Body);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let m = mapping("GET", "/v1/graph/node/{pub_key}", "");
        let mut once = message(&["pub_key", "include_channels"]);
        m.apply_to(&mut once);

        let mut twice = once.clone();
        m.apply_to(&mut twice);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_reapplying_other_mapping_overwrites() {
        let mut msg = message(&["pub_key", "include_channels"]);
        mapping("GET", "/v1/graph/node/{pub_key}", "").apply_to(&mut msg);
        mapping("POST", "/v1/graph/node", "*").apply_to(&mut msg);

        assert!(msg
            .fields
            .iter()
            .all(|f| f.rest_placement == RestPlacement::Body));
    }

    #[test]
    fn test_clear_resets_placements() {
        let mut msg = message(&["pub_key", "include_channels"]);
        mapping("GET", "/v1/graph/node/{pub_key}", "").apply_to(&mut msg);

        RestMapping::clear(&mut msg);

        assert!(msg
            .fields
            .iter()
            .all(|f| f.rest_placement == RestPlacement::Body));
    }

    #[test]
    fn test_is_present() {
        assert!(!RestMapping::is_present(None));
        assert!(!RestMapping::is_present(Some(&mapping("GET", "", ""))));
        assert!(RestMapping::is_present(Some(&mapping("GET", "/v1/getinfo", ""))));
    }
}
