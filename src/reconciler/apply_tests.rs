// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `apply.rs`

#[cfg(test)]
mod tests {
    use super::super::{apply_plan, drop_view, format_counts, PassSummary};
    use crate::reconciler::plan::Action;
    use crate::reconciler::testing::FakeViewApi;
    use std::collections::BTreeMap;

    fn set(network: &str, view: &str) -> Action {
        Action::SetNetwork {
            network: network.to_string(),
            view: view.to_string(),
            previous: None,
        }
    }

    #[tokio::test]
    async fn test_apply_issues_calls_in_plan_order() {
        let api = FakeViewApi::new().with_view("legacy");
        let actions = vec![
            Action::CreateView {
                view: "office".to_string(),
            },
            set("10.2.0.0/16", "office"),
            Action::ResetNetwork {
                network: "10.3.0.0/16".to_string(),
                previous: "legacy".to_string(),
            },
            Action::DeleteView {
                view: "legacy".to_string(),
            },
        ];

        let summary = apply_plan(&api, &actions).await;

        assert_eq!(
            api.mutations(),
            vec![
                "create_view office",
                "set_network 10.2.0.0/16 office",
                "set_network 10.3.0.0/16 default",
                "delete_view legacy",
            ]
        );
        assert_eq!(summary.created_views, vec!["office"]);
        assert_eq!(summary.updates.get("office"), Some(&1));
        assert_eq!(summary.cleanups.get("legacy"), Some(&1));
        assert_eq!(summary.deleted_views, vec!["legacy"]);
        assert_eq!(summary.failures, 0);
        assert_eq!(summary.mutations(), 4);
    }

    #[tokio::test]
    async fn test_failed_call_does_not_stop_the_rest() {
        let api = FakeViewApi::new().failing("set_network 10.1.0.0/16 vpn");
        let actions = vec![
            set("10.1.0.0/16", "vpn"),
            set("10.2.0.0/16", "vpn"),
            set("10.3.0.0/16", "office"),
        ];

        let summary = apply_plan(&api, &actions).await;

        assert_eq!(api.mutations().len(), 3);
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.updates.get("vpn"), Some(&2));
        assert!(!api.networks().contains_key("10.1.0.0/16"));
        assert_eq!(api.networks().get("10.3.0.0/16").map(String::as_str), Some("office"));
    }

    #[tokio::test]
    async fn test_failed_view_changes_not_reported_as_done() {
        let api = FakeViewApi::new()
            .with_zones("legacy", &["a..legacy"])
            .failing("create_view office")
            .failing("delete_view legacy");
        let actions = vec![
            Action::CreateView {
                view: "office".to_string(),
            },
            Action::DeleteView {
                view: "legacy".to_string(),
            },
        ];

        let summary = apply_plan(&api, &actions).await;

        assert!(summary.created_views.is_empty());
        assert!(summary.deleted_views.is_empty());
        assert_eq!(summary.failures, 2);
        assert_eq!(summary.mutations(), 2);
        assert_eq!(api.views(), vec!["legacy"]);
    }

    #[tokio::test]
    async fn test_drop_view_detaches_and_deletes_zones_first() {
        let api = FakeViewApi::new().with_zones("legacy", &["..legacy", "example.com..legacy"]);

        let failures = drop_view(&api, "legacy").await;

        assert_eq!(failures, 0);
        assert_eq!(
            api.calls(),
            vec![
                "view_zones legacy",
                "detach_zone legacy ..legacy",
                "delete_zone ..legacy",
                "detach_zone legacy example.com..legacy",
                "delete_zone example.com..legacy",
                "delete_view legacy",
            ]
        );
        assert!(api.views().is_empty());
    }

    #[tokio::test]
    async fn test_drop_missing_view_is_noop() {
        let api = FakeViewApi::new();

        assert_eq!(drop_view(&api, "ghost").await, 0);
        assert!(api.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_drop_view_continues_after_zone_failure() {
        let api = FakeViewApi::new()
            .with_zones("legacy", &["a..legacy", "b..legacy"])
            .failing("delete_zone a..legacy");

        let failures = drop_view(&api, "legacy").await;

        assert_eq!(failures, 1);
        assert!(api.calls().contains(&"delete_zone b..legacy".to_string()));
        assert!(api.calls().contains(&"delete_view legacy".to_string()));
    }

    #[tokio::test]
    async fn test_drop_view_zone_listing_failure() {
        let api = FakeViewApi::new()
            .with_view("legacy")
            .failing("view_zones legacy");

        assert_eq!(drop_view(&api, "legacy").await, 1);
        assert!(api.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_empty_plan_is_empty_summary() {
        let api = FakeViewApi::new();
        assert_eq!(apply_plan(&api, &[]).await, PassSummary::default());
        assert!(api.calls().is_empty());
    }

    #[test]
    fn test_format_counts_sorted_by_view() {
        let mut counts = BTreeMap::new();
        counts.insert("vpn".to_string(), 2);
        counts.insert("office".to_string(), 1);
        assert_eq!(format_counts(&counts), "office: 1, vpn: 2");
        assert_eq!(format_counts(&BTreeMap::new()), "");
    }

    #[test]
    fn test_format_counts_single_view_has_no_separator() {
        let counts = BTreeMap::from([("vpn".to_string(), 3)]);
        assert_eq!(format_counts(&counts), "vpn: 3");
    }
}
