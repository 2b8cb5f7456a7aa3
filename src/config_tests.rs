// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `config.rs`

#[cfg(test)]
mod tests {
    use super::super::{load_sync_config, parse_sync_config, SyncConfig, ViewConfig, ViewSet};
    use crate::errors::ConfigError;
    use std::io::Write;

    const SAMPLE: &str = r"
managed_only: true
views:
  vpn:
    priority: 0
    networks:
      - 10.1.0.0/16
  aws:
    priority: 2
    url: https://ranges.example.com/aws.txt
  office:
    priority: 1
    networks:
      - 10.2.0.0/16
      - 10.4.0.0/16
";

    #[test]
    fn test_parse_full_document() {
        let config = parse_sync_config(SAMPLE).unwrap();

        assert!(config.managed_only);
        assert_eq!(config.views.len(), 3);

        let office = config.views.get("office").unwrap();
        assert_eq!(office.priority, 1);
        assert_eq!(
            office.networks.as_deref(),
            Some(&["10.2.0.0/16".to_string(), "10.4.0.0/16".to_string()][..])
        );
        assert_eq!(office.url, None);

        let aws = config.views.get("aws").unwrap();
        assert_eq!(aws.url.as_deref(), Some("https://ranges.example.com/aws.txt"));
        assert_eq!(aws.networks, None);
    }

    #[test]
    fn test_document_order_is_preserved() {
        let config = parse_sync_config(SAMPLE).unwrap();
        let names: Vec<_> = config.views.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["vpn", "aws", "office"]);
    }

    #[test]
    fn test_by_priority_sorts_ascending() {
        let config = parse_sync_config(SAMPLE).unwrap();
        let names: Vec<_> = config.views.by_priority().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["vpn", "office", "aws"]);
    }

    #[test]
    fn test_by_priority_ties_keep_document_order() {
        let views: ViewSet = [
            ("zeta", ViewConfig::with_networks(5, ["10.0.0.0/8"])),
            ("alpha", ViewConfig::with_networks(5, ["10.0.0.0/8"])),
            ("first", ViewConfig::with_networks(-1, ["10.0.0.0/8"])),
            ("mid", ViewConfig::with_networks(5, ["10.0.0.0/8"])),
        ]
        .into_iter()
        .collect();

        let names: Vec<_> = views.by_priority().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["first", "zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_null_and_empty_view_entries_are_defaults() {
        let config = parse_sync_config("views:\n  office: ~\n  lab: {}\n").unwrap();

        assert_eq!(config.views.get("office"), Some(&ViewConfig::default()));
        assert_eq!(config.views.get("lab"), Some(&ViewConfig::default()));
        assert!(!config.managed_only);
    }

    #[test]
    fn test_missing_priority_defaults_to_zero() {
        let config = parse_sync_config("views:\n  vpn:\n    networks: [10.0.0.0/8]\n").unwrap();
        assert_eq!(config.views.get("vpn").unwrap().priority, 0);
    }

    #[test]
    fn test_null_fields_are_treated_as_absent() {
        let config = parse_sync_config(
            "managed_only: ~\nviews:\n  vpn:\n    priority: ~\n    networks: ~\n",
        )
        .unwrap();

        assert!(!config.managed_only);
        let vpn = config.views.get("vpn").unwrap();
        assert_eq!(vpn.priority, 0);
        assert_eq!(vpn.networks, None);
    }

    #[test]
    fn test_empty_document_is_empty_config() {
        assert_eq!(parse_sync_config("").unwrap(), SyncConfig::default());
        assert_eq!(parse_sync_config("   \n").unwrap(), SyncConfig::default());
        assert_eq!(parse_sync_config("~\n").unwrap(), SyncConfig::default());
        assert_eq!(parse_sync_config("views: ~\n").unwrap(), SyncConfig::default());
    }

    #[test]
    fn test_invalid_documents_are_rejected() {
        assert!(parse_sync_config("views: [a, b]\n").is_err());
        assert!(parse_sync_config("views:\n  vpn:\n    priority: high\n").is_err());
        assert!(parse_sync_config("managed_only: [\n").is_err());
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut views = ViewSet::default();
        views.insert("a", ViewConfig::with_networks(0, ["10.0.0.0/8"]));
        views.insert("b", ViewConfig::with_networks(0, ["10.1.0.0/16"]));
        views.insert("a", ViewConfig::with_url(3, "https://lists.example.com"));

        let names: Vec<_> = views.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(views.get("a").unwrap().priority, 3);
    }

    #[tokio::test]
    async fn test_load_sync_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = load_sync_config(file.path()).await.unwrap();
        assert_eq!(config.views.len(), 3);
        assert!(config.managed_only);
    }

    #[tokio::test]
    async fn test_load_sync_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("views.yml");

        let err = load_sync_config(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
        assert!(err.to_string().contains("views.yml"));
    }

    #[tokio::test]
    async fn test_load_sync_config_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"views:\n  - not\n  - a mapping\n").unwrap();

        let err = load_sync_config(file.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
