mod common;

use common::{CountingFetcher, fixture_source};
use mediaref_core::AssetMetadata;
use mediaref_error::{AssetErrorKind, MediaErrorKind, SampleErrorKind, UriErrorKind};
use mediaref_interface::InMemoryMetadataSource;
use mediaref_resolver::{Resolver, ResolverConfig};
use std::sync::Arc;

fn keys(assets: &[Arc<mediaref_core::Asset>]) -> Vec<&str> {
    assets.iter().map(|a| a.key().as_str()).collect()
}

#[tokio::test]
async fn cover_is_discovered_after_its_video() {
    let resolver = Resolver::new(fixture_source().await);
    let assets = resolver
        .resolve("uuid:c64047d2-983d-4009-a35f-02c95534cb53")
        .await
        .unwrap();

    assert_eq!(
        keys(&assets),
        vec![
            "uuid:c64047d2-983d-4009-a35f-02c95534cb53",
            "uuid:e14ad479-3c2a-497a-a5f3-c30ea7dcb8b9",
        ]
    );
}

#[tokio::test]
async fn links_are_followed_depth_first() {
    let resolver = Resolver::new(fixture_source().await);
    let assets = resolver.resolve("ref:PR_Mussorgski_Modest").await.unwrap();

    assert_eq!(
        keys(&assets),
        vec![
            "ref:PR_Mussorgski_Modest",
            "ref:Ausstellung-Ueberblick_HB_00_Orch_Promenade-I",
            "ref:Ausstellung-Ueberblick_HB_Ausstellung_Cover",
        ]
    );
}

#[tokio::test]
async fn complete_sample_takes_asset_start_time() {
    let resolver = Resolver::new(fixture_source().await);
    let sample = resolver
        .resolve_sample("ref:Fuge-Opfer_HB_Ricercar-a-3#complete")
        .await
        .unwrap();

    assert_eq!(*sample.start_time_sec(), 1.0);
    assert_eq!(sample.title_safe(), "Ricercar a 3");
    assert_eq!(sample.artist_safe().as_deref(), Some("Johann Sebastian Bach"));

    let without_fragment = resolver
        .resolve_sample("ref:Fuge-Opfer_HB_Ricercar-a-3")
        .await
        .unwrap();
    assert!(Arc::ptr_eq(&sample, &without_fragment));
}

#[tokio::test]
async fn repeated_resolution_is_idempotent() {
    let fetcher = CountingFetcher::new().await;
    let resolver = Resolver::new(fetcher.clone());

    let first = resolver.resolve_asset("ref:PR_Mussorgski_Modest").await.unwrap();
    let fetched = fetcher.fetch_count();
    let second = resolver.resolve_asset("ref:PR_Mussorgski_Modest#x").await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(fetcher.fetch_count(), fetched);
    assert_eq!(resolver.asset_count().await, 3);
}

#[tokio::test]
async fn ref_and_uuid_share_one_asset() {
    let fetcher = CountingFetcher::new().await;
    let resolver = Resolver::new(fetcher.clone());

    let by_ref = resolver.resolve_asset("ref:Fuge-Opfer_HB_Ricercar-a-3").await.unwrap();
    let by_uuid = resolver
        .resolve_asset("uuid:2b1c0d9e-8f7a-4b6c-5d4e-3f2a1b0c9d8e")
        .await
        .unwrap();

    assert!(Arc::ptr_eq(&by_ref, &by_uuid));
    assert_eq!(fetcher.fetch_count(), 1);
    assert_eq!(resolver.export_assets().await.len(), 1);
}

#[tokio::test]
async fn cycles_terminate_with_each_asset_once() {
    let fetcher = CountingFetcher::new().await;
    let resolver = Resolver::new(fetcher.clone());
    let assets = resolver.resolve("ref:Cycle_A").await.unwrap();

    assert_eq!(keys(&assets), vec!["ref:Cycle_A", "ref:Cycle_B"]);
    assert_eq!(fetcher.fetches_of("ref:Cycle_A"), 1);
    assert_eq!(fetcher.fetches_of("ref:Cycle_B"), 1);
}

#[tokio::test]
async fn not_found_keeps_earlier_discoveries() {
    let resolver = Resolver::new(fixture_source().await);
    resolver
        .resolve_asset("ref:Fuge-Opfer_HB_Ricercar-a-3")
        .await
        .unwrap();

    let err = resolver.resolve_asset("ref:Nobody_Knows").await.unwrap_err();
    match err.kind() {
        MediaErrorKind::Asset(e) => assert!(matches!(e.kind, AssetErrorKind::NotFound(_))),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(resolver.asset_count().await, 1);
    assert!(resolver.get_asset("ref:Nobody_Knows").await.is_none());
}

#[tokio::test]
async fn missing_link_fails_after_registering_the_parent() {
    let resolver = Resolver::new(fixture_source().await);
    let err = resolver
        .resolve_asset("ref:Dangling_Cover_Video")
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), MediaErrorKind::Asset(_)));
    assert!(resolver.get_asset("ref:Dangling_Cover_Video").await.is_some());
    assert_eq!(resolver.asset_count().await, 1);
}

#[tokio::test]
async fn invalid_uri_is_rejected_before_fetching() {
    let fetcher = CountingFetcher::new().await;
    let resolver = Resolver::new(fetcher.clone());

    for raw in ["Fuge", "ftp:Fuge", "ref:", "ref:Fuge#"] {
        let err = resolver.resolve_asset(raw).await.unwrap_err();
        match err.kind() {
            MediaErrorKind::Uri(e) => assert!(matches!(e.kind, UriErrorKind::InvalidUri { .. })),
            other => panic!("unexpected error for {raw}: {other}"),
        }
        assert!(resolver.get_asset(raw).await.is_none());
    }
    assert_eq!(fetcher.fetch_count(), 0);
}

#[tokio::test]
async fn contradictory_sample_rejects_the_asset() {
    let resolver = Resolver::new(fixture_source().await);
    let err = resolver.resolve_asset("ref:Broken_Sample").await.unwrap_err();

    match err.kind() {
        MediaErrorKind::Sample(e) => {
            assert!(matches!(e.kind, SampleErrorKind::InvalidSampleSpec { .. }))
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(resolver.asset_count().await, 0);
    assert_eq!(resolver.sample_count().await, 0);
}

#[tokio::test]
async fn samples_export_in_discovery_then_declaration_order() {
    let resolver = Resolver::new(fixture_source().await);
    resolver.resolve("ref:PR_Mussorgski_Modest").await.unwrap();

    let samples = resolver.export_samples().await;
    let keys: Vec<&str> = samples.iter().map(|s| s.key().as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "ref:PR_Mussorgski_Modest#complete",
            "ref:Ausstellung-Ueberblick_HB_00_Orch_Promenade-I#complete",
            "ref:Ausstellung-Ueberblick_HB_00_Orch_Promenade-I#thema",
            "ref:Ausstellung-Ueberblick_HB_00_Orch_Promenade-I#wiederholung",
            "ref:Ausstellung-Ueberblick_HB_Ausstellung_Cover#complete",
        ]
    );
    assert_eq!(*samples[2].duration_sec(), Some(21.0));
    assert_eq!(*samples[3].end_time_sec(), Some(40.5));
    assert_eq!(samples[2].title_safe(), "Thema (Promenade I)");
    assert_eq!(
        samples[2].artist_safe().as_deref(),
        Some("Modest Mussorgski (Berliner Philharmoniker)")
    );
}

#[tokio::test]
async fn unknown_fragment_mints_a_registered_sample() {
    let resolver = Resolver::new(fixture_source().await);
    let before = {
        resolver
            .resolve_asset("ref:Fuge-Opfer_HB_Ricercar-a-3")
            .await
            .unwrap();
        resolver.sample_count().await
    };

    let minted = resolver
        .resolve_sample("ref:Fuge-Opfer_HB_Ricercar-a-3#coda")
        .await
        .unwrap();
    let again = resolver
        .resolve_sample("uuid:2b1c0d9e-8f7a-4b6c-5d4e-3f2a1b0c9d8e#coda")
        .await
        .unwrap();

    assert!(Arc::ptr_eq(&minted, &again));
    assert!(!*minted.declared());
    assert_eq!(resolver.sample_count().await, before + 1);
    assert!(
        resolver
            .get_sample("ref:Fuge-Opfer_HB_Ricercar-a-3#coda")
            .await
            .is_some()
    );
}

#[tokio::test]
async fn minting_can_be_disabled() {
    let config = ResolverConfig::default().with_mint_unknown_samples(false);
    let resolver = Resolver::with_config(fixture_source().await, config);

    let err = resolver
        .resolve_sample("ref:Fuge-Opfer_HB_Ricercar-a-3#coda")
        .await
        .unwrap_err();
    match err.kind() {
        MediaErrorKind::Sample(e) => {
            assert!(matches!(e.kind, SampleErrorKind::UndeclaredSample(_)))
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn link_depth_limit_skips_deeper_links() {
    let config = ResolverConfig::default().with_max_link_depth(1);
    let resolver = Resolver::with_config(fixture_source().await, config);
    let assets = resolver.resolve("ref:PR_Mussorgski_Modest").await.unwrap();

    assert_eq!(
        keys(&assets),
        vec![
            "ref:PR_Mussorgski_Modest",
            "ref:Ausstellung-Ueberblick_HB_00_Orch_Promenade-I",
        ]
    );
}

#[tokio::test]
async fn links_can_be_ignored() {
    let config = ResolverConfig::default().with_follow_links(false);
    let resolver = Resolver::with_config(fixture_source().await, config);
    let assets = resolver
        .resolve("uuid:c64047d2-983d-4009-a35f-02c95534cb53")
        .await
        .unwrap();
    assert_eq!(assets.len(), 1);
}

#[tokio::test]
async fn configured_fades_apply_to_samples() {
    let config = ResolverConfig::default()
        .with_default_fade_in_sec(0.0)
        .with_default_fade_out_sec(2.0);
    let resolver = Resolver::with_config(fixture_source().await, config);
    let sample = resolver
        .resolve_sample("ref:Fuge-Opfer_HB_Ricercar-a-3")
        .await
        .unwrap();

    assert_eq!(*sample.fade_in_sec(), 0.0);
    assert_eq!(*sample.fade_out_sec(), 2.0);
}

#[tokio::test]
async fn reset_clears_everything() {
    let fetcher = CountingFetcher::new().await;
    let resolver = Resolver::new(fetcher.clone());
    let before = resolver
        .resolve_asset("ref:Fuge-Opfer_HB_Ricercar-a-3")
        .await
        .unwrap();

    resolver.reset().await;
    assert_eq!(resolver.asset_count().await, 0);
    assert_eq!(resolver.sample_count().await, 0);
    assert!(resolver.export_assets().await.is_empty());
    assert!(resolver.get_asset("ref:Fuge-Opfer_HB_Ricercar-a-3").await.is_none());
    assert_eq!(resolver.generation().await, 1);

    let after = resolver
        .resolve_asset("ref:Fuge-Opfer_HB_Ricercar-a-3")
        .await
        .unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(fetcher.fetch_count(), 2);
}

#[tokio::test]
async fn multi_part_document() {
    let resolver = Resolver::new(fixture_source().await);
    let asset = resolver.resolve_asset("ref:Noten_Partitur#2-3").await.unwrap();

    assert!(asset.is_multi_part());
    let selection = mediaref_core::MediaUri::parse("ref:Noten_Partitur#2-3")
        .unwrap()
        .part_selection();
    assert_eq!(
        asset.multi_part_http_urls(selection.as_ref()),
        vec![
            "http://localhost/media/Noten_Partitur_no02.pdf",
            "http://localhost/media/Noten_Partitur_no03.pdf",
        ]
    );
}

#[tokio::test]
async fn malformed_cover_is_an_invalid_uri() {
    let source = InMemoryMetadataSource::from_json_str(
        r#"[{"ref": "Clip", "kind": "video", "cover": "ref:Bad Cover/x"}]"#,
    )
    .await
    .unwrap();
    let resolver = Resolver::new(source);

    let err = resolver.resolve("ref:Clip").await.unwrap_err();
    match err.kind() {
        MediaErrorKind::Uri(e) => assert!(matches!(e.kind, UriErrorKind::InvalidUri { .. })),
        other => panic!("unexpected error: {other}"),
    }
    assert!(resolver.get_asset("ref:Clip").await.is_none());
    assert_eq!(resolver.asset_count().await, 0);
}

#[tokio::test]
async fn malformed_cover_is_ignored_when_links_are_off() {
    let source = InMemoryMetadataSource::from_json_str(
        r#"[{"ref": "Clip", "kind": "video", "cover": "ref:Bad Cover/x"}]"#,
    )
    .await
    .unwrap();
    let config = ResolverConfig::default().with_follow_links(false);
    let resolver = Resolver::with_config(source, config);

    assert_eq!(resolver.resolve("ref:Clip").await.unwrap().len(), 1);
}

#[tokio::test]
async fn later_identity_becomes_an_alias_of_the_cached_asset() {
    let source = InMemoryMetadataSource::new();
    source
        .insert(AssetMetadata::builder().reference("Song").kind("audio").build().unwrap())
        .await
        .unwrap();
    let fetcher = CountingFetcher::over(source.clone());
    let resolver = Resolver::new(fetcher.clone());
    let by_ref = resolver.resolve_asset("ref:Song").await.unwrap();

    source
        .insert(
            AssetMetadata::builder()
                .reference("Song")
                .uuid("0001")
                .kind("audio")
                .build()
                .unwrap(),
        )
        .await
        .unwrap();
    let by_uuid = resolver.resolve_asset("uuid:0001").await.unwrap();
    assert!(Arc::ptr_eq(&by_ref, &by_uuid));

    let again = resolver.resolve_asset("uuid:0001").await.unwrap();
    assert!(Arc::ptr_eq(&by_ref, &again));
    assert_eq!(fetcher.fetches_of("uuid:0001"), 1);
    let cached = resolver.get_asset("uuid:0001").await.unwrap();
    assert!(Arc::ptr_eq(&by_ref, &cached));
    assert_eq!(resolver.asset_count().await, 1);
}

#[tokio::test]
async fn part_selection_is_not_minted_as_a_sample() {
    let resolver = Resolver::new(fixture_source().await);
    let before = {
        resolver.resolve_asset("ref:Noten_Partitur").await.unwrap();
        resolver.sample_count().await
    };

    let err = resolver
        .resolve_sample("ref:Noten_Partitur#2-3")
        .await
        .unwrap_err();
    match err.kind() {
        MediaErrorKind::Sample(e) => {
            assert!(matches!(e.kind, SampleErrorKind::InvalidSampleSpec { .. }))
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(resolver.sample_count().await, before);
    assert!(resolver.get_sample("ref:Noten_Partitur#2-3").await.is_none());
}
