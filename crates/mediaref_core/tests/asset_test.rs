use mediaref_core::{Asset, AssetMetadata, MediaKind, MediaUri, PartSelection};
use mediaref_error::{AssetErrorKind, MediaErrorKind};

fn uri(raw: &str) -> MediaUri {
    MediaUri::parse(raw).unwrap()
}

fn asset_error(result: Result<Asset, mediaref_error::MediaError>) -> AssetErrorKind {
    match result.unwrap_err().kind() {
        MediaErrorKind::Asset(e) => e.kind.clone(),
        other => panic!("expected asset error, got {other}"),
    }
}

#[test]
fn kind_from_extension_when_undeclared() {
    let metadata = AssetMetadata::builder()
        .http_url("http://localhost/media/Cover.JPG")
        .has_preview(true)
        .has_waveform(true)
        .build()
        .unwrap();
    let asset = Asset::from_metadata(&uri("ref:Cover"), metadata).unwrap();

    assert_eq!(*asset.kind(), MediaKind::Image);
    assert!(asset.is_visible());
    assert!(!asset.is_playable());
    assert_eq!(
        asset.preview_http_url().as_deref(),
        Some("http://localhost/media/Cover.JPG_preview.jpg")
    );
    // waveforms exist for audio only
    assert_eq!(*asset.waveform_http_url(), None);
}

#[test]
fn unknown_kind_is_rejected() {
    let metadata = AssetMetadata::builder().kind("hologram").build().unwrap();
    assert!(matches!(
        asset_error(Asset::from_metadata(&uri("ref:X"), metadata)),
        AssetErrorKind::UnknownMediaKind { .. }
    ));

    let metadata = AssetMetadata::builder()
        .http_url("http://localhost/media/file.xyz")
        .build()
        .unwrap();
    assert!(matches!(
        asset_error(Asset::from_metadata(&uri("ref:X"), metadata)),
        AssetErrorKind::UnknownMediaKind { .. }
    ));
}

#[test]
fn identity_is_filled_from_the_request() {
    let metadata = AssetMetadata::builder().kind("audio").build().unwrap();
    let asset = Asset::from_metadata(&uri("uuid:1234#complete"), metadata).unwrap();

    assert_eq!(asset.uuid().as_deref(), Some("1234"));
    assert_eq!(asset.uri().raw(), "uuid:1234");
    assert_eq!(asset.key(), "uuid:1234");
    assert_eq!(asset.title_safe(), "1234");
}

#[test]
fn mismatched_identity_is_rejected() {
    let metadata = AssetMetadata::builder()
        .reference("Other")
        .kind("audio")
        .build()
        .unwrap();
    assert!(matches!(
        asset_error(Asset::from_metadata(&uri("ref:Song"), metadata)),
        AssetErrorKind::IdentityMismatch { .. }
    ));
}

#[test]
fn identity_keys_include_both_schemes() {
    let metadata = AssetMetadata::builder()
        .reference("Song")
        .uuid("abcd")
        .kind("audio")
        .build()
        .unwrap();
    let asset = Asset::from_metadata(&uri("uuid:abcd"), metadata).unwrap();
    assert_eq!(asset.identity_keys(), vec!["ref:Song", "uuid:abcd"]);
    assert_eq!(asset.title_safe(), "Song");
}

#[test]
fn complete_is_listed_first_unless_declared() {
    let metadata: AssetMetadata = serde_json::from_str(
        r#"{"ref": "Song", "kind": "audio",
            "samples": [{"ref": "intro"}, {"ref": "outro"}]}"#,
    )
    .unwrap();
    let asset = Asset::from_metadata(&uri("ref:Song"), metadata).unwrap();
    assert_eq!(asset.sample_refs(), &["complete", "intro", "outro"]);

    let metadata: AssetMetadata = serde_json::from_str(
        r#"{"ref": "Song", "kind": "audio",
            "samples": [{"ref": "intro"}, {"title": "Whole"}]}"#,
    )
    .unwrap();
    let asset = Asset::from_metadata(&uri("ref:Song"), metadata).unwrap();
    assert_eq!(asset.sample_refs(), &["intro", "complete"]);
}

#[test]
fn multi_part_urls() {
    let metadata = AssetMetadata::builder()
        .kind("image")
        .http_url("http://localhost/media/Score.png")
        .multi_part_count(4u32)
        .build()
        .unwrap();
    let asset = Asset::from_metadata(&uri("ref:Score"), metadata).unwrap();

    assert!(asset.is_multi_part());
    assert_eq!(
        asset.multi_part_http_url_by_no(2).as_deref(),
        Some("http://localhost/media/Score_no02.png")
    );
    // out of range numbers are clamped
    assert_eq!(
        asset.multi_part_http_url_by_no(0).as_deref(),
        Some("http://localhost/media/Score_no01.png")
    );
    assert_eq!(
        asset.multi_part_http_url_by_no(99).as_deref(),
        Some("http://localhost/media/Score_no04.png")
    );

    let selection = PartSelection::parse("2-3,9").unwrap();
    assert_eq!(
        asset.multi_part_http_urls(Some(&selection)),
        vec![
            "http://localhost/media/Score_no02.png",
            "http://localhost/media/Score_no03.png",
        ]
    );
    assert_eq!(asset.multi_part_http_urls(None).len(), 4);
}

#[test]
fn single_part_asset_returns_plain_url() {
    let metadata = AssetMetadata::builder()
        .kind("document")
        .http_url("http://localhost/media/Text.pdf")
        .build()
        .unwrap();
    let asset = Asset::from_metadata(&uri("ref:Text"), metadata).unwrap();

    assert!(!asset.is_multi_part());
    assert_eq!(
        asset.multi_part_http_url_by_no(3).as_deref(),
        Some("http://localhost/media/Text.pdf")
    );
}
