mod common;

use common::CountingFetcher;
use mediaref_error::{MediaErrorKind, ResolverErrorKind};
use mediaref_resolver::Resolver;
use std::sync::Arc;

const RICERCAR: &str = "ref:Fuge-Opfer_HB_Ricercar-a-3";

#[tokio::test]
async fn overlapping_requests_share_one_fetch() {
    let (fetcher, gate) = CountingFetcher::gated().await;
    let resolver = Resolver::new(fetcher.clone());

    let (first, second, ()) = tokio::join!(
        resolver.resolve_asset(RICERCAR),
        resolver.resolve_asset(RICERCAR),
        async {
            gate.wait_for_fetch().await;
            gate.release();
        }
    );

    let (first, second) = (first.unwrap(), second.unwrap());
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(fetcher.fetch_count(), 1);
    assert_eq!(resolver.asset_count().await, 1);
}

#[tokio::test]
async fn requests_from_many_tasks_share_one_fetch() {
    let (fetcher, gate) = CountingFetcher::gated().await;
    let resolver = Arc::new(Resolver::new(fetcher.clone()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            tokio::spawn(async move { resolver.resolve_asset(RICERCAR).await })
        })
        .collect();

    gate.wait_for_fetch().await;
    // let every task reach the in-flight table before the fetch completes
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
    gate.release();

    let mut assets = Vec::new();
    for handle in handles {
        assets.push(handle.await.unwrap().unwrap());
    }
    assert!(assets.iter().all(|a| Arc::ptr_eq(a, &assets[0])));
    assert_eq!(resolver.asset_count().await, 1);
    assert_eq!(resolver.export_assets().await.len(), 1);
}

#[tokio::test]
async fn fetch_finishing_after_reset_is_discarded() {
    let (fetcher, gate) = CountingFetcher::gated().await;
    let resolver = Arc::new(Resolver::new(fetcher.clone()));

    let pending = {
        let resolver = Arc::clone(&resolver);
        tokio::spawn(async move { resolver.resolve_asset(RICERCAR).await })
    };
    gate.wait_for_fetch().await;
    resolver.reset().await;
    gate.release();

    let err = pending.await.unwrap().unwrap_err();
    match err.kind() {
        MediaErrorKind::Resolver(e) => assert!(matches!(
            e.kind,
            ResolverErrorKind::Superseded {
                started: 0,
                current: 1,
                ..
            }
        )),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(resolver.asset_count().await, 0);
    assert!(resolver.get_asset(RICERCAR).await.is_none());

    // a fresh request after the reset fetches again
    gate.release();
    let asset = resolver.resolve_asset(RICERCAR).await.unwrap();
    assert_eq!(asset.key(), RICERCAR);
    assert_eq!(fetcher.fetches_of(RICERCAR), 2);
}
