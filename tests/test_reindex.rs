mod common;

use common::{fake_png, setup};
use visearch::application::reindex::ReindexReport;

#[tokio::test]
async fn test_reindex_fills_missing_embeddings() {
    let h = setup(2);
    let img = fake_png("lamp");
    h.provider.register(&img, vec![0.6, 0.8]);
    h.provider.set_down(true);

    let p = h
        .vs
        .add_product("Lamp".into(), None, None, Some(&img))
        .await
        .unwrap();
    h.vs.add_product("Text only".into(), None, None, None)
        .await
        .unwrap();
    assert!(!p.has_embedding());

    h.provider.set_down(false);
    let report = h.vs.reindex(false).await.unwrap();
    assert_eq!(report, ReindexReport { embedded: 1, failed: 0 });
    assert_eq!(h.vs.get_product(p.id).unwrap().embedding, Some(vec![0.6, 0.8]));

    // nothing left to do
    assert_eq!(h.vs.reindex(false).await.unwrap(), ReindexReport::default());
}

#[tokio::test]
async fn test_reindex_counts_failures() {
    let h = setup(2);
    h.provider.set_down(true);
    h.vs.add_product("A".into(), None, None, Some(&fake_png("a")))
        .await
        .unwrap();
    h.vs.add_product("B".into(), None, None, Some(&fake_png("b")))
        .await
        .unwrap();

    let report = h.vs.reindex(false).await.unwrap();
    assert_eq!(report, ReindexReport { embedded: 0, failed: 2 });
}

#[tokio::test]
async fn test_reindex_all_reembeds() {
    let h = setup(2);
    let img = fake_png("table");
    h.provider.register(&img, vec![1.0, 0.0]);
    let p = h
        .vs
        .add_product("Table".into(), None, None, Some(&img))
        .await
        .unwrap();

    h.provider.register(&img, vec![0.0, 1.0]);
    assert_eq!(h.vs.reindex(false).await.unwrap().embedded, 0);
    assert_eq!(h.vs.reindex(true).await.unwrap().embedded, 1);
    assert_eq!(h.vs.get_product(p.id).unwrap().embedding, Some(vec![0.0, 1.0]));
}

#[tokio::test]
async fn test_stats() {
    let h = setup(2);
    let img = fake_png("x");
    h.provider.register(&img, vec![1.0, 1.0]);
    h.vs.add_product("X".into(), None, None, Some(&img))
        .await
        .unwrap();
    h.vs.add_product("Y".into(), None, None, None).await.unwrap();

    let stats = h.vs.stats().unwrap();
    assert_eq!(stats.catalog.total_products, 2);
    assert_eq!(stats.catalog.embedded_products, 1);
    assert_eq!(stats.catalog.dimensions[0].dimension, 2);
    assert_eq!(stats.model, "stub");
    assert_eq!(stats.model_dimension, 2);
}
