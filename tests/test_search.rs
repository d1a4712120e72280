mod common;

use common::{fake_png, setup, Harness};
use visearch::domain::error::DomainError;
use visearch::domain::values::product_id::ProductId;

async fn add_with_vector(h: &Harness, name: &str, vector: Vec<f32>) -> ProductId {
    let img = fake_png(name);
    h.provider.register(&img, vector);
    h.vs
        .add_product(name.into(), None, Some(10.0), Some(&img))
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_search_ranks_by_similarity() {
    let h = setup(2);
    let a = add_with_vector(&h, "A", vec![1.0, 0.0]).await;
    add_with_vector(&h, "B", vec![0.0, 1.0]).await;
    let c = add_with_vector(&h, "C", vec![0.5, 0.5]).await;

    let query = fake_png("query");
    h.provider.register(&query, vec![1.0, 0.0]);

    let hits = h.vs.search_by_image(&query, Some(2)).await.unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id, a);
    assert_eq!(hits[0].name, "A");
    assert!((hits[0].score - 1.0).abs() < 1e-9);
    assert_eq!(hits[1].id, c);
    assert!((hits[1].score - 0.7071).abs() < 1e-3);
}

#[tokio::test]
async fn test_default_k_is_five() {
    let h = setup(2);
    for i in 0..8 {
        add_with_vector(&h, &format!("P{i}"), vec![1.0, i as f32]).await;
    }
    let query = fake_png("query");
    h.provider.register(&query, vec![1.0, 0.0]);

    let hits = h.vs.search_by_image(&query, None).await.unwrap();
    assert_eq!(hits.len(), 5);
    for pair in hits.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    assert_eq!(hits[0].name, "P0");
}

#[tokio::test]
async fn test_fewer_valid_candidates_than_k() {
    let h = setup(2);
    add_with_vector(&h, "A", vec![1.0, 1.0]).await;
    add_with_vector(&h, "B", vec![1.0, -1.0]).await;
    h.vs.add_product("No image".into(), None, None, None)
        .await
        .unwrap();

    let query = fake_png("query");
    h.provider.register(&query, vec![1.0, 0.0]);
    let hits = h.vs.search_by_image(&query, Some(5)).await.unwrap();
    assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn test_zero_vector_product_scores_zero() {
    let h = setup(2);
    let z = add_with_vector(&h, "Blank", vec![0.0, 0.0]).await;
    let query = fake_png("query");
    h.provider.register(&query, vec![1.0, 1.0]);

    let hits = h.vs.search_by_image(&query, None).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, z);
    assert_eq!(hits[0].score, 0.0);
}

#[tokio::test]
async fn test_mismatched_dimension_excluded() {
    let h = setup(512);
    let mut close = vec![0.0_f32; 512];
    close[0] = 1.0;
    let kept = add_with_vector(&h, "Current model", close).await;
    add_with_vector(&h, "Old model", vec![1.0, 0.0, 0.0]).await;

    let mut q = vec![0.0_f32; 512];
    q[0] = 0.8;
    q[1] = 0.2;
    let query = fake_png("query");
    h.provider.register(&query, q);

    let hits = h.vs.search_by_image(&query, Some(1)).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, kept);
}

#[tokio::test]
async fn test_equal_scores_keep_catalog_order() {
    let h = setup(2);
    let first = add_with_vector(&h, "First", vec![2.0, 0.0]).await;
    let second = add_with_vector(&h, "Second", vec![1.0, 0.0]).await;
    let third = add_with_vector(&h, "Third", vec![4.0, 0.0]).await;

    let query = fake_png("query");
    h.provider.register(&query, vec![1.0, 0.0]);
    let hits = h.vs.search_by_image(&query, Some(3)).await.unwrap();
    let ids: Vec<_> = hits.iter().map(|hit| hit.id).collect();
    assert_eq!(ids, vec![first, second, third]);
}

#[tokio::test]
async fn test_invalid_query_vector_is_rejected() {
    let h = setup(2);
    add_with_vector(&h, "A", vec![1.0, 0.0]).await;
    let query = fake_png("query");
    h.provider.register(&query, vec![f32::NAN, 0.0]);

    let err = h.vs.search_by_image(&query, None).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidQuery(_)));
}

#[tokio::test]
async fn test_provider_errors_propagate() {
    let h = setup(2);
    add_with_vector(&h, "A", vec![1.0, 0.0]).await;

    let unknown = fake_png("never registered");
    assert!(matches!(
        h.vs.search_by_image(&unknown, None).await,
        Err(DomainError::UnsupportedMedia(_))
    ));

    let query = fake_png("query");
    h.provider.register(&query, vec![1.0, 0.0]);
    h.provider.set_down(true);
    assert!(matches!(
        h.vs.search_by_image(&query, None).await,
        Err(DomainError::ModelUnavailable(_))
    ));
}

#[tokio::test]
async fn test_rejects_bad_uploads_and_zero_k() {
    let h = setup(2);
    assert!(matches!(
        h.vs.search_by_image(b"", None).await,
        Err(DomainError::InvalidInput(_))
    ));
    assert!(matches!(
        h.vs.search_by_image(b"%PDF-1.4", None).await,
        Err(DomainError::UnsupportedMedia(_))
    ));
    let query = fake_png("query");
    h.provider.register(&query, vec![1.0, 0.0]);
    assert!(matches!(
        h.vs.search_by_image(&query, Some(0)).await,
        Err(DomainError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_search_by_vector() {
    let h = setup(2);
    let a = add_with_vector(&h, "A", vec![0.0, 1.0]).await;
    add_with_vector(&h, "B", vec![1.0, 0.0]).await;

    let results = h.vs.search_by_vector(&[0.1, 1.0], 1).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, a);
}

#[tokio::test]
async fn test_search_empty_catalog() {
    let h = setup(2);
    let query = fake_png("query");
    h.provider.register(&query, vec![1.0, 0.0]);
    assert!(h.vs.search_by_image(&query, None).await.unwrap().is_empty());
}
