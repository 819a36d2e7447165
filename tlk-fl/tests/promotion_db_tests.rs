//! Database-backed pipeline tests
//!
//! Runs the engine against the real sqlite adapters: promotion must persist
//! tier flags, survive re-runs, and stay serialized by the settings-table
//! lock.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use tlk_common::RankingParams;
use tlk_fl::db::cases::{save_case, CaseStore};
use tlk_fl::db::tutors::{save_tutor, TutorStore};
use tlk_fl::engine::{FacetFilter, FeaturedEngine, FeaturedQuery, RankingSource, TierStore};
use tlk_fl::models::{Listing, StudentCase, Tier, Tutor};

async fn setup_pool() -> SqlitePool {
    // One connection: every pooled connection of an in-memory SQLite URL
    // opens its own database, and the engine fans out concurrent queries
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .unwrap();
    tlk_fl::db::init_tables(&pool).await.unwrap();
    pool
}

fn rated_tutor(name: &str, rating: f64) -> Tutor {
    let mut tutor = Tutor::new(name.to_string());
    tutor.rating_score = rating;
    tutor
}

fn query(limit: u32) -> FeaturedQuery {
    FeaturedQuery {
        limit,
        facets: FacetFilter::default(),
    }
}

async fn tier_counts(pool: &SqlitePool, table: &str) -> (i64, i64, i64) {
    let sql = format!(
        "SELECT \
         SUM(CASE WHEN is_vip = 1 THEN 1 ELSE 0 END), \
         SUM(CASE WHEN is_top = 1 AND is_vip = 0 THEN 1 ELSE 0 END), \
         SUM(CASE WHEN is_vip = 0 AND is_top = 0 THEN 1 ELSE 0 END) \
         FROM {table}"
    );
    let row: (Option<i64>, Option<i64>, Option<i64>) =
        sqlx::query_as(&sql).fetch_one(pool).await.unwrap();
    (row.0.unwrap_or(0), row.1.unwrap_or(0), row.2.unwrap_or(0))
}

#[tokio::test]
async fn auto_promotion_persists_tier_flags() {
    let pool = setup_pool().await;
    for (i, rating) in [5.0, 4.0, 4.0, 3.0, 3.0, 2.0, 2.0, 1.0, 1.0, 0.0].iter().enumerate() {
        save_tutor(&pool, &rated_tutor(&format!("t{i}"), *rating)).await.unwrap();
    }

    let params = RankingParams::default();
    let store = TutorStore::new(pool.clone(), params.promotion_lock_stale_secs);
    let engine = FeaturedEngine::new(&store, &params);

    let outcome = engine.run(&query(8)).await.unwrap();
    assert_eq!(outcome.source, RankingSource::TieredRanking);
    assert_eq!(outcome.items.len(), 8);

    let (vip, top, normal) = tier_counts(&pool, "tutors").await;
    assert_eq!((vip, top, normal), (3, 5, 2));

    // Best rated entities landed in VIP
    let vip_ratings: Vec<f64> = sqlx::query_as::<_, (f64,)>(
        "SELECT rating_score FROM tutors WHERE is_vip = 1 ORDER BY rating_score DESC",
    )
    .fetch_all(&pool)
    .await
    .unwrap()
    .into_iter()
    .map(|r| r.0)
    .collect();
    assert_eq!(vip_ratings, vec![5.0, 4.0, 4.0]);

    // Lock is released afterwards
    assert!(store.try_acquire_promotion_lock().await.unwrap());
}

#[tokio::test]
async fn second_run_does_not_promote_again() {
    let pool = setup_pool().await;
    for i in 0..4 {
        save_tutor(&pool, &rated_tutor(&format!("t{i}"), i as f64)).await.unwrap();
    }

    let params = RankingParams::default();
    let store = TutorStore::new(pool.clone(), params.promotion_lock_stale_secs);
    let engine = FeaturedEngine::new(&store, &params);

    let first = engine.run(&query(8)).await.unwrap();
    assert!(first.promoted.is_some());
    let counts_after_first = tier_counts(&pool, "tutors").await;

    let second = engine.run(&query(8)).await.unwrap();
    assert!(second.promoted.is_none());
    assert_eq!(tier_counts(&pool, "tutors").await, counts_after_first);

    let first_ids: Vec<uuid::Uuid> = first.items.iter().map(|i| i.entity.id).collect();
    let second_ids: Vec<uuid::Uuid> = second.items.iter().map(|i| i.entity.id).collect();
    assert_eq!(first_ids, second_ids);
}

#[tokio::test]
async fn held_lock_blocks_promotion_on_the_real_store() {
    let pool = setup_pool().await;
    for i in 0..4 {
        save_tutor(&pool, &rated_tutor(&format!("t{i}"), 4.0)).await.unwrap();
    }

    let params = RankingParams::default();
    let store = TutorStore::new(pool.clone(), params.promotion_lock_stale_secs);

    // Simulate a concurrent invocation holding the lock
    assert!(store.try_acquire_promotion_lock().await.unwrap());

    let engine = FeaturedEngine::new(&store, &params);
    let outcome = engine.run(&query(8)).await.unwrap();

    assert!(outcome.promoted.is_none());
    let (vip, top, _) = tier_counts(&pool, "tutors").await;
    assert_eq!((vip, top), (0, 0));

    store.release_promotion_lock().await.unwrap();
}

#[tokio::test]
async fn populated_top_tier_disables_promotion() {
    let pool = setup_pool().await;
    let mut top = rated_tutor("existing-top", 2.0);
    top.is_top = true;
    save_tutor(&pool, &top).await.unwrap();
    save_tutor(&pool, &rated_tutor("normal", 5.0)).await.unwrap();

    let params = RankingParams::default();
    let store = TutorStore::new(pool.clone(), params.promotion_lock_stale_secs);
    let engine = FeaturedEngine::new(&store, &params);

    let outcome = engine.run(&query(8)).await.unwrap();
    assert!(outcome.promoted.is_none());

    let (vip, top_count, normal) = tier_counts(&pool, "tutors").await;
    assert_eq!((vip, top_count, normal), (0, 1, 1));

    // TOP entity leads despite the lower rating
    assert_eq!(outcome.items[0].entity.display_name, "existing-top");
}

#[tokio::test]
async fn case_pipeline_orders_tier_major_end_to_end() {
    let pool = setup_pool().await;

    let mut vip_low = StudentCase::new("vip-low".to_string());
    vip_low.is_vip = true;
    vip_low.rating_score = 1.0;
    save_case(&pool, &vip_low).await.unwrap();

    let mut top_high = StudentCase::new("top-high".to_string());
    top_high.is_top = true;
    top_high.rating_score = 5.0;
    save_case(&pool, &top_high).await.unwrap();

    let mut normal = StudentCase::new("normal".to_string());
    normal.rating_score = 4.5;
    save_case(&pool, &normal).await.unwrap();

    let params = RankingParams::default();
    let store = CaseStore::new(pool.clone(), params.promotion_lock_stale_secs);
    let engine = FeaturedEngine::new(&store, &params);

    let outcome = engine.run(&query(8)).await.unwrap();

    let titles: Vec<&str> = outcome.items.iter().map(|i| i.entity.title.as_str()).collect();
    assert_eq!(titles, vec!["vip-low", "top-high", "normal"]);
    assert!(outcome.promoted.is_none());
}

#[tokio::test]
async fn facets_filter_uniformly_across_tiers_on_the_real_store() {
    let pool = setup_pool().await;

    let mut math_vip = rated_tutor("math-vip", 3.0);
    math_vip.is_vip = true;
    math_vip.subjects = vec!["math".to_string()];
    save_tutor(&pool, &math_vip).await.unwrap();

    let mut english_top = rated_tutor("english-top", 4.0);
    english_top.is_top = true;
    english_top.subjects = vec!["english".to_string()];
    save_tutor(&pool, &english_top).await.unwrap();

    let mut math_normal = rated_tutor("math-normal", 2.0);
    math_normal.subjects = vec!["math".to_string()];
    save_tutor(&pool, &math_normal).await.unwrap();

    let params = RankingParams::default();
    let store = TutorStore::new(pool.clone(), params.promotion_lock_stale_secs);
    let engine = FeaturedEngine::new(&store, &params);

    let faceted = FeaturedQuery {
        limit: 8,
        facets: FacetFilter {
            subjects: vec!["math".to_string()],
            ..Default::default()
        },
    };
    let outcome = engine.run(&faceted).await.unwrap();

    let names: Vec<&str> = outcome.items.iter().map(|i| i.entity.display_name.as_str()).collect();
    assert_eq!(names, vec!["math-vip", "math-normal"]);
    assert_eq!(outcome.items[0].entity.tier(), Tier::Vip);
    assert_eq!(outcome.items[1].entity.tier(), Tier::Normal);
    // A VIP matching the facets exists, so no promotion fires
    assert!(outcome.promoted.is_none());
}
