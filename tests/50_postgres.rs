mod common;

use anyhow::{Context, Result};
use uuid::Uuid;

use movie_api::database::models::{NewMovie, NewReview};
use movie_api::database::{AggregateQuery, MovieStore, ReviewStore};
use movie_api::filter::ReviewFilter;

// These run only when DATABASE_URL points at a scratch Postgres database.
// Titles are unique per run so a shared database never skews the results.

macro_rules! pg_store_or_skip {
    () => {
        match common::pg_store().await? {
            Some(store) => store,
            None => {
                eprintln!("DATABASE_URL not set; skipping postgres test");
                return Ok(());
            }
        }
    };
}

fn new_movie(title: &str) -> NewMovie {
    NewMovie {
        title: title.to_string(),
        release_date: "2001".to_string(),
        genre: "Drama".to_string(),
        actors: vec!["a".into(), "b".into(), "c".into()],
    }
}

fn new_review(movie_id: Uuid, rating: f64) -> NewReview {
    NewReview {
        movie_id,
        username: Some("ada".to_string()),
        review: Some("ok".to_string()),
        rating: Some(rating),
    }
}

#[tokio::test]
async fn pg_update_and_delete_by_title() -> Result<()> {
    let store = pg_store_or_skip!();
    let title = common::unique("heat");
    let renamed = format!("{} (1995)", title);
    store.create_movie(new_movie(&title)).await?;

    let before = store
        .update_movie_title(&title, &renamed)
        .await?
        .context("title should match")?;
    assert_eq!(before.title.as_deref(), Some(title.as_str()));
    assert!(store.find_movie_by_title(&title).await?.is_none());
    assert!(store.update_movie_title(&title, "x").await?.is_none());

    let deleted = store.delete_movie_by_title(&renamed).await?;
    assert_eq!(deleted.and_then(|m| m.title), Some(renamed.clone()));
    assert!(store.delete_movie_by_title(&renamed).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn pg_shared_title_resolves_to_lowest_id() -> Result<()> {
    let store = pg_store_or_skip!();
    let title = common::unique("twin");
    let first = store.create_movie(new_movie(&title)).await?;
    let second = store.create_movie(new_movie(&title)).await?;
    let lowest = first.id.min(second.id);

    let found = store.find_movie_by_title(&title).await?.context("movie by title")?;
    assert_eq!(found.id, lowest);

    let deleted = store.delete_movie_by_title(&title).await?.context("deleted movie")?;
    assert_eq!(deleted.id, lowest);
    store.delete_movie_by_title(&title).await?;

    Ok(())
}

#[tokio::test]
async fn pg_aggregation_sorts_by_average_and_limits() -> Result<()> {
    let store = pg_store_or_skip!();
    let heat = store.create_movie(new_movie(&common::unique("heat"))).await?;
    let alien = store.create_movie(new_movie(&common::unique("alien"))).await?;
    let cube = store.create_movie(new_movie(&common::unique("cube"))).await?;

    store.create_review(new_review(heat.id, 3.0)).await?;
    store.create_review(new_review(heat.id, 4.0)).await?;
    store.create_review(new_review(cube.id, 5.0)).await?;

    // Other movies may share the database, so compare only the relative order of ours
    let rows = store.aggregate_with_reviews(AggregateQuery::all()).await?;
    let ours: Vec<_> = rows
        .iter()
        .filter(|r| [heat.id, alien.id, cube.id].contains(&r.movie.id))
        .map(|r| (r.movie.id, r.avg_rating))
        .collect();
    assert_eq!(ours, vec![(cube.id, Some(5.0)), (heat.id, Some(3.5)), (alien.id, None)]);

    let reviewed = store.aggregate_with_reviews(AggregateQuery::single(heat.id)).await?;
    assert_eq!(reviewed.len(), 1);
    assert_eq!(reviewed[0].movie_reviews.len(), 2);
    assert!(reviewed[0].movie_reviews.iter().all(|r| r.movie_id == heat.id));
    assert_eq!(reviewed[0].movie_reviews[0].username.as_deref(), Some("ada"));

    let single = store.aggregate_with_reviews(AggregateQuery::single(alien.id)).await?;
    assert_eq!(single.len(), 1);
    assert!(single[0].movie_reviews.is_empty());
    assert_eq!(single[0].avg_rating, None);

    let capped = store
        .aggregate_with_reviews(AggregateQuery {
            movie_id: None,
            limit: Some(1),
        })
        .await?;
    assert_eq!(capped.len(), 1);

    Ok(())
}

#[tokio::test]
async fn pg_review_filter_is_applied() -> Result<()> {
    let store = pg_store_or_skip!();
    let heat = store.create_movie(new_movie(&common::unique("heat"))).await?;
    let author = common::unique("critic");

    store
        .create_review(NewReview {
            username: Some(author.clone()),
            ..new_review(heat.id, 3.0)
        })
        .await?;
    store.create_review(new_review(heat.id, 4.0)).await?;

    let by_movie = ReviewFilter {
        movie_id: Some(heat.id),
        ..Default::default()
    };
    assert_eq!(store.find_reviews(&by_movie).await?.len(), 2);

    let by_author = ReviewFilter {
        movie_id: Some(heat.id),
        username: Some(author.clone()),
        ..Default::default()
    };
    let found = store.find_reviews(&by_author).await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].rating, Some(3.0));

    let by_rating = ReviewFilter {
        movie_id: Some(heat.id),
        rating: Some(4.0),
        ..Default::default()
    };
    assert_eq!(store.find_reviews(&by_rating).await?.len(), 1);

    let unknown = ReviewFilter {
        unknown: vec!["director".to_string()],
        ..Default::default()
    };
    assert!(store.find_reviews(&unknown).await?.is_empty());

    Ok(())
}
