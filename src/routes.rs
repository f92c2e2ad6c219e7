use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    models::{AnalyticsResponse, LinkSimple, MovieDetailed, MovieSimple, RatingSimple, TagSimple},
    queries,
};

const MAX_LIMIT: u64 = 1000;

fn default_limit() -> u64 {
    100
}

fn check_limit(limit: u64) -> ApiResult<()> {
    if limit > MAX_LIMIT {
        return Err(ApiError::Validation(format!("limit must be at most {MAX_LIMIT}")));
    }
    Ok(())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/movies", get(list_movies))
        .route("/movies/{movie_id}", get(read_movie))
        .route("/ratings", get(list_ratings))
        .route("/ratings/{user_id}/{movie_id}", get(read_rating))
        .route("/tags", get(list_tags))
        .route("/tags/{user_id}/{movie_id}/{tag_text}", get(read_tag))
        .route("/links", get(list_links))
        .route("/links/{movie_id}", get(read_link))
        .route("/analytics", get(analytics))
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "api is working well" }))
}

async fn read_movie(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i32>,
) -> ApiResult<Json<MovieDetailed>> {
    let movie = queries::get_movie(&state.db, movie_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Movie with id {movie_id} not found")))?;

    let rating_count = queries::movie_rating_count(&state.db, movie_id).await?;
    let tag_count = queries::movie_tag_count(&state.db, movie_id).await?;
    let link = queries::get_link(&state.db, movie_id).await?.map(LinkSimple::from);

    Ok(Json(MovieDetailed {
        movie_id: movie.movie_id,
        title: movie.title,
        genres: movie.genres,
        rating_count,
        tag_count,
        link,
    }))
}

#[derive(Debug, Deserialize)]
pub struct MoviesQuery {
    #[serde(default)]
    skip: u64,
    #[serde(default = "default_limit")]
    limit: u64,
    title: Option<String>,
    genre: Option<String>,
}

async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(q): Query<MoviesQuery>,
) -> ApiResult<Json<Vec<MovieSimple>>> {
    check_limit(q.limit)?;
    let movies =
        queries::get_movies(&state.db, q.skip, q.limit, q.title.as_deref(), q.genre.as_deref())
            .await?;
    Ok(Json(movies.into_iter().map(MovieSimple::from).collect()))
}

async fn read_rating(
    State(state): State<Arc<AppState>>,
    Path((user_id, movie_id)): Path<(i32, i32)>,
) -> ApiResult<Json<RatingSimple>> {
    let rating = queries::get_rating(&state.db, user_id, movie_id).await?.ok_or_else(|| {
        ApiError::NotFound(format!("No rating found for user {user_id} and movie {movie_id}"))
    })?;
    Ok(Json(rating.into()))
}

#[derive(Debug, Deserialize)]
pub struct RatingsQuery {
    #[serde(default)]
    skip: u64,
    #[serde(default = "default_limit")]
    limit: u64,
    movie_id: Option<i32>,
    user_id: Option<i32>,
    min_rating: Option<f32>,
}

async fn list_ratings(
    State(state): State<Arc<AppState>>,
    Query(q): Query<RatingsQuery>,
) -> ApiResult<Json<Vec<RatingSimple>>> {
    check_limit(q.limit)?;
    if let Some(min_rating) = q.min_rating {
        if !(0.0..=5.0).contains(&min_rating) {
            return Err(ApiError::Validation(
                "min_rating must be between 0.0 and 5.0".to_string(),
            ));
        }
    }
    let ratings =
        queries::get_ratings(&state.db, q.skip, q.limit, q.movie_id, q.user_id, q.min_rating)
            .await?;
    Ok(Json(ratings.into_iter().map(RatingSimple::from).collect()))
}

async fn read_tag(
    State(state): State<Arc<AppState>>,
    Path((user_id, movie_id, tag_text)): Path<(i32, i32, String)>,
) -> ApiResult<Json<TagSimple>> {
    let tag = queries::get_tag(&state.db, user_id, movie_id, &tag_text).await?.ok_or_else(|| {
        ApiError::NotFound(format!(
            "Tag not found for user {user_id}, movie {movie_id}, and tag '{tag_text}'"
        ))
    })?;
    Ok(Json(tag.into()))
}

#[derive(Debug, Deserialize)]
pub struct TagsQuery {
    #[serde(default)]
    skip: u64,
    #[serde(default = "default_limit")]
    limit: u64,
    movie_id: Option<i32>,
    user_id: Option<i32>,
}

async fn list_tags(
    State(state): State<Arc<AppState>>,
    Query(q): Query<TagsQuery>,
) -> ApiResult<Json<Vec<TagSimple>>> {
    check_limit(q.limit)?;
    let tags = queries::get_tags(&state.db, q.skip, q.limit, q.movie_id, q.user_id).await?;
    Ok(Json(tags.into_iter().map(TagSimple::from).collect()))
}

async fn read_link(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i32>,
) -> ApiResult<Json<LinkSimple>> {
    let link = queries::get_link(&state.db, movie_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No link found for movie with id {movie_id}")))?;
    Ok(Json(link.into()))
}

#[derive(Debug, Deserialize)]
pub struct LinksQuery {
    #[serde(default)]
    skip: u64,
    #[serde(default = "default_limit")]
    limit: u64,
}

async fn list_links(
    State(state): State<Arc<AppState>>,
    Query(q): Query<LinksQuery>,
) -> ApiResult<Json<Vec<LinkSimple>>> {
    check_limit(q.limit)?;
    let links = queries::get_links(&state.db, q.skip, q.limit).await?;
    Ok(Json(links.into_iter().map(LinkSimple::from).collect()))
}

async fn analytics(State(state): State<Arc<AppState>>) -> ApiResult<Json<AnalyticsResponse>> {
    let movie_count = queries::movie_count(&state.db).await?;
    let rating_count = queries::rating_count(&state.db).await?;
    let tag_count = queries::tag_count(&state.db).await?;
    let link_count = queries::link_count(&state.db).await?;
    Ok(Json(AnalyticsResponse { movie_count, rating_count, tag_count, link_count }))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::db::test_db::seeded_db;

    async fn test_app() -> Router {
        let db = seeded_db().await;
        router().with_state(Arc::new(AppState { db }))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn liveness() {
        let (status, body) = get_json(test_app().await, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "api is working well");
    }

    #[tokio::test]
    async fn movie_by_id_returns_detailed_view() {
        let (status, body) = get_json(test_app().await, "/movies/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["movieId"], 1);
        assert_eq!(body["title"], "Toy Story (1995)");
        assert_eq!(body["genres"], "Animation|Comedy");
        assert_eq!(body["ratingCount"], 2);
        assert_eq!(body["tagCount"], 1);
        assert_eq!(body["link"]["imdbId"], 114709);
    }

    #[tokio::test]
    async fn unknown_movie_is_404() {
        let (status, body) = get_json(test_app().await, "/movies/999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Movie with id 999 not found");
    }

    #[tokio::test]
    async fn movie_without_link_has_null_link() {
        let (status, body) = get_json(test_app().await, "/movies/3").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["link"].is_null());
    }

    #[tokio::test]
    async fn movie_list_respects_limit_and_is_stable() {
        let (status, first) = get_json(test_app().await, "/movies?limit=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first.as_array().unwrap().len(), 2);

        let (_, again) = get_json(test_app().await, "/movies?limit=2").await;
        assert_eq!(first, again);
    }

    #[tokio::test]
    async fn movie_list_title_filter() {
        let (status, body) = get_json(test_app().await, "/movies?title=toy").await;
        assert_eq!(status, StatusCode::OK);
        let movies = body.as_array().unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0]["title"], "Toy Story (1995)");
    }

    #[tokio::test]
    async fn movie_list_genre_filter_is_substring() {
        let (status, body) = get_json(test_app().await, "/movies?genre=com").await;
        assert_eq!(status, StatusCode::OK);
        let movies = body.as_array().unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0]["movieId"], 1);
    }

    #[tokio::test]
    async fn oversized_limit_is_rejected() {
        let (status, body) = get_json(test_app().await, "/movies?limit=1001").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"], "limit must be at most 1000");
    }

    #[tokio::test]
    async fn rating_by_composite_key() {
        let (status, body) = get_json(test_app().await, "/ratings/1/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["userId"], 1);
        assert_eq!(body["movieId"], 1);
        assert_eq!(body["rating"], 4.0);
        assert_eq!(body["timestamp"], 964982703);
    }

    #[tokio::test]
    async fn missing_rating_is_404() {
        let (status, body) = get_json(test_app().await, "/ratings/1/2").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "No rating found for user 1 and movie 2");
    }

    #[tokio::test]
    async fn rating_list_min_rating_filter() {
        let (status, body) = get_json(test_app().await, "/ratings?min_rating=4.5").await;
        assert_eq!(status, StatusCode::OK);
        let ratings = body.as_array().unwrap();
        assert_eq!(ratings.len(), 2);
        assert!(ratings.iter().all(|r| r["rating"].as_f64().unwrap() >= 4.5));
    }

    #[tokio::test]
    async fn out_of_range_min_rating_is_rejected() {
        let (status, body) = get_json(test_app().await, "/ratings?min_rating=5.5").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"], "min_rating must be between 0.0 and 5.0");
    }

    #[tokio::test]
    async fn tag_by_full_key() {
        let (status, body) = get_json(test_app().await, "/tags/2/1/pixar").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tag"], "pixar");
        assert_eq!(body["timestamp"], 1445714994);
    }

    #[tokio::test]
    async fn missing_tag_is_404() {
        let (status, body) = get_json(test_app().await, "/tags/1/1/pixar").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Tag not found for user 1, movie 1, and tag 'pixar'");
    }

    #[tokio::test]
    async fn tag_list_filtered_by_user() {
        let (status, body) = get_json(test_app().await, "/tags?user_id=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn link_by_movie_id() {
        let (status, body) = get_json(test_app().await, "/links/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["movieId"], 1);
        assert_eq!(body["imdbId"], 114709);
        assert_eq!(body["tmdbId"], 862);
    }

    #[tokio::test]
    async fn missing_link_is_404() {
        let (status, body) = get_json(test_app().await, "/links/3").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "No link found for movie with id 3");
    }

    #[tokio::test]
    async fn link_list() {
        let (status, body) = get_json(test_app().await, "/links").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn analytics_returns_unfiltered_counts() {
        let (status, body) = get_json(test_app().await, "/analytics").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["movieCount"], 3);
        assert_eq!(body["ratingCount"], 4);
        assert_eq!(body["tagCount"], 3);
        assert_eq!(body["linkCount"], 2);
    }
}
