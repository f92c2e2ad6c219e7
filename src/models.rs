use serde::Serialize;

use crate::entities::{link, movie, rating, tag};

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieSimple {
    pub movie_id: i32,
    pub title: String,
    pub genres: String,
}

impl From<movie::Model> for MovieSimple {
    fn from(m: movie::Model) -> Self {
        Self { movie_id: m.movie_id, title: m.title, genres: m.genres }
    }
}

/// Single-movie view: the base row plus the per-movie rating/tag counts and
/// the external-id link record when one exists.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetailed {
    pub movie_id: i32,
    pub title: String,
    pub genres: String,
    pub rating_count: u64,
    pub tag_count: u64,
    pub link: Option<LinkSimple>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSimple {
    pub user_id: i32,
    pub movie_id: i32,
    pub rating: f32,
    pub timestamp: i64,
}

impl From<rating::Model> for RatingSimple {
    fn from(r: rating::Model) -> Self {
        Self { user_id: r.user_id, movie_id: r.movie_id, rating: r.rating, timestamp: r.timestamp }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagSimple {
    pub user_id: i32,
    pub movie_id: i32,
    pub tag: String,
    pub timestamp: i64,
}

impl From<tag::Model> for TagSimple {
    fn from(t: tag::Model) -> Self {
        Self { user_id: t.user_id, movie_id: t.movie_id, tag: t.tag, timestamp: t.timestamp }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSimple {
    pub movie_id: i32,
    pub imdb_id: Option<i32>,
    pub tmdb_id: Option<i32>,
}

impl From<link::Model> for LinkSimple {
    fn from(l: link::Model) -> Self {
        Self { movie_id: l.movie_id, imdb_id: l.imdb_id, tmdb_id: l.tmdb_id }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub movie_count: u64,
    pub rating_count: u64,
    pub tag_count: u64,
    pub link_count: u64,
}
