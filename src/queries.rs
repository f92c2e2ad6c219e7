use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::{
    entities::{link, movie, rating, tag},
    error::ApiResult,
};

pub async fn get_movie(db: &DatabaseConnection, movie_id: i32) -> ApiResult<Option<movie::Model>> {
    Ok(movie::Entity::find_by_id(movie_id).one(db).await?)
}

// SQLite LIKE is ASCII-case-insensitive, so `contains` gives the substring
// semantics both filters want; genre matches against the delimited list, so
// "com" matches "Comedy".
pub async fn get_movies(
    db: &DatabaseConnection,
    skip: u64,
    limit: u64,
    title: Option<&str>,
    genre: Option<&str>,
) -> ApiResult<Vec<movie::Model>> {
    let mut query = movie::Entity::find();
    if let Some(title) = title {
        query = query.filter(movie::Column::Title.contains(title));
    }
    if let Some(genre) = genre {
        query = query.filter(movie::Column::Genres.contains(genre));
    }
    Ok(query.order_by_asc(movie::Column::MovieId).offset(skip).limit(limit).all(db).await?)
}

pub async fn get_rating(
    db: &DatabaseConnection,
    user_id: i32,
    movie_id: i32,
) -> ApiResult<Option<rating::Model>> {
    Ok(rating::Entity::find_by_id((user_id, movie_id)).one(db).await?)
}

pub async fn get_ratings(
    db: &DatabaseConnection,
    skip: u64,
    limit: u64,
    movie_id: Option<i32>,
    user_id: Option<i32>,
    min_rating: Option<f32>,
) -> ApiResult<Vec<rating::Model>> {
    let mut query = rating::Entity::find();
    if let Some(movie_id) = movie_id {
        query = query.filter(rating::Column::MovieId.eq(movie_id));
    }
    if let Some(user_id) = user_id {
        query = query.filter(rating::Column::UserId.eq(user_id));
    }
    if let Some(min_rating) = min_rating {
        query = query.filter(rating::Column::Rating.gte(min_rating));
    }
    Ok(query
        .order_by_asc(rating::Column::UserId)
        .order_by_asc(rating::Column::MovieId)
        .offset(skip)
        .limit(limit)
        .all(db)
        .await?)
}

pub async fn get_tag(
    db: &DatabaseConnection,
    user_id: i32,
    movie_id: i32,
    tag_text: &str,
) -> ApiResult<Option<tag::Model>> {
    Ok(tag::Entity::find_by_id((user_id, movie_id, tag_text.to_string())).one(db).await?)
}

pub async fn get_tags(
    db: &DatabaseConnection,
    skip: u64,
    limit: u64,
    movie_id: Option<i32>,
    user_id: Option<i32>,
) -> ApiResult<Vec<tag::Model>> {
    let mut query = tag::Entity::find();
    if let Some(movie_id) = movie_id {
        query = query.filter(tag::Column::MovieId.eq(movie_id));
    }
    if let Some(user_id) = user_id {
        query = query.filter(tag::Column::UserId.eq(user_id));
    }
    Ok(query
        .order_by_asc(tag::Column::UserId)
        .order_by_asc(tag::Column::MovieId)
        .order_by_asc(tag::Column::Tag)
        .offset(skip)
        .limit(limit)
        .all(db)
        .await?)
}

pub async fn get_link(db: &DatabaseConnection, movie_id: i32) -> ApiResult<Option<link::Model>> {
    Ok(link::Entity::find_by_id(movie_id).one(db).await?)
}

pub async fn get_links(
    db: &DatabaseConnection,
    skip: u64,
    limit: u64,
) -> ApiResult<Vec<link::Model>> {
    Ok(link::Entity::find()
        .order_by_asc(link::Column::MovieId)
        .offset(skip)
        .limit(limit)
        .all(db)
        .await?)
}

pub async fn movie_count(db: &DatabaseConnection) -> ApiResult<u64> {
    Ok(movie::Entity::find().count(db).await?)
}

pub async fn rating_count(db: &DatabaseConnection) -> ApiResult<u64> {
    Ok(rating::Entity::find().count(db).await?)
}

pub async fn tag_count(db: &DatabaseConnection) -> ApiResult<u64> {
    Ok(tag::Entity::find().count(db).await?)
}

pub async fn link_count(db: &DatabaseConnection) -> ApiResult<u64> {
    Ok(link::Entity::find().count(db).await?)
}

pub async fn movie_rating_count(db: &DatabaseConnection, movie_id: i32) -> ApiResult<u64> {
    Ok(rating::Entity::find().filter(rating::Column::MovieId.eq(movie_id)).count(db).await?)
}

pub async fn movie_tag_count(db: &DatabaseConnection, movie_id: i32) -> ApiResult<u64> {
    Ok(tag::Entity::find().filter(tag::Column::MovieId.eq(movie_id)).count(db).await?)
}
