//! Loosely typed review filter built from raw query parameters.
//!
//! Any query key is accepted. Keys naming a review field are cast to that
//! field's type; keys naming nothing the document has make the filter match
//! no review at all. There is no allow-list beyond the field mapping, so a
//! caller can match on any stored field, including another user's name.

pub mod error;

use std::collections::HashMap;

use uuid::Uuid;

use crate::database::models::Review;
pub use error::FilterError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewFilter {
    pub id: Option<Uuid>,
    pub movie_id: Option<Uuid>,
    pub username: Option<String>,
    pub review: Option<String>,
    pub rating: Option<f64>,
    /// Keys that name no review field, kept for logging
    pub unknown: Vec<String>,
}

impl ReviewFilter {
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, FilterError> {
        let mut filter = ReviewFilter::default();

        // Sorted for deterministic error reporting
        let mut keys: Vec<&String> = query.keys().collect();
        keys.sort();

        for key in keys {
            let value = &query[key];
            match key.as_str() {
                "_id" | "id" => filter.id = Some(parse_uuid(key, value)?),
                "movieId" => filter.movie_id = Some(parse_uuid(key, value)?),
                "username" => filter.username = Some(value.clone()),
                "review" => filter.review = Some(value.clone()),
                "rating" => {
                    let rating = value.trim().parse::<f64>().ok().filter(|r| r.is_finite());
                    filter.rating = Some(rating.ok_or_else(|| FilterError::InvalidValue {
                        field: key.clone(),
                        kind: "Number",
                        value: value.clone(),
                    })?);
                }
                _ => filter.unknown.push(key.clone()),
            }
        }

        Ok(filter)
    }

    /// True when an unknown field is part of the filter
    pub fn matches_nothing(&self) -> bool {
        !self.unknown.is_empty()
    }

    pub fn matches(&self, review: &Review) -> bool {
        if self.matches_nothing() {
            return false;
        }
        self.id.map_or(true, |id| review.id == id)
            && self.movie_id.map_or(true, |id| review.movie_id == id)
            && self.username.as_ref().map_or(true, |u| review.username.as_ref() == Some(u))
            && self.review.as_ref().map_or(true, |t| review.review.as_ref() == Some(t))
            && self.rating.map_or(true, |r| review.rating == Some(r))
    }
}

fn parse_uuid(field: &str, value: &str) -> Result<Uuid, FilterError> {
    Uuid::parse_str(value.trim()).map_err(|_| FilterError::InvalidValue {
        field: field.to_string(),
        kind: "ObjectId",
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn review(movie_id: Uuid, username: &str, rating: f64) -> Review {
        Review {
            id: Uuid::new_v4(),
            movie_id,
            username: Some(username.to_string()),
            review: Some("ok".to_string()),
            rating: Some(rating),
        }
    }

    #[test]
    fn empty_query_matches_everything() {
        let filter = ReviewFilter::from_query(&HashMap::new()).unwrap();
        assert!(filter.matches(&review(Uuid::new_v4(), "ada", 3.0)));
    }

    #[test]
    fn casts_known_fields() {
        let movie_id = Uuid::new_v4();
        let filter = ReviewFilter::from_query(&query(&[
            ("movieId", &movie_id.to_string()),
            ("rating", "4"),
        ]))
        .unwrap();

        assert_eq!(filter.movie_id, Some(movie_id));
        assert_eq!(filter.rating, Some(4.0));
        assert!(filter.matches(&review(movie_id, "ada", 4.0)));
        assert!(!filter.matches(&review(movie_id, "ada", 5.0)));
        assert!(!filter.matches(&review(Uuid::new_v4(), "ada", 4.0)));
    }

    #[test]
    fn uncastable_values_are_errors() {
        let err = ReviewFilter::from_query(&query(&[("rating", "great")])).unwrap_err();
        assert!(matches!(err, FilterError::InvalidValue { kind: "Number", .. }));

        let err = ReviewFilter::from_query(&query(&[("movieId", "not-an-id")])).unwrap_err();
        assert!(matches!(err, FilterError::InvalidValue { kind: "ObjectId", .. }));
    }

    #[test]
    fn unknown_field_matches_nothing() {
        let filter = ReviewFilter::from_query(&query(&[("director", "Mann")])).unwrap();
        assert!(filter.matches_nothing());
        assert!(!filter.matches(&review(Uuid::new_v4(), "ada", 3.0)));
    }
}
