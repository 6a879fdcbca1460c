//! Hotel search.
//!
//! There is no hotel database: every city has the same two hotels, generated
//! from the city name on each call.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: i32,
    pub name: String,
    pub city: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub rating: f64,
}

/// Search parameters. Dates are echoed back, not interpreted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    pub city: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub hotels: Vec<Hotel>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
}

/// Generates the hotels for `query.city`.
pub fn search(query: SearchQuery) -> Result<SearchResults, DomainError> {
    let city = query
        .city
        .filter(|c| !c.trim().is_empty())
        .ok_or(DomainError::MissingField("city"))?;

    Ok(SearchResults {
        hotels: hotels_in(&city),
        check_in: query.check_in,
        check_out: query.check_out,
    })
}

/// Looks up one generated hotel of `city` by id.
pub fn find_hotel(city: &str, id: i32) -> Option<Hotel> {
    hotels_in(city).into_iter().find(|h| h.id == id)
}

fn hotels_in(city: &str) -> Vec<Hotel> {
    vec![
        Hotel {
            id: 1,
            name: format!("Hotel {city} City"),
            city: city.to_string(),
            kind: "City".to_string(),
            description: format!("Modern city hotel in the centre of {city}"),
            rating: 4.5,
        },
        Hotel {
            id: 2,
            name: format!("Hotel {city} Resort"),
            city: city.to_string(),
            kind: "Resort".to_string(),
            description: format!("Resort hotel in {city} overlooking the park"),
            rating: 4.8,
        },
    ]
}
