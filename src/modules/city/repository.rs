use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};

/// A row of the `city` table. The JSON field casing matches the public API
/// contract rather than the column names.
#[derive(FromRow, Serialize, Deserialize, Clone, Debug)]
pub struct City {
    #[serde(rename = "ID")]
    pub id: i32,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "CountryCode")]
    pub countrycode: String,
    #[serde(rename = "District")]
    pub district: String,
    #[serde(rename = "Population")]
    pub population: i32,
}

/// Public projection of a city, without the row id.
#[derive(Serialize, Clone, Debug)]
pub struct CityListing {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "CountryCode")]
    pub countrycode: String,
    #[serde(rename = "District")]
    pub district: String,
    #[serde(rename = "Population")]
    pub population: i32,
}

impl From<City> for CityListing {
    fn from(city: City) -> Self {
        Self {
            name: city.name,
            countrycode: city.countrycode,
            district: city.district,
            population: city.population,
        }
    }
}

pub struct CreateCityPayload {
    pub name: String,
    pub countrycode: String,
    pub district: String,
    pub population: i32,
}

pub enum Error {
    UnexpectedError,
}

/// Inserts a new city. The id is assigned by the table's identity column, so
/// concurrent creates cannot collide.
pub async fn create<'e, E: PgExecutor<'e>>(e: E, payload: CreateCityPayload) -> Result<City, Error> {
    sqlx::query_as::<_, City>(
        "
        INSERT INTO city
        (name, countrycode, district, population)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        ",
    )
    .bind(payload.name)
    .bind(payload.countrycode)
    .bind(payload.district)
    .bind(payload.population)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while trying to create a city: {}", err);
        Error::UnexpectedError
    })
}

/// Names are not unique, so a lookup returns every matching row. The match is
/// exact and case-sensitive.
pub async fn find_many_by_name<'e, E: PgExecutor<'e>>(e: E, name: &str) -> Result<Vec<City>, Error> {
    sqlx::query_as::<_, City>("SELECT * FROM city WHERE name = $1")
        .bind(name)
        .fetch_all(e)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while fetching cities with name {}: {}",
                name,
                err
            );
            Error::UnexpectedError
        })
}

/// Sets the population on all rows matching the name and returns the number
/// of rows touched.
pub async fn update_population_by_name<'e, E: PgExecutor<'e>>(
    e: E,
    name: &str,
    population: i32,
) -> Result<u64, Error> {
    sqlx::query("UPDATE city SET population = $2 WHERE name = $1")
        .bind(name)
        .bind(population)
        .execute(e)
        .await
        .map(|result| result.rows_affected())
        .map_err(|err| {
            tracing::error!(
                "Error occurred while updating cities with name {}: {}",
                name,
                err
            );
            Error::UnexpectedError
        })
}

/// Deletes all rows matching the name and returns the number of rows removed.
pub async fn delete_many_by_name<'e, E: PgExecutor<'e>>(e: E, name: &str) -> Result<u64, Error> {
    sqlx::query("DELETE FROM city WHERE name = $1")
        .bind(name)
        .execute(e)
        .await
        .map(|result| result.rows_affected())
        .map_err(|err| {
            tracing::error!(
                "Error occurred while deleting cities with name {}: {}",
                name,
                err
            );
            Error::UnexpectedError
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn testville() -> City {
        City {
            id: 4084,
            name: "Testville".to_string(),
            countrycode: "TST".to_string(),
            district: "Test".to_string(),
            population: 100,
        }
    }

    #[test]
    fn city_serializes_with_api_field_casing() {
        assert_eq!(
            json!(testville()),
            json!({
                "ID": 4084,
                "Name": "Testville",
                "CountryCode": "TST",
                "District": "Test",
                "Population": 100
            })
        );
    }

    #[test]
    fn listing_carries_exactly_the_four_public_fields() {
        let value = json!(CityListing::from(testville()));

        assert_eq!(
            value,
            json!({
                "Name": "Testville",
                "CountryCode": "TST",
                "District": "Test",
                "Population": 100
            })
        );
        assert!(value.get("ID").is_none());
    }
}
