//! Person use cases.

use crate::domain::{NewPerson, Person, PersonQuery, PersonView};
use crate::error::AppError;
use crate::infra::get_connection;
use crate::infra::DbPool;
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use uuid::Uuid;

pub const FOOD_TO_ADD: &str = "hamburger";
pub const AGE_TO_SET: i64 = 20;
pub const NAME_TO_REMOVE: &str = "Mary";
pub const FOOD_TO_SEARCH: &str = "burrito";
pub const QUERY_CHAIN_LIMIT: u32 = 2;

const PERSON_COLUMNS: &str = "id, name, age, favorite_foods, version, created_at, updated_at";

const HAS_FOOD: &str =
    "EXISTS (SELECT 1 FROM json_each(persons.favorite_foods) WHERE json_each.value = ?1)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveOutcome {
    pub ok: bool,
    pub deleted_count: usize,
}

fn row_to_person(row: &Row<'_>) -> rusqlite::Result<Person> {
    let foods: String = row.get(3)?;
    let favorite_foods = serde_json::from_str(&foods)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
    Ok(Person {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        favorite_foods,
        version: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn fetch_by_id(conn: &Connection, id: &str) -> Result<Option<Person>, AppError> {
    let sql = format!("SELECT {} FROM persons WHERE id = ?1", PERSON_COLUMNS);
    Ok(conn.query_row(&sql, [id], row_to_person).optional()?)
}

fn insert_person(conn: &Connection, req: NewPerson, now: &str) -> Result<Person, AppError> {
    let id = Uuid::new_v4().to_string();
    let foods = serde_json::to_string(&req.favorite_foods)?;
    conn.execute(
        "INSERT INTO persons (id, name, age, favorite_foods, version, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)",
        params![id, req.name, req.age, foods, now],
    )?;
    log::debug!("inserted person {} ({})", id, req.name);

    Ok(Person {
        id,
        name: req.name,
        age: req.age,
        favorite_foods: req.favorite_foods,
        version: 0,
        created_at: now.to_string(),
        updated_at: now.to_string(),
    })
}

/// Validate and insert a single document.
pub fn create_and_save_person(pool: &DbPool, req: NewPerson) -> Result<Person, AppError> {
    let req = req.validated()?;
    let now = Utc::now().to_rfc3339();
    let conn = get_connection(pool)?;
    insert_person(&conn, req, &now)
}

/// Insert every record or none of them. Output order follows input order.
pub fn create_many_people(pool: &DbPool, people: Vec<NewPerson>) -> Result<Vec<Person>, AppError> {
    let people = people
        .into_iter()
        .map(NewPerson::validated)
        .collect::<Result<Vec<_>, _>>()?;
    if people.is_empty() {
        return Ok(Vec::new());
    }
    let now = Utc::now().to_rfc3339();

    let mut conn = get_connection(pool)?;
    let tx = conn.transaction()?;
    let mut out = Vec::with_capacity(people.len());
    for req in people {
        out.push(insert_person(&tx, req, &now)?);
    }
    tx.commit()?;
    Ok(out)
}

pub fn find_people_by_name(pool: &DbPool, name: &str) -> Result<Vec<Person>, AppError> {
    let conn = get_connection(pool)?;
    let sql = format!(
        "SELECT {} FROM persons WHERE name = ?1 ORDER BY rowid",
        PERSON_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([name.trim()], row_to_person)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// First document (insertion order) whose favorite foods include `food`.
pub fn find_one_by_food(pool: &DbPool, food: &str) -> Result<Option<Person>, AppError> {
    let conn = get_connection(pool)?;
    let sql = format!(
        "SELECT {} FROM persons WHERE {} ORDER BY rowid LIMIT 1",
        PERSON_COLUMNS, HAS_FOOD
    );
    Ok(conn.query_row(&sql, [food], row_to_person).optional()?)
}

pub fn find_person_by_id(pool: &DbPool, id: &str) -> Result<Option<Person>, AppError> {
    let conn = get_connection(pool)?;
    fetch_by_id(&conn, id)
}

/// Load by id, append [`FOOD_TO_ADD`], save the whole document back.
pub fn find_edit_then_save(pool: &DbPool, id: &str) -> Result<Person, AppError> {
    find_edit_then_save_with(pool, id, FOOD_TO_ADD)
}

pub fn find_edit_then_save_with(pool: &DbPool, id: &str, food: &str) -> Result<Person, AppError> {
    let now = Utc::now().to_rfc3339();
    let conn = get_connection(pool)?;

    let mut person =
        fetch_by_id(&conn, id)?.ok_or_else(|| AppError::NotFound(format!("person {}", id)))?;
    person.favorite_foods.push(food.to_string());
    person.version += 1;
    person.updated_at = now;

    let foods = serde_json::to_string(&person.favorite_foods)?;
    conn.execute(
        "UPDATE persons SET name = ?1, age = ?2, favorite_foods = ?3, version = ?4, updated_at = ?5 WHERE id = ?6",
        params![
            &person.name,
            person.age,
            foods,
            person.version,
            &person.updated_at,
            &person.id
        ],
    )?;
    log::debug!("saved person {} (version {})", person.id, person.version);
    Ok(person)
}

/// Set the age of the first document named `name` to [`AGE_TO_SET`] and
/// return the updated document.
pub fn find_and_update(pool: &DbPool, name: &str) -> Result<Option<Person>, AppError> {
    find_and_update_with(pool, name, AGE_TO_SET)
}

pub fn find_and_update_with(
    pool: &DbPool,
    name: &str,
    age: i64,
) -> Result<Option<Person>, AppError> {
    let now = Utc::now().to_rfc3339();
    let mut conn = get_connection(pool)?;
    let tx = conn.transaction()?;

    let id: Option<String> = tx
        .query_row(
            "SELECT id FROM persons WHERE name = ?1 ORDER BY rowid LIMIT 1",
            [name.trim()],
            |r| r.get(0),
        )
        .optional()?;
    let Some(id) = id else {
        return Ok(None);
    };

    tx.execute(
        "UPDATE persons SET age = ?1, updated_at = ?2 WHERE id = ?3",
        params![age, &now, &id],
    )?;
    let updated = fetch_by_id(&tx, &id)?;
    tx.commit()?;
    log::debug!("set age {} on person {}", age, id);
    Ok(updated)
}

/// Delete by id, returning the removed document.
pub fn remove_by_id(pool: &DbPool, id: &str) -> Result<Option<Person>, AppError> {
    let mut conn = get_connection(pool)?;
    let tx = conn.transaction()?;
    let Some(person) = fetch_by_id(&tx, id)? else {
        return Ok(None);
    };
    tx.execute("DELETE FROM persons WHERE id = ?1", [id])?;
    tx.commit()?;
    log::debug!("removed person {}", id);
    Ok(Some(person))
}

/// Delete every document named [`NAME_TO_REMOVE`].
pub fn remove_many_people(pool: &DbPool) -> Result<RemoveOutcome, AppError> {
    remove_many_people_named(pool, NAME_TO_REMOVE)
}

pub fn remove_many_people_named(pool: &DbPool, name: &str) -> Result<RemoveOutcome, AppError> {
    let conn = get_connection(pool)?;
    let deleted_count = conn.execute("DELETE FROM persons WHERE name = ?1", [name.trim()])?;
    log::debug!("removed {} person(s) named {}", deleted_count, name);
    Ok(RemoveOutcome {
        ok: true,
        deleted_count,
    })
}

/// Burrito lovers, sorted by name, at most two, age hidden.
pub fn query_chain(pool: &DbPool) -> Result<Vec<PersonView>, AppError> {
    let query = PersonQuery::by_food(FOOD_TO_SEARCH).limit(QUERY_CHAIN_LIMIT);
    let people = query_chain_with(pool, &query)?;
    Ok(people.into_iter().map(PersonView::from).collect())
}

pub fn query_chain_with(pool: &DbPool, query: &PersonQuery) -> Result<Vec<Person>, AppError> {
    let conn = get_connection(pool)?;
    // 0 means no limit; SQLite treats a negative LIMIT as unbounded.
    let limit = match query.limit {
        None | Some(0) => -1,
        Some(n) => i64::from(n),
    };
    let sql = format!(
        "SELECT {} FROM persons WHERE {} ORDER BY name {}, rowid LIMIT ?2",
        PERSON_COLUMNS,
        HAS_FOOD,
        query.name_order.as_sql()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![&query.food, limit], row_to_person)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
