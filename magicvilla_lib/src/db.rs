//! SQLite storage for villas.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::types::{VillaCreateDto, VillaDto, VillaID, VillaUpdateDto};

const SCHEMA_VERSION: i32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("date parse error: {0}")]
    Date(#[from] chrono::ParseError),
}

/// A stored villa row.
#[derive(Debug, Clone, PartialEq)]
pub struct Villa {
    pub id: VillaID,
    pub name: String,
    pub details: Option<String>,
    pub rate: f64,
    pub sqft: i32,
    pub occupancy: i32,
    pub image_url: Option<String>,
    pub amenity: Option<String>,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

impl From<Villa> for VillaDto {
    fn from(villa: Villa) -> Self {
        Self {
            id: villa.id,
            name: villa.name,
            details: villa.details,
            rate: villa.rate,
            sqft: villa.sqft,
            occupancy: villa.occupancy,
            image_url: villa.image_url,
            amenity: villa.amenity,
        }
    }
}

impl From<&Villa> for VillaUpdateDto {
    fn from(villa: &Villa) -> Self {
        Self {
            id: villa.id,
            name: villa.name.clone(),
            details: villa.details.clone(),
            rate: villa.rate,
            sqft: villa.sqft,
            occupancy: villa.occupancy,
            image_url: villa.image_url.clone(),
            amenity: villa.amenity.clone(),
        }
    }
}

/// Predicate for repository lookups. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct VillaFilter {
    pub id: Option<VillaID>,
    /// Exact, case-insensitive name match.
    pub name: Option<String>,
}

impl VillaFilter {
    pub fn by_id(id: VillaID) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

pub struct Db {
    conn: Connection,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    pub fn init(&self) -> Result<(), DbError> {
        let version: i32 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        let schema = include_str!("../schema/sqlite.sql");
        self.conn.execute_batch(schema)?;

        if version < SCHEMA_VERSION {
            self.conn
                .pragma_update(None, "user_version", SCHEMA_VERSION)?;
        }

        Ok(())
    }

    /// All villas matching `filter`, ordered by id.
    pub fn get_all(&self, filter: Option<&VillaFilter>) -> Result<Vec<Villa>, DbError> {
        let mut sql = String::from(
            "SELECT id, name, details, rate, sqft, occupancy, image_url, amenity,
                    created_date, updated_date
             FROM villas
             WHERE 1=1",
        );

        let mut params_vec: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(filter) = filter {
            if let Some(id) = filter.id {
                params_vec.push(Box::new(id));
                sql.push_str(&format!(" AND id = ?{}", params_vec.len()));
            }
            if let Some(ref name) = filter.name {
                params_vec.push(Box::new(name.clone()));
                sql.push_str(&format!(
                    " AND name = ?{} COLLATE NOCASE",
                    params_vec.len()
                ));
            }
        }

        sql.push_str(" ORDER BY id");

        let param_refs: Vec<&dyn rusqlite::types::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(param_refs.as_slice(), read_row)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?.into_villa()?);
        }
        Ok(result)
    }

    /// First villa matching `filter`.
    pub fn get(&self, filter: &VillaFilter) -> Result<Option<Villa>, DbError> {
        Ok(self.get_all(Some(filter))?.into_iter().next())
    }

    /// Inserts a villa and returns it with its assigned id and timestamps.
    pub fn create(&self, new: &VillaCreateDto) -> Result<Villa, DbError> {
        let now = Utc::now();
        let stamp = now.to_rfc3339();
        self.conn.execute(
            "INSERT INTO villas (name, details, rate, sqft, occupancy, image_url, amenity,
                                 created_date, updated_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
            params![
                new.name,
                new.details,
                new.rate,
                new.sqft,
                new.occupancy,
                new.image_url,
                new.amenity,
                stamp,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!("Created villa {} ({})", id, new.name);

        Ok(Villa {
            id,
            name: new.name.clone(),
            details: new.details.clone(),
            rate: new.rate,
            sqft: new.sqft,
            occupancy: new.occupancy,
            image_url: new.image_url.clone(),
            amenity: new.amenity.clone(),
            created_date: now,
            updated_date: now,
        })
    }

    /// Overwrites every field of villa `update.id` and bumps `updated_date`.
    /// Returns false when no such villa exists.
    pub fn update(&self, update: &VillaUpdateDto) -> Result<bool, DbError> {
        let changed = self.conn.execute(
            "UPDATE villas
             SET name = ?1, details = ?2, rate = ?3, sqft = ?4, occupancy = ?5,
                 image_url = ?6, amenity = ?7, updated_date = ?8
             WHERE id = ?9",
            params![
                update.name,
                update.details,
                update.rate,
                update.sqft,
                update.occupancy,
                update.image_url,
                update.amenity,
                Utc::now().to_rfc3339(),
                update.id,
            ],
        )?;
        Ok(changed > 0)
    }

    /// Deletes villa `id`. Returns false when no such villa exists.
    pub fn remove(&self, id: VillaID) -> Result<bool, DbError> {
        let changed = self
            .conn
            .execute("DELETE FROM villas WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    pub fn count(&self) -> Result<i64, DbError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM villas", [], |row| row.get(0))?;
        Ok(count)
    }
}

/// Columns as stored, before timestamp parsing.
struct VillaRow {
    id: VillaID,
    name: String,
    details: Option<String>,
    rate: f64,
    sqft: i32,
    occupancy: i32,
    image_url: Option<String>,
    amenity: Option<String>,
    created_date: String,
    updated_date: String,
}

impl VillaRow {
    fn into_villa(self) -> Result<Villa, DbError> {
        Ok(Villa {
            id: self.id,
            name: self.name,
            details: self.details,
            rate: self.rate,
            sqft: self.sqft,
            occupancy: self.occupancy,
            image_url: self.image_url,
            amenity: self.amenity,
            created_date: parse_timestamp(&self.created_date)?,
            updated_date: parse_timestamp(&self.updated_date)?,
        })
    }
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<VillaRow> {
    Ok(VillaRow {
        id: row.get(0)?,
        name: row.get(1)?,
        details: row.get(2)?,
        rate: row.get(3)?,
        sqft: row.get(4)?,
        occupancy: row.get(5)?,
        image_url: row.get(6)?,
        amenity: row.get(7)?,
        created_date: row.get(8)?,
        updated_date: row.get(9)?,
    })
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DbError> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_test_db() -> Db {
        let db = Db::open_in_memory().expect("open in-memory db");
        db.init().expect("init schema");
        db
    }

    fn get_user_version(db: &Db) -> i32 {
        db.conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .expect("read user_version")
    }

    fn sample(name: &str) -> VillaCreateDto {
        VillaCreateDto {
            name: name.to_string(),
            details: Some("Sea view".to_string()),
            rate: 200.0,
            sqft: 550,
            occupancy: 4,
            image_url: None,
            amenity: Some("Pool".to_string()),
        }
    }

    #[test]
    fn init_sets_schema_version() {
        let db = open_test_db();
        assert_eq!(get_user_version(&db), SCHEMA_VERSION);
        // Running init again is harmless.
        db.init().expect("re-init");
        assert_eq!(get_user_version(&db), SCHEMA_VERSION);
    }

    #[test]
    fn create_assigns_increasing_ids() {
        let db = open_test_db();
        let a = db.create(&sample("Royal Villa")).unwrap();
        let b = db.create(&sample("Pool Villa")).unwrap();
        assert!(b.id > a.id);
        assert_eq!(a.created_date, a.updated_date);
        assert_eq!(db.count().unwrap(), 2);
    }

    #[test]
    fn get_by_id_and_name() {
        let db = open_test_db();
        let created = db.create(&sample("Royal Villa")).unwrap();

        let by_id = db.get(&VillaFilter::by_id(created.id)).unwrap().unwrap();
        assert_eq!(by_id.name, "Royal Villa");
        assert_eq!(by_id.amenity.as_deref(), Some("Pool"));

        let by_name = db.get(&VillaFilter::by_name("royal villa")).unwrap();
        assert_eq!(by_name.map(|v| v.id), Some(created.id));

        assert!(db.get(&VillaFilter::by_id(999)).unwrap().is_none());
    }

    #[test]
    fn get_all_orders_by_id_and_applies_filter() {
        let db = open_test_db();
        db.create(&sample("A")).unwrap();
        db.create(&sample("B")).unwrap();
        db.create(&sample("C")).unwrap();

        let all = db.get_all(None).unwrap();
        let names: Vec<_> = all.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);

        let filtered = db.get_all(Some(&VillaFilter::by_name("b"))).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "B");

        let both = VillaFilter {
            id: Some(all[0].id),
            name: Some("B".to_string()),
        };
        assert!(db.get_all(Some(&both)).unwrap().is_empty());
    }

    #[test]
    fn update_overwrites_fields() {
        let db = open_test_db();
        let created = db.create(&sample("Royal Villa")).unwrap();

        let mut dto = VillaUpdateDto::from(&created);
        dto.name = "Royal Villa Deluxe".to_string();
        dto.rate = 350.0;
        dto.amenity = None;
        assert!(db.update(&dto).unwrap());

        let stored = db.get(&VillaFilter::by_id(created.id)).unwrap().unwrap();
        assert_eq!(stored.name, "Royal Villa Deluxe");
        assert_eq!(stored.rate, 350.0);
        assert!(stored.amenity.is_none());
        assert_eq!(stored.created_date, created.created_date);
        assert!(stored.updated_date >= created.updated_date);
    }

    #[test]
    fn update_missing_returns_false() {
        let db = open_test_db();
        let dto = VillaUpdateDto {
            id: 77,
            name: "Ghost".to_string(),
            ..Default::default()
        };
        assert!(!db.update(&dto).unwrap());
    }

    #[test]
    fn remove_deletes_once() {
        let db = open_test_db();
        let created = db.create(&sample("Royal Villa")).unwrap();
        assert!(db.remove(created.id).unwrap());
        assert!(!db.remove(created.id).unwrap());
        assert_eq!(db.count().unwrap(), 0);
    }

    #[test]
    fn villa_maps_to_dto() {
        let db = open_test_db();
        let created = db.create(&sample("Royal Villa")).unwrap();
        let dto = VillaDto::from(created.clone());
        assert_eq!(dto.id, created.id);
        assert_eq!(dto.details.as_deref(), Some("Sea view"));
        assert_eq!(dto.sqft, 550);
    }

    #[test]
    fn open_on_disk_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("villas.db");
        {
            let db = Db::open(&path).unwrap();
            db.init().unwrap();
            db.create(&sample("Persisted")).unwrap();
        }
        let db = Db::open(&path).unwrap();
        db.init().unwrap();
        assert_eq!(db.count().unwrap(), 1);
    }
}
