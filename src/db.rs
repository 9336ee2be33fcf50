use crate::models::car::{CarMake, CarModel, CarType, NewCarMake, NewCarModel};
use rusqlite::{Connection, Error, OptionalExtension, Row};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

const MODEL_SELECT: &str = "SELECT m.id, m.name, m.dealer_id, m.type, m.year,
        k.id, k.name, k.description
    FROM car_model m
    JOIN car_make k ON k.id = m.make_id";

// Catalog of car makes and their models
#[derive(Debug, Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    // Open (or create) the catalog database
    pub fn open(db_path: &str) -> Result<Self, Error> {
        let conn = Connection::open(db_path)?;
        // cascade delete depends on this
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        info!("[DB] Connection established at: {}", db_path);
        Ok(Database {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub async fn create_schema(&self) -> Result<(), Error> {
        let conn = self.conn.lock().await;

        // 1. Makes
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS car_make (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL DEFAULT 'Unknown',
                description TEXT NOT NULL DEFAULT ''
            );",
        )
        .map_err(|e| {
            tracing::error!("[DB] Failed creating car_make table: {}", e);
            e
        })?;

        // 2. Models, owned by a make
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS car_model (
                id INTEGER PRIMARY KEY,
                make_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                dealer_id INTEGER NOT NULL,
                type TEXT NOT NULL,
                year DATE NOT NULL,
                FOREIGN KEY (make_id) REFERENCES car_make(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_car_model_make ON car_model(make_id);",
        )
        .map_err(|e| {
            tracing::error!("[DB] Failed creating car_model table: {}", e);
            e
        })?;

        info!("[DB] Schema ready");
        Ok(())
    }

    pub async fn insert_make(&self, make: &NewCarMake) -> Result<CarMake, Error> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO car_make (name, description) VALUES (?, ?)",
            [&make.name, &make.description],
        )?;
        let id = conn.last_insert_rowid();
        info!("[DB] Make inserted: {} (ID: {})", make.name, id);
        Ok(CarMake {
            id,
            name: make.name.clone(),
            description: make.description.clone(),
        })
    }

    pub async fn list_makes(&self) -> Result<Vec<CarMake>, Error> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("SELECT id, name, description FROM car_make ORDER BY id")?;
        let makes = stmt.query_map([], |row| {
            Ok(CarMake {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
            })
        })?;
        let result = makes.collect::<Result<Vec<_>, _>>()?;
        debug!("[DB] Fetched {} makes", result.len());
        Ok(result)
    }

    // Inserts a model under an existing make; None when the make does not exist
    pub async fn insert_model(&self, model: &NewCarModel) -> Result<Option<CarModel>, Error> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        let make = tx
            .query_row(
                "SELECT id, name, description FROM car_make WHERE id = ?",
                [model.make_id],
                |row| {
                    Ok(CarMake {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        description: row.get(2)?,
                    })
                },
            )
            .optional()?;

        let make = match make {
            Some(make) => make,
            None => {
                debug!("[DB] Make {} not found, model not inserted", model.make_id);
                return Ok(None);
            }
        };

        tx.execute(
            "INSERT INTO car_model (make_id, name, dealer_id, type, year) VALUES (?, ?, ?, ?, ?)",
            rusqlite::params![
                model.make_id,
                &model.name,
                model.dealer_id,
                model.car_type.as_str(),
                model.year
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        info!("[DB] Model inserted: {} (ID: {})", model.name, id);

        Ok(Some(CarModel {
            id,
            make,
            name: model.name.clone(),
            dealer_id: model.dealer_id,
            car_type: model.car_type.clone(),
            year: model.year,
        }))
    }

    // All models, each joined with its make
    pub async fn list_models(&self) -> Result<Vec<CarModel>, Error> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!("{MODEL_SELECT} ORDER BY m.id"))?;
        let models = stmt.query_map([], model_from_row)?;
        let result = models.collect::<Result<Vec<_>, _>>()?;
        debug!("[DB] Fetched {} models", result.len());
        Ok(result)
    }

    pub async fn get_model(&self, id: i64) -> Result<Option<CarModel>, Error> {
        let conn = self.conn.lock().await;
        conn.query_row(&format!("{MODEL_SELECT} WHERE m.id = ?"), [id], model_from_row)
            .optional()
    }

    // Deletes a make together with all of its models
    pub async fn delete_make(&self, id: i64) -> Result<bool, Error> {
        let conn = self.conn.lock().await;
        let deleted = conn.execute("DELETE FROM car_make WHERE id = ?", [id])?;
        info!("[DB] Make deleted: {} ({} rows)", id, deleted);
        Ok(deleted > 0)
    }
}

fn model_from_row(row: &Row<'_>) -> Result<CarModel, Error> {
    Ok(CarModel {
        id: row.get(0)?,
        name: row.get(1)?,
        dealer_id: row.get(2)?,
        car_type: CarType::from(row.get::<_, String>(3)?),
        year: row.get(4)?,
        make: CarMake {
            id: row.get(5)?,
            name: row.get(6)?,
            description: row.get(7)?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::car::UNKNOWN_MAKE;
    use chrono::NaiveDate;

    // Helper function to create test database
    async fn create_test_db() -> Database {
        let db = Database::open(":memory:").unwrap();
        db.create_schema().await.unwrap();
        db
    }

    fn new_model(make_id: i64, name: &str, year: i32) -> NewCarModel {
        NewCarModel {
            make_id,
            name: name.into(),
            dealer_id: 15,
            car_type: CarType::Suv,
            year: NaiveDate::from_ymd_opt(year, 1, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_schema_creation() {
        let db = create_test_db().await;
        // running it twice must be harmless
        db.create_schema().await.unwrap();

        let conn = db.conn.lock().await;
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap();
        let tables: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert!(tables.contains(&"car_make".to_string()));
        assert!(tables.contains(&"car_model".to_string()));
    }

    #[tokio::test]
    async fn test_make_and_model_lifecycle() {
        let db = create_test_db().await;
        let make = db
            .insert_make(&NewCarMake {
                name: "Subaru".into(),
                description: "AWD everything".into(),
            })
            .await
            .unwrap();
        assert!(make.id > 0);

        let model = db
            .insert_model(&new_model(make.id, "Outback", 2022))
            .await
            .unwrap()
            .expect("make exists");
        assert_eq!(model.make, make);

        let stored = db.get_model(model.id).await.unwrap().unwrap();
        assert_eq!(stored, model);
        assert_eq!(stored.model_year(), 2022);
        assert_eq!(stored.car_type, CarType::Suv);

        let all = db.list_models().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(db.list_makes().await.unwrap(), vec![make]);
    }

    #[tokio::test]
    async fn test_unknown_model_and_make() {
        let db = create_test_db().await;
        assert!(db.get_model(99).await.unwrap().is_none());
        assert!(db
            .insert_model(&new_model(42, "Ghost", 2020))
            .await
            .unwrap()
            .is_none());
        assert!(db.list_models().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_make_cascades_to_models() {
        let db = create_test_db().await;
        let kept = db
            .insert_make(&NewCarMake {
                name: "Mazda".into(),
                description: String::new(),
            })
            .await
            .unwrap();
        let dropped = db
            .insert_make(&NewCarMake {
                name: "Saab".into(),
                description: String::new(),
            })
            .await
            .unwrap();
        db.insert_model(&new_model(kept.id, "CX-5", 2021)).await.unwrap();
        db.insert_model(&new_model(dropped.id, "9-3", 2010)).await.unwrap();
        db.insert_model(&new_model(dropped.id, "9-5", 2011)).await.unwrap();

        assert!(db.delete_make(dropped.id).await.unwrap());
        let remaining = db.list_models().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].make.name, "Mazda");

        assert!(!db.delete_make(dropped.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_make_name_defaults_to_unknown() {
        let db = create_test_db().await;
        let make: NewCarMake = serde_json::from_str(r#"{"description":"no name given"}"#).unwrap();
        let stored = db.insert_make(&make).await.unwrap();
        assert_eq!(stored.name, UNKNOWN_MAKE);
    }
}
