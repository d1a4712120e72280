use crate::domain::entities::catalog_entry::CatalogEntry;
use crate::domain::entities::product::{NewProduct, Product, ProductUpdate};
use crate::domain::error::DomainError;
use crate::domain::ports::product_repository::*;
use crate::domain::values::price::Price;
use crate::domain::values::product_id::ProductId;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Mutex;

const SELECT_COLS: &str =
    "id, name, description, price_cents, image_path, embedding, created_at, updated_at";

/// Matches rows whose BLOB decodes to a vector. Must agree with `deserialize_vector`.
const HAS_VECTOR: &str =
    "embedding IS NOT NULL AND length(embedding) > 0 AND length(embedding) % 4 = 0";

pub struct SqliteProductRepo {
    conn: Mutex<Connection>,
}

impl SqliteProductRepo {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, DomainError> {
        self.conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    pub(crate) fn serialize_vector(v: &[f32]) -> Vec<u8> {
        v.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// A blob that is empty or not a whole number of `f32`s reads as absent.
    pub(crate) fn deserialize_vector(bytes: &[u8]) -> Option<Vec<f32>> {
        if bytes.is_empty() || bytes.len() % 4 != 0 {
            return None;
        }
        Some(
            bytes
                .chunks_exact(4)
                .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                .collect(),
        )
    }

    fn parse_time(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| {
                tracing::warn!(value = s, "invalid timestamp in products table");
                Utc::now()
            })
    }

    fn row_to_product(row: &rusqlite::Row) -> Result<Product, rusqlite::Error> {
        let price_cents: i64 = row.get(3)?;
        let blob: Option<Vec<u8>> = row.get(5)?;
        let created_str: String = row.get(6)?;
        let updated_str: String = row.get(7)?;

        Ok(Product {
            id: ProductId::new(row.get(0)?),
            name: row.get(1)?,
            description: row.get(2)?,
            price: Price::from_cents(price_cents).unwrap_or_default(),
            image_path: row.get(4)?,
            embedding: blob.as_deref().and_then(Self::deserialize_vector),
            created_at: Self::parse_time(&created_str),
            updated_at: Self::parse_time(&updated_str),
        })
    }

    fn fetch(conn: &Connection, id: ProductId) -> Result<Option<Product>, DomainError> {
        let sql = format!("SELECT {SELECT_COLS} FROM products WHERE id = ?1");
        conn.query_row(&sql, params![id.value()], Self::row_to_product)
            .optional()
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    fn query_products(
        conn: &Connection,
        sql: &str,
        params: &[&dyn rusqlite::types::ToSql],
    ) -> Result<Vec<Product>, DomainError> {
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let products = stmt
            .query_map(params, Self::row_to_product)
            .map_err(|e| DomainError::Database(e.to_string()))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(products)
    }
}

impl ProductRepository for SqliteProductRepo {
    fn insert(&self, product: &NewProduct) -> Result<Product, DomainError> {
        let conn = self.lock()?;
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO products (name, description, price_cents, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                product.name,
                product.description,
                product.price.cents(),
                now,
                now,
            ],
        )
        .map_err(|e| DomainError::Database(format!("Failed to add product: {e}")))?;
        let id = ProductId::new(conn.last_insert_rowid());
        Self::fetch(&conn, id)?
            .ok_or_else(|| DomainError::Database(format!("Product {id} missing after insert")))
    }

    fn get(&self, id: ProductId) -> Result<Option<Product>, DomainError> {
        let conn = self.lock()?;
        Self::fetch(&conn, id)
    }

    fn list(&self, filter: &ListFilter) -> Result<Vec<Product>, DomainError> {
        let conn = self.lock()?;
        let limit = filter.limit.map(|l| l as i64).unwrap_or(-1);
        let offset = filter.offset.unwrap_or(0) as i64;
        let sql =
            format!("SELECT {SELECT_COLS} FROM products ORDER BY id ASC LIMIT ?1 OFFSET ?2");
        Self::query_products(&conn, &sql, &[&limit, &offset])
    }

    fn update(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<Option<Product>, DomainError> {
        let conn = self.lock()?;
        if update.is_empty() {
            return Self::fetch(&conn, id);
        }

        let mut sql = String::from("UPDATE products SET updated_at = ?1");
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> =
            vec![Box::new(Utc::now().to_rfc3339())];

        if let Some(name) = &update.name {
            sql.push_str(&format!(", name = ?{}", param_values.len() + 1));
            param_values.push(Box::new(name.clone()));
        }
        if let Some(description) = &update.description {
            sql.push_str(&format!(", description = ?{}", param_values.len() + 1));
            param_values.push(Box::new(description.clone()));
        }
        if let Some(price) = &update.price {
            sql.push_str(&format!(", price_cents = ?{}", param_values.len() + 1));
            param_values.push(Box::new(price.cents()));
        }
        sql.push_str(&format!(" WHERE id = ?{}", param_values.len() + 1));
        param_values.push(Box::new(id.value()));

        let params_refs: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        let changed = conn
            .execute(&sql, params_refs.as_slice())
            .map_err(|e| DomainError::Database(format!("Failed to update product: {e}")))?;
        if changed == 0 {
            return Ok(None);
        }
        Self::fetch(&conn, id)
    }

    fn delete(&self, id: ProductId) -> Result<bool, DomainError> {
        let conn = self.lock()?;
        let changed = conn
            .execute("DELETE FROM products WHERE id = ?1", params![id.value()])
            .map_err(|e| DomainError::Database(format!("Failed to delete product: {e}")))?;
        Ok(changed > 0)
    }

    fn set_image(
        &self,
        id: ProductId,
        image_path: &str,
        embedding: Option<&[f32]>,
    ) -> Result<(), DomainError> {
        let conn = self.lock()?;
        let blob = embedding.map(Self::serialize_vector);
        let changed = conn
            .execute(
                "UPDATE products SET image_path = ?1, embedding = ?2, updated_at = ?3
                 WHERE id = ?4",
                params![image_path, blob, Utc::now().to_rfc3339(), id.value()],
            )
            .map_err(|e| DomainError::Database(format!("Failed to set image: {e}")))?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("product {id}")));
        }
        Ok(())
    }

    fn set_embedding(&self, id: ProductId, embedding: &[f32]) -> Result<(), DomainError> {
        let conn = self.lock()?;
        let changed = conn
            .execute(
                "UPDATE products SET embedding = ?1, updated_at = ?2 WHERE id = ?3",
                params![Self::serialize_vector(embedding), Utc::now().to_rfc3339(), id.value()],
            )
            .map_err(|e| DomainError::Database(format!("Failed to store embedding: {e}")))?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("product {id}")));
        }
        Ok(())
    }

    fn list_entries(&self) -> Result<Vec<CatalogEntry>, DomainError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT id, embedding FROM products ORDER BY id ASC")
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let entries = stmt
            .query_map([], |row| {
                let id: i64 = row.get(0)?;
                let blob: Option<Vec<u8>> = row.get(1)?;
                Ok(CatalogEntry::new(
                    ProductId::new(id),
                    blob.as_deref().and_then(Self::deserialize_vector),
                ))
            })
            .map_err(|e| DomainError::Database(e.to_string()))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(entries)
    }

    fn missing_embeddings(&self) -> Result<Vec<Product>, DomainError> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {SELECT_COLS} FROM products
             WHERE image_path IS NOT NULL AND NOT ({HAS_VECTOR}) ORDER BY id ASC"
        );
        Self::query_products(&conn, &sql, &[])
    }

    fn stats(&self) -> Result<CatalogStats, DomainError> {
        let conn = self.lock()?;
        let total: usize = conn
            .query_row("SELECT COUNT(*) FROM products", [], |r| r.get(0))
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let embedded: usize = conn
            .query_row(
                &format!("SELECT COUNT(*) FROM products WHERE {HAS_VECTOR}"),
                [],
                |r| r.get(0),
            )
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT length(embedding) / 4 AS dim, COUNT(*) AS cnt FROM products
                 WHERE {HAS_VECTOR} GROUP BY dim ORDER BY cnt DESC, dim ASC"
            ))
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let dimensions = stmt
            .query_map([], |row| {
                Ok(DimensionCount {
                    dimension: row.get(0)?,
                    count: row.get(1)?,
                })
            })
            .map_err(|e| DomainError::Database(e.to_string()))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(CatalogStats {
            total_products: total,
            embedded_products: embedded,
            dimensions,
        })
    }

    fn stored_dimension(&self) -> Result<Option<usize>, DomainError> {
        Ok(self.stats()?.dimensions.first().map(|d| d.dimension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::sqlite::migrations::run_migrations;

    fn repo() -> SqliteProductRepo {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        SqliteProductRepo::new(conn)
    }

    fn new_product(name: &str, cents: i64) -> NewProduct {
        NewProduct::new(name.into(), None, Price::from_cents(cents).unwrap()).unwrap()
    }

    #[test]
    fn test_vector_blob_roundtrip_and_corruption() {
        let v = vec![0.25_f32, -1.5, 3.0];
        let blob = SqliteProductRepo::serialize_vector(&v);
        assert_eq!(blob.len(), 12);
        assert_eq!(SqliteProductRepo::deserialize_vector(&blob), Some(v));
        assert_eq!(SqliteProductRepo::deserialize_vector(&blob[..7]), None);
        assert_eq!(SqliteProductRepo::deserialize_vector(&[]), None);
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let repo = repo();
        let a = repo.insert(&new_product("Chair", 4999)).unwrap();
        let b = repo.insert(&new_product("Table", 12000)).unwrap();
        assert!(b.id > a.id);
        assert_eq!(a.price.cents(), 4999);
        assert!(a.embedding.is_none());
    }

    #[test]
    fn test_update_partial_fields() {
        let repo = repo();
        let p = repo.insert(&new_product("Chair", 100)).unwrap();
        let updated = repo
            .update(
                p.id,
                &ProductUpdate {
                    price: Some(Price::from_cents(250).unwrap()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Chair");
        assert_eq!(updated.price.cents(), 250);
        let rename = ProductUpdate {
            name: Some("x".into()),
            ..Default::default()
        };
        assert!(repo.update(ProductId::new(999), &rename).unwrap().is_none());
    }

    #[test]
    fn test_update_clears_description() {
        let repo = repo();
        let lamp = NewProduct::new("Lamp".into(), Some("brass".into()), Price::default()).unwrap();
        let p = repo.insert(&lamp).unwrap();
        assert_eq!(p.description.as_deref(), Some("brass"));
        let clear = ProductUpdate {
            description: Some(None),
            ..Default::default()
        };
        let updated = repo.update(p.id, &clear).unwrap().unwrap();
        assert!(updated.description.is_none());
    }

    #[test]
    fn test_corrupt_blob_counts_as_missing() {
        let repo = repo();
        let good = repo.insert(&new_product("Good", 1)).unwrap();
        let bad = repo.insert(&new_product("Bad", 2)).unwrap();
        repo.set_image(good.id, "good.png", Some(&[1.0, 0.0, 0.0])).unwrap();
        repo.set_image(bad.id, "bad.png", None).unwrap();
        repo.lock()
            .unwrap()
            .execute(
                "UPDATE products SET embedding = ?1 WHERE id = ?2",
                params![vec![0u8; 7], bad.id.value()],
            )
            .unwrap();

        let stats = repo.stats().unwrap();
        assert_eq!(stats.embedded_products, 1);
        assert_eq!(stats.dimensions.len(), 1);
        assert_eq!(stats.dimensions[0].dimension, 3);
        assert_eq!(repo.stored_dimension().unwrap(), Some(3));

        let missing = repo.missing_embeddings().unwrap();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].id, bad.id);
        assert!(missing[0].embedding.is_none());
    }

    #[test]
    fn test_only_corrupt_blobs_have_no_dimension() {
        let repo = repo();
        let p = repo.insert(&new_product("Bad", 1)).unwrap();
        repo.set_image(p.id, "bad.png", None).unwrap();
        repo.lock()
            .unwrap()
            .execute(
                "UPDATE products SET embedding = ?1 WHERE id = ?2",
                params![Vec::<u8>::new(), p.id.value()],
            )
            .unwrap();

        let stats = repo.stats().unwrap();
        assert_eq!(stats.embedded_products, 0);
        assert!(stats.dimensions.is_empty());
        assert_eq!(repo.stored_dimension().unwrap(), None);
        assert_eq!(repo.missing_embeddings().unwrap().len(), 1);
    }

    #[test]
    fn test_list_entries_and_stats() {
        let repo = repo();
        let a = repo.insert(&new_product("A", 1)).unwrap();
        let b = repo.insert(&new_product("B", 2)).unwrap();
        let c = repo.insert(&new_product("C", 3)).unwrap();
        repo.set_image(a.id, "a.png", Some(&[1.0, 0.0])).unwrap();
        repo.set_image(b.id, "b.png", None).unwrap();
        repo.set_embedding(c.id, &[0.0, 1.0, 0.0]).unwrap();

        let entries = repo.list_entries().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].vector, Some(vec![1.0, 0.0]));
        assert_eq!(entries[1].vector, None);

        let missing = repo.missing_embeddings().unwrap();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].id, b.id);

        let stats = repo.stats().unwrap();
        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.embedded_products, 2);
        assert_eq!(stats.dimensions.len(), 2);
        assert_eq!(repo.stored_dimension().unwrap(), Some(2));
    }

    #[test]
    fn test_set_embedding_unknown_product() {
        let repo = repo();
        assert!(matches!(
            repo.set_embedding(ProductId::new(42), &[1.0]),
            Err(DomainError::NotFound(_))
        ));
    }
}
