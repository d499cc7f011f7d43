use crate::{
    config::DbConfig,
    data::student::{Address, Student, StudentDraft},
    error::{MakeQuerySnafu, MigrateSnafu, OpenDatabaseSnafu, RollbookResult},
    store::{Page, PageQuery, StudentStore},
};
use async_trait::async_trait;
use snafu::ResultExt;
use sqlx::{FromRow, Pool, Postgres, postgres::PgPoolOptions};

const STUDENT_COLUMNS: &str = "id, name, email, phone, gender, blood_group, \
     address_street, address_city, address_state, address_country";

/// Postgres-backed store. The address lives in the same row as its owning
/// student, so the one-to-one composition cannot be violated by the schema.
///
/// Queries use the runtime API rather than the checked macros so the crate
/// builds without a live `DATABASE_URL`.
#[derive(Debug, Clone)]
pub struct PostgresStudentStore {
    pool: Pool<Postgres>,
}

impl PostgresStudentStore {
    pub async fn connect(options: PgPoolOptions, config: &DbConfig) -> RollbookResult<Self> {
        let pool = options
            .connect(&config.get_db_path())
            .await
            .context(OpenDatabaseSnafu)?;

        sqlx::migrate!().run(&pool).await.context(MigrateSnafu)?;

        Ok(Self { pool })
    }
}

#[derive(FromRow)]
struct StudentRow {
    id: i32,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    gender: String,
    blood_group: String,
    address_street: String,
    address_city: String,
    address_state: Option<String>,
    address_country: String,
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            gender: row.gender,
            blood_group: row.blood_group,
            address: Address {
                street: row.address_street,
                city: row.address_city,
                state: row.address_state,
                country: row.address_country,
            },
        }
    }
}

#[async_trait]
impl StudentStore for PostgresStudentStore {
    async fn get(&self, id: i32) -> RollbookResult<Option<Student>> {
        let row = sqlx::query_as::<_, StudentRow>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context(MakeQuerySnafu)?;

        Ok(row.map(Into::into))
    }

    async fn list(&self) -> RollbookResult<Vec<Student>> {
        let rows = sqlx::query_as::<_, StudentRow>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .context(MakeQuerySnafu)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn page(&self, query: PageQuery) -> RollbookResult<Page<Student>> {
        let (page, page_size) = query.clamped();

        let total_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM students")
            .fetch_one(&self.pool)
            .await
            .context(MakeQuerySnafu)?;

        let rows = sqlx::query_as::<_, StudentRow>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(page_size)
        .bind((page - 1) * page_size)
        .fetch_all(&self.pool)
        .await
        .context(MakeQuerySnafu)?;

        Ok(Page {
            page_index: page,
            page_size,
            total_count,
            items: rows.into_iter().map(Into::into).collect(),
        })
    }

    async fn create(&self, draft: StudentDraft) -> RollbookResult<Student> {
        let row = sqlx::query_as::<_, StudentRow>(&format!(
            "INSERT INTO students (name, email, phone, gender, blood_group, \
                 address_street, address_city, address_state, address_country) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(&draft.phone)
        .bind(&draft.gender)
        .bind(&draft.blood_group)
        .bind(&draft.address.street)
        .bind(&draft.address.city)
        .bind(&draft.address.state)
        .bind(&draft.address.country)
        .fetch_one(&self.pool)
        .await
        .context(MakeQuerySnafu)?;

        Ok(row.into())
    }

    async fn update(&self, id: i32, draft: StudentDraft) -> RollbookResult<Option<Student>> {
        let row = sqlx::query_as::<_, StudentRow>(&format!(
            "UPDATE students SET name = $2, email = $3, phone = $4, gender = $5, \
                 blood_group = $6, address_street = $7, address_city = $8, \
                 address_state = $9, address_country = $10 \
             WHERE id = $1 \
             RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(&draft.phone)
        .bind(&draft.gender)
        .bind(&draft.blood_group)
        .bind(&draft.address.street)
        .bind(&draft.address.city)
        .bind(&draft.address.state)
        .bind(&draft.address.country)
        .fetch_optional(&self.pool)
        .await
        .context(MakeQuerySnafu)?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: i32) -> RollbookResult<Option<Student>> {
        let row = sqlx::query_as::<_, StudentRow>(&format!(
            "DELETE FROM students WHERE id = $1 RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context(MakeQuerySnafu)?;

        Ok(row.map(Into::into))
    }

    async fn exists(&self, id: i32) -> RollbookResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM students WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .context(MakeQuerySnafu)
    }
}
