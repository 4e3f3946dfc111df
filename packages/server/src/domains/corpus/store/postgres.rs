//! PostgreSQL corpus store.
//!
//! Field absence maps to SQL `NULL` on `components` and `translation`. The
//! three root states map to `root_searched` + `root_id`:
//!
//! | state        | root_searched | root_id |
//! |--------------|---------------|---------|
//! | Unsearched   | false         | NULL    |
//! | NotFound     | true          | NULL    |
//! | Resolved(r)  | true          | r       |

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::FromRow;
use tracing::{debug, instrument};

use crate::common::{SentenceRef, WordId};
use crate::domains::corpus::models::{
    Components, Root, RootLink, Word, ROOT_BEARING_PARTS_OF_SPEECH,
};
use crate::domains::corpus::store::CorpusStore;
use crate::error::{PipelineError, Result};

const WORD_COLUMNS: &str =
    "id, word, word_with_symbols, components, translation, root_searched, root_id";

#[derive(Debug, FromRow)]
struct WordRow {
    id: String,
    word: String,
    word_with_symbols: String,
    components: Option<Json<Components>>,
    translation: Option<String>,
    root_searched: bool,
    root_id: Option<String>,
}

impl TryFrom<WordRow> for Word {
    type Error = PipelineError;

    fn try_from(row: WordRow) -> Result<Self> {
        let id: WordId = row.id.parse().map_err(PipelineError::storage)?;
        let root = match (row.root_searched, row.root_id) {
            (_, Some(root)) => RootLink::Resolved(root),
            (true, None) => RootLink::NotFound,
            (false, None) => RootLink::Unsearched,
        };
        Ok(Word {
            id,
            word: row.word,
            word_with_symbols: row.word_with_symbols,
            components: row.components.map(|Json(c)| c),
            translation: row.translation,
            root,
        })
    }
}

#[derive(Debug, FromRow)]
struct RootRow {
    root: String,
    word_ids: Vec<String>,
}

impl TryFrom<RootRow> for Root {
    type Error = PipelineError;

    fn try_from(row: RootRow) -> Result<Self> {
        let word_ids = row
            .word_ids
            .iter()
            .map(|id| id.parse::<WordId>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(PipelineError::storage)?;
        Ok(Root {
            root: row.root,
            word_ids,
        })
    }
}

/// Corpus store backed by the `words` and `roots` tables.
#[derive(Clone)]
pub struct PostgresCorpusStore {
    pool: PgPool,
}

impl PostgresCorpusStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Apply the bundled migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(PipelineError::storage)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_word(&self, sql: &str, id: &str) -> Result<Option<Word>> {
        sqlx::query_as::<_, WordRow>(sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Word::try_from)
            .transpose()
    }
}

#[async_trait]
impl CorpusStore for PostgresCorpusStore {
    async fn get_word(&self, id: &WordId) -> Result<Option<Word>> {
        let sql = format!("SELECT {} FROM words WHERE id = $1", WORD_COLUMNS);
        self.fetch_word(&sql, id.as_str()).await
    }

    async fn insert_word(&self, word: &Word) -> Result<()> {
        let sentence = word.sentence();
        let (root_searched, root_id) = root_columns(&word.root);

        sqlx::query(
            r#"
            INSERT INTO words (
                id, book, chapter, verse, word_count, word, word_with_symbols,
                components, translation, root_searched, root_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id) DO UPDATE SET
                word = EXCLUDED.word,
                word_with_symbols = EXCLUDED.word_with_symbols,
                components = EXCLUDED.components,
                translation = EXCLUDED.translation,
                root_searched = EXCLUDED.root_searched,
                root_id = EXCLUDED.root_id
            "#,
        )
        .bind(word.id.as_str())
        .bind(sentence.book as i32)
        .bind(sentence.chapter as i32)
        .bind(sentence.verse as i32)
        .bind(word.word_count() as i32)
        .bind(&word.word)
        .bind(&word.word_with_symbols)
        .bind(word.components.as_ref().map(Json))
        .bind(word.translation.as_deref())
        .bind(root_searched)
        .bind(root_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_unannotated_word(&self) -> Result<Option<Word>> {
        let sql = format!(
            "SELECT {} FROM words WHERE components IS NULL OR translation IS NULL ORDER BY id LIMIT 1",
            WORD_COLUMNS
        );
        sqlx::query_as::<_, WordRow>(&sql)
            .fetch_optional(&self.pool)
            .await?
            .map(Word::try_from)
            .transpose()
    }

    #[instrument(skip_all, fields(sentence = %sentence))]
    async fn find_sentence(&self, sentence: SentenceRef) -> Result<Vec<Word>> {
        let sql = format!(
            "SELECT {} FROM words WHERE book = $1 AND chapter = $2 AND verse = $3 ORDER BY word_count ASC",
            WORD_COLUMNS
        );
        let rows = sqlx::query_as::<_, WordRow>(&sql)
            .bind(sentence.book as i32)
            .bind(sentence.chapter as i32)
            .bind(sentence.verse as i32)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "loaded sentence");
        rows.into_iter().map(Word::try_from).collect()
    }

    async fn set_annotation(
        &self,
        id: &WordId,
        components: &Components,
        translation: &str,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE words SET components = $2, translation = $3, annotated_at = NOW() WHERE id = $1",
        )
        .bind(id.as_str())
        .bind(Json(components))
        .bind(translation)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn next_root_candidate(&self, after: Option<&WordId>) -> Result<Option<Word>> {
        let sql = format!(
            r#"
            SELECT {} FROM words
            WHERE NOT root_searched
              AND components -> 'partsOfSpeech' ?| $1
              AND ($2::text IS NULL OR id > $2)
            ORDER BY id
            LIMIT 1
            "#,
            WORD_COLUMNS
        );
        let parts: Vec<String> = ROOT_BEARING_PARTS_OF_SPEECH
            .iter()
            .map(|p| p.to_string())
            .collect();

        sqlx::query_as::<_, WordRow>(&sql)
            .bind(parts)
            .bind(after.map(WordId::as_str))
            .fetch_optional(&self.pool)
            .await?
            .map(Word::try_from)
            .transpose()
    }

    async fn upsert_root(&self, root: &str, word_id: &WordId) -> Result<Root> {
        let row = sqlx::query_as::<_, RootRow>(
            r#"
            INSERT INTO roots (root, word_ids)
            VALUES ($1, ARRAY[$2::text])
            ON CONFLICT (root) DO UPDATE SET
                word_ids = CASE
                    WHEN $2::text = ANY(roots.word_ids) THEN roots.word_ids
                    ELSE array_append(roots.word_ids, $2::text)
                END
            RETURNING root, word_ids
            "#,
        )
        .bind(root)
        .bind(word_id.as_str())
        .fetch_one(&self.pool)
        .await?;

        Root::try_from(row)
    }

    async fn set_root_link(&self, id: &WordId, link: &RootLink) -> Result<()> {
        let (root_searched, root_id) = root_columns(link);
        sqlx::query(
            r#"
            UPDATE words
            SET root_searched = $2,
                root_id = $3,
                root_searched_at = CASE WHEN $2 THEN NOW() ELSE NULL END
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .bind(root_searched)
        .bind(root_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_root(&self, root: &str) -> Result<Option<Root>> {
        sqlx::query_as::<_, RootRow>("SELECT root, word_ids FROM roots WHERE root = $1")
            .bind(root)
            .fetch_optional(&self.pool)
            .await?
            .map(Root::try_from)
            .transpose()
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn root_columns(link: &RootLink) -> (bool, Option<&str>) {
    match link {
        RootLink::Unsearched => (false, None),
        RootLink::NotFound => (true, None),
        RootLink::Resolved(root) => (true, Some(root.as_str())),
    }
}
