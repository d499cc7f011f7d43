use crate::{
    auth::RollbookSession,
    config::RuntimeConfiguration,
    error::RollbookResult,
    maud_conveniences::render_nav,
    store::{StudentStore, memory::MemoryStudentStore, postgres::PostgresStudentStore},
};
use maud::{DOCTYPE, Markup, html};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct AppState {
    store: Arc<dyn StudentStore>,
    config: RuntimeConfiguration,
}

impl AppState {
    pub async fn new(options: PgPoolOptions, config: RuntimeConfiguration) -> RollbookResult<Self> {
        let store: Arc<dyn StudentStore> = match config.db_config() {
            Some(db_config) => Arc::new(PostgresStudentStore::connect(options, &db_config).await?),
            None => {
                warn!("No database configured, keeping student records in memory");
                Arc::new(MemoryStudentStore::default())
            }
        };

        Ok(Self { store, config })
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(MemoryStudentStore::default()),
            config: RuntimeConfiguration::default(),
        }
    }

    pub fn store(&self) -> &dyn StudentStore {
        self.store.as_ref()
    }

    pub const fn config(&self) -> &RuntimeConfiguration {
        &self.config
    }

    #[allow(clippy::unused_self, clippy::needless_pass_by_value)] //in case self is ever needed :), and to allow direct html! usage
    pub fn render(&self, session: RollbookSession, markup: Markup) -> Markup {
        let nav = render_nav(session.user.as_ref());

        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { "Rollbook" }
                }
                body class="bg-gray-900 h-screen flex flex-col items-center justify-center text-white" {
                    (nav)
                    (markup)
                }
            }
        }
    }
}
