#![allow(dead_code)]

use crudsearch::{
    Normalizer, OptionRegistry, RawDescriptor, RawSearchConfig, SearchConfig,
    search::SelectOptions,
};
use serde_json::{Value, json};

pub mod article {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "articles")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub title: String,
        pub status: String,
        pub locale: String,
        pub author_name: String,
        pub published_at: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Route search logs to the test harness output; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("crudsearch=debug")
        .with_test_writer()
        .try_init();
}

pub fn site_settings() -> Value {
    json!({
        "site": {
            "name": "Example",
            "locales": {"en": "English", "fr": "French"}
        }
    })
}

pub fn statuses() -> SelectOptions {
    let mut options = SelectOptions::new();
    options.insert("draft".into(), json!("Draft"));
    options.insert("live".into(), json!("Live"));
    options
}

pub fn option_registry() -> OptionRegistry {
    OptionRegistry::new()
        .method("Article::statuses", statuses)
        .field("Article::states", statuses())
}

/// title, status, locale, author, published_at
pub fn article_search<Q>() -> RawSearchConfig<Q> {
    RawSearchConfig::new()
        .text("title")
        .field(
            "status",
            RawDescriptor::new()
                .field_type("select")
                .options_from("Article::statuses()"),
        )
        .locale()
        .field("author", RawDescriptor::new().column("author_name"))
        .typed("published_at", "date")
}

pub fn article_config<Q>() -> SearchConfig<Q> {
    init_tracing();
    let site = site_settings();
    let registry = option_registry();
    Normalizer::new(&site, &registry)
        .longhand(article_search())
        .expect("article search config is valid")
}
