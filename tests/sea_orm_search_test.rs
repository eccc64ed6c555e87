mod common;

use common::{article, article_config};
use crudsearch::{SearchConfig, SearchError};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, QueryFilter, QueryTrait, Select,
    sea_query::{Expr, QueryStatementWriter, SqliteQueryBuilder},
};

fn render(select: &Select<article::Entity>) -> String {
    select.as_query().to_string(SqliteQueryBuilder)
}

#[test]
fn test_select_receives_where_clauses() {
    let config: SearchConfig<Select<article::Entity>> = article_config();
    let select = config
        .apply(
            article::Entity::find(),
            Some(r#"[[0,"%*%","rust"],[1,"=","live"]]"#),
        )
        .unwrap();

    let sql = render(&select);
    assert!(
        sql.ends_with(r#"WHERE "title" LIKE '%rust%' AND "status" = 'live'"#),
        "{sql}"
    );
}

#[test]
fn test_select_not_like_and_explicit_column() {
    let config: SearchConfig<Select<article::Entity>> = article_config();
    let select = config
        .apply(
            article::Entity::find(),
            Some(r#"[[0,"!%*%","draft"],[3,"*%","Ada"]]"#),
        )
        .unwrap();

    let sql = render(&select);
    assert!(sql.contains(r#""title" NOT LIKE '%draft%'"#), "{sql}");
    assert!(sql.contains(r#""author_name" LIKE 'Ada%'"#), "{sql}");
}

#[test]
fn test_existing_filters_are_kept() {
    let config: SearchConfig<Select<article::Entity>> = article_config();
    let base = article::Entity::find().filter(article::Column::Id.gt(10));
    let select = config
        .apply(base, Some(r#"[[4,">=","2024-01-01"]]"#))
        .unwrap();

    let sql = render(&select);
    assert!(sql.contains(r#""articles"."id" > 10"#), "{sql}");
    assert!(sql.contains(r#""published_at" >= '2024-01-01'"#), "{sql}");
}

#[test]
fn test_absent_payload_leaves_select_unfiltered() {
    let config: SearchConfig<Select<article::Entity>> = article_config();
    let select = config.apply(article::Entity::find(), None).unwrap();
    assert!(!render(&select).contains("WHERE"));
}

#[test]
fn test_operator_outside_sql_grammar_is_rejected() {
    let config: SearchConfig<Select<article::Entity>> = article_config();
    let err = config
        .apply(article::Entity::find(), Some(r#"[[0,"= 1 OR 1 =","x"]]"#))
        .unwrap_err();
    assert_eq!(err, SearchError::UnsupportedOperator("= 1 OR 1 =".into()));
}

#[test]
fn test_custom_query_on_select() {
    let config: SearchConfig<Select<article::Entity>> = article_config()
        .with_query("status", |select: &mut Select<article::Entity>, _, input| {
            let statuses: Vec<&str> = input.split(',').map(str::trim).collect();
            *select = std::mem::replace(select, article::Entity::find())
                .filter(article::Column::Status.is_in(statuses));
            Ok(())
        })
        .unwrap();

    let select = config
        .apply(article::Entity::find(), Some(r#"[[1,"in","draft, live"]]"#))
        .unwrap();
    let sql = render(&select);
    assert!(
        sql.contains(r#""articles"."status" IN ('draft', 'live')"#),
        "{sql}"
    );
}

#[test]
fn test_condition_builder() {
    let config: SearchConfig<Condition> = article_config();
    let condition = config
        .apply(Condition::all(), Some(r#"[[2,"=","fr"],[0,"*%","Intro"]]"#))
        .unwrap();

    let select = article::Entity::find().filter(condition);
    let sql = render(&select);
    assert!(
        sql.contains(r#""locale" = 'fr' AND "title" LIKE 'Intro%'"#),
        "{sql}"
    );
}

#[test]
fn test_condition_can_be_combined_with_or_groups() {
    let config: SearchConfig<Condition> = article_config();
    let searched = config
        .apply(Condition::all(), Some(r#"[[0,"%*%","rust"]]"#))
        .unwrap();
    let visible = Condition::any()
        .add(Expr::col(article::Column::Status).eq("live"))
        .add(Expr::col(article::Column::Status).eq("draft"));

    let select = article::Entity::find().filter(searched).filter(visible);
    let sql = render(&select);
    assert!(sql.contains(r#""title" LIKE '%rust%'"#), "{sql}");
    assert!(sql.contains(" OR "), "{sql}");
}

#[test]
fn test_search_from_any_condition_is_still_anded() {
    let config: SearchConfig<Condition> = article_config();
    let condition = config
        .apply(Condition::any(), Some(r#"[[0,"=","a"],[1,"=","live"]]"#))
        .unwrap();

    let sql = render(&article::Entity::find().filter(condition));
    assert!(
        sql.ends_with(r#"WHERE "title" = 'a' AND "status" = 'live'"#),
        "{sql}"
    );
}
