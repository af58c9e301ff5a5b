use super::*;

/// Tests finding an existing settings document.
///
/// Expected: Ok(Some) with the stored value
#[tokio::test]
async fn finds_existing_document() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildSetting)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::guild_setting::GuildSettingFactory::new(db)
        .guild_id("123456789")
        .namespace("antinuke")
        .value(r#"{"enabled":true}"#)
        .build()
        .await?;

    let repo = GuildSettingRepository::new(db);
    let found = repo.find(123456789, "antinuke").await?;

    assert!(found.is_some());
    assert_eq!(found.unwrap().value, r#"{"enabled":true}"#);

    Ok(())
}

/// Tests that documents are scoped by namespace.
///
/// A guild with only a `welcome` document has nothing under `antinuke`.
///
/// Expected: Ok(None)
#[tokio::test]
async fn does_not_cross_namespaces() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildSetting)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::guild_setting::GuildSettingFactory::new(db)
        .guild_id("123456789")
        .namespace("welcome")
        .build()
        .await?;

    let repo = GuildSettingRepository::new(db);
    assert!(repo.find(123456789, "antinuke").await?.is_none());

    Ok(())
}

/// Tests that documents are scoped by guild.
///
/// Expected: Ok(None) for a different guild id
#[tokio::test]
async fn does_not_cross_guilds() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildSetting)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::guild_setting::GuildSettingFactory::new(db)
        .guild_id("111")
        .namespace("antinuke")
        .build()
        .await?;

    let repo = GuildSettingRepository::new(db);
    assert!(repo.find(222, "antinuke").await?.is_none());

    Ok(())
}
