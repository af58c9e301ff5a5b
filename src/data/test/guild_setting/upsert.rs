use super::*;

/// Tests inserting a new settings document.
///
/// Expected: Ok with document created
#[tokio::test]
async fn inserts_new_document() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildSetting)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildSettingRepository::new(db);
    let saved = repo
        .upsert(123456789, "antinuke", r#"{"enabled":false}"#.to_string())
        .await?;

    assert_eq!(saved.guild_id, "123456789");
    assert_eq!(saved.namespace, "antinuke");
    assert_eq!(saved.value, r#"{"enabled":false}"#);

    Ok(())
}

/// Tests that upserting an existing key overwrites the whole value.
///
/// Expected: Ok with a single row holding the new value
#[tokio::test]
async fn overwrites_existing_document() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildSetting)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::guild_setting::GuildSettingFactory::new(db)
        .guild_id("123456789")
        .namespace("antinuke")
        .value(r#"{"enabled":false,"logChannelId":"1"}"#)
        .build()
        .await?;

    let repo = GuildSettingRepository::new(db);
    repo.upsert(123456789, "antinuke", r#"{"enabled":true}"#.to_string())
        .await?;

    let count = entity::prelude::GuildSetting::find().count(db).await?;
    assert_eq!(count, 1);

    let stored = repo.find(123456789, "antinuke").await?.unwrap();
    assert_eq!(stored.value, r#"{"enabled":true}"#);

    Ok(())
}

/// Tests that the same guild can hold documents in several namespaces.
///
/// Expected: Ok with two rows
#[tokio::test]
async fn keeps_namespaces_separate() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildSetting)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildSettingRepository::new(db);
    repo.upsert(1, "antinuke", "{}".to_string()).await?;
    repo.upsert(1, "welcome", "{}".to_string()).await?;

    let count = entity::prelude::GuildSetting::find().count(db).await?;
    assert_eq!(count, 2);

    Ok(())
}
