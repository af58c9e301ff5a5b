use super::*;

/// Tests deleting an existing document.
///
/// Expected: Ok(true) and the row is gone
#[tokio::test]
async fn deletes_existing_document() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildSetting)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::guild_setting::GuildSettingFactory::new(db)
        .guild_id("123456789")
        .namespace("antinuke")
        .build()
        .await?;

    let repo = GuildSettingRepository::new(db);
    assert!(repo.delete(123456789, "antinuke").await?);
    assert!(repo.find(123456789, "antinuke").await?.is_none());

    Ok(())
}

/// Tests deleting a document that does not exist.
///
/// Expected: Ok(false)
#[tokio::test]
async fn returns_false_when_missing() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildSetting)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildSettingRepository::new(db);
    assert!(!repo.delete(123456789, "antinuke").await?);

    Ok(())
}
