use crate::data::guild_setting::GuildSettingRepository;
use sea_orm::{DbErr, EntityTrait, PaginatorTrait};
use test_utils::{builder::TestBuilder, factory};

mod delete;
mod find;
mod upsert;
