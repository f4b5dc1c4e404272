use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create album table
        manager
            .create_table(
                Table::create()
                    .table(Album::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Album::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Album::Title).string().not_null())
                    .col(ColumnDef::new(Album::Artist).string().not_null())
                    .col(ColumnDef::new(Album::ImageUrl).string().not_null())
                    .col(ColumnDef::new(Album::ReleaseYear).integer().not_null())
                    .col(
                        ColumnDef::new(Album::Songs)
                            .array(ColumnType::BigInteger)
                            .not_null()
                            .default(Expr::cust("'{}'::bigint[]")),
                    )
                    .col(ColumnDef::new(Album::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Album::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        // Create song table
        manager
            .create_table(
                Table::create()
                    .table(Song::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Song::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Song::Title).string().not_null())
                    .col(ColumnDef::new(Song::Artist).string().not_null())
                    .col(ColumnDef::new(Song::AudioUrl).string().not_null())
                    .col(ColumnDef::new(Song::ImageUrl).string().not_null())
                    .col(ColumnDef::new(Song::Duration).big_integer().not_null())
                    // no foreign key: a dangling album reference is allowed
                    .col(ColumnDef::new(Song::AlbumId).big_integer().null())
                    .col(ColumnDef::new(Song::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Song::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_song_album_id")
                    .table(Song::Table)
                    .col(Song::AlbumId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_song_created_at")
                    .table(Song::Table)
                    .col(Song::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Song::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Album::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Album {
    Table,
    Id,
    Title,
    Artist,
    ImageUrl,
    ReleaseYear,
    Songs,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Song {
    Table,
    Id,
    Title,
    Artist,
    AudioUrl,
    ImageUrl,
    Duration,
    AlbumId,
    CreatedAt,
    UpdatedAt,
}
