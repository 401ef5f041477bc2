#![allow(dead_code)]

//! Small library schema used to exercise queries and repositories.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Schema, Set,
};
use store_db::{Aggregate, ConnectOpts, DbHandle, Nid};

pub mod author {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "author")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub nid: i32,
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::book::Entity")]
        Books,
    }

    impl Related<super::book::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Books.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod book {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "book")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub nid: i32,
        #[sea_orm(unique)]
        pub tid: String,
        pub title: String,
        pub year: i32,
        pub author_nid: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::author::Entity",
            from = "Column::AuthorNid",
            to = "super::author::Column::Nid"
        )]
        Author,
        #[sea_orm(has_many = "super::chapter::Entity")]
        Chapters,
    }

    impl Related<super::author::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Author.def()
        }
    }

    impl Related<super::chapter::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Chapters.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod chapter {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "chapter")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub nid: i32,
        pub book_nid: i32,
        pub title: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::book::Entity",
            from = "Column::BookNid",
            to = "super::book::Column::Nid"
        )]
        Book,
    }

    impl Related<super::book::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Book.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Book {
    pub nid: Nid,
    pub tid: String,
    pub title: String,
    pub year: i32,
    pub author_nid: Nid,
    pub author: Option<String>,
    pub chapters: Option<Vec<String>>,
}

impl Book {
    pub fn new(tid: &str, title: &str, year: i32, author_nid: Nid) -> Self {
        Self {
            nid: 0,
            tid: tid.to_owned(),
            title: title.to_owned(),
            year,
            author_nid,
            author: None,
            chapters: None,
        }
    }
}

#[async_trait]
impl Aggregate for Book {
    type Entity = book::Entity;
    const NAME: &'static str = "book";

    fn from_model(m: book::Model) -> Self {
        Self {
            nid: m.nid,
            tid: m.tid,
            title: m.title,
            year: m.year,
            author_nid: m.author_nid,
            author: None,
            chapters: None,
        }
    }

    fn nid(&self) -> Nid {
        self.nid
    }

    fn nid_column() -> book::Column {
        book::Column::Nid
    }

    async fn insert<C: ConnectionTrait>(&self, conn: &C) -> Result<Self, DbErr> {
        let model = book::ActiveModel {
            tid: Set(self.tid.clone()),
            title: Set(self.title.clone()),
            year: Set(self.year),
            author_nid: Set(self.author_nid),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        Ok(Self {
            nid: model.nid,
            ..self.clone()
        })
    }

    async fn update<C: ConnectionTrait>(&self, conn: &C) -> Result<(), DbErr> {
        book::ActiveModel {
            nid: Set(self.nid),
            tid: Set(self.tid.clone()),
            title: Set(self.title.clone()),
            year: Set(self.year),
            author_nid: Set(self.author_nid),
        }
        .update(conn)
        .await?;
        Ok(())
    }

    async fn delete<C: ConnectionTrait>(&self, conn: &C) -> Result<(), DbErr> {
        chapter::Entity::delete_many()
            .filter(chapter::Column::BookNid.eq(self.nid))
            .exec(conn)
            .await?;
        book::Entity::delete_by_id(self.nid).exec(conn).await?;
        Ok(())
    }

    async fn include<C: ConnectionTrait>(
        items: &mut [Self],
        relation: &book::Relation,
        conn: &C,
    ) -> Result<(), DbErr> {
        match relation {
            book::Relation::Author => {
                let ids: Vec<Nid> = items.iter().map(|b| b.author_nid).collect();
                let names: HashMap<Nid, String> = author::Entity::find()
                    .filter(author::Column::Nid.is_in(ids))
                    .all(conn)
                    .await?
                    .into_iter()
                    .map(|a| (a.nid, a.name))
                    .collect();
                for item in items.iter_mut() {
                    item.author = names.get(&item.author_nid).cloned();
                }
            }
            book::Relation::Chapters => {
                let ids: Vec<Nid> = items.iter().map(|b| b.nid).collect();
                let mut by_book: HashMap<Nid, Vec<String>> = HashMap::new();
                for c in chapter::Entity::find()
                    .filter(chapter::Column::BookNid.is_in(ids))
                    .all(conn)
                    .await?
                {
                    by_book.entry(c.book_nid).or_default().push(c.title);
                }
                for item in items.iter_mut() {
                    item.chapters = Some(by_book.remove(&item.nid).unwrap_or_default());
                }
            }
        }
        Ok(())
    }
}

/// Fresh in-memory database with the library schema.
pub async fn setup() -> DatabaseConnection {
    let handle = DbHandle::connect("sqlite::memory:", ConnectOpts::default())
        .await
        .expect("connect");
    let db = handle.sea();
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    db.execute(backend.build(&schema.create_table_from_entity(author::Entity)))
        .await
        .expect("create author");
    db.execute(backend.build(&schema.create_table_from_entity(book::Entity)))
        .await
        .expect("create book");
    db.execute(backend.build(&schema.create_table_from_entity(chapter::Entity)))
        .await
        .expect("create chapter");
    db
}

pub async fn add_author(db: &DatabaseConnection, name: &str) -> Nid {
    author::ActiveModel {
        name: Set(name.to_owned()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert author")
    .nid
}

pub async fn add_book(db: &DatabaseConnection, tid: &str, title: &str, year: i32, author: Nid) -> Nid {
    book::ActiveModel {
        tid: Set(tid.to_owned()),
        title: Set(title.to_owned()),
        year: Set(year),
        author_nid: Set(author),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert book")
    .nid
}

pub async fn add_chapter(db: &DatabaseConnection, book: Nid, title: &str) {
    chapter::ActiveModel {
        book_nid: Set(book),
        title: Set(title.to_owned()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert chapter");
}

/// Seeds two authors and five books:
///
/// | tid | title | year | author |
/// |-----|-------|------|--------|
/// | B-01 | Dune | 1965 | Herbert |
/// | B-02 | Emma | 1815 | Austen |
/// | B-03 | Persuasion | 1817 | Austen |
/// | B-04 | Children of Dune | 1976 | Herbert |
/// | B-05 | Sanditon | 1817 | Austen |
pub async fn seed_library(db: &DatabaseConnection) -> (Nid, Nid) {
    let herbert = add_author(db, "Herbert").await;
    let austen = add_author(db, "Austen").await;
    add_book(db, "B-01", "Dune", 1965, herbert).await;
    add_book(db, "B-02", "Emma", 1815, austen).await;
    add_book(db, "B-03", "Persuasion", 1817, austen).await;
    add_book(db, "B-04", "Children of Dune", 1976, herbert).await;
    add_book(db, "B-05", "Sanditon", 1817, austen).await;
    (herbert, austen)
}
